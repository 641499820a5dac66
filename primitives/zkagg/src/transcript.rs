//! Fiat-Shamir transcripts.
//!
//! Every gadget opens a transcript with the protocol label, its own domain
//! separator and the proof id, then absorbs the statement and the prover's
//! commitments in a fixed order. The challenge is 64 squeezed bytes reduced
//! mod ℓ, so prover and verifier agree on it bit for bit.

use merlin::Transcript;

use crate::{Point, ProofId, Scalar};

pub mod labels {
    pub const PROTOCOL: &[u8] = b"zkagg";
    pub const PROTOCOL_V: &[u8] = b"1";

    pub const DOMAIN_DLOG: &[u8] = b"dlog";
    pub const DOMAIN_DH_TUPLE: &[u8] = b"dh-tuple";
    pub const DOMAIN_ONE_OF_TWO: &[u8] = b"one-of-two";
    pub const DOMAIN_SQUARE: &[u8] = b"square";

    pub const CHALLENGE: &[u8] = b"c";
}

pub fn new_transcript(domain: &'static [u8], pid: &ProofId) -> Transcript {
    let mut t = Transcript::new(labels::PROTOCOL);
    t.append_message(b"proto", labels::PROTOCOL_V);
    t.append_message(b"dom-sep", domain);
    t.append_message(b"pid", pid.as_bytes());
    t
}

pub fn append_point(t: &mut Transcript, label: &'static [u8], p: &Point) {
    t.append_message(label, p.compress().as_bytes());
}

pub fn challenge_scalar(t: &mut Transcript, label: &'static [u8]) -> Scalar {
    let mut buf = [0u8; 64];
    t.challenge_bytes(label, &mut buf);
    Scalar::from_bytes_mod_order_wide(&buf)
}
