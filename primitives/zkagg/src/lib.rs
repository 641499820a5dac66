//! # zkagg-primitives — shared building blocks
//!
//! Everything the proof gadgets, the ledger and the participant engine agree
//! on lives here:
//!
//! - the group (Ristretto255 from `curve25519-dalek`) and its base point [`G`]
//! - the additively homomorphic ElGamal codec ([`elgamal`])
//! - Fiat-Shamir transcript helpers ([`transcript`])
//! - bounded discrete-log recovery ([`recovery`])
//!
//! Messages are encoded as points `m·G`, so decryption yields a point and the
//! integer behind it has to be recovered with a [`DiscreteLogTable`] whose
//! bound is chosen by the caller.

pub mod elgamal;
pub mod recovery;
pub mod transcript;

use core::fmt;

pub use curve25519_dalek::{ristretto::RistrettoPoint as Point, scalar::Scalar};
use curve25519_dalek::{constants::RISTRETTO_BASEPOINT_POINT, traits::Identity};
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

pub use elgamal::{Ciphertext, Keypair, decrypt, encrypt, encrypt_value};
pub use recovery::{DiscreteLogTable, RecoveryError};
pub use transcript::{append_point, challenge_scalar, labels, new_transcript};

/// Fixed generator of the group.
pub const G: Point = RISTRETTO_BASEPOINT_POINT;

/// Participant identifiers are totally ordered; the key-combination rule of the
/// protocol depends on that order.
pub type ParticipantId = u32;

/// Identifier folded into every Fiat-Shamir challenge.
///
/// Per-element artifacts use `"<uid>:<index>"`, the running-sum range proof
/// uses `"<uid>:sum"`. Any other string is accepted for standalone use of the
/// gadgets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProofId(String);

impl ProofId {
    pub fn element(uid: ParticipantId, index: usize) -> Self {
        Self(format!("{uid}:{index}"))
    }

    pub fn sum(uid: ParticipantId) -> Self {
        Self(format!("{uid}:sum"))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for ProofId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for ProofId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a random scalar with full 512-bit wide reduction.
///
/// `Scalar::from(rng.next_u64())` would only carry 64 bits of entropy; this is
/// uniform over `[0, ℓ)` up to a negligible bias.
pub fn random_scalar<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Scalar {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    Scalar::from_bytes_mod_order_wide(&bytes)
}

/// Neutral element of the group.
pub fn identity() -> Point {
    Point::identity()
}

/// Compressed 32-byte encoding.
pub fn point_to_bytes(p: &Point) -> [u8; 32] {
    p.compress().to_bytes()
}

/// Hex of the compressed encoding, for logs.
pub fn point_to_hex(p: &Point) -> String {
    hex::encode(point_to_bytes(p))
}

/// Constant-time point equality; every verification equation goes through here.
pub fn points_eq(a: &Point, b: &Point) -> bool {
    bool::from(a.ct_eq(b))
}
