//! Chaum-Pedersen proof that `(g, h, u, v)` is a Diffie-Hellman tuple.
//!
//! Used twice by the protocol: to bind a participant's combined-key ciphertext
//! to its own-key ciphertext, and inside the range proof to show that the
//! statement ciphertext minus the weighted bit ciphertexts encrypts the
//! identity.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zkagg_primitives::{
    Point, ProofId, Scalar, append_point, challenge_scalar, labels, new_transcript, points_eq,
    random_scalar,
};

/// Statement: some `w` has `u = w·g` and `v = w·h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhTuple {
    pub g: Point,
    pub h: Point,
    pub u: Point,
    pub v: Point,
}

/// `a = r·g`, `b = r·h`, `z = r + c·w`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhTupleProof {
    pub a: Point,
    pub b: Point,
    pub z: Scalar,
}

fn challenge(pid: &ProofId, tuple: &DhTuple, a: &Point, b: &Point) -> Scalar {
    let mut t = new_transcript(labels::DOMAIN_DH_TUPLE, pid);
    append_point(&mut t, b"g", &tuple.g);
    append_point(&mut t, b"h", &tuple.h);
    append_point(&mut t, b"u", &tuple.u);
    append_point(&mut t, b"v", &tuple.v);
    append_point(&mut t, b"a", a);
    append_point(&mut t, b"b", b);
    challenge_scalar(&mut t, labels::CHALLENGE)
}

impl DhTupleProof {
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        tuple: &DhTuple,
        w: &Scalar,
        pid: &ProofId,
        rng: &mut R,
    ) -> Self {
        log::trace!("generating DH-tuple proof for {pid}");
        let r = random_scalar(rng);
        let a = r * tuple.g;
        let b = r * tuple.h;
        let c = challenge(pid, tuple, &a, &b);
        Self { a, b, z: r + c * w }
    }

    /// Accept iff `z·g = a + c·u` and `z·h = b + c·v`.
    pub fn verify(&self, tuple: &DhTuple, pid: &ProofId) -> bool {
        let c = challenge(pid, tuple, &self.a, &self.b);
        if !points_eq(&(self.z * tuple.g), &(self.a + c * tuple.u)) {
            log::debug!("DH-tuple proof {pid}: z·g != a + c·u");
            return false;
        }
        if !points_eq(&(self.z * tuple.h), &(self.b + c * tuple.v)) {
            log::debug!("DH-tuple proof {pid}: z·h != b + c·v");
            return false;
        }
        true
    }
}
