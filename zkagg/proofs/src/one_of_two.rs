//! Disjunctive proof that an ElGamal ciphertext encrypts `0·G` or `1·G`.
//!
//! Cramer-Damgård-Schoenmakers OR-composition of two Chaum-Pedersen proofs:
//! the branch that does not hold is simulated with a random challenge share,
//! the real branch answers whatever is left of the Fiat-Shamir challenge.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zkagg_primitives::{
    Ciphertext, G, Point, ProofId, Scalar, append_point, challenge_scalar, labels,
    new_transcript, points_eq, random_scalar,
};

use crate::ProofError;

/// `ciphertext = (s·G, m·G + s·public_key)` with `m ∈ {0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOfTwoStatement {
    pub ciphertext: Ciphertext,
    pub public_key: Point,
}

/// Branch 1 covers `m = 0`, branch 2 covers `m = 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOfTwoProof {
    pub a1: Point,
    pub b1: Point,
    pub a2: Point,
    pub b2: Point,
    pub d1: Scalar,
    pub d2: Scalar,
    pub r1: Scalar,
    pub r2: Scalar,
}

fn challenge(
    pid: &ProofId,
    stmt: &OneOfTwoStatement,
    a1: &Point,
    b1: &Point,
    a2: &Point,
    b2: &Point,
) -> Scalar {
    let mut t = new_transcript(labels::DOMAIN_ONE_OF_TWO, pid);
    append_point(&mut t, b"pk", &stmt.public_key);
    append_point(&mut t, b"x", &stmt.ciphertext.c1);
    append_point(&mut t, b"y", &stmt.ciphertext.c2);
    append_point(&mut t, b"a1", a1);
    append_point(&mut t, b"b1", b1);
    append_point(&mut t, b"a2", a2);
    append_point(&mut t, b"b2", b2);
    challenge_scalar(&mut t, labels::CHALLENGE)
}

impl OneOfTwoProof {
    /// `bit` must be 0 or 1 and `secret` the randomness `s` of the ciphertext.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        stmt: &OneOfTwoStatement,
        bit: u64,
        secret: &Scalar,
        pid: &ProofId,
        rng: &mut R,
    ) -> Result<Self, ProofError> {
        if bit > 1 {
            return Err(ProofError::NonBinaryMessage(bit));
        }
        log::trace!("generating one-out-of-two proof for {pid}");

        let (x, y, pk) = (stmt.ciphertext.c1, stmt.ciphertext.c2, stmt.public_key);
        let w = random_scalar(rng);
        let r_sim = random_scalar(rng);
        let d_sim = random_scalar(rng);

        let proof = if bit == 1 {
            // simulate branch 1, answer branch 2
            let a1 = r_sim * G + d_sim * x;
            let b1 = r_sim * pk + d_sim * y;
            let a2 = w * G;
            let b2 = w * pk;
            let c = challenge(pid, stmt, &a1, &b1, &a2, &b2);
            let d2 = c - d_sim;
            Self { a1, b1, a2, b2, d1: d_sim, d2, r1: r_sim, r2: w - secret * d2 }
        } else {
            // simulate branch 2, answer branch 1
            let a1 = w * G;
            let b1 = w * pk;
            let a2 = r_sim * G + d_sim * x;
            let b2 = r_sim * pk + d_sim * (y - G);
            let c = challenge(pid, stmt, &a1, &b1, &a2, &b2);
            let d1 = c - d_sim;
            Self { a1, b1, a2, b2, d1, d2: d_sim, r1: w - secret * d1, r2: r_sim }
        };
        Ok(proof)
    }

    pub fn verify(&self, stmt: &OneOfTwoStatement, pid: &ProofId) -> bool {
        let (x, y, pk) = (stmt.ciphertext.c1, stmt.ciphertext.c2, stmt.public_key);
        let c = challenge(pid, stmt, &self.a1, &self.b1, &self.a2, &self.b2);

        if c != self.d1 + self.d2 {
            log::debug!("one-out-of-two proof {pid}: c != d1 + d2");
            return false;
        }
        let checks = [
            (self.a1, self.r1 * G + self.d1 * x, "a1"),
            (self.b1, self.r1 * pk + self.d1 * y, "b1"),
            (self.a2, self.r2 * G + self.d2 * x, "a2"),
            (self.b2, self.r2 * pk + self.d2 * (y - G), "b2"),
        ];
        for (lhs, rhs, name) in checks {
            if !points_eq(&lhs, &rhs) {
                log::debug!("one-out-of-two proof {pid}: {name} equation failed");
                return false;
            }
        }
        true
    }
}
