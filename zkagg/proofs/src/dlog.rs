//! Schnorr proof of knowledge of a discrete log, made non-interactive with
//! Fiat-Shamir.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zkagg_primitives::{
    G, Point, ProofId, Scalar, append_point, challenge_scalar, labels, new_transcript,
    points_eq, random_scalar,
};

/// `t = v·G`, `r = v − c·x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteLogProof {
    pub t: Point,
    pub r: Scalar,
}

fn challenge(pid: &ProofId, y: &Point, t: &Point) -> Scalar {
    let mut tr = new_transcript(labels::DOMAIN_DLOG, pid);
    append_point(&mut tr, b"y", y);
    append_point(&mut tr, b"t", t);
    challenge_scalar(&mut tr, labels::CHALLENGE)
}

impl DiscreteLogProof {
    /// Prove knowledge of `x` with `y = x·G`.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        x: &Scalar,
        y: &Point,
        pid: &ProofId,
        rng: &mut R,
    ) -> Self {
        log::trace!("generating discrete-log proof for {pid}");
        let v = random_scalar(rng);
        let t = v * G;
        let c = challenge(pid, y, &t);
        Self { t, r: v - c * x }
    }

    /// Accept iff `t = r·G + c·y`.
    pub fn verify(&self, y: &Point, pid: &ProofId) -> bool {
        let c = challenge(pid, y, &self.t);
        let ok = points_eq(&self.t, &(self.r * G + c * y));
        if !ok {
            log::debug!("discrete-log proof {pid}: t != r·G + c·y");
        }
        ok
    }
}
