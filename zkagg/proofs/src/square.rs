//! Canny's proof that `B` encrypts the square of the plaintext of `A`.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zkagg_primitives::{
    Ciphertext, G, Point, ProofId, Scalar, append_point, challenge_scalar, encrypt, identity,
    labels, new_transcript, random_scalar,
};

/// `a = Enc(s_a, a·G)`, `b = Enc(s_b, a²·G)`, both under `public_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareStatement {
    pub a: Ciphertext,
    pub b: Ciphertext,
    pub public_key: Point,
}

#[derive(Clone, Debug)]
pub struct SquareWitness {
    pub value: Scalar,
    pub s_a: Scalar,
    pub s_b: Scalar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareProof {
    pub c_a: Ciphertext,
    pub c_b: Ciphertext,
    pub v: Scalar,
    pub z_a: Scalar,
    pub z_b: Scalar,
}

fn challenge(pid: &ProofId, stmt: &SquareStatement, c_a: &Ciphertext, c_b: &Ciphertext) -> Scalar {
    let mut t = new_transcript(labels::DOMAIN_SQUARE, pid);
    append_point(&mut t, b"pk", &stmt.public_key);
    append_point(&mut t, b"A1", &stmt.a.c1);
    append_point(&mut t, b"A2", &stmt.a.c2);
    append_point(&mut t, b"B1", &stmt.b.c1);
    append_point(&mut t, b"B2", &stmt.b.c2);
    append_point(&mut t, b"Ca1", &c_a.c1);
    append_point(&mut t, b"Ca2", &c_a.c2);
    append_point(&mut t, b"Cb1", &c_b.c1);
    append_point(&mut t, b"Cb2", &c_b.c2);
    challenge_scalar(&mut t, labels::CHALLENGE)
}

impl SquareProof {
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        stmt: &SquareStatement,
        witness: &SquareWitness,
        pid: &ProofId,
        rng: &mut R,
    ) -> Self {
        log::trace!("generating square proof for {pid}");
        let x = random_scalar(rng);
        let r_a = random_scalar(rng);
        let r_b = random_scalar(rng);

        let c_a = encrypt(&stmt.public_key, &r_a, &(x * G));
        let c_b = encrypt(&stmt.public_key, &r_b, &identity()) + stmt.a * x;
        let c = challenge(pid, stmt, &c_a, &c_b);

        let a = witness.value;
        Self {
            c_a,
            c_b,
            v: c * a + x,
            z_a: c * witness.s_a + r_a,
            z_b: c * (witness.s_b - a * witness.s_a) + r_b,
        }
    }

    /// Accept iff `Enc(z_a, v·G) = c·A + C_a` and `Enc(z_b, 0) + v·A = c·B + C_b`.
    pub fn verify(&self, stmt: &SquareStatement, pid: &ProofId) -> bool {
        let c = challenge(pid, stmt, &self.c_a, &self.c_b);

        let lhs_a = encrypt(&stmt.public_key, &self.z_a, &(self.v * G));
        if !lhs_a.ct_equals(&(stmt.a * c + self.c_a)) {
            log::debug!("square proof {pid}: Enc(z_a, v·G) != c·A + C_a");
            return false;
        }
        let lhs_b = encrypt(&stmt.public_key, &self.z_b, &identity()) + stmt.a * self.v;
        if !lhs_b.ct_equals(&(stmt.b * c + self.c_b)) {
            log::debug!("square proof {pid}: Enc(z_b, 0) + v·A != c·B + C_b");
            return false;
        }
        true
    }
}
