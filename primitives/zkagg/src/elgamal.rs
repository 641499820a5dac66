//! Additively homomorphic ElGamal over Ristretto255.
//!
//! Messages are points. `encrypt(pk, r, M) = (r·G, M + r·pk)` and two
//! ciphertexts under the same key add component-wise to an encryption of the
//! sum of their messages; aggregation relies on exactly this.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Neg, Sub};

use curve25519_dalek::traits::Identity;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{G, Point, Scalar, point_to_bytes, points_eq, random_scalar};

/// ElGamal ciphertext `(c1, c2) = (r·G, M + r·pk)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub c1: Point,
    pub c2: Point,
}

impl Ciphertext {
    pub fn identity() -> Self {
        Self { c1: Point::identity(), c2: Point::identity() }
    }

    /// `c1 || c2`, compressed.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[0..32].copy_from_slice(&point_to_bytes(&self.c1));
        out[32..64].copy_from_slice(&point_to_bytes(&self.c2));
        out
    }

    /// Component-wise constant-time equality.
    pub fn ct_equals(&self, other: &Ciphertext) -> bool {
        points_eq(&self.c1, &other.c1) & points_eq(&self.c2, &other.c2)
    }
}

impl Add for Ciphertext {
    type Output = Ciphertext;
    fn add(self, rhs: Ciphertext) -> Ciphertext {
        Ciphertext { c1: self.c1 + rhs.c1, c2: self.c2 + rhs.c2 }
    }
}

impl AddAssign for Ciphertext {
    fn add_assign(&mut self, rhs: Ciphertext) {
        self.c1 += rhs.c1;
        self.c2 += rhs.c2;
    }
}

impl Sub for Ciphertext {
    type Output = Ciphertext;
    fn sub(self, rhs: Ciphertext) -> Ciphertext {
        Ciphertext { c1: self.c1 - rhs.c1, c2: self.c2 - rhs.c2 }
    }
}

impl Neg for Ciphertext {
    type Output = Ciphertext;
    fn neg(self) -> Ciphertext {
        Ciphertext { c1: -self.c1, c2: -self.c2 }
    }
}

impl Mul<Scalar> for Ciphertext {
    type Output = Ciphertext;
    fn mul(self, k: Scalar) -> Ciphertext {
        Ciphertext { c1: k * self.c1, c2: k * self.c2 }
    }
}

impl Sum for Ciphertext {
    fn sum<I: Iterator<Item = Ciphertext>>(iter: I) -> Ciphertext {
        iter.fold(Ciphertext::identity(), |acc, ct| acc + ct)
    }
}

impl<'a> Sum<&'a Ciphertext> for Ciphertext {
    fn sum<I: Iterator<Item = &'a Ciphertext>>(iter: I) -> Ciphertext {
        iter.fold(Ciphertext::identity(), |acc, ct| acc + *ct)
    }
}

/// A secret scalar and its public point `sk·G`.
#[derive(Clone, Debug)]
pub struct Keypair {
    pub secret: Scalar,
    pub public: Point,
}

impl Keypair {
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self::from_secret(random_scalar(rng))
    }

    pub fn from_secret(secret: Scalar) -> Self {
        Self { secret, public: secret * G }
    }
}

/// `(r·G, message + r·pk)`.
pub fn encrypt(pk: &Point, r: &Scalar, message: &Point) -> Ciphertext {
    Ciphertext { c1: r * G, c2: message + r * pk }
}

/// Encrypt the integer `value` encoded as `value·G`.
pub fn encrypt_value(pk: &Point, r: &Scalar, value: u64) -> Ciphertext {
    encrypt(pk, r, &(Scalar::from(value) * G))
}

/// `c2 − sk·c1`. The result is a point; see [`crate::DiscreteLogTable`].
pub fn decrypt(sk: &Scalar, ct: &Ciphertext) -> Point {
    ct.c2 - sk * ct.c1
}
