//! # zkagg-proofs — non-interactive proofs for verifiable aggregation
//!
//! Fiat-Shamir gadgets over Ristretto255 and ElGamal ciphertexts. Each scheme
//! has a typed statement, a `generate` that takes the witness and a CSPRNG,
//! and a `verify` that returns `bool` and never panics:
//!
//! | scheme | proves |
//! |---|---|
//! | [`DiscreteLogProof`] | knowledge of `x` with `y = x·G` |
//! | [`DhTupleProof`] | `(g, h, u, v)` has `u = w·g`, `v = w·h` |
//! | [`OneOfTwoProof`] | a ciphertext encrypts `0·G` or `1·G` |
//! | [`RangeProof`] | a ciphertext encrypts `m ∈ [0, bound)` |
//! | [`SquareProof`] | `B` encrypts the square of the plaintext of `A` |
//!
//! Every challenge is bound to a [`ProofId`]; the same proof under a different
//! id does not verify.
//!
//! ## Quick Start
//!
//! ```rust
//! use zkagg_primitives::{G, ProofId, random_scalar};
//! use zkagg_proofs::DiscreteLogProof;
//!
//! let mut rng = rand::rng();
//! let x = random_scalar(&mut rng);
//! let y = x * G;
//! let pid = ProofId::element(0, 0);
//!
//! let proof = DiscreteLogProof::generate(&x, &y, &pid, &mut rng);
//! assert!(proof.verify(&y, &pid));
//! ```

pub mod dh_tuple;
pub mod dlog;
pub mod one_of_two;
pub mod range;
pub mod square;

use thiserror::Error;

pub use dh_tuple::{DhTuple, DhTupleProof};
pub use dlog::DiscreteLogProof;
pub use one_of_two::{OneOfTwoProof, OneOfTwoStatement};
pub use range::{
    RangeConsistency, RangeProof, RangeStatement, bit_length_for_bound, combine_bit_secrets,
};
pub use square::{SquareProof, SquareStatement, SquareWitness};
pub use zkagg_primitives::ProofId;

/// Refusals at proof-generation time. A refused proof is never produced, so a
/// caller cannot publish a proof that could not verify.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("value {value} is outside the range [0, {bound})")]
    RangeExceeded { value: u64, bound: u64 },
    #[error("range bound must be positive")]
    InvalidBound,
    #[error("not enough per-bit secrets: need {needed}, got {provided}")]
    InsufficientSecrets { needed: usize, provided: usize },
    #[error("one-out-of-two proofs only cover messages 0 and 1, got {0}")]
    NonBinaryMessage(u64),
}
