//! Range proof by bit decomposition.
//!
//! The value is split into `L = ⌈log2 bound⌉` bits, each bit is encrypted on
//! its own and carries a [`OneOfTwoProof`]. The weighted sum `Σ 2^l·bit_l` of
//! the bit ciphertexts is then tied back to the statement ciphertext, either
//!
//! - [`RangeConsistency::Recomputed`]: the prover chose the statement's
//!   randomness as `Σ 2^l·s_l` (see [`combine_bit_secrets`]), so the verifier
//!   simply compares ciphertexts, or
//! - [`RangeConsistency::DhTuple`]: the bits use fresh randomness and a
//!   [`DhTupleProof`] shows `statement − Σ 2^l·bit_l` encrypts the identity.
//!
//! The bits alone only show `m < 2^L`. Unless `bound` is a power of two the
//! proof also carries a second decomposition of `m + (2^L − bound)`, checked
//! against the statement ciphertext shifted by `(2^L − bound)·G`. Both fitting
//! in `L` bits means `m < bound`. The shifted decomposition always uses fresh
//! randomness and a DH-tuple link.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zkagg_primitives::{Ciphertext, G, Point, ProofId, Scalar, encrypt_value, random_scalar};

use crate::{DhTuple, DhTupleProof, OneOfTwoProof, OneOfTwoStatement, ProofError};

/// `ciphertext` encrypts some `m ∈ [0, bound)` under `public_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStatement {
    pub ciphertext: Ciphertext,
    pub public_key: Point,
    pub bound: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeConsistency {
    Recomputed,
    DhTuple(DhTupleProof),
}

/// Bit `l` of `bits` has weight `2^l`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProof {
    pub bits: Vec<Ciphertext>,
    pub bit_proofs: Vec<OneOfTwoProof>,
    pub consistency: RangeConsistency,
    /// Decomposition of `m + 2^L − bound`; `None` exactly when `bound` is a
    /// power of two.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shifted: Option<Box<RangeProof>>,
}

/// `⌈log2 bound⌉`, i.e. the bit length of `bound − 1`. `None` for a zero bound.
pub fn bit_length_for_bound(bound: u64) -> Option<usize> {
    if bound == 0 {
        return None;
    }
    Some((u64::BITS - (bound - 1).leading_zeros()) as usize)
}

/// `Σ 2^l·s_l`: the ciphertext randomness that makes the bit ciphertexts add
/// up exactly to the statement ciphertext.
pub fn combine_bit_secrets(secrets: &[Scalar]) -> Scalar {
    let two = Scalar::from(2u64);
    secrets.iter().rev().fold(Scalar::ZERO, |acc, s| acc * two + s)
}

/// `2^L − bound`. `None` for a zero bound.
fn bound_shift(bound: u64) -> Option<u64> {
    let len = bit_length_for_bound(bound)?;
    u64::try_from((1u128 << len) - u128::from(bound)).ok()
}

fn shift_ciphertext(ciphertext: &Ciphertext, public_key: &Point, shift: u64) -> Ciphertext {
    *ciphertext + encrypt_value(public_key, &Scalar::ZERO, shift)
}

fn weighted_sum(bits: &[Ciphertext]) -> Ciphertext {
    let two = Scalar::from(2u64);
    bits.iter().rev().fold(Ciphertext::identity(), |acc, ct| acc * two + *ct)
}

fn checked_length(value: u64, bound: u64) -> Result<usize, ProofError> {
    let len = bit_length_for_bound(bound).ok_or(ProofError::InvalidBound)?;
    let value_bits = (u64::BITS - value.leading_zeros()) as usize;
    if value >= bound || value_bits > len {
        return Err(ProofError::RangeExceeded { value, bound });
    }
    Ok(len)
}

fn encrypt_bits<R: RngCore + CryptoRng + ?Sized>(
    value: u64,
    secrets: &[Scalar],
    public_key: &Point,
    pid: &ProofId,
    rng: &mut R,
) -> Result<(Vec<Ciphertext>, Vec<OneOfTwoProof>), ProofError> {
    let mut bits = Vec::with_capacity(secrets.len());
    let mut proofs = Vec::with_capacity(secrets.len());
    for (l, s) in secrets.iter().enumerate() {
        let bit = (value >> l) & 1;
        let ciphertext = encrypt_value(public_key, s, bit);
        let stmt = OneOfTwoStatement { ciphertext, public_key: *public_key };
        proofs.push(OneOfTwoProof::generate(&stmt, bit, s, pid, rng)?);
        bits.push(ciphertext);
    }
    Ok((bits, proofs))
}

impl RangeProof {
    /// Prove `stmt.ciphertext = Enc(randomness, value·G)` with
    /// `value < stmt.bound`, using fresh per-bit randomness and a DH-tuple
    /// consistency proof.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        stmt: &RangeStatement,
        value: u64,
        randomness: &Scalar,
        pid: &ProofId,
        rng: &mut R,
    ) -> Result<Self, ProofError> {
        let len = checked_length(value, stmt.bound)?;
        log::trace!("generating {len}-bit range proof for {pid}");

        let proof =
            Self::linked(&stmt.ciphertext, &stmt.public_key, len, value, randomness, pid, rng)?;
        proof.with_shifted(stmt, len, value, randomness, pid, rng)
    }

    /// Prove the same statement when `stmt.ciphertext` was encrypted with
    /// randomness `combine_bit_secrets(secrets)`. Only the first `L` secrets
    /// are used.
    pub fn generate_with_secrets<R: RngCore + CryptoRng + ?Sized>(
        stmt: &RangeStatement,
        value: u64,
        secrets: &[Scalar],
        pid: &ProofId,
        rng: &mut R,
    ) -> Result<Self, ProofError> {
        let len = checked_length(value, stmt.bound)?;
        if secrets.len() < len {
            return Err(ProofError::InsufficientSecrets { needed: len, provided: secrets.len() });
        }
        log::trace!("generating {len}-bit range proof with caller secrets for {pid}");

        let secrets = &secrets[..len];
        let (bits, bit_proofs) = encrypt_bits(value, secrets, &stmt.public_key, pid, rng)?;
        let proof =
            Self { bits, bit_proofs, consistency: RangeConsistency::Recomputed, shifted: None };
        proof.with_shifted(stmt, len, value, &combine_bit_secrets(secrets), pid, rng)
    }

    /// Fresh per-bit randomness, tied to `ciphertext` by a DH-tuple proof.
    fn linked<R: RngCore + CryptoRng + ?Sized>(
        ciphertext: &Ciphertext,
        public_key: &Point,
        len: usize,
        value: u64,
        randomness: &Scalar,
        pid: &ProofId,
        rng: &mut R,
    ) -> Result<Self, ProofError> {
        let secrets: Vec<Scalar> = (0..len).map(|_| random_scalar(rng)).collect();
        let (bits, bit_proofs) = encrypt_bits(value, &secrets, public_key, pid, rng)?;

        let delta = *ciphertext - weighted_sum(&bits);
        let tuple = DhTuple { g: G, h: *public_key, u: delta.c1, v: delta.c2 };
        let witness = randomness - combine_bit_secrets(&secrets);
        let link = DhTupleProof::generate(&tuple, &witness, pid, rng);

        Ok(Self { bits, bit_proofs, consistency: RangeConsistency::DhTuple(link), shifted: None })
    }

    fn with_shifted<R: RngCore + CryptoRng + ?Sized>(
        mut self,
        stmt: &RangeStatement,
        len: usize,
        value: u64,
        randomness: &Scalar,
        pid: &ProofId,
        rng: &mut R,
    ) -> Result<Self, ProofError> {
        let shift = bound_shift(stmt.bound).ok_or(ProofError::InvalidBound)?;
        if shift != 0 {
            // value < bound, so value + shift < 2^L
            let ciphertext = shift_ciphertext(&stmt.ciphertext, &stmt.public_key, shift);
            let upper = Self::linked(
                &ciphertext,
                &stmt.public_key,
                len,
                value + shift,
                randomness,
                pid,
                rng,
            )?;
            self.shifted = Some(Box::new(upper));
        }
        Ok(self)
    }

    pub fn verify(&self, stmt: &RangeStatement, pid: &ProofId) -> bool {
        let (Some(len), Some(shift)) = (bit_length_for_bound(stmt.bound), bound_shift(stmt.bound))
        else {
            log::debug!("range proof {pid}: zero bound");
            return false;
        };
        if !self.verify_bits(&stmt.ciphertext, &stmt.public_key, len, pid) {
            return false;
        }

        match (&self.shifted, shift) {
            (None, 0) => true,
            (Some(upper), shift) if shift != 0 && upper.shifted.is_none() => {
                let ciphertext = shift_ciphertext(&stmt.ciphertext, &stmt.public_key, shift);
                upper.verify_bits(&ciphertext, &stmt.public_key, len, pid)
            }
            _ => {
                log::debug!(
                    "range proof {pid}: shifted decomposition does not fit bound {}",
                    stmt.bound
                );
                false
            }
        }
    }

    /// `ciphertext` encrypts the weighted sum of at most `len` binary bits.
    fn verify_bits(
        &self,
        ciphertext: &Ciphertext,
        public_key: &Point,
        len: usize,
        pid: &ProofId,
    ) -> bool {
        if self.bits.len() > len {
            log::debug!("range proof {pid}: {} bits exceed bound of {len}", self.bits.len());
            return false;
        }
        if self.bit_proofs.len() != self.bits.len() {
            log::debug!(
                "range proof {pid}: {} bit proofs for {} bits",
                self.bit_proofs.len(),
                self.bits.len()
            );
            return false;
        }

        for (l, (bit, proof)) in self.bits.iter().zip(&self.bit_proofs).enumerate() {
            let bit_stmt = OneOfTwoStatement { ciphertext: *bit, public_key: *public_key };
            if !proof.verify(&bit_stmt, pid) {
                log::debug!("range proof {pid}: bit {l} is not 0 or 1");
                return false;
            }
        }

        let weighted = weighted_sum(&self.bits);
        match &self.consistency {
            RangeConsistency::Recomputed => {
                let ok = weighted.ct_equals(ciphertext);
                if !ok {
                    log::debug!("range proof {pid}: weighted bit sum differs from ciphertext");
                }
                ok
            }
            RangeConsistency::DhTuple(link) => {
                let delta = *ciphertext - weighted;
                let tuple = DhTuple { g: G, h: *public_key, u: delta.c1, v: delta.c2 };
                link.verify(&tuple, pid)
            }
        }
    }
}
