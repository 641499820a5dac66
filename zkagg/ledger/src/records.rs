//! Public artifacts as they sit on the board.

use core::fmt;

use serde::{Deserialize, Serialize};
use zkagg_primitives::{Ciphertext, ParticipantId, Point};
use zkagg_proofs::{DhTupleProof, DiscreteLogProof, RangeProof};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Uninitialized,
    Commit,
    Prove,
    Results,
}

impl Phase {
    /// The only phase `self` may advance to.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Uninitialized => Some(Phase::Commit),
            Phase::Commit => Some(Phase::Prove),
            Phase::Prove => Some(Phase::Results),
            Phase::Results => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Commit => "commit",
            Phase::Prove => "prove",
            Phase::Results => "results",
        };
        f.write_str(s)
    }
}

/// Kinds of artifact a participant publishes, one slot each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Artifact {
    DiscreteLog,
    DhTuple,
    Range,
    SumRange,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Artifact::DiscreteLog => "discrete-log commitment",
            Artifact::DhTuple => "DH-tuple commitment",
            Artifact::Range => "element range proofs",
            Artifact::SumRange => "sum range proof",
        };
        f.write_str(s)
    }
}

/// Commit phase: one public key per element and its proof of knowledge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub public_keys: Vec<Point>,
    pub proofs: Vec<DiscreteLogProof>,
}

/// Prove phase encryptions and the proofs binding the two of them.
///
/// `combined_ciphertexts[x]` encrypts element `x` under `combined_keys[x]`,
/// `own_ciphertexts[x]` the same value under `own_key`; `proofs[x]` shows
/// both used the same randomness.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhTupleCommit {
    pub own_key: Point,
    pub combined_keys: Vec<Point>,
    pub combined_ciphertexts: Vec<Ciphertext>,
    pub own_ciphertexts: Vec<Ciphertext>,
    pub proofs: Vec<DhTupleProof>,
}

/// Prove phase artifacts of one participant. The three are published by
/// separate calls, so any of them can still be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProveRecord {
    pub dh_tuple: Option<DhTupleCommit>,
    pub range: Option<Vec<RangeProof>>,
    pub sum_range: Option<RangeProof>,
}

impl ProveRecord {
    pub fn is_complete(&self) -> bool {
        self.dh_tuple.is_some() && self.range.is_some() && self.sum_range.is_some()
    }
}

/// Appended for every accepted write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    PhaseChanged { from: Phase, to: Phase },
    DiscreteLogCommitted { uid: ParticipantId, elements: usize },
    DhTupleCommitted { uid: ParticipantId, elements: usize },
    RangeCommitted { uid: ParticipantId, elements: usize },
    SumRangeCommitted { uid: ParticipantId },
}
