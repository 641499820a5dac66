use core::fmt;

use thiserror::Error;
use zkagg_ledger::{Artifact, LedgerError};
use zkagg_primitives::ParticipantId;
use zkagg_proofs::ProofError;

use crate::ParticipantState;

/// Which check rejected another participant's artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofKind {
    DiscreteLog,
    /// Published combined key differs from the one recomputed from the
    /// commit records.
    CombinedKey,
    /// A ciphertext's first component is not the committed element key.
    CiphertextKey,
    DhTuple,
    Range,
    SumRange,
}

impl fmt::Display for ProofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProofKind::DiscreteLog => "discrete-log proof",
            ProofKind::CombinedKey => "combined key",
            ProofKind::CiphertextKey => "ciphertext key",
            ProofKind::DhTuple => "DH-tuple proof",
            ProofKind::Range => "range proof",
            ProofKind::SumRange => "sum range proof",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Proof(#[from] ProofError),
    #[error("expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("cannot {operation} in state {state:?}")]
    InvalidState { operation: &'static str, state: ParticipantState },
    #[error("{kind} of participant {participant} failed verification (element {element:?})")]
    ProofVerificationFailure {
        participant: ParticipantId,
        element: Option<usize>,
        kind: ProofKind,
    },
    #[error("participant {participant} never published its {artifact}")]
    MissingArtifact { participant: ParticipantId, artifact: Artifact },
}

pub(crate) fn failure(
    participant: ParticipantId,
    element: Option<usize>,
    kind: ProofKind,
) -> ProtocolError {
    match element {
        Some(x) => log::warn!("participant {participant}: {kind} rejected at element {x}"),
        None => log::warn!("participant {participant}: {kind} rejected"),
    }
    ProtocolError::ProofVerificationFailure { participant, element, kind }
}
