//! Public verification of everything on the board and the element-wise sum.
//!
//! Nothing here needs a secret, so any observer holding an `Arc<Ledger>` can
//! run it; [`crate::Participant::results`] is a thin wrapper.

use std::collections::BTreeMap;

use zkagg_ledger::{Artifact, CommitRecord, DhTupleCommit, Ledger, LedgerError, Phase, ProveRecord};
use zkagg_primitives::{
    Ciphertext, DiscreteLogTable, G, ParticipantId, Point, ProofId, RecoveryError, identity,
    points_eq,
};
use zkagg_proofs::{DhTuple, RangeStatement};

use crate::error::failure;
use crate::{ProofKind, ProtocolConfig, ProtocolError};

/// Element-wise sum over all participants, one recovery outcome per position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aggregate {
    participants: Vec<ParticipantId>,
    positions: Vec<Result<u64, RecoveryError>>,
}

impl Aggregate {
    /// Participants whose vectors went into the sum, ascending.
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn positions(&self) -> &[Result<u64, RecoveryError>] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All positions, or the first recovery error.
    pub fn values(&self) -> Result<Vec<u64>, RecoveryError> {
        self.positions.iter().copied().collect()
    }
}

/// `h_x = Σ_{v<uid} pk_{v,x} − Σ_{v>uid} pk_{v,x}` over the committed keys.
///
/// Each `sk_{u,x}·h_{u,x}` pairs `sk_u·sk_v·G` with its negation at `v`, so
/// `Σ_u sk_{u,x}·h_{u,x}` vanishes and the combined-key ciphertexts add up to
/// a plain `(Σ g)·G`.
pub fn combined_key(
    commits: &BTreeMap<ParticipantId, CommitRecord>,
    uid: ParticipantId,
    index: usize,
) -> Point {
    commits
        .iter()
        .filter_map(|(v, record)| record.public_keys.get(index).map(|pk| (*v, pk)))
        .fold(identity(), |acc, (v, pk)| match v.cmp(&uid) {
            core::cmp::Ordering::Less => acc + pk,
            core::cmp::Ordering::Greater => acc - pk,
            core::cmp::Ordering::Equal => acc,
        })
}

/// Every commit record carries `vector_len` keys with valid discrete-log proofs.
pub fn verify_commits(
    commits: &BTreeMap<ParticipantId, CommitRecord>,
    config: &ProtocolConfig,
) -> Result<(), ProtocolError> {
    for (&uid, record) in commits {
        if record.public_keys.len() != config.vector_len
            || record.proofs.len() != config.vector_len
        {
            return Err(failure(uid, None, ProofKind::DiscreteLog));
        }
        for (x, (pk, proof)) in record.public_keys.iter().zip(&record.proofs).enumerate() {
            if !proof.verify(pk, &ProofId::element(uid, x)) {
                return Err(failure(uid, Some(x), ProofKind::DiscreteLog));
            }
        }
    }
    Ok(())
}

fn verify_participant<'a>(
    commits: &BTreeMap<ParticipantId, CommitRecord>,
    uid: ParticipantId,
    commit: &CommitRecord,
    record: Option<&'a ProveRecord>,
    config: &ProtocolConfig,
) -> Result<&'a DhTupleCommit, ProtocolError> {
    let missing = |artifact| ProtocolError::MissingArtifact { participant: uid, artifact };
    let record = record.ok_or_else(|| missing(Artifact::DhTuple))?;
    let dh = record.dh_tuple.as_ref().ok_or_else(|| missing(Artifact::DhTuple))?;
    let ranges = record.range.as_ref().ok_or_else(|| missing(Artifact::Range))?;
    let sum_range = record.sum_range.as_ref().ok_or_else(|| missing(Artifact::SumRange))?;

    let n = config.vector_len;
    if dh.combined_keys.len() != n
        || dh.combined_ciphertexts.len() != n
        || dh.own_ciphertexts.len() != n
        || dh.proofs.len() != n
    {
        return Err(failure(uid, None, ProofKind::DhTuple));
    }
    if ranges.len() != n {
        return Err(failure(uid, None, ProofKind::Range));
    }

    for x in 0..n {
        let pid = ProofId::element(uid, x);
        let pk = commit.public_keys[x];
        let h_x = combined_key(commits, uid, x);
        if !points_eq(&dh.combined_keys[x], &h_x) {
            return Err(failure(uid, Some(x), ProofKind::CombinedKey));
        }

        let (e1, e2) = (dh.combined_ciphertexts[x], dh.own_ciphertexts[x]);
        if !(points_eq(&e1.c1, &pk) && points_eq(&e2.c1, &pk)) {
            return Err(failure(uid, Some(x), ProofKind::CiphertextKey));
        }

        let tuple = DhTuple { g: G, h: h_x - dh.own_key, u: pk, v: e1.c2 - e2.c2 };
        if !dh.proofs[x].verify(&tuple, &pid) {
            return Err(failure(uid, Some(x), ProofKind::DhTuple));
        }

        let stmt =
            RangeStatement { ciphertext: e2, public_key: dh.own_key, bound: config.element_bound };
        if !ranges[x].verify(&stmt, &pid) {
            return Err(failure(uid, Some(x), ProofKind::Range));
        }
    }

    let total: Ciphertext = dh.own_ciphertexts.iter().sum();
    let stmt =
        RangeStatement { ciphertext: total, public_key: dh.own_key, bound: config.sum_bound };
    if !sum_range.verify(&stmt, &ProofId::sum(uid)) {
        return Err(failure(uid, None, ProofKind::SumRange));
    }
    Ok(dh)
}

/// Verify every participant's commit and prove artifacts, then sum the
/// combined-key ciphertexts per position and recover each sum with `table`.
///
/// The participant set is the set of uids with a commit record.
pub fn verify_and_aggregate(
    ledger: &Ledger,
    config: &ProtocolConfig,
    table: &DiscreteLogTable,
) -> Result<Aggregate, ProtocolError> {
    let current = ledger.phase();
    if current != Phase::Results {
        return Err(LedgerError::PhaseViolation { required: Phase::Results, current }.into());
    }

    let commits = ledger.commit_records();
    let proves = ledger.prove_records();
    verify_commits(&commits, config)?;

    let mut sums = vec![identity(); config.vector_len];
    for (&uid, commit) in &commits {
        let dh = verify_participant(&commits, uid, commit, proves.get(&uid), config)?;
        for (acc, e1) in sums.iter_mut().zip(&dh.combined_ciphertexts) {
            *acc += e1.c2;
        }
    }

    let positions: Vec<_> = sums.iter().map(|p| table.recover(p)).collect();
    let failed = positions.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        log::warn!(
            "aggregate: {failed} of {} positions exceed the recovery bound {}",
            positions.len(),
            table.bound()
        );
    }
    log::info!("aggregate: verified {} participants", commits.len());

    Ok(Aggregate { participants: commits.keys().copied().collect(), positions })
}
