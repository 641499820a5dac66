//! # zkagg-ledger — phase-gated bulletin board
//!
//! Participants publish their commitments and proofs here and read each
//! other's back. The board does not verify anything; it only enforces
//!
//! - the phase order `Uninitialized → Commit → Prove → Results`,
//! - that each artifact is written in its own phase,
//! - that an artifact, once written, is never replaced,
//! - that prove-phase artifacts come only from participants that committed.
//!
//! The board is shared as `Arc<Ledger>` and all methods take `&self`.
//! Writers hold the phase read lock while they insert, so a phase change
//! never lands between the phase check and the write.

pub mod records;
#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use serde::Serialize;
use thiserror::Error;
use zkagg_primitives::{ParticipantId, Point};
use zkagg_proofs::{DiscreteLogProof, RangeProof};

pub use records::{Artifact, CommitRecord, DhTupleCommit, LedgerEvent, Phase, ProveRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("operation requires phase {required}, ledger is in {current}")]
    PhaseViolation { required: Phase, current: Phase },
    #[error("cannot move from phase {from} to {to}")]
    IllegalTransition { from: Phase, to: Phase },
    #[error("participant {uid} already published its {artifact}")]
    AlreadyPublished { uid: ParticipantId, artifact: Artifact },
    #[error("participant {uid} has no commitment, its {artifact} is not accepted")]
    NotCommitted { uid: ParticipantId, artifact: Artifact },
}

#[derive(Debug)]
pub struct Ledger {
    phase: RwLock<Phase>,
    commits: Mutex<BTreeMap<ParticipantId, CommitRecord>>,
    proves: Mutex<BTreeMap<ParticipantId, ProveRecord>>,
    events: Mutex<Vec<LedgerEvent>>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    phase: Phase,
    commits: &'a BTreeMap<ParticipantId, CommitRecord>,
    proves: &'a BTreeMap<ParticipantId, ProveRecord>,
    events: &'a [LedgerEvent],
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            phase: RwLock::new(Phase::Uninitialized),
            commits: Mutex::new(BTreeMap::new()),
            proves: Mutex::new(BTreeMap::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.read()
    }

    /// Advance to `target`, which must be the successor of the current phase.
    /// Entering `Commit` or `Prove` starts that phase with empty storage.
    pub fn set_phase(&self, target: Phase) -> Result<(), LedgerError> {
        let mut phase = self.phase.write();
        let from = *phase;
        if from.next() != Some(target) {
            log::warn!("ledger: rejected transition {from} -> {target}");
            return Err(LedgerError::IllegalTransition { from, to: target });
        }

        match target {
            Phase::Commit => self.commits.lock().clear(),
            Phase::Prove => self.proves.lock().clear(),
            Phase::Uninitialized | Phase::Results => {}
        }
        *phase = target;
        self.events.lock().push(LedgerEvent::PhaseChanged { from, to: target });
        log::info!("ledger: phase {from} -> {target}");
        Ok(())
    }

    /// Publish the per-element public keys and their discrete-log proofs.
    pub fn commit_discrete_log(
        &self,
        uid: ParticipantId,
        public_keys: Vec<Point>,
        proofs: Vec<DiscreteLogProof>,
    ) -> Result<(), LedgerError> {
        let _phase = self.require(Phase::Commit, uid, Artifact::DiscreteLog)?;
        let elements = public_keys.len();
        match self.commits.lock().entry(uid) {
            Entry::Occupied(_) => return Err(already_published(uid, Artifact::DiscreteLog)),
            Entry::Vacant(slot) => {
                slot.insert(CommitRecord { public_keys, proofs });
            }
        }
        self.record(LedgerEvent::DiscreteLogCommitted { uid, elements });
        log::info!("ledger: participant {uid} committed {elements} public keys");
        Ok(())
    }

    pub fn commit_dh_tuple(
        &self,
        uid: ParticipantId,
        commit: DhTupleCommit,
    ) -> Result<(), LedgerError> {
        let _phase = self.require(Phase::Prove, uid, Artifact::DhTuple)?;
        let elements = commit.proofs.len();
        self.write_prove_slot(uid, Artifact::DhTuple, |record| &mut record.dh_tuple, commit)?;
        self.record(LedgerEvent::DhTupleCommitted { uid, elements });
        log::info!("ledger: participant {uid} published {elements} DH-tuple proofs");
        Ok(())
    }

    pub fn commit_range(
        &self,
        uid: ParticipantId,
        proofs: Vec<RangeProof>,
    ) -> Result<(), LedgerError> {
        let _phase = self.require(Phase::Prove, uid, Artifact::Range)?;
        let elements = proofs.len();
        self.write_prove_slot(uid, Artifact::Range, |record| &mut record.range, proofs)?;
        self.record(LedgerEvent::RangeCommitted { uid, elements });
        log::info!("ledger: participant {uid} published {elements} range proofs");
        Ok(())
    }

    pub fn commit_sum_range(
        &self,
        uid: ParticipantId,
        proof: RangeProof,
    ) -> Result<(), LedgerError> {
        let _phase = self.require(Phase::Prove, uid, Artifact::SumRange)?;
        self.write_prove_slot(uid, Artifact::SumRange, |record| &mut record.sum_range, proof)?;
        self.record(LedgerEvent::SumRangeCommitted { uid });
        log::info!("ledger: participant {uid} published its sum range proof");
        Ok(())
    }

    pub fn commit_records(&self) -> BTreeMap<ParticipantId, CommitRecord> {
        self.commits.lock().clone()
    }

    pub fn commit_record(&self, uid: ParticipantId) -> Option<CommitRecord> {
        self.commits.lock().get(&uid).cloned()
    }

    pub fn prove_records(&self) -> BTreeMap<ParticipantId, ProveRecord> {
        self.proves.lock().clone()
    }

    pub fn prove_record(&self, uid: ParticipantId) -> Option<ProveRecord> {
        self.proves.lock().get(&uid).cloned()
    }

    /// Every accepted write so far, oldest first.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    /// Phase, records and event log as one JSON document.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        let phase = self.phase.read();
        let commits = self.commits.lock();
        let proves = self.proves.lock();
        let events = self.events.lock();
        serde_json::to_string(&Snapshot {
            phase: *phase,
            commits: &commits,
            proves: &proves,
            events: &events,
        })
    }

    fn require(
        &self,
        required: Phase,
        uid: ParticipantId,
        artifact: Artifact,
    ) -> Result<RwLockReadGuard<'_, Phase>, LedgerError> {
        let phase = self.phase.read();
        if *phase != required {
            log::warn!("ledger: {artifact} from participant {uid} rejected in phase {}", *phase);
            return Err(LedgerError::PhaseViolation { required, current: *phase });
        }
        Ok(phase)
    }

    fn write_prove_slot<T>(
        &self,
        uid: ParticipantId,
        artifact: Artifact,
        slot: impl FnOnce(&mut ProveRecord) -> &mut Option<T>,
        value: T,
    ) -> Result<(), LedgerError> {
        if !self.commits.lock().contains_key(&uid) {
            log::warn!("ledger: {artifact} from uncommitted participant {uid} rejected");
            return Err(LedgerError::NotCommitted { uid, artifact });
        }
        let mut proves = self.proves.lock();
        let field = slot(proves.entry(uid).or_default());
        if field.is_some() {
            return Err(already_published(uid, artifact));
        }
        *field = Some(value);
        Ok(())
    }

    fn record(&self, event: LedgerEvent) {
        self.events.lock().push(event);
    }
}

fn already_published(uid: ParticipantId, artifact: Artifact) -> LedgerError {
    log::warn!("ledger: participant {uid} tried to republish its {artifact}");
    LedgerError::AlreadyPublished { uid, artifact }
}
