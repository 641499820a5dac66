use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use zkagg_ledger::{DhTupleCommit, Ledger, LedgerError, Phase};
use zkagg_primitives::{
    Ciphertext, DiscreteLogTable, G, Keypair, ParticipantId, ProofId, Scalar, encrypt_value,
};
use zkagg_proofs::{DhTuple, DhTupleProof, DiscreteLogProof, RangeProof, RangeStatement};

use crate::aggregate::{combined_key, verify_and_aggregate, verify_commits};
use crate::{Aggregate, ConfigError, ProtocolConfig, ProtocolError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticipantState {
    Idle,
    Committed,
    Proved,
    Resulted,
}

/// One data holder. Owns its vector, per-element keys and own keypair; only
/// the public halves ever reach the ledger.
pub struct Participant {
    uid: ParticipantId,
    config: ProtocolConfig,
    ledger: Arc<Ledger>,
    rng: ChaCha20Rng,
    own: Keypair,
    state: ParticipantState,
    vector: Vec<u64>,
    element_keys: Vec<Keypair>,
}

impl core::fmt::Debug for Participant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Participant")
            .field("uid", &self.uid)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Participant {
    /// Seeds the participant's own ChaCha20 stream from the thread RNG.
    pub fn new(
        ledger: Arc<Ledger>,
        uid: ParticipantId,
        config: ProtocolConfig,
    ) -> Result<Self, ConfigError> {
        let rng = ChaCha20Rng::from_rng(&mut rand::rng());
        Self::with_rng(ledger, uid, config, rng)
    }

    /// Deterministic variant for tests and reproducible runs.
    pub fn with_rng_seed(
        ledger: Arc<Ledger>,
        uid: ParticipantId,
        config: ProtocolConfig,
        seed: [u8; 32],
    ) -> Result<Self, ConfigError> {
        Self::with_rng(ledger, uid, config, ChaCha20Rng::from_seed(seed))
    }

    fn with_rng(
        ledger: Arc<Ledger>,
        uid: ParticipantId,
        config: ProtocolConfig,
        mut rng: ChaCha20Rng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let own = Keypair::generate(&mut rng);
        Ok(Self {
            uid,
            config,
            ledger,
            rng,
            own,
            state: ParticipantState::Idle,
            vector: Vec::new(),
            element_keys: Vec::new(),
        })
    }

    pub fn uid(&self) -> ParticipantId {
        self.uid
    }

    pub fn state(&self) -> ParticipantState {
        self.state
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Draw a key per element and publish the public keys with their
    /// discrete-log proofs.
    pub fn commit(&mut self, vector: &[u64]) -> Result<(), ProtocolError> {
        self.expect_state(ParticipantState::Idle, "commit")?;
        if vector.len() != self.config.vector_len {
            return Err(ProtocolError::LengthMismatch {
                expected: self.config.vector_len,
                actual: vector.len(),
            });
        }
        self.expect_phase(Phase::Commit)?;

        let keys: Vec<Keypair> =
            (0..vector.len()).map(|_| Keypair::generate(&mut self.rng)).collect();
        let proofs: Vec<DiscreteLogProof> = keys
            .iter()
            .enumerate()
            .map(|(x, kp)| {
                let pid = ProofId::element(self.uid, x);
                DiscreteLogProof::generate(&kp.secret, &kp.public, &pid, &mut self.rng)
            })
            .collect();

        self.ledger.commit_discrete_log(
            self.uid,
            keys.iter().map(|kp| kp.public).collect(),
            proofs,
        )?;

        self.vector = vector.to_vec();
        self.element_keys = keys;
        self.state = ParticipantState::Committed;
        log::info!("participant {}: committed {} elements", self.uid, vector.len());
        Ok(())
    }

    /// Check everyone's commitments, then publish both encryptions of every
    /// element with their DH-tuple and range proofs, and the sum range proof.
    pub fn prove(&mut self) -> Result<(), ProtocolError> {
        self.expect_state(ParticipantState::Committed, "prove")?;
        self.expect_phase(Phase::Prove)?;

        let commits = self.ledger.commit_records();
        verify_commits(&commits, &self.config)?;
        log::debug!("participant {}: {} commitments verified", self.uid, commits.len());

        let h = self.own.public;
        let n = self.config.vector_len;
        let mut combined_keys = Vec::with_capacity(n);
        let mut combined_ciphertexts = Vec::with_capacity(n);
        let mut own_ciphertexts = Vec::with_capacity(n);
        let mut tuple_proofs = Vec::with_capacity(n);
        let mut range_proofs = Vec::with_capacity(n);

        for (x, (&value, key)) in self.vector.iter().zip(&self.element_keys).enumerate() {
            let pid = ProofId::element(self.uid, x);
            let h_x = combined_key(&commits, self.uid, x);
            let e1 = encrypt_value(&h_x, &key.secret, value);
            let e2 = encrypt_value(&h, &key.secret, value);

            let tuple = DhTuple { g: G, h: h_x - h, u: key.public, v: e1.c2 - e2.c2 };
            tuple_proofs.push(DhTupleProof::generate(&tuple, &key.secret, &pid, &mut self.rng));

            let stmt =
                RangeStatement { ciphertext: e2, public_key: h, bound: self.config.element_bound };
            range_proofs.push(RangeProof::generate(
                &stmt,
                value,
                &key.secret,
                &pid,
                &mut self.rng,
            )?);

            combined_keys.push(h_x);
            combined_ciphertexts.push(e1);
            own_ciphertexts.push(e2);
        }

        let total: Ciphertext = own_ciphertexts.iter().sum();
        let total_secret: Scalar = self.element_keys.iter().map(|kp| kp.secret).sum();
        let total_value = self.vector.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
        let stmt =
            RangeStatement { ciphertext: total, public_key: h, bound: self.config.sum_bound };
        let sum_pid = ProofId::sum(self.uid);
        let sum_range =
            RangeProof::generate(&stmt, total_value, &total_secret, &sum_pid, &mut self.rng)?;

        self.ledger.commit_dh_tuple(
            self.uid,
            DhTupleCommit {
                own_key: h,
                combined_keys,
                combined_ciphertexts,
                own_ciphertexts,
                proofs: tuple_proofs,
            },
        )?;
        self.ledger.commit_range(self.uid, range_proofs)?;
        self.ledger.commit_sum_range(self.uid, sum_range)?;

        self.state = ParticipantState::Proved;
        log::info!("participant {}: published proofs for {n} elements", self.uid);
        Ok(())
    }

    /// Verify the whole board and recover the element-wise sum.
    pub fn results(&mut self, table: &DiscreteLogTable) -> Result<Aggregate, ProtocolError> {
        if !matches!(self.state, ParticipantState::Proved | ParticipantState::Resulted) {
            return Err(ProtocolError::InvalidState {
                operation: "compute results",
                state: self.state,
            });
        }
        let aggregate = verify_and_aggregate(&self.ledger, &self.config, table)?;
        self.state = ParticipantState::Resulted;
        log::info!(
            "participant {}: aggregate over {} participants",
            self.uid,
            aggregate.participants().len()
        );
        Ok(aggregate)
    }

    fn expect_state(
        &self,
        required: ParticipantState,
        operation: &'static str,
    ) -> Result<(), ProtocolError> {
        if self.state != required {
            log::warn!("participant {}: cannot {operation} in state {:?}", self.uid, self.state);
            return Err(ProtocolError::InvalidState { operation, state: self.state });
        }
        Ok(())
    }

    fn expect_phase(&self, required: Phase) -> Result<(), ProtocolError> {
        let current = self.ledger.phase();
        if current != required {
            return Err(LedgerError::PhaseViolation { required, current }.into());
        }
        Ok(())
    }
}
