use crate::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use zkagg_primitives::{Ciphertext, G, Keypair, ProofId, encrypt_value, random_scalar};
use zkagg_proofs::{DhTuple, DhTupleProof, RangeStatement};

fn rng(seed: u8) -> ChaCha20Rng {
    let mut s = [0u8; 32];
    s[0] = seed;
    ChaCha20Rng::from_seed(s)
}

fn last_event(ledger: &Ledger) -> LedgerEvent {
    ledger.events().pop().expect("event")
}

fn commit_artifacts(uid: ParticipantId, n: usize) -> (Vec<Point>, Vec<DiscreteLogProof>) {
    let mut rng = rng(uid as u8);
    (0..n)
        .map(|x| {
            let kp = Keypair::generate(&mut rng);
            let pid = ProofId::element(uid, x);
            let proof = DiscreteLogProof::generate(&kp.secret, &kp.public, &pid, &mut rng);
            (kp.public, proof)
        })
        .unzip()
}

fn dh_commit(uid: ParticipantId) -> DhTupleCommit {
    let mut rng = rng(100 + uid as u8);
    let w = random_scalar(&mut rng);
    let h = random_scalar(&mut rng) * G;
    let tuple = DhTuple { g: G, h, u: w * G, v: w * h };
    DhTupleCommit {
        own_key: h,
        combined_keys: vec![h],
        combined_ciphertexts: vec![encrypt_value(&h, &w, 1)],
        own_ciphertexts: vec![encrypt_value(&h, &w, 1)],
        proofs: vec![DhTupleProof::generate(&tuple, &w, &ProofId::element(uid, 0), &mut rng)],
    }
}

fn range_proof(uid: ParticipantId) -> RangeProof {
    let mut rng = rng(200 + uid as u8);
    let kp = Keypair::generate(&mut rng);
    let r = random_scalar(&mut rng);
    let stmt = RangeStatement {
        ciphertext: encrypt_value(&kp.public, &r, 1),
        public_key: kp.public,
        bound: 2,
    };
    RangeProof::generate(&stmt, 1, &r, &ProofId::sum(uid), &mut rng).unwrap()
}

fn ledger_in(phase: Phase) -> Ledger {
    let ledger = Ledger::new();
    let mut current = Phase::Uninitialized;
    while current != phase {
        current = current.next().unwrap();
        ledger.set_phase(current).unwrap();
    }
    ledger
}

fn ledger_proving(uids: &[ParticipantId]) -> Ledger {
    let ledger = ledger_in(Phase::Commit);
    for &uid in uids {
        let (pks, proofs) = commit_artifacts(uid, 1);
        ledger.commit_discrete_log(uid, pks, proofs).unwrap();
    }
    ledger.set_phase(Phase::Prove).unwrap();
    ledger
}

#[test]
fn starts_uninitialized_and_walks_forward() {
    let ledger = Ledger::new();
    assert_eq!(ledger.phase(), Phase::Uninitialized);
    assert!(ledger.events().is_empty());

    for (from, to) in [
        (Phase::Uninitialized, Phase::Commit),
        (Phase::Commit, Phase::Prove),
        (Phase::Prove, Phase::Results),
    ] {
        ledger.set_phase(to).unwrap();
        assert_eq!(ledger.phase(), to);
        assert_eq!(last_event(&ledger), LedgerEvent::PhaseChanged { from, to });
    }
}

#[test]
fn illegal_transitions_leave_phase_untouched() {
    let ledger = Ledger::new();
    assert_eq!(
        ledger.set_phase(Phase::Prove),
        Err(LedgerError::IllegalTransition { from: Phase::Uninitialized, to: Phase::Prove })
    );
    assert_eq!(
        ledger.set_phase(Phase::Uninitialized),
        Err(LedgerError::IllegalTransition {
            from: Phase::Uninitialized,
            to: Phase::Uninitialized
        })
    );

    let ledger = ledger_in(Phase::Commit);
    assert!(ledger.set_phase(Phase::Commit).is_err());
    assert!(ledger.set_phase(Phase::Results).is_err());
    assert_eq!(ledger.phase(), Phase::Commit);

    let ledger = ledger_in(Phase::Results);
    let events = ledger.events().len();
    for target in [Phase::Uninitialized, Phase::Commit, Phase::Prove, Phase::Results] {
        assert!(ledger.set_phase(target).is_err());
    }
    assert_eq!(ledger.phase(), Phase::Results);
    assert_eq!(ledger.events().len(), events);
}

#[test]
fn commit_accepted_only_in_commit_phase() {
    let (pks, proofs) = commit_artifacts(1, 3);

    for phase in [Phase::Uninitialized, Phase::Prove, Phase::Results] {
        let ledger = ledger_in(phase);
        assert_eq!(
            ledger.commit_discrete_log(1, pks.clone(), proofs.clone()),
            Err(LedgerError::PhaseViolation { required: Phase::Commit, current: phase })
        );
        assert!(ledger.commit_records().is_empty());
    }

    let ledger = ledger_in(Phase::Commit);
    ledger.commit_discrete_log(1, pks.clone(), proofs.clone()).unwrap();
    assert_eq!(last_event(&ledger), LedgerEvent::DiscreteLogCommitted { uid: 1, elements: 3 });

    let record = ledger.commit_record(1).unwrap();
    assert_eq!(record.public_keys, pks);
    assert_eq!(record.proofs, proofs);
    assert!(ledger.commit_record(2).is_none());
}

#[test]
fn commit_cannot_be_replaced() {
    let ledger = ledger_in(Phase::Commit);
    let (pks, proofs) = commit_artifacts(4, 2);
    ledger.commit_discrete_log(4, pks.clone(), proofs.clone()).unwrap();

    let (other_pks, other_proofs) = commit_artifacts(5, 2);
    assert_eq!(
        ledger.commit_discrete_log(4, other_pks, other_proofs),
        Err(LedgerError::AlreadyPublished { uid: 4, artifact: Artifact::DiscreteLog })
    );
    assert_eq!(ledger.commit_record(4).unwrap().public_keys, pks);
    assert_eq!(ledger.events().len(), 2);
}

#[test]
fn prove_artifacts_fill_one_record() {
    let ledger = ledger_proving(&[7]);

    ledger.commit_dh_tuple(7, dh_commit(7)).unwrap();
    assert_eq!(last_event(&ledger), LedgerEvent::DhTupleCommitted { uid: 7, elements: 1 });
    assert!(!ledger.prove_record(7).unwrap().is_complete());

    ledger.commit_range(7, vec![range_proof(7), range_proof(8)]).unwrap();
    assert_eq!(last_event(&ledger), LedgerEvent::RangeCommitted { uid: 7, elements: 2 });

    ledger.commit_sum_range(7, range_proof(7)).unwrap();
    assert_eq!(last_event(&ledger), LedgerEvent::SumRangeCommitted { uid: 7 });

    let record = ledger.prove_record(7).unwrap();
    assert!(record.is_complete());
    assert_eq!(record.dh_tuple, Some(dh_commit(7)));
    assert_eq!(record.range.map(|r| r.len()), Some(2));
}

#[test]
fn prove_artifacts_cannot_be_replaced() {
    let ledger = ledger_proving(&[1]);
    ledger.commit_dh_tuple(1, dh_commit(1)).unwrap();
    ledger.commit_range(1, vec![range_proof(1)]).unwrap();
    ledger.commit_sum_range(1, range_proof(1)).unwrap();

    assert_eq!(
        ledger.commit_dh_tuple(1, dh_commit(2)),
        Err(LedgerError::AlreadyPublished { uid: 1, artifact: Artifact::DhTuple })
    );
    assert_eq!(
        ledger.commit_range(1, vec![]),
        Err(LedgerError::AlreadyPublished { uid: 1, artifact: Artifact::Range })
    );
    assert_eq!(
        ledger.commit_sum_range(1, range_proof(2)),
        Err(LedgerError::AlreadyPublished { uid: 1, artifact: Artifact::SumRange })
    );
    assert_eq!(ledger.prove_record(1).unwrap().dh_tuple, Some(dh_commit(1)));
}

#[test]
fn prove_artifacts_require_a_commitment() {
    let ledger = ledger_proving(&[1]);
    let events = ledger.events().len();

    assert_eq!(
        ledger.commit_dh_tuple(2, dh_commit(2)),
        Err(LedgerError::NotCommitted { uid: 2, artifact: Artifact::DhTuple })
    );
    assert_eq!(
        ledger.commit_range(2, vec![range_proof(2)]),
        Err(LedgerError::NotCommitted { uid: 2, artifact: Artifact::Range })
    );
    assert_eq!(
        ledger.commit_sum_range(2, range_proof(2)),
        Err(LedgerError::NotCommitted { uid: 2, artifact: Artifact::SumRange })
    );
    assert!(ledger.prove_record(2).is_none());
    assert_eq!(ledger.events().len(), events);

    ledger.commit_dh_tuple(1, dh_commit(1)).unwrap();
}

#[test]
fn prove_artifacts_rejected_outside_prove_phase() {
    for phase in [Phase::Uninitialized, Phase::Commit, Phase::Results] {
        let ledger = ledger_in(phase);
        let violation =
            Err(LedgerError::PhaseViolation { required: Phase::Prove, current: phase });
        assert_eq!(ledger.commit_dh_tuple(1, dh_commit(1)), violation);
        assert_eq!(ledger.commit_range(1, vec![range_proof(1)]), violation);
        assert_eq!(ledger.commit_sum_range(1, range_proof(1)), violation);
        assert!(ledger.prove_records().is_empty());
    }
}

#[test]
fn closed_commit_phase_is_immutable_but_readable() {
    let ledger = ledger_in(Phase::Commit);
    let (pks, proofs) = commit_artifacts(2, 1);
    ledger.commit_discrete_log(2, pks, proofs).unwrap();
    ledger.set_phase(Phase::Prove).unwrap();

    let (pks, proofs) = commit_artifacts(3, 1);
    assert!(ledger.commit_discrete_log(3, pks, proofs).is_err());
    assert_eq!(ledger.commit_records().keys().copied().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn concurrent_commits_land_in_uid_order() {
    let ledger = Arc::new(ledger_in(Phase::Commit));

    std::thread::scope(|s| {
        for uid in 0..8u32 {
            let ledger = Arc::clone(&ledger);
            s.spawn(move || {
                let (pks, proofs) = commit_artifacts(uid, 2);
                ledger.commit_discrete_log(uid, pks, proofs).unwrap();
            });
        }
    });

    let records = ledger.commit_records();
    assert_eq!(records.keys().copied().collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
    assert_eq!(ledger.events().len(), 1 + 8);
}

#[test]
fn snapshot_contains_phase_records_and_events() {
    let ledger = ledger_in(Phase::Commit);
    let (pks, proofs) = commit_artifacts(9, 1);
    ledger.commit_discrete_log(9, pks, proofs).unwrap();

    let json: serde_json::Value = serde_json::from_str(&ledger.snapshot_json().unwrap()).unwrap();
    assert_eq!(json["phase"], "Commit");
    assert!(json["commits"]["9"]["public_keys"].is_array());
    assert_eq!(json["events"].as_array().map(Vec::len), Some(2));
    assert!(json["proves"].as_object().unwrap().is_empty());
}

#[test]
fn ciphertexts_survive_json() {
    let mut rng = rng(50);
    let ct = encrypt_value(&Keypair::generate(&mut rng).public, &random_scalar(&mut rng), 3);
    let json = serde_json::to_string(&ct).unwrap();
    assert_eq!(serde_json::from_str::<Ciphertext>(&json).unwrap(), ct);
}
