//! # zkagg-participant — protocol engine
//!
//! Drives one participant through the three ledger phases:
//!
//! 1. **commit**: a fresh key per vector element, published with a
//!    discrete-log proof of knowledge;
//! 2. **prove**: every element encrypted twice with the same randomness,
//!    once under the participant's combined key and once under its own key,
//!    with a DH-tuple proof linking the two, a range proof per element and a
//!    range proof on the element sum;
//! 3. **results**: verify everything on the board and sum the combined-key
//!    ciphertexts. The combined keys cancel across participants, leaving
//!    `(Σ g)·G` per position, which a [`DiscreteLogTable`] turns back into
//!    an integer.
//!
//! ```rust
//! use std::sync::Arc;
//! use zkagg_ledger::{Ledger, Phase};
//! use zkagg_participant::{Participant, ProtocolConfig};
//! use zkagg_primitives::DiscreteLogTable;
//!
//! let ledger = Arc::new(Ledger::new());
//! let config = ProtocolConfig::new(2, 4, 8);
//! let mut alice = Participant::new(ledger.clone(), 1, config.clone()).unwrap();
//! let mut bob = Participant::new(ledger.clone(), 2, config.clone()).unwrap();
//!
//! ledger.set_phase(Phase::Commit).unwrap();
//! alice.commit(&[1, 3]).unwrap();
//! bob.commit(&[2, 0]).unwrap();
//!
//! ledger.set_phase(Phase::Prove).unwrap();
//! alice.prove().unwrap();
//! bob.prove().unwrap();
//!
//! ledger.set_phase(Phase::Results).unwrap();
//! let table = DiscreteLogTable::new(config.recovery_bound_for(2));
//! assert_eq!(alice.results(&table).unwrap().values().unwrap(), vec![3, 3]);
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod participant;

pub use aggregate::{Aggregate, combined_key, verify_and_aggregate, verify_commits};
pub use config::{ConfigError, ProtocolConfig};
pub use error::{ProofKind, ProtocolError};
pub use participant::{Participant, ParticipantState};
pub use zkagg_primitives::DiscreteLogTable;
