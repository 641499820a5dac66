//! Protocol parameters every participant must agree on.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// ```json
/// { "vector_len": 6, "element_bound": 4, "sum_bound": 16 }
/// ```
///
/// Each element must lie in `[0, element_bound)` and each participant's
/// element sum in `[0, sum_bound)`. `recovery_bound` overrides the largest
/// aggregate the results step tries to recover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolConfig {
    pub vector_len: usize,
    pub element_bound: u64,
    pub sum_bound: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_bound: Option<u64>,
}

impl ProtocolConfig {
    pub fn new(vector_len: usize, element_bound: u64, sum_bound: u64) -> Self {
        Self { vector_len, element_bound, sum_bound, recovery_bound: None }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("loading protocol config from {}", path.display());
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vector_len == 0 {
            return Err(ConfigError::Invalid("vector_len must be positive"));
        }
        if self.element_bound == 0 {
            return Err(ConfigError::Invalid("element_bound must be positive"));
        }
        if self.sum_bound == 0 {
            return Err(ConfigError::Invalid("sum_bound must be positive"));
        }
        Ok(())
    }

    /// Largest per-position aggregate `participants` honest provers can reach.
    pub fn recovery_bound_for(&self, participants: usize) -> u64 {
        if let Some(bound) = self.recovery_bound {
            return bound;
        }
        let n = participants as u64;
        let by_element = n.saturating_mul(self.element_bound.saturating_sub(1));
        let by_sum = n.saturating_mul(self.sum_bound.saturating_sub(1));
        by_element.min(by_sum)
    }
}
