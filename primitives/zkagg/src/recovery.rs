//! Bounded discrete-log recovery (baby-step/giant-step).
//!
//! Aggregated plaintexts come back as points `x·G`. Recovering `x` is only
//! tractable because `x` is bounded; the caller picks that bound when building
//! the table and a value above it is reported, not searched for.

use std::collections::HashMap;

use thiserror::Error;

use crate::{G, Point, identity, point_to_bytes};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryError {
    /// The point does not encode an integer in `[0, bound]`. Rebuild the table
    /// with a larger bound before retrying.
    #[error("discrete log not found within bound {bound}")]
    OutOfBound { bound: u64 },
}

/// Baby-step table `j·G → j` for `j ∈ [0, m)`, `m = ⌈√(bound + 1)⌉`.
///
/// Memory and lookup time are both `O(√bound)`.
#[derive(Clone, Debug)]
pub struct DiscreteLogTable {
    bound: u64,
    m: u64,
    giant_step: Point,
    baby_steps: HashMap<[u8; 32], u64>,
}

impl DiscreteLogTable {
    pub fn new(bound: u64) -> Self {
        let m = ceil_sqrt(bound.saturating_add(1));
        let mut baby_steps = HashMap::with_capacity(m as usize);
        let mut acc = identity();
        for j in 0..m {
            baby_steps.insert(point_to_bytes(&acc), j);
            acc += G;
        }
        log::debug!("discrete-log table built: bound={bound}, m={m}");
        // acc = m·G after the loop
        Self { bound, m, giant_step: acc, baby_steps }
    }

    /// Largest integer this table recovers.
    pub fn bound(&self) -> u64 {
        self.bound
    }

    pub fn baby_steps(&self) -> usize {
        self.baby_steps.len()
    }

    /// Find `x ∈ [0, bound]` with `beta = x·G`.
    pub fn recover(&self, beta: &Point) -> Result<u64, RecoveryError> {
        let mut gamma = *beta;
        for i in 0..self.m {
            if let Some(&j) = self.baby_steps.get(&point_to_bytes(&gamma)) {
                let x = i.checked_mul(self.m).and_then(|im| im.checked_add(j));
                return match x {
                    Some(x) if x <= self.bound => Ok(x),
                    _ => Err(RecoveryError::OutOfBound { bound: self.bound }),
                };
            }
            gamma -= self.giant_step;
        }
        log::debug!("discrete-log recovery exhausted {} giant steps", self.m);
        Err(RecoveryError::OutOfBound { bound: self.bound })
    }
}

pub(crate) fn ceil_sqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut r = (n as f64).sqrt() as u64;
    while r.saturating_mul(r) < n {
        r += 1;
    }
    while r > 1 && (r - 1).saturating_mul(r - 1) >= n {
        r -= 1;
    }
    r
}
