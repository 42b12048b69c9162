// Tue Jan 13 2026 - Alex

use crate::fault::{FaultError, FaultRecord};
use thiserror::Error;

/// Strict-mode outcome: every fault of the run, in discovery order.
#[derive(Error, Debug)]
#[error("module discovery recorded {} fault(s)", .faults.len())]
pub struct AggregatedDiscoveryFailure {
    faults: Vec<FaultRecord>,
}

impl AggregatedDiscoveryFailure {
    pub(crate) fn new(faults: Vec<FaultRecord>) -> Self {
        Self { faults }
    }

    pub fn faults(&self) -> &[FaultRecord] {
        &self.faults
    }

    pub fn inner_errors(&self) -> impl Iterator<Item = &FaultError> {
        self.faults.iter().map(FaultRecord::error)
    }

    pub fn len(&self) -> usize {
        self.faults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn into_faults(self) -> Vec<FaultRecord> {
        self.faults
    }
}
