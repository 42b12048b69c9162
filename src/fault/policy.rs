// Wed Jan 15 2026 - Alex

use crate::discovery::DiscoveryReport;
use crate::fault::{AggregatedDiscoveryFailure, FaultRecord};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultMode {
    #[default]
    Lenient,
    Strict,
}

impl FaultMode {
    pub fn from_rethrow(rethrow_on_fault: bool) -> Self {
        if rethrow_on_fault {
            FaultMode::Strict
        } else {
            FaultMode::Lenient
        }
    }
}

/// Run-wide fault bookkeeping. Workers append concurrently; the end-of-run
/// decision happens once in `conclude`.
pub struct FaultPolicy {
    mode: FaultMode,
    faults: Mutex<Vec<FaultRecord>>,
}

impl FaultPolicy {
    pub fn new(mode: FaultMode) -> Self {
        Self {
            mode,
            faults: Mutex::new(Vec::new()),
        }
    }

    pub fn mode(&self) -> FaultMode {
        self.mode
    }

    pub fn record(&self, fault: FaultRecord) {
        self.faults.lock().push(fault);
    }

    pub fn fault_count(&self) -> usize {
        self.faults.lock().len()
    }

    fn into_sorted(self) -> Vec<FaultRecord> {
        let mut faults = self.faults.into_inner();
        // stable: faults of one candidate keep their recording order
        faults.sort_by_key(FaultRecord::ordinal);
        faults
    }

    pub fn conclude(self, mut report: DiscoveryReport) -> Result<DiscoveryReport, AggregatedDiscoveryFailure> {
        let mode = self.mode;
        let faults = self.into_sorted();

        if mode == FaultMode::Strict && !faults.is_empty() {
            return Err(AggregatedDiscoveryFailure::new(faults));
        }

        report.attach_faults(faults);
        Ok(report)
    }
}
