// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateStatus {
    Pending,
    ExcludedByPath,
    Loaded,
    RejectedByReflection,
    Faulted,
}

impl CandidateStatus {
    /// Pending -> {ExcludedByPath, Loaded, Faulted}; Loaded -> {RejectedByReflection, Faulted}.
    pub fn can_advance_to(self, next: CandidateStatus) -> bool {
        use CandidateStatus::*;

        matches!(
            (self, next),
            (Pending, ExcludedByPath) | (Pending, Loaded) | (Pending, Faulted)
                | (Loaded, RejectedByReflection) | (Loaded, Faulted)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Pending => "pending",
            CandidateStatus::ExcludedByPath => "excluded-by-path",
            CandidateStatus::Loaded => "loaded",
            CandidateStatus::RejectedByReflection => "rejected-by-reflection",
            CandidateStatus::Faulted => "faulted",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    ordinal: usize,
    path: PathBuf,
    status: CandidateStatus,
    complaints: Vec<String>,
}

impl Candidate {
    pub fn new(ordinal: usize, path: PathBuf) -> Self {
        Self {
            ordinal,
            path,
            status: CandidateStatus::Pending,
            complaints: Vec::new(),
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> CandidateStatus {
        self.status
    }

    pub fn complaints(&self) -> &[String] {
        &self.complaints
    }

    /// Accepted candidates stay at `Loaded` once every reflection criterion kept them.
    pub fn is_accepted(&self) -> bool {
        self.status == CandidateStatus::Loaded
    }

    pub(crate) fn advance(&mut self, next: CandidateStatus) {
        debug_assert!(
            self.status.can_advance_to(next),
            "illegal candidate transition {} -> {} for {}",
            self.status,
            next,
            self.path.display()
        );
        if self.status.can_advance_to(next) {
            self.status = next;
        } else {
            log::error!(
                "Ignoring illegal transition {} -> {} for {}",
                self.status,
                next,
                self.path.display()
            );
        }
    }

    pub(crate) fn exclude(&mut self, status: CandidateStatus, complaints: Vec<String>) {
        self.advance(status);
        self.complaints.extend(complaints);
    }
}
