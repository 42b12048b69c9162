// Wed Jan 15 2026 - Alex

use crate::discovery::{Candidate, CandidateStatus};
use crate::fault::FaultRecord;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub struct DiscoveryReport {
    run_id: u64,
    roots: Vec<PathBuf>,
    candidates: Vec<Candidate>,
    accepted: Vec<PathBuf>,
    faults: Vec<FaultRecord>,
    elapsed: Duration,
}

impl DiscoveryReport {
    pub(crate) fn new(run_id: u64, roots: Vec<PathBuf>, candidates: Vec<Candidate>, elapsed: Duration) -> Self {
        let accepted = candidates
            .iter()
            .filter(|c| c.is_accepted())
            .map(|c| c.path().to_path_buf())
            .collect();

        Self {
            run_id,
            roots,
            candidates,
            accepted,
            faults: Vec::new(),
            elapsed,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(0, Vec::new(), Vec::new(), Duration::ZERO)
    }

    pub(crate) fn attach_faults(&mut self, faults: Vec<FaultRecord>) {
        self.faults = faults;
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Accepted candidate paths in discovery order
    pub fn accepted(&self) -> &[PathBuf] {
        &self.accepted
    }

    pub fn into_accepted(self) -> Vec<PathBuf> {
        self.accepted
    }

    pub fn faults(&self) -> &[FaultRecord] {
        &self.faults
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.accepted.iter().any(|p| p == path)
    }

    pub fn contains_file_name(&self, name: &str) -> bool {
        self.accepted
            .iter()
            .any(|p| p.file_name().map(|n| n == name).unwrap_or(false))
    }

    pub fn status_of(&self, path: &Path) -> Option<CandidateStatus> {
        self.candidates
            .iter()
            .find(|c| c.path() == path)
            .map(Candidate::status)
    }

    pub fn count(&self, status: CandidateStatus) -> usize {
        self.candidates.iter().filter(|c| c.status() == status).count()
    }

    pub fn status_counts(&self) -> HashMap<CandidateStatus, usize> {
        let mut counts = HashMap::new();
        for candidate in &self.candidates {
            *counts.entry(candidate.status()).or_insert(0) += 1;
        }
        counts
    }

    pub fn accepted_listing(&self) -> String {
        let mut text = String::from("Found modules:");
        for path in &self.accepted {
            let _ = write!(text, "\n\t* {}", path.display());
        }
        text
    }

    pub fn to_json(&self) -> serde_json::Value {
        let counts: serde_json::Map<String, serde_json::Value> = [
            CandidateStatus::ExcludedByPath,
            CandidateStatus::Loaded,
            CandidateStatus::RejectedByReflection,
            CandidateStatus::Faulted,
        ]
        .iter()
        .map(|s| (s.as_str().to_string(), serde_json::Value::from(self.count(*s))))
        .collect();

        serde_json::json!({
            "run_id": self.run_id,
            "roots": self.roots.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "accepted": self.accepted.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "candidates": self.candidates.iter().map(|c| serde_json::json!({
                "path": c.path().display().to_string(),
                "status": c.status().as_str(),
                "complaints": c.complaints(),
            })).collect::<Vec<_>>(),
            "faults": self.faults.iter().map(FaultRecord::to_json).collect::<Vec<_>>(),
            "counts": counts,
            "elapsed_ms": self.elapsed.as_millis() as u64,
        })
    }
}
