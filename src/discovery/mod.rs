// Tue Jan 13 2026 - Alex

pub mod candidate;
pub mod engine;
pub mod error;
pub mod report;
pub mod walker;

pub use candidate::{Candidate, CandidateStatus};
pub use engine::DiscoveryEngine;
pub use error::DiscoveryError;
pub use report::DiscoveryReport;
pub use walker::CandidateWalker;
