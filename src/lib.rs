// Tue Jan 15 2026 - Alex

pub mod config;
pub mod criteria;
pub mod discovery;
pub mod fault;
pub mod inspect;
pub mod utils;

pub use config::{LoaderConfig, TraversalMode};
pub use criteria::{PathCriterion, PathVerdict, ReflectionCriterion, ReflectionVerdict};
pub use discovery::{CandidateStatus, DiscoveryEngine, DiscoveryError, DiscoveryReport};
pub use fault::{AggregatedDiscoveryFailure, FaultRecord, FaultStage};
pub use inspect::{BinaryInspector, InspectedModule, ModuleInspector};
