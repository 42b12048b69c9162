// Tue Jan 13 2026 - Alex

pub mod error;
pub mod policy;
pub mod record;

pub use error::AggregatedDiscoveryFailure;
pub use policy::{FaultMode, FaultPolicy};
pub use record::{FaultError, FaultRecord, FaultStage};
