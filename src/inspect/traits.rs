// Wed Jan 15 2026 - Alex

use crate::inspect::{InspectedModule, LoadFault};
use std::path::Path;

/// Opens a candidate and enumerates its exported type surface.
///
/// Implementations must never run code from the candidate: no loader
/// initializers, no constructors, nothing beyond reading bytes.
pub trait ModuleInspector: Send + Sync {
    fn name(&self) -> &str;
    fn inspect(&self, path: &Path) -> Result<InspectedModule, LoadFault>;
}
