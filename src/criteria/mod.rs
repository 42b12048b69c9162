// Tue Jan 13 2026 - Alex

pub mod error;
pub mod path;
pub mod reflection;

pub use error::CriterionError;
pub use path::{PathCriterion, PathVerdict};
pub use reflection::{ReflectionCriterion, ReflectionVerdict};

use std::panic::{self, AssertUnwindSafe};

pub(crate) fn guarded<T, F>(criterion: &str, f: F) -> Result<T, CriterionError>
where
    F: FnOnce() -> Result<T, CriterionError>,
{
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(CriterionError::from_panic(criterion, payload)))
}
