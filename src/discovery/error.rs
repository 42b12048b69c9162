// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("No root directories configured")]
    NoRoots,
    #[error("max_threads must be greater than 0")]
    InvalidThreadCount,
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
