// Tue Jan 13 2026 - Alex

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadFault {
    #[error("Malformed module {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("Module {} requires missing dependency '{dependency}'", .path.display())]
    MissingDependency { path: PathBuf, dependency: String },
    #[error("Access denied: {}", .0.display())]
    AccessDenied(PathBuf),
    #[error("Unsupported format for {}: {format}", .path.display())]
    UnsupportedFormat { path: PathBuf, format: String },
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadFault {
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        LoadFault::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(path: &Path, format: impl Into<String>) -> Self {
        LoadFault::UnsupportedFormat {
            path: path.to_path_buf(),
            format: format.into(),
        }
    }

    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => LoadFault::AccessDenied(path.to_path_buf()),
            _ => LoadFault::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadFault::Malformed { path, .. }
            | LoadFault::MissingDependency { path, .. }
            | LoadFault::AccessDenied(path)
            | LoadFault::UnsupportedFormat { path, .. }
            | LoadFault::Io { path, .. } => path,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            LoadFault::Malformed { .. } => "malformed",
            LoadFault::MissingDependency { .. } => "missing-dependency",
            LoadFault::AccessDenied(_) => "access-denied",
            LoadFault::UnsupportedFormat { .. } => "unsupported-format",
            LoadFault::Io { .. } => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_access_denied() {
        let path = Path::new("/opt/plugins/locked.so");
        let fault = LoadFault::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));

        assert!(matches!(fault, LoadFault::AccessDenied(_)));
        assert_eq!(fault.path(), path);
        assert_eq!(fault.kind_name(), "access-denied");
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let path = Path::new("/opt/plugins/gone.so");
        let fault = LoadFault::from_io(path, io::Error::from(io::ErrorKind::NotFound));

        match fault {
            LoadFault::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected fault: {other}"),
        }
    }
}
