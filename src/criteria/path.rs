// Tue Jan 13 2026 - Alex

use crate::criteria::{guarded, CriterionError};
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

static RESOURCE_MODULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^.+\.resources(\.[a-z]{2,3}(-[a-z0-9]{2,8})*)?\.[a-z0-9]+$")
        .expect("resource module pattern is valid")
});

pub const SYSTEM_BINARIES: &[&str] = &[
    "ld-linux-x86-64.so.2",
    "ld-linux-aarch64.so.1",
    "libc.so.6",
    "libm.so.6",
    "libdl.so.2",
    "libpthread.so.0",
    "librt.so.1",
    "libgcc_s.so.1",
    "libstdc++.so.6",
    "libSystem.B.dylib",
    "libc++.1.dylib",
    "libobjc.A.dylib",
    "kernel32.dll",
    "kernelbase.dll",
    "ntdll.dll",
    "user32.dll",
    "advapi32.dll",
    "ws2_32.dll",
    "msvcrt.dll",
    "ucrtbase.dll",
    "vcruntime140.dll",
    "msvcp140.dll",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathVerdict {
    Include,
    Exclude { complaints: Vec<String> },
}

impl PathVerdict {
    pub fn exclude(complaint: impl Into<String>) -> Self {
        PathVerdict::Exclude {
            complaints: vec![complaint.into()],
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, PathVerdict::Exclude { .. })
    }
}

pub type PathPredicate = dyn Fn(&Path) -> Result<PathVerdict, CriterionError> + Send + Sync;

/// Exclusion test run against a candidate's path before it is ever opened.
#[derive(Clone)]
pub enum PathCriterion {
    ExcludeResourceModules,
    ExcludeSystemBinaries,
    /// Lower-cased file names
    ExcludeFileNames(AHashSet<String>),
    Custom {
        name: String,
        predicate: Arc<PathPredicate>,
    },
}

impl PathCriterion {
    pub fn exclude_resource_modules() -> Self {
        PathCriterion::ExcludeResourceModules
    }

    pub fn exclude_system_binaries() -> Self {
        PathCriterion::ExcludeSystemBinaries
    }

    pub fn exclude_file_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        PathCriterion::ExcludeFileNames(
            names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        )
    }

    pub fn custom<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&Path) -> Result<PathVerdict, CriterionError> + Send + Sync + 'static,
    {
        PathCriterion::Custom {
            name: name.to_string(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PathCriterion::ExcludeResourceModules => "ExcludeResourceModules",
            PathCriterion::ExcludeSystemBinaries => "ExcludeSystemBinaries",
            PathCriterion::ExcludeFileNames(_) => "ExcludeFileNames",
            PathCriterion::Custom { name, .. } => name,
        }
    }

    /// Must not touch the filesystem; only the path string is examined.
    pub fn evaluate(&self, path: &Path) -> Result<PathVerdict, CriterionError> {
        guarded(self.name(), || self.evaluate_unguarded(path))
    }

    fn evaluate_unguarded(&self, path: &Path) -> Result<PathVerdict, CriterionError> {
        match self {
            PathCriterion::ExcludeResourceModules => {
                let name = file_name(path)?;
                if RESOURCE_MODULE.is_match(&name) {
                    Ok(PathVerdict::exclude(format!("{} is a resource module", name)))
                } else {
                    Ok(PathVerdict::Include)
                }
            }
            PathCriterion::ExcludeSystemBinaries => {
                let name = file_name(path)?;
                if SYSTEM_BINARIES.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
                    Ok(PathVerdict::exclude(format!("{} is a system binary", name)))
                } else {
                    Ok(PathVerdict::Include)
                }
            }
            PathCriterion::ExcludeFileNames(names) => {
                let name = file_name(path)?;
                if names.contains(&name.to_lowercase()) {
                    Ok(PathVerdict::exclude(format!("{} is on the exclusion list", name)))
                } else {
                    Ok(PathVerdict::Include)
                }
            }
            PathCriterion::Custom { predicate, .. } => predicate(path),
        }
    }
}

impl fmt::Debug for PathCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCriterion::ExcludeFileNames(names) => {
                let mut sorted: Vec<&String> = names.iter().collect();
                sorted.sort();
                f.debug_tuple("ExcludeFileNames").field(&sorted).finish()
            }
            other => f.write_str(other.name()),
        }
    }
}

fn file_name(path: &Path) -> Result<String, CriterionError> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CriterionError::InvalidFileName(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_modules() {
        let criterion = PathCriterion::exclude_resource_modules();

        for name in [
            "/bin/fr-FR/Providers.resources.dll",
            "/bin/Providers.Resources.DLL",
            "/bin/Providers.resources.de.dll",
            "/lib/libcodec.resources.zh-Hans.so",
        ] {
            assert!(criterion.evaluate(Path::new(name)).unwrap().is_excluded(), "{name}");
        }

        for name in ["/bin/Providers.dll", "/bin/resources.dll", "/lib/libresources.so"] {
            assert_eq!(criterion.evaluate(Path::new(name)).unwrap(), PathVerdict::Include, "{name}");
        }
    }

    #[test]
    fn test_file_names_case_insensitive() {
        let criterion = PathCriterion::exclude_file_names(["UnitTests.dll"]);

        assert!(criterion
            .evaluate(Path::new("/bin/unittests.DLL"))
            .unwrap()
            .is_excluded());
        assert_eq!(
            criterion.evaluate(Path::new("/bin/OrleansProviders.dll")).unwrap(),
            PathVerdict::Include
        );
        // only the base name is compared
        assert_eq!(
            criterion.evaluate(Path::new("/UnitTests.dll/Other.dll")).unwrap(),
            PathVerdict::Include
        );
    }

    #[test]
    fn test_system_binaries() {
        let criterion = PathCriterion::exclude_system_binaries();

        assert!(criterion
            .evaluate(Path::new("C:/Windows/System32/KERNEL32.dll"))
            .unwrap()
            .is_excluded());
        assert_eq!(
            criterion.evaluate(Path::new("/opt/app/libplugin.so")).unwrap(),
            PathVerdict::Include
        );
    }

    #[test]
    fn test_custom_error_and_panic_become_errors() {
        let failing = PathCriterion::custom("Failing", |_| {
            Err(CriterionError::failed("Failing", "Inner Exception #1"))
        });
        let panicking = PathCriterion::custom("Panicking", |_| panic!("boom"));

        assert!(matches!(
            failing.evaluate(Path::new("/bin/A.dll")),
            Err(CriterionError::Failed { .. })
        ));
        match panicking.evaluate(Path::new("/bin/A.dll")) {
            Err(CriterionError::Panicked { criterion, message }) => {
                assert_eq!(criterion, "Panicking");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_path_without_file_name() {
        let criterion = PathCriterion::exclude_file_names(["x.dll"]);
        assert!(matches!(
            criterion.evaluate(Path::new("/")),
            Err(CriterionError::InvalidFileName(_))
        ));
    }
}
