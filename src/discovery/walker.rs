// Tue Jan 13 2026 - Alex

use crate::config::TraversalMode;
use crate::utils::logging::DiscoveryLog;
use indexmap::IndexMap;
use itertools::Itertools;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Absolute, `.`/`..`-free spelling of `path`. Existing paths are
/// canonicalized so symlinked and differently spelled roots collapse.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Ok(canonical);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Dedups roots by normalized path, keeping first-seen order. Missing
/// roots are dropped with a warning.
pub fn normalize_roots(
    roots: &IndexMap<PathBuf, TraversalMode>,
    log: &DiscoveryLog,
) -> Vec<(PathBuf, TraversalMode)> {
    let mut normalized: IndexMap<PathBuf, TraversalMode> = IndexMap::new();

    for (root, mode) in roots {
        let path = match normalize_path(root) {
            Ok(path) => path,
            Err(e) => {
                log.warn(format_args!("Unable to resolve root {}: {}; skipping", root.display(), e));
                continue;
            }
        };

        if !path.is_dir() {
            log.warn(format_args!("Unable to find directory {}; skipping", root.display()));
            continue;
        }

        normalized
            .entry(path)
            .and_modify(|existing| *existing = existing.merge(*mode))
            .or_insert(*mode);
    }

    normalized.into_iter().collect()
}

pub struct CandidateWalker {
    extensions: Vec<String>,
}

impl CandidateWalker {
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_lowercase(),
            None => return false,
        };

        self.extensions.iter().any(|ext| {
            name.ends_with(&format!(".{}", ext))
                // versioned shared objects: libfoo.so.1.2
                || (ext == "so" && name.contains(".so."))
        })
    }

    /// Files under one root, sorted by full path.
    pub fn enumerate(&self, root: &Path, mode: TraversalMode, log: &DiscoveryLog) -> Vec<PathBuf> {
        let walker = match mode {
            TraversalMode::TopLevelOnly => WalkDir::new(root).min_depth(1).max_depth(1),
            TraversalMode::Recursive => WalkDir::new(root).min_depth(1),
        };

        let mut files = Vec::new();
        for entry in walker.follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log.warn(format_args!("Skipping unreadable entry under {}: {}", root.display(), e));
                    continue;
                }
            };

            // roots are already canonical; the name found under the root is what criteria see
            if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }

        files.sort();
        files
    }

    /// Concatenates per-root listings in root order and drops repeats,
    /// keeping each file at its first position.
    pub fn merge(listings: Vec<Vec<PathBuf>>) -> Vec<PathBuf> {
        listings.into_iter().flatten().unique().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_log() -> DiscoveryLog {
        DiscoveryLog::new(None, 0)
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_normalize_lexically_when_missing() {
        let path = normalize_path(Path::new("/definitely/not/../there/./x")).unwrap();
        assert_eq!(path, PathBuf::from("/definitely/there/x"));
    }

    #[test]
    fn test_roots_dedup_by_spelling() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        let plain = dir.path().to_path_buf();
        let up_once = plain.join("sub").join("..");
        let up_twice = plain.join("sub").join("..").join("sub").join("..");

        let mut roots = IndexMap::new();
        roots.insert(plain, TraversalMode::TopLevelOnly);
        roots.insert(up_once, TraversalMode::Recursive);
        roots.insert(up_twice, TraversalMode::TopLevelOnly);
        roots.insert(dir.path().join("missing"), TraversalMode::Recursive);
        assert_eq!(roots.len(), 4);

        let normalized = normalize_roots(&roots, &quiet_log());

        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].0, fs::canonicalize(dir.path()).unwrap());
        assert_eq!(normalized[0].1, TraversalMode::Recursive);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_keeps_its_name_under_root() {
        let store = TempDir::new().unwrap();
        let target = store.path().join("blob-1234.dll");
        touch(&target);
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        std::os::unix::fs::symlink(&target, root.join("UnitTests.dll")).unwrap();

        let walker = CandidateWalker::new(&["dll".to_string()]);
        let files = walker.enumerate(&root, TraversalMode::Recursive, &quiet_log());

        assert_eq!(files, vec![root.join("UnitTests.dll")]);
    }

    #[test]
    fn test_enumerate_modes_and_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.dll"));
        touch(&dir.path().join("a.so"));
        touch(&dir.path().join("readme.txt"));
        touch(&dir.path().join("libz.so.1.2"));
        touch(&dir.path().join("nested/c.dylib"));

        let walker = CandidateWalker::new(&["dll".to_string(), "so".to_string(), "dylib".to_string()]);

        let top = walker.enumerate(dir.path(), TraversalMode::TopLevelOnly, &quiet_log());
        assert_eq!(names(&top), vec!["a.so", "b.dll", "libz.so.1.2"]);

        let all = walker.enumerate(dir.path(), TraversalMode::Recursive, &quiet_log());
        assert_eq!(names(&all), vec!["a.so", "b.dll", "libz.so.1.2", "c.dylib"]);
    }

    #[test]
    fn test_empty_extension_list_takes_everything() {
        let walker = CandidateWalker::new(&[]);
        assert!(walker.matches_extension(Path::new("/bin/readme.txt")));
        assert!(walker.matches_extension(Path::new("/bin/noext")));
    }

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let merged = CandidateWalker::merge(vec![
            vec![PathBuf::from("/a/x.dll"), PathBuf::from("/a/y.dll")],
            vec![PathBuf::from("/a/x.dll"), PathBuf::from("/b/z.dll")],
        ]);

        assert_eq!(
            merged,
            vec![
                PathBuf::from("/a/x.dll"),
                PathBuf::from("/a/y.dll"),
                PathBuf::from("/b/z.dll")
            ]
        );
    }
}
