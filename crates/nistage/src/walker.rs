//! Directory walker with structural pruning
//!
//! Walks a source root recursively, prunes excluded directory names before
//! descending into them, and delegates every remaining file to the
//! `PathFilter`. Matches come back in traversal order; the walker never
//! resorts.
//!
//! Single-threaded and blocking: a walk either completes or fails, there
//! is no partial result on a bad root.

use crate::error::{NistageError, Result};
use crate::filter::PathFilter;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Normalize a path to the platform separator convention.
///
/// Exclude-dir and must-contain predicates compare against the walked
/// path strings, so the root has to use consistent components first.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.components().collect()
}

/// Find all files under `root` that pass `filter`.
///
/// Directories whose name is in `exclude_dirs` are pruned structurally:
/// their contents are never visited, nested exclusions included. Unreadable
/// entries are skipped with a warning rather than aborting the walk.
///
/// Zero matches is a valid outcome (logged as a warning), distinct from a
/// missing root which is a hard error.
pub fn find_files(
    root: &Path,
    filter: &PathFilter,
    exclude_dirs: &BTreeSet<String>,
) -> Result<Vec<PathBuf>> {
    let root = normalize_path(root);

    if !root.exists() {
        return Err(NistageError::NotFound(root));
    }
    if !root.is_dir() {
        return Err(NistageError::NotADirectory(root));
    }

    let mut matches = Vec::new();

    let walker = WalkDir::new(&root).into_iter().filter_entry(|entry| {
        // Exclusions apply to directories only; the root itself is never
        // pruned
        if entry.depth() > 0 && entry.file_type().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                if exclude_dirs.contains(name) {
                    debug!(dir = %entry.path().display(), "Pruning excluded directory");
                    return false;
                }
            }
        }
        true
    });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if filter.matches(file_name, &path.to_string_lossy()) {
            matches.push(path.to_path_buf());
        }
    }

    if matches.is_empty() {
        warn!(
            root = %root.display(),
            "No files matched the given criteria"
        );
    } else {
        debug!(root = %root.display(), files = matches.len(), "Walk complete");
    }

    Ok(matches)
}
