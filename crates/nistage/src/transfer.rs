//! Transfer collaborators
//!
//! Thin, blocking wrappers around copy and decompression primitives plus
//! the path helpers the renderer feeds on. One file at a time, no
//! parallel fan-out.

use crate::error::{NistageError, Result};
use crate::table::FilepathTable;
use crate::walker::normalize_path;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// All suffixes of the file name, e.g. `[".nii", ".gz"]`. Leading dots of
/// hidden files are part of the stem, not a suffix.
fn suffixes(name: &str) -> Vec<&str> {
    let stem = name.trim_start_matches('.');
    let offset = name.len() - stem.len();
    match stem.find('.') {
        Some(first_dot) => {
            let tail = &name[offset + first_dot..];
            // Split keeping the dots: ".nii.gz" -> [".nii", ".gz"]
            let mut parts = Vec::new();
            let mut rest = tail;
            while let Some(next) = rest[1..].find('.') {
                parts.push(&rest[..next + 1]);
                rest = &rest[next + 1..];
            }
            parts.push(rest);
            parts
        }
        None => Vec::new(),
    }
}

/// The full extension of a path: every suffix joined, e.g. `.nii.gz` —
/// not just the last one.
pub fn file_extension(path: &Path) -> String {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    suffixes(name).concat()
}

/// Derive a destination path by replacing `src_root` with `dst_root`,
/// preserving the relative layout.
pub fn relocate_root(path: &Path, src_root: &Path, dst_root: &Path) -> Result<PathBuf> {
    let src_root = normalize_path(src_root);
    let rel = normalize_path(path)
        .strip_prefix(&src_root)
        .map_err(|_| {
            NistageError::Config(format!(
                "path '{}' is not under source root '{}'",
                path.display(),
                src_root.display()
            ))
        })?
        .to_path_buf();
    Ok(normalize_path(dst_root).join(rel))
}

/// Decompress a gzip file with a two-extension name (`name.<ext>.gz`).
///
/// The output lands at `<dst_dir>/name.<ext>`, or beside the source when
/// no destination is given. A pre-existing output is left untouched and
/// returned as-is, so repeated staging runs are idempotent.
pub fn uncompress_file(path: &Path, dst_dir: Option<&Path>) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| NistageError::NotFound(path.to_path_buf()))?;

    let all_suffixes = suffixes(file_name);
    let native_extension = all_suffixes.first().copied().unwrap_or("");
    let joined: String = all_suffixes.concat();
    let base = file_name.strip_suffix(joined.as_str()).unwrap_or(file_name);
    let out_name = format!("{base}{native_extension}");

    let target = match dst_dir {
        Some(dir) => normalize_path(dir).join(out_name),
        None => path.with_file_name(out_name),
    };

    if target.exists() {
        debug!(target = %target.display(), "Uncompressed file already exists, skipping");
        return Ok(target);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut decoder = GzDecoder::new(File::open(path)?);
    let mut output = File::create(&target)?;
    io::copy(&mut decoder, &mut output)?;
    debug!(src = %path.display(), target = %target.display(), "Uncompressed");

    Ok(target)
}

/// Decompress a batch of files; returns the uncompressed paths in input
/// order.
pub fn uncompress_files<P: AsRef<Path>>(
    paths: &[P],
    dst_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    paths
        .iter()
        .map(|p| uncompress_file(p.as_ref(), dst_dir))
        .collect()
}

/// Copy every row's source column to its destination column.
///
/// Destination directories are created as needed and existing destination
/// files are overwritten. Rows without both paths are skipped with a
/// warning. Returns the number of files copied.
pub fn copy_files(table: &FilepathTable, src_column: &str, dst_column: &str) -> Result<u64> {
    let src_idx = table
        .column_index(src_column)
        .ok_or_else(|| NistageError::MissingColumn(src_column.to_string()))?;
    let dst_idx = table
        .column_index(dst_column)
        .ok_or_else(|| NistageError::MissingColumn(dst_column.to_string()))?;

    let mut copied = 0;
    for (i, row) in table.rows().enumerate() {
        let (Some(src), Some(dst)) = (row[src_idx].as_deref(), row[dst_idx].as_deref()) else {
            warn!(row = i, "Skipping row without source or destination path");
            continue;
        };

        let dst = Path::new(dst);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
        copied += 1;
    }

    info!(files = copied, "Copy complete");
    Ok(copied)
}
