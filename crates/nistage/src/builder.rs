//! Filepath table construction
//!
//! Walks one or more source directories and assembles a row-per-file
//! table, resolving subject identifiers in one of two mutually exclusive
//! modes. The modes are an enum, so a mixed configuration (an id list
//! *and* an id regex) is unrepresentable rather than checked at runtime;
//! what remains checkable — identifier/directory length mismatch — is a
//! config error.
//!
//! Row order: grouped by source directory in the order supplied, then by
//! within-directory discovery order. Reproducible for identical
//! filesystem state.

use crate::entities::{EntityExtractor, EntityPattern};
use crate::error::{NistageError, Result};
use crate::filter::PathFilter;
use crate::table::{FilepathTable, PATH_COLUMN};
use crate::walker::find_files;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Default name of the identifier column.
pub const DEFAULT_ID_COLUMN: &str = "subject_id";

/// How discovered files map to subject identifiers.
#[derive(Debug, Clone, Default)]
pub enum IdentifierMap {
    /// No identifier resolution; the table carries paths only.
    #[default]
    None,
    /// One identifier per source directory, paired positionally. Lengths
    /// must match the source directory list.
    Explicit(Vec<String>),
    /// Identifier derived from each file path by regex. With an
    /// allow-list, files whose derived id is not in the list are dropped
    /// with a warning; without one, extraction misses are kept with an
    /// absent id.
    Derived {
        pattern: EntityPattern,
        allow: Option<BTreeSet<String>>,
    },
}

/// Configuration for building a filepath table.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    src_dirs: Vec<PathBuf>,
    identifiers: IdentifierMap,
    filter: PathFilter,
    exclude_dirs: BTreeSet<String>,
    extractor: Option<EntityExtractor>,
    id_column: String,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self {
            src_dirs: Vec::new(),
            identifiers: IdentifierMap::None,
            filter: PathFilter::new(),
            exclude_dirs: BTreeSet::new(),
            extractor: None,
            id_column: DEFAULT_ID_COLUMN.to_string(),
        }
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one source directory to walk.
    pub fn src_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.src_dirs.push(dir.into());
        self
    }

    /// Add several source directories, walked in the given order.
    pub fn src_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.src_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// File predicates applied during the walk.
    pub fn filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Directory names pruned from every walk.
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Identifier resolution mode.
    pub fn identifiers(mut self, identifiers: IdentifierMap) -> Self {
        self.identifiers = identifiers;
        self
    }

    /// Entity extractor whose columns are appended to every row.
    pub fn extract(mut self, extractor: EntityExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Rename the identifier column (default `subject_id`).
    pub fn id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = name.into();
        self
    }

    /// Walk the configured directories and build the table.
    pub fn build(&self) -> Result<FilepathTable> {
        if self.src_dirs.is_empty() {
            return Err(NistageError::Config(
                "at least one source directory is required".to_string(),
            ));
        }

        if let IdentifierMap::Explicit(ids) = &self.identifiers {
            if ids.len() != self.src_dirs.len() {
                return Err(NistageError::Config(format!(
                    "{} identifiers paired with {} source directories; explicit mapping needs one directory per identifier",
                    ids.len(),
                    self.src_dirs.len()
                )));
            }
        }

        let has_id = !matches!(self.identifiers, IdentifierMap::None);

        let mut columns: Vec<String> = Vec::new();
        if has_id {
            columns.push(self.id_column.clone());
        }
        columns.push(PATH_COLUMN.to_string());
        if let Some(extractor) = &self.extractor {
            columns.extend(extractor.entity_names().map(str::to_string));
        }

        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column) {
                return Err(NistageError::Config(format!(
                    "duplicate column name '{column}'"
                )));
            }
        }

        let mut table = FilepathTable::new(columns);

        for (dir_index, dir) in self.src_dirs.iter().enumerate() {
            let files = find_files(dir, &self.filter, &self.exclude_dirs)?;
            debug!(dir = %dir.display(), files = files.len(), "Source directory walked");

            for file in files {
                let path = file.to_string_lossy().into_owned();

                let id = match &self.identifiers {
                    IdentifierMap::None => None,
                    IdentifierMap::Explicit(ids) => Some(ids[dir_index].clone()),
                    IdentifierMap::Derived { pattern, allow } => {
                        match (pattern.extract(&path), allow) {
                            (derived, None) => derived,
                            (Some(id), Some(allow)) if allow.contains(&id) => Some(id),
                            (Some(id), Some(_)) => {
                                warn!(path = %path, id = %id, "Dropping file: derived id not in the identifier list");
                                continue;
                            }
                            (None, Some(_)) => {
                                warn!(path = %path, pattern = pattern.as_str(), "Dropping file: no id derived");
                                continue;
                            }
                        }
                    }
                };

                let mut row: Vec<Option<String>> = Vec::with_capacity(table.columns().len());
                if has_id {
                    row.push(id);
                }
                row.push(Some(path.clone()));
                if let Some(extractor) = &self.extractor {
                    row.extend(extractor.extract(&path).into_iter().map(|(_, v)| v));
                }

                table.push_row(row)?;
            }
        }

        info!(rows = table.len(), dirs = self.src_dirs.len(), "Filepath table built");
        Ok(table)
    }
}
