//! Ordinal timepoint derivation
//!
//! Session labels are assumed to carry implicit temporal order when sorted
//! as strings; nothing here parses dates. Non-numeric, non-monotonic
//! labels sort as given — a documented assumption, not a bug.

use crate::error::{NistageError, Result};
use crate::table::FilepathTable;
use std::collections::{BTreeMap, BTreeSet};

/// Name of the column added by [`derive_timepoints`].
pub const TIMEPOINT_COLUMN: &str = "timepoint";

/// Assign zero-based per-subject timepoints from session labels.
///
/// Unique (id, session) pairs are ordered by (id, session label) and each
/// subject's pairs get a running count starting at 0; every original row
/// is then joined back to its pair's ordinal, so duplicate rows share a
/// timepoint. Rows with an absent id or session label get an absent
/// timepoint.
///
/// Timepoints count from zero, not from one: the first visit of every
/// subject is timepoint 0.
pub fn derive_timepoints(
    table: &mut FilepathTable,
    id_column: &str,
    session_column: &str,
) -> Result<()> {
    let id_idx = table.column_index(id_column).ok_or_else(|| {
        NistageError::Config(format!(
            "timepoints need the '{id_column}' column; build the table with identifier resolution first"
        ))
    })?;
    let session_idx = table.column_index(session_column).ok_or_else(|| {
        NistageError::Config(format!(
            "timepoints need the '{session_column}' column; extract session labels first"
        ))
    })?;

    // Unique pairs, ordered by (id, session label)
    let mut pairs: BTreeSet<(String, String)> = BTreeSet::new();
    for row in table.rows() {
        if let (Some(id), Some(session)) = (&row[id_idx], &row[session_idx]) {
            pairs.insert((id.clone(), session.clone()));
        }
    }

    // Running count per subject
    let mut ordinals: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut current_id: Option<&str> = None;
    let mut count = 0;
    for (id, session) in &pairs {
        if current_id != Some(id.as_str()) {
            current_id = Some(id.as_str());
            count = 0;
        }
        ordinals.insert((id.clone(), session.clone()), count);
        count += 1;
    }

    // Join back onto every original row
    let values: Vec<Option<String>> = table
        .rows()
        .map(|row| match (&row[id_idx], &row[session_idx]) {
            (Some(id), Some(session)) => ordinals
                .get(&(id.clone(), session.clone()))
                .map(|t| t.to_string()),
            _ => None,
        })
        .collect();

    table.add_column(TIMEPOINT_COLUMN, values)
}
