//! nistage - File Discovery & Re-Layout
//!
//! nistage discovers files in messy acquisition trees, filters them with
//! compound path predicates, extracts filename-convention metadata
//! (subject, session, run, echo, modality) into a filepath table, and
//! renders standardized destination paths for staging.
//!
//! The pipeline runs: walker -> table builder -> entity extraction ->
//! optional timepoint derivation -> recipe rendering -> copy.

pub mod builder;
pub mod entities;
pub mod error;
pub mod filter;
pub mod recipe;
pub mod table;
pub mod timepoint;
pub mod transfer;
pub mod walker;

// Re-exports for CLI usage
pub use builder::{IdentifierMap, TableBuilder, DEFAULT_ID_COLUMN};
pub use entities::{EntityExtractor, EntityPattern};
pub use error::{NistageError, Result};
pub use filter::PathFilter;
pub use recipe::{LayoutRecipe, PathRecipe};
pub use table::{FilepathTable, PATH_COLUMN};
pub use timepoint::{derive_timepoints, TIMEPOINT_COLUMN};
pub use transfer::{copy_files, file_extension, relocate_root, uncompress_file, uncompress_files};
pub use walker::find_files;
