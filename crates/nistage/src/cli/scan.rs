//! Scan command - discover files and build the filepath table
//!
//! Standalone discovery: walks the source directories, resolves subject
//! identifiers, optionally extracts entities and derives timepoints, then
//! prints or exports the table.

use crate::cli::error::HelpfulError;
use crate::cli::output::print_filepath_table;
use nistage::{
    derive_timepoints, EntityExtractor, EntityPattern, FilepathTable, IdentifierMap, PathFilter,
    TableBuilder, PATH_COLUMN,
};
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the scan command
#[derive(Debug)]
pub struct ScanArgs {
    pub src_dirs: Vec<PathBuf>,
    pub ids: Vec<String>,
    pub id_pattern: Option<String>,
    pub id_group: Option<usize>,
    pub id_column: String,
    pub suffixes: Vec<String>,
    pub prefixes: Vec<String>,
    pub contains: Vec<String>,
    pub contains_any: Vec<String>,
    pub not_contains: Vec<String>,
    pub not_contains_any: Vec<String>,
    pub ignore_case: bool,
    pub exclude_dirs: Vec<String>,
    pub entities: bool,
    pub entity_specs: Vec<String>,
    pub timepoints: bool,
    pub session_column: String,
    pub json: bool,
    pub csv: Option<PathBuf>,
    pub quiet: bool,
    pub limit: usize,
}

/// JSON report wrapper
#[derive(Debug, Serialize)]
struct ScanReport {
    total_files: usize,
    columns: Vec<String>,
    rows: serde_json::Value,
}

/// Execute the scan command
pub fn run(args: ScanArgs) -> anyhow::Result<()> {
    let table = build_table(&args)?;

    if args.json {
        output_json(&table)?;
    } else if let Some(csv_path) = &args.csv {
        table.to_csv_file(csv_path)?;
        println!("Wrote {} rows to {}", table.len(), csv_path.display());
    } else if args.quiet {
        output_quiet(&table)?;
    } else {
        println!(
            "Found {} files in {} source directories",
            table.len(),
            args.src_dirs.len()
        );
        print_filepath_table(&table, args.limit);
    }

    Ok(())
}

/// Build the table from scan arguments. Shared with the stage command.
pub fn build_table(args: &ScanArgs) -> anyhow::Result<FilepathTable> {
    // Validate roots up front for friendlier errors than the walker's
    for dir in &args.src_dirs {
        if !dir.exists() {
            return Err(HelpfulError::path_not_found(dir).into());
        }
        if !dir.is_dir() {
            return Err(HelpfulError::not_a_directory(dir).into());
        }
    }

    let filter = PathFilter {
        suffixes: args.suffixes.clone(),
        prefixes: args.prefixes.clone(),
        contains_all: args.contains.clone(),
        contains_any: args.contains_any.clone(),
        excludes_all: args.not_contains.clone(),
        excludes_any: args.not_contains_any.clone(),
        case_insensitive: args.ignore_case,
    };

    let mut builder = TableBuilder::new()
        .src_dirs(args.src_dirs.clone())
        .filter(filter)
        .exclude_dirs(args.exclude_dirs.clone())
        .identifiers(resolve_identifier_mode(args)?)
        .id_column(&args.id_column);

    if let Some(extractor) = resolve_extractor(args)? {
        builder = builder.extract(extractor);
    }

    let mut table = builder.build()?;

    if args.timepoints {
        derive_timepoints(&mut table, &args.id_column, &args.session_column)?;
    }

    Ok(table)
}

/// Pick the identifier-resolution mode from the supplied options.
///
/// An id pattern selects derived mode, with any `--id` values acting as
/// the allow-list; `--id` values alone select explicit mapping and must
/// pair one-to-one with the source directories.
fn resolve_identifier_mode(args: &ScanArgs) -> anyhow::Result<IdentifierMap> {
    match &args.id_pattern {
        Some(pattern) => {
            let compiled = match args.id_group {
                Some(group) => EntityPattern::with_group(pattern, group)?,
                None => EntityPattern::new(pattern)?,
            };
            let allow = if args.ids.is_empty() {
                None
            } else {
                Some(args.ids.iter().cloned().collect())
            };
            Ok(IdentifierMap::Derived {
                pattern: compiled,
                allow,
            })
        }
        None if args.ids.is_empty() => Ok(IdentifierMap::None),
        None => {
            if args.ids.len() != args.src_dirs.len() {
                return Err(
                    HelpfulError::id_count_mismatch(args.ids.len(), args.src_dirs.len()).into(),
                );
            }
            Ok(IdentifierMap::Explicit(args.ids.clone()))
        }
    }
}

/// Build the entity extractor, if any.
///
/// Custom `--entity NAME=REGEX[@GROUP]` specs replace the default set
/// entirely; `--entities` (or `--timepoints`, which needs session labels)
/// enables the default neuroimaging set.
fn resolve_extractor(args: &ScanArgs) -> anyhow::Result<Option<EntityExtractor>> {
    if !args.entity_specs.is_empty() {
        let mut patterns = Vec::new();
        for spec in &args.entity_specs {
            let Some((name, rest)) = spec.split_once('=') else {
                return Err(HelpfulError::invalid_entity_spec(spec).into());
            };
            if name.is_empty() || rest.is_empty() {
                return Err(HelpfulError::invalid_entity_spec(spec).into());
            }

            // An @N tail selects a capture group; anything else after @ is
            // part of the regex itself
            let compiled = match rest.rsplit_once('@') {
                Some((pattern, group)) if group.parse::<usize>().is_ok() => {
                    EntityPattern::with_group(pattern, group.parse()?)?
                }
                _ => EntityPattern::new(rest)?,
            };
            patterns.push((name.to_string(), compiled));
        }
        return Ok(Some(EntityExtractor::new(patterns)));
    }

    if args.entities || args.timepoints {
        return Ok(Some(EntityExtractor::default_set()));
    }

    Ok(None)
}

/// Output as JSON
fn output_json(table: &FilepathTable) -> anyhow::Result<()> {
    let report = ScanReport {
        total_files: table.len(),
        columns: table.columns().to_vec(),
        rows: table.to_json(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Output just file paths (quiet mode)
fn output_quiet(table: &FilepathTable) -> anyhow::Result<()> {
    for path in table.column_values(PATH_COLUMN)?.into_iter().flatten() {
        println!("{}", path);
    }
    Ok(())
}
