//! Stage command - render destination paths and copy files
//!
//! Runs the scan pipeline, derives the extension column, renders a
//! two-level layout recipe into destination paths, then copies each file
//! into place (or previews the plan with --dry-run). Optionally
//! decompresses staged gzip files afterwards.

use crate::cli::scan::{build_table, ScanArgs};
use nistage::{
    copy_files, file_extension, uncompress_file, LayoutRecipe, PathRecipe, PATH_COLUMN,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Column the rendered destination paths land in.
const DST_COLUMN: &str = "dst";

/// Arguments for the stage command
#[derive(Debug)]
pub struct StageArgs {
    /// Discovery options shared with the scan command
    pub scan: ScanArgs,
    pub dest: PathBuf,
    pub dir_recipe: String,
    pub file_recipe: String,
    pub extension_column: String,
    pub dry_run: bool,
    pub uncompress: bool,
}

/// Execute the stage command
pub fn run(args: StageArgs) -> anyhow::Result<()> {
    let mut table = build_table(&args.scan)?;

    // Every row gets its full extension (e.g. ".nii.gz") so recipes can
    // carry it over verbatim
    let extensions: Vec<Option<String>> = table
        .column_values(PATH_COLUMN)?
        .into_iter()
        .map(|path| path.map(|p| file_extension(Path::new(p))))
        .collect();
    table.add_column(&args.extension_column, extensions)?;

    let layout = LayoutRecipe::new(
        PathRecipe::new(&args.dir_recipe),
        PathRecipe::new(&args.file_recipe),
        &args.extension_column,
    );
    layout.render_into(&mut table, &args.dest, DST_COLUMN)?;

    if args.dry_run {
        println!("Staging plan ({} files):", table.len());
        for row_index in 0..table.len() {
            let src = table.value(row_index, PATH_COLUMN)?.unwrap_or("-");
            let dst = table.value(row_index, DST_COLUMN)?.unwrap_or("-");
            println!("  {} -> {}", src, dst);
        }
        return Ok(());
    }

    let copied = copy_files(&table, PATH_COLUMN, DST_COLUMN)?;
    println!("Staged {} files into {}", copied, args.dest.display());

    if args.uncompress {
        let staged: Vec<String> = table
            .column_values(DST_COLUMN)?
            .into_iter()
            .flatten()
            .filter(|p| p.ends_with(".gz"))
            .map(str::to_string)
            .collect();

        let mut uncompressed = 0;
        for path in &staged {
            uncompress_file(Path::new(path), None)?;
            uncompressed += 1;
        }
        info!(files = uncompressed, "Decompression complete");
        println!("Uncompressed {} gzip files", uncompressed);
    }

    Ok(())
}
