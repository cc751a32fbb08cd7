//! nistage launcher
//!
//! Standalone CLI for file discovery and staging:
//! - `scan` builds and prints the filepath table
//! - `stage` renders destination paths and copies files into the layout

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "nistage", about = "File discovery and staging for neuroimaging datasets")]
struct Cli {
    /// Enable verbose logging (debug to the console)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover files and build the filepath table
    Scan {
        /// Source directories to walk
        src_dirs: Vec<PathBuf>,

        /// Subject identifier, one per source directory (explicit
        /// mapping); with --id-pattern these act as an allow-list instead
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Derive subject identifiers from each path with this regex
        #[arg(long)]
        id_pattern: Option<String>,

        /// Capture group for --id-pattern (0 = whole match; default:
        /// first group when the pattern has one)
        #[arg(long)]
        id_group: Option<usize>,

        /// Name of the identifier column
        #[arg(long, default_value = "subject_id")]
        id_column: String,

        /// File name must end with one of these (repeatable)
        #[arg(short = 's', long = "suffix")]
        suffixes: Vec<String>,

        /// File name must start with one of these (repeatable)
        #[arg(short = 'p', long = "prefix")]
        prefixes: Vec<String>,

        /// Full path must contain every one of these (repeatable)
        #[arg(long = "contains")]
        contains: Vec<String>,

        /// Full path must contain at least one of these (repeatable)
        #[arg(long = "contains-any")]
        contains_any: Vec<String>,

        /// Reject paths containing every one of these (repeatable)
        #[arg(long = "not-contains")]
        not_contains: Vec<String>,

        /// Reject paths containing any of these (repeatable)
        #[arg(long = "not-contains-any")]
        not_contains_any: Vec<String>,

        /// Case-insensitive matching
        #[arg(short = 'i', long)]
        ignore_case: bool,

        /// Directory names to prune from the walk (repeatable)
        #[arg(short = 'x', long = "exclude-dir")]
        exclude_dirs: Vec<String>,

        /// Extract the default entity set (session, run, datatype, echo)
        #[arg(short = 'e', long)]
        entities: bool,

        /// Custom entity as NAME=REGEX[@GROUP]; replaces the default set
        /// (repeatable)
        #[arg(long = "entity")]
        entity_specs: Vec<String>,

        /// Derive per-subject timepoints from session labels
        #[arg(short = 't', long)]
        timepoints: bool,

        /// Column holding the session labels for --timepoints
        #[arg(long, default_value = "session")]
        session_column: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Export the table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Output file paths only (quiet mode)
        #[arg(short, long)]
        quiet: bool,

        /// Maximum rows to display
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Render destination paths and copy files into the layout
    Stage {
        /// Source directories to walk
        src_dirs: Vec<PathBuf>,

        /// Destination root for the staged layout
        #[arg(short = 'd', long)]
        dest: PathBuf,

        /// Directory recipe with {column} placeholders, segments joined
        /// with '/'
        #[arg(long, default_value = "sub-{subject_id}/ses-{session}")]
        dir_recipe: String,

        /// Filename recipe with {column} placeholders (the extension
        /// column is appended automatically)
        #[arg(long, default_value = "sub-{subject_id}_ses-{session}")]
        file_recipe: String,

        /// Column holding the file extension appended to rendered names
        #[arg(long, default_value = "extension")]
        extension_column: String,

        /// Preview the staging plan without copying
        #[arg(long)]
        dry_run: bool,

        /// Decompress staged .gz files after copying
        #[arg(long)]
        uncompress: bool,

        /// Subject identifier, one per source directory (explicit
        /// mapping); with --id-pattern these act as an allow-list instead
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Derive subject identifiers from each path with this regex
        #[arg(long)]
        id_pattern: Option<String>,

        /// Capture group for --id-pattern (0 = whole match)
        #[arg(long)]
        id_group: Option<usize>,

        /// Name of the identifier column
        #[arg(long, default_value = "subject_id")]
        id_column: String,

        /// File name must end with one of these (repeatable)
        #[arg(short = 's', long = "suffix")]
        suffixes: Vec<String>,

        /// File name must start with one of these (repeatable)
        #[arg(short = 'p', long = "prefix")]
        prefixes: Vec<String>,

        /// Full path must contain every one of these (repeatable)
        #[arg(long = "contains")]
        contains: Vec<String>,

        /// Full path must contain at least one of these (repeatable)
        #[arg(long = "contains-any")]
        contains_any: Vec<String>,

        /// Reject paths containing every one of these (repeatable)
        #[arg(long = "not-contains")]
        not_contains: Vec<String>,

        /// Reject paths containing any of these (repeatable)
        #[arg(long = "not-contains-any")]
        not_contains_any: Vec<String>,

        /// Case-insensitive matching
        #[arg(short = 'i', long)]
        ignore_case: bool,

        /// Directory names to prune from the walk (repeatable)
        #[arg(short = 'x', long = "exclude-dir")]
        exclude_dirs: Vec<String>,

        /// Custom entity as NAME=REGEX[@GROUP]; replaces the default set
        /// (repeatable)
        #[arg(long = "entity")]
        entity_specs: Vec<String>,

        /// Derive per-subject timepoints from session labels
        #[arg(short = 't', long)]
        timepoints: bool,

        /// Column holding the session labels for --timepoints
        #[arg(long, default_value = "session")]
        session_column: String,
    },
}

/// Whether the command writes machine-readable output to stdout, in which
/// case logs move to stderr.
fn command_wants_machine_output(command: &Commands) -> bool {
    match command {
        Commands::Scan { json, quiet, .. } => *json || *quiet,
        Commands::Stage { .. } => false,
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Scan {
            src_dirs,
            ids,
            id_pattern,
            id_group,
            id_column,
            suffixes,
            prefixes,
            contains,
            contains_any,
            not_contains,
            not_contains_any,
            ignore_case,
            exclude_dirs,
            entities,
            entity_specs,
            timepoints,
            session_column,
            json,
            csv,
            quiet,
            limit,
        } => cli::scan::run(cli::scan::ScanArgs {
            src_dirs,
            ids,
            id_pattern,
            id_group,
            id_column,
            suffixes,
            prefixes,
            contains,
            contains_any,
            not_contains,
            not_contains_any,
            ignore_case,
            exclude_dirs,
            entities,
            entity_specs,
            timepoints,
            session_column,
            json,
            csv,
            quiet,
            limit,
        }),
        Commands::Stage {
            src_dirs,
            dest,
            dir_recipe,
            file_recipe,
            extension_column,
            dry_run,
            uncompress,
            ids,
            id_pattern,
            id_group,
            id_column,
            suffixes,
            prefixes,
            contains,
            contains_any,
            not_contains,
            not_contains_any,
            ignore_case,
            exclude_dirs,
            entity_specs,
            timepoints,
            session_column,
        } => cli::stage::run(cli::stage::StageArgs {
            scan: cli::scan::ScanArgs {
                src_dirs,
                ids,
                id_pattern,
                id_group,
                id_column,
                suffixes,
                prefixes,
                contains,
                contains_any,
                not_contains,
                not_contains_any,
                ignore_case,
                exclude_dirs,
                // Recipes always need the entity columns
                entities: true,
                entity_specs,
                timepoints,
                session_column,
                json: false,
                csv: None,
                quiet: true,
                limit: 0,
            },
            dest,
            dir_recipe,
            file_recipe,
            extension_column,
            dry_run,
            uncompress,
        }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let machine_output = command_wants_machine_output(&cli.command);
    let default_filter = if cli.verbose {
        "nistage=debug"
    } else {
        "nistage=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Keep stdout clean when the table itself goes there
    let console_writer = if machine_output {
        tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr)
    } else {
        tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout)
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(console_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::from(1)
        }
    }
}
