//! markpack - split and build marker-delimited text archives
//!
//! The main entry point, handling:
//! - `split`: recreate a directory tree from a combined archive
//! - `pack`: combine files into an archive
//! - `check`: validate and show the resolved configuration

use clap::{Args, Parser, Subcommand};
use mp_archive::{
    collect_tree, open_archive, split_file, ArchiveError, MarkerSet, MemorySink, Packer,
    SplitOptions, Splitter,
};
use mp_config::{load_settings, LoadedSettings, MarkerSettings};
use mp_core::exit_codes::ExitCode;
use mp_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use mp_core::output::{
    render_check, render_error, render_pack, render_split, OutputFormat, SplitContext,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

/// markpack - split and build marker-delimited text archives
#[derive(Parser)]
#[command(name = "markpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to a markpack.toml settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "summary")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Recreate files from a combined archive
    Split(SplitArgs),

    /// Combine files into an archive
    Pack(PackArgs),

    /// Validate configuration and print the resolved settings
    Check,
}

/// Marker overrides shared by split and pack
#[derive(Args, Debug)]
struct MarkerArgs {
    /// Start marker template (must contain {path} once)
    #[arg(long, value_name = "TEMPLATE")]
    start: Option<String>,

    /// End marker template (must contain {path} once)
    #[arg(long, value_name = "TEMPLATE")]
    end: Option<String>,

    /// Ignore end markers; entries run to the next start marker
    #[arg(long)]
    no_end_markers: bool,
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Archive to unpack (default: split.archive from settings)
    archive: Option<PathBuf>,

    /// Directory to recreate files under
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Refuse entries whose path leaves the output directory
    #[arg(long)]
    confine: bool,

    /// Scan and report without writing anything
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    markers: MarkerArgs,
}

#[derive(Args, Debug)]
struct PackArgs {
    /// Files to pack, relative to --base (default: pack.include from settings)
    files: Vec<String>,

    /// Pack every file under this directory
    #[arg(long, conflicts_with_all = ["files", "base"])]
    tree: Option<PathBuf>,

    /// Directory the file paths are relative to
    #[arg(long)]
    base: Option<PathBuf>,

    /// Archive to write
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[command(flatten)]
    markers: MarkerArgs,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    let cli_format = match cli.global.format {
        OutputFormat::Json => Some(LogFormat::Jsonl),
        OutputFormat::Summary => None,
    };
    let log_config = LogConfig::from_env(cli_level, cli_format).with_color(!cli.global.no_color);
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = info_span!("markpack", run_id = %run_id);
    let _enter = span.enter();

    let exit_code = match &cli.command {
        Commands::Split(args) => run_split(&cli.global, args),
        Commands::Pack(args) => run_pack(&cli.global, args),
        Commands::Check => run_check(&cli.global),
    };

    debug!(exit_code = %exit_code, "Finished");
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Commands
// ============================================================================

fn run_split(global: &GlobalOpts, args: &SplitArgs) -> ExitCode {
    let loaded = match load(global, "split") {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let settings = &loaded.settings;

    let markers = match marker_set(&settings.markers, &args.markers) {
        Ok(markers) => markers,
        Err(e) => return fail(global, "split", ExitCode::from(&e), &e.to_string()),
    };
    let options = SplitOptions::new(markers)
        .with_confine_paths(args.confine || settings.split.confine_paths);

    let archive = args.archive.as_deref().unwrap_or(&settings.split.archive);
    let output_dir = args.output.as_deref().unwrap_or(&settings.split.output_dir);

    let result = if args.dry_run {
        open_archive(archive).and_then(|reader| {
            Splitter::new(options).split(reader, &mut MemorySink::new())
        })
    } else {
        split_file(archive, output_dir, &options)
    };

    match result {
        Ok(report) => {
            let code = ExitCode::for_split(&report);
            let ctx = SplitContext {
                archive,
                output_dir,
                dry_run: args.dry_run,
            };
            println!("{}", render_split(global.format, ctx, &report, code));
            code
        }
        Err(e) => fail(global, "split", ExitCode::from(&e), &e.to_string()),
    }
}

fn run_pack(global: &GlobalOpts, args: &PackArgs) -> ExitCode {
    let loaded = match load(global, "pack") {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let settings = &loaded.settings;

    let markers = match marker_set(&settings.markers, &args.markers) {
        Ok(markers) => markers,
        Err(e) => return fail(global, "pack", ExitCode::from(&e), &e.to_string()),
    };

    let output = args.output.as_deref().unwrap_or(&settings.pack.output);

    let (base, entries) = if let Some(tree) = &args.tree {
        match collect_tree(tree) {
            Ok(entries) => {
                let entries = exclude_output(tree, entries, output);
                (tree.clone(), entries)
            }
            Err(e) => return fail(global, "pack", ExitCode::from(&e), &e.to_string()),
        }
    } else {
        let base = args
            .base
            .clone()
            .unwrap_or_else(|| settings.pack.base_dir.clone());
        let entries = if args.files.is_empty() {
            settings.pack.include.clone()
        } else {
            args.files.clone()
        };
        (base, entries)
    };

    if entries.is_empty() {
        return fail(
            global,
            "pack",
            ExitCode::ArgsError,
            "nothing to pack: pass files, use --tree, or set pack.include",
        );
    }

    match Packer::new(markers).pack_to_file(&base, &entries, output) {
        Ok(report) => {
            let code = ExitCode::for_pack(&report);
            println!("{}", render_pack(global.format, output, &report, code));
            code
        }
        Err(e) => fail(global, "pack", ExitCode::from(&e), &e.to_string()),
    }
}

fn run_check(global: &GlobalOpts) -> ExitCode {
    match load(global, "check") {
        Ok(loaded) => {
            println!("{}", render_check(global.format, &loaded));
            ExitCode::Clean
        }
        Err(code) => code,
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load(global: &GlobalOpts, command: &str) -> Result<LoadedSettings, ExitCode> {
    match load_settings(global.config.as_deref()) {
        Ok(loaded) => {
            debug!(
                source = %loaded.source,
                path = ?loaded.path,
                "Settings loaded"
            );
            Ok(loaded)
        }
        Err(e) => Err(fail(global, command, ExitCode::from(&e), &e.to_string())),
    }
}

/// Apply CLI marker overrides on top of the configured templates.
fn marker_set(configured: &MarkerSettings, args: &MarkerArgs) -> Result<MarkerSet, ArchiveError> {
    let mut markers = configured.clone();
    if let Some(start) = &args.start {
        markers.start = start.clone();
    }
    if let Some(end) = &args.end {
        markers.end = end.clone();
    }
    if args.no_end_markers {
        markers.end_markers = false;
    }
    markers.marker_set()
}

/// Drop the archive itself from a tree listing when it lives inside the tree.
fn exclude_output(tree: &Path, entries: Vec<String>, output: &Path) -> Vec<String> {
    let (Ok(tree), Ok(output)) = (std::path::absolute(tree), std::path::absolute(output)) else {
        return entries;
    };
    let Ok(relative) = output.strip_prefix(&tree) else {
        return entries;
    };
    let relative: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let relative = relative.join("/");

    entries.into_iter().filter(|e| *e != relative).collect()
}

fn fail(global: &GlobalOpts, command: &str, code: ExitCode, message: &str) -> ExitCode {
    debug!(command, exit_code = %code, "{message}");
    let text = render_error(global.format, command, code, message);
    match global.format {
        OutputFormat::Json => println!("{text}"),
        OutputFormat::Summary => eprintln!("{text}"),
    }
    code
}
