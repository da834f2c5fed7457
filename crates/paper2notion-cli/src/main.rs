//! paper2notion: CLI tool to convert Dropbox Paper Markdown to Notion-friendly Markdown

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};
use std::fs;
use std::path::{Path, PathBuf};

use config::{CONFIG_FILE_NAME, Config};
use paper2notion_core::{ConvertOptions, convert_directory, convert_file};

#[derive(Parser, Debug)]
#[command(name = "paper2notion")]
#[command(about = "Convert Dropbox Paper Markdown to Notion-friendly Markdown")]
#[command(version)]
#[command(subcommand_negates_reqs = true, args_conflicts_with_subcommands = true)]
#[command(after_help = "Examples:
  paper2notion My_Notes.md out/                     # Write out/My Notes.md
  paper2notion My_Notes.md out/ --line-break-trick  # Keep blank lines in Notion
  paper2notion export/ out/ -r                      # Convert a whole export
  paper2notion init                                 # Create _paper2notion.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Input Markdown file (or directory) exported from Paper
    #[arg(required = true)]
    input: Option<PathBuf>,

    /// Directory to write the converted Markdown to (created if absent)
    #[arg(required = true)]
    output_dir: Option<PathBuf>,

    /// Insert a marker line before blank lines so Notion does not collapse them
    #[arg(long)]
    line_break_trick: bool,

    /// Disable the line-break trick even if the config file enables it
    #[arg(long, conflicts_with = "line_break_trick")]
    no_line_break_trick: bool,

    /// Configuration file (defaults to _paper2notion.toml next to the input)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Number of parallel jobs for directories (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a sample configuration file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Print the JSON schema of the configuration file to stdout instead
        #[arg(long)]
        schema: bool,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.verbose, cli.quiet);

    if let Some(Command::Init {
        output,
        schema,
        force,
    }) = &cli.command
    {
        return run_init(output, *schema, *force);
    }

    let (Some(input), Some(output_dir)) = (cli.input.as_deref(), cli.output_dir.as_deref())
    else {
        anyhow::bail!("Both <INPUT> and <OUTPUT_DIR> are required");
    };

    let input = std::path::absolute(input)
        .with_context(|| format!("Failed to resolve path: {}", input.display()))?;
    let output_dir = std::path::absolute(output_dir)
        .with_context(|| format!("Failed to resolve path: {}", output_dir.display()))?;

    if input.is_file() {
        let config = load_config(cli.config.as_deref(), input.parent())?;
        convert_single_file(&cli, &config, &input, &output_dir)
    } else if input.is_dir() {
        let config = load_config(cli.config.as_deref(), Some(input.as_path()))?;
        convert_export_directory(&cli, &config, &input, &output_dir)
    } else {
        anyhow::bail!("Input file not found: {}", input.display());
    }
}

fn init_logger(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

/// Load the explicit config file, or `_paper2notion.toml` from `dir` if present
fn load_config(explicit: Option<&Path>, dir: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        debug!("Loading config from {}", path.display());
        return Config::load(path);
    }

    match dir {
        Some(dir) => {
            let config = Config::load_from_dir(dir)?;
            if config.is_some() {
                debug!("Loaded {} from {}", CONFIG_FILE_NAME, dir.display());
            }
            Ok(config.unwrap_or_default())
        }
        None => Ok(Config::default()),
    }
}

/// Command-line flags take precedence over the config file
fn convert_options(cli: &Cli, config: &Config) -> ConvertOptions {
    let line_break_trick = if cli.no_line_break_trick {
        false
    } else if cli.line_break_trick {
        true
    } else {
        config.convert.line_break_trick.unwrap_or(false)
    };

    ConvertOptions { line_break_trick }
}

/// Convert a single Paper export
fn convert_single_file(
    cli: &Cli,
    config: &Config,
    input: &Path,
    output_dir: &Path,
) -> Result<()> {
    let options = convert_options(cli, config);

    if cli.verbose {
        eprintln!(
            "Converting: {} -> {} (line-break trick: {})",
            input.display(),
            output_dir.display(),
            if options.line_break_trick { "on" } else { "off" }
        );
    }

    let result = convert_file(input, output_dir, &options)?;

    if cli.verbose {
        let stats = &result.stats;
        eprintln!(
            "{} checkboxes converted, {} lines inserted",
            stats.checkboxes_converted,
            stats.inserted_lines()
        );
    }

    if !cli.quiet {
        println!("Converted file written to: {}", result.output.display());
    }

    Ok(())
}

/// Convert every Markdown file of a Paper export directory
fn convert_export_directory(
    cli: &Cli,
    config: &Config,
    input: &Path,
    output_dir: &Path,
) -> Result<()> {
    let options = convert_options(cli, config);
    let recursive = cli.recursive || config.directory.recursive.unwrap_or(false);

    // Configure thread pool if jobs specified
    if let Some(n) = cli.jobs.or(config.directory.jobs) {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let result = convert_directory(input, output_dir, &options, recursive)?;

    let total = result.converted.len() + result.failed.len();
    if total == 0 {
        if !cli.quiet {
            eprintln!("No .md files found in {}", input.display());
        }
        return Ok(());
    }

    if !cli.quiet {
        for file in &result.converted {
            println!("{}", file.output.display());
        }
    }

    // Report errors
    for (file, e) in &result.failed {
        eprintln!("Error converting {}: {}", file.display(), e);
    }

    if cli.verbose {
        eprintln!(
            "{} checkboxes converted, {} lines inserted",
            result.stats.checkboxes_converted,
            result.stats.inserted_lines()
        );
    }

    if !cli.quiet {
        eprintln!(
            "Converted {} files, {} failed",
            result.converted.len(),
            result.failed.len()
        );
    }

    if !result.failed.is_empty() {
        anyhow::bail!("{} files failed to convert", result.failed.len());
    }

    Ok(())
}

/// Write a sample config file, or print the JSON schema
fn run_init(output: &Path, schema: bool, force: bool) -> Result<()> {
    if schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }

    if output.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    let content = Config::sample().to_toml_with_schema()?;
    fs::write(output, content)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    println!("Created {}", output.display());

    Ok(())
}
