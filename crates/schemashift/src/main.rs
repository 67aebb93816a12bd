use anyhow::Context;
use clap::Parser;
use schemashift::{RunMode, RunOptions, SchemashiftConfig, discover, run};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemashift")]
#[command(version)]
#[command(about = "Rewrite runtypes schemas to zod")]
struct Cli {
    /// Files or directories to rewrite
    #[arg(value_name = "PATHS", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print rewritten files to stdout instead of writing them
    #[arg(long, conflicts_with_all = ["dry_run", "json"])]
    print: bool,

    /// File extensions to pick up from directories (overrides config)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit the report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Config file path (replaces global and project config)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run the batch. `Ok(false)` means at least one file failed.
fn execute(cli: Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => SchemashiftConfig::load_file(path)?,
        None => {
            let root = std::env::current_dir().context("failed to determine working directory")?;
            SchemashiftConfig::load(&root)?
        }
    };

    let rewrite = config.rewrite_options();
    rewrite.validate().context("invalid configuration")?;

    let extensions = if cli.extensions.is_empty() {
        config.extensions()
    } else {
        cli.extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect()
    };

    let mode = if cli.print {
        RunMode::Print
    } else if cli.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Write
    };

    let options = RunOptions {
        mode,
        rewrite,
        extensions,
        exclude: config.exclude(),
    };

    let files = discover(&cli.paths, &options).context("failed to collect input files")?;
    let report = run(&files, &options);

    if mode == RunMode::Print {
        let mut stdout = std::io::stdout().lock();
        for file in &report.files {
            if let Some(output) = &file.output {
                stdout
                    .write_all(output.as_bytes())
                    .context("failed to write to stdout")?;
            }
        }
    }

    if cli.json {
        println!("{}", report.to_json().context("failed to serialize report")?);
    } else {
        eprint!("{}", report.render_human(mode));
    }

    Ok(!report.has_errors())
}
