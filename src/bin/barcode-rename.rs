//! CLI binary for barcode-rename.
//!
//! A thin shim over the library crate that maps CLI flags to `RenameConfig`,
//! expands folders, and prints the batch log.

use anyhow::{Context, Result};
use barcode_rename::{
    banner, process_batch, scan_folder, BatchProgressCallback, BatchStats, FileReport,
    LengthPolicy, NamePolicy, Outcome, ProgressCallback, RenameConfig, NO_IMAGES_MESSAGE,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a coloured line per
/// finished file.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Renaming");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
    }

    fn on_file_start(&self, _index: usize, _total: usize, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(name);
    }

    fn on_file_complete(&self, index: usize, total: usize, report: &FileReport) {
        let name = report.path.display().to_string();
        let (mark, detail) = match &report.outcome {
            Outcome::Renamed { to, .. } => (green("✓"), format!("→ {}", to.display())),
            Outcome::SkippedNoBarcode => (dim("·"), dim("no barcode")),
            Outcome::SkippedNoValidBarcode => (dim("·"), dim("no barcode of valid length")),
            Outcome::SkippedAlreadyNamed => (dim("·"), dim("already named")),
            Outcome::Error { message } => (red("✗"), red(message)),
        };
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            mark,
            index + 1,
            total,
            name,
            detail
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, stats: &BatchStats) {
        self.bar.finish_and_clear();
        let mark = if stats.errors == 0 {
            green("✔")
        } else if stats.errors == stats.total {
            red("✘")
        } else {
            cyan("⚠")
        };
        eprintln!(
            "{} {} renamed, {} skipped, {} errors  {}",
            mark,
            bold(&stats.renamed.to_string()),
            stats.skipped(),
            if stats.errors == 0 {
                stats.errors.to_string()
            } else {
                red(&stats.errors.to_string())
            },
            dim(&format!("{}ms", stats.duration_ms)),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Rename every image in a folder
  barcode-rename ./scans

  # Individual files
  barcode-rename IMG_0001.jpg IMG_0002.png

  # Accept 8–13 character barcodes (EAN-8 up to EAN-13)
  barcode-rename --min-len 8 --max-len 13 ./scans

  # Replace characters that are not allowed in file names
  barcode-rename --name-policy replace --replacement - ./scans

  # Machine-readable report
  barcode-rename --json ./scans > report.json

FILE NAMES:
  The first barcode whose length is within [--min-len, --max-len] becomes the
  new base name; the extension is kept. If the name is taken, _1, _2, … is
  appended. Files already named after their barcode are skipped.

ENVIRONMENT VARIABLES:
  BARCODE_RENAME_MIN_LEN, BARCODE_RENAME_MAX_LEN, BARCODE_RENAME_NAME_POLICY, …
  RUST_LOG                Override the tracing filter (e.g. barcode_rename=debug)
"#;

/// Rename image files to the barcode they contain.
#[derive(Parser, Debug)]
#[command(
    name = "barcode-rename",
    version,
    about = "Rename image files to the barcode they contain",
    long_about = "Decode the barcodes in each image and rename the file to the first barcode \
whose length satisfies the length policy. Folders are expanded to the PNG, JPEG and BMP files \
directly inside them.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image files and/or folders to process.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Minimum accepted barcode length (characters).
    #[arg(long, env = "BARCODE_RENAME_MIN_LEN", default_value_t = LengthPolicy::DEFAULT_MIN)]
    min_len: usize,

    /// Maximum accepted barcode length (characters).
    #[arg(long, env = "BARCODE_RENAME_MAX_LEN", default_value_t = LengthPolicy::DEFAULT_MAX)]
    max_len: usize,

    /// What to do with barcodes that are not valid file names.
    #[arg(long, env = "BARCODE_RENAME_NAME_POLICY", value_enum, default_value = "reject")]
    name_policy: NamePolicyArg,

    /// Replacement character for `--name-policy replace`.
    #[arg(long, env = "BARCODE_RENAME_REPLACEMENT", default_value_t = '_')]
    replacement: char,

    /// Retries when a rename fails because the file is busy.
    #[arg(long, env = "BARCODE_RENAME_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// Initial back-off between rename retries, in milliseconds.
    #[arg(long, env = "BARCODE_RENAME_RETRY_BACKOFF_MS", default_value_t = 100)]
    retry_backoff_ms: u64,

    /// Fixed pause before every rename, in milliseconds.
    #[arg(long, env = "BARCODE_RENAME_SETTLE_DELAY_MS", default_value_t = 0)]
    settle_delay_ms: u64,

    /// Output the structured report as JSON instead of the log.
    #[arg(long, env = "BARCODE_RENAME_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "BARCODE_RENAME_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BARCODE_RENAME_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BARCODE_RENAME_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum NamePolicyArg {
    Reject,
    Replace,
    Verbatim,
}

impl NamePolicyArg {
    fn into_policy(self, replacement: char) -> NamePolicy {
        match self {
            NamePolicyArg::Reject => NamePolicy::Reject,
            NamePolicyArg::Replace => NamePolicy::Replace(replacement),
            NamePolicyArg::Verbatim => NamePolicy::Verbatim,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar and log lines are the user-facing output; library
    // tracing stays at warn unless asked for.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Expand inputs ────────────────────────────────────────────────────
    let files = expand_inputs(&cli.inputs).await?;
    if files.is_empty() {
        eprintln!("{NO_IMAGES_MESSAGE}");
        return Ok(());
    }

    if !cli.quiet && !cli.json {
        for line in banner(&config) {
            eprintln!("{line}");
        }
    }

    // ── Run batch ────────────────────────────────────────────────────────
    let report = process_batch(&files, &config)
        .await
        .context("Batch failed")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else if !cli.quiet {
        for line in &report.log {
            writeln!(handle, "{line}").context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Map CLI args to `RenameConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RenameConfig> {
    let mut builder = RenameConfig::builder()
        .length_policy(LengthPolicy::new(cli.min_len, cli.max_len))
        .name_policy(cli.name_policy.clone().into_policy(cli.replacement))
        .max_retries(cli.max_retries)
        .retry_backoff_ms(cli.retry_backoff_ms)
        .settle_delay_ms(cli.settle_delay_ms);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Replace every folder in `inputs` by the images directly inside it.
async fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if tokio::fs::metadata(input)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            let found = scan_folder(input)
                .await
                .with_context(|| format!("Failed to scan folder {:?}", input))?;
            if found.is_empty() {
                eprintln!("{}: {NO_IMAGES_MESSAGE}", input.display());
            }
            files.extend(found);
        } else {
            // Unreadable files are reported per file by the batch itself.
            files.push(input.clone());
        }
    }
    Ok(files)
}
