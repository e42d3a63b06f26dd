//! CLI binary for webp-migrate.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `MigrateConfig`, renders progress, and prints the run report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use webp_migrate::{
    convert_images_with_progress, rewrite_references, AssetError, MigrateConfig, MigrateProgress,
    MigrationReport,
};

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

// ── CLI progress using indicatif ─────────────────────────────────────────────

/// Terminal progress: a bar over the candidate count with per-file log lines.
/// The converter is strictly sequential, so events arrive in order.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Converting");
        Self { bar }
    }
}

impl MigrateProgress for CliProgress {
    fn on_convert_start(&self, candidates: usize) {
        self.bar.set_length(candidates as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Scanning found {candidates} candidate images"))
        ));
    }

    fn on_asset_converted(&self, _done: usize, _total: usize, source: &Path) {
        self.bar
            .println(format!("  {} {}", green("✓"), source.display()));
        self.bar.inc(1);
    }

    fn on_asset_skipped(&self, _done: usize, _total: usize, source: &Path) {
        self.bar.println(format!(
            "  {} {}  {}",
            dim("·"),
            dim(&source.display().to_string()),
            dim("(webp exists)")
        ));
        self.bar.inc(1);
    }

    fn on_asset_error(&self, _done: usize, _total: usize, error: &AssetError) {
        self.bar
            .println(format!("  {} {}", red("✗"), red(&error.to_string())));
        self.bar.inc(1);
    }

    fn on_convert_complete(&self, converted: usize, skipped: usize, failed: usize) {
        self.bar.finish_and_clear();
        let tick = if failed == 0 { green("✔") } else { cyan("⚠") };
        eprintln!(
            "{tick} {} converted  {} skipped  {}",
            bold(&converted.to_string()),
            skipped,
            if failed == 0 {
                dim("0 errors")
            } else {
                red(&format!("{failed} errors"))
            }
        );
    }
}

/// Silent progress for `--quiet` / `--no-progress` / `--json`.
struct SilentProgress;
impl MigrateProgress for SilentProgress {}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Full run with the catalog defaults (img/product + products.html)
  webp-migrate

  # Different tree and document
  webp-migrate --root assets/img --document index.html

  # Re-encode new files at a different quality
  webp-migrate --quality 70

  # Only create missing .webp files; leave the document alone
  webp-migrate --convert-only

  # Only rewrite references (e.g. after copying in pre-converted files)
  webp-migrate --rewrite-only

  # Machine-readable report
  webp-migrate --json > report.json

NOTES:
  Source extension matching is case-sensitive; the default set is
  png, jpg, jpeg, PNG, JPG, JPEG. Existing .webp files are never
  overwritten, so re-running is always safe. Per-file conversion errors
  and a missing document are reported but do not fail the process;
  only a missing image root or an unreadable document does."#;

/// Convert catalog images to WebP and rewrite HTML references.
#[derive(Parser, Debug)]
#[command(
    name = "webp-migrate",
    version,
    about = "Convert catalog images to WebP and rewrite HTML references",
    long_about = "Walk an image directory tree, create a .webp sibling for every PNG/JPEG that \
does not have one yet, then rewrite all references to the converted files inside one HTML \
document. Both stages are idempotent; re-running converts and rewrites nothing.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Root of the image tree to walk recursively.
    #[arg(short, long, env = "WEBP_MIGRATE_ROOT", default_value = "img/product")]
    root: PathBuf,

    /// HTML document whose references are rewritten.
    #[arg(
        short,
        long,
        env = "WEBP_MIGRATE_DOCUMENT",
        default_value = "products.html"
    )]
    document: PathBuf,

    /// WebP encode quality (0–100).
    #[arg(short, long, env = "WEBP_MIGRATE_QUALITY", default_value_t = 85.0)]
    quality: f32,

    /// Run only the conversion stage.
    #[arg(long, conflicts_with = "rewrite_only")]
    convert_only: bool,

    /// Run only the rewrite stage.
    #[arg(long)]
    rewrite_only: bool,

    /// Output the run report as pretty JSON instead of human-readable lines.
    #[arg(long, env = "WEBP_MIGRATE_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "WEBP_MIGRATE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "WEBP_MIGRATE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(long, env = "WEBP_MIGRATE_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar and its per-file lines already show everything that matters.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = MigrateConfig::builder()
        .image_root(&cli.root)
        .document(&cli.document)
        .quality(cli.quality)
        .build()
        .context("Invalid configuration")?;

    // ── Run stages ───────────────────────────────────────────────────────
    let progress: Box<dyn MigrateProgress> = if show_progress {
        Box::new(CliProgress::new())
    } else {
        Box::new(SilentProgress)
    };

    let start = std::time::Instant::now();
    let mut report = MigrationReport::default();

    if !cli.rewrite_only {
        let stats = convert_images_with_progress(&config, progress.as_ref())
            .context("Conversion stage failed")?;
        report.convert = Some(stats);
    }

    if !cli.convert_only {
        let stats = rewrite_references(&config).context("Rewrite stage failed")?;
        report.rewrite = Some(stats);
    }
    report.total_duration_ms = start.elapsed().as_millis() as u64;

    // ── Print report ─────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(json.as_bytes()).ok();
        handle.write_all(b"\n").ok();
        return Ok(());
    }

    if !cli.quiet {
        print_human_report(&report);
    }

    Ok(())
}

fn print_human_report(report: &MigrationReport) {
    if let Some(convert) = &report.convert {
        println!(
            "Conversion complete. {} new WebP files created.",
            convert.converted
        );
        if !convert.errors.is_empty() {
            println!("\nErrors encountered:");
            for err in &convert.errors {
                println!("  {}", red(&err.to_string()));
            }
        }
    }

    if let Some(rewrite) = &report.rewrite {
        if rewrite.document_missing {
            println!("{}", red("Document not found — no references rewritten."));
        } else {
            for r in &rewrite.replacements {
                println!(
                    "Updating reference: {} -> {} {}",
                    r.old,
                    r.new,
                    dim(&format!("({}x)", r.occurrences))
                );
            }
            if rewrite.document_modified {
                println!("{}", green("Document updated successfully."));
            } else {
                println!("No document changes needed.");
            }
        }
    }

    println!("{}", dim(&format!("{}ms total", report.total_duration_ms)));
}
