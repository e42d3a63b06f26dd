//! Entry points: run the converter, the rewriter, or both in sequence.
//!
//! The two stages share no in-memory state. The converter runs to
//! completion over the filesystem, then the rewriter re-walks the same tree
//! and derives its rename mappings from what is on disk *after* conversion —
//! including `.webp` files produced by earlier runs. That re-derivation is
//! what makes the whole run idempotent: a second invocation converts nothing
//! and rewrites nothing.

use crate::config::MigrateConfig;
use crate::error::MigrateError;
use crate::pipeline::{encode, rewrite, scan};
use crate::progress::{MigrateProgress, NoopProgress};
use crate::report::{ConvertStats, MigrationReport, RewriteStats};
use std::time::Instant;
use tracing::{info, warn};

/// Run the full convert-then-rewrite sequence.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(MigrationReport)` on success, even if some assets failed to convert
/// or the document was missing (check `report.convert` / `report.rewrite`).
///
/// # Errors
/// Returns `Err(MigrateError)` only for fatal conditions: missing image
/// root, or a document that exists but cannot be read or written back.
pub fn migrate(config: &MigrateConfig) -> Result<MigrationReport, MigrateError> {
    migrate_with_progress(config, &NoopProgress)
}

/// [`migrate`] with live per-asset progress events.
pub fn migrate_with_progress(
    config: &MigrateConfig,
    progress: &dyn MigrateProgress,
) -> Result<MigrationReport, MigrateError> {
    let start = Instant::now();
    info!(
        "Starting migration: root={} document={}",
        config.image_root.display(),
        config.document.display()
    );

    let convert = convert_images_with_progress(config, progress)?;
    let rewrite = rewrite_references(config)?;

    Ok(MigrationReport {
        convert: Some(convert),
        rewrite: Some(rewrite),
        total_duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Run only the conversion stage.
pub fn convert_images(config: &MigrateConfig) -> Result<ConvertStats, MigrateError> {
    convert_images_with_progress(config, &NoopProgress)
}

/// Conversion stage: ensure every qualifying source file under the image
/// root has a `.webp` sibling.
///
/// Per-asset failures are collected in [`ConvertStats::errors`] and never
/// abort the walk. Existing targets are skipped, never re-encoded.
pub fn convert_images_with_progress(
    config: &MigrateConfig,
    progress: &dyn MigrateProgress,
) -> Result<ConvertStats, MigrateError> {
    let start = Instant::now();
    let assets = scan::find_candidates(config)?;
    let total = assets.len();
    progress.on_convert_start(total);

    let mut stats = ConvertStats {
        candidates: total,
        ..Default::default()
    };

    for (i, asset) in assets.iter().enumerate() {
        let done = i + 1;
        if asset.target.exists() {
            stats.skipped += 1;
            progress.on_asset_skipped(done, total, &asset.source);
            continue;
        }

        info!(
            "Converting: {} -> {}",
            asset.source.display(),
            asset.target.display()
        );
        match encode::convert_asset(asset, config.quality) {
            Ok(()) => {
                stats.converted += 1;
                progress.on_asset_converted(done, total, &asset.source);
            }
            Err(e) => {
                warn!("Error converting {}: {e}", asset.source.display());
                progress.on_asset_error(done, total, &e);
                stats.errors.push(e);
            }
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Conversion complete. {} new WebP files created, {} skipped, {} errors.",
        stats.converted,
        stats.skipped,
        stats.errors.len()
    );
    progress.on_convert_complete(stats.converted, stats.skipped, stats.errors.len());
    Ok(stats)
}

/// Rewrite stage: point every textual reference to a converted file at its
/// `.webp` replacement.
///
/// A missing document is reported via [`RewriteStats::document_missing`]
/// rather than raised — the conversion stage's work stands either way. The
/// document is persisted in a single whole-file write, and only when the
/// rewritten buffer actually differs from what was loaded.
pub fn rewrite_references(config: &MigrateConfig) -> Result<RewriteStats, MigrateError> {
    let start = Instant::now();
    let mut stats = RewriteStats::default();

    if !config.document.exists() {
        warn!(
            "Document {} not found — skipping rewrite",
            config.document.display()
        );
        stats.document_missing = true;
        stats.duration_ms = start.elapsed().as_millis() as u64;
        return Ok(stats);
    }

    let original = std::fs::read_to_string(&config.document).map_err(|e| {
        MigrateError::DocumentReadFailed {
            path: config.document.clone(),
            source: e,
        }
    })?;

    let mappings = scan::find_rename_mappings(config)?;
    let (updated, replacements) = rewrite::apply_mappings(&original, &mappings);
    stats.replacements = replacements;

    if updated != original {
        std::fs::write(&config.document, &updated).map_err(|e| {
            MigrateError::DocumentWriteFailed {
                path: config.document.clone(),
                source: e,
            }
        })?;
        stats.document_modified = true;
        info!("Document updated: {}", config.document.display());
    } else {
        info!("No document changes needed.");
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    Ok(stats)
}
