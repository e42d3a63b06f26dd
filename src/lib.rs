//! # webp-migrate
//!
//! Batch-convert a static site's catalog images to WebP and rewrite the HTML
//! references that point at them.
//!
//! ## Why this crate?
//!
//! A product catalog accumulates hundreds of PNG/JPEG images referenced from
//! one HTML document, both as `src="img/product/…"` paths and as bare
//! filenames in `data-images` gallery attributes. Migrating to WebP by hand
//! means re-encoding each file *and* hunting down every reference — and the
//! two drift apart the moment one is done without the other. This tool does
//! both in one run and keeps them consistent by construction: references are
//! only rewritten toward `.webp` files that actually exist on disk.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image tree + HTML document
//!  │
//!  ├─ 1. Scan     walk the tree for sources in a recognised extension
//!  ├─ 2. Convert  decode + encode WebP (quality 85), skip existing targets
//!  ├─ 3. Re-scan  derive rename mappings from the .webp files now on disk
//!  └─ 4. Rewrite  substitute old references in the document, write if dirty
//! ```
//!
//! Everything is synchronous and sequential; a run either completes or the
//! process exits. Per-file conversion failures are collected and reported,
//! never raised. Both stages are idempotent: a second run converts nothing
//! and leaves the document byte-identical.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use webp_migrate::{migrate, MigrateConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MigrateConfig::default(); // img/product + products.html
//!     let report = migrate(&config)?;
//!     if let Some(convert) = &report.convert {
//!         println!("{} new WebP files", convert.converted);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `webp-migrate` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! webp-migrate = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod migrate;
pub mod pipeline;
pub mod progress;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{MigrateConfig, MigrateConfigBuilder, DEFAULT_SOURCE_EXTENSIONS, TARGET_EXTENSION};
pub use error::{AssetError, MigrateError};
pub use migrate::{
    convert_images, convert_images_with_progress, migrate, migrate_with_progress,
    rewrite_references,
};
pub use progress::{MigrateProgress, NoopProgress};
pub use report::{ConvertStats, MigrationReport, Replacement, RewriteStats};
