//! Error types for the webp-migrate library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`MigrateError`] — **Fatal**: the run cannot proceed at all (missing
//!   image root, unreadable document, invalid configuration). Returned as
//!   `Err(MigrateError)` from the top-level entry points.
//!
//! * [`AssetError`] — **Non-fatal**: a single image failed (corrupt file,
//!   encoder rejection, disk full on one write) but every other asset is
//!   fine. Stored inside [`crate::report::ConvertStats`] so callers can
//!   inspect partial success rather than losing the whole run to one bad
//!   file. A failed asset is retried naturally on the next run because its
//!   `.webp` sibling is still absent.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! asset failure, log and continue, or collect all errors for a post-run
//! report (the CLI does the latter).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the webp-migrate library.
///
/// Per-asset failures use [`AssetError`] and are stored in
/// [`crate::report::ConvertStats`] rather than propagated here.
#[derive(Debug, Error)]
pub enum MigrateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The configured image root does not exist or is not a directory.
    #[error("Image root not found: '{path}'\nCheck the path exists and is a readable directory.")]
    RootNotFound { path: PathBuf },

    /// Process does not have read permission on the image root.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Document errors ───────────────────────────────────────────────────
    /// The HTML document exists but could not be read.
    #[error("Failed to read document '{path}': {source}")]
    DocumentReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rewritten HTML document could not be written back.
    #[error("Failed to write document '{path}': {source}")]
    DocumentWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single image asset.
///
/// Stored in [`crate::report::ConvertStats::errors`] when an asset fails.
/// The conversion walk always continues with the next file.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum AssetError {
    /// The source image could not be decoded.
    #[error("'{path}': decode failed: {detail}")]
    DecodeFailed { path: PathBuf, detail: String },

    /// libwebp rejected the decoded pixel buffer.
    #[error("'{path}': WebP encode failed: {detail}")]
    EncodeFailed { path: PathBuf, detail: String },

    /// The encoded bytes could not be written to the sibling path.
    #[error("'{path}': write failed: {detail}")]
    WriteFailed { path: PathBuf, detail: String },
}

impl AssetError {
    /// Path of the source asset this error belongs to.
    pub fn path(&self) -> &PathBuf {
        match self {
            AssetError::DecodeFailed { path, .. }
            | AssetError::EncodeFailed { path, .. }
            | AssetError::WriteFailed { path, .. } => path,
        }
    }
}
