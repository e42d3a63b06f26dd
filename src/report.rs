//! Run report types: what each stage did, for humans and for `--json`.
//!
//! Every entry point returns a [`MigrationReport`] even on partial failure —
//! per-asset conversion errors and a missing document are *reported*, not
//! raised, matching the two-tier error policy in [`crate::error`]. Only
//! conditions that make the whole run meaningless (missing image root,
//! unreadable document) surface as `Err(MigrateError)` instead.

use crate::error::AssetError;
use serde::{Deserialize, Serialize};

/// Combined result of a convert-then-rewrite run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Converter stage outcome. `None` when the stage was skipped
    /// (`rewrite_only` in the CLI).
    pub convert: Option<ConvertStats>,
    /// Rewriter stage outcome. `None` when the stage was skipped.
    pub rewrite: Option<RewriteStats>,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
}

impl MigrationReport {
    /// True when any per-asset error was recorded during conversion.
    pub fn has_asset_errors(&self) -> bool {
        self.convert.as_ref().is_some_and(|c| !c.errors.is_empty())
    }
}

/// Outcome of the conversion stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertStats {
    /// Files in a recognised source extension found under the root.
    pub candidates: usize,
    /// New `.webp` files created this run.
    pub converted: usize,
    /// Candidates skipped because their `.webp` sibling already existed.
    pub skipped: usize,
    /// Per-asset failures; the walk continued past each of them.
    pub errors: Vec<AssetError>,
    /// Stage duration in milliseconds.
    pub duration_ms: u64,
}

/// Outcome of the rewrite stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteStats {
    /// The document was absent; nothing was read or written.
    pub document_missing: bool,
    /// Substitutions actually performed, in application order.
    pub replacements: Vec<Replacement>,
    /// The buffer changed and was persisted back to the document path.
    pub document_modified: bool,
    /// Stage duration in milliseconds.
    pub duration_ms: u64,
}

/// One performed substitution (old text → new text, with occurrence count).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Exact text that was replaced (qualified path or bare filename).
    pub old: String,
    /// Text it was replaced with.
    pub new: String,
    /// Number of occurrences replaced.
    pub occurrences: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetError;
    use std::path::PathBuf;

    #[test]
    fn empty_report_has_no_asset_errors() {
        assert!(!MigrationReport::default().has_asset_errors());
    }

    #[test]
    fn report_with_convert_errors() {
        let report = MigrationReport {
            convert: Some(ConvertStats {
                errors: vec![AssetError::DecodeFailed {
                    path: PathBuf::from("x.png"),
                    detail: "truncated".into(),
                }],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(report.has_asset_errors());
    }

    #[test]
    fn report_serialises_to_json() {
        let report = MigrationReport {
            rewrite: Some(RewriteStats {
                replacements: vec![Replacement {
                    old: "banner.png".into(),
                    new: "banner.webp".into(),
                    occurrences: 2,
                }],
                document_modified: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("banner.webp"));
        assert!(json.contains("\"document_modified\":true"));
    }
}
