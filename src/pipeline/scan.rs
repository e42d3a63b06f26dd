//! Tree scanning: candidate discovery and rename-mapping derivation.
//!
//! Both stages re-derive their state from the filesystem instead of sharing
//! an in-memory list: the converter scans for sources in a recognised
//! extension, the rewriter scans for `.webp` files that exist *now* — which
//! includes files produced by earlier runs and files whose source has since
//! been deleted. Deriving mappings from what is actually on disk is what
//! guarantees the rewriter never points the document at a missing file.
//!
//! Walk order is sorted by file name at every level so two runs over the
//! same tree always discover, convert, and substitute in the same order.

use crate::config::{MigrateConfig, TARGET_EXTENSION};
use crate::error::MigrateError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A convertible source image discovered under the image root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Path of the source file.
    pub source: PathBuf,
    /// Path of the same-stem `.webp` sibling, whether or not it exists yet.
    pub target: PathBuf,
}

/// One old-name → new-name correspondence for the rewriter, derived from a
/// `.webp` file that exists on disk paired with one candidate old extension.
///
/// The old source file does not have to exist — only the `.webp` file does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameMapping {
    /// Document-relative old path with forward slashes, e.g.
    /// `img/product/banner.png`. `None` when the file is not under the
    /// document's directory (the bare pass still applies).
    pub qualified_old: Option<String>,
    /// Document-relative new path, e.g. `img/product/banner.webp`.
    pub qualified_new: Option<String>,
    /// Bare old filename, e.g. `banner.png`.
    pub bare_old: String,
    /// Bare new filename, e.g. `banner.webp`.
    pub bare_new: String,
}

/// Find all files under the image root whose extension is in the configured
/// source set (case-sensitive).
///
/// # Errors
/// [`MigrateError::RootNotFound`] / [`MigrateError::PermissionDenied`] when
/// the root itself cannot be read. Errors on individual subtrees are logged
/// and skipped.
pub fn find_candidates(config: &MigrateConfig) -> Result<Vec<ImageAsset>, MigrateError> {
    check_root(&config.image_root)?;

    let mut assets = Vec::new();
    for entry in sorted_walk(&config.image_root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if config.source_extensions.iter().any(|s| s.as_str() == ext) {
            assets.push(ImageAsset {
                source: path.to_path_buf(),
                target: path.with_extension(TARGET_EXTENSION),
            });
        }
    }
    debug!("Found {} convertible candidates", assets.len());
    Ok(assets)
}

/// Derive the rename mappings from every `.webp` file currently under the
/// image root: one mapping per file per configured source extension, in walk
/// order then extension-list order.
///
/// The `.webp` extension itself is matched case-insensitively, mirroring how
/// the produced files were always picked up regardless of case.
pub fn find_rename_mappings(config: &MigrateConfig) -> Result<Vec<RenameMapping>, MigrateError> {
    check_root(&config.image_root)?;
    let document_dir = config.document_dir();

    let mut mappings = Vec::new();
    for entry in sorted_walk(&config.image_root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_target = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(TARGET_EXTENSION));
        if !is_target {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!("Skipping non-UTF-8 file name: {}", path.display());
            continue;
        };

        let prefix = document_relative_prefix(path, &document_dir);
        let bare_new = format!("{stem}.{TARGET_EXTENSION}");
        for ext in &config.source_extensions {
            let bare_old = format!("{stem}.{ext}");
            let (qualified_old, qualified_new) = match &prefix {
                Some(p) => (Some(format!("{p}/{bare_old}")), Some(format!("{p}/{bare_new}"))),
                None => (None, None),
            };
            mappings.push(RenameMapping {
                qualified_old,
                qualified_new,
                bare_old,
                bare_new: bare_new.clone(),
            });
        }
    }
    debug!("Derived {} rename mappings", mappings.len());
    Ok(mappings)
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn check_root(root: &Path) -> Result<(), MigrateError> {
    match std::fs::read_dir(root) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(MigrateError::PermissionDenied {
                path: root.to_path_buf(),
            })
        }
        Err(_) => Err(MigrateError::RootNotFound {
            path: root.to_path_buf(),
        }),
    }
}

fn sorted_walk(root: &Path) -> walkdir::IntoIter {
    WalkDir::new(root).sort_by_file_name().into_iter()
}

/// Directory prefix of `path` as it would appear in the document, i.e. the
/// parent directory relative to the document's own directory, joined with
/// forward slashes. HTML always uses `/` regardless of host separator.
fn document_relative_prefix(path: &Path, document_dir: &Path) -> Option<String> {
    let parent = path.parent()?;
    let relative = if document_dir == Path::new(".") {
        parent
    } else {
        parent.strip_prefix(document_dir).ok()?
    };
    let mut parts = Vec::new();
    for comp in relative.components() {
        match comp {
            std::path::Component::Normal(c) => parts.push(c.to_str()?.to_string()),
            std::path::Component::CurDir => continue,
            // Anything else (.., /, C:\) cannot appear in a document-relative
            // reference; fall back to bare-only substitution.
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn config_for(root: &Path, document: &Path) -> MigrateConfig {
        MigrateConfig::builder()
            .image_root(root)
            .document(document)
            .build()
            .unwrap()
    }

    #[test]
    fn candidates_match_case_sensitively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img/product");
        touch(&root.join("a.png"));
        touch(&root.join("b.JPG"));
        touch(&root.join("c.Png")); // mixed case: not in the set
        touch(&root.join("d.gif")); // unrecognised format
        touch(&root.join("e.webp")); // already a target

        let config = config_for(&root, &dir.path().join("products.html"));
        let assets = find_candidates(&config).unwrap();
        let names: Vec<_> = assets
            .iter()
            .map(|a| a.source.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
        assert_eq!(
            assets[0].target.file_name().unwrap().to_str().unwrap(),
            "a.webp"
        );
    }

    #[test]
    fn candidates_recurse_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img");
        touch(&root.join("deep/nested/x.jpeg"));

        let config = config_for(&root, &dir.path().join("products.html"));
        let assets = find_candidates(&config).unwrap();
        assert_eq!(assets.len(), 1);
        assert!(assets[0].target.ends_with("deep/nested/x.webp"));
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("nope"), &dir.path().join("p.html"));
        assert!(matches!(
            find_candidates(&config),
            Err(MigrateError::RootNotFound { .. })
        ));
    }

    #[test]
    fn mappings_pair_every_source_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img/product");
        touch(&root.join("banner.webp"));

        let config = config_for(&root, &dir.path().join("products.html"));
        let mappings = find_rename_mappings(&config).unwrap();
        // One mapping per configured extension, old file present or not.
        assert_eq!(mappings.len(), config.source_extensions.len());
        assert!(mappings.iter().any(|m| m.bare_old == "banner.png"));
        assert!(mappings.iter().any(|m| m.bare_old == "banner.JPEG"));
        assert!(mappings.iter().all(|m| m.bare_new == "banner.webp"));
    }

    #[test]
    fn mappings_qualify_relative_to_document_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img/product");
        touch(&root.join("banner.webp"));
        touch(&root.join("end/last.webp"));

        let config = config_for(&root, &dir.path().join("products.html"));
        let mappings = find_rename_mappings(&config).unwrap();

        let banner = mappings.iter().find(|m| m.bare_old == "banner.png").unwrap();
        assert_eq!(
            banner.qualified_old.as_deref(),
            Some("img/product/banner.png")
        );
        assert_eq!(
            banner.qualified_new.as_deref(),
            Some("img/product/banner.webp")
        );

        let last = mappings.iter().find(|m| m.bare_old == "last.png").unwrap();
        assert_eq!(
            last.qualified_old.as_deref(),
            Some("img/product/end/last.png")
        );
    }

    #[test]
    fn mappings_match_target_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img");
        touch(&root.join("shout.WEBP"));

        let config = config_for(&root, &dir.path().join("products.html"));
        let mappings = find_rename_mappings(&config).unwrap();
        assert!(!mappings.is_empty());
        assert!(mappings.iter().all(|m| m.bare_new == "shout.webp"));
    }

    #[test]
    fn walk_order_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img");
        for name in ["z.webp", "a.webp", "m.webp"] {
            touch(&root.join(name));
        }
        let config = config_for(&root, &dir.path().join("products.html"));
        let first: Vec<_> = find_rename_mappings(&config)
            .unwrap()
            .into_iter()
            .map(|m| m.bare_old)
            .collect();
        let second: Vec<_> = find_rename_mappings(&config)
            .unwrap()
            .into_iter()
            .map(|m| m.bare_old)
            .collect();
        assert_eq!(first, second);
        assert!(first[0].starts_with('a'));
    }
}
