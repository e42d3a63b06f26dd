//! Configuration types for an image migration run.
//!
//! All run behaviour is controlled through [`MigrateConfig`], built via its
//! [`MigrateConfigBuilder`]. The original site scripts kept these values as
//! module-level constants; promoting them to an explicit config value means
//! both stages receive the same state, runs can be serialised for logging,
//! and two runs can be diffed to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers almost always want the defaults that match the catalog layout
//! (`img/product`, `products.html`, quality 85). The builder lets them set
//! only what they care about and relies on documented defaults for the rest.

use crate::error::MigrateError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extensions recognised as convertible sources, in match order.
///
/// Matching is case-sensitive, which is why both-case variants are listed
/// explicitly. Mixed-case names (`photo.Png`) are not matched — a known,
/// documented gap inherited from the site this tool maintains.
pub const DEFAULT_SOURCE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "PNG", "JPG", "JPEG"];

/// Extension of the produced files and of rewritten references.
pub const TARGET_EXTENSION: &str = "webp";

/// Configuration for a convert-and-rewrite run.
///
/// Built via [`MigrateConfig::builder()`] or using
/// [`MigrateConfig::default()`].
///
/// # Example
/// ```rust
/// use webp_migrate::MigrateConfig;
///
/// let config = MigrateConfig::builder()
///     .image_root("img/product")
///     .document("products.html")
///     .quality(85.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Root of the image tree to walk, recursively. Default: `img/product`.
    pub image_root: PathBuf,

    /// The HTML document whose references are rewritten. Default: `products.html`.
    ///
    /// Path-qualified references inside the document are resolved relative to
    /// this file's parent directory, so the document is expected to sit at the
    /// site root, above `image_root`.
    pub document: PathBuf,

    /// Source extensions eligible for conversion, matched case-sensitively
    /// and in this order when the rewriter enumerates candidate old names.
    /// Default: [`DEFAULT_SOURCE_EXTENSIONS`].
    pub source_extensions: Vec<String>,

    /// WebP encode quality on a 0–100 scale. Default: 85.
    ///
    /// 85 is the long-standing setting for this catalog: visually
    /// indistinguishable from the JPEG/PNG sources at roughly a third of the
    /// byte size. The alpha plane is carried losslessly by libwebp regardless
    /// of this value, so transparency survives the lossy path.
    pub quality: f32,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            image_root: PathBuf::from("img/product"),
            document: PathBuf::from("products.html"),
            source_extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            quality: 85.0,
        }
    }
}

impl MigrateConfig {
    /// Create a new builder for `MigrateConfig`.
    pub fn builder() -> MigrateConfigBuilder {
        MigrateConfigBuilder {
            config: Self::default(),
        }
    }

    /// Directory that path-qualified document references are relative to.
    ///
    /// An empty parent (document in the current directory) resolves to `.`.
    pub fn document_dir(&self) -> PathBuf {
        match self.document.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Builder for [`MigrateConfig`].
#[derive(Debug)]
pub struct MigrateConfigBuilder {
    config: MigrateConfig,
}

impl MigrateConfigBuilder {
    pub fn image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.image_root = root.into();
        self
    }

    pub fn document(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.document = path.into();
        self
    }

    pub fn source_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.source_extensions = exts.into_iter().map(Into::into).collect();
        self
    }

    pub fn quality(mut self, q: f32) -> Self {
        self.config.quality = q.clamp(0.0, 100.0);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<MigrateConfig, MigrateError> {
        let c = &self.config;
        if !(0.0..=100.0).contains(&c.quality) {
            return Err(MigrateError::InvalidConfig(format!(
                "quality must be 0–100, got {}",
                c.quality
            )));
        }
        if c.source_extensions.is_empty() {
            return Err(MigrateError::InvalidConfig(
                "source extension set must not be empty".into(),
            ));
        }
        if let Some(bad) = c
            .source_extensions
            .iter()
            .find(|e| e.starts_with('.') || e.eq_ignore_ascii_case(TARGET_EXTENSION))
        {
            return Err(MigrateError::InvalidConfig(format!(
                "invalid source extension '{bad}': list extensions without the leading dot, \
                 and '{TARGET_EXTENSION}' cannot be a source"
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_catalog_layout() {
        let c = MigrateConfig::default();
        assert_eq!(c.image_root, PathBuf::from("img/product"));
        assert_eq!(c.document, PathBuf::from("products.html"));
        assert_eq!(c.quality, 85.0);
        assert_eq!(c.source_extensions.len(), 6);
    }

    #[test]
    fn builder_clamps_quality() {
        let c = MigrateConfig::builder().quality(250.0).build().unwrap();
        assert_eq!(c.quality, 100.0);
        let c = MigrateConfig::builder().quality(-3.0).build().unwrap();
        assert_eq!(c.quality, 0.0);
    }

    #[test]
    fn empty_extension_set_rejected() {
        let err = MigrateConfig::builder()
            .source_extensions(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, MigrateError::InvalidConfig(_)));
    }

    #[test]
    fn dotted_extension_rejected() {
        let err = MigrateConfig::builder()
            .source_extensions([".png"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains(".png"));
    }

    #[test]
    fn webp_as_source_rejected() {
        let err = MigrateConfig::builder()
            .source_extensions(["png", "WEBP"])
            .build()
            .unwrap_err();
        assert!(matches!(err, MigrateError::InvalidConfig(_)));
    }

    #[test]
    fn document_dir_of_bare_filename_is_cwd() {
        let c = MigrateConfig::default();
        assert_eq!(c.document_dir(), PathBuf::from("."));
        let c = MigrateConfig::builder()
            .document("site/products.html")
            .build()
            .unwrap();
        assert_eq!(c.document_dir(), PathBuf::from("site"));
    }
}
