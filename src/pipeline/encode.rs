//! Image encoding: source raster file → `.webp` sibling on disk.
//!
//! Decoding goes through the `image` crate; encoding goes through the
//! `webp` crate (libwebp bindings) because the pure-Rust WebP encoder in
//! `image` is lossless-only and this tool encodes at a fixed lossy quality.
//!
//! ## Alpha handling
//! Sources whose color type carries an alpha channel (RGBA, LumaA) are fed
//! to libwebp through the RGBA path; everything else goes through RGB.
//! libwebp stores the alpha plane losslessly even in lossy mode, so
//! transparency survives the quality setting untouched.
//!
//! The decoded pixel buffer lives only for the duration of one call — each
//! asset is decoded, encoded, written, and freed before the walk moves on.

use crate::error::AssetError;
use crate::pipeline::scan::ImageAsset;
use image::DynamicImage;
use tracing::debug;

/// Decode `asset.source` and write its WebP encoding to `asset.target`.
///
/// Never overwrites: callers skip assets whose target already exists.
/// Failures carry the source path so they can be aggregated per file.
pub fn convert_asset(asset: &ImageAsset, quality: f32) -> Result<(), AssetError> {
    let img = image::open(&asset.source).map_err(|e| AssetError::DecodeFailed {
        path: asset.source.clone(),
        detail: e.to_string(),
    })?;

    let bytes = encode_webp(&img, quality).map_err(|detail| AssetError::EncodeFailed {
        path: asset.source.clone(),
        detail,
    })?;

    std::fs::write(&asset.target, &bytes).map_err(|e| AssetError::WriteFailed {
        path: asset.source.clone(),
        detail: e.to_string(),
    })?;

    debug!(
        "Encoded {} → {} ({} bytes)",
        asset.source.display(),
        asset.target.display(),
        bytes.len()
    );
    Ok(())
}

/// Encode a decoded image as lossy WebP at the given quality (0–100).
pub fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, String> {
    let mem = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_simple(false, quality)
            .map_err(|e| format!("{e:?}"))?
    } else {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height)
            .encode_simple(false, quality)
            .map_err(|e| format!("{e:?}"))?
    };
    Ok(mem.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn encode_opaque_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([200, 40, 40])));
        let bytes = encode_webp(&img, 85.0).expect("encode should succeed");
        // RIFF....WEBP container magic
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn encode_preserves_alpha_channel() {
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([10, 200, 30, 128])));
        let bytes = encode_webp(&img, 85.0).expect("encode should succeed");

        let decoded = image::load_from_memory(&bytes).expect("produced WebP must decode");
        assert!(decoded.color().has_alpha());
        let px = decoded.to_rgba8().get_pixel(8, 8).0;
        // The alpha plane is carried losslessly.
        assert_eq!(px[3], 128);
    }

    #[test]
    fn encode_round_trips_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(31, 17, Rgb([0, 0, 0])));
        let bytes = encode_webp(&img, 85.0).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.to_rgb8().dimensions(), (31, 17));
    }

    #[test]
    fn convert_asset_reports_decode_failure_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.png");
        std::fs::write(&source, b"this is not a png").unwrap();
        let asset = ImageAsset {
            target: source.with_extension("webp"),
            source,
        };

        let err = convert_asset(&asset, 85.0).unwrap_err();
        assert!(matches!(err, AssetError::DecodeFailed { .. }));
        assert!(err.to_string().contains("broken.png"));
        assert!(!asset.target.exists(), "no target written on failure");
    }
}
