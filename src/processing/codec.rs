//! Image codec boundary: decode a source, flatten it, write it as lossy WebP.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;
use webp::{Encoder, WebPConfig};

use crate::utils::{SweepError, SweepResult};

/// libwebp compression method; 6 is the slowest and smallest.
const WEBP_METHOD: i32 = 6;

/// Decoder/encoder pair the conversion job drives.
///
/// Implementations must be callable from the job's worker thread.
pub trait ImageCodec: Send + Sync {
    /// Reads and decodes the image at `path`.
    fn decode(&self, path: &Path) -> SweepResult<DynamicImage>;

    /// Encodes `image` at `quality` (1-100) and writes it to `output`.
    fn encode(&self, image: &DynamicImage, quality: u32, output: &Path) -> SweepResult<()>;
}

/// Default codec backed by the `image` decoders and libwebp.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpCodec;

impl ImageCodec for WebpCodec {
    fn decode(&self, path: &Path) -> SweepResult<DynamicImage> {
        let image = image::open(path)?;
        debug!(
            "Loaded '{}': {}×{} {:?}",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );
        Ok(image)
    }

    fn encode(&self, image: &DynamicImage, quality: u32, output: &Path) -> SweepResult<()> {
        let encoder = Encoder::from_image(image)
            .map_err(|e| SweepError::format(format!("WebP encoder rejected image: {e}")))?;

        let mut config = WebPConfig::new()
            .map_err(|_| SweepError::processing("Failed to initialise WebP config"))?;
        config.quality = quality as f32;
        config.method = WEBP_METHOD;
        config.lossless = 0;

        let memory = encoder
            .encode_advanced(&config)
            .map_err(|e| SweepError::processing(format!("WebP save failed: {e:?}")))?;

        std::fs::write(output, &*memory)?;
        Ok(())
    }
}

/// Reduces any decoded image to plain 8-bit RGB.
///
/// Alpha is discarded rather than composited and palettes are expanded, so
/// every output is a three-channel lossy WebP.
pub fn flatten(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, Rgba, RgbaImage};

    #[test]
    fn flatten_drops_alpha() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0]));
        let flat = flatten(DynamicImage::ImageRgba8(rgba));
        assert_eq!(flat.color(), ColorType::Rgb8);
        assert_eq!(flat.to_rgb8().get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn flatten_widens_grayscale() {
        let gray = DynamicImage::new_luma8(2, 2);
        assert_eq!(flatten(gray).color(), ColorType::Rgb8);
    }

    #[test]
    fn webp_roundtrip_writes_a_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.webp");
        let image = DynamicImage::new_rgb8(16, 16);

        WebpCodec.encode(&image, 80, &out).unwrap();

        let decoded = WebpCodec.decode(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn decoding_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.png");
        std::fs::write(&bogus, b"not a png").unwrap();
        assert!(WebpCodec.decode(&bogus).is_err());
    }
}
