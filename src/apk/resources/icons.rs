//! Launcher icon rendering for density buckets.
//!
//! The uploaded image is decoded once and resized to the exact edge length
//! of every configured bucket with Lanczos3 filtering, then re-encoded as
//! PNG.
//!
//! | Bucket | Size |
//! |--------|------|
//! | ldpi | 36 |
//! | mdpi | 48 |
//! | hdpi | 72 |
//! | xhdpi | 96 |
//! | xxhdpi | 144 |
//! | xxxhdpi | 192 |

use crate::apk::{
    error::{Error, Result, StageContext},
    settings::DensityBucket,
};
use image::{DynamicImage, ImageFormat, imageops::FilterType};
use std::io::Cursor;

/// A decoded source image plus the buckets to render it for.
///
/// Owned by a single build; never shared.
#[derive(Debug)]
pub struct IconSet<'a> {
    source: DynamicImage,
    buckets: &'a [DensityBucket],
}

/// One rendered bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedIcon {
    /// Bucket directory name.
    pub bucket: String,
    /// Edge length in pixels.
    pub pixel_size: u32,
    /// PNG bytes.
    pub png: Vec<u8>,
}

impl<'a> IconSet<'a> {
    /// Decode `icon_bytes` in any format the `image` crate recognizes.
    ///
    /// # Errors
    ///
    /// [`Error::IconDecode`] if the bytes are not a decodable raster image.
    pub fn decode(icon_bytes: &[u8], buckets: &'a [DensityBucket]) -> Result<Self> {
        let source = image::load_from_memory(icon_bytes).map_err(Error::IconDecode)?;
        Ok(Self { source, buckets })
    }

    /// Source dimensions as `(width, height)`.
    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source.width(), self.source.height())
    }

    /// Render every bucket, in configuration order.
    pub fn render(&self) -> Result<Vec<RenderedIcon>> {
        self.buckets
            .iter()
            .map(|bucket| {
                Ok(RenderedIcon {
                    bucket: bucket.name.clone(),
                    pixel_size: bucket.pixel_size,
                    png: self.render_size(bucket.pixel_size)?,
                })
            })
            .collect()
    }

    fn render_size(&self, size: u32) -> Result<Vec<u8>> {
        let resized = self
            .source
            .resize_exact(size, size, FilterType::Lanczos3)
            .to_rgba8();

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(resized)
            .write_to(&mut png, ImageFormat::Png)
            .stage("encoding icon")?;
        Ok(png.into_inner())
    }
}
