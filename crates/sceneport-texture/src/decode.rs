use anyhow::Result;

use crate::{TextureFormat, TextureImage};

impl TextureImage {
    /// Decodes a compressed image blob (png/jpeg/bmp/hdr). 8-bit RGB and
    /// RGBA pass through; every other layout, including float HDR, is folded
    /// to RGBA8.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)?;

        match image {
            image::DynamicImage::ImageRgb8(image) => Ok(TextureImage::new(
                image.width(),
                image.height(),
                TextureFormat::Rgb8Unorm,
                image.into_raw().into_boxed_slice(),
            )),
            image::DynamicImage::ImageRgba8(image) => Ok(TextureImage::new(
                image.width(),
                image.height(),
                TextureFormat::Rgba8Unorm,
                image.into_raw().into_boxed_slice(),
            )),
            other => {
                let image = other.to_rgba8();
                Ok(TextureImage::new(
                    image.width(),
                    image.height(),
                    TextureFormat::Rgba8Unorm,
                    image.into_raw().into_boxed_slice(),
                ))
            }
        }
    }
}
