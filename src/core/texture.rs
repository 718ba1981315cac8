use image::imageops::FilterType;
use image::RgbaImage;

use crate::core::error::SceneError;

/// One level of the baked color texture, tightly packed RGBA8.
#[derive(Clone, Debug)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decoded baked texture with its full mip chain, largest level first.
#[derive(Clone, Debug)]
pub struct BakedTexture {
    pub levels: Vec<MipLevel>,
}

impl BakedTexture {
    pub fn decode(bytes: &[u8]) -> Result<Self, SceneError> {
        let base = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_rgba(base))
    }

    pub fn from_rgba(base: RgbaImage) -> Self {
        let mut levels = Vec::with_capacity(mip_level_count(base.width(), base.height()) as usize);
        let mut current = base;
        loop {
            let (w, h) = current.dimensions();
            let next = (w > 1 || h > 1).then(|| {
                image::imageops::resize(&current, (w / 2).max(1), (h / 2).max(1), FilterType::Triangle)
            });
            levels.push(MipLevel {
                width: w,
                height: h,
                rgba: current.into_raw(),
            });
            match next {
                Some(img) => current = img,
                None => break,
            }
        }
        Self { levels }
    }

    pub fn width(&self) -> u32 {
        self.levels.first().map(|l| l.width).unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.levels.first().map(|l| l.height).unwrap_or(0)
    }
}

#[inline]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}
