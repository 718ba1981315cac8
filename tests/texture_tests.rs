// Host-side tests for baked texture decoding and the mip chain.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod core {
    pub mod error {
        include!("../src/core/error.rs");
    }
    pub mod texture {
        include!("../src/core/texture.rs");
    }
}

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::core::error::SceneError;
use crate::core::texture::*;

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 120, 40, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

#[test]
fn mip_count_follows_largest_side() {
    assert_eq!(mip_level_count(1, 1), 1);
    assert_eq!(mip_level_count(8, 4), 4);
    assert_eq!(mip_level_count(4096, 4096), 13);
    assert_eq!(mip_level_count(1000, 3), 10);
    assert_eq!(mip_level_count(0, 0), 1);
}

#[test]
fn decodes_png_into_full_chain() {
    let texture = BakedTexture::decode(&encoded(8, 4, ImageFormat::Png)).unwrap();
    assert_eq!((texture.width(), texture.height()), (8, 4));

    let sizes: Vec<_> = texture.levels.iter().map(|l| (l.width, l.height)).collect();
    assert_eq!(sizes, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
    assert_eq!(texture.levels.len() as u32, mip_level_count(8, 4));
    for level in &texture.levels {
        assert_eq!(level.rgba.len(), (level.width * level.height * 4) as usize);
    }
    // A flat color stays flat all the way down
    assert_eq!(&texture.levels[3].rgba[..], &[200, 120, 40, 255]);
}

#[test]
fn decodes_jpeg() {
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([113, 100, 80]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    let texture = BakedTexture::decode(&bytes).unwrap();
    assert_eq!(texture.levels.len(), 5);
    // Alpha is opaque after expansion to RGBA
    assert!(texture.levels[0].rgba.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn rejects_corrupt_image() {
    let err = BakedTexture::decode(b"\x89PNG broken").unwrap_err();
    assert!(matches!(err, SceneError::Image(_)));
}

#[test]
fn empty_texture_reports_zero_size() {
    let texture = BakedTexture { levels: Vec::new() };
    assert_eq!((texture.width(), texture.height()), (0, 0));
}
