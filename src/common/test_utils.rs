use crate::common::color_format::ColorFormat;
use crate::image::{Image, ImageDesc};

/// Builds a grayscale u8 image whose pixel at (x, y) is `f(x, y)`.
pub fn gray_u8_image(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Image {
    let desc = ImageDesc::new(width, height, ColorFormat::GRAY_U8);
    let mut bytes = Vec::with_capacity(desc.size_in_bytes());
    for y in 0..height {
        for x in 0..width {
            bytes.push(f(x, y));
        }
        bytes.resize(((y + 1) as usize) * desc.stride, 0);
    }
    Image::from_vec(desc, bytes).unwrap()
}

/// Builds a grayscale u16 image whose pixel at (x, y) is `f(x, y)`.
pub fn gray_u16_image(width: u32, height: u32, f: impl Fn(u32, u32) -> u16) -> Image {
    let desc = ImageDesc::new(width, height, ColorFormat::GRAY_U16);
    let mut bytes = vec![0u8; desc.size_in_bytes()];
    for y in 0..height {
        let row = &mut bytes[y as usize * desc.stride..][..desc.stride];
        let samples: &mut [u16] = bytemuck::cast_slice_mut(row);
        for x in 0..width {
            samples[x as usize] = f(x, y);
        }
    }
    Image::from_vec(desc, bytes).unwrap()
}

pub fn assert_approx_eq(a: f64, b: f64, eps: f64) {
    assert!(
        (a - b).abs() <= eps,
        "expected {} ~= {} (eps {})",
        a,
        b,
        eps
    );
}
