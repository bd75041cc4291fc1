use rayon::prelude::*;

use super::MASK_THRESHOLD;
use crate::image::{channel_slot, Image};
use crate::lut::Lut;

/// Widens an 8-bit LUT byte to the full 16-bit range.
#[inline]
fn widen(v: u8) -> u16 {
    v as u16 * 257
}

pub(super) fn apply_gray_u8(lut: &Lut, src: &Image, output: &mut Image) {
    let width = src.desc().width as usize;
    let src_stride = src.desc().stride;
    let out_stride = output.desc().stride;
    let src_bytes = src.bytes();

    output
        .bytes_mut()
        .par_chunks_mut(out_stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let src_row = &src_bytes[y * src_stride..][..width];

            for (x, &index) in src_row.iter().enumerate() {
                out_row[x * 3..x * 3 + 3].copy_from_slice(&lut.rgb(index));
            }
        });
}

pub(super) fn apply_gray_u16(lut: &Lut, src: &Image, output: &mut Image) {
    let width = src.desc().width as usize;
    let src_stride = src.desc().stride;
    let src_row_bytes = src.desc().row_bytes();
    let out_stride = output.desc().stride;
    let out_row_bytes = output.desc().row_bytes();
    let src_bytes = src.bytes();

    output
        .bytes_mut()
        .par_chunks_mut(out_stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let src_row: &[u16] =
                bytemuck::cast_slice(&src_bytes[y * src_stride..][..src_row_bytes]);
            let out_row: &mut [u16] = bytemuck::cast_slice_mut(&mut out_row[..out_row_bytes]);

            for (x, &sample) in src_row.iter().enumerate() {
                // Raw 16-bit samples index the 256-entry table; out-of-range
                // samples saturate.
                let index = sample.min(u8::MAX as u16) as u8;
                let [r, g, b] = lut.rgb(index);
                out_row[x * 3] = widen(r);
                out_row[x * 3 + 1] = widen(g);
                out_row[x * 3 + 2] = widen(b);
            }
        });
}

pub(super) fn apply_color_u8(lut: &Lut, src: &Image, output: &mut Image) {
    let width = src.desc().width as usize;
    let src_stride = src.desc().stride;
    let out_stride = output.desc().stride;
    let src_bytes = src.bytes();

    let format = src.desc().color_format;
    let r_slot = channel_slot(format, 0);
    let g_slot = channel_slot(format, 1);
    let b_slot = channel_slot(format, 2);

    output
        .bytes_mut()
        .par_chunks_mut(out_stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let src_row = &src_bytes[y * src_stride..][..width * 3];

            for x in 0..width {
                let px = &src_row[x * 3..x * 3 + 3];
                let index = ((px[0] as u32 + px[1] as u32 + px[2] as u32) / 3) as u8;
                let rgb = lut.rgb(index);

                let out_px = &mut out_row[x * 3..x * 3 + 3];
                out_px[r_slot] = rgb[0];
                out_px[g_slot] = rgb[1];
                out_px[b_slot] = rgb[2];
            }
        });
}

pub(super) fn apply_color_u16(lut: &Lut, src: &Image, output: &mut Image) {
    let width = src.desc().width as usize;
    let src_stride = src.desc().stride;
    let src_row_bytes = src.desc().row_bytes();
    let out_stride = output.desc().stride;
    let out_row_bytes = output.desc().row_bytes();
    let src_bytes = src.bytes();

    output
        .bytes_mut()
        .par_chunks_mut(out_stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let src_row: &[u16] =
                bytemuck::cast_slice(&src_bytes[y * src_stride..][..src_row_bytes]);
            let out_row: &mut [u16] = bytemuck::cast_slice_mut(&mut out_row[..out_row_bytes]);

            for x in 0..width {
                let px = &src_row[x * 3..x * 3 + 3];
                let mean = (px[0] as u32 + px[1] as u32 + px[2] as u32) / 3;
                let index = mean.min(u8::MAX as u32) as u8;
                let [r, g, b] = lut.rgb(index);
                out_row[x * 3] = widen(r);
                out_row[x * 3 + 1] = widen(g);
                out_row[x * 3 + 2] = widen(b);
            }
        });
}

pub(super) fn apply_masked_gray_u8(lut: &Lut, src: &Image, mask: &Image, output: &mut Image) {
    let width = src.desc().width as usize;
    let src_stride = src.desc().stride;
    let mask_stride = mask.desc().stride;
    let out_stride = output.desc().stride;
    let src_bytes = src.bytes();
    let mask_bytes = mask.bytes();

    output
        .bytes_mut()
        .par_chunks_mut(out_stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let src_row = &src_bytes[y * src_stride..][..width];
            let mask_row = &mask_bytes[y * mask_stride..][..width];

            for x in 0..width {
                let value = src_row[x];
                let rgb = if mask_row[x] > MASK_THRESHOLD {
                    lut.rgb(value)
                } else {
                    [value, value, value]
                };
                out_row[x * 3..x * 3 + 3].copy_from_slice(&rgb);
            }
        });
}
