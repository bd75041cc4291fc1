use std::mem::size_of;

use num_traits::AsPrimitive;
use rayon::prelude::*;

use crate::image::Image;
use crate::ops::Sample;

/// Copies the nearest source pixel block for every destination pixel.
pub(super) fn nearest_neighbor(src: &Image, output: &mut Image, scale_x: f64, scale_y: f64) {
    let pixel_size = src.desc().color_format.byte_count() as usize;
    let width = output.desc().width as usize;
    let out_stride = output.desc().stride;
    let src_stride = src.desc().stride;
    let x_max = src.desc().width as usize - 1;
    let y_max = src.desc().height as usize - 1;
    let src_bytes = src.bytes();

    output
        .bytes_mut()
        .par_chunks_mut(out_stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let y2 = ((y as f64 / scale_y) as usize).min(y_max);
            let src_row = &src_bytes[y2 * src_stride..];

            for x in 0..width {
                let x2 = ((x as f64 / scale_x) as usize).min(x_max);
                out_row[x * pixel_size..(x + 1) * pixel_size]
                    .copy_from_slice(&src_row[x2 * pixel_size..(x2 + 1) * pixel_size]);
            }
        });
}

/// Cubic convolution kernel with support radius 2, normalized by 1/6.
fn bicubic_kernel(x: f64) -> f64 {
    if x > 2.0 {
        return 0.0;
    }

    let cube = |t: f64| if t <= 0.0 { 0.0 } else { t * t * t };

    (1.0 / 6.0) * (cube(x + 2.0) - 4.0 * cube(x + 1.0) + 6.0 * cube(x) - 4.0 * cube(x - 1.0))
}

/// Per-channel cubic resampling over a 4x4 neighborhood, source coordinates
/// clamped to the valid range at borders.
pub(super) fn bicubic<T>(src: &Image, output: &mut Image, scale_x: f64, scale_y: f64)
where
    T: Sample,
{
    let channels = src.desc().color_format.channel_count.channel_count() as usize;
    let width = output.desc().width as usize;
    let out_stride = output.desc().stride;
    let src_stride = src.desc().stride;
    let src_row_bytes = src.desc().row_bytes();
    let out_row_bytes = width * channels * size_of::<T>();
    let x_max = src.desc().width as i64 - 1;
    let y_max = src.desc().height as i64 - 1;
    let src_bytes = src.bytes();

    output
        .bytes_mut()
        .par_chunks_mut(out_stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            let out_row: &mut [T] = bytemuck::cast_slice_mut(&mut out_row[..out_row_bytes]);

            let oy = y as f64 / scale_y + 0.5;
            let oy1 = oy as i64;
            let dy = oy - oy1 as f64;

            for x in 0..width {
                let ox = x as f64 / scale_x + 0.5;
                let ox1 = ox as i64;
                let dx = ox - ox1 as f64;

                for c in 0..channels {
                    let mut g = 0.0;

                    for n in -1i64..3 {
                        let k1 = bicubic_kernel(dy - n as f64);
                        if k1.abs() <= f64::EPSILON {
                            continue;
                        }

                        let oy2 = (oy1 + n).clamp(0, y_max) as usize;
                        let src_row: &[T] =
                            bytemuck::cast_slice(&src_bytes[oy2 * src_stride..][..src_row_bytes]);

                        for m in -1i64..3 {
                            let k2 = k1 * bicubic_kernel(m as f64 - dx);
                            let ox2 = (ox1 + m).clamp(0, x_max) as usize;

                            g += k2 * src_row[ox2 * channels + c].as_();
                        }
                    }

                    out_row[x * channels + c] = T::from_interpolated(g);
                }
            }
        });
}
