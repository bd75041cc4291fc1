#[cfg(test)]
mod tests;

use rayon::prelude::*;

use crate::common::color_format::{ChannelSize, ColorFormat};
use crate::common::error::{Error, Result};
use crate::image::{Image, ImageDesc};
use crate::ops::Sample;

/// Dense row-major matrix of real-valued samples, the working
/// representation for the transform and the coefficient fusion.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CoefMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    fn transposed(&self) -> CoefMatrix {
        let mut t = CoefMatrix::new(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        t
    }
}

/// One level of the 1D Haar transform in place. Length must be even.
/// Output layout is the low (approximation) half followed by the high
/// (detail) half.
pub fn forward_1d(data: &mut [f64]) {
    debug_assert!(data.len() % 2 == 0);

    let h = data.len() >> 1;
    let mut temp = vec![0.0; data.len()];
    for i in 0..h {
        let k = i << 1;
        temp[i] = 0.5 * data[k] + 0.5 * data[k + 1];
        temp[i + h] = 0.5 * data[k] - 0.5 * data[k + 1];
    }
    data.copy_from_slice(&temp);
}

/// Algebraic inverse of [`forward_1d`]: `v0 = low + high`, `v1 = low - high`.
pub fn inverse_1d(data: &mut [f64]) {
    debug_assert!(data.len() % 2 == 0);

    let h = data.len() >> 1;
    let mut temp = vec![0.0; data.len()];
    for i in 0..h {
        let k = i << 1;
        temp[k] = data[i] + data[i + h];
        temp[k + 1] = data[i] - data[i + h];
    }
    data.copy_from_slice(&temp);
}

fn ensure_even(m: &CoefMatrix) -> Result<()> {
    if m.rows % 2 != 0 || m.cols % 2 != 0 {
        return Err(Error::SizeMismatch(format!(
            "wavelet transform needs even dimensions, got {}x{}",
            m.cols, m.rows
        )));
    }
    Ok(())
}

fn row_pass(m: &mut CoefMatrix, transform: fn(&mut [f64])) {
    let cols = m.cols;
    m.data.par_chunks_mut(cols).for_each(transform);
}

/// Separable 2D forward transform: every row, then every column. The row
/// pass completes before the column pass begins; the column pass runs as a
/// row pass over the transposed matrix so both stay row-parallel.
pub fn forward_2d(m: &mut CoefMatrix) -> Result<()> {
    ensure_even(m)?;

    row_pass(m, forward_1d);
    let mut t = m.transposed();
    row_pass(&mut t, forward_1d);
    *m = t.transposed();

    Ok(())
}

/// Separable 2D inverse transform: every column, then every row.
pub fn inverse_2d(m: &mut CoefMatrix) -> Result<()> {
    ensure_even(m)?;

    let mut t = m.transposed();
    row_pass(&mut t, inverse_1d);
    *m = t.transposed();
    row_pass(m, inverse_1d);

    Ok(())
}

/// Linear range remap clamped at the destination bounds.
fn remap(from_min: f64, from_max: f64, to_min: f64, to_max: f64, value: f64) -> f64 {
    if from_max - from_min == 0.0 {
        return 0.0;
    }
    let value = (to_max - to_min) * (value - from_min) / (from_max - from_min) + to_min;
    value.clamp(to_min, to_max)
}

/// Extracts one channel of an image as raw sample values.
pub fn channel_matrix(src: &Image, channel: usize) -> CoefMatrix {
    match src.desc().color_format.channel_size {
        ChannelSize::_8bit => channel_matrix_typed::<u8>(src, channel),
        ChannelSize::_16bit => channel_matrix_typed::<u16>(src, channel),
    }
}

/// Writes raw sample values back into one channel of an image. Values are
/// converted with the sample type's interpolation rules (8-bit clamps).
pub fn write_channel(m: &CoefMatrix, dst: &mut Image, channel: usize) {
    match dst.desc().color_format.channel_size {
        ChannelSize::_8bit => write_channel_typed::<u8>(m, dst, channel),
        ChannelSize::_16bit => write_channel_typed::<u16>(m, dst, channel),
    }
}

fn channel_matrix_typed<T: Sample>(src: &Image, channel: usize) -> CoefMatrix {
    let rows = src.desc().height as usize;
    let cols = src.desc().width as usize;
    let channels = src.desc().color_format.channel_count.channel_count() as usize;
    let stride = src.desc().stride;
    let row_bytes = src.desc().row_bytes();

    let mut m = CoefMatrix::new(rows, cols);
    for i in 0..rows {
        let src_row: &[T] = bytemuck::cast_slice(&src.bytes()[i * stride..][..row_bytes]);
        let dst_row = &mut m.data[i * cols..(i + 1) * cols];
        for (j, out) in dst_row.iter_mut().enumerate() {
            *out = src_row[j * channels + channel].as_();
        }
    }
    m
}

fn write_channel_typed<T: Sample>(m: &CoefMatrix, dst: &mut Image, channel: usize) {
    let rows = dst.desc().height as usize;
    let cols = dst.desc().width as usize;
    let channels = dst.desc().color_format.channel_count.channel_count() as usize;
    let stride = dst.desc().stride;
    let row_bytes = dst.desc().row_bytes();

    for i in 0..rows {
        let src_row = m.row(i);
        let dst_row: &mut [T] =
            bytemuck::cast_slice_mut(&mut dst.bytes_mut()[i * stride..][..row_bytes]);
        for j in 0..cols {
            dst_row[j * channels + channel] = T::from_interpolated(src_row[j]);
        }
    }
}

/// Per-channel coefficient planes produced by [`HaarTransform::forward`].
///
/// Planes hold real-valued coefficients remapped to the source sample range.
/// Quantization to whole sample levels happens only when
/// [`HaarTransform::inverse`] writes a pixel buffer, so a forward/inverse
/// pair reproduces the source within one level.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefImage {
    width: u32,
    height: u32,
    color_format: ColorFormat,
    planes: Vec<CoefMatrix>,
}

impl CoefImage {
    /// Zero-filled planes, one per channel of `color_format`.
    pub fn new(width: u32, height: u32, color_format: ColorFormat) -> Result<Self> {
        color_format.validate()?;
        let channels = color_format.channel_count.channel_count() as usize;
        let planes = vec![CoefMatrix::new(height as usize, width as usize); channels];
        Ok(Self {
            width,
            height,
            color_format,
            planes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_format(&self) -> ColorFormat {
        self.color_format
    }

    pub fn planes(&self) -> &[CoefMatrix] {
        &self.planes
    }

    pub fn plane(&self, channel: usize) -> &CoefMatrix {
        &self.planes[channel]
    }

    pub fn plane_mut(&mut self, channel: usize) -> &mut CoefMatrix {
        &mut self.planes[channel]
    }
}

/// Single-level separable 2D Haar transform, applied per channel.
///
/// Each channel is remapped from its raw range to [-1, 1], transformed, and
/// remapped back to the sample range. The coefficient domain stays
/// real-valued; only the inverse quantizes, at the final byte write.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaarTransform;

impl HaarTransform {
    pub fn forward(&self, src: &Image) -> Result<CoefImage> {
        src.desc().color_format.validate()?;

        let max = src.desc().color_format.channel_size.sample_max();
        let channels = src.desc().color_format.channel_count.channel_count() as usize;
        let mut output = CoefImage::new(
            src.desc().width,
            src.desc().height,
            src.desc().color_format,
        )?;

        for c in 0..channels {
            let mut m = channel_matrix(src, c);
            for v in m.data_mut() {
                *v = remap(0.0, max, -1.0, 1.0, *v);
            }
            forward_2d(&mut m)?;
            for v in m.data_mut() {
                *v = remap(-1.0, 1.0, 0.0, max, *v);
            }
            *output.plane_mut(c) = m;
        }

        Ok(output)
    }

    pub fn inverse(&self, src: &CoefImage) -> Result<Image> {
        let max = src.color_format.channel_size.sample_max();
        let channels = src.color_format.channel_count.channel_count() as usize;
        let desc = ImageDesc::new(src.width, src.height, src.color_format);
        let mut output = Image::new_empty(desc)?;

        for c in 0..channels {
            let mut m = src.plane(c).clone();
            for v in m.data_mut() {
                *v = remap(0.0, max, -1.0, 1.0, *v);
            }
            inverse_2d(&mut m)?;
            // Round to whole levels at the single quantization point.
            for v in m.data_mut() {
                *v = remap(-1.0, 1.0, 0.0, max, *v).round();
            }
            write_channel(&m, &mut output, c);
        }

        Ok(output)
    }
}
