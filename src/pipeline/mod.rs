
use serde::{Deserialize, Serialize};

use crate::common::color_format::ColorFormat;
use crate::common::error::{Error, Result};
use crate::image::{Image, ImageDesc};
use crate::lut::Lut;
use crate::ops::fusion::{fuse_mean, fuse_quadrant, Region};
use crate::ops::palette::PaletteMap;
use crate::ops::scale::{Scale, ScaleMode};
use crate::ops::wavelet::{CoefImage, CoefMatrix, HaarTransform};

/// Formats the pipeline accepts as inputs.
const PIPELINE_FORMATS: &[ColorFormat] = &[
    ColorFormat::GRAY_U8,
    ColorFormat::GRAY_U16,
    ColorFormat::RGB_U8,
    ColorFormat::BGR_U8,
    ColorFormat::BGRX_U8,
];

/// Pipeline behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionOptions {
    /// When the resolution ratio is exactly 4, upscale by 2 and center the
    /// result in a border-filled canvas of target size instead of scaling
    /// directly to full size. Compensates for peripheral artifacts in
    /// low-resolution functional sources.
    pub pad_quarter_scale: bool,
}

impl Default for FusionOptions {
    fn default() -> Self {
        Self {
            pad_quarter_scale: true,
        }
    }
}

impl FusionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to toggle the quarter-scale padding path.
    pub fn pad_quarter_scale(mut self, enabled: bool) -> Self {
        self.pad_quarter_scale = enabled;
        self
    }
}

/// Fuses an anatomical image with a functional overlay in the wavelet
/// domain.
///
/// The result is still in the coefficient domain, as real-valued planes;
/// converting it back to the spatial domain is an explicit
/// [`HaarTransform::inverse`] call by the caller.
#[derive(Debug, Clone)]
pub struct FusionPipeline {
    lut: Lut,
    options: FusionOptions,
}

impl FusionPipeline {
    pub fn new(lut: Lut) -> Self {
        Self {
            lut,
            options: FusionOptions::default(),
        }
    }

    pub fn with_options(lut: Lut, options: FusionOptions) -> Self {
        Self { lut, options }
    }

    /// Runs the full pipeline: validate, assign roles by size, coregister,
    /// colorize the functional image, forward-transform both, and fuse the
    /// coefficients quadrant by quadrant.
    pub fn fuse(&self, target: Option<&Image>, object: Option<&Image>) -> Result<CoefImage> {
        let (target, object) = validate(target, object)?;

        // The larger image is the anatomical target regardless of argument
        // order.
        let swapped = target.desc().width < object.desc().width;
        let (target, object) = if swapped {
            (object, target)
        } else {
            (target, object)
        };
        tracing::debug!(
            swapped,
            target = %target.desc(),
            object = %object.desc(),
            "fusion roles assigned"
        );

        let target_gray = target.to_gray_u8()?;
        let object_gray = object.to_gray_u8()?;

        let coregistered = coregister(target_gray.desc(), &object_gray, self.options)?;
        tracing::debug!(coregistered = %coregistered.desc(), "object coregistered");

        // An attached palette on the functional image wins over the
        // pipeline's configured LUT.
        let lut = object.palette().cloned().unwrap_or_else(|| self.lut.clone());
        let colorized = PaletteMap::new(lut).apply(&coregistered)?;
        tracing::debug!("object colorized");

        let haar = HaarTransform;
        let target_coefs = haar.forward(&target_gray)?;
        let object_coefs = haar.forward(&colorized)?;
        tracing::debug!("forward transforms complete");

        fuse_coefficients(&target_coefs, &object_coefs)
    }
}

/// One-call convenience wrapper with the hot-iron palette and default
/// options.
pub fn fuse_images(target: Option<&Image>, object: Option<&Image>) -> Result<CoefImage> {
    FusionPipeline::new(Lut::hot_iron()).fuse(target, object)
}

fn validate<'a>(
    target: Option<&'a Image>,
    object: Option<&'a Image>,
) -> Result<(&'a Image, &'a Image)> {
    let target = target.ok_or(Error::NullInput("target"))?;
    let object = object.ok_or(Error::NullInput("object"))?;

    for img in [target, object] {
        if !PIPELINE_FORMATS.contains(&img.desc().color_format) {
            return Err(Error::UnsupportedFormat(format!(
                "fusion does not accept {}",
                img.desc().color_format
            )));
        }
        if !img.is_pow2_square() {
            return Err(Error::SizeMismatch(format!(
                "fusion inputs must be power-of-two squares, got {}",
                img.desc()
            )));
        }
    }

    let a = target.desc().width;
    let b = object.desc().width;
    let (large, small) = (a.max(b), a.min(b));
    if large != 512 || (small != 256 && small != 128) {
        return Err(Error::SizeMismatch(format!(
            "fusion needs a 512px image paired with a 256px or 128px image, got {} and {}",
            a, b
        )));
    }

    Ok((target, object))
}

/// Scales the object onto the target grid. A 4x resolution ratio with
/// padding enabled upscales by 2 and centers the result in a canvas filled
/// with the scaled image's first pixel.
fn coregister(target_desc: &ImageDesc, object: &Image, options: FusionOptions) -> Result<Image> {
    let mut x_factor = (target_desc.width / object.desc().width) as f64;
    let mut y_factor = (target_desc.height / object.desc().height) as f64;

    let pad = options.pad_quarter_scale && x_factor == 4.0;
    if pad {
        x_factor /= 2.0;
        y_factor /= 2.0;
    }

    let scaled = Scale::new(x_factor, y_factor, ScaleMode::Bicubic).apply(object)?;
    if !pad {
        return Ok(scaled);
    }

    let desc = ImageDesc::new(
        scaled.desc().width * 2,
        scaled.desc().height * 2,
        scaled.desc().color_format,
    );
    let mut canvas = Image::new_empty(desc)?;

    let border = scaled.pixel_bytes(0, 0).to_vec();
    canvas.fill_with_pixel(&border)?;

    let x = (desc.width - scaled.desc().width) / 2;
    let y = (desc.height - scaled.desc().height) / 2;
    scaled.copy_into(&mut canvas, x, y)?;
    tracing::debug!(x, y, "quarter-scale object padded into canvas");

    Ok(canvas)
}

/// Quadrant-wise coefficient fusion of a grayscale target against each
/// channel of the colorized object. The approximation band is a plain mean,
/// the three detail bands use the Gaussian weighted mean. The fused planes
/// stay real-valued; quantization happens in the caller's inverse transform.
fn fuse_coefficients(target: &CoefImage, object: &CoefImage) -> Result<CoefImage> {
    let rows = target.height() as usize;
    let cols = target.width() as usize;
    let h2 = rows >> 1;
    let w2 = cols >> 1;

    let target_m = target.plane(0);

    let mut output = CoefImage::new(target.width(), target.height(), ColorFormat::RGB_U8)?;

    for c in 0..3 {
        let object_m = object.plane(c);
        let mut result = CoefMatrix::new(rows, cols);

        let approx = fuse_mean(target_m, object_m, Region::new(0, 0, h2, w2));
        blit(&mut result, &approx, 0, 0);

        let detail_regions = [
            Region::new(0, w2, h2, cols),
            Region::new(h2, 0, rows, w2),
            Region::new(h2, w2, rows, cols),
        ];
        for region in detail_regions {
            let fused = fuse_quadrant(target_m, object_m, region);
            blit(&mut result, &fused, region.row_start, region.col_start);
        }

        *output.plane_mut(c) = result;
    }

    Ok(output)
}

fn blit(dst: &mut CoefMatrix, src: &CoefMatrix, row0: usize, col0: usize) {
    for i in 0..src.rows() {
        for j in 0..src.cols() {
            dst.set(row0 + i, col0 + j, src.at(i, j));
        }
    }
}
