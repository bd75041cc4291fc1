mod cpu;

use crate::common::color_format::ColorFormat;
use crate::common::error::{Error, Result};
use crate::image::{Image, ImageDesc};
use crate::lut::Lut;

/// Mask samples at or below this value keep their grayscale source value
/// instead of being colorized.
pub const MASK_THRESHOLD: u8 = 3;

/// Pseudocolor mapping of intensities through a lookup table.
#[derive(Clone, Debug, Default)]
pub struct PaletteMap {
    pub lut: Lut,
}

impl PaletteMap {
    pub fn new(lut: Lut) -> Self {
        Self { lut }
    }

    /// Builder method to set the lookup table.
    pub fn lut(mut self, lut: Lut) -> Self {
        self.lut = lut;
        self
    }

    /// Maps `src` through the lookup table.
    ///
    /// 8-bit gray indexes the LUT directly and yields 24-bit RGB. 16-bit
    /// gray saturates its index at 255 and yields 48-bit RGB with the LUT
    /// bytes widened to 16 bits. Three-channel sources index by the
    /// truncated channel mean and keep their own format and channel order.
    pub fn apply(&self, src: &Image) -> Result<Image> {
        let format = src.desc().color_format;
        let out_format = match format {
            ColorFormat::GRAY_U8 => ColorFormat::RGB_U8,
            ColorFormat::GRAY_U16 => ColorFormat::RGB_U16,
            ColorFormat::RGB_U8 | ColorFormat::BGR_U8 | ColorFormat::RGB_U16 => format,
            other => {
                return Err(Error::UnsupportedFormat(format!(
                    "palette mapping does not support {}",
                    other
                )));
            }
        };

        let desc = ImageDesc::new(src.desc().width, src.desc().height, out_format);
        let mut output = Image::new_empty(desc)?;

        match format {
            ColorFormat::GRAY_U8 => cpu::apply_gray_u8(&self.lut, src, &mut output),
            ColorFormat::GRAY_U16 => cpu::apply_gray_u16(&self.lut, src, &mut output),
            ColorFormat::RGB_U8 | ColorFormat::BGR_U8 => {
                cpu::apply_color_u8(&self.lut, src, &mut output)
            }
            ColorFormat::RGB_U16 => cpu::apply_color_u16(&self.lut, src, &mut output),
            _ => unreachable!(),
        }

        Ok(output)
    }

    /// Mask-gated variant: an 8-bit gray pixel is colorized only where the
    /// corresponding mask sample exceeds [`MASK_THRESHOLD`]; elsewhere the
    /// source value is replicated across the RGB triplet.
    pub fn apply_masked(&self, src: &Image, mask: &Image) -> Result<Image> {
        if src.desc().color_format != ColorFormat::GRAY_U8
            || mask.desc().color_format != ColorFormat::GRAY_U8
        {
            return Err(Error::UnsupportedFormat(format!(
                "masked palette mapping needs 8-bit gray source and mask, got {} and {}",
                src.desc().color_format,
                mask.desc().color_format
            )));
        }
        if src.desc().width != mask.desc().width || src.desc().height != mask.desc().height {
            return Err(Error::SizeMismatch(format!(
                "mask {}x{} does not match source {}x{}",
                mask.desc().width,
                mask.desc().height,
                src.desc().width,
                src.desc().height
            )));
        }

        let desc = ImageDesc::new(src.desc().width, src.desc().height, ColorFormat::RGB_U8);
        let mut output = Image::new_empty(desc)?;

        cpu::apply_masked_gray_u8(&self.lut, src, mask, &mut output);

        Ok(output)
    }
}
