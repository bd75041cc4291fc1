
use crate::common::color_format::{ChannelCount, ChannelOrder, ChannelSize, ColorFormat};
use crate::common::error::{Error, Result};
use crate::lut::Lut;

/// Pixel-addressed raster geometry. Rows are tightly packed: the stride is
/// always `width * bytes_per_pixel`, with no trailing alignment padding.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub color_format: ColorFormat,
}

/// An owned raster image: a descriptor plus its backing byte buffer.
/// Single-channel images may carry an attached indexed palette.
#[derive(Clone, Debug)]
pub struct Image {
    desc: ImageDesc,
    bytes: Vec<u8>,
    palette: Option<Lut>,
}

/// An axis-aligned pixel rectangle, `x/y` inclusive origin, `width/height` extent.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// True if `self` lies entirely inside an image of the given dimensions.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }
}

impl ImageDesc {
    pub fn new(width: u32, height: u32, color_format: ColorFormat) -> Self {
        let stride = width as usize * color_format.byte_count() as usize;

        Self {
            width,
            height,
            stride,
            color_format,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        self.height as usize * self.stride
    }

    /// Returns the number of bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.color_format.byte_count() as usize
    }

    /// Fallible total size, for allocation paths where dimensions are untrusted.
    pub fn checked_size_in_bytes(&self) -> Result<usize> {
        (self.height as usize)
            .checked_mul(self.stride)
            .ok_or_else(|| {
                Error::Allocation(format!(
                    "image size overflows: {}x{} {}",
                    self.width, self.height, self.color_format
                ))
            })
    }
}

impl Image {
    /// Returns the image descriptor.
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    /// Returns the image bytes as a slice.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the image bytes as a mutable slice.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn take_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn bytes_per_pixel(&self) -> u8 {
        self.desc.color_format.byte_count()
    }

    pub fn new_empty(desc: ImageDesc) -> Result<Image> {
        desc.color_format.validate()?;

        let size = desc.checked_size_in_bytes()?;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|_| Error::Allocation(format!("failed to allocate {} bytes", size)))?;
        bytes.resize(size, 0);

        Ok(Image {
            desc,
            bytes,
            palette: None,
        })
    }

    pub fn from_vec(desc: ImageDesc, bytes: Vec<u8>) -> Result<Image> {
        desc.color_format.validate()?;

        if bytes.len() != desc.size_in_bytes() {
            return Err(Error::SizeMismatch(format!(
                "bytes length {} does not match expected size {}",
                bytes.len(),
                desc.size_in_bytes()
            )));
        }

        Ok(Image {
            desc,
            bytes,
            palette: None,
        })
    }

    pub fn from_bytes(desc: ImageDesc, bytes: &[u8]) -> Result<Image> {
        Image::from_vec(desc, bytes.to_vec())
    }

    pub fn palette(&self) -> Option<&Lut> {
        self.palette.as_ref()
    }

    pub fn set_palette(&mut self, palette: Option<Lut>) {
        self.palette = palette;
    }

    /// Returns the row at `y` as raw bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        &self.bytes[y as usize * self.desc.stride..][..self.desc.row_bytes()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.desc.stride;
        let row_bytes = self.desc.row_bytes();
        &mut self.bytes[y as usize * stride..][..row_bytes]
    }

    /// Reads the pixel at (x, y) as raw bytes.
    pub fn pixel_bytes(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.bytes_per_pixel() as usize;
        let offset = y as usize * self.desc.stride + x as usize * bpp;
        &self.bytes[offset..offset + bpp]
    }

    /// Fills the whole image by repeating one pixel's bytes.
    pub fn fill_with_pixel(&mut self, pixel: &[u8]) -> Result<()> {
        let bpp = self.bytes_per_pixel() as usize;
        if pixel.len() != bpp {
            return Err(Error::SizeMismatch(format!(
                "pixel is {} bytes, format {} needs {}",
                pixel.len(),
                self.desc.color_format,
                bpp
            )));
        }

        for chunk in self.bytes.chunks_exact_mut(bpp) {
            chunk.copy_from_slice(pixel);
        }
        Ok(())
    }

    /// Extracts a sub-image. The rectangle must lie inside this image.
    pub fn crop(&self, rect: Rect) -> Result<Image> {
        if !rect.fits_within(self.desc.width, self.desc.height) {
            return Err(Error::SizeMismatch(format!(
                "crop {}x{}+{}+{} exceeds image {}x{}",
                rect.width, rect.height, rect.x, rect.y, self.desc.width, self.desc.height
            )));
        }

        let bpp = self.bytes_per_pixel() as usize;
        let desc = ImageDesc::new(rect.width, rect.height, self.desc.color_format);
        let mut out = Image::new_empty(desc)?;

        let src_x0 = rect.x as usize * bpp;
        let row_bytes = rect.width as usize * bpp;
        for row in 0..rect.height as usize {
            let src = (rect.y as usize + row) * self.desc.stride + src_x0;
            let dst = row * out.desc.stride;
            out.bytes[dst..dst + row_bytes].copy_from_slice(&self.bytes[src..src + row_bytes]);
        }

        Ok(out)
    }

    /// Copies this whole image into `dst` with its top-left corner at (x, y).
    /// Both images must share a color format and the copy must fit.
    pub fn copy_into(&self, dst: &mut Image, x: u32, y: u32) -> Result<()> {
        if self.desc.color_format != dst.desc.color_format {
            return Err(Error::UnsupportedFormat(format!(
                "copy between mismatched formats: {} vs {}",
                self.desc.color_format, dst.desc.color_format
            )));
        }
        let rect = Rect::new(x, y, self.desc.width, self.desc.height);
        if !rect.fits_within(dst.desc.width, dst.desc.height) {
            return Err(Error::SizeMismatch(format!(
                "copy of {}x{} at +{}+{} exceeds destination {}x{}",
                self.desc.width, self.desc.height, x, y, dst.desc.width, dst.desc.height
            )));
        }

        let bpp = self.bytes_per_pixel() as usize;
        let row_bytes = self.desc.row_bytes();
        let dst_x0 = x as usize * bpp;
        for row in 0..self.desc.height as usize {
            let src = row * self.desc.stride;
            let dst_off = (y as usize + row) * dst.desc.stride + dst_x0;
            dst.bytes[dst_off..dst_off + row_bytes]
                .copy_from_slice(&self.bytes[src..src + row_bytes]);
        }

        Ok(())
    }

    /// Inverts every sample in place (255 - v for 8-bit, 65535 - v for 16-bit).
    pub fn invert(&mut self) {
        match self.desc.color_format.channel_size {
            ChannelSize::_8bit => {
                for b in self.bytes.iter_mut() {
                    *b = u8::MAX - *b;
                }
            }
            ChannelSize::_16bit => {
                let samples: &mut [u16] = bytemuck::cast_slice_mut(&mut self.bytes);
                for s in samples.iter_mut() {
                    *s = u16::MAX - *s;
                }
            }
        }
    }

    /// Reduces the image to 8-bit grayscale. 16-bit samples keep their high
    /// byte; multi-channel pixels take the truncated mean of their color
    /// channels, ignoring any unused trailing channel.
    pub fn to_gray_u8(&self) -> Result<Image> {
        if self.desc.color_format == ColorFormat::GRAY_U8 {
            return Ok(self.clone());
        }

        let desc = ImageDesc::new(self.desc.width, self.desc.height, ColorFormat::GRAY_U8);
        let mut out = Image::new_empty(desc)?;

        let width = self.desc.width as usize;
        let channels = self.desc.color_format.channel_count.channel_count() as usize;
        let color_channels = self.desc.color_format.channel_count.color_channels() as usize;

        match self.desc.color_format.channel_size {
            ChannelSize::_8bit => {
                for y in 0..self.desc.height as usize {
                    let src = &self.bytes[y * self.desc.stride..][..self.desc.row_bytes()];
                    let dst = &mut out.bytes[y * desc.stride..][..width];
                    for x in 0..width {
                        let px = &src[x * channels..];
                        let sum: u32 = px[..color_channels].iter().map(|&v| v as u32).sum();
                        dst[x] = (sum / color_channels as u32) as u8;
                    }
                }
            }
            ChannelSize::_16bit => {
                for y in 0..self.desc.height as usize {
                    let src: &[u16] =
                        bytemuck::cast_slice(&self.bytes[y * self.desc.stride..][..self.desc.row_bytes()]);
                    let dst = &mut out.bytes[y * desc.stride..][..width];
                    for x in 0..width {
                        let px = &src[x * channels..];
                        let sum: u32 = px[..color_channels].iter().map(|&v| (v >> 8) as u32).sum();
                        dst[x] = (sum / color_channels as u32) as u8;
                    }
                }
            }
        }

        Ok(out)
    }

    /// True if the image is square with a power-of-two side.
    pub fn is_pow2_square(&self) -> bool {
        self.desc.width == self.desc.height
            && self.desc.width > 0
            && self.desc.width.is_power_of_two()
    }
}

impl std::fmt::Display for ImageDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.color_format)
    }
}

/// Index of a color channel within a pixel, honoring the channel order.
/// Returns the byte-level (for u8) or sample-level (for u16) channel slot.
pub fn channel_slot(format: ColorFormat, rgb_index: usize) -> usize {
    match (format.channel_count, format.channel_order) {
        (ChannelCount::Gray, _) => 0,
        (_, ChannelOrder::Rgb) => rgb_index,
        (_, ChannelOrder::Bgr) => 2 - rgb_index,
    }
}
