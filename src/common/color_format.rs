use serde::{Deserialize, Serialize};

use crate::common::error::{Error, Result};

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChannelCount {
    #[default]
    Gray = 1,
    Rgb = 3,
    /// Three color channels plus one unused trailing channel (32-bit BGR layouts).
    Rgbx = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChannelSize {
    #[default]
    _8bit = 1,
    _16bit = 2,
}

/// In-memory ordering of the color channels. Irrelevant for grayscale.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

#[derive(Clone, Copy, Debug, Hash, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorFormat {
    pub channel_count: ChannelCount,
    pub channel_size: ChannelSize,
    pub channel_order: ChannelOrder,
}

impl ChannelCount {
    pub fn channel_count(&self) -> u8 {
        *self as u8
    }

    /// Color-carrying channels; excludes the unused trailing channel of Rgbx.
    pub fn color_channels(&self) -> u8 {
        match self {
            ChannelCount::Gray => 1,
            ChannelCount::Rgb | ChannelCount::Rgbx => 3,
        }
    }

    pub fn byte_count(&self, channel_size: ChannelSize) -> u8 {
        self.channel_count() * channel_size.byte_count()
    }
}

impl ChannelSize {
    pub fn byte_count(&self) -> u8 {
        *self as u8
    }

    /// Largest representable sample value for this channel size.
    pub fn sample_max(&self) -> f64 {
        match self {
            ChannelSize::_8bit => u8::MAX as f64,
            ChannelSize::_16bit => u16::MAX as f64,
        }
    }
}

impl ColorFormat {
    /// 8-bit single-channel grayscale.
    pub const GRAY_U8: ColorFormat = ColorFormat {
        channel_count: ChannelCount::Gray,
        channel_size: ChannelSize::_8bit,
        channel_order: ChannelOrder::Rgb,
    };
    /// 16-bit single-channel grayscale.
    pub const GRAY_U16: ColorFormat = ColorFormat {
        channel_count: ChannelCount::Gray,
        channel_size: ChannelSize::_16bit,
        channel_order: ChannelOrder::Rgb,
    };
    /// 24-bit RGB.
    pub const RGB_U8: ColorFormat = ColorFormat {
        channel_count: ChannelCount::Rgb,
        channel_size: ChannelSize::_8bit,
        channel_order: ChannelOrder::Rgb,
    };
    /// 24-bit BGR.
    pub const BGR_U8: ColorFormat = ColorFormat {
        channel_count: ChannelCount::Rgb,
        channel_size: ChannelSize::_8bit,
        channel_order: ChannelOrder::Bgr,
    };
    /// 48-bit RGB, 16 bits per channel.
    pub const RGB_U16: ColorFormat = ColorFormat {
        channel_count: ChannelCount::Rgb,
        channel_size: ChannelSize::_16bit,
        channel_order: ChannelOrder::Rgb,
    };
    /// 32-bit BGR with one unused trailing byte.
    pub const BGRX_U8: ColorFormat = ColorFormat {
        channel_count: ChannelCount::Rgbx,
        channel_size: ChannelSize::_8bit,
        channel_order: ChannelOrder::Bgr,
    };

    pub fn bits_per_pixel(&self) -> u16 {
        self.byte_count() as u16 * 8
    }

    pub fn byte_count(&self) -> u8 {
        self.channel_count.byte_count(self.channel_size)
    }

    pub fn is_supported(&self) -> bool {
        ALL_FORMATS.contains(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.is_supported() {
            return Err(Error::UnsupportedFormat(format!(
                "unsupported color format: {:?}",
                self
            )));
        }
        Ok(())
    }
}

impl From<(ChannelCount, ChannelSize, ChannelOrder)> for ColorFormat {
    fn from(value: (ChannelCount, ChannelSize, ChannelOrder)) -> Self {
        ColorFormat {
            channel_count: value.0,
            channel_size: value.1,
            channel_order: value.2,
        }
    }
}

impl std::fmt::Display for ChannelCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelCount::Gray => write!(f, "Gray"),
            ChannelCount::Rgb => write!(f, "RGB"),
            ChannelCount::Rgbx => write!(f, "RGBX"),
        }
    }
}

impl std::fmt::Display for ChannelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelSize::_8bit => write!(f, "8"),
            ChannelSize::_16bit => write!(f, "16"),
        }
    }
}

impl std::fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} u{}{}",
            self.channel_count,
            self.channel_size,
            match (self.channel_count, self.channel_order) {
                (ChannelCount::Gray, _) => "",
                (_, ChannelOrder::Rgb) => "",
                (_, ChannelOrder::Bgr) => " (BGR)",
            }
        )
    }
}

/// All supported color formats.
pub const ALL_FORMATS: &[ColorFormat] = &[
    ColorFormat::GRAY_U8,
    ColorFormat::GRAY_U16,
    ColorFormat::RGB_U8,
    ColorFormat::BGR_U8,
    ColorFormat::RGB_U16,
    ColorFormat::BGRX_U8,
];
