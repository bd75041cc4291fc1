pub mod fusion;
pub mod palette;
pub mod scale;
pub mod wavelet;

use bytemuck::Pod;
use num_traits::AsPrimitive;

/// A raw channel sample the generic per-pixel loops are instantiated over.
pub(crate) trait Sample: Pod + Send + Sync + AsPrimitive<f64> {
    /// Converts an interpolated value back to a raw sample.
    fn from_interpolated(v: f64) -> Self;
}

impl Sample for u8 {
    // 8-bit interpolation results clamp.
    #[inline]
    fn from_interpolated(v: f64) -> Self {
        v.clamp(0.0, Self::MAX as f64) as u8
    }
}

impl Sample for u16 {
    // 16-bit raw samples are not clamped: truncating cast, wrap on overflow.
    #[inline]
    fn from_interpolated(v: f64) -> Self {
        v as i64 as u16
    }
}
