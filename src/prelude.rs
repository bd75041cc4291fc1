// Color formats
pub use crate::common::{ALL_FORMATS, ChannelCount, ChannelOrder, ChannelSize, ColorFormat};

// Error handling
pub use crate::common::{Error, Result};

// Image types
pub use crate::image::{channel_slot, Image, ImageDesc, Rect};

// Lookup tables
pub use crate::lut::{Lut, LUT_ENTRIES, LUT_FILE_SIZE};

// Operations
pub use crate::ops::fusion::{fuse_mean, fuse_quadrant, Region};
pub use crate::ops::palette::{PaletteMap, MASK_THRESHOLD};
pub use crate::ops::scale::{Scale, ScaleMode};
pub use crate::ops::wavelet::{
    channel_matrix, forward_1d, forward_2d, inverse_1d, inverse_2d, write_channel, CoefImage,
    CoefMatrix, HaarTransform,
};

// Pipeline
pub use crate::pipeline::{fuse_images, FusionOptions, FusionPipeline};
