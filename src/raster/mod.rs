//! Run-length-encoded raster classification.
//!
//! This module groups the pieces of the raster engine: color-key lookup
//! tables, the pluggable per-pixel classifier, the row encoder, and the
//! [`GeoBitmap`] query structure built from them.
pub mod bitmap;
pub mod classify;
pub mod color;
pub mod encode;

pub use bitmap::GeoBitmap;
pub use classify::{CellClass, LandMask, PixelClassifier};
pub use color::{ColorKey, ColorTable};
pub use encode::{EncodeOptions, PixelBuffer};

/// Maximum number of properties a single raster can classify against.
///
/// Run indices are stored in a signed 8-bit range with one value reserved
/// for "no property", which leaves 127 usable indices.
pub const MAX_PROPERTIES: usize = 127;

/// A validated index into a raster's property table.
///
/// Raster cells that match no property are represented as
/// `Option::<PropertyIndex>::None` rather than a numeric sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyIndex(u8);

impl PropertyIndex {
    /// Creates an index, or `None` if `index` exceeds [`MAX_PROPERTIES`].
    pub fn new(index: usize) -> Option<Self> {
        (index < MAX_PROPERTIES).then_some(Self(index as u8))
    }

    /// The position in the property table.
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl std::fmt::Display for PropertyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
