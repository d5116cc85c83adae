//! Error types and result alias for the crate.
//!
//! All variants are load-time failures: the query structures are validated
//! while they are built and are immutable afterwards, so no query can fail
//! once construction has succeeded.
use thiserror::Error;

use crate::raster::color::ColorKey;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("duplicate color key {color} at property indices {first} and {second}")]
    DuplicateColorKey {
        color: ColorKey,
        first: usize,
        second: usize,
    },

    #[error("{count} properties exceed the representable index range of {max}")]
    TooManyProperties { count: usize, max: usize },

    #[error("'{source_name}': color {color} of property {index} never appears in the raster")]
    UnusedProperty {
        source_name: String,
        index: usize,
        color: ColorKey,
    },

    #[error("'{source_name}': unclassified pixel at ({x}, {y}) with color {color}")]
    UndefinedArea {
        source_name: String,
        x: u32,
        y: u32,
        color: ColorKey,
    },

    #[error("pixel buffer length {actual} does not match {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
