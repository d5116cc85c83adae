//! Run-length row encoding of classified pixel buffers.
//!
//! The encoder walks a decoded pixel buffer row by row, classifies every
//! pixel through a [`PixelClassifier`], and compresses each row into maximal
//! runs of equal classification. It also validates the data against its
//! schema: every declared property must appear at least once, and pixels
//! that classify to nothing are fatal unless the raster allows them.
use crate::coords::GeoGrid;
use crate::error::{Error, Result};
use crate::raster::classify::{CellClass, PixelClassifier};
use crate::raster::color::ColorKey;
use crate::raster::PropertyIndex;

/// A decoded rectangular pixel buffer, row-major.
///
/// Produced by an external image-loading collaborator; this crate only
/// consumes it. Width is limited to `u16::MAX` so a whole row always fits
/// in a single run length.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<ColorKey>,
}

impl PixelBuffer {
    /// Wraps a row-major pixel array of `width * height` color values.
    pub fn new(width: u32, height: u32, pixels: Vec<ColorKey>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!(
                "raster dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if width > u32::from(u16::MAX) {
            return Err(Error::InvalidConfig(format!(
                "raster width {width} exceeds the maximum of {}",
                u16::MAX
            )));
        }
        if pixels.len() != width as usize * height as usize {
            return Err(Error::DimensionMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color of pixel `(x, y)`. Out-of-range coordinates are a programming
    /// error and panic.
    pub fn get(&self, x: u32, y: u32) -> ColorKey {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Validation switches for the row encoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct EncodeOptions {
    /// Permit pixels whose color matches no property. When `false`, such a
    /// pixel aborts the encode with its coordinates.
    pub allow_undefined: bool,
    /// Permit declared properties whose color never appears in the buffer.
    /// Used for derived rasters (a region may be entirely water).
    pub allow_unused: bool,
}

/// One maximal horizontal run of equally classified cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Run {
    pub index: Option<PropertyIndex>,
    pub length: u16,
}

/// Output of the row encoder: the run list, the index of each row's first
/// run (with a trailing entry at `runs.len()`), and per-property cell counts.
#[derive(Clone, Debug)]
pub(crate) struct Encoded {
    pub runs: Vec<Run>,
    pub row_starts: Vec<u32>,
    pub sizes: Vec<u32>,
}

pub(crate) fn encode_rows(
    source_name: &str,
    pixels: &PixelBuffer,
    classifier: &dyn PixelClassifier,
    colors: &[ColorKey],
    options: EncodeOptions,
) -> Result<Encoded> {
    let grid = GeoGrid::new(pixels.width(), pixels.height());
    let mut runs: Vec<Run> = Vec::new();
    let mut row_starts = Vec::with_capacity(pixels.height() as usize + 1);
    let mut sizes = vec![0u32; colors.len()];

    let mut close_run = |runs: &mut Vec<Run>, index: Option<PropertyIndex>, length: u16| {
        runs.push(Run { index, length });
        if let Some(index) = index {
            sizes[index.get()] += u32::from(length);
        }
    };

    for y in 0..pixels.height() {
        row_starts.push(runs.len() as u32);
        let mut current: Option<PropertyIndex> = None;
        let mut length: u16 = 0;

        for x in 0..pixels.width() {
            let color = pixels.get(x, y);
            let index = match classifier.classify(grid.cell_center(x, y), color) {
                CellClass::Property(index) => Some(index),
                CellClass::Masked => None,
                CellClass::Undefined => {
                    if !options.allow_undefined {
                        return Err(Error::UndefinedArea {
                            source_name: source_name.to_owned(),
                            x,
                            y,
                            color,
                        });
                    }
                    None
                }
            };

            if x == 0 {
                current = index;
                length = 1;
            } else if index == current {
                length += 1;
            } else {
                close_run(&mut runs, current, length);
                current = index;
                length = 1;
            }
        }
        close_run(&mut runs, current, length);
    }
    row_starts.push(runs.len() as u32);

    if !options.allow_unused {
        for (index, (&size, &color)) in sizes.iter().zip(colors).enumerate() {
            if size == 0 {
                return Err(Error::UnusedProperty {
                    source_name: source_name.to_owned(),
                    index,
                    color,
                });
            }
        }
    }

    Ok(Encoded {
        runs,
        row_starts,
        sizes,
    })
}
