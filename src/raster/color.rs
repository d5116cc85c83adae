//! Color keys and the color-to-property classification table.
//!
//! Property tables identify each property (region, country, terrain type) by
//! a packed color value. The color is purely a classification key taken from
//! the source image; it is never rendered.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::{PropertyIndex, MAX_PROPERTIES};

/// A packed color value used as a classification key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorKey(u32);

impl ColorKey {
    /// Creates a key from a packed `0xRRGGBB` value.
    pub const fn new(packed: u32) -> Self {
        Self(packed)
    }

    /// Creates a key from RGB components.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// The packed value.
    pub const fn packed(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ColorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Exact-match lookup from a color key to a property index.
///
/// Built once from an ordered property table; the index of a color is its
/// position in that table. Construction fails if two entries share a color
/// or if the table exceeds [`MAX_PROPERTIES`] entries.
#[derive(Clone, Debug)]
pub struct ColorTable {
    by_color: HashMap<ColorKey, PropertyIndex>,
    len: usize,
}

impl ColorTable {
    /// Builds the table from property colors in table order.
    pub fn new<I>(colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = ColorKey>,
    {
        let mut by_color = HashMap::new();
        let mut len = 0usize;
        for (position, color) in colors.into_iter().enumerate() {
            let index = PropertyIndex::new(position).ok_or(Error::TooManyProperties {
                count: position + 1,
                max: MAX_PROPERTIES,
            })?;
            if let Some(first) = by_color.insert(color, index) {
                return Err(Error::DuplicateColorKey {
                    color,
                    first: first.get(),
                    second: position,
                });
            }
            len = position + 1;
        }
        Ok(Self { by_color, len })
    }

    /// Number of properties in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Property index for an exact color match, or `None` if the color is
    /// absent from the table.
    pub fn index_of(&self, color: ColorKey) -> Option<PropertyIndex> {
        self.by_color.get(&color).copied()
    }
}
