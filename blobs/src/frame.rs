//! Borrowed view of the caller's frame plus the pixel acceptance rules.

use crate::config::{MergePolicy, ValueRange};
use crate::error::{Error, Result};

/// Row-major 8-bit frame borrowed from the caller for one `find_blobs` call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameView<'a> {
    pixels: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> FrameView<'a> {
    pub fn new(pixels: &'a [u8], width: usize, height: usize) -> Result<Self> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }
}

/// Which pixels belong to the foreground, and which runs may be joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Admission {
    pub range: ValueRange<u8>,
    pub policy: MergePolicy,
}

impl Admission {
    #[inline]
    pub fn admits(&self, value: u8) -> bool {
        self.range.contains(value)
    }

    /// Membership test for pixels of a blob whose representative value is `value`.
    #[inline]
    pub fn member_of(&self, blob_value: u8, pixel: u8) -> bool {
        self.admits(pixel) && self.policy.compatible(blob_value, pixel)
    }
}
