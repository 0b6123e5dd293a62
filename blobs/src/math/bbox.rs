//! Pixel bounding boxes.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with inclusive `usize` bounds.
///
/// A pixel at (x, y) is inside if `x_min <= x <= x_max` and
/// `y_min <= y <= y_max`. This is the accumulation form used while merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl Aabb {
    #[inline]
    pub const fn new(x_min: usize, x_max: usize, y_min: usize, y_max: usize) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Box covering the half-open run `[x_start, x_end)` of row `y`.
    #[inline]
    pub(crate) const fn from_run(y: usize, x_start: usize, x_end: usize) -> Self {
        debug_assert!(x_end > x_start);
        Self {
            x_min: x_start,
            x_max: x_end - 1,
            y_min: y,
            y_max: y,
        }
    }

    /// Grow this box to cover `other` as well.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        self.x_min = self.x_min.min(other.x_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_min = self.y_min.min(other.y_min);
        self.y_max = self.y_max.max(other.y_max);
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.x_max - self.x_min + 1
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.y_max - self.y_min + 1
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Signed variant of [`Aabb::contains`] for neighbourhood walks.
    #[inline]
    pub(crate) fn contains_signed(&self, x: i64, y: i64) -> bool {
        x >= self.x_min as i64
            && x <= self.x_max as i64
            && y >= self.y_min as i64
            && y <= self.y_max as i64
    }

    /// Whether the box touches the border of a `width` x `height` frame.
    #[inline]
    pub const fn touches_border(&self, width: usize, height: usize) -> bool {
        self.x_min == 0 || self.y_min == 0 || self.x_max + 1 >= width || self.y_max + 1 >= height
    }
}

/// Bounding box as origin plus size, the form handed to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    #[inline]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }
}

impl From<Aabb> for Rect {
    #[inline]
    fn from(bbox: Aabb) -> Self {
        Self::new(bbox.x_min, bbox.y_min, bbox.width(), bbox.height())
    }
}
