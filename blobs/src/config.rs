//! Configuration types for region detection.
//!
//! [`DetectorConfig`] is a flat, serde-friendly struct so detector setups can
//! be kept in YAML/JSON files next to the rest of a tracking pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest accepted frame side. Keeps every per-part moment sum inside `i64`.
pub const MAX_DIMENSION: usize = 1 << 15;

// ============================================================================
// Enums
// ============================================================================

/// Pixel connectivity used when joining runs of adjacent rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    /// Only horizontal and vertical neighbours are connected.
    Four,
    /// Diagonal neighbours are connected as well; two regions touching at a
    /// single corner pixel become one blob.
    #[default]
    Eight,
}

/// Compatibility test applied to two touching runs before they are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergePolicy {
    /// Any two accepted runs join. Suited for binary or thresholded input where
    /// all accepted values mean "foreground".
    #[default]
    RangeMembership,
    /// Runs join only when their values are identical. Suited for multi-valued
    /// label maps. Runs are also split wherever the value changes.
    ExactValue,
}

impl MergePolicy {
    #[inline]
    pub(crate) fn compatible(self, a: u8, b: u8) -> bool {
        match self {
            MergePolicy::RangeMembership => true,
            MergePolicy::ExactValue => a == b,
        }
    }
}

/// What the arena does when a pool runs out mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExhaustionPolicy {
    /// Abort the frame with [`Error::CapacityExceeded`]. Keeps worst-case
    /// latency bounded.
    #[default]
    Fail,
    /// Grow the pool and keep going. For offline processing.
    Grow,
}

// ============================================================================
// Ranges
// ============================================================================

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> ValueRange<T> {
    #[inline]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

// ============================================================================
// Arena
// ============================================================================

/// Pool sizing for the per-frame arena.
///
/// `None` capacities are derived from the frame size so that they can never
/// be exceeded; explicit values trade memory for a hard per-frame budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Live scan-line records (at most two rows are live at a time).
    pub scan_line_capacity: Option<usize>,
    /// Blob-part records created during one frame.
    pub part_capacity: Option<usize>,
    pub on_exhausted: ExhaustionPolicy,
}

impl ArenaConfig {
    /// Upper bound of runs a single row can produce.
    fn max_runs_per_row(width: usize, merge_policy: MergePolicy) -> usize {
        match merge_policy {
            // Runs are separated by at least one rejected pixel.
            MergePolicy::RangeMembership => width.div_ceil(2),
            // Every pixel may start a new run.
            MergePolicy::ExactValue => width,
        }
    }

    pub(crate) fn scan_line_capacity_for(
        &self,
        width: usize,
        merge_policy: MergePolicy,
    ) -> usize {
        self.scan_line_capacity
            .unwrap_or_else(|| 2 * Self::max_runs_per_row(width, merge_policy))
    }

    pub(crate) fn part_capacity_for(
        &self,
        width: usize,
        height: usize,
        merge_policy: MergePolicy,
    ) -> usize {
        self.part_capacity
            .unwrap_or_else(|| height * Self::max_runs_per_row(width, merge_policy))
    }
}

// ============================================================================
// DetectorConfig
// ============================================================================

/// Full region detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Expected frame width in pixels.
    pub width: usize,
    /// Expected frame height in pixels.
    pub height: usize,
    /// Accepted blob sizes in pixels (closed interval).
    pub size_range: ValueRange<u64>,
    /// Accepted pixel values (closed interval). Pixels outside are background.
    pub value_range: ValueRange<u8>,
    pub connectivity: Connectivity,
    pub merge_policy: MergePolicy,
    pub arena: ArenaConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            size_range: ValueRange::new(0, u64::MAX),
            value_range: ValueRange::new(1, 255),
            connectivity: Connectivity::default(),
            merge_policy: MergePolicy::default(),
            arena: ArenaConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Config with the given frame size and constraints, defaults elsewhere.
    pub fn new(
        width: usize,
        height: usize,
        min_size: u64,
        max_size: u64,
        min_value: u8,
        max_value: u8,
    ) -> Self {
        Self {
            width,
            height,
            size_range: ValueRange::new(min_size, max_size),
            value_range: ValueRange::new(min_value, max_value),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.width, self.height)?;
        if !self.size_range.is_valid() {
            return Err(Error::InvalidConfig(format!(
                "min_size ({}) must be <= max_size ({})",
                self.size_range.min, self.size_range.max
            )));
        }
        if !self.value_range.is_valid() {
            return Err(Error::InvalidConfig(format!(
                "min_value ({}) must be <= max_value ({})",
                self.value_range.min, self.value_range.max
            )));
        }
        if self.arena.scan_line_capacity == Some(0) || self.arena.part_capacity == Some(0) {
            return Err(Error::InvalidConfig(
                "arena capacities must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

pub(crate) fn validate_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok(())
}
