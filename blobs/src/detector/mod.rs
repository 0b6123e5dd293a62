//! Region detector and its per-frame diagnostics.
//!
//! This module contains the main [`RegionDetector`] struct, which owns the
//! arena and drives extraction, merging and finalization for every frame.


// =============================================================================
// Imports
// =============================================================================

use std::time::{Duration, Instant};

use crate::arena::{ArenaStats, RegionArena};
use crate::blob::{Blob, Blobs};
use crate::config::{validate_dimensions, DetectorConfig, ValueRange};
use crate::error::Result;
use crate::finalize::finalize;
use crate::frame::{Admission, FrameView};
use crate::merge::RowMerger;

/// Counts and stage timings of the last `find_blobs` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameDiagnostics {
    /// Scan-lines extracted from the frame.
    pub scan_lines: usize,
    /// Blob parts created for runs without a connected predecessor.
    pub parts_created: usize,
    /// Unions of two distinct classes.
    pub merges: usize,
    /// Classes alive at the end of the frame.
    pub roots: usize,
    /// Blobs returned.
    pub blobs: usize,
    /// Roots dropped by the size filter.
    pub rejected_size: usize,
    /// Roots dropped by the value filter.
    pub rejected_value: usize,
    /// Extraction and merging of all rows.
    pub scan_time: Duration,
    /// Collapse and filtering of the classes.
    pub finalize_time: Duration,
    pub total_time: Duration,
}

// =============================================================================
// RegionDetector
// =============================================================================

/// Connected region detector for 8-bit frames.
///
/// Construct once, then call [`RegionDetector::find_blobs`] for every frame.
/// All per-frame storage is reused between calls.
///
/// # Example
///
/// ```rust,ignore
/// use blobs::{DetectorConfig, RegionDetector};
///
/// // Size 20..=5000 px, values 128..=255
/// let mut detector = RegionDetector::new(320, 240, 20, 5000, 128, 255)?;
///
/// // Or from a configuration file
/// let config: DetectorConfig = common::load_file("detector.yaml")?;
/// let mut detector = RegionDetector::from_config(config)?;
///
/// let blobs = detector.find_blobs(&frame, 320, 240)?;
/// if let Some(blob) = blobs.blob_at(100, 80) {
///     println!("clicked blob {} with {} px", blob.id(), blob.pixel_count());
/// }
/// ```
#[derive(Debug)]
pub struct RegionDetector {
    config: DetectorConfig,
    arena: RegionArena,
    merger: RowMerger,
    blobs: Vec<Blob>,
    diagnostics: FrameDiagnostics,
}

impl RegionDetector {
    /// Detector for `width` x `height` frames accepting blobs of
    /// `min_size..=max_size` pixels with values in `min_value..=max_value`.
    pub fn new(
        width: usize,
        height: usize,
        min_size: u64,
        max_size: u64,
        min_value: u8,
        max_value: u8,
    ) -> Result<Self> {
        Self::from_config(DetectorConfig::new(
            width, height, min_size, max_size, min_value, max_value,
        ))
    }

    pub fn from_config(config: DetectorConfig) -> Result<Self> {
        config.validate()?;

        let arena = RegionArena::for_frame(
            &config.arena,
            config.width,
            config.height,
            config.merge_policy,
        );
        let merger = RowMerger::new(config.width, config.connectivity, config.merge_policy);

        Ok(Self {
            config,
            arena,
            merger,
            blobs: Vec::new(),
            diagnostics: FrameDiagnostics::default(),
        })
    }

    /// Get reference to the underlying configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Replace the size and value filters. Takes effect with the next frame.
    pub fn set_constraints(
        &mut self,
        min_size: u64,
        max_size: u64,
        min_value: u8,
        max_value: u8,
    ) -> Result<()> {
        let mut config = self.config;
        config.size_range = ValueRange::new(min_size, max_size);
        config.value_range = ValueRange::new(min_value, max_value);
        config.validate()?;

        self.config = config;
        Ok(())
    }

    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.diagnostics
    }

    /// Pool capacities and usage of the last frame.
    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Find all blobs of a row-major `width` x `height` frame.
    ///
    /// The result borrows the detector; blobs of the previous call are dropped.
    /// On error no blobs are available until the next successful call.
    pub fn find_blobs<'a>(
        &'a mut self,
        buffer: &'a [u8],
        width: usize,
        height: usize,
    ) -> Result<Blobs<'a>> {
        let total_start = Instant::now();

        validate_dimensions(width, height)?;
        let frame = FrameView::new(buffer, width, height)?;
        if width != self.config.width || height != self.config.height {
            self.adopt_dimensions(width, height);
        }

        let admission = Admission {
            range: self.config.value_range,
            policy: self.config.merge_policy,
        };

        self.blobs.clear();
        self.diagnostics = FrameDiagnostics::default();
        self.arena.reset();
        self.merger
            .begin_frame(self.config.connectivity, self.config.merge_policy);

        // Step 1: Extract runs row by row and merge them with the row above
        let scan_start = Instant::now();
        for y in 0..height {
            self.merger
                .process_row(frame.row(y), y, &admission, &mut self.arena)?;
        }
        self.merger.finish_frame(&mut self.arena);
        let scan_time = scan_start.elapsed();

        // Step 2: Collapse classes into blobs and apply the filters
        let finalize_start = Instant::now();
        let summary = finalize(
            &self.arena,
            self.config.size_range,
            self.config.value_range,
            &mut self.blobs,
        );
        let finalize_time = finalize_start.elapsed();

        let counters = self.merger.counters();
        self.diagnostics = FrameDiagnostics {
            scan_lines: counters.scan_lines,
            parts_created: counters.parts_created,
            merges: counters.merges,
            roots: summary.roots,
            blobs: self.blobs.len(),
            rejected_size: summary.rejected_size,
            rejected_value: summary.rejected_value,
            scan_time,
            finalize_time,
            total_time: total_start.elapsed(),
        };
        self.log_frame();

        let this: &'a Self = self;
        Ok(Blobs::new(
            &this.blobs,
            frame,
            admission,
            this.config.connectivity,
        ))
    }

    fn adopt_dimensions(&mut self, width: usize, height: usize) {
        log::debug!(
            "Frame size changed from {}x{} to {}x{}, resizing arena",
            self.config.width,
            self.config.height,
            width,
            height
        );
        self.config.width = width;
        self.config.height = height;

        let arena = &self.config.arena;
        self.arena.resize(
            arena.scan_line_capacity_for(width, self.config.merge_policy),
            arena.part_capacity_for(width, height, self.config.merge_policy),
        );
    }

    fn log_frame(&self) {
        let d = &self.diagnostics;
        log::debug!(
            "Found {} blobs: {} scan-lines, {} parts, {} merges, {} roots, rejected {} by size and {} by value",
            d.blobs,
            d.scan_lines,
            d.parts_created,
            d.merges,
            d.roots,
            d.rejected_size,
            d.rejected_value
        );
        log::trace!(
            "Frame timings: scan {:?}, finalize {:?}, total {:?}",
            d.scan_time,
            d.finalize_time,
            d.total_time
        );
    }
}
