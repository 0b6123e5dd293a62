//! Per-frame memory arena for scan-line and blob-part records.
//!
//! Both pools reserve their storage once and are rewound by [`RegionArena::reset`]
//! at the start of every frame, so steady-state detection performs no heap
//! allocation. Records reference each other by index, never by pointer:
//! - scan-lines point at their owning part with a [`PartId`]
//! - parts point at their union-find parent with a [`PartId`]
//!
//! Scan-lines are short-lived (two rows) and go back to a free list as soon as
//! the merger is done with them. Parts live until the end of the frame.


use crate::config::{ArenaConfig, ExhaustionPolicy, MergePolicy};
use crate::error::{Error, Pool, Result};
use crate::math::Aabb;

// ============================================================================
// Records
// ============================================================================

/// Index of a blob part in the arena. Ids follow creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PartId(pub u32);

impl PartId {
    /// Owner of a scan-line that has not been merged yet.
    pub const NONE: PartId = PartId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a scan-line slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotId(u32);

/// Maximal horizontal run of accepted pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanLine {
    pub row: u32,
    pub x_start: u32,
    /// Exclusive.
    pub x_end: u32,
    pub value: u8,
    pub part: PartId,
}

impl ScanLine {
    #[inline]
    pub fn len(&self) -> u32 {
        self.x_end - self.x_start
    }
}

/// Additive pixel statistics of a set of runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PartStats {
    pub pixel_count: i64,
    pub sum_x: i64,
    pub sum_y: i64,
    pub sum_xx: i64,
    pub sum_xy: i64,
    pub sum_yy: i64,
    pub bbox: Aabb,
    /// Topmost-leftmost pixel as (x, y).
    pub first: (usize, usize),
}

/// `0 + 1 + ... + k`, zero for `k = -1`.
#[inline]
fn sum_to(k: i64) -> i64 {
    k * (k + 1) / 2
}

/// `0² + 1² + ... + k²`, zero for `k = -1`.
#[inline]
fn sum_squares_to(k: i64) -> i64 {
    k * (k + 1) * (2 * k + 1) / 6
}

impl PartStats {
    /// Statistics of a single run, in closed form.
    pub fn from_run(line: &ScanLine) -> Self {
        let y = line.row as i64;
        let first_x = line.x_start as i64;
        let last_x = line.x_end as i64 - 1;
        let n = line.len() as i64;

        let sum_x = sum_to(last_x) - sum_to(first_x - 1);
        Self {
            pixel_count: n,
            sum_x,
            sum_y: n * y,
            sum_xx: sum_squares_to(last_x) - sum_squares_to(first_x - 1),
            sum_xy: y * sum_x,
            sum_yy: n * y * y,
            bbox: Aabb::from_run(line.row as usize, line.x_start as usize, line.x_end as usize),
            first: (line.x_start as usize, line.row as usize),
        }
    }

    pub fn absorb(&mut self, other: &PartStats) {
        self.pixel_count += other.pixel_count;
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.sum_xx += other.sum_xx;
        self.sum_xy += other.sum_xy;
        self.sum_yy += other.sum_yy;
        self.bbox.merge(&other.bbox);
        if (other.first.1, other.first.0) < (self.first.1, self.first.0) {
            self.first = other.first;
        }
    }
}

/// Equivalence-class record. Statistics are only valid on roots.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BlobPart {
    pub parent: PartId,
    pub stats: PartStats,
    /// Value of the run that created the part.
    pub value: u8,
}

// ============================================================================
// Arena
// ============================================================================

/// Pool sizes and usage of the last frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    pub scan_line_capacity: usize,
    pub part_capacity: usize,
    /// Most scan-lines alive at the same time.
    pub peak_scan_lines: usize,
    /// Parts created during the frame.
    pub parts_used: usize,
    /// Whether a pool had to grow past its capacity (grow mode only).
    pub grew: bool,
}

#[derive(Debug)]
pub(crate) struct RegionArena {
    scan_lines: Vec<ScanLine>,
    free_scan_lines: Vec<SlotId>,
    scan_line_capacity: usize,
    peak_scan_lines: usize,

    parts: Vec<BlobPart>,
    part_capacity: usize,

    on_exhausted: ExhaustionPolicy,
    grew_scan_lines: bool,
    grew_parts: bool,
}

impl RegionArena {
    pub fn new(scan_line_capacity: usize, part_capacity: usize, on_exhausted: ExhaustionPolicy) -> Self {
        Self {
            scan_lines: Vec::with_capacity(scan_line_capacity),
            free_scan_lines: Vec::with_capacity(scan_line_capacity),
            scan_line_capacity,
            peak_scan_lines: 0,
            parts: Vec::with_capacity(part_capacity),
            part_capacity,
            on_exhausted,
            grew_scan_lines: false,
            grew_parts: false,
        }
    }

    /// Arena sized for frames of the given dimensions.
    pub fn for_frame(config: &ArenaConfig, width: usize, height: usize, merge_policy: MergePolicy) -> Self {
        Self::new(
            config.scan_line_capacity_for(width, merge_policy),
            config.part_capacity_for(width, height, merge_policy),
            config.on_exhausted,
        )
    }

    /// Rewind both pools. Storage is kept; all previous ids become dead.
    pub fn reset(&mut self) {
        self.scan_lines.clear();
        self.free_scan_lines.clear();
        self.peak_scan_lines = 0;
        self.parts.clear();
        self.grew_scan_lines = false;
        self.grew_parts = false;
    }

    /// Change capacities for a new frame size. Only reallocates when growing.
    pub fn resize(&mut self, scan_line_capacity: usize, part_capacity: usize) {
        self.reset();
        self.scan_line_capacity = scan_line_capacity;
        self.part_capacity = part_capacity;
        self.scan_lines.reserve(scan_line_capacity);
        self.free_scan_lines.reserve(scan_line_capacity);
        self.parts.reserve(part_capacity);
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            scan_line_capacity: self.scan_line_capacity,
            part_capacity: self.part_capacity,
            peak_scan_lines: self.peak_scan_lines,
            parts_used: self.parts.len(),
            grew: self.grew_scan_lines || self.grew_parts,
        }
    }

    // ------------------------------------------------------------------------
    // Scan-lines
    // ------------------------------------------------------------------------

    #[inline]
    fn live_scan_lines(&self) -> usize {
        self.scan_lines.len() - self.free_scan_lines.len()
    }

    pub fn alloc_scan_line(&mut self, line: ScanLine) -> Result<SlotId> {
        let slot = if let Some(slot) = self.free_scan_lines.pop() {
            self.scan_lines[slot.0 as usize] = line;
            slot
        } else {
            if self.scan_lines.len() >= self.scan_line_capacity {
                self.on_pool_exhausted(Pool::ScanLines)?;
            }
            self.scan_lines.push(line);
            SlotId((self.scan_lines.len() - 1) as u32)
        };

        self.peak_scan_lines = self.peak_scan_lines.max(self.live_scan_lines());
        Ok(slot)
    }

    /// Return a slot for reuse. The record must not be read afterwards.
    #[inline]
    pub fn release_scan_line(&mut self, slot: SlotId) {
        debug_assert!(!self.free_scan_lines.contains(&slot));
        self.free_scan_lines.push(slot);
    }

    #[inline]
    pub fn scan_line(&self, slot: SlotId) -> &ScanLine {
        &self.scan_lines[slot.0 as usize]
    }

    #[inline]
    pub fn scan_line_mut(&mut self, slot: SlotId) -> &mut ScanLine {
        &mut self.scan_lines[slot.0 as usize]
    }

    // ------------------------------------------------------------------------
    // Parts
    // ------------------------------------------------------------------------

    /// Create a new root part for a run without connected predecessors.
    pub fn alloc_part(&mut self, stats: PartStats, value: u8) -> Result<PartId> {
        if self.parts.len() >= self.part_capacity {
            self.on_pool_exhausted(Pool::Parts)?;
        }
        let id = PartId(self.parts.len() as u32);
        self.parts.push(BlobPart {
            parent: id,
            stats,
            value,
        });
        Ok(id)
    }

    #[inline]
    pub fn part(&self, id: PartId) -> &BlobPart {
        &self.parts[id.index()]
    }

    #[inline]
    pub fn part_mut(&mut self, id: PartId) -> &mut BlobPart {
        &mut self.parts[id.index()]
    }

    #[inline]
    pub fn parts(&self) -> &[BlobPart] {
        &self.parts
    }

    fn on_pool_exhausted(&mut self, pool: Pool) -> Result<()> {
        let (capacity, grew) = match pool {
            Pool::ScanLines => (self.scan_line_capacity, &mut self.grew_scan_lines),
            Pool::Parts => (self.part_capacity, &mut self.grew_parts),
        };

        match self.on_exhausted {
            ExhaustionPolicy::Fail => Err(Error::CapacityExceeded { pool, capacity }),
            ExhaustionPolicy::Grow => {
                if !*grew {
                    log::warn!("The {pool} pool exceeded its capacity of {capacity}, growing");
                    *grew = true;
                }
                Ok(())
            }
        }
    }
}
