//! Row-to-row merging of scan-lines into blob parts.
//!
//! Runs of the current row are swept against the runs of the previous row.
//! Both rows are sorted by `x_start` and non-overlapping, so a single
//! forward-moving cursor over the previous row finds every candidate:
//!
//! ```text
//!   prev:  ###..####...##
//!   curr:  ..######...#..
//! ```
//!
//! The middle run joins both runs above it (an hourglass shape merges two
//! parts into one class). A run with no compatible predecessor becomes a new
//! root part.

#[cfg(test)]
mod tests;
pub(crate) mod union_find;

use crate::arena::{PartId, PartStats, RegionArena, ScanLine, SlotId};
use crate::config::{Connectivity, MergePolicy};
use crate::error::Result;
use crate::frame::Admission;
use crate::scanline::extract_row;

/// Search window in the previous row for a run. Returns (start, end), end exclusive.
#[inline]
fn search_window(run: &ScanLine, connectivity: Connectivity) -> (u32, u32) {
    match connectivity {
        Connectivity::Four => (run.x_start, run.x_end),
        Connectivity::Eight => (run.x_start.saturating_sub(1), run.x_end + 1),
    }
}

/// Check if two runs from adjacent rows are connected.
#[inline]
fn runs_connected(prev: &ScanLine, curr: &ScanLine, connectivity: Connectivity) -> bool {
    match connectivity {
        Connectivity::Four => prev.x_start < curr.x_end && prev.x_end > curr.x_start,
        Connectivity::Eight => prev.x_start < curr.x_end + 1 && prev.x_end + 1 > curr.x_start,
    }
}

/// Merge counters of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MergeCounters {
    pub scan_lines: usize,
    pub parts_created: usize,
    pub merges: usize,
}

/// Streams rows through extraction and merging, keeping two rows of runs alive.
#[derive(Debug)]
pub(crate) struct RowMerger {
    prev_row: Vec<SlotId>,
    curr_row: Vec<SlotId>,
    connectivity: Connectivity,
    policy: MergePolicy,
    counters: MergeCounters,
}

impl RowMerger {
    pub fn new(width: usize, connectivity: Connectivity, policy: MergePolicy) -> Self {
        let runs_per_row = width.div_ceil(2);
        Self {
            prev_row: Vec::with_capacity(runs_per_row),
            curr_row: Vec::with_capacity(runs_per_row),
            connectivity,
            policy,
            counters: MergeCounters::default(),
        }
    }

    /// Forget everything from the previous frame. The arena must be reset too.
    pub fn begin_frame(&mut self, connectivity: Connectivity, policy: MergePolicy) {
        self.prev_row.clear();
        self.curr_row.clear();
        self.connectivity = connectivity;
        self.policy = policy;
        self.counters = MergeCounters::default();
    }

    pub fn counters(&self) -> MergeCounters {
        self.counters
    }

    /// Extract the runs of row `y` and merge them with the previous row.
    ///
    /// Afterwards the runs of the previous row are returned to the arena.
    pub fn process_row(
        &mut self,
        row: &[u8],
        y: usize,
        admission: &Admission,
        arena: &mut RegionArena,
    ) -> Result<()> {
        debug_assert_eq!(admission.policy, self.policy);

        self.curr_row.clear();
        extract_row(row, y, admission, arena, &mut self.curr_row)?;
        self.counters.scan_lines += self.curr_row.len();

        self.merge_with_prev(arena)?;

        for slot in self.prev_row.drain(..) {
            arena.release_scan_line(slot);
        }
        std::mem::swap(&mut self.prev_row, &mut self.curr_row);
        Ok(())
    }

    /// Return the runs of the last row to the arena.
    pub fn finish_frame(&mut self, arena: &mut RegionArena) {
        for slot in self.prev_row.drain(..) {
            arena.release_scan_line(slot);
        }
        self.curr_row.clear();
    }

    fn merge_with_prev(&mut self, arena: &mut RegionArena) -> Result<()> {
        let connectivity = self.connectivity;
        let policy = self.policy;
        let prev_row = &self.prev_row;

        let mut prev_idx = 0;
        for &slot in &self.curr_row {
            let run = *arena.scan_line(slot);
            let (search_start, search_end) = search_window(&run, connectivity);

            while prev_idx < prev_row.len() && arena.scan_line(prev_row[prev_idx]).x_end <= search_start {
                prev_idx += 1;
            }

            let mut assigned: Option<PartId> = None;
            let mut check_idx = prev_idx;
            while check_idx < prev_row.len() {
                let prev_slot = prev_row[check_idx];
                let prev_run = *arena.scan_line(prev_slot);
                if prev_run.x_start >= search_end {
                    break;
                }

                if runs_connected(&prev_run, &run, connectivity) && policy.compatible(prev_run.value, run.value) {
                    let root = union_find::find(arena, prev_run.part);
                    arena.scan_line_mut(prev_slot).part = root;
                    match assigned {
                        Some(part) if part != root => {
                            assigned = Some(union_find::union(arena, part, root));
                            self.counters.merges += 1;
                        }
                        None => assigned = Some(root),
                        _ => {}
                    }
                }
                check_idx += 1;
            }

            let stats = PartStats::from_run(&run);
            let part = match assigned {
                Some(root) => {
                    arena.part_mut(root).stats.absorb(&stats);
                    root
                }
                None => {
                    self.counters.parts_created += 1;
                    arena.alloc_part(stats, run.value)?
                }
            };
            arena.scan_line_mut(slot).part = part;
        }

        Ok(())
    }
}
