//! Scan-line extraction: maximal runs of accepted pixels in one row.

#[cfg(test)]
mod tests;

use crate::arena::{PartId, RegionArena, ScanLine, SlotId};
use crate::config::MergePolicy;
use crate::error::Result;
use crate::frame::Admission;

/// Append the runs of row `y` to `out`, left to right.
///
/// A run is a maximal sequence of admitted pixels. With
/// [`MergePolicy::ExactValue`] a run also ends where the value changes, so
/// every run is homogeneous. The run value is the value of its first pixel.
pub(crate) fn extract_row(
    row: &[u8],
    y: usize,
    admission: &Admission,
    arena: &mut RegionArena,
    out: &mut Vec<SlotId>,
) -> Result<()> {
    let split_on_value = admission.policy == MergePolicy::ExactValue;
    let width = row.len();
    let mut x = 0;

    while x < width {
        let value = row[x];
        if !admission.admits(value) {
            x += 1;
            continue;
        }

        let start = x;
        x += 1;
        if split_on_value {
            while x < width && row[x] == value {
                x += 1;
            }
        } else {
            while x < width && admission.admits(row[x]) {
                x += 1;
            }
        }

        let slot = arena.alloc_scan_line(ScanLine {
            row: y as u32,
            x_start: start as u32,
            x_end: x as u32,
            value,
            part: PartId::NONE,
        })?;
        out.push(slot);
    }

    Ok(())
}
