//! End-of-frame collapse of part classes into filtered blobs.

use crate::arena::RegionArena;
use crate::blob::Blob;
use crate::config::ValueRange;

/// What finalization saw and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FinalizeSummary {
    pub roots: usize,
    pub rejected_size: usize,
    pub rejected_value: usize,
}

/// Turn every root part that passes both filters into a blob, appended to `out`
/// in root id order.
///
/// Root ids follow row-major creation order and a class is always rooted at its
/// earliest part, so the output is ordered by each blob's first pixel.
pub(crate) fn finalize(
    arena: &RegionArena,
    size_range: ValueRange<u64>,
    value_range: ValueRange<u8>,
    out: &mut Vec<Blob>,
) -> FinalizeSummary {
    let mut summary = FinalizeSummary::default();

    for (index, part) in arena.parts().iter().enumerate() {
        if part.parent.index() != index {
            continue;
        }
        summary.roots += 1;

        if !size_range.contains(part.stats.pixel_count as u64) {
            summary.rejected_size += 1;
            continue;
        }
        if !value_range.contains(part.value) {
            summary.rejected_value += 1;
            continue;
        }

        out.push(Blob::from_root(out.len(), index as u32, part));
    }

    summary
}
