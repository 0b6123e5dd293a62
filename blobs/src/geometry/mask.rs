//! Per-pixel blob membership, rebuilt from the frame.

use common::Buffer2;

use crate::config::Connectivity;
use crate::math::Aabb;

const OFFSETS_4: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const OFFSETS_8: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Pixel offsets that count as adjacent under `connectivity`.
#[inline]
pub(crate) fn neighbour_offsets(connectivity: Connectivity) -> &'static [(i64, i64)] {
    match connectivity {
        Connectivity::Four => &OFFSETS_4,
        Connectivity::Eight => &OFFSETS_8,
    }
}

/// Flood fill from `seed` over member pixels inside `bbox`.
///
/// Returns a mask in bbox-local coordinates: `mask[(x - bbox.x_min, y - bbox.y_min)]`.
/// Pixels of other regions inside the box are not reached.
pub(crate) fn flood_fill(
    seed: (usize, usize),
    bbox: &Aabb,
    connectivity: Connectivity,
    is_member: impl Fn(usize, usize) -> bool,
) -> Buffer2<bool> {
    let mut mask = Buffer2::new_filled(bbox.width(), bbox.height(), false);
    if !bbox.contains(seed.0, seed.1) || !is_member(seed.0, seed.1) {
        return mask;
    }

    let offsets = neighbour_offsets(connectivity);
    let mut stack = vec![seed];
    mask[(seed.0 - bbox.x_min, seed.1 - bbox.y_min)] = true;

    while let Some((x, y)) = stack.pop() {
        for &(dx, dy) in offsets {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if !bbox.contains_signed(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            let local = (nx - bbox.x_min, ny - bbox.y_min);
            if mask[local] || !is_member(nx, ny) {
                continue;
            }
            mask[local] = true;
            stack.push((nx, ny));
        }
    }

    mask
}

/// Mask with every hole closed: cells of `mask` plus all cells that cannot be
/// reached from outside the box without crossing `mask`.
///
/// The background is walked with the complementary connectivity, so an
/// 8-connected region seals a hole even where it only touches diagonally.
pub(crate) fn fill_holes(mask: &Buffer2<bool>, connectivity: Connectivity) -> Buffer2<bool> {
    let (width, height) = (mask.width(), mask.height());
    let offsets = match connectivity {
        Connectivity::Four => neighbour_offsets(Connectivity::Eight),
        Connectivity::Eight => neighbour_offsets(Connectivity::Four),
    };

    let mut outside = Buffer2::new_filled(width, height, false);
    let mut stack = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let on_edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_edge && !mask[(x, y)] {
                outside[(x, y)] = true;
                stack.push((x, y));
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for &(dx, dy) in offsets {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if outside[(nx, ny)] || mask[(nx, ny)] {
                continue;
            }
            outside[(nx, ny)] = true;
            stack.push((nx, ny));
        }
    }

    Buffer2::from_fn(width, height, |x, y| !outside[(x, y)])
}
