//! Union-find over arena part ids.

use crate::arena::{PartId, RegionArena};

/// Root of `id`'s equivalence class, compressing the path on the way.
#[inline]
pub(crate) fn find(arena: &mut RegionArena, id: PartId) -> PartId {
    // First pass: find root
    let mut root = id;
    loop {
        let parent = arena.part(root).parent;
        if parent == root {
            break;
        }
        root = parent;
    }

    // Second pass: compress path
    let mut current = id;
    while current != root {
        let part = arena.part_mut(current);
        let next = part.parent;
        part.parent = root;
        current = next;
    }

    root
}

/// Join the classes of `a` and `b` and return the surviving root.
///
/// The smaller id survives and absorbs the statistics of the other root, so a
/// class is always represented by its earliest created part.
#[inline]
pub(crate) fn union(arena: &mut RegionArena, a: PartId, b: PartId) -> PartId {
    let root_a = find(arena, a);
    let root_b = find(arena, b);
    if root_a == root_b {
        return root_a;
    }

    let (smaller, larger) = if root_a < root_b {
        (root_a, root_b)
    } else {
        (root_b, root_a)
    };
    let absorbed = arena.part(larger).stats;
    arena.part_mut(smaller).stats.absorb(&absorbed);
    arena.part_mut(larger).parent = smaller;

    smaller
}
