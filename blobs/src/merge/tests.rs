use super::*;
use crate::config::{ArenaConfig, ExhaustionPolicy, ValueRange};
use crate::math::Aabb;
use crate::frame::FrameView;
use crate::test_utils::frame_from_ascii;

/// Run a whole frame through the merger and return `(arena, counters)`.
fn merge_frame(art: &str, connectivity: Connectivity, policy: MergePolicy) -> (RegionArena, MergeCounters) {
    let buffer = frame_from_ascii(art);
    let frame = FrameView::new(buffer.pixels(), buffer.width(), buffer.height()).unwrap();
    let admission = Admission {
        range: ValueRange::new(1, 255),
        policy,
    };
    let mut arena = RegionArena::for_frame(&ArenaConfig::default(), frame.width(), frame.height(), policy);
    let mut merger = RowMerger::new(frame.width(), connectivity, policy);

    for y in 0..frame.height() {
        merger
            .process_row(frame.row(y), y, &admission, &mut arena)
            .unwrap();
    }
    merger.finish_frame(&mut arena);
    (arena, merger.counters())
}

fn roots(arena: &RegionArena) -> Vec<PartId> {
    arena
        .parts()
        .iter()
        .enumerate()
        .filter(|(i, part)| part.parent.index() == *i)
        .map(|(i, _)| PartId(i as u32))
        .collect()
}

#[test]
fn test_empty_frame_creates_nothing() {
    let (arena, counters) = merge_frame(
        "
        ....
        ....
        ",
        Connectivity::Eight,
        MergePolicy::RangeMembership,
    );
    assert!(arena.parts().is_empty());
    assert_eq!(counters, MergeCounters::default());
}

#[test]
fn test_u_shape_merges_two_parts() {
    // Two columns start separately and are joined by the bottom row.
    let (arena, counters) = merge_frame(
        "
        #...#
        #...#
        #####
        ",
        Connectivity::Eight,
        MergePolicy::RangeMembership,
    );

    assert_eq!(counters.parts_created, 2);
    assert_eq!(counters.merges, 1);
    assert_eq!(counters.scan_lines, 5);

    let roots = roots(&arena);
    assert_eq!(roots, vec![PartId(0)]);
    let stats = arena.part(PartId(0)).stats;
    assert_eq!(stats.pixel_count, 9);
    assert_eq!(stats.bbox, Aabb::new(0, 4, 0, 2));
    assert_eq!(stats.first, (0, 0));
}

#[test]
fn test_diagonal_touch_depends_on_connectivity() {
    let art = "
        ##..
        ##..
        ..##
        ..##
        ";

    let (arena, _) = merge_frame(art, Connectivity::Eight, MergePolicy::RangeMembership);
    assert_eq!(roots(&arena).len(), 1);

    let (arena, counters) = merge_frame(art, Connectivity::Four, MergePolicy::RangeMembership);
    assert_eq!(roots(&arena).len(), 2);
    assert_eq!(counters.merges, 0);
}

#[test]
fn test_comb_merges_into_earliest_part() {
    // Four teeth joined by a bar: three merges, root is the leftmost tooth.
    let (arena, counters) = merge_frame(
        "
        #.#.#.#
        #.#.#.#
        #######
        ",
        Connectivity::Four,
        MergePolicy::RangeMembership,
    );

    assert_eq!(counters.parts_created, 4);
    assert_eq!(counters.merges, 3);
    assert_eq!(roots(&arena), vec![PartId(0)]);
    assert_eq!(arena.part(PartId(0)).stats.pixel_count, 15);
}

#[test]
fn test_late_merge_keeps_enclosed_part_separate() {
    // The two outer columns only meet in the last row; the inner shape never
    // touches them.
    let (arena, _) = merge_frame(
        "
        #......#
        #.###..#
        #.#.#..#
        #......#
        ########
        ",
        Connectivity::Eight,
        MergePolicy::RangeMembership,
    );

    let roots = roots(&arena);
    assert_eq!(roots, vec![PartId(0), PartId(2)]);
    let outer = arena.part(roots[0]).stats;
    let inner = arena.part(roots[1]).stats;
    assert_eq!(outer.pixel_count, 16);
    assert_eq!(outer.bbox, Aabb::new(0, 7, 0, 4));
    assert_eq!(inner.pixel_count, 5);
    assert_eq!(inner.first, (2, 1));
}

#[test]
fn test_exact_value_keeps_labels_apart() {
    let art = "
        1122
        1122
        3333
        ";

    let (arena, _) = merge_frame(art, Connectivity::Eight, MergePolicy::RangeMembership);
    assert_eq!(roots(&arena).len(), 1);

    let (arena, _) = merge_frame(art, Connectivity::Eight, MergePolicy::ExactValue);
    let roots = roots(&arena);
    assert_eq!(roots.len(), 3);
    let values: Vec<u8> = roots.iter().map(|&r| arena.part(r).value).collect();
    assert_eq!(values, vec![1, 2, 3]);
    for root in roots {
        assert_eq!(arena.part(root).stats.pixel_count, 4);
    }
}

#[test]
fn test_scan_lines_are_recycled_every_row() {
    let art = "
        #.#.#
        #.#.#
        #.#.#
        #.#.#
        #.#.#
        #.#.#
        ";
    let (arena, counters) = merge_frame(art, Connectivity::Eight, MergePolicy::RangeMembership);

    assert_eq!(counters.scan_lines, 18);
    // Never more than two rows of runs alive.
    assert_eq!(arena.stats().peak_scan_lines, 6);
}

#[test]
fn test_union_find_compresses_paths() {
    let mut arena = RegionArena::new(1, 8, ExhaustionPolicy::Fail);
    let run = ScanLine {
        row: 0,
        x_start: 0,
        x_end: 1,
        value: 1,
        part: PartId::NONE,
    };
    for _ in 0..4 {
        arena.alloc_part(PartStats::from_run(&run), 1).unwrap();
    }

    assert_eq!(union_find::union(&mut arena, PartId(3), PartId(2)), PartId(2));
    assert_eq!(union_find::union(&mut arena, PartId(2), PartId(1)), PartId(1));
    assert_eq!(union_find::union(&mut arena, PartId(0), PartId(1)), PartId(0));
    // Same class again is a no-op.
    assert_eq!(union_find::union(&mut arena, PartId(3), PartId(0)), PartId(0));

    assert_eq!(union_find::find(&mut arena, PartId(3)), PartId(0));
    assert_eq!(arena.part(PartId(3)).parent, PartId(0));
    assert_eq!(arena.part(PartId(0)).stats.pixel_count, 4);
}
