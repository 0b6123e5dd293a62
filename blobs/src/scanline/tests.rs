use super::*;
use crate::config::{ExhaustionPolicy, ValueRange};
use crate::error::{Error, Pool};

fn runs(row: &[u8], admission: Admission) -> Vec<(u32, u32, u8)> {
    let mut arena = RegionArena::new(row.len() + 1, 1, ExhaustionPolicy::Fail);
    let mut out = Vec::new();
    extract_row(row, 3, &admission, &mut arena, &mut out).unwrap();
    out.iter()
        .map(|&slot| {
            let l = arena.scan_line(slot);
            assert_eq!(l.row, 3);
            assert_eq!(l.part, PartId::NONE);
            (l.x_start, l.x_end, l.value)
        })
        .collect()
}

fn range(min: u8, max: u8) -> Admission {
    Admission {
        range: ValueRange::new(min, max),
        policy: MergePolicy::RangeMembership,
    }
}

fn exact(min: u8, max: u8) -> Admission {
    Admission {
        range: ValueRange::new(min, max),
        policy: MergePolicy::ExactValue,
    }
}

#[test]
fn test_empty_row() {
    assert!(runs(&[0, 0, 0, 0], range(1, 255)).is_empty());
}

#[test]
fn test_full_row_is_one_run() {
    assert_eq!(runs(&[9, 9, 9, 9, 9], range(1, 255)), vec![(0, 5, 9)]);
}

#[test]
fn test_runs_touching_both_edges() {
    let row = [1, 1, 0, 0, 1, 0, 1, 1];
    assert_eq!(
        runs(&row, range(1, 255)),
        vec![(0, 2, 1), (4, 5, 1), (6, 8, 1)]
    );
}

#[test]
fn test_range_bounds_are_inclusive() {
    let row = [9, 10, 15, 20, 21, 20];
    assert_eq!(runs(&row, range(10, 20)), vec![(1, 4, 10), (5, 6, 20)]);
}

#[test]
fn test_range_membership_keeps_mixed_values_together() {
    let row = [0, 3, 7, 7, 5, 0];
    assert_eq!(runs(&row, range(1, 255)), vec![(1, 5, 3)]);
}

#[test]
fn test_exact_value_splits_on_value_change() {
    let row = [0, 3, 7, 7, 5, 0, 5];
    assert_eq!(
        runs(&row, exact(1, 255)),
        vec![(1, 2, 3), (2, 4, 7), (4, 5, 5), (6, 7, 5)]
    );
}

#[test]
fn test_value_zero_can_be_foreground() {
    let row = [0, 0, 1, 0];
    assert_eq!(runs(&row, range(0, 0)), vec![(0, 2, 0), (3, 4, 0)]);
}

#[test]
fn test_exhausted_pool_aborts_row() {
    let mut arena = RegionArena::new(2, 1, ExhaustionPolicy::Fail);
    let mut out = Vec::new();
    let row = [1, 0, 1, 0, 1];

    let err = extract_row(&row, 0, &range(1, 255), &mut arena, &mut out).unwrap_err();
    assert_eq!(
        err,
        Error::CapacityExceeded {
            pool: Pool::ScanLines,
            capacity: 2
        }
    );
    assert_eq!(out.len(), 2);
}
