//! Moore-neighbour contour tracing and contour measures.

use crate::config::Connectivity;

/// 8-neighbourhood, clockwise on screen starting east: E, SE, S, SW, W, NW, N, NE.
const NEIGHBOURS_8: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// 4-neighbourhood, clockwise on screen starting east: E, S, W, N.
const NEIGHBOURS_4: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

#[inline]
fn neighbours(connectivity: Connectivity) -> &'static [(i64, i64)] {
    match connectivity {
        Connectivity::Four => &NEIGHBOURS_4,
        Connectivity::Eight => &NEIGHBOURS_8,
    }
}

/// Search direction for the very first move. North, since nothing above or left
/// of the topmost-leftmost pixel belongs to the blob.
#[inline]
fn initial_search(connectivity: Connectivity) -> usize {
    match connectivity {
        Connectivity::Four => 3,
        Connectivity::Eight => 6,
    }
}

/// Where to resume the clockwise search after moving in direction `dir`.
#[inline]
fn next_search(dir: usize, connectivity: Connectivity) -> usize {
    match connectivity {
        Connectivity::Four => (dir + 3) % 4,
        Connectivity::Eight => (dir + 7 - (dir & 1)) % 8,
    }
}

/// First member neighbour of `pos` in clockwise order starting at `from`.
#[inline]
fn find_member(
    pos: (i64, i64),
    from: usize,
    offsets: &[(i64, i64)],
    is_member: &impl Fn(i64, i64) -> bool,
) -> Option<usize> {
    (0..offsets.len())
        .map(|k| (from + k) % offsets.len())
        .find(|&d| is_member(pos.0 + offsets[d].0, pos.1 + offsets[d].1))
}

/// Trace the outer contour clockwise, starting at the topmost-leftmost pixel.
///
/// The trace stops when the start pixel is left again in the direction of the
/// first move, or after `max_steps` moves. A finished contour is closed: the
/// start pixel is both the first and the last point. A single pixel yields
/// `[p, p]`. A contour cut short by `max_steps` is returned open.
pub fn trace_boundary(
    start: (usize, usize),
    connectivity: Connectivity,
    max_steps: usize,
    is_member: impl Fn(i64, i64) -> bool,
) -> Vec<(i32, i32)> {
    let offsets = neighbours(connectivity);
    let start = (start.0 as i64, start.1 as i64);
    let point = |p: (i64, i64)| (p.0 as i32, p.1 as i32);

    let mut contour = vec![point(start)];
    let Some(first_dir) = find_member(start, initial_search(connectivity), offsets, &is_member) else {
        contour.push(point(start));
        return contour;
    };

    let mut pos = start;
    let mut dir = first_dir;
    for _ in 0..max_steps {
        pos = (pos.0 + offsets[dir].0, pos.1 + offsets[dir].1);
        contour.push(point(pos));

        // We arrived from a member, so the search always finds one.
        let Some(next) = find_member(pos, next_search(dir, connectivity), offsets, &is_member) else {
            break;
        };
        if pos == start && next == first_dir {
            return contour;
        }
        dir = next;
    }

    log::debug!(
        "Boundary trace from {:?} stopped after {} steps without closing",
        start,
        max_steps
    );
    contour
}

/// Drop contour points that are not needed to keep the contour 8-connected.
///
/// A diagonal staircase traced pixel by pixel becomes a clean diagonal:
///
/// ```text
///   ..##      ...#
///   .##.  ->  ..#.
///   ##..      .#..
/// ```
///
/// Input and output are closed contours (first point repeated at the end).
pub fn thin_boundary(contour: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let open = open_contour(contour);
    let n = open.len();
    if n < 3 {
        return contour.to_vec();
    }

    let near = |a: (i32, i32), b: (i32, i32)| (a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1;

    let mut thinned = Vec::with_capacity(n + 1);
    let mut last = open[0];
    thinned.push(last);

    let mut i = 2;
    while i < n {
        // Skip the point after `last` if the one after it is still adjacent.
        if !near(open[i], last) {
            i -= 1;
        }
        last = open[i];
        thinned.push(last);
        i += 2;
    }

    if !near(open[0], last) {
        thinned.push(open[n - 1]);
    }
    thinned.push(open[0]);
    thinned
}

/// Length estimate of a thinned closed contour.
///
/// Every point is classified by how many of its two segments are diagonal:
/// none (a straight 0° run, weight 1), one (a 26.57° slope, weight
/// `1/cos(atan(1/2))`) or two (a 45° run, weight `√2`).
pub fn boundary_length(thinned: &[(i32, i32)]) -> f64 {
    let open = open_contour(thinned);
    let n = open.len();
    if n < 2 {
        return n as f64;
    }

    let weights = [1.0, 1.0 / 0.5f64.atan().cos(), std::f64::consts::SQRT_2];
    let diagonal = |a: (i32, i32), b: (i32, i32)| a.0 != b.0 && a.1 != b.1;

    (0..n)
        .map(|i| {
            let pre = open[(i + n - 1) % n];
            let cur = open[i];
            let post = open[(i + 1) % n];
            weights[diagonal(pre, cur) as usize + diagonal(cur, post) as usize]
        })
        .sum()
}

/// Contour without the repeated closing point.
fn open_contour(contour: &[(i32, i32)]) -> &[(i32, i32)] {
    match contour {
        [first, .., last] if first == last => &contour[..contour.len() - 1],
        _ => contour,
    }
}
