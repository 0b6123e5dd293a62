//! Helpers for building test frames from ASCII pictures.

use common::Buffer2;

/// Parse an ASCII picture into a frame.
///
/// - `#` is 255
/// - `.` is 0
/// - digits `0`-`9` are their numeric value
///
/// Leading/trailing whitespace of each line is ignored, blank lines are skipped.
pub(crate) fn frame_from_ascii(art: &str) -> Buffer2<u8> {
    let rows: Vec<&str> = art
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.len());

    let mut pixels = Vec::with_capacity(width * height);
    for row in &rows {
        assert_eq!(row.len(), width, "ragged picture row: {row:?}");
        pixels.extend(row.bytes().map(|c| match c {
            b'#' => 255,
            b'.' => 0,
            b'0'..=b'9' => c - b'0',
            other => panic!("unexpected picture character {:?}", other as char),
        }));
    }

    Buffer2::new(width, height, pixels)
}

/// Frame with filled rectangles `(x, y, w, h, value)` on a zero background.
pub(crate) fn frame_with_rects(width: usize, height: usize, rects: &[(usize, usize, usize, usize, u8)]) -> Buffer2<u8> {
    let mut frame = Buffer2::new_filled(width, height, 0u8);
    for &(rx, ry, rw, rh, value) in rects {
        for y in ry..ry + rh {
            for x in rx..rx + rw {
                frame[(x, y)] = value;
            }
        }
    }
    frame
}

/// Frame with a filled disk on a zero background.
pub(crate) fn frame_with_disk(width: usize, height: usize, cx: f64, cy: f64, radius: f64) -> Buffer2<u8> {
    Buffer2::from_fn(width, height, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        if dx * dx + dy * dy <= radius * radius {
            255
        } else {
            0
        }
    })
}

/// Area of a closed polygon (shoelace). The first point must be repeated at the end.
pub(crate) fn shoelace_area(points: &[(i32, i32)]) -> f64 {
    let twice: i64 = points
        .windows(2)
        .map(|w| w[0].0 as i64 * w[1].1 as i64 - w[1].0 as i64 * w[0].1 as i64)
        .sum();
    (twice as f64 / 2.0).abs()
}
