//! Public blob records and the per-frame result view.

use std::ops::Deref;
use std::sync::OnceLock;

use common::Buffer2;
use glam::DVec2;

use crate::arena::BlobPart;
use crate::config::Connectivity;
use crate::frame::{Admission, FrameView};
use crate::geometry::{self, mask, Moments, PcaInfo};
use crate::math::{Aabb, Rect};

// ============================================================================
// Blob
// ============================================================================

/// A connected region found in one frame.
///
/// Statistics are frozen at finalization. PCA, the contour and the pixel mask
/// are computed on first use and cached.
#[derive(Debug, Clone)]
pub struct Blob {
    id: usize,
    part_id: u32,
    value: u8,
    first_pixel: (usize, usize),
    bbox: Aabb,
    moments: Moments,
    pca: OnceLock<PcaInfo>,
    boundary: OnceLock<Vec<(i32, i32)>>,
    mask: OnceLock<Buffer2<bool>>,
    filled: OnceLock<Buffer2<bool>>,
}

impl Blob {
    pub(crate) fn from_root(id: usize, part_id: u32, part: &BlobPart) -> Self {
        let stats = &part.stats;
        Self {
            id,
            part_id,
            value: part.value,
            first_pixel: stats.first,
            bbox: stats.bbox,
            moments: Moments {
                count: stats.pixel_count,
                sum_x: stats.sum_x,
                sum_y: stats.sum_y,
                sum_xx: stats.sum_xx,
                sum_xy: stats.sum_xy,
                sum_yy: stats.sum_yy,
            },
            pca: OnceLock::new(),
            boundary: OnceLock::new(),
            mask: OnceLock::new(),
            filled: OnceLock::new(),
        }
    }

    /// Index of this blob in the frame's result list.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Id of the root part the blob was finalized from.
    #[inline]
    pub fn part_id(&self) -> u32 {
        self.part_id
    }

    /// Representative value: the value at [`Blob::first_pixel`].
    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.moments.count as u64
    }

    /// Bounding box as origin plus size.
    #[inline]
    pub fn bounding_box(&self) -> Rect {
        Rect::from(self.bbox)
    }

    /// Bounding box with inclusive bounds.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.bbox
    }

    #[inline]
    pub fn centroid(&self) -> DVec2 {
        self.moments.centroid()
    }

    /// Topmost, then leftmost pixel as (x, y).
    #[inline]
    pub fn first_pixel(&self) -> (usize, usize) {
        self.first_pixel
    }

    #[inline]
    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    pub fn pca(&self) -> &PcaInfo {
        self.pca.get_or_init(|| self.moments.pca())
    }

    /// Whether the bounding box touches the border of a `width` x `height` frame.
    #[inline]
    pub fn is_border_blob(&self, width: usize, height: usize) -> bool {
        self.bbox.touches_border(width, height)
    }
}

/// One row of a blob: pixels `x_start..x_end` of row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub y: usize,
    pub x_start: usize,
    /// Exclusive.
    pub x_end: usize,
}

impl LineSegment {
    #[inline]
    pub fn len(&self) -> usize {
        self.x_end - self.x_start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x_end == self.x_start
    }
}

// ============================================================================
// Pixel access
// ============================================================================

/// Everything needed to re-read blob pixels from the frame.
#[derive(Debug, Clone, Copy)]
struct PixelSource<'a> {
    frame: FrameView<'a>,
    admission: Admission,
    connectivity: Connectivity,
}

impl PixelSource<'_> {
    #[inline]
    fn is_member(&self, blob: &Blob, x: usize, y: usize) -> bool {
        blob.bbox.contains(x, y) && self.admission.member_of(blob.value, self.frame.get(x, y))
    }
}

/// A blob together with the frame it was found in.
///
/// Geometry that needs per-pixel membership (contour, mask) is only reachable
/// through this view.
#[derive(Debug, Clone, Copy)]
pub struct BlobRef<'a> {
    blob: &'a Blob,
    source: PixelSource<'a>,
}

impl<'a> Deref for BlobRef<'a> {
    type Target = Blob;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.blob
    }
}

impl<'a> BlobRef<'a> {
    #[inline]
    pub fn blob(&self) -> &'a Blob {
        self.blob
    }

    fn full_boundary(&self) -> &'a [(i32, i32)] {
        let blob = self.blob;
        let source = self.source;
        blob.boundary.get_or_init(|| {
            let max_steps = 4 * (blob.moments.count as usize + 1);
            geometry::trace_boundary(blob.first_pixel, source.connectivity, max_steps, |x, y| {
                blob.bbox.contains_signed(x, y) && source.is_member(blob, x as usize, y as usize)
            })
        })
    }

    /// Outer contour, clockwise from [`Blob::first_pixel`], closed (first point
    /// repeated at the end).
    ///
    /// `limit_size` caps the number of points; `0` means no cap. A capped
    /// contour is open.
    pub fn boundary(&self, limit_size: usize) -> Vec<(i32, i32)> {
        let full = self.full_boundary();
        if limit_size == 0 || limit_size >= full.len() {
            return full.to_vec();
        }

        log::debug!(
            "Blob {} boundary truncated from {} to {} points",
            self.blob.id,
            full.len(),
            limit_size
        );
        full[..limit_size].to_vec()
    }

    /// Contour with redundant staircase points removed. Closed.
    pub fn thinned_boundary(&self) -> Vec<(i32, i32)> {
        geometry::thin_boundary(self.full_boundary())
    }

    /// Estimated contour length in pixels.
    pub fn boundary_length(&self) -> f64 {
        geometry::boundary_length(&self.thinned_boundary())
    }

    /// `L² / (4π·A)`: about 1 for disks, larger for elongated or ragged shapes.
    pub fn form_factor(&self) -> f64 {
        let length = self.boundary_length();
        length * length / (4.0 * std::f64::consts::PI * self.blob.moments.count as f64)
    }

    /// Membership mask in bounding-box coordinates, rebuilt by flood fill.
    pub fn mask(&self) -> &'a Buffer2<bool> {
        let blob = self.blob;
        let source = self.source;
        blob.mask.get_or_init(|| {
            mask::flood_fill(blob.first_pixel, &blob.bbox, source.connectivity, |x, y| {
                source.is_member(blob, x, y)
            })
        })
    }

    /// Frame coordinates of every pixel of the blob, row-major.
    pub fn pixels(&self) -> Vec<(usize, usize)> {
        let mask = self.mask();
        let (x0, y0) = (self.blob.bbox.x_min, self.blob.bbox.y_min);
        let mut pixels = Vec::with_capacity(self.blob.pixel_count() as usize);
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask[(x, y)] {
                    pixels.push((x0 + x, y0 + y));
                }
            }
        }
        pixels
    }

    /// Maximal horizontal runs of the blob, row-major.
    pub fn line_segments(&self) -> Vec<LineSegment> {
        let mask = self.mask();
        let (x0, y0) = (self.blob.bbox.x_min, self.blob.bbox.y_min);
        let width = mask.width();

        let mut segments = Vec::new();
        for y in 0..mask.height() {
            let mut x = 0;
            while x < width {
                if !mask[(x, y)] {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < width && mask[(x, y)] {
                    x += 1;
                }
                segments.push(LineSegment {
                    y: y0 + y,
                    x_start: x0 + start,
                    x_end: x0 + x,
                });
            }
        }
        segments
    }

    /// Whether the frame pixel (x, y) belongs to this blob.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        if !self.source.is_member(self.blob, x, y) {
            return false;
        }
        self.mask()[(x - self.blob.bbox.x_min, y - self.blob.bbox.y_min)]
    }

    /// [`BlobRef::mask`] with the holes filled in.
    pub fn filled_mask(&self) -> &'a Buffer2<bool> {
        let blob = self.blob;
        let connectivity = self.source.connectivity;
        let mask = self.mask();
        blob.filled.get_or_init(|| mask::fill_holes(mask, connectivity))
    }

    #[inline]
    fn mask_at(&self, x: i64, y: i64) -> bool {
        let bbox = &self.blob.bbox;
        bbox.contains_signed(x, y) && self.mask()[(x as usize - bbox.x_min, y as usize - bbox.y_min)]
    }

    /// Whether `other` lies inside one of this blob's holes.
    pub fn encloses(&self, other: &BlobRef<'_>) -> bool {
        let (outer, inner) = (&self.blob.bbox, &other.blob.bbox);
        let strictly_inside = inner.x_min > outer.x_min
            && inner.x_max < outer.x_max
            && inner.y_min > outer.y_min
            && inner.y_max < outer.y_max;
        if std::ptr::eq(self.blob, other.blob) || !strictly_inside {
            return false;
        }

        let filled = self.filled_mask();
        other
            .pixels()
            .iter()
            .all(|&(x, y)| filled[(x - outer.x_min, y - outer.y_min)])
    }

    /// Whether a pixel of `other` is adjacent to a pixel of this blob.
    pub fn touches(&self, other: &BlobRef<'_>) -> bool {
        let (a, b) = (&self.blob.bbox, &other.blob.bbox);
        let apart = a.x_min > b.x_max + 1
            || b.x_min > a.x_max + 1
            || a.y_min > b.y_max + 1
            || b.y_min > a.y_max + 1;
        if std::ptr::eq(self.blob, other.blob) || apart {
            return false;
        }

        let offsets = mask::neighbour_offsets(self.source.connectivity);
        other.pixels().iter().any(|&(x, y)| {
            offsets
                .iter()
                .any(|&(dx, dy)| self.mask_at(x as i64 + dx, y as i64 + dy))
        })
    }
}

// ============================================================================
// Blobs
// ============================================================================

/// Result of one `find_blobs` call.
///
/// Derefs to `[Blob]` in discovery order (row-major by first pixel). Borrows
/// the detector and the frame, so it cannot outlive the next call.
#[derive(Debug, Clone, Copy)]
pub struct Blobs<'a> {
    blobs: &'a [Blob],
    source: PixelSource<'a>,
}

impl<'a> Blobs<'a> {
    pub(crate) fn new(
        blobs: &'a [Blob],
        frame: FrameView<'a>,
        admission: Admission,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            blobs,
            source: PixelSource {
                frame,
                admission,
                connectivity,
            },
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [Blob] {
        self.blobs
    }

    pub fn get(&self, index: usize) -> Option<BlobRef<'a>> {
        self.blobs.get(index).map(|blob| BlobRef {
            blob,
            source: self.source,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = BlobRef<'a>> + '_ {
        let source = self.source;
        self.blobs.iter().map(move |blob| BlobRef { blob, source })
    }

    /// The blob containing pixel (x, y), if any.
    pub fn blob_at(&self, x: usize, y: usize) -> Option<BlobRef<'a>> {
        if x >= self.source.frame.width() || y >= self.source.frame.height() {
            return None;
        }
        self.iter().find(|blob| blob.contains(x, y))
    }

    /// Blobs adjacent to blob `index`.
    ///
    /// Touching blobs always differ in value, so this is empty under
    /// [`MergePolicy::RangeMembership`](crate::MergePolicy::RangeMembership).
    pub fn neighbours(&self, index: usize) -> Vec<BlobRef<'a>> {
        let Some(blob) = self.get(index) else {
            return Vec::new();
        };
        self.iter().filter(|other| blob.touches(other)).collect()
    }

    /// Innermost blob holding blob `index` inside one of its holes.
    pub fn parent(&self, index: usize) -> Option<BlobRef<'a>> {
        let blob = self.get(index)?;
        self.iter()
            .filter(|other| other.encloses(&blob))
            .min_by_key(|other| other.aabb().area())
    }

    /// Parent, grandparent and so on, innermost first.
    pub fn parent_tree(&self, index: usize) -> Vec<BlobRef<'a>> {
        let mut tree = Vec::new();
        let mut current = index;
        while let Some(parent) = self.parent(current) {
            current = parent.id();
            tree.push(parent);
        }
        tree
    }

    /// Blobs whose parent is blob `index`.
    pub fn sub_regions(&self, index: usize) -> Vec<BlobRef<'a>> {
        if index >= self.blobs.len() {
            return Vec::new();
        }
        self.iter()
            .filter(|blob| self.parent(blob.id()).is_some_and(|parent| parent.id() == index))
            .collect()
    }

    /// Frame width the blobs were found in.
    #[inline]
    pub fn frame_width(&self) -> usize {
        self.source.frame.width()
    }

    /// Frame height the blobs were found in.
    #[inline]
    pub fn frame_height(&self) -> usize {
        self.source.frame.height()
    }
}

impl<'a> Deref for Blobs<'a> {
    type Target = [Blob];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.blobs
    }
}
