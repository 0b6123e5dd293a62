//! Blobs - connected region extraction for labeled or thresholded frames.
//!
//! Turns a row-major 8-bit frame into a list of 8- (or 4-) connected regions
//! whose pixel values fall into an accepted range:
//! - Scan-line extraction of maximal accepted runs per row
//! - Row-to-row merging of runs into blob parts with index-based union-find
//! - A per-frame reusable arena for scan-lines and parts
//! - Finalization with size/value filtering
//! - On-demand geometry: PCA, boundary tracing, boundary length, form factor
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blobs::RegionDetector;
//!
//! let mut detector = RegionDetector::new(640, 480, 20, 50_000, 128, 255)?;
//! let blobs = detector.find_blobs(&frame, 640, 480)?;
//! for blob in blobs.iter() {
//!     let pca = blob.pca();
//!     let contour = blob.boundary(0);
//!     println!("{} px at {:?}, {} contour points", blob.pixel_count(), blob.centroid(), contour.len());
//! }
//! ```
//!
//! Blobs borrow the detector: the next `find_blobs` call recycles the arena,
//! so results of the previous frame cannot outlive it.

mod arena;
mod blob;
mod config;
mod detector;
mod error;
mod finalize;
mod frame;
pub mod geometry;
pub(crate) mod math;
mod merge;
mod scanline;

#[cfg(test)]
pub(crate) mod test_utils;

pub use arena::ArenaStats;
pub use blob::{Blob, BlobRef, Blobs, LineSegment};
pub use config::{
    ArenaConfig, Connectivity, DetectorConfig, ExhaustionPolicy, MergePolicy, ValueRange,
    MAX_DIMENSION,
};
pub use detector::{FrameDiagnostics, RegionDetector};
pub use error::{Error, Pool, Result};
pub use geometry::{Moments, PcaInfo};
pub use math::{Aabb, Rect};
