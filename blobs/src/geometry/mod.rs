//! Geometry derived from blob statistics and the frame pixels.
//!
//! PCA works on the moments accumulated during merging. Everything contour or
//! pixel related re-reads the frame, because runs and parts do not keep
//! per-pixel membership once a frame is finalized.

mod boundary;
pub(crate) mod mask;
mod pca;


pub use boundary::{boundary_length, thin_boundary, trace_boundary};
pub use pca::{Moments, PcaInfo};
