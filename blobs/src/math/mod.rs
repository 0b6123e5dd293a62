//! Small geometry helpers shared by the detector stages.

mod bbox;
mod eigen;

pub use bbox::{Aabb, Rect};
pub(crate) use eigen::symmetric_eigen2;
