//! Second-moment statistics and principal axes.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::math::symmetric_eigen2;

/// Raw pixel moments of a blob: count, first and second order sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moments {
    pub count: i64,
    pub sum_x: i64,
    pub sum_y: i64,
    pub sum_xx: i64,
    pub sum_xy: i64,
    pub sum_yy: i64,
}

impl Moments {
    pub fn centroid(&self) -> DVec2 {
        if self.count == 0 {
            return DVec2::ZERO;
        }
        let n = self.count as f64;
        DVec2::new(self.sum_x as f64 / n, self.sum_y as f64 / n)
    }

    /// Population covariance `(cxx, cxy, cyy)`.
    ///
    /// Evaluated as `(n·Σab − Σa·Σb) / n²` in integers, so large offsets do not
    /// cancel out the spread.
    pub fn covariance(&self) -> (f64, f64, f64) {
        if self.count == 0 {
            return (0.0, 0.0, 0.0);
        }
        let n = self.count as i128;
        let n2 = (n * n) as f64;
        let central = |sum_ab: i64, sum_a: i64, sum_b: i64| {
            (n * sum_ab as i128 - sum_a as i128 * sum_b as i128) as f64 / n2
        };

        (
            central(self.sum_xx, self.sum_x, self.sum_x),
            central(self.sum_xy, self.sum_x, self.sum_y),
            central(self.sum_yy, self.sum_y, self.sum_y),
        )
    }

    pub fn pca(&self) -> PcaInfo {
        PcaInfo::from_moments(self)
    }
}

/// Principal axes of a blob's pixel distribution.
///
/// Axis lengths are `2·sqrt(λ)`. `angle` is the direction of the major axis in
/// radians, in `(-π/2, π/2]`, measured from +x towards +y (image rows grow
/// downwards). Single-pixel blobs have zero axes, angle 0 and the image axes
/// as directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PcaInfo {
    pub major_axis: f64,
    pub minor_axis: f64,
    pub angle: f64,
    /// `sqrt(1 - λ2/λ1)`: 0 for isotropic blobs, towards 1 for elongated ones.
    pub eccentricity: f64,
    pub center: DVec2,
    pub major_dir: DVec2,
    pub minor_dir: DVec2,
    /// `[λ1, λ2]`, `λ1 >= λ2 >= 0`.
    pub eigenvalues: [f64; 2],
}

impl PcaInfo {
    pub fn from_moments(moments: &Moments) -> Self {
        let (cxx, cxy, cyy) = moments.covariance();
        let eig = symmetric_eigen2(cxx, cxy, cyy);
        let l1 = eig.values[0].max(0.0);
        let l2 = eig.values[1].max(0.0);

        let mut angle = eig.vectors[0].y.atan2(eig.vectors[0].x);
        if angle <= -FRAC_PI_2 {
            angle += PI;
        } else if angle > FRAC_PI_2 {
            angle -= PI;
        }
        let major_dir = DVec2::from_angle(angle);

        let eccentricity = if l1 > 0.0 {
            (1.0 - l2 / l1).clamp(0.0, 1.0).sqrt()
        } else {
            0.0
        };

        Self {
            major_axis: 2.0 * l1.sqrt(),
            minor_axis: 2.0 * l2.sqrt(),
            angle,
            eccentricity,
            center: moments.centroid(),
            major_dir,
            minor_dir: major_dir.perp(),
            eigenvalues: [l1, l2],
        }
    }
}
