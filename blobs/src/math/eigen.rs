//! Closed-form eigen-decomposition of symmetric 2x2 matrices.

use glam::DVec2;

/// Eigen-decomposition of `[[a, b], [b, c]]`.
///
/// `values[0] >= values[1]`; `vectors` are unit length, mutually orthogonal
/// and belong to the eigenvalue with the same index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SymmetricEigen2 {
    pub values: [f64; 2],
    pub vectors: [DVec2; 2],
}

pub(crate) fn symmetric_eigen2(a: f64, b: f64, c: f64) -> SymmetricEigen2 {
    let mean = 0.5 * (a + c);
    let half_diff = 0.5 * (a - c);
    let radius = half_diff.hypot(b);

    let major = mean + radius;
    let minor = mean - radius;

    // For an isotropic matrix every direction is an eigenvector.
    let major_dir = if radius <= f64::EPSILON * mean.abs().max(1.0) {
        DVec2::X
    } else if half_diff >= 0.0 {
        // (major - c, b) is better conditioned when a >= c.
        DVec2::new(major - c, b).normalize()
    } else {
        DVec2::new(b, major - a).normalize()
    };
    let minor_dir = major_dir.perp();

    SymmetricEigen2 {
        values: [major, minor],
        vectors: [major_dir, minor_dir],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_eigenpair(a: f64, b: f64, c: f64, value: f64, vector: DVec2) {
        let mv = DVec2::new(a * vector.x + b * vector.y, b * vector.x + c * vector.y);
        assert!(
            (mv - vector * value).length() < 1e-9,
            "not an eigenpair: {value} {vector:?}"
        );
    }

    #[test]
    fn test_diagonal() {
        let eig = symmetric_eigen2(1.0, 0.0, 4.0);
        assert_eq!(eig.values, [4.0, 1.0]);
        assert!((eig.vectors[0].dot(DVec2::Y)).abs() > 1.0 - 1e-12);
    }

    #[test]
    fn test_isotropic() {
        let eig = symmetric_eigen2(2.0, 0.0, 2.0);
        assert_eq!(eig.values, [2.0, 2.0]);
        assert_eq!(eig.vectors, [DVec2::X, DVec2::Y]);
    }

    #[test]
    fn test_general_matrix() {
        for &(a, b, c) in &[(3.0, 1.0, 2.0), (1.0, -2.5, 7.0), (0.5, 0.25, 0.5), (4.0, 4.0, 4.0)] {
            let eig = symmetric_eigen2(a, b, c);
            assert!(eig.values[0] >= eig.values[1]);
            for i in 0..2 {
                assert!((eig.vectors[i].length() - 1.0).abs() < 1e-12);
                assert_eigenpair(a, b, c, eig.values[i], eig.vectors[i]);
            }
            assert!(eig.vectors[0].dot(eig.vectors[1]).abs() < 1e-12);
        }
    }
}
