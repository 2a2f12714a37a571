//! Guarded triangle measurements shared by the estimator and the smoother

use texmesh_core::{Point3f, Vector3f};

/// Edges shorter than this are treated as collapsed.
pub const EDGE_EPSILON: f32 = 1e-10;

/// Triangles whose corner sine falls below this are treated as collinear.
pub const COLLINEAR_EPSILON: f32 = 1e-6;

/// Shortest component of a unit vector that still counts as independent of
/// the axis it is orthogonalized against.
pub const PARALLEL_EPSILON: f32 = 1e-3;

/// Interior angles at the three corners of a triangle, in radians.
///
/// `None` when any edge has (near) zero length, where the angle is
/// undefined. The cosine is clamped to `[-1, 1]` before `acos` so that
/// rounding on nearly collinear triangles cannot produce NaN.
pub fn corner_angles(p0: &Point3f, p1: &Point3f, p2: &Point3f) -> Option<[f32; 3]> {
    let e01 = p1 - p0;
    let e02 = p2 - p0;
    let e12 = p2 - p1;

    let l01 = e01.norm();
    let l02 = e02.norm();
    let l12 = e12.norm();
    if l01 <= EDGE_EPSILON || l02 <= EDGE_EPSILON || l12 <= EDGE_EPSILON {
        return None;
    }

    let angle = |a: Vector3f, b: Vector3f, la: f32, lb: f32| (a.dot(&b) / (la * lb)).clamp(-1.0, 1.0).acos();

    Some([
        angle(e01, e02, l01, l02),
        angle(-e01, e12, l01, l12),
        angle(-e02, -e12, l02, l12),
    ])
}

/// Unit face normal, `None` for collapsed or collinear triangles.
pub fn face_normal(p0: &Point3f, p1: &Point3f, p2: &Point3f) -> Option<Vector3f> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let cross = e1.cross(&e2);
    let len = cross.norm();
    let scale = e1.norm() * e2.norm();

    if scale <= EDGE_EPSILON * EDGE_EPSILON || len <= COLLINEAR_EPSILON * scale {
        None
    } else {
        Some(cross / len)
    }
}

/// `v / |v|`, or `None` for a (near) zero vector.
pub fn try_normalize(v: &Vector3f) -> Option<Vector3f> {
    v.try_normalize(f32::EPSILON)
}

/// Remove the `axis` component of `v` (Gram-Schmidt) and normalize.
///
/// The projection is applied twice to keep the residual dot product at
/// rounding level. `None` when `v` is (nearly) parallel to `axis` or zero.
pub fn orthogonalize(v: &Vector3f, axis: &Vector3f) -> Option<Vector3f> {
    let once = (v - axis * axis.dot(v)).try_normalize(PARALLEL_EPSILON)?;
    try_normalize(&(once - axis * axis.dot(&once)))
}

/// A unit vector perpendicular to `normal`.
///
/// Starts from the coordinate axis least aligned with the normal and
/// removes the normal component. A zero normal yields the x axis.
pub fn perpendicular(normal: &Vector3f) -> Vector3f {
    let abs = normal.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3f::x()
    } else if abs.y <= abs.z {
        Vector3f::y()
    } else {
        Vector3f::z()
    };

    orthogonalize(&axis, normal).unwrap_or_else(Vector3f::x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_right_triangle_angles() {
        let angles = corner_angles(
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(1.0, 0.0, 0.0),
            &Point3f::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(angles[0], FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(angles[1], FRAC_PI_4, epsilon = 1e-6);
        assert_relative_eq!(angles[2], FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn test_collinear_angles_are_finite() {
        let angles = corner_angles(
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(1.0, 0.0, 0.0),
            &Point3f::new(2.0, 0.0, 0.0),
        )
        .unwrap();
        assert!(angles.iter().all(|a| a.is_finite()));
        assert_relative_eq!(angles[1], PI, epsilon = 1e-6);
        assert!(face_normal(
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(1.0, 0.0, 0.0),
            &Point3f::new(2.0, 0.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn test_zero_length_edge_rejected() {
        let p = Point3f::new(1.0, 1.0, 1.0);
        assert!(corner_angles(&p, &p, &Point3f::origin()).is_none());
        assert!(face_normal(&p, &p, &Point3f::origin()).is_none());
    }

    #[test]
    fn test_orthogonalize() {
        let n = Vector3f::z();
        let t = orthogonalize(&Vector3f::new(1.0, 0.0, 1.0), &n).unwrap();
        assert_relative_eq!(t, Vector3f::x(), epsilon = 1e-6);
        assert!(orthogonalize(&Vector3f::new(0.0, 1e-5, 1.0), &n).is_none());
    }

    #[test]
    fn test_perpendicular() {
        for n in [Vector3f::x(), Vector3f::y(), Vector3f::z(), Vector3f::new(1.0, 2.0, 3.0).normalize()] {
            let t = perpendicular(&n);
            assert_relative_eq!(t.norm(), 1.0, epsilon = 1e-6);
            assert!(t.dot(&n).abs() < 1e-6);
        }
        assert_eq!(perpendicular(&Vector3f::zeros()), Vector3f::x());
    }
}
