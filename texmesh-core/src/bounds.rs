//! Axis-aligned boxes and bounding spheres

use crate::point::*;
use crate::transform::Placement;
use serde::{Deserialize, Serialize};

/// Absolute padding used when every axis of a box has zero extent.
pub const MIN_PADDING: f32 = 1e-4;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3f,
    pub max: Point3f,
}

impl BoundingBox {
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    /// Create a box from an origin corner and its width, height and depth
    pub fn from_origin_and_size(origin: Point3f, size: Vector3f) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Single linear scan over `points`; `None` when there are no points.
    pub fn from_points(points: &[Point3f]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;

        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some(Self { min, max })
    }

    pub fn x_min(&self) -> f32 {
        self.min.x
    }

    pub fn x_max(&self) -> f32 {
        self.max.x
    }

    pub fn y_min(&self) -> f32 {
        self.min.y
    }

    pub fn y_max(&self) -> f32 {
        self.max.y
    }

    pub fn z_min(&self) -> f32 {
        self.min.z
    }

    pub fn z_max(&self) -> f32 {
        self.max.z
    }

    /// Minimum corner, the origin of the box
    pub fn origin(&self) -> Point3f {
        self.min
    }

    /// Edge lengths along x (width), y (height) and z (depth)
    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn volume(&self) -> f32 {
        let e = self.extent();
        e.x * e.y * e.z
    }

    /// Grow every axis by `margin` times its extent on both sides.
    ///
    /// An axis with zero extent is padded by `margin` times the largest
    /// extent instead, or by [`MIN_PADDING`] if the box is a single point,
    /// so the result always has a positive volume for a positive margin.
    pub fn inflated(&self, margin: f32) -> Self {
        let extent = self.extent();
        let largest = extent.max();
        let fallback = if largest > 0.0 {
            largest * margin
        } else {
            MIN_PADDING
        };
        let pad = extent.map(|e| if e > 0.0 { e * margin } else { fallback });

        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Half-open containment test: `min <= p < max` on every axis.
    ///
    /// Sibling boxes that share a face never both contain a point, and a
    /// point on the shared face belongs to the box whose minimum it touches.
    pub fn contains(&self, p: &Point3f) -> bool {
        (0..3).all(|axis| self.min[axis] <= p[axis] && p[axis] < self.max[axis])
    }

    /// The eight corners, bit `i` of the index selecting max on axis `i`.
    pub fn corners(&self) -> [Point3f; 8] {
        std::array::from_fn(|i| {
            Point3f::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// Bounds of this box after a host-owned placement has been applied.
    pub fn transformed(&self, placement: &Placement) -> Self {
        let corners = self.corners().map(|c| placement.transform_point(&c));
        // Eight corners, never empty.
        Self::from_points(&corners).unwrap_or(*self)
    }
}

/// A sphere enclosing a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Point3f,
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere centred on the centroid of `points`, with the radius reaching
    /// the farthest point. `None` when there are no points.
    pub fn from_points(points: &[Point3f]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let sum = points
            .iter()
            .fold(Vector3f::zeros(), |acc, p| acc + p.coords);
        let center = Point3f::from(sum / points.len() as f32);
        let radius = points
            .iter()
            .map(|p| nalgebra::distance(&center, p))
            .fold(0.0f32, f32::max);

        Some(Self { center, radius })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points(&[
            Point3f::new(1.0, -2.0, 0.5),
            Point3f::new(-1.0, 3.0, 0.0),
            Point3f::new(0.0, 0.0, 2.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max, Point3f::new(1.0, 3.0, 2.0));
        assert_relative_eq!(bbox.width(), 2.0);
        assert_relative_eq!(bbox.height(), 5.0);
        assert_relative_eq!(bbox.depth(), 2.0);
    }

    #[test]
    fn test_from_no_points() {
        assert!(BoundingBox::from_points(&[]).is_none());
        assert!(BoundingSphere::from_points(&[]).is_none());
    }

    #[test]
    fn test_inflated_pads_flat_axis() {
        let bbox = BoundingBox::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(2.0, 1.0, 0.0));
        let inflated = bbox.inflated(0.01);
        assert_relative_eq!(inflated.min.x, -0.02);
        assert_relative_eq!(inflated.max.y, 1.01);
        // Flat z axis borrows the padding of the largest extent
        assert_relative_eq!(inflated.min.z, -0.02);
        assert_relative_eq!(inflated.max.z, 0.02);
        assert!(inflated.volume() > 0.0);
    }

    #[test]
    fn test_inflated_single_point() {
        let p = Point3f::new(1.0, 1.0, 1.0);
        let inflated = BoundingBox::new(p, p).inflated(0.01);
        assert!(inflated.contains(&p));
        assert!(inflated.volume() > 0.0);
    }

    #[test]
    fn test_half_open_containment() {
        let bbox = BoundingBox::new(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
        assert!(bbox.contains(&Point3f::new(0.0, 0.0, 0.0)));
        assert!(bbox.contains(&Point3f::new(0.5, 0.999, 0.25)));
        assert!(!bbox.contains(&Point3f::new(1.0, 0.5, 0.5)));
        assert!(!bbox.contains(&Point3f::new(0.5, -0.1, 0.5)));
    }

    #[test]
    fn test_transformed_by_translation() {
        let bbox = BoundingBox::new(Point3f::origin(), Point3f::new(1.0, 2.0, 3.0));
        let moved = bbox.transformed(&Placement::translation(Vector3f::new(1.0, 0.0, -1.0)));
        assert_relative_eq!(moved.min, Point3f::new(1.0, 0.0, -1.0));
        assert_relative_eq!(moved.max, Point3f::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_bounding_sphere() {
        let sphere = BoundingSphere::from_points(&[
            Point3f::new(-1.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 3.0, 0.0),
            Point3f::new(0.0, -3.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(sphere.center, Point3f::origin());
        assert_relative_eq!(sphere.radius, 3.0);
    }
}
