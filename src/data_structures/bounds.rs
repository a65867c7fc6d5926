//! Axis-aligned bounding boxes.
//!
//! Mesh intersection in this crate is deliberately coarse: two meshes
//! intersect when their world-space boxes overlap. A sphere is therefore
//! treated as the cube that encloses it.

use cgmath::Vector3;

use crate::camera::Ray;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    /// Creates a box from two corners; the result is normalized so that
    /// `min <= max` component-wise.
    pub fn new(a: Vector3<f32>, b: Vector3<f32>) -> Self {
        Self {
            min: Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// `extents` are the full width, height and depth of the box.
    pub fn from_center_extents(center: Vector3<f32>, extents: Vector3<f32>) -> Self {
        let half = extents * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Scales the box around the origin of its local space.
    pub fn scaled(&self, scale: Vector3<f32>) -> Self {
        Self::new(
            Vector3::new(self.min.x * scale.x, self.min.y * scale.y, self.min.z * scale.z),
            Vector3::new(self.max.x * scale.x, self.max.y * scale.y, self.max.z * scale.z),
        )
    }

    /// Touching faces count as an intersection.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Slab test. Returns the distance along the ray to the first hit, or
    /// `0.0` when the origin is inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let (t0, t1) = {
                let a = (lo - origin) * inv;
                let b = (hi - origin) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(x: f32, y: f32, z: f32) -> BoundingBox {
        BoundingBox::from_center_extents(Vector3::new(x, y, z), Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn new_normalizes_corners() {
        let b = BoundingBox::new(Vector3::new(1.0, -1.0, 2.0), Vector3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, Vector3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Vector3::new(1.0, 1.0, 2.0));
        assert_eq!(b.center(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn overlapping_boxes_intersect() {
        assert!(unit_at(0.0, 0.0, 0.0).intersects(&unit_at(0.5, 0.5, 0.0)));
        assert!(unit_at(0.0, 0.0, 0.0).intersects(&unit_at(1.0, 0.0, 0.0)));
        assert!(!unit_at(0.0, 0.0, 0.0).intersects(&unit_at(1.01, 0.0, 0.0)));
        assert!(!unit_at(0.0, 2.0, 0.0).intersects(&unit_at(0.0, 0.0, 0.0)));
    }

    #[test]
    fn translated_box_moves_both_corners() {
        let b = unit_at(0.0, 0.0, 0.0).translated(Vector3::new(-2.5, 0.0, 0.0));
        assert_eq!(b.center(), Vector3::new(-2.5, 0.0, 0.0));
        assert_eq!(b.extents(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn ray_hits_front_face() {
        let ray = Ray {
            origin: Vector3::new(0.0, 0.0, 7.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        };
        let t = unit_at(0.0, 0.0, 0.0).intersect_ray(&ray).expect("hit");
        assert!((t - 6.5).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_box_to_the_side() {
        let ray = Ray {
            origin: Vector3::new(3.0, 0.0, 7.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        };
        assert_eq!(unit_at(0.0, 0.0, 0.0).intersect_ray(&ray), None);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray {
            origin: Vector3::new(0.0, 0.0, 7.0),
            direction: Vector3::new(0.0, 0.0, 1.0),
        };
        assert_eq!(unit_at(0.0, 0.0, 0.0).intersect_ray(&ray), None);
    }
}
