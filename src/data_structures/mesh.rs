//! Procedural primitives.
//!
//! The demo only needs boxes and spheres, so instead of loading models from
//! disk the geometry is generated on the CPU and uploaded once at startup.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::{bounds::BoundingBox, model::ModelVertex};

/// CPU-side triangle list, counter-clockwise when seen from outside.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

/// Generated geometry together with its bounds in local space.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub name: String,
    pub geometry: Geometry,
    pub bounds: BoundingBox,
}

#[derive(Clone, Copy, Debug)]
pub struct BoxOptions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SphereOptions {
    pub diameter: f32,
    pub segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            diameter: 1.0,
            segments: 32,
        }
    }
}

pub struct MeshBuilder;

impl MeshBuilder {
    pub fn create_box(name: &str, options: BoxOptions) -> Primitive {
        let half = Vector3::new(options.width, options.height, options.depth) * 0.5;
        // (normal, u, v) with u x v == normal so each face winds CCW from outside
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let mut geometry = Geometry::default();
        for (normal, u, v) in faces {
            let n: Vector3<f32> = normal.into();
            let u: Vector3<f32> = u.into();
            let v: Vector3<f32> = v.into();
            let base = geometry.vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let corner = n + u * su + v * sv;
                let position = Vector3::new(corner.x * half.x, corner.y * half.y, corner.z * half.z);
                geometry.vertices.push(ModelVertex {
                    position: position.into(),
                    normal,
                });
            }
            geometry
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Primitive {
            name: name.to_string(),
            geometry,
            bounds: BoundingBox::new(-half, half),
        }
    }

    /// UV sphere. `segments` is the number of slices around the equator,
    /// half as many rings are used from pole to pole.
    pub fn create_sphere(name: &str, options: SphereOptions) -> Primitive {
        let radius = options.diameter * 0.5;
        let segments = options.segments.max(3);
        let rings = (segments / 2).max(2);

        let mut geometry = Geometry::default();
        for ring in 0..=rings {
            let theta = PI * ring as f32 / rings as f32;
            for segment in 0..=segments {
                let phi = 2.0 * PI * segment as f32 / segments as f32;
                let normal = Vector3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                let normal = if normal.magnitude2() > 0.0 {
                    normal.normalize()
                } else {
                    normal
                };
                geometry.vertices.push(ModelVertex {
                    position: (normal * radius).into(),
                    normal: normal.into(),
                });
            }
        }

        let stride = segments + 1;
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = (ring + 1) * stride + segment;
                let c = b + 1;
                let d = a + 1;
                geometry.indices.extend_from_slice(&[a, c, b, a, d, c]);
            }
        }

        let extent = Vector3::new(radius, radius, radius);
        Primitive {
            name: name.to_string(),
            geometry,
            bounds: BoundingBox::new(-extent, extent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_normal(g: &Geometry, tri: &[u32]) -> Vector3<f32> {
        let p = |i: u32| Vector3::from(g.vertices[i as usize].position);
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        (b - a).cross(c - a)
    }

    #[test]
    fn box_has_six_quads() {
        let cube = MeshBuilder::create_box("box", BoxOptions::default());
        assert_eq!(cube.geometry.vertices.len(), 24);
        assert_eq!(cube.geometry.indices.len(), 36);
        assert_eq!(cube.bounds.extents(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn box_faces_wind_outward() {
        let cube = MeshBuilder::create_box("box", BoxOptions::default());
        for tri in cube.geometry.indices.chunks(3) {
            let face_normal = triangle_normal(&cube.geometry, tri);
            let vertex_normal = Vector3::from(cube.geometry.vertices[tri[0] as usize].normal);
            assert!(face_normal.dot(vertex_normal) > 0.0);
        }
    }

    #[test]
    fn box_respects_options() {
        let slab = MeshBuilder::create_box(
            "slab",
            BoxOptions {
                width: 4.0,
                height: 0.5,
                depth: 2.0,
            },
        );
        assert_eq!(slab.bounds.min, Vector3::new(-2.0, -0.25, -1.0));
        assert_eq!(slab.bounds.max, Vector3::new(2.0, 0.25, 1.0));
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let sphere = MeshBuilder::create_sphere("actor", SphereOptions::default());
        for v in &sphere.geometry.vertices {
            let len = Vector3::from(v.position).magnitude();
            assert!((len - 0.5).abs() < 1e-4);
        }
        assert_eq!(sphere.bounds.extents(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn sphere_faces_wind_outward() {
        let sphere = MeshBuilder::create_sphere("actor", SphereOptions { diameter: 2.0, segments: 8 });
        for tri in sphere.geometry.indices.chunks(3) {
            let face_normal = triangle_normal(&sphere.geometry, tri);
            if face_normal.magnitude2() < 1e-8 {
                // collapsed triangle at a pole
                continue;
            }
            let centroid = tri
                .iter()
                .map(|&i| Vector3::from(sphere.geometry.vertices[i as usize].position))
                .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + p);
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }
}
