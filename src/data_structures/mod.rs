//! Engine data structures: scene, meshes, materials, animation.
//!
//! - `animation` keyframes, animations and the player that runs them
//! - `bounds` axis-aligned bounding boxes for intersection and picking
//! - `instance` per-instance transformation and colour data
//! - `material` emissive/diffuse colour materials
//! - `mesh` procedural box and sphere geometry
//! - `model` GPU buffers for a mesh and the draw helpers
//! - `scene_graph` the scene container with named meshes
//! - `texture` depth and readback textures

pub mod animation;
pub mod bounds;
pub mod instance;
pub mod material;
pub mod mesh;
pub mod model;
pub mod scene_graph;
pub mod texture;
