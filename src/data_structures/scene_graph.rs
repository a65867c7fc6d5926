//! Scene container.
//!
//! The scene is flat: every mesh is a root with its own transform and
//! material. Meshes are addressed by [`MeshId`], which stays valid for the
//! lifetime of the scene because meshes are never removed.

use anyhow::bail;
use cgmath::Vector3;

use crate::data_structures::{
    bounds::BoundingBox,
    instance::Instance,
    material::Material,
    mesh::{Geometry, Primitive},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

#[derive(Clone, Debug)]
pub struct SceneMesh {
    pub name: String,
    pub geometry: Geometry,
    pub local_bounds: BoundingBox,
    pub instance: Instance,
    pub material: Material,
    /// Set whenever the transform or material changes, cleared once the
    /// GPU copy has been refreshed.
    dirty: bool,
}

impl SceneMesh {
    pub fn world_bounds(&self) -> BoundingBox {
        self.local_bounds
            .scaled(self.instance.scale)
            .translated(self.instance.position)
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<SceneMesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_mesh(
        &mut self,
        primitive: Primitive,
        position: Vector3<f32>,
        material: Material,
    ) -> anyhow::Result<MeshId> {
        if self.mesh_by_name(&primitive.name).is_some() {
            bail!("a mesh named {:?} already exists", primitive.name);
        }
        log::debug!("Creating mesh {} at {:?}", primitive.name, position);
        self.meshes.push(SceneMesh {
            name: primitive.name,
            geometry: primitive.geometry,
            local_bounds: primitive.bounds,
            instance: Instance::from(position),
            material,
            dirty: true,
        });
        Ok(MeshId(self.meshes.len() - 1))
    }

    pub fn mesh_by_name(&self, name: &str) -> Option<MeshId> {
        self.meshes
            .iter()
            .position(|mesh| mesh.name == name)
            .map(MeshId)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&SceneMesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut SceneMesh> {
        self.meshes.get_mut(id.0).map(|mesh| {
            mesh.dirty = true;
            mesh
        })
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &SceneMesh)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(idx, mesh)| (MeshId(idx), mesh))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn set_position(&mut self, id: MeshId, position: Vector3<f32>) {
        match self.mesh_mut(id) {
            Some(mesh) => mesh.instance.position = position,
            None => log::warn!("Tried to move unknown mesh {:?}", id),
        }
    }

    /// Only marks the mesh dirty when the material actually changes, so the
    /// per-frame material pass does not cause a buffer write every frame.
    pub fn set_material(&mut self, id: MeshId, material: &Material) {
        match self.meshes.get_mut(id.0) {
            Some(mesh) if mesh.material != *material => {
                mesh.material = material.clone();
                mesh.dirty = true;
            }
            Some(_) => (),
            None => log::warn!("Tried to set a material on unknown mesh {:?}", id),
        }
    }

    pub fn absolute_position(&self, id: MeshId) -> Option<Vector3<f32>> {
        self.mesh(id).map(|mesh| mesh.instance.position)
    }

    pub fn world_bounds(&self, id: MeshId) -> Option<BoundingBox> {
        self.mesh(id).map(SceneMesh::world_bounds)
    }

    /// Bounding-box overlap test between two meshes. Unknown ids never intersect.
    pub fn intersects_mesh(&self, a: MeshId, b: MeshId) -> bool {
        match (self.world_bounds(a), self.world_bounds(b)) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }

    /// Returns the ids of all meshes changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<MeshId> {
        self.meshes
            .iter_mut()
            .enumerate()
            .filter(|(_, mesh)| mesh.dirty)
            .map(|(idx, mesh)| {
                mesh.dirty = false;
                MeshId(idx)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::{
        material::{Color3, SolidColor},
        mesh::{BoxOptions, MeshBuilder, SphereOptions},
    };

    fn scene_with_actor_and_cube() -> (Scene, MeshId, MeshId) {
        let mut scene = Scene::new();
        let actor = scene
            .create_mesh(
                MeshBuilder::create_sphere("actor", SphereOptions::default()),
                Vector3::new(0.0, 2.0, 0.0),
                SolidColor::make(Color3::WHITE),
            )
            .unwrap();
        let cube = scene
            .create_mesh(
                MeshBuilder::create_box("redCube", BoxOptions::default()),
                Vector3::new(-2.5, 0.0, 0.0),
                SolidColor::make(Color3::RED),
            )
            .unwrap();
        (scene, actor, cube)
    }

    #[test]
    fn meshes_are_found_by_name() {
        let (scene, actor, cube) = scene_with_actor_and_cube();
        assert_eq!(scene.mesh_by_name("actor"), Some(actor));
        assert_eq!(scene.mesh_by_name("redCube"), Some(cube));
        assert_eq!(scene.mesh_by_name("purpleCube"), None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let (mut scene, _, _) = scene_with_actor_and_cube();
        let again = scene.create_mesh(
            MeshBuilder::create_box("redCube", BoxOptions::default()),
            Vector3::new(0.0, 0.0, 0.0),
            SolidColor::make(Color3::RED),
        );
        assert!(again.is_err());
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn intersection_follows_position() {
        let (mut scene, actor, cube) = scene_with_actor_and_cube();
        assert!(!scene.intersects_mesh(actor, cube));
        scene.set_position(actor, Vector3::new(-2.0, 0.5, 0.0));
        assert!(scene.intersects_mesh(actor, cube));
        assert!(scene.intersects_mesh(cube, actor));
    }

    #[test]
    fn unchanged_material_does_not_mark_dirty() {
        let (mut scene, _, cube) = scene_with_actor_and_cube();
        scene.take_dirty();
        scene.set_material(cube, &SolidColor::make(Color3::RED));
        assert!(scene.take_dirty().is_empty());
        scene.set_material(cube, &SolidColor::make(Color3::WHITE));
        assert_eq!(scene.take_dirty(), vec![cube]);
    }
}
