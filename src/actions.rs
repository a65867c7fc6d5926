//! Intersection triggers.
//!
//! An [`ActionManager`] watches pairs of meshes and reports when they start or
//! stop overlapping. Actions are identified by a key chosen at registration;
//! the caller decides what a fired key means.

use std::collections::HashMap;

use crate::data_structures::scene_graph::{MeshId, Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    OnIntersectionEnter { parameter: MeshId },
    OnIntersectionExit { parameter: MeshId },
}

impl Trigger {
    pub fn parameter(&self) -> MeshId {
        match self {
            Trigger::OnIntersectionEnter { parameter }
            | Trigger::OnIntersectionExit { parameter } => *parameter,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FiredAction {
    pub owner: MeshId,
    pub trigger: Trigger,
    pub key: String,
}

#[derive(Clone, Debug)]
struct RegisteredAction {
    owner: MeshId,
    trigger: Trigger,
    key: String,
}

#[derive(Debug, Default)]
pub struct ActionManager {
    actions: Vec<RegisteredAction>,
    /// Overlap state per (owner, parameter) as of the last `process` call.
    overlapping: HashMap<(MeshId, MeshId), bool>,
}

impl ActionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_action(&mut self, owner: MeshId, trigger: Trigger, key: &str) {
        log::debug!("Registering {:?} on {:?} as {}", trigger, owner, key);
        self.overlapping
            .entry((owner, trigger.parameter()))
            .or_insert(false);
        self.actions.push(RegisteredAction {
            owner,
            trigger,
            key: key.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Compares current overlaps against the previous call and returns the
    /// actions whose edge was crossed, in registration order.
    pub fn process(&mut self, scene: &Scene) -> Vec<FiredAction> {
        let mut changed = HashMap::new();
        for (&(owner, parameter), was) in self.overlapping.iter_mut() {
            let now = scene.intersects_mesh(owner, parameter);
            if now != *was {
                changed.insert((owner, parameter), now);
                *was = now;
            }
        }
        if changed.is_empty() {
            return Vec::new();
        }
        self.actions
            .iter()
            .filter(|action| {
                match (
                    action.trigger,
                    changed.get(&(action.owner, action.trigger.parameter())),
                ) {
                    (Trigger::OnIntersectionEnter { .. }, Some(true)) => true,
                    (Trigger::OnIntersectionExit { .. }, Some(false)) => true,
                    _ => false,
                }
            })
            .map(|action| FiredAction {
                owner: action.owner,
                trigger: action.trigger,
                key: action.key.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::data_structures::{
        material::{Color3, SolidColor},
        mesh::{BoxOptions, MeshBuilder, SphereOptions},
    };

    fn setup() -> (Scene, MeshId, MeshId) {
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
                MeshBuilder::create_box("blueCube", BoxOptions::default()),
                Vector3::new(0.0, 0.0, 0.0),
                SolidColor::make(Color3::BLUE),
            )
            .unwrap();
        (scene, actor, cube)
    }

    #[test]
    fn enter_fires_once_per_overlap() {
        let (mut scene, actor, cube) = setup();
        let mut actions = ActionManager::new();
        actions.register_action(actor, Trigger::OnIntersectionEnter { parameter: cube }, "hit");

        assert!(actions.process(&scene).is_empty());

        scene.set_position(actor, Vector3::new(0.0, 0.5, 0.0));
        let fired = actions.process(&scene);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].key, "hit");
        assert_eq!(fired[0].owner, actor);

        // still overlapping
        assert!(actions.process(&scene).is_empty());

        scene.set_position(actor, Vector3::new(0.0, 3.0, 0.0));
        assert!(actions.process(&scene).is_empty());

        scene.set_position(actor, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(actions.process(&scene).len(), 1);
    }

    #[test]
    fn exit_fires_when_overlap_ends() {
        let (mut scene, actor, cube) = setup();
        let mut actions = ActionManager::new();
        actions.register_action(actor, Trigger::OnIntersectionEnter { parameter: cube }, "enter");
        actions.register_action(actor, Trigger::OnIntersectionExit { parameter: cube }, "exit");

        scene.set_position(actor, Vector3::new(0.0, 0.0, 0.0));
        let keys: Vec<_> = actions.process(&scene).into_iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["enter"]);

        scene.set_position(actor, Vector3::new(5.0, 0.0, 0.0));
        let keys: Vec<_> = actions.process(&scene).into_iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["exit"]);
    }

    #[test]
    fn overlap_at_registration_counts_as_enter() {
        let (mut scene, actor, cube) = setup();
        scene.set_position(actor, Vector3::new(0.0, 0.0, 0.0));
        let mut actions = ActionManager::new();
        actions.register_action(actor, Trigger::OnIntersectionEnter { parameter: cube }, "hit");
        assert_eq!(actions.process(&scene).len(), 1);
    }
}
