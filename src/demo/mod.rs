//! The cube demo.
//!
//! A white sphere (the actor) floats above three coloured cubes. Each button
//! on the right sends the actor towards one cube; as soon as the actor touches
//! a cube the move stops, the cube turns white and the buttons unlock again.
//! The actor can also be grabbed with the mouse and dragged around.
//!
//! [`Demo`] holds all of that without a window or a GPU, and
//! [`CubesFlow`] puts it on screen.

mod config;
mod cubes;

pub use config::{CubeConfig, DemoConfig};
pub use cubes::{ACTOR_ID, CubesFlow, FIRST_BUTTON_ID, FIRST_CUBE_ID};

use anyhow::{Context as _, ensure};
use cgmath::Vector3;

use crate::{
    actions::{ActionManager, Trigger},
    data_structures::{
        animation::{Animation, AnimationEvent, AnimationPlayer, Keyframe, TargetProperty},
        material::{Color3, Material, SolidColor},
        mesh::{BoxOptions, MeshBuilder, SphereOptions},
        scene_graph::{MeshId, Scene},
    },
    ui::ButtonPanel,
};

const ACTOR_NAME: &str = "actor";

#[derive(Clone, Debug)]
struct Cube {
    key: String,
    mesh: MeshId,
    material: Material,
}

pub struct Demo {
    config: DemoConfig,
    scene: Scene,
    player: AnimationPlayer,
    actions: ActionManager,
    buttons: ButtonPanel,
    actor: MeshId,
    cubes: Vec<Cube>,
    highlight: Material,
    grabbed: bool,
}

impl Demo {
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        ensure!(
            config.frame_rate.is_finite() && config.frame_rate > 0.0,
            "frame rate must be positive, got {}",
            config.frame_rate
        );
        ensure!(
            config.end_frame.is_finite() && config.end_frame > 0.0,
            "end frame must be after frame 0, got {}",
            config.end_frame
        );
        let mut scene = Scene::new();
        let actor = scene
            .create_mesh(
                MeshBuilder::create_sphere(
                    ACTOR_NAME,
                    SphereOptions {
                        diameter: config.actor_diameter,
                        ..Default::default()
                    },
                ),
                config.actor_start,
                SolidColor::make(Color3::WHITE),
            )
            .context("Cannot create the actor")?;

        let mut actions = ActionManager::new();
        let mut cubes = Vec::with_capacity(config.cubes.len());
        for cube in &config.cubes {
            let material = SolidColor::make(cube.color);
            let mesh = scene
                .create_mesh(
                    MeshBuilder::create_box(
                        &cube.mesh_name(),
                        BoxOptions {
                            width: config.cube_size,
                            height: config.cube_size,
                            depth: config.cube_size,
                        },
                    ),
                    cube.position,
                    material.clone(),
                )
                .with_context(|| format!("Cannot create the {} cube", cube.key))?;
            actions.register_action(
                actor,
                Trigger::OnIntersectionEnter { parameter: mesh },
                &cube.key,
            );
            cubes.push(Cube {
                key: cube.key.clone(),
                mesh,
                material,
            });
        }

        let entries: Vec<_> = config
            .cubes
            .iter()
            .map(|cube| (cube.key.as_str(), cube.color))
            .collect();
        let buttons = ButtonPanel::new(&entries, config.buttons, 800, 600, 1.0);

        log::info!(
            "Scene ready: actor at {:?}, {} cubes",
            config.actor_start,
            cubes.len()
        );
        Ok(Self {
            config,
            scene,
            player: AnimationPlayer::new(),
            actions,
            buttons,
            actor,
            cubes,
            highlight: SolidColor::make(Color3::WHITE),
            grabbed: false,
        })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn resize(&mut self, width: u32, height: u32, scale: f64) {
        self.buttons.relayout(width, height, scale as f32);
    }

    /// Runs one frame: animations, then intersection triggers, then the
    /// material pass.
    pub fn update(&mut self, dt: f32) {
        for event in self.player.advance(dt, &mut self.scene) {
            match event {
                AnimationEvent::Ended { target } if target == self.actor => {
                    log::debug!("Actor move finished");
                    self.buttons.enable_all();
                }
                AnimationEvent::Ended { .. } => (),
            }
        }

        for fired in self.actions.process(&self.scene) {
            let Some(cube) = self.cubes.iter().find(|cube| cube.key == fired.key) else {
                log::warn!("No cube for fired action {}", fired.key);
                continue;
            };
            log::info!("Actor entered the {} cube", cube.key);
            self.player.stop_all_animations();
            self.scene.set_material(cube.mesh, &self.highlight);
            self.buttons.enable_all();
        }

        for cube in &self.cubes {
            let material = if self.scene.intersects_mesh(self.actor, cube.mesh) {
                &self.highlight
            } else {
                &cube.material
            };
            self.scene.set_material(cube.mesh, material);
        }
    }

    /// Sends the actor from its start position to the cube behind button
    /// `idx`. Returns `false` if the button is disabled.
    pub fn press_button(&mut self, idx: usize) -> anyhow::Result<bool> {
        if !self.buttons.is_enabled(idx) {
            log::warn!("Ignoring click on disabled button {}", idx);
            return Ok(false);
        }
        let (key, label) = self
            .buttons
            .buttons()
            .get(idx)
            .map(|button| (button.key.clone(), button.label.clone()))
            .with_context(|| format!("No button with index {}", idx))?;
        let cube = self
            .cubes
            .iter()
            .find(|cube| cube.key == key)
            .with_context(|| format!("Button {} has no cube", key))?;
        let target = self
            .scene
            .absolute_position(cube.mesh)
            .with_context(|| format!("The {} cube is not in the scene", key))?;
        let mut animation = Animation::new(
            &format!("moveTo{}", key),
            TargetProperty::Position,
            self.config.frame_rate,
        );
        animation.set_keys(vec![
            Keyframe {
                frame: 0.0,
                value: self.config.actor_start,
            },
            Keyframe {
                frame: self.config.end_frame,
                value: target,
            },
        ])?;
        self.player
            .begin_animation(self.actor, vec![animation], 0.0, self.config.end_frame, false)?;
        log::info!("{}: moving actor to {:?}", label, target);

        self.grabbed = false;
        self.scene.set_position(self.actor, self.config.actor_start);
        self.buttons.disable_all();
        Ok(true)
    }

    /// Takes the actor out of any running move and hands it to the pointer.
    pub fn grab_actor(&mut self) {
        log::debug!("Actor grabbed");
        self.player.stop_all_animations();
        self.buttons.enable_all();
        self.grabbed = true;
    }

    /// Moves a grabbed actor to `point` projected onto the drag plane.
    pub fn drag_actor_to(&mut self, point: Vector3<f32>) {
        if !self.grabbed {
            return;
        }
        let position = Vector3::new(point.x, point.y, self.config.drag_plane_z);
        self.scene.set_position(self.actor, position);
    }

    pub fn release_actor(&mut self) {
        if self.grabbed {
            log::debug!("Actor released at {:?}", self.actor_position());
        }
        self.grabbed = false;
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    pub fn actor(&self) -> MeshId {
        self.actor
    }

    pub fn actor_position(&self) -> Vector3<f32> {
        self.scene
            .absolute_position(self.actor)
            .unwrap_or(self.config.actor_start)
    }

    pub fn cube_mesh(&self, key: &str) -> Option<MeshId> {
        self.cubes
            .iter()
            .find(|cube| cube.key == key)
            .map(|cube| cube.mesh)
    }

    pub fn cube_material(&self, key: &str) -> Option<&Material> {
        let mesh = self.cube_mesh(key)?;
        self.scene.mesh(mesh).map(|mesh| &mesh.material)
    }

    pub fn buttons(&self) -> &ButtonPanel {
        &self.buttons
    }

    pub fn buttons_mut(&mut self) -> &mut ButtonPanel {
        &mut self.buttons
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_animating(&self) -> bool {
        self.player.is_animating(self.actor)
    }

    /// Meshes whose GPU copy is out of date.
    pub fn take_dirty(&mut self) -> Vec<MeshId> {
        self.scene.take_dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(demo: &mut Demo, seconds: f32) {
        let steps = (seconds / 0.1).round() as usize;
        for _ in 0..steps {
            demo.update(0.1);
        }
    }

    #[test]
    fn setup_matches_layout() {
        let demo = Demo::new(DemoConfig::default()).unwrap();
        assert_eq!(demo.scene().len(), 4);
        assert_eq!(demo.actor_position(), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(demo.cube_material("red").unwrap().emissive, Color3::RED);
        assert_eq!(demo.buttons().len(), 3);
        assert!(demo.buttons().all_enabled());
        assert!(!demo.is_animating());
    }

    #[test]
    fn first_frame_changes_nothing() {
        let mut demo = Demo::new(DemoConfig::default()).unwrap();
        demo.update(0.016);
        for key in ["red", "green", "blue"] {
            assert_ne!(demo.cube_material(key).unwrap().emissive, Color3::WHITE);
        }
    }

    #[test]
    fn pressing_a_button_starts_a_move() {
        let mut demo = Demo::new(DemoConfig::default()).unwrap();
        let blue = demo.buttons().index_of("blue").unwrap();
        assert!(demo.press_button(blue).unwrap());
        assert!(demo.is_animating());
        assert!(!demo.buttons().is_enabled(0));

        demo.update(1.0);
        let position = demo.actor_position();
        assert!((position.y - 1.8).abs() < 1e-4);
    }

    #[test]
    fn disabled_buttons_are_ignored() {
        let mut demo = Demo::new(DemoConfig::default()).unwrap();
        assert!(demo.press_button(0).unwrap());
        assert!(!demo.press_button(1).unwrap());
        assert_eq!(demo.player.running()[0].animations[0].name, "moveTored");
    }

    #[test]
    fn grabbing_stops_the_move() {
        let mut demo = Demo::new(DemoConfig::default()).unwrap();
        demo.press_button(0).unwrap();
        demo.update(1.0);
        demo.grab_actor();
        assert!(!demo.is_animating());
        assert!(demo.buttons().all_enabled());

        demo.drag_actor_to(Vector3::new(1.0, 1.0, 4.0));
        assert_eq!(demo.actor_position(), Vector3::new(1.0, 1.0, 0.0));
        demo.release_actor();
        demo.drag_actor_to(Vector3::new(3.0, 3.0, 0.0));
        assert_eq!(demo.actor_position(), Vector3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn touching_a_cube_stops_and_highlights() {
        let mut demo = Demo::new(DemoConfig::default()).unwrap();
        let blue = demo.buttons().index_of("blue").unwrap();
        demo.press_button(blue).unwrap();
        run(&mut demo, 6.0);
        assert!(!demo.is_animating());
        assert!(demo.buttons().all_enabled());
        assert_eq!(demo.cube_material("blue").unwrap().emissive, Color3::WHITE);
        // stopped right at the cube's top face
        let y = demo.actor_position().y;
        assert!(y <= 1.0 && y > 0.85, "actor stopped at y = {}", y);
    }

    #[test]
    fn config_that_never_arrives_is_rejected() {
        for config in [
            DemoConfig {
                end_frame: 0.0,
                ..Default::default()
            },
            DemoConfig {
                frame_rate: 0.0,
                ..Default::default()
            },
            DemoConfig {
                frame_rate: -2.0,
                ..Default::default()
            },
        ] {
            assert!(Demo::new(config).is_err());
        }
    }

    #[test]
    fn failed_press_leaves_buttons_usable() {
        let mut demo = Demo::new(DemoConfig::default()).unwrap();
        demo.grab_actor();
        demo.drag_actor_to(Vector3::new(1.0, 3.0, 0.0));
        demo.config.end_frame = 0.0;

        assert!(demo.press_button(0).is_err());
        assert!(demo.buttons().all_enabled());
        assert!(demo.is_grabbed());
        assert!(!demo.is_animating());
        assert_eq!(demo.actor_position(), Vector3::new(1.0, 3.0, 0.0));

        demo.config.end_frame = 10.0;
        assert!(demo.press_button(0).unwrap());
        assert!(!demo.is_grabbed());
    }
}
