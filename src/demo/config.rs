use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;

use crate::{data_structures::material::Color3, ui::ButtonLayout};

/// A target cube and the button that sends the actor to it.
#[derive(Clone, Debug, PartialEq)]
pub struct CubeConfig {
    pub key: String,
    pub color: Color3,
    pub position: Vector3<f32>,
}

impl CubeConfig {
    pub fn new(key: &str, color: Color3, position: Vector3<f32>) -> Self {
        Self {
            key: key.to_string(),
            color,
            position,
        }
    }

    pub fn mesh_name(&self) -> String {
        format!("{}Cube", self.key)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    pub actor_start: Vector3<f32>,
    pub actor_diameter: f32,
    pub cube_size: f32,
    /// Cubes in button order.
    pub cubes: Vec<CubeConfig>,
    /// Frames per second of the move animation.
    pub frame_rate: f32,
    /// Frame at which the actor reaches the cube.
    pub end_frame: f32,
    pub buttons: ButtonLayout,
    /// The plane the actor is dragged along.
    pub drag_plane_z: f32,
    pub camera_alpha: f32,
    pub camera_beta: f32,
    pub camera_radius: f32,
    pub camera_target: Vector3<f32>,
    pub light_direction: Vector3<f32>,
    pub clear_colour: wgpu::Color,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            actor_start: Vector3::new(0.0, 2.0, 0.0),
            actor_diameter: 1.0,
            cube_size: 1.0,
            cubes: vec![
                CubeConfig::new("red", Color3::RED, Vector3::new(-2.5, 0.0, 0.0)),
                CubeConfig::new("green", Color3::GREEN, Vector3::new(2.5, 0.0, 0.0)),
                CubeConfig::new("blue", Color3::BLUE, Vector3::new(0.0, 0.0, 0.0)),
            ],
            frame_rate: 1.0,
            end_frame: 10.0,
            buttons: ButtonLayout::default(),
            drag_plane_z: 0.0,
            camera_alpha: FRAC_PI_2,
            camera_beta: FRAC_PI_2,
            camera_radius: 2.0,
            camera_target: Vector3::new(0.0, 0.0, 5.0),
            light_direction: Vector3::new(1.0, 1.0, 0.0),
            clear_colour: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
        }
    }
}
