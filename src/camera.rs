//! Arc-rotate camera.
//!
//! The camera orbits a target point. Its position is described by two angles
//! and a radius:
//!
//! - `alpha` is the longitudinal rotation around the vertical axis
//! - `beta` is the latitudinal rotation measured from the up axis
//! - `radius` is the distance to the target
//!
//! The [`ArcRotateController`] turns pointer drags, wheel ticks and arrow keys
//! into smooth changes of those three values.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Vector4, perspective};
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const BETA_EPSILON: f32 = 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct ArcRotateCamera {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Vector3<f32>,
    pub lower_radius_limit: f32,
    pub upper_radius_limit: f32,
}

impl ArcRotateCamera {
    pub fn new(alpha: f32, beta: f32, radius: f32, target: Vector3<f32>) -> Self {
        let mut camera = Self {
            alpha,
            beta,
            radius,
            target,
            lower_radius_limit: 0.5,
            upper_radius_limit: 50.0,
        };
        camera.clamp();
        camera
    }

    pub fn clamp(&mut self) {
        self.beta = self.beta.clamp(BETA_EPSILON, PI - BETA_EPSILON);
        self.radius = self
            .radius
            .clamp(self.lower_radius_limit, self.upper_radius_limit);
    }

    pub fn position(&self) -> Vector3<f32> {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + Vector3::new(cos_a * sin_b, cos_b, sin_a * sin_b) * self.radius
    }

    /// Right-handed view: looking down `-z` from the startup position, `-x`
    /// is on the left of the screen.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let eye = self.position();
        Matrix4::look_at_rh(
            Point3::new(eye.x, eye.y, eye.z),
            Point3::new(self.target.x, self.target.y, self.target.z),
            Vector3::unit_y(),
        )
    }

    /// Casts a ray from the eye through the pixel under the cursor.
    ///
    /// Returns `None` for a zero-sized viewport or a degenerate projection.
    pub fn cast_ray_from_mouse(
        &self,
        coords: PhysicalPosition<f64>,
        width: f32,
        height: f32,
        projection: &Projection,
    ) -> Option<Ray> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let ndc_x = 2.0 * coords.x as f32 / width - 1.0;
        let ndc_y = 1.0 - 2.0 * coords.y as f32 / height;
        let inverse = (projection.calc_matrix() * self.calc_matrix()).invert()?;

        let unproject = |z: f32| {
            let p = inverse * Vector4::new(ndc_x, ndc_y, z, 1.0);
            p.truncate() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        let direction = far - near;
        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        Some(Ray {
            origin: near,
            direction: direction.normalize(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Where the ray crosses the plane `z = const`, if it does so in front of
    /// its origin.
    pub fn intersect_plane_z(&self, z: f32) -> Option<Vector3<f32>> {
        if self.direction.z.abs() < f32::EPSILON {
            return None;
        }
        let t = (z - self.origin.z) / self.direction.z;
        (t >= 0.0).then(|| self.at(t))
    }
}

#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &ArcRotateCamera, projection: &Projection) {
        self.view_position = camera.position().extend(1.0).into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ArrowKeys {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

/// Turns user input into camera movement with inertia.
#[derive(Debug, Clone)]
pub struct ArcRotateController {
    /// Pointer pixels per radian of rotation; higher is slower.
    pub angular_sensibility: f32,
    /// Wheel lines per world unit of zoom; higher is slower.
    pub wheel_precision: f32,
    /// Radians per second while an arrow key is held.
    pub keys_speed: f32,
    /// Share of the velocity kept after one 60Hz frame.
    pub inertia: f32,
    alpha_velocity: f32,
    beta_velocity: f32,
    radius_velocity: f32,
    keys: ArrowKeys,
}

impl ArcRotateController {
    pub fn new(angular_sensibility: f32, wheel_precision: f32) -> Self {
        Self {
            angular_sensibility,
            wheel_precision,
            keys_speed: 1.0,
            inertia: 0.9,
            alpha_velocity: 0.0,
            beta_velocity: 0.0,
            radius_velocity: 0.0,
            keys: ArrowKeys::default(),
        }
    }

    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.alpha_velocity -= dx as f32 / self.angular_sensibility;
        self.beta_velocity -= dy as f32 / self.angular_sensibility;
    }

    /// Positive `lines` zoom in.
    pub fn handle_scroll(&mut self, lines: f32) {
        self.radius_velocity -= lines / self.wheel_precision;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.handle_scroll(lines);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                let pressed = *state == ElementState::Pressed;
                match code {
                    KeyCode::ArrowLeft => self.keys.left = pressed,
                    KeyCode::ArrowRight => self.keys.right = pressed,
                    KeyCode::ArrowUp => self.keys.up = pressed,
                    KeyCode::ArrowDown => self.keys.down = pressed,
                    _ => (),
                }
            }
            _ => (),
        }
    }

    pub fn update(&mut self, camera: &mut ArcRotateCamera, dt: instant::Duration) {
        let dt = dt.as_secs_f32();
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;

        camera.alpha += self.alpha_velocity
            + axis(self.keys.left, self.keys.right) * self.keys_speed * dt;
        camera.beta += self.beta_velocity + axis(self.keys.down, self.keys.up) * self.keys_speed * dt;
        camera.radius += self.radius_velocity;
        camera.clamp();

        let decay = self.inertia.powf(dt * 60.0);
        self.alpha_velocity *= decay;
        self.beta_velocity *= decay;
        self.radius_velocity *= decay;
        for velocity in [
            &mut self.alpha_velocity,
            &mut self.beta_velocity,
            &mut self.radius_velocity,
        ] {
            if velocity.abs() < 1e-5 {
                *velocity = 0.0;
            }
        }
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: ArcRotateCamera,
    pub controller: ArcRotateController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(
        device: &wgpu::Device,
        camera: ArcRotateCamera,
        controller: ArcRotateController,
        projection: &Projection,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Applies pending controller input and uploads the new view-projection.
    pub fn update(&mut self, queue: &wgpu::Queue, projection: &Projection, dt: instant::Duration) {
        self.controller.update(&mut self.camera, dt);
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    fn startup_camera() -> ArcRotateCamera {
        ArcRotateCamera::new(FRAC_PI_2, FRAC_PI_2, 2.0, Vector3::new(0.0, 0.0, 5.0))
    }

    #[test]
    fn startup_camera_sits_in_front_of_target() {
        let camera = startup_camera();
        assert!(approx(camera.position(), Vector3::new(0.0, 0.0, 7.0)));
    }

    #[test]
    fn beta_and_radius_are_clamped() {
        let mut camera = startup_camera();
        camera.beta = -1.0;
        camera.radius = 1000.0;
        camera.clamp();
        assert!(camera.beta > 0.0);
        assert_eq!(camera.radius, camera.upper_radius_limit);
    }

    #[test]
    fn center_ray_points_through_target() {
        let camera = startup_camera();
        let projection = Projection::new(800, 600, Rad(0.8), 0.1, 100.0);
        let ray = camera
            .cast_ray_from_mouse(PhysicalPosition::new(400.0, 300.0), 800.0, 600.0, &projection)
            .expect("ray");
        assert!(approx(ray.direction, Vector3::new(0.0, 0.0, -1.0)));
        let hit = ray.intersect_plane_z(0.0).expect("plane hit");
        assert!(approx(hit, Vector3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn negative_x_is_on_the_left() {
        let camera = startup_camera();
        let projection = Projection::new(800, 600, Rad(0.8), 0.1, 100.0);
        let ray = camera
            .cast_ray_from_mouse(PhysicalPosition::new(100.0, 300.0), 800.0, 600.0, &projection)
            .expect("ray");
        let hit = ray.intersect_plane_z(0.0).expect("plane hit");
        assert!(hit.x < 0.0, "left edge hits {:?}", hit);
    }

    #[test]
    fn upper_half_of_screen_casts_upward() {
        let camera = startup_camera();
        let projection = Projection::new(800, 600, Rad(0.8), 0.1, 100.0);
        let ray = camera
            .cast_ray_from_mouse(PhysicalPosition::new(400.0, 100.0), 800.0, 600.0, &projection)
            .expect("ray");
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn zero_viewport_casts_nothing() {
        let camera = startup_camera();
        let projection = Projection::new(800, 600, Rad(0.8), 0.1, 100.0);
        assert!(camera
            .cast_ray_from_mouse(PhysicalPosition::new(0.0, 0.0), 0.0, 0.0, &projection)
            .is_none());
    }

    #[test]
    fn parallel_ray_misses_plane() {
        let ray = Ray {
            origin: Vector3::new(0.0, 0.0, 7.0),
            direction: Vector3::new(1.0, 0.0, 0.0),
        };
        assert!(ray.intersect_plane_z(0.0).is_none());
        let away = Ray {
            origin: Vector3::new(0.0, 0.0, 7.0),
            direction: Vector3::new(0.0, 0.0, 1.0),
        };
        assert!(away.intersect_plane_z(0.0).is_none());
    }

    #[test]
    fn drag_rotates_and_settles() {
        let mut camera = startup_camera();
        let mut controller = ArcRotateController::new(1000.0, 50.0);
        controller.handle_mouse(100.0, 0.0);
        let frame = instant::Duration::from_millis(16);
        controller.update(&mut camera, frame);
        assert!(camera.alpha < FRAC_PI_2);
        for _ in 0..600 {
            controller.update(&mut camera, frame);
        }
        let settled = camera.alpha;
        controller.update(&mut camera, frame);
        assert_eq!(camera.alpha, settled);
    }

    #[test]
    fn scrolling_zooms_in() {
        let mut camera = ArcRotateCamera::new(FRAC_PI_2, FRAC_PI_2, 10.0, Vector3::new(0.0, 0.0, 0.0));
        let mut controller = ArcRotateController::new(1000.0, 50.0);
        controller.handle_scroll(5.0);
        controller.update(&mut camera, instant::Duration::from_millis(16));
        assert!(camera.radius < 10.0);
    }
}
