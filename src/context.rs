use std::{f32::consts::FRAC_PI_2, sync::Arc};

use anyhow::Context as _;
use winit::{dpi::PhysicalPosition, window::Window};

use crate::{
    camera::{ArcRotateCamera, ArcRotateController, CameraResources, Projection},
    data_structures::texture,
    pipelines::{
        Pipelines,
        light::{HemisphericLight, LightResources},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonState {
    Right,
    Left,
    None,
}

#[derive(Debug, Clone)]
pub struct MouseState {
    pub coords: PhysicalPosition<f64>,
    pub pressed: MouseButtonState,
    /// Render ID hit by the last left press, if any.
    pub selection: Option<u32>,
}

impl MouseState {
    pub fn select(&mut self, pick_id: Option<u32>) {
        self.selection = pick_id;
    }
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            coords: (0.0, 0.0).into(),
            pressed: MouseButtonState::None,
            selection: None,
        }
    }
}

/// The GPU and window state shared by all flows.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub tick_duration_millis: u64,
    pub mouse: MouseState,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter is compatible with the window surface")?;
        log::debug!("Using adapter {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .context("Cannot open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour, so prefer an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface reports no supported texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let projection =
            Projection::new(config.width, config.height, cgmath::Deg(45.0), 0.1, 500.0);
        let camera = CameraResources::new(
            &device,
            ArcRotateCamera::new(FRAC_PI_2, FRAC_PI_2, 2.0, cgmath::Vector3::new(0.0, 0.0, 5.0)),
            ArcRotateController::new(500.0, 3.0),
            &projection,
        );
        let light = LightResources::new(
            &device,
            HemisphericLight::new(cgmath::Vector3::new(1.0, 1.0, 0.0)),
        );

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let pipelines = Pipelines::new(
            &device,
            &config,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipelines,
            clear_colour: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
            tick_duration_millis: 500,
            mouse: MouseState::default(),
        })
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}

/// What a flow constructor gets to build its GPU resources with.
///
/// `Device` and `Queue` are reference counted internally, so cloning them out
/// of the [`Context`] is cheap and lets constructors run as independent
/// futures.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub scale_factor: f64,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            config: ctx.config.clone(),
            scale_factor: ctx.scale_factor(),
        }
    }
}
