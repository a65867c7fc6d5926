//! Render pipelines.
//!
//! - `basic` lit, instanced meshes
//! - `gui` flat screen-space quads
//! - `light` the hemispheric light uniform shared by the basic pipeline

pub mod basic;
pub mod gui;
pub mod light;

#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub gui: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(
                device,
                config,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
            gui: gui::mk_gui_pipeline(device, config),
        }
    }
}
