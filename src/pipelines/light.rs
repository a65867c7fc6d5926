//! Hemispheric light.
//!
//! A hemispheric light has no position. Surfaces facing `direction` receive the
//! sky colour, surfaces facing away receive the ground colour, and everything
//! in between is blended.

use wgpu::util::DeviceExt;

use crate::data_structures::material::Color3;

#[derive(Clone, Copy, Debug)]
pub struct HemisphericLight {
    pub direction: cgmath::Vector3<f32>,
    pub diffuse: Color3,
    pub ground_color: Color3,
    pub intensity: f32,
}

impl HemisphericLight {
    pub fn new(direction: cgmath::Vector3<f32>) -> Self {
        Self {
            direction,
            diffuse: Color3::WHITE,
            ground_color: Color3::BLACK,
            intensity: 1.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    direction: [f32; 3],
    intensity: f32,
    sky: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    ground: [f32; 3],
    _padding2: u32,
}

impl From<&HemisphericLight> for LightUniform {
    fn from(light: &HemisphericLight) -> Self {
        Self {
            direction: light.direction.into(),
            intensity: light.intensity,
            sky: light.diffuse.into(),
            _padding: 0,
            ground: light.ground_color.into(),
            _padding2: 0,
        }
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub light: HemisphericLight,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, light: HemisphericLight) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[LightUniform::from(&light)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        });
        Self {
            light,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write_to_buffer(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[LightUniform::from(&self.light)]),
        );
    }
}

fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("light_bind_group_layout"),
    })
}
