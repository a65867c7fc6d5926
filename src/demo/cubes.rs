use instant::Duration;
use wgpu::util::DeviceExt;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};

use crate::{
    camera::ArcRotateCamera,
    context::{Context, InitContext},
    data_structures::{model::Model, scene_graph::MeshId},
    demo::{Demo, DemoConfig},
    flow::{GraphicsFlow, Out},
    render::{Instanced, Render},
    ui::ButtonPanelResources,
};

pub const ACTOR_ID: u32 = 1;
/// Cube `i` (in button order) is picked as `FIRST_CUBE_ID + i`.
pub const FIRST_CUBE_ID: u32 = 2;
/// Button `i` is picked as `FIRST_BUTTON_ID + i`.
pub const FIRST_BUTTON_ID: u32 = 10;

#[derive(Debug)]
struct MeshBuffers {
    mesh: MeshId,
    model: Model,
    instance_buffer: wgpu::Buffer,
    pick_id: u32,
}

/// Draws a [`Demo`] and feeds it with clicks, drags and frame times.
pub struct CubesFlow {
    demo: Demo,
    meshes: Vec<MeshBuffers>,
    buttons: ButtonPanelResources,
}

impl CubesFlow {
    pub fn new(ctx: &InitContext, config: DemoConfig) -> anyhow::Result<Self> {
        let mut demo = Demo::new(config)?;
        demo.resize(ctx.config.width, ctx.config.height, ctx.scale_factor);

        let actor = demo.actor();
        let cube_ids: Vec<_> = demo
            .config()
            .cubes
            .iter()
            .enumerate()
            .filter_map(|(idx, cube)| {
                demo.cube_mesh(&cube.key)
                    .map(|mesh| (mesh, FIRST_CUBE_ID + idx as u32))
            })
            .collect();

        let meshes = demo
            .scene()
            .meshes()
            .map(|(id, mesh)| {
                let pick_id = if id == actor {
                    ACTOR_ID
                } else {
                    cube_ids
                        .iter()
                        .find(|(cube, _)| *cube == id)
                        .map(|(_, pick_id)| *pick_id)
                        .unwrap_or(0)
                };
                let instance_data = [mesh.instance.to_raw(&mesh.material)];
                MeshBuffers {
                    mesh: id,
                    model: Model::from_geometry(&ctx.device, &mesh.name, &mesh.geometry),
                    instance_buffer: ctx.device.create_buffer_init(
                        &wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("{} Instance Buffer", mesh.name)),
                            contents: bytemuck::cast_slice(&instance_data),
                            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        },
                    ),
                    pick_id,
                }
            })
            .collect();
        // everything was just uploaded
        demo.take_dirty();

        let buttons = ButtonPanelResources::new(&ctx.device, demo.buttons());
        Ok(Self {
            demo,
            meshes,
            buttons,
        })
    }

    pub fn demo(&self) -> &Demo {
        &self.demo
    }

    fn write_to_buffer(&mut self, ctx: &Context) {
        for id in self.demo.take_dirty() {
            let (Some(buffers), Some(mesh)) = (
                self.meshes.iter().find(|buffers| buffers.mesh == id),
                self.demo.scene().mesh(id),
            ) else {
                continue;
            };
            let instance_data = [mesh.instance.to_raw(&mesh.material)];
            ctx.queue.write_buffer(
                &buffers.instance_buffer,
                0,
                bytemuck::cast_slice(&instance_data),
            );
        }
        self.buttons
            .write_to_buffer(&ctx.queue, self.demo.buttons_mut());
    }

    fn drag_to_cursor(&mut self, ctx: &Context, coords: winit::dpi::PhysicalPosition<f64>) {
        let ray = ctx.camera.camera.cast_ray_from_mouse(
            coords,
            ctx.config.width as f32,
            ctx.config.height as f32,
            &ctx.projection,
        );
        let plane = self.demo.config().drag_plane_z;
        if let Some(point) = ray.and_then(|ray| ray.intersect_plane_z(plane)) {
            self.demo.drag_actor_to(point);
        }
    }
}

impl<S, E> GraphicsFlow<S, E> for CubesFlow {
    fn on_init(&mut self, _: &mut Context, _: &mut S) -> Out<S, E> {
        let config = self.demo.config().clone();
        Out::Configure(Box::new(move |ctx: &mut Context| {
            ctx.clear_colour = config.clear_colour;
            ctx.camera.camera = ArcRotateCamera::new(
                config.camera_alpha,
                config.camera_beta,
                config.camera_radius,
                config.camera_target,
            );
            ctx.camera
                .uniform
                .update_view_proj(&ctx.camera.camera, &ctx.projection);
            ctx.queue.write_buffer(
                &ctx.camera.buffer,
                0,
                bytemuck::cast_slice(&[ctx.camera.uniform]),
            );
            ctx.light.light.direction = config.light_direction;
            ctx.light.write_to_buffer(&ctx.queue);
        }))
    }

    fn on_click(&mut self, _: &Context, _: &mut S, id: u32) -> Out<S, E> {
        let button_count = self.demo.buttons().len() as u32;
        match id {
            ACTOR_ID => self.demo.grab_actor(),
            id if (FIRST_BUTTON_ID..FIRST_BUTTON_ID + button_count).contains(&id) => {
                let idx = (id - FIRST_BUTTON_ID) as usize;
                if let Err(e) = self.demo.press_button(idx) {
                    log::error!("Button {} failed: {:#}", idx, e);
                }
            }
            id => log::debug!("Clicked render ID {}", id),
        }
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut S, dt: Duration) -> Out<S, E> {
        self.demo.update(dt.as_secs_f32());
        self.write_to_buffer(ctx);
        Out::Empty
    }

    fn on_tick(&mut self, _: &Context, _: &mut S) -> Out<S, E> {
        Out::Empty
    }

    fn on_device_events(&mut self, _: &Context, _: &mut S, _: &DeviceEvent) -> Out<S, E> {
        Out::Empty
    }

    fn on_window_events(&mut self, ctx: &Context, _: &mut S, event: &WindowEvent) -> Out<S, E> {
        match event {
            WindowEvent::CursorMoved { position, .. } if self.demo.is_grabbed() => {
                self.drag_to_cursor(ctx, *position);
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => self.demo.release_actor(),
            WindowEvent::Resized(size) => {
                self.demo
                    .resize(size.width, size.height, ctx.scale_factor());
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.demo
                    .resize(ctx.config.width, ctx.config.height, *scale_factor);
            }
            _ => (),
        }
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut S, event: E) -> Option<E> {
        Some(event)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        let meshes = self
            .meshes
            .iter()
            .filter_map(|buffers| {
                let bounds = self.demo.scene().world_bounds(buffers.mesh)?;
                Some(Instanced {
                    instance: &buffers.instance_buffer,
                    model: &buffers.model,
                    amount: 1,
                    id: buffers.pick_id,
                    bounds,
                })
            })
            .collect();
        Render::Composed(vec![
            Render::Defaults(meshes),
            self.buttons
                .get_render(self.demo.buttons(), FIRST_BUTTON_ID),
        ])
    }
}
