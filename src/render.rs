//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn with a [`Render`] value each frame. The
//! engine sorts those descriptions into batches per pipeline and also uses
//! them for picking, which is why every renderable carries an ID and the
//! bounds it occupies.
//!
//! # Key types
//!
//! - [`Render<'a, 'pass>`] is the primary enum describing render operations
//! - [`Instanced<'a>`] is a model with an instance buffer (3D)
//! - [`Flat<'a>`] is a screen-space quad batch (GUI)

use std::collections::{HashMap, HashSet};

use wgpu::RenderPass;

use crate::{
    context::Context,
    data_structures::{bounds::BoundingBox, model::Model},
    ui::Rect,
};

/// A model drawn with GPU instancing, plus the world-space box used for picking.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
    pub id: u32,
    pub bounds: BoundingBox,
}

/// Flat geometry in normalized device coordinates, plus the pixel rectangle
/// used for picking.
#[derive(Clone)]
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub amount: usize,
    pub id: u32,
    pub rect: Rect,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single opaque instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of opaque instanced objects
/// - `GUI(Flat)` renders 2D elements on top of the scene
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
/// - `Custom(...)` invokes a user-defined closure for custom rendering
pub enum Render<'a, 'pass>
where
    'pass: 'a,
{
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    GUI(Flat<'a>),
    Composed(Vec<Render<'a, 'pass>>),
    Custom(Box<dyn 'a + FnOnce(&Context, &mut wgpu::RenderPass<'pass>)>),
}

impl<'a, 'pass> Render<'a, 'pass> {
    /// Records which flow owns which render ID. Several flows may claim the
    /// same ID; all of them are notified on a click.
    pub(crate) fn map_ids(&self, flow_id: usize, map: &mut HashMap<u32, HashSet<usize>>) {
        let mut claim = |id: u32| {
            map.entry(id).or_default().insert(flow_id);
        };
        match self {
            Render::Default(instanced) => claim(instanced.id),
            Render::Defaults(vec) => vec.iter().for_each(|instanced| claim(instanced.id)),
            Render::GUI(flat) => claim(flat.id),
            Render::Composed(renders) => renders
                .iter()
                .for_each(|render| render.map_ids(flow_id, map)),
            Render::None | Render::Custom(_) => (),
        }
    }

    pub(crate) fn set_pipelines(
        self,
        ctx: &Context,
        render_pass: &mut RenderPass<'pass>,
        basics: &mut Vec<Instanced<'a>>,
        guis: &mut Vec<Flat<'a>>,
    ) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::GUI(flat) => guis.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(ctx, render_pass, basics, guis)),
            Render::Custom(f) => f(ctx, render_pass),
            Render::None => (),
        }
    }

    /// Flattens the render tree into pickable targets.
    pub(crate) fn pick_targets(self, basics: &mut Vec<Instanced<'a>>, flats: &mut Vec<Flat<'a>>) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::GUI(flat) => flats.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.pick_targets(basics, flats)),
            // Picking is not supported for custom renders
            Render::Custom(_) => (),
            Render::None => (),
        }
    }
}
