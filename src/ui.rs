//! On-screen buttons.
//!
//! Buttons are laid out like absolutely positioned HTML elements anchored to
//! the top-right corner of the window: a fixed size, a fixed distance from the
//! right edge, and a vertical offset that grows with every button. A disabled
//! button is drawn darker and swallows clicks.
//!
//! The panel itself is plain data; [`ButtonPanelResources`] mirrors it into
//! GPU buffers for the GUI pipeline.

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalPosition;

use crate::{
    data_structures::material::Color3,
    pipelines::gui::GuiVertex,
    render::{Flat, Render},
};

/// Axis-aligned rectangle in physical pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Half-open on the right and bottom edge so stacked rects never overlap.
    pub fn contains(&self, position: PhysicalPosition<f64>) -> bool {
        let (px, py) = (position.x as f32, position.y as f32);
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Shrinks the rect around its centre to `factor` of its size.
    pub fn inset(&self, factor: f32) -> Rect {
        let width = self.width * factor;
        let height = self.height * factor;
        Rect {
            x: self.x + (self.width - width) * 0.5,
            y: self.y + (self.height - height) * 0.5,
            width,
            height,
        }
    }
}

/// Layout in logical pixels, scaled by the window's scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonLayout {
    pub width: f32,
    pub height: f32,
    pub right: f32,
    pub top: f32,
    pub spacing: f32,
}

impl Default for ButtonLayout {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            right: 30.0,
            top: 100.0,
            spacing: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub label: String,
    pub key: String,
    pub swatch: Color3,
    pub rect: Rect,
    pub enabled: bool,
}

#[derive(Clone, Debug)]
pub struct ButtonPanel {
    buttons: Vec<Button>,
    layout: ButtonLayout,
    viewport: (f32, f32),
    scale: f32,
    dirty: bool,
}

impl ButtonPanel {
    /// `entries` are `(key, swatch colour)` pairs in display order.
    pub fn new(
        entries: &[(&str, Color3)],
        layout: ButtonLayout,
        width: u32,
        height: u32,
        scale: f32,
    ) -> Self {
        let buttons = entries
            .iter()
            .map(|(key, swatch)| Button {
                label: format!("Move to {}", key),
                key: key.to_string(),
                swatch: *swatch,
                rect: Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 0.0,
                    height: 0.0,
                },
                enabled: true,
            })
            .collect();
        let mut panel = Self {
            buttons,
            layout,
            viewport: (0.0, 0.0),
            scale,
            dirty: true,
        };
        panel.relayout(width, height, scale);
        panel
    }

    pub fn relayout(&mut self, width: u32, height: u32, scale: f32) {
        self.viewport = (width as f32, height as f32);
        self.scale = scale;
        let l = self.layout;
        for (idx, button) in self.buttons.iter_mut().enumerate() {
            let offset = idx as f32 * l.spacing;
            button.rect = Rect {
                x: width as f32 - (l.right + l.width) * scale,
                y: (l.top + offset) * scale,
                width: l.width * scale,
                height: l.height * scale,
            };
        }
        self.dirty = true;
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn is_enabled(&self, idx: usize) -> bool {
        self.buttons.get(idx).is_some_and(|button| button.enabled)
    }

    pub fn all_enabled(&self) -> bool {
        self.buttons.iter().all(|button| button.enabled)
    }

    pub fn enable_all(&mut self) {
        self.set_all(true);
    }

    pub fn disable_all(&mut self) {
        self.set_all(false);
    }

    fn set_all(&mut self, enabled: bool) {
        for button in self.buttons.iter_mut() {
            if button.enabled != enabled {
                button.enabled = enabled;
                self.dirty = true;
            }
        }
    }

    /// Index of the button under `position`, enabled or not.
    pub fn hit_test(&self, position: PhysicalPosition<f64>) -> Option<usize> {
        self.buttons
            .iter()
            .rposition(|button| button.rect.contains(position))
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.buttons.iter().position(|button| button.key == key)
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Background quad followed by the swatch quad, in normalized device
    /// coordinates.
    pub fn quads(&self, idx: usize) -> Option<([GuiVertex; 8], [u16; 12])> {
        let button = self.buttons.get(idx)?;
        let (background, swatch) = if button.enabled {
            ([0.94, 0.94, 0.94, 1.0], button.swatch)
        } else {
            ([0.35, 0.35, 0.35, 0.9], button.swatch.scale(0.5))
        };
        let swatch = [swatch.r, swatch.g, swatch.b, 1.0];
        let outer = self.quad(button.rect, background);
        let inner = self.quad(button.rect.inset(0.4), swatch);
        let mut vertices = [outer[0]; 8];
        vertices[..4].copy_from_slice(&outer);
        vertices[4..].copy_from_slice(&inner);
        Some((vertices, [0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]))
    }

    fn quad(&self, rect: Rect, color: [f32; 4]) -> [GuiVertex; 4] {
        let (w, h) = (self.viewport.0.max(1.0), self.viewport.1.max(1.0));
        let to_ndc = |x: f32, y: f32| [2.0 * x / w - 1.0, 1.0 - 2.0 * y / h];
        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);
        [
            GuiVertex { position: to_ndc(left, bottom), color },
            GuiVertex { position: to_ndc(right, bottom), color },
            GuiVertex { position: to_ndc(right, top), color },
            GuiVertex { position: to_ndc(left, top), color },
        ]
    }
}

#[derive(Debug)]
struct ButtonBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    amount: usize,
}

/// GPU mirror of a [`ButtonPanel`].
#[derive(Debug)]
pub struct ButtonPanelResources {
    buttons: Vec<ButtonBuffers>,
}

impl ButtonPanelResources {
    pub fn new(device: &wgpu::Device, panel: &ButtonPanel) -> Self {
        let buttons = (0..panel.len())
            .filter_map(|idx| panel.quads(idx))
            .enumerate()
            .map(|(idx, (vertices, indices))| ButtonBuffers {
                vertex: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Button {} Vertex Buffer", idx)),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                }),
                index: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Button {} Index Buffer", idx)),
                    contents: bytemuck::cast_slice(&indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                amount: indices.len(),
            })
            .collect();
        Self { buttons }
    }

    /// Rewrites vertex colours and positions if the panel changed.
    pub fn write_to_buffer(&self, queue: &wgpu::Queue, panel: &mut ButtonPanel) {
        if !panel.take_dirty() {
            return;
        }
        for (idx, buffers) in self.buttons.iter().enumerate() {
            if let Some((vertices, _)) = panel.quads(idx) {
                queue.write_buffer(&buffers.vertex, 0, bytemuck::cast_slice(&vertices));
            }
        }
    }

    /// One GUI render per button; button `i` gets the render ID `first_id + i`.
    pub fn get_render<'a, 'pass>(&'a self, panel: &ButtonPanel, first_id: u32) -> Render<'a, 'pass>
    where
        'pass: 'a,
    {
        Render::Composed(
            self.buttons
                .iter()
                .zip(panel.buttons())
                .enumerate()
                .map(|(idx, (buffers, button))| {
                    Render::GUI(Flat {
                        vertex: &buffers.vertex,
                        index: &buffers.index,
                        amount: buffers.amount,
                        id: first_id + idx as u32,
                        rect: button.rect,
                    })
                })
                .collect(),
        )
    }
}
