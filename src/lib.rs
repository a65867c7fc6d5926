//! flow-cubes
//!
//! A small interactive wgpu scene that runs natively and in the browser: a
//! white sphere floats above three coloured cubes, buttons on the right send
//! it towards a cube, and the cube it touches lights up. The sphere can also
//! be grabbed and dragged with the mouse.
//!
//! High-level modules
//! - `actions`: intersection triggers between meshes
//! - `camera`: arc-rotate camera, controller and uniforms for view/projection
//! - `capture`: save the current frame as PNG (native only)
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: scene data (meshes, materials, instances, animations)
//! - `demo`: the cube demo itself, with and without a GPU
//! - `flow`: high level flow control (scenes / update loops)
//! - `pick`: resolving clicks to render IDs
//! - `pipelines`: render pipelines (basic, gui) and the light uniform
//! - `render`: render composition for efficient pipeline reuse
//! - `ui`: on-screen buttons
//!

pub mod actions;
pub mod camera;
#[cfg(not(target_arch = "wasm32"))]
pub mod capture;
pub mod context;
pub mod data_structures;
pub mod demo;
pub mod flow;
pub mod pick;
pub mod pipelines;
pub mod render;
pub mod ui;

// Re-exports commonly used types for convenience in downstream code.
pub use winit::dpi::PhysicalPosition;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

use std::pin::Pin;

use crate::{
    context::InitContext,
    demo::{CubesFlow, DemoConfig},
    flow::{FlowConsturctor, GraphicsFlow},
};

/// Custom events of the demo. It posts none, so the type is uninhabited.
pub enum DemoEvent {}

/// Builds the demo flow with the given configuration.
pub fn cubes_flow(config: DemoConfig) -> FlowConsturctor<(), DemoEvent> {
    Box::new(move |ctx: InitContext| {
        let fut = async move {
            let flow = CubesFlow::new(&ctx, config)?;
            Ok::<_, anyhow::Error>(Box::new(flow) as Box<dyn GraphicsFlow<(), DemoEvent>>)
        };
        Box::pin(fut) as Pin<Box<dyn Future<Output = _>>>
    })
}

/// Runs the demo with the default layout.
pub fn run() -> anyhow::Result<()> {
    flow::run(vec![cubes_flow(DemoConfig::default())])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run().map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{:#}", e)))
}
