use cgmath::Vector3;
use flow_cubes::{
    data_structures::material::Color3,
    demo::{Demo, DemoConfig},
};

/// Frame length used by the drivers: a steady 60Hz.
pub const FRAME: f32 = 1.0 / 60.0;

/// Runs a [`Demo`] frame by frame the way the event loop would.
pub struct DemoDriver {
    pub demo: Demo,
    frames: u32,
}

impl DemoDriver {
    pub fn new() -> Self {
        Self::with_config(DemoConfig::default())
    }

    pub fn with_config(config: DemoConfig) -> Self {
        Self {
            demo: Demo::new(config).expect("demo setup failed"),
            frames: 0,
        }
    }

    pub fn frame(&mut self) {
        self.demo.update(FRAME);
        self.frames += 1;
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn run_for(&mut self, seconds: f32) {
        let frames = (seconds / FRAME).ceil() as u32;
        for _ in 0..frames {
            self.frame();
        }
    }

    /// Steps until `done` holds or `max_seconds` have passed. Returns the
    /// number of seconds it took.
    pub fn run_until(&mut self, max_seconds: f32, done: impl Fn(&Demo) -> bool) -> Option<f32> {
        let start = self.frames;
        let limit = (max_seconds / FRAME).ceil() as u32;
        for _ in 0..limit {
            self.frame();
            if done(&self.demo) {
                return Some((self.frames - start) as f32 * FRAME);
            }
        }
        None
    }

    pub fn press(&mut self, key: &str) -> bool {
        let idx = self
            .demo
            .buttons()
            .index_of(key)
            .unwrap_or_else(|| panic!("no button for {}", key));
        self.demo.press_button(idx).expect("press failed")
    }

    pub fn is_highlighted(&self, key: &str) -> bool {
        self.demo
            .cube_material(key)
            .map(|material| material.emissive == Color3::WHITE)
            .unwrap_or(false)
    }

    pub fn actor(&self) -> Vector3<f32> {
        self.demo.actor_position()
    }
}
