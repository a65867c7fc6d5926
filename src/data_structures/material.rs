//! Surface appearance of scene meshes.
//!
//! Materials in this crate are a pair of colours: an emissive colour that is
//! added regardless of lighting, and a diffuse colour that is modulated by the
//! hemispheric light. Both end up in the per-instance GPU data, so swapping a
//! material never touches a pipeline or bind group.

/// Linear RGB colour with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const BLACK: Color3 = Color3::new(0.0, 0.0, 0.0);
    pub const WHITE: Color3 = Color3::new(1.0, 1.0, 1.0);
    pub const RED: Color3 = Color3::new(1.0, 0.0, 0.0);
    pub const GREEN: Color3 = Color3::new(0.0, 1.0, 0.0);
    pub const BLUE: Color3 = Color3::new(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

impl From<Color3> for [f32; 3] {
    fn from(c: Color3) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<Color3> for wgpu::Color {
    fn from(c: Color3) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub emissive: Color3,
    pub diffuse: Color3,
}

/// Builder for flat, emissive-dominated materials.
pub struct SolidColor;

impl SolidColor {
    /// How much of the diffuse term survives next to the emissive colour.
    /// Enough to see the faces of a cube, not enough to wash out the colour.
    const DIFFUSE_SHARE: f32 = 0.25;

    pub fn make(color: Color3) -> Material {
        Material {
            name: format!("solid({:.2}, {:.2}, {:.2})", color.r, color.g, color.b),
            emissive: color,
            diffuse: Color3::WHITE.scale(Self::DIFFUSE_SHARE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_color_keeps_emissive() {
        let red = SolidColor::make(Color3::RED);
        assert_eq!(red.emissive, Color3::RED);
        assert!(red.diffuse.r < 1.0);
    }

    #[test]
    fn materials_of_the_same_colour_compare_equal() {
        assert_eq!(SolidColor::make(Color3::WHITE), SolidColor::make(Color3::WHITE));
        assert_ne!(SolidColor::make(Color3::WHITE), SolidColor::make(Color3::BLUE));
    }
}
