//! Backend-agnostic draw-primitive emission
//!
//! The engine does not own a GPU pipeline; it emits primitives through the
//! `DrawTarget` trait and lets the host renderer rasterize them. A
//! `RecordingTarget` captures the command stream for headless runs and
//! tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(mut self, a: u8) -> Self {
        self.a = a;
        self
    }

    /// Scale the alpha channel by a factor in [0, 1]
    pub fn scale_alpha(mut self, factor: f32) -> Self {
        self.a = (self.a as f32 * factor.clamp(0.0, 1.0)) as u8;
        self
    }
}

/// How a primitive combines with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    Alpha,
    Additive,
}

/// Sink for the engine's draw primitives
pub trait DrawTarget {
    /// Target extent in world units
    fn size(&self) -> Vec2;

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba, blend: BlendMode);

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, blend: BlendMode);

    /// Convex quad, corners in winding order
    fn fill_quad(&mut self, corners: [Vec2; 4], color: Rgba, blend: BlendMode);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect {
        min: Vec2,
        size: Vec2,
        color: Rgba,
        blend: BlendMode,
    },
    StrokeRect {
        min: Vec2,
        size: Vec2,
        color: Rgba,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        blend: BlendMode,
    },
    FillQuad {
        corners: [Vec2; 4],
        color: Rgba,
        blend: BlendMode,
    },
}

/// Captures primitives instead of rasterizing them
#[derive(Debug, Clone)]
pub struct RecordingTarget {
    size: Vec2,
    pub commands: Vec<DrawCmd>,
}

impl RecordingTarget {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn quads(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::FillQuad { .. }))
    }
}

impl DrawTarget for RecordingTarget {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba, blend: BlendMode) {
        self.commands.push(DrawCmd::FillRect {
            min,
            size,
            color,
            blend,
        });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCmd::StrokeRect { min, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, blend: BlendMode) {
        self.commands.push(DrawCmd::FillCircle {
            center,
            radius,
            color,
            blend,
        });
    }

    fn fill_quad(&mut self, corners: [Vec2; 4], color: Rgba, blend: BlendMode) {
        self.commands.push(DrawCmd::FillQuad {
            corners,
            color,
            blend,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_alpha_clamps() {
        let c = Rgba::new(10, 20, 30, 200);
        assert_eq!(c.scale_alpha(0.5).a, 100);
        assert_eq!(c.scale_alpha(2.0).a, 200);
        assert_eq!(c.scale_alpha(-1.0).a, 0);
    }

    #[test]
    fn test_recording_target_captures_order() {
        let mut target = RecordingTarget::new(Vec2::new(640.0, 360.0));
        target.fill_circle(Vec2::ZERO, 4.0, Rgba::WHITE, BlendMode::Additive);
        target.stroke_rect(Vec2::ZERO, Vec2::ONE, Rgba::BLACK);

        assert_eq!(target.commands.len(), 2);
        assert!(matches!(target.commands[0], DrawCmd::FillCircle { .. }));
        assert!(matches!(target.commands[1], DrawCmd::StrokeRect { .. }));
    }
}
