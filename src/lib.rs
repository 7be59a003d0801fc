//! Gloamfall - a top-down keep-crawler about bending lantern light
//!
//! Core modules:
//! - `world`: entity arena and plain-data components
//! - `light`: beam propagation (geometry, reflectors, caster, glow decay)
//! - `combat`: beam-hit resolution behind a narrow bridge trait
//! - `render`: backend-agnostic draw-primitive emission
//! - `settings`: user-facing toggles
//! - `tuning`: data-driven balance presets

pub mod combat;
pub mod light;
pub mod render;
pub mod settings;
pub mod tuning;
pub mod world;

pub use light::LightEngine;
pub use settings::Settings;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Beams stop once their remaining range drops below this
    pub const MIN_BEAM_RANGE: f32 = 4.0;
    /// Beams stop once their intensity drops below this
    pub const MIN_BEAM_INTENSITY: f32 = 0.1;
    /// Sampling stride for the marching ray-vs-box test
    pub const RAY_MARCH_STEP: f32 = 6.0;
    /// Offset off a surface when a beam restarts after a bounce or split
    pub const SURFACE_NUDGE: f32 = 4.0;
    /// Hard cap on boosted glow intensity
    pub const MAX_LIGHT_INTENSITY: f32 = 1.5;
    /// Resting darkness level
    pub const DEFAULT_AMBIENT: f32 = 0.28;
    /// Fallback box size for entities without render data
    pub const DEFAULT_BOUNDS: f32 = 32.0;
    /// Lantern fuel cap
    pub const MAX_LANTERN_FUEL: f32 = 100.0;
}

/// Normalize a vector, substituting `fallback` for degenerate input
#[inline]
pub fn normalize_or(value: Vec2, fallback: Vec2) -> Vec2 {
    let len_sq = value.length_squared();
    if len_sq <= 1e-8 {
        fallback
    } else {
        value / len_sq.sqrt()
    }
}

/// Counter-clockwise perpendicular
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Rotate a vector by an angle in degrees
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    let (sn, cs) = radians.sin_cos();
    Vec2::new(v.x * cs - v.y * sn, v.x * sn + v.y * cs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_or_fallback() {
        let fallback = Vec2::new(0.0, -1.0);
        assert_eq!(normalize_or(Vec2::ZERO, fallback), fallback);

        let n = normalize_or(Vec2::new(3.0, 4.0), fallback);
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!((n.x - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_perpendicular_is_ccw() {
        let p = perpendicular(Vec2::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_deg_quarter_turn() {
        let r = rotate_deg(Vec2::new(1.0, 0.0), 90.0);
        assert!(r.x.abs() < 1e-5);
        assert!((r.y - 1.0).abs() < 1e-5);
    }
}
