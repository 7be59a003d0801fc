//! Beam segments and cast parameters

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::render::Rgba;

use super::reflector::ForkChild;

/// One rendered leg of a beam's path. Lives until its ttl runs out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BeamSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Rgba,
    pub width: f32,
    pub ttl: f32,
    /// Original ttl, kept for fade-out
    pub lifetime: f32,
    pub intensity: f32,
}

impl BeamSegment {
    pub fn is_expired(&self) -> bool {
        self.ttl <= 0.0
    }

    /// Remaining fraction of the segment's life, in [0, 1]
    pub fn life_ratio(&self) -> f32 {
        if self.lifetime > 0.0 {
            (self.ttl / self.lifetime).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Everything one `cast_beam` call needs
#[derive(Debug, Clone, Copy)]
pub struct BeamParams {
    pub origin: Vec2,
    pub direction: Vec2,
    pub range: f32,
    pub width: f32,
    pub color: Rgba,
    pub intensity: f32,
    pub ttl: f32,
    pub reflections_left: u32,
}

impl BeamParams {
    /// Parameters for a forked child. Range scales off the parent's
    /// remaining range at the hit; width, intensity, and ttl scale off
    /// the parent cast's entry values.
    pub fn child(
        &self,
        fork: &ForkChild,
        hit_point: Vec2,
        remaining_range: f32,
        reflections_left: u32,
    ) -> BeamParams {
        BeamParams {
            origin: hit_point + fork.direction * fork.origin_nudge,
            direction: fork.direction,
            range: remaining_range * fork.range_scale,
            width: self.width * fork.width_scale,
            color: self.color,
            intensity: self.intensity * fork.intensity_scale,
            ttl: self.ttl * fork.ttl_scale,
            reflections_left: reflections_left.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::reflector::ForkChild;

    #[test]
    fn test_life_ratio_bounds() {
        let mut segment = BeamSegment {
            start: Vec2::ZERO,
            end: Vec2::new(10.0, 0.0),
            color: Rgba::WHITE,
            width: 4.0,
            ttl: 0.12,
            lifetime: 0.12,
            intensity: 35.0,
        };
        assert!((segment.life_ratio() - 1.0).abs() < 1e-6);

        segment.ttl = 0.0;
        assert_eq!(segment.life_ratio(), 0.0);
        assert!(segment.is_expired());
    }

    #[test]
    fn test_child_scales_entry_values() {
        let parent = BeamParams {
            origin: Vec2::ZERO,
            direction: Vec2::new(1.0, 0.0),
            range: 640.0,
            width: 10.0,
            color: Rgba::WHITE,
            intensity: 35.0,
            ttl: 0.12,
            reflections_left: 4,
        };
        let fork = ForkChild {
            direction: Vec2::new(0.0, 1.0),
            origin_nudge: 4.0,
            range_scale: 0.65,
            width_scale: 0.7,
            intensity_scale: 0.6,
            ttl_scale: 0.85,
        };

        // Two flat bounces already consumed budget; fork off the rest
        let child = parent.child(&fork, Vec2::new(300.0, 0.0), 340.0, 2);
        assert_eq!(child.origin, Vec2::new(300.0, 4.0));
        assert!((child.range - 221.0).abs() < 1e-3);
        assert!((child.width - 7.0).abs() < 1e-5);
        assert!((child.intensity - 21.0).abs() < 1e-4);
        assert!((child.ttl - 0.102).abs() < 1e-5);
        assert_eq!(child.reflections_left, 1);
    }
}
