//! Data-driven balance
//!
//! Numeric presets for emitters, glow fields, mirrors, and puzzles,
//! loadable from JSON so scene data can rebalance without a rebuild.
//! The defaults here are the shipped values; component `Default` impls
//! mirror them.

use serde::{Deserialize, Serialize};

use crate::render::Rgba;
use crate::world::components::{Emitter, LightField, Mirror, MirrorKind, Puzzle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterTuning {
    pub beam_length: f32,
    pub beam_width: f32,
    pub damage: f32,
    pub cooldown: f32,
    pub beam_duration: f32,
    pub energy_cost: f32,
    pub max_reflections: u32,
    pub continuous_fire: bool,
    pub beam_color: Rgba,
}

impl Default for EmitterTuning {
    fn default() -> Self {
        Self {
            beam_length: 520.0,
            beam_width: 10.0,
            damage: 35.0,
            cooldown: 0.18,
            beam_duration: 0.12,
            energy_cost: 4.0,
            max_reflections: 3,
            continuous_fire: true,
            beam_color: Rgba::new(255, 230, 160, 255),
        }
    }
}

impl EmitterTuning {
    /// The player's lantern staff: longer reach, one more bounce
    pub fn lantern_staff() -> Self {
        Self {
            beam_length: 640.0,
            max_reflections: 4,
            continuous_fire: false,
            ..Self::default()
        }
    }

    /// Wall-mounted sentry: slower, dimmer, always firing
    pub fn sentry() -> Self {
        Self {
            beam_length: 420.0,
            damage: 22.0,
            cooldown: 0.6,
            beam_duration: 0.2,
            beam_color: Rgba::new(255, 140, 120, 255),
            ..Self::default()
        }
    }

    pub fn build(&self) -> Emitter {
        Emitter {
            beam_length: self.beam_length,
            beam_width: self.beam_width,
            damage: self.damage,
            cooldown: self.cooldown,
            beam_duration: self.beam_duration,
            energy_cost: self.energy_cost,
            max_reflections: self.max_reflections,
            continuous_fire: self.continuous_fire,
            beam_color: self.beam_color,
            ..Emitter::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightTuning {
    pub radius: f32,
    pub base_intensity: f32,
    pub decay_rate: f32,
    pub decay_delay: f32,
}

impl Default for LightTuning {
    fn default() -> Self {
        Self {
            radius: 160.0,
            base_intensity: 1.0,
            decay_rate: 0.45,
            decay_delay: 0.35,
        }
    }
}

impl LightTuning {
    pub fn build(&self) -> LightField {
        LightField {
            radius: self.radius,
            intensity: self.base_intensity,
            base_intensity: self.base_intensity,
            decay_rate: self.decay_rate,
            decay_delay: self.decay_delay,
            ..LightField::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorTuning {
    pub length: f32,
    pub thickness: f32,
    pub reflection_loss: f32,
}

impl Default for MirrorTuning {
    fn default() -> Self {
        Self {
            length: 42.0,
            thickness: 12.0,
            reflection_loss: 0.1,
        }
    }
}

impl MirrorTuning {
    pub fn build(&self, kind: MirrorKind, normal: glam::Vec2) -> Mirror {
        let mut mirror = Mirror::new(kind, normal);
        mirror.size = glam::Vec2::new(self.length, self.thickness);
        mirror.reflection_loss = self.reflection_loss;
        mirror
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleTuning {
    pub required_light: u32,
    pub required_unique_sources: u32,
}

impl Default for PuzzleTuning {
    fn default() -> Self {
        Self {
            required_light: 1,
            required_unique_sources: 1,
        }
    }
}

impl PuzzleTuning {
    pub fn build(&self) -> Puzzle {
        let mut puzzle = Puzzle {
            required_light: self.required_light,
            ..Puzzle::default()
        };
        puzzle.set_required_unique_sources(self.required_unique_sources);
        puzzle
    }
}

/// The full balance sheet for a scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub emitter: EmitterTuning,
    #[serde(default)]
    pub light: LightTuning,
    #[serde(default)]
    pub mirror: MirrorTuning,
    #[serde(default)]
    pub puzzle: PuzzleTuning,
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_components() {
        let built = EmitterTuning::default().build();
        let component = Emitter::default();
        assert_eq!(built.beam_length, component.beam_length);
        assert_eq!(built.cooldown, component.cooldown);
        assert_eq!(built.max_reflections, component.max_reflections);
        assert_eq!(built.beam_color, component.beam_color);

        let light = LightTuning::default().build();
        assert_eq!(light.radius, 160.0);
        assert_eq!(light.decay_rate, 0.45);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let tuning = Tuning::from_json("{}").unwrap();
        assert_eq!(tuning.emitter.beam_length, 520.0);
        assert_eq!(tuning.mirror.length, 42.0);
        assert_eq!(tuning.puzzle.required_light, 1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut tuning = Tuning::default();
        tuning.emitter.max_reflections = 6;
        tuning.puzzle.required_light = 9;

        let back = Tuning::from_json(&tuning.to_json()).unwrap();
        assert_eq!(back.emitter.max_reflections, 6);
        assert_eq!(back.puzzle.required_light, 9);
    }

    #[test]
    fn test_presets_differ_where_it_matters() {
        let staff = EmitterTuning::lantern_staff();
        assert_eq!(staff.beam_length, 640.0);
        assert_eq!(staff.max_reflections, 4);
        assert!(!staff.continuous_fire);

        let sentry = EmitterTuning::sentry();
        assert!(sentry.continuous_fire);
        assert!(sentry.cooldown > staff.cooldown);
    }
}
