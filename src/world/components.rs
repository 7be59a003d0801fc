//! Plain-data components
//!
//! Components carry state only; behavior lives in the engine and the
//! combat bridge. Every numeric default matches the shipped tuning.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::consts::MAX_LANTERN_FUEL;
use crate::normalize_or;
use crate::render::Rgba;
use crate::world::EntityId;

/// Position, rotation (degrees), scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Unit heading derived from the rotation angle
    pub fn heading(&self) -> Vec2 {
        let radians = self.rotation.to_radians();
        normalize_or(Vec2::new(radians.cos(), radians.sin()), Vec2::new(1.0, 0.0))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

/// Render extent and tint; also the bounding box used for beam occlusion
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sprite {
    pub size: Vec2,
    pub tint: Rgba,
}

impl Sprite {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            tint: Rgba::WHITE,
        }
    }
}

/// Lets an entity fire light beams on a cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emitter {
    pub enabled: bool,
    /// Unit aim vector; write through `set_direction`
    pub direction: Vec2,
    pub beam_color: Rgba,
    pub beam_length: f32,
    pub beam_width: f32,
    pub damage: f32,
    pub cooldown: f32,
    pub beam_duration: f32,
    pub energy_cost: f32,
    pub cooldown_timer: f32,
    pub max_reflections: u32,
    pub trigger_held: bool,
    pub continuous_fire: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: Vec2::new(1.0, 0.0),
            beam_color: Rgba::new(255, 230, 160, 255),
            beam_length: 520.0,
            beam_width: 10.0,
            damage: 35.0,
            cooldown: 0.18,
            beam_duration: 0.12,
            energy_cost: 4.0,
            cooldown_timer: 0.0,
            max_reflections: 3,
            trigger_held: false,
            continuous_fire: true,
        }
    }
}

impl Emitter {
    /// Set the aim direction, re-normalized with a safe fallback
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = normalize_or(direction, Vec2::new(1.0, 0.0));
    }

    pub fn advance_cooldown(&mut self, dt: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        }
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Restart the cooldown after a shot
    pub fn register_shot(&mut self) {
        self.cooldown_timer = self.cooldown;
    }
}

/// Time-varying glow with boost-then-decay dynamics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightField {
    pub enabled: bool,
    pub radius: f32,
    pub intensity: f32,
    pub base_intensity: f32,
    pub decay_rate: f32,
    pub decay_delay: f32,
    pub time_since_boost: f32,
    pub weaponized: bool,
}

impl Default for LightField {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 160.0,
            intensity: 1.0,
            base_intensity: 1.0,
            decay_rate: 0.45,
            decay_delay: 0.35,
            // Start well past the delay so fresh entities sit at rest
            time_since_boost: 10.0,
            weaponized: false,
        }
    }
}

impl LightField {
    pub fn advance_boost_timer(&mut self, dt: f32) {
        self.time_since_boost += dt;
    }

    /// A fresh boost restarts the decay delay
    pub fn reset_boost_timer(&mut self) {
        self.time_since_boost = 0.0;
    }
}

/// Mirror behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorKind {
    /// Single continuation along the reflected direction
    Flat,
    /// Binary fork along the surface tangent
    Splitter,
    /// Binary fork at a fixed angle off the incoming direction
    Prism,
}

/// Reflective surface state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mirror {
    normal: Vec2,
    pub size: Vec2,
    pub reflection_loss: f32,
    pub kind: MirrorKind,
    pub active: bool,
}

impl Default for Mirror {
    fn default() -> Self {
        Self {
            normal: Vec2::new(0.0, -1.0),
            size: Vec2::new(42.0, 12.0),
            reflection_loss: 0.1,
            kind: MirrorKind::Flat,
            active: true,
        }
    }
}

impl Mirror {
    pub fn new(kind: MirrorKind, normal: Vec2) -> Self {
        let mut mirror = Self {
            kind,
            ..Self::default()
        };
        mirror.set_normal(normal);
        mirror
    }

    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    pub fn set_normal(&mut self, normal: Vec2) {
        self.normal = normalize_or(normal, Vec2::new(0.0, -1.0));
    }
}

/// Which emitters may contribute light to a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourcePolicy {
    #[default]
    Any,
    PlayerOnly,
    BeaconOnly,
}

/// How a puzzle decides it is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionRule {
    /// Accumulated received light crosses the threshold
    #[default]
    AccumulatedIntensity,
    /// Enough distinct emitters have contributed
    UniqueSources,
}

/// Beacon-style puzzle state fed by beam hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub required_light: u32,
    pub received_light: f32,
    /// Monotonic under the engine; never cleared by beam hits
    pub solved: bool,
    pub source_policy: SourcePolicy,
    pub completion: CompletionRule,
    /// Keep at least 1; write through `set_required_unique_sources`
    pub required_unique_sources: u32,
    pub unique_sources: HashSet<EntityId>,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self {
            required_light: 1,
            received_light: 0.0,
            solved: false,
            source_policy: SourcePolicy::Any,
            completion: CompletionRule::AccumulatedIntensity,
            required_unique_sources: 1,
            unique_sources: HashSet::new(),
        }
    }
}

impl Puzzle {
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn mark_solved(&mut self) {
        self.solved = true;
    }

    pub fn set_required_unique_sources(&mut self, count: u32) {
        self.required_unique_sources = count.max(1);
        if self.required_unique_sources <= 1 {
            self.unique_sources.clear();
        }
    }

    /// Record a contributing emitter; only tracked in multi-source setups
    pub fn record_source(&mut self, source: EntityId) {
        if self.required_unique_sources > 1 {
            self.unique_sources.insert(source);
        }
    }

    pub fn unique_source_count(&self) -> usize {
        self.unique_sources.len()
    }

    pub fn has_required_unique_sources(&self) -> bool {
        self.required_unique_sources <= 1
            || self.unique_sources.len() >= self.required_unique_sources as usize
    }

    pub fn reset_sources(&mut self) {
        self.unique_sources.clear();
    }
}

/// Carryable light source with a fuel reserve
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lantern {
    pub movable: bool,
    pub active: bool,
    /// Clamped to [0, 100]; write through `set_fuel`/`refuel`
    pub fuel: f32,
}

impl Default for Lantern {
    fn default() -> Self {
        Self {
            movable: false,
            active: true,
            fuel: MAX_LANTERN_FUEL,
        }
    }
}

impl Lantern {
    pub fn set_fuel(&mut self, fuel: f32) {
        self.fuel = fuel.clamp(0.0, MAX_LANTERN_FUEL);
    }

    pub fn refuel(&mut self, amount: f32) {
        self.set_fuel(self.fuel + amount);
    }
}

/// Health, beam resistance, and occlusion state for combat targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    /// Mitigation factor in [0, 1]; worn down by repeated beam hits
    pub resistance: f32,
    pub invulnerable: bool,
    /// Cleared on death; maintained by the combat bridge
    pub blocks_light: bool,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            resistance: 0.0,
            invulnerable: false,
            blocks_light: true,
        }
    }

    pub fn with_resistance(mut self, resistance: f32) -> Self {
        self.resistance = resistance.clamp(0.0, 1.0);
        self
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}
