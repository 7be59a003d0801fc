//! Beam-hit resolution
//!
//! The light engine only knows a narrow, one-way bridge: every non-mirror
//! terminal hit is reported through `CombatBridge` and the engine never
//! inspects the outcome. `CombatSystem` is the shipped implementation;
//! `NullBridge` swallows hits for tests and headless tools.

use glam::Vec2;
use log::info;

use crate::render::Rgba;
use crate::world::{EntityId, EntityKind, World};

/// One-way notification path from beam hits into damage resolution
pub trait CombatBridge {
    fn apply_beam_hit(
        &mut self,
        world: &mut World,
        attacker: EntityId,
        target: EntityId,
        intensity: f32,
        hit_point: Vec2,
    );
}

/// Ignores every hit
pub struct NullBridge;

impl CombatBridge for NullBridge {
    fn apply_beam_hit(
        &mut self,
        _world: &mut World,
        _attacker: EntityId,
        _target: EntityId,
        _intensity: f32,
        _hit_point: Vec2,
    ) {
    }
}

/// Base damage a beam deals to a player before intensity scaling
const PLAYER_BASE_DAMAGE: f32 = 8.0;
/// Per-hit resistance erosion cap
const MAX_RESISTANCE_LOSS: f32 = 5.0;

/// Default combat resolution against `Vitals`
#[derive(Debug, Default)]
pub struct CombatSystem;

impl CombatSystem {
    pub fn new() -> Self {
        Self
    }

    /// Wear down an enemy's resistance, then damage through what remains.
    /// Returns false when the target is not an enemy.
    fn apply_enemy_hit(&mut self, world: &mut World, target: EntityId, intensity: f32) -> bool {
        let Some(entity) = world.get_mut(target) else {
            return false;
        };
        if entity.kind != EntityKind::Enemy {
            return false;
        }
        let Some(vitals) = entity.vitals.as_mut() else {
            return false;
        };

        let resistance_loss = (intensity * 0.04).clamp(0.0, MAX_RESISTANCE_LOSS);
        vitals.resistance = (vitals.resistance - resistance_loss).max(0.0);

        let mitigation = vitals.resistance.clamp(0.0, 1.0);
        let damage = intensity * (0.35 + (1.0 - mitigation) * 0.5);
        vitals.apply_damage(damage);

        if !vitals.is_alive() {
            vitals.blocks_light = false;
            if let Some(light) = entity.light.as_mut() {
                light.intensity = light.base_intensity;
            }
            if let Some(sprite) = entity.sprite.as_mut() {
                sprite.tint = Rgba::new(30, 30, 30, 160);
            }
            info!("enemy {:?} burned out", target);
            return true;
        }

        // Tint tracks remaining health
        let health_ratio = (vitals.health / vitals.max_health.max(1.0)).clamp(0.0, 1.0);
        if let Some(sprite) = entity.sprite.as_mut() {
            sprite.tint = Rgba::new(
                255,
                (100.0 + 155.0 * health_ratio) as u8,
                (120.0 + 110.0 * health_ratio) as u8,
                200,
            );
        }

        true
    }

    fn apply_player_damage(
        &mut self,
        world: &mut World,
        attacker: EntityId,
        target: EntityId,
        damage: f32,
    ) {
        if damage <= 0.0 {
            return;
        }

        let attacker_hostile = world.get(attacker).is_some_and(|e| e.kind == EntityKind::Enemy);

        let Some(entity) = world.get_mut(target) else {
            return;
        };
        if entity.kind != EntityKind::Player {
            return;
        }
        let Some(vitals) = entity.vitals.as_mut() else {
            return;
        };
        if vitals.invulnerable {
            return;
        }

        let damage = if attacker_hostile { damage } else { damage * 0.8 };
        vitals.apply_damage(damage);
        let health = vitals.health;

        if let Some(sprite) = entity.sprite.as_mut() {
            sprite.tint = Rgba::new(255, 160, 160, 220);
        }
        info!("player took {damage:.1} beam damage, {health:.1} health left");
    }
}

impl CombatBridge for CombatSystem {
    fn apply_beam_hit(
        &mut self,
        world: &mut World,
        attacker: EntityId,
        target: EntityId,
        intensity: f32,
        _hit_point: Vec2,
    ) {
        if self.apply_enemy_hit(world, target, intensity) {
            return;
        }

        let mut damage = PLAYER_BASE_DAMAGE + intensity * 0.15;
        if world.get(attacker).is_some_and(|e| e.kind == EntityKind::Enemy) {
            damage *= 1.25;
        }
        self.apply_player_damage(world, attacker, target, damage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::components::{Sprite, Transform, Vitals};

    fn spawn(world: &mut World, kind: EntityKind, vitals: Vitals) -> EntityId {
        let entity = world.spawn(kind);
        entity.transform = Some(Transform::at(Vec2::ZERO));
        entity.sprite = Some(Sprite::new(Vec2::splat(32.0)));
        entity.vitals = Some(vitals);
        entity.id
    }

    #[test]
    fn test_enemy_resistance_erodes_then_damage_grows() {
        let mut world = World::new();
        let attacker = world.spawn(EntityKind::Player).id;
        let enemy = spawn(&mut world, EntityKind::Enemy, Vitals::new(200.0).with_resistance(1.0));
        let mut combat = CombatSystem::new();

        combat.apply_beam_hit(&mut world, attacker, enemy, 10.0, Vec2::ZERO);
        let first = world.get(enemy).unwrap().vitals.unwrap();
        // Resistance dropped by 0.4, mitigation 0.6: 10 * (0.35 + 0.2) = 5.5
        assert!((first.resistance - 0.6).abs() < 1e-4);
        assert!((first.health - 194.5).abs() < 1e-3);

        combat.apply_beam_hit(&mut world, attacker, enemy, 10.0, Vec2::ZERO);
        let second = world.get(enemy).unwrap().vitals.unwrap();
        // Less mitigation, more damage on the follow-up hit
        assert!(194.5 - second.health > 5.5);
    }

    #[test]
    fn test_dead_enemy_stops_blocking_light() {
        let mut world = World::new();
        let attacker = world.spawn(EntityKind::Player).id;
        let enemy = spawn(&mut world, EntityKind::Enemy, Vitals::new(5.0));
        let mut combat = CombatSystem::new();

        combat.apply_beam_hit(&mut world, attacker, enemy, 100.0, Vec2::ZERO);

        let vitals = world.get(enemy).unwrap().vitals.unwrap();
        assert!(!vitals.is_alive());
        assert!(!vitals.blocks_light);
        let tint = world.get(enemy).unwrap().sprite.unwrap().tint;
        assert_eq!(tint, Rgba::new(30, 30, 30, 160));
    }

    #[test]
    fn test_player_damage_scales_with_attacker() {
        let mut world = World::new();
        let enemy_attacker = world.spawn(EntityKind::Enemy).id;
        let prop_attacker = world.spawn(EntityKind::Prop).id;
        let player = spawn(&mut world, EntityKind::Player, Vitals::new(100.0));
        let mut combat = CombatSystem::new();

        // Hostile source: (8 + 10 * 0.15) * 1.25
        combat.apply_beam_hit(&mut world, enemy_attacker, player, 10.0, Vec2::ZERO);
        let after_enemy = world.get(player).unwrap().vitals.unwrap().health;
        assert!((100.0 - after_enemy - 11.875).abs() < 1e-3);

        // Neutral source: (8 + 10 * 0.15) * 0.8
        combat.apply_beam_hit(&mut world, prop_attacker, player, 10.0, Vec2::ZERO);
        let after_prop = world.get(player).unwrap().vitals.unwrap().health;
        assert!((after_enemy - after_prop - 7.6).abs() < 1e-3);
    }

    #[test]
    fn test_invulnerable_player_ignores_hits() {
        let mut world = World::new();
        let attacker = world.spawn(EntityKind::Enemy).id;
        let mut vitals = Vitals::new(100.0);
        vitals.invulnerable = true;
        let player = spawn(&mut world, EntityKind::Player, vitals);
        let mut combat = CombatSystem::new();

        combat.apply_beam_hit(&mut world, attacker, player, 50.0, Vec2::ZERO);
        assert_eq!(world.get(player).unwrap().vitals.unwrap().health, 100.0);
    }

    #[test]
    fn test_vitals_free_targets_are_untouched() {
        let mut world = World::new();
        let attacker = world.spawn(EntityKind::Player).id;
        let prop = world.spawn(EntityKind::Prop).id;
        let mut combat = CombatSystem::new();

        // No vitals anywhere: a plain no-op
        combat.apply_beam_hit(&mut world, attacker, prop, 50.0, Vec2::ZERO);
        assert!(world.get(prop).unwrap().vitals.is_none());
    }
}
