//! The light propagation engine
//!
//! One `update` per frame, in order: expire beam segments, schedule and
//! fire emitters (casting recurses synchronously for splitters and
//! prisms), apply impact side effects, then decay glow fields for every
//! lit entity. `render` emits the frame's draw primitives: glow halos,
//! the darkness overlay, beam segments, and optionally debug geometry.

use glam::Vec2;
use log::{debug, info};

use crate::combat::CombatBridge;
use crate::consts::{
    DEFAULT_AMBIENT, DEFAULT_BOUNDS, MAX_LIGHT_INTENSITY, MIN_BEAM_INTENSITY, MIN_BEAM_RANGE,
    SURFACE_NUDGE,
};
use crate::render::{BlendMode, DrawTarget, Rgba};
use crate::world::{Entity, EntityId, EntityKind, World};
use crate::{normalize_or, perpendicular};

use super::beam::{BeamParams, BeamSegment};
use super::geometry::{Aabb, ray_vs_box, ray_vs_mirror};
use super::puzzle;
use super::reflector::{Deflection, deflect};

/// Fraction of a hit's intensity fed into the target's glow
const LIGHT_BOOST_SCALE: f32 = 0.01;

/// Restore-toward-base runs at half the decay rate
const RESTORE_RATE_SCALE: f32 = 0.5;

/// Per-frame aiming context for player-controlled emitters
#[derive(Debug, Clone, Copy, Default)]
pub struct AimContext {
    /// Cursor position in world space
    pub cursor: Option<Vec2>,
}

struct PendingShot {
    owner: EntityId,
    params: BeamParams,
}

struct Obstruction {
    entity: EntityId,
    distance: f32,
    mirror: bool,
}

/// Beam propagation, glow decay, and light-driven puzzle state
pub struct LightEngine {
    segments: Vec<BeamSegment>,
    ambient_light: f32,
    debug_overlay: bool,
    debug_mirror_bounds: Vec<Aabb>,
    debug_hit_points: Vec<Vec2>,
}

impl Default for LightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LightEngine {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            ambient_light: DEFAULT_AMBIENT,
            debug_overlay: false,
            debug_mirror_bounds: Vec::new(),
            debug_hit_points: Vec::new(),
        }
    }

    pub fn ambient_light(&self) -> f32 {
        self.ambient_light
    }

    /// Global brightness floor for the darkness overlay and tinting
    pub fn set_ambient_light(&mut self, ambient: f32) {
        self.ambient_light = ambient.clamp(0.0, 1.0);
    }

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.debug_overlay = enabled;
    }

    /// Live beam segments, for tests and tooling
    pub fn segments(&self) -> &[BeamSegment] {
        &self.segments
    }

    /// Advance one frame of light propagation
    pub fn update(
        &mut self,
        world: &mut World,
        dt: f32,
        aim: &AimContext,
        combat: &mut dyn CombatBridge,
    ) {
        self.refresh_beam_timers(dt);
        self.update_emitters(world, dt, aim, combat);
        self.update_light_fields(world, dt);
    }

    /// Age segments and drop the expired ones
    fn refresh_beam_timers(&mut self, dt: f32) {
        for segment in &mut self.segments {
            segment.ttl = (segment.ttl - dt).max(0.0);
        }
        self.segments.retain(|segment| !segment.is_expired());
    }

    fn update_emitters(
        &mut self,
        world: &mut World,
        dt: f32,
        aim: &AimContext,
        combat: &mut dyn CombatBridge,
    ) {
        self.refresh_debug_bounds(world);
        self.debug_hit_points.clear();

        let player_center = world
            .player()
            .and_then(|p| p.transform)
            .map(|t| t.position);

        // Scan first, fire after: firing mid-scan would let earlier shots
        // change what later emitters see this frame.
        let mut ready: Vec<PendingShot> = Vec::new();

        for entity in world.iter_mut() {
            let Some(transform) = entity.transform else {
                continue;
            };
            let id = entity.id;
            let kind = entity.kind;
            let Some(emitter) = entity.emitter.as_mut() else {
                continue;
            };
            if !emitter.enabled {
                continue;
            }

            emitter.advance_cooldown(dt);

            match kind {
                EntityKind::Player => {
                    if let Some(cursor) = aim.cursor {
                        emitter.set_direction(cursor - transform.position);
                    }
                }
                EntityKind::Enemy => {
                    match player_center {
                        Some(target) => emitter.set_direction(target - transform.position),
                        None => emitter.set_direction(transform.heading()),
                    }
                    // Hostiles re-assert the trigger every frame
                    emitter.trigger_held = emitter.continuous_fire;
                }
                _ => emitter.set_direction(transform.heading()),
            }

            if !emitter.trigger_held || !emitter.can_fire() {
                continue;
            }

            ready.push(PendingShot {
                owner: id,
                params: BeamParams {
                    origin: transform.position,
                    direction: emitter.direction,
                    range: emitter.beam_length,
                    width: emitter.beam_width,
                    color: emitter.beam_color,
                    intensity: emitter.damage,
                    ttl: emitter.beam_duration,
                    reflections_left: emitter.max_reflections,
                },
            });
        }

        for shot in ready {
            debug!("entity {:?} fires a beam", shot.owner);
            self.cast_beam(world, shot.owner, shot.params, combat);
            if let Some(emitter) = world.get_mut(shot.owner).and_then(|e| e.emitter.as_mut()) {
                emitter.register_shot();
            }
        }
    }

    /// Propagate one beam through the world, emitting a segment per leg.
    ///
    /// Terminates because every iteration either shrinks the remaining
    /// range (flat bounce), exits, or forks into children whose budget is
    /// strictly smaller.
    fn cast_beam(
        &mut self,
        world: &mut World,
        owner: EntityId,
        params: BeamParams,
        combat: &mut dyn CombatBridge,
    ) {
        let mut start = params.origin;
        let mut direction = normalize_or(params.direction, Vec2::new(1.0, 0.0));
        let mut remaining = params.range;
        let mut intensity = params.intensity;
        let mut reflections_left = params.reflections_left;

        while remaining > MIN_BEAM_RANGE && intensity > MIN_BEAM_INTENSITY {
            let hit = nearest_obstruction(world, owner, start, direction, remaining);
            let distance = hit.as_ref().map_or(remaining, |h| h.distance);
            let end = start + direction * distance;

            self.segments.push(BeamSegment {
                start,
                end,
                color: params.color,
                width: params.width,
                ttl: params.ttl,
                lifetime: params.ttl,
                intensity,
            });

            let Some(hit) = hit else {
                break;
            };

            if hit.mirror {
                let Some(mirror) = world.get(hit.entity).and_then(|e| e.mirror.clone()) else {
                    break;
                };

                match deflect(&mirror, direction, reflections_left) {
                    Deflection::Bounce {
                        direction: outgoing,
                        intensity_scale,
                    } => {
                        intensity *= intensity_scale;
                        reflections_left -= 1;
                        remaining -= distance;
                        direction = outgoing;
                        start = end + direction * SURFACE_NUDGE;
                    }
                    Deflection::Fork(children) => {
                        for fork in &children {
                            let child = params.child(fork, end, remaining, reflections_left);
                            self.cast_beam(world, owner, child, combat);
                        }
                        break;
                    }
                    Deflection::Absorb => break,
                }
            } else {
                self.handle_impact(world, owner, hit.entity, intensity, end, combat);
                break;
            }
        }
    }

    /// Side effects of a beam ending on a non-mirror entity
    fn handle_impact(
        &mut self,
        world: &mut World,
        owner: EntityId,
        target: EntityId,
        intensity: f32,
        hit_point: Vec2,
        combat: &mut dyn CombatBridge,
    ) {
        let owner_kind = world.get(owner).map_or(EntityKind::Prop, |e| e.kind);

        if let Some(puzzle) = world.get_mut(target).and_then(|e| e.puzzle.as_mut())
            && puzzle::apply_light(puzzle, owner, owner_kind, intensity)
        {
            info!("beacon {:?} reactivated", target);
        }

        combat.apply_beam_hit(world, owner, target, intensity, hit_point);

        if let Some(entity) = world.get_mut(target) {
            if let Some(light) = entity.light.as_mut() {
                light.intensity =
                    (light.intensity + intensity * LIGHT_BOOST_SCALE).clamp(0.0, MAX_LIGHT_INTENSITY);
                light.reset_boost_timer();
            }
            if let Some(lantern) = entity.lantern.as_mut() {
                lantern.active = true;
                lantern.refuel(intensity);
            }
        }

        if self.debug_overlay {
            self.debug_hit_points.push(hit_point);
        }
    }

    /// Glow boost-and-decay for every lit entity, hit or not
    fn update_light_fields(&mut self, world: &mut World, dt: f32) {
        for entity in world.iter_mut() {
            let Some(light) = entity.light.as_mut() else {
                continue;
            };

            light.advance_boost_timer(dt);

            if light.intensity > light.base_intensity {
                if light.time_since_boost >= light.decay_delay {
                    light.intensity =
                        (light.intensity - light.decay_rate * dt).max(light.base_intensity);
                }
            } else if light.intensity < light.base_intensity {
                light.intensity = (light.intensity + light.decay_rate * RESTORE_RATE_SCALE * dt)
                    .min(light.base_intensity);
            }

            if let Some(sprite) = entity.sprite.as_mut() {
                let brightness = (self.ambient_light + light.intensity).clamp(0.0, 1.25);
                sprite.tint = Rgba::new(
                    (100.0 + brightness * 140.0).clamp(0.0, 255.0) as u8,
                    (100.0 + brightness * 120.0).clamp(0.0, 255.0) as u8,
                    (110.0 + brightness * 80.0).clamp(0.0, 255.0) as u8,
                    (brightness.clamp(0.0, 1.0) * 255.0) as u8,
                );
            }
        }
    }

    fn refresh_debug_bounds(&mut self, world: &World) {
        self.debug_mirror_bounds.clear();
        if !self.debug_overlay {
            return;
        }
        for entity in world.iter() {
            if let Some(bounds) = mirror_bounds(entity) {
                self.debug_mirror_bounds.push(bounds);
            }
        }
    }

    /// Draw glow halos, the darkness overlay, live beams, and debug data
    pub fn render(&self, target: &mut dyn DrawTarget, world: &World) {
        self.draw_light_glows(target, world);
        self.draw_overlay(target);
        self.draw_beams(target);
        if self.debug_overlay {
            self.draw_debug_data(target);
        }
    }

    fn draw_light_glows(&self, target: &mut dyn DrawTarget, world: &World) {
        for entity in world.iter() {
            let Some(light) = entity.light else {
                continue;
            };
            if !light.enabled {
                continue;
            }
            let Some(transform) = entity.transform else {
                continue;
            };

            let intensity = light.intensity.clamp(0.0, 2.0);
            let radius = (light.radius * 0.55).max(36.0);
            let alpha = (intensity * 80.0 + 20.0).clamp(25.0, 160.0) as u8;

            target.fill_circle(
                transform.position,
                radius,
                Rgba::new(255, 244, 214, alpha),
                BlendMode::Additive,
            );
        }
    }

    fn draw_overlay(&self, target: &mut dyn DrawTarget) {
        let alpha = ((1.0 - self.ambient_light).clamp(0.0, 1.0) * 220.0) as u8;
        let size = target.size();
        target.fill_rect(
            Vec2::ZERO,
            size,
            Rgba::new(5, 5, 15, alpha),
            BlendMode::Alpha,
        );
    }

    fn draw_beams(&self, target: &mut dyn DrawTarget) {
        for beam in &self.segments {
            let span = beam.end - beam.start;
            if span.length_squared() < 1e-8 {
                continue;
            }

            let half = normalize_or(perpendicular(span), Vec2::new(0.0, 1.0)) * (beam.width * 0.5);
            let fade = beam.life_ratio() * (beam.intensity / 50.0).clamp(0.2, 1.0);
            let color = beam.color.scale_alpha(fade);

            target.fill_quad(
                [
                    beam.start + half,
                    beam.start - half,
                    beam.end - half,
                    beam.end + half,
                ],
                color,
                BlendMode::Additive,
            );
        }
    }

    fn draw_debug_data(&self, target: &mut dyn DrawTarget) {
        for bounds in &self.debug_mirror_bounds {
            target.stroke_rect(bounds.min, bounds.size, Rgba::new(120, 200, 255, 140));
        }
        for point in &self.debug_hit_points {
            target.fill_circle(
                *point,
                3.0,
                Rgba::new(255, 220, 180, 220),
                BlendMode::Alpha,
            );
        }
    }
}

/// Nearest beam-blocking entity along the ray, excluding the owner.
/// Active mirrors use the exact plane test; everything else uses its box.
fn nearest_obstruction(
    world: &World,
    owner: EntityId,
    start: Vec2,
    direction: Vec2,
    max_distance: f32,
) -> Option<Obstruction> {
    let mut nearest: Option<Obstruction> = None;

    for candidate in world.iter() {
        if candidate.id == owner {
            continue;
        }

        // Active mirrors get the exact test; inactive ones fall through
        // and block as plain boxes like any other entity.
        if let Some(mirror) = &candidate.mirror
            && mirror.active
        {
            let Some(transform) = candidate.transform else {
                continue;
            };
            if let Some(hit) = ray_vs_mirror(
                start,
                direction,
                max_distance,
                transform.position,
                mirror.normal(),
                mirror.size,
            ) && nearest.as_ref().is_none_or(|n| hit.distance < n.distance)
            {
                nearest = Some(Obstruction {
                    entity: candidate.id,
                    distance: hit.distance,
                    mirror: true,
                });
            }
            continue;
        }

        let Some(bounds) = entity_bounds(candidate) else {
            continue;
        };
        if let Some(hit) = ray_vs_box(start, direction, max_distance, &bounds)
            && nearest.as_ref().is_none_or(|n| hit.distance < n.distance)
        {
            nearest = Some(Obstruction {
                entity: candidate.id,
                distance: hit.distance,
                mirror: false,
            });
        }
    }

    nearest
}

/// Occlusion box for an entity: mirror size, sprite size, or a default
/// box around a bare transform. All boxes center on the position.
fn entity_bounds(entity: &Entity) -> Option<Aabb> {
    let transform = entity.transform?;

    if let Some(mirror) = &entity.mirror
        && mirror.active
    {
        return Some(Aabb::from_center(transform.position, mirror.size));
    }
    if let Some(sprite) = entity.sprite {
        return Some(Aabb::from_center(transform.position, sprite.size));
    }
    Some(Aabb::from_center(
        transform.position,
        Vec2::splat(DEFAULT_BOUNDS),
    ))
}

fn mirror_bounds(entity: &Entity) -> Option<Aabb> {
    let transform = entity.transform?;
    let mirror = entity.mirror.as_ref()?;
    if !mirror.active {
        return None;
    }
    Some(Aabb::from_center(transform.position, mirror.size))
}
