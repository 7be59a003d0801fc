//! Mirror response model
//!
//! Pure mapping from (incoming direction, mirror, remaining budget) to the
//! outgoing rays and their attenuation. The caster owns the propagation
//! loop; this module only decides what leaves the surface.

use glam::Vec2;

use crate::world::components::{Mirror, MirrorKind};
use crate::{normalize_or, perpendicular, rotate_deg};

use super::geometry::reflect;

/// Splitter children travel along the surface tangent
pub const SPLITTER_RANGE_SCALE: f32 = 0.65;
pub const SPLITTER_WIDTH_SCALE: f32 = 0.7;
pub const SPLITTER_INTENSITY_SCALE: f32 = 0.6;
pub const SPLITTER_TTL_SCALE: f32 = 0.85;

/// Prism children fan out from the incoming direction
pub const PRISM_ANGLE_DEG: f32 = 35.0;
pub const PRISM_RANGE_SCALE: f32 = 0.55;
pub const PRISM_WIDTH_SCALE: f32 = 0.6;
pub const PRISM_INTENSITY_SCALE: f32 = 0.5;
pub const PRISM_TTL_SCALE: f32 = 0.75;

/// Reflection loss never eats the whole beam
const MAX_REFLECTION_LOSS: f32 = 0.9;

/// A forked child beam, expressed as scales on the parent cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForkChild {
    pub direction: Vec2,
    /// Offset along `direction` from the hit point, to clear the surface
    pub origin_nudge: f32,
    /// Applied to the parent's remaining range
    pub range_scale: f32,
    /// Applied to the cast's entry width
    pub width_scale: f32,
    /// Applied to the cast's entry intensity
    pub intensity_scale: f32,
    /// Applied to the cast's entry ttl
    pub ttl_scale: f32,
}

/// What happens to a beam at a mirror surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deflection {
    /// Same beam continues along a new direction
    Bounce {
        direction: Vec2,
        intensity_scale: f32,
    },
    /// Parent terminates; two children spawn
    Fork([ForkChild; 2]),
    /// Beam ends at the surface
    Absorb,
}

/// Resolve a mirror hit. A spent reflection budget absorbs every kind.
pub fn deflect(mirror: &Mirror, incoming: Vec2, reflections_left: u32) -> Deflection {
    if reflections_left == 0 {
        return Deflection::Absorb;
    }

    let normal = mirror.normal();
    match mirror.kind {
        MirrorKind::Flat => {
            let loss = mirror.reflection_loss.clamp(0.0, MAX_REFLECTION_LOSS);
            Deflection::Bounce {
                direction: reflect(incoming, normal),
                intensity_scale: 1.0 - loss,
            }
        }
        MirrorKind::Splitter => {
            let tangent = normalize_or(perpendicular(normal), Vec2::new(1.0, 0.0));
            Deflection::Fork([
                splitter_child(tangent),
                splitter_child(-tangent),
            ])
        }
        MirrorKind::Prism => Deflection::Fork([
            prism_child(incoming, PRISM_ANGLE_DEG),
            prism_child(incoming, -PRISM_ANGLE_DEG),
        ]),
    }
}

fn splitter_child(direction: Vec2) -> ForkChild {
    ForkChild {
        direction,
        origin_nudge: crate::consts::SURFACE_NUDGE,
        range_scale: SPLITTER_RANGE_SCALE,
        width_scale: SPLITTER_WIDTH_SCALE,
        intensity_scale: SPLITTER_INTENSITY_SCALE,
        ttl_scale: SPLITTER_TTL_SCALE,
    }
}

fn prism_child(incoming: Vec2, angle_deg: f32) -> ForkChild {
    ForkChild {
        direction: normalize_or(rotate_deg(incoming, angle_deg), incoming),
        origin_nudge: 0.0,
        range_scale: PRISM_RANGE_SCALE,
        width_scale: PRISM_WIDTH_SCALE,
        intensity_scale: PRISM_INTENSITY_SCALE,
        ttl_scale: PRISM_TTL_SCALE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_reverses_normal_incidence() {
        let mirror = Mirror::new(MirrorKind::Flat, Vec2::new(0.0, -1.0));
        match deflect(&mirror, Vec2::new(0.0, 1.0), 3) {
            Deflection::Bounce {
                direction,
                intensity_scale,
            } => {
                assert!((direction - Vec2::new(0.0, -1.0)).length() < 1e-5);
                assert!((intensity_scale - 0.9).abs() < 1e-5);
            }
            other => panic!("expected bounce, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_loss_clamped() {
        let mut mirror = Mirror::new(MirrorKind::Flat, Vec2::new(0.0, -1.0));
        mirror.reflection_loss = 5.0;
        match deflect(&mirror, Vec2::new(0.0, 1.0), 1) {
            Deflection::Bounce {
                intensity_scale, ..
            } => assert!((intensity_scale - 0.1).abs() < 1e-5),
            other => panic!("expected bounce, got {other:?}"),
        }
    }

    #[test]
    fn test_splitter_forks_along_tangents() {
        let mirror = Mirror::new(MirrorKind::Splitter, Vec2::new(-1.0, 0.0));
        match deflect(&mirror, Vec2::new(1.0, 0.0), 2) {
            Deflection::Fork(children) => {
                let tangent = Vec2::new(0.0, -1.0);
                assert!((children[0].direction - tangent).length() < 1e-5);
                assert!((children[1].direction + tangent).length() < 1e-5);
                for child in &children {
                    assert_eq!(child.intensity_scale, SPLITTER_INTENSITY_SCALE);
                    assert_eq!(child.range_scale, SPLITTER_RANGE_SCALE);
                    assert!(child.origin_nudge > 0.0);
                }
            }
            other => panic!("expected fork, got {other:?}"),
        }
    }

    #[test]
    fn test_prism_fans_from_incoming() {
        let incoming = Vec2::new(1.0, 0.0);
        let mirror = Mirror::new(MirrorKind::Prism, Vec2::new(-1.0, 0.0));
        match deflect(&mirror, incoming, 2) {
            Deflection::Fork(children) => {
                for child in &children {
                    let angle = child.direction.dot(incoming).clamp(-1.0, 1.0).acos();
                    assert!((angle.to_degrees() - PRISM_ANGLE_DEG).abs() < 0.01);
                    assert_eq!(child.origin_nudge, 0.0);
                }
                // One child each side of the incoming direction
                assert!(children[0].direction.y * children[1].direction.y < 0.0);
            }
            other => panic!("expected fork, got {other:?}"),
        }
    }

    #[test]
    fn test_spent_budget_absorbs_every_kind() {
        for kind in [MirrorKind::Flat, MirrorKind::Splitter, MirrorKind::Prism] {
            let mirror = Mirror::new(kind, Vec2::new(0.0, -1.0));
            assert_eq!(deflect(&mirror, Vec2::new(0.0, 1.0), 0), Deflection::Absorb);
        }
    }
}
