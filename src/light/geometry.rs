//! Ray intersection primitives
//!
//! The beam caster needs distance-to-hit and a surface normal, which the
//! movement layer's overlap tests cannot provide. Boxes use a marching
//! sampler; mirrors use an exact ray/plane intersection clipped to the
//! finite segment.

use glam::Vec2;

use crate::consts::RAY_MARCH_STEP;
use crate::{normalize_or, perpendicular};

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.min.x + self.size.x
            && point.y >= self.min.y
            && point.y <= self.min.y + self.size.y
    }
}

/// First obstruction along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub normal: Vec2,
}

/// March the ray in fixed steps until a sample lands inside the box.
///
/// Approximate on purpose: the step is small relative to the minimum
/// entity size, and the normal is inferred from the nearest box edge at
/// the contained sample. Thin geometry hit at shallow angles can tunnel.
pub fn ray_vs_box(origin: Vec2, direction: Vec2, max_distance: f32, bounds: &Aabb) -> Option<RayHit> {
    let direction = normalize_or(direction, Vec2::new(1.0, 0.0));
    let mut sample = origin;
    let mut travelled = 0.0;

    while travelled <= max_distance {
        if bounds.contains(sample) {
            return Some(RayHit {
                distance: travelled,
                normal: edge_normal(bounds, sample),
            });
        }
        travelled += RAY_MARCH_STEP;
        sample += direction * RAY_MARCH_STEP;
    }

    None
}

fn edge_normal(bounds: &Aabb, point: Vec2) -> Vec2 {
    let left = (point.x - bounds.min.x).abs();
    let right = (bounds.max().x - point.x).abs();
    let top = (point.y - bounds.min.y).abs();
    let bottom = (bounds.max().y - point.y).abs();
    let nearest = left.min(right).min(top.min(bottom));

    if nearest == left {
        Vec2::new(-1.0, 0.0)
    } else if nearest == right {
        Vec2::new(1.0, 0.0)
    } else if nearest == top {
        Vec2::new(0.0, -1.0)
    } else {
        Vec2::new(0.0, 1.0)
    }
}

/// Exact intersection against a finite mirror segment.
///
/// The mirror is the plane through `center` with the given normal,
/// clipped to half its length along the tangent and half its thickness
/// along the normal. Returns the mirror's own normal on hit.
pub fn ray_vs_mirror(
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    center: Vec2,
    normal: Vec2,
    size: Vec2,
) -> Option<RayHit> {
    const EPSILON: f32 = 1e-4;
    // Rays starting on the surface (prism children) pass through rather
    // than re-hitting at distance zero
    const CONTACT_EPS: f32 = 1e-3;

    let normal = normalize_or(normal, Vec2::new(0.0, -1.0));
    let denom = direction.dot(normal);
    if denom.abs() <= EPSILON {
        return None;
    }

    let distance = (center - origin).dot(normal) / denom;
    if distance < CONTACT_EPS || distance > max_distance {
        return None;
    }

    let hit_point = origin + direction * distance;
    let tangent = normalize_or(perpendicular(normal), Vec2::new(1.0, 0.0));
    let half_length = (size.x * 0.5).max(4.0);
    let half_thickness = (size.y * 0.5).max(2.0);

    if (hit_point - center).dot(tangent).abs() > half_length {
        return None;
    }
    if (hit_point - center).dot(normal).abs() > half_thickness {
        return None;
    }

    Some(RayHit { distance, normal })
}

/// Mirror reflection: d - 2(d.n)n
#[inline]
pub fn reflect(direction: Vec2, normal: Vec2) -> Vec2 {
    let n = normalize_or(normal, Vec2::new(0.0, -1.0));
    normalize_or(direction - 2.0 * direction.dot(n) * n, Vec2::new(1.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_vs_box_head_on() {
        let bounds = Aabb::from_center(Vec2::new(100.0, 0.0), Vec2::new(32.0, 32.0));
        let hit = ray_vs_box(Vec2::ZERO, Vec2::new(1.0, 0.0), 300.0, &bounds)
            .expect("should hit the box");

        // March lands on the first sample inside [84, 116]
        assert!(hit.distance >= 84.0 && hit.distance <= 96.0);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_ray_vs_box_out_of_range() {
        let bounds = Aabb::from_center(Vec2::new(500.0, 0.0), Vec2::new(32.0, 32.0));
        assert!(ray_vs_box(Vec2::ZERO, Vec2::new(1.0, 0.0), 100.0, &bounds).is_none());
    }

    #[test]
    fn test_ray_vs_box_wrong_direction() {
        let bounds = Aabb::from_center(Vec2::new(100.0, 0.0), Vec2::new(32.0, 32.0));
        assert!(ray_vs_box(Vec2::ZERO, Vec2::new(-1.0, 0.0), 300.0, &bounds).is_none());
    }

    #[test]
    fn test_ray_vs_mirror_exact_distance() {
        let hit = ray_vs_mirror(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            640.0,
            Vec2::new(300.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(50.0, 12.0),
        )
        .expect("should hit the mirror plane");

        assert!((hit.distance - 300.0).abs() < 1e-3);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_ray_vs_mirror_misses_past_half_length() {
        // Mirror tangent is vertical; a ray passing 40 units above center
        // falls outside the 25-unit half-length.
        let hit = ray_vs_mirror(
            Vec2::new(0.0, 40.0),
            Vec2::new(1.0, 0.0),
            640.0,
            Vec2::new(300.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(50.0, 12.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_vs_mirror_parallel_ray() {
        let hit = ray_vs_mirror(
            Vec2::ZERO,
            Vec2::new(0.0, 1.0),
            640.0,
            Vec2::new(300.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(50.0, 12.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_reflect_normal_incidence() {
        let out = reflect(Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0));
        assert!((out - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_reflect_grazing_45_degrees() {
        let incoming = Vec2::new(1.0, 1.0).normalize();
        let out = reflect(incoming, Vec2::new(0.0, -1.0));
        let expected = Vec2::new(1.0, -1.0).normalize();
        assert!((out - expected).length() < 1e-5);
    }
}
