//! Light propagation
//!
//! Beams, mirrors, glow decay, and light-fed puzzles. The engine is
//! frame-synchronous and never spawns or removes entities; it only reads
//! and mutates component state through the world it is handed.

pub mod beam;
pub mod engine;
pub mod geometry;
pub mod puzzle;
pub mod reflector;

pub use beam::{BeamParams, BeamSegment};
pub use engine::{AimContext, LightEngine};
pub use geometry::{Aabb, RayHit, ray_vs_box, ray_vs_mirror, reflect};
pub use reflector::{Deflection, ForkChild, deflect};
