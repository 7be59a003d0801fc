//! Puzzle light accumulation
//!
//! Beam hits feed beacon puzzles. Two completion rules coexist and are
//! chosen per puzzle: an accumulated-intensity threshold, and a distinct
//! contributing-emitter count. Solving is monotonic either way.

use crate::world::components::{CompletionRule, Puzzle, SourcePolicy};
use crate::world::{EntityId, EntityKind};

/// Fraction of a hit's intensity credited as received light
pub const RECEIVED_LIGHT_SCALE: f32 = 0.1;

/// Whether a puzzle accepts light from this emitter
pub fn accepts_source(puzzle: &Puzzle, source_kind: EntityKind) -> bool {
    match puzzle.source_policy {
        SourcePolicy::Any => true,
        SourcePolicy::PlayerOnly => source_kind == EntityKind::Player,
        SourcePolicy::BeaconOnly => source_kind == EntityKind::Beacon,
    }
}

/// Credit one beam hit. Returns true when this hit solved the puzzle.
pub fn apply_light(
    puzzle: &mut Puzzle,
    source: EntityId,
    source_kind: EntityKind,
    intensity: f32,
) -> bool {
    if puzzle.is_solved() || !accepts_source(puzzle, source_kind) {
        return false;
    }

    puzzle.received_light += intensity * RECEIVED_LIGHT_SCALE;
    puzzle.record_source(source);

    let complete = match puzzle.completion {
        CompletionRule::AccumulatedIntensity => {
            puzzle.received_light >= puzzle.required_light as f32
        }
        CompletionRule::UniqueSources => puzzle.has_required_unique_sources(),
    };

    if complete {
        puzzle.mark_solved();
    }
    complete
}
