//! Gloamfall entry point
//!
//! Headless demo: builds a small scripted chamber, runs the light engine
//! for a few seconds of simulated time, and reports what the beams did.

use glam::Vec2;

use gloamfall::Settings;
use gloamfall::combat::CombatSystem;
use gloamfall::light::{AimContext, LightEngine};
use gloamfall::render::RecordingTarget;
use gloamfall::tuning::{EmitterTuning, MirrorTuning, PuzzleTuning};
use gloamfall::world::components::{LightField, MirrorKind, Sprite, Transform, Vitals};
use gloamfall::world::{EntityKind, World};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEMO_FRAMES: u32 = 240;

fn main() {
    env_logger::init();
    log::info!("gloamfall demo chamber starting");

    let settings = Settings::default();
    let mut world = build_chamber();
    let mut engine = LightEngine::new();
    engine.set_ambient_light(settings.ambient_light);
    engine.set_debug_overlay(settings.debug_overlay);

    let mut combat = CombatSystem::new();
    // Hold the cursor on the angled mirror so the staff beam bends toward
    // the beacon below it
    let aim = AimContext {
        cursor: Some(Vec2::new(640.0, 360.0)),
    };

    for frame in 0..DEMO_FRAMES {
        engine.update(&mut world, FRAME_DT, &aim, &mut combat);
        if frame % 60 == 0 {
            log::info!(
                "t={:.1}s live segments: {}",
                frame as f32 * FRAME_DT,
                engine.segments().len()
            );
        }
    }

    let mut target = RecordingTarget::new(Vec2::new(1280.0, 720.0));
    engine.render(&mut target, &world);
    log::info!("final frame emitted {} draw commands", target.commands.len());

    for entity in world.iter() {
        if let Some(puzzle) = &entity.puzzle {
            log::info!(
                "beacon {:?}: solved={} received={:.1}",
                entity.id,
                puzzle.is_solved(),
                puzzle.received_light
            );
        }
        if let Some(vitals) = &entity.vitals {
            log::info!(
                "{:?} {:?}: {:.1}/{:.1} health",
                entity.kind,
                entity.id,
                vitals.health,
                vitals.max_health
            );
        }
    }
}

fn build_chamber() -> World {
    let mut world = World::new();

    // Player with the lantern staff, trigger held for the whole demo
    let player = world.spawn(EntityKind::Player);
    player.transform = Some(Transform::at(Vec2::new(200.0, 360.0)));
    player.sprite = Some(Sprite::new(Vec2::splat(28.0)));
    player.vitals = Some(Vitals::new(100.0));
    player.light = Some(LightField::default());
    let mut staff = EmitterTuning::lantern_staff().build();
    staff.trigger_held = true;
    player.emitter = Some(staff);

    // Angled mirror bending the staff beam straight down
    let mirror = world.spawn(EntityKind::Prop);
    mirror.transform = Some(Transform::at(Vec2::new(640.0, 360.0)));
    mirror.mirror = Some(
        MirrorTuning {
            length: 60.0,
            ..MirrorTuning::default()
        }
        .build(MirrorKind::Flat, Vec2::new(-1.0, 1.0)),
    );

    // Dormant beacon under the mirror
    let beacon = world.spawn(EntityKind::Beacon);
    beacon.transform = Some(Transform::at(Vec2::new(640.0, 560.0)));
    beacon.sprite = Some(Sprite::new(Vec2::splat(48.0)));
    beacon.light = Some(LightField {
        intensity: 0.2,
        base_intensity: 0.2,
        ..LightField::default()
    });
    beacon.puzzle = Some(
        PuzzleTuning {
            required_light: 5,
            ..PuzzleTuning::default()
        }
        .build(),
    );

    // A sentry close enough that its beams actually reach the player
    let sentry = world.spawn(EntityKind::Enemy);
    sentry.transform = Some(Transform::at(Vec2::new(440.0, 560.0)));
    sentry.sprite = Some(Sprite::new(Vec2::splat(36.0)));
    sentry.vitals = Some(Vitals::new(80.0).with_resistance(0.5));
    sentry.emitter = Some(EmitterTuning::sentry().build());

    world
}
