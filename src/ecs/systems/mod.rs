pub mod ai;
pub mod chain;
pub mod heat;
pub mod input;
pub mod interaction;
pub mod movement;
pub mod player;
pub mod score;

use glam::{Vec2, Vec3};

use crate::events::EventBus;
use crate::sim::Sim;

/// Run all simulation systems for one fixed tick.
///
/// Events emitted before the first flush (break, spill, landed) reach heat,
/// score and chain in this same tick; anything those emit is delivered by the
/// second flush.
pub fn tick(sim: &mut Sim, bus: &mut EventBus<Sim>, camera_yaw: f32, dt: f32) {
    if !sim.is_running() {
        return;
    }

    // 1. Intent -> velocity, jump, heading
    player::update(&mut sim.world, dt, camera_yaw);

    // 2. Integrate + ground collision
    movement::integrate(&mut sim.world, bus, dt);

    // 3. Cooldowns, prompt, interact presses
    interaction::update(&mut sim.world, bus, &mut sim.hud, &sim.config, dt);

    // 4. Human / dog / pigeon state machines
    sim.ai.update(&mut sim.world, &sim.config.ai, dt);

    bus.flush(sim);

    // 5. Heat decay + hide detection
    sim.heat.update(&mut sim.world, &sim.config.heat, &mut sim.hud, bus, dt);

    // 6. Combo window
    sim.score.update(&mut sim.world, &sim.config.scoring, &mut sim.hud, dt);

    // 7. Staged chain timers
    chain::update(&mut sim.world, bus, &sim.config.chain, dt);

    bus.flush(sim);
}

/// Distance on the ground plane, ignoring height.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Heading (radians around +Y) that faces along `dir`.
pub fn heading(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}
