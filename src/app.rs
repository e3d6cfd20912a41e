use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use glam::Vec3;
use instant::Instant;

use crate::config::GameConfig;
use crate::ecs::Entity;
use crate::input::Key;
use crate::session::Session;

/// How often to log frame stats (simulated seconds).
const STATS_LOG_INTERVAL: f64 = 5.0;
/// Below this projection onto a camera axis the autopilot lets go of that key.
const STEER_DEADZONE: f32 = 0.2;
/// Per-frame chance the autopilot hops.
const JUMP_CHANCE: f32 = 0.01;

/// Headless alley run driven by a scripted cat.
#[derive(Parser, Debug)]
#[command(name = "mischief")]
#[command(about = "Run the cat stealth simulation headless with a scripted player")]
struct Cli {
    /// TOML tuning file; built-in values when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames to run before giving up
    #[arg(long, default_value_t = 1800)]
    frames: u64,

    /// Seed for the autopilot's choices
    #[arg(long)]
    seed: Option<u64>,

    /// Pace frames at 60 Hz using wall-clock deltas
    #[arg(long)]
    realtime: bool,
}

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    step_count: u64,
    elapsed: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
    steps_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            step_count: 0,
            elapsed: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
            steps_since_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64, steps: u32, session: &Session) {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.step_count += steps as u64;
        self.steps_since_log += steps;
        self.elapsed += dt;
        self.frame_time_min = self.frame_time_min.min(dt);
        self.frame_time_max = self.frame_time_max.max(dt);

        if self.elapsed >= STATS_LOG_INTERVAL {
            let hud = session.hud();
            log::info!(
                "FPS: {:.0} | steps/s: {:.0} | min: {:.2}ms | max: {:.2}ms | score: {} | heat: {} | total frames: {}",
                self.frames_since_log as f64 / self.elapsed,
                self.steps_since_log as f64 / self.elapsed,
                self.frame_time_min * 1000.0,
                self.frame_time_max * 1000.0,
                hud.score,
                hud.heat_label,
                self.frame_count,
            );
            self.elapsed = 0.0;
            self.frame_time_min = f64::MAX;
            self.frame_time_max = 0.0;
            self.frames_since_log = 0;
            self.steps_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Autopilot
// ---------------------------------------------------------------------------

/// Scripted player: walks to props in a shuffled order and knocks them over.
struct Autopilot {
    rng: fastrand::Rng,
    route: Vec<Entity>,
    held: Vec<Key>,
    interact_held: bool,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            route: Vec::new(),
            held: Vec::new(),
            interact_held: false,
        }
    }

    /// Set this frame's keys on `session`'s keyboard.
    fn drive(&mut self, session: &mut Session) {
        let cat = session.scene().player;
        let world = &session.sim().world;
        let Some(position) = world.transforms.get(cat).map(|t| t.position) else {
            return;
        };

        // Next armed prop on the route; reshuffle once the route is spent.
        self.route
            .retain(|&prop| world.interactables.get(prop).is_some_and(|p| p.armed));
        if self.route.is_empty() {
            self.route = world
                .interactables
                .iter()
                .filter(|(_, prop)| prop.armed)
                .map(|(entity, _)| entity)
                .collect();
            self.rng.shuffle(&mut self.route);
        }
        let target = self
            .route
            .first()
            .and_then(|&prop| world.transforms.get(prop))
            .map(|t| t.position);
        let prompt = session.hud().prompt.is_some();
        let keys = match target {
            Some(target) => steer(position, target, session.camera_yaw()),
            None => Vec::new(),
        };
        let jump = self.rng.f32() < JUMP_CHANCE;

        let keyboard = session.keyboard_mut();
        for key in self.held.drain(..) {
            keyboard.key_up(key);
        }
        for &key in &keys {
            keyboard.key_down(key);
        }
        self.held = keys;

        // Tap E: down on one frame, up on the next.
        if self.interact_held {
            keyboard.key_up(Key::E);
            self.interact_held = false;
        } else if prompt {
            keyboard.key_down(Key::E);
            self.interact_held = true;
        }

        if jump {
            keyboard.key_down(Key::Space);
            keyboard.key_up(Key::Space);
        }
    }
}

/// Movement keys that push the cat from `from` toward `to` given the camera.
fn steer(from: Vec3, to: Vec3, camera_yaw: f32) -> Vec<Key> {
    let forward = Vec3::new(camera_yaw.sin(), 0.0, camera_yaw.cos());
    let right = Vec3::new(forward.z, 0.0, -forward.x);
    let dir = Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero();

    let mut keys = Vec::with_capacity(2);
    let across = dir.dot(right);
    if across > STEER_DEADZONE {
        keys.push(Key::D);
    } else if across < -STEER_DEADZONE {
        keys.push(Key::A);
    }
    let along = dir.dot(forward);
    if along > STEER_DEADZONE {
        keys.push(Key::S);
    } else if along < -STEER_DEADZONE {
        keys.push(Key::W);
    }
    keys
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let frame_delta = config.time.step;
    let seed = cli.seed.unwrap_or_else(|| fastrand::u64(..));
    log::info!(
        "Session starting: {} frames max, seed {}, {}",
        cli.frames,
        seed,
        if cli.realtime { "realtime" } else { "fixed deltas" }
    );

    let mut session = Session::new(config);
    let mut pilot = Autopilot::new(seed);
    let mut stats = FrameStats::new();
    let mut last_frame_time = Instant::now();

    for _ in 0..cli.frames {
        if !session.is_running() {
            break;
        }
        let delta = if cli.realtime {
            let now = Instant::now();
            let delta = now.duration_since(last_frame_time).as_secs_f64();
            last_frame_time = now;
            delta
        } else {
            frame_delta
        };

        pilot.drive(&mut session);
        let steps = session.frame(delta);
        stats.record_frame(delta, steps, &session);

        if cli.realtime {
            std::thread::sleep(Duration::from_secs_f64(frame_delta));
        }
    }

    match session.summary() {
        Some(summary) => log::info!(
            "Final score {} | best combo {} | peak heat {:.0}",
            summary.score,
            summary.max_combo,
            summary.peak_heat
        ),
        None => log::info!(
            "Frame budget spent after {} steps | score {} | heat {}",
            session.tick_count(),
            session.hud().score,
            session.hud().heat_label
        ),
    }
    session.dispose();
    Ok(())
}
