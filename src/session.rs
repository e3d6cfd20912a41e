use std::f32::consts::PI;

use crate::config::GameConfig;
use crate::ecs::systems;
use crate::events::EventBus;
use crate::hud::Hud;
use crate::input::KeyboardInput;
use crate::scene::{self, SceneEntities};
use crate::sim::{RunSummary, Sim};
use crate::time::FixedTime;

/// Camera heading the session starts with.
pub const INITIAL_CAMERA_YAW: f32 = PI * 0.8;

/// One play session: the simulation, its event bus and the frame driver.
pub struct Session {
    sim: Sim,
    bus: EventBus<Sim>,
    time: FixedTime,
    keyboard: KeyboardInput,
    camera_yaw: f32,
    scene: SceneEntities,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let time = FixedTime::with_max_steps(config.time.step, config.time.max_steps_per_frame);
        let mut sim = Sim::new(config);
        let mut bus = EventBus::new();
        Sim::subscribe(&mut bus);
        let scene = scene::build_environment(&mut sim);

        Self {
            sim,
            bus,
            time,
            keyboard: KeyboardInput::new(),
            camera_yaw: INITIAL_CAMERA_YAW,
            scene,
        }
    }

    /// Feed one rendered frame of `delta` seconds. Returns the number of
    /// simulation steps that ran; zero once the run has ended.
    pub fn frame(&mut self, delta: f64) -> u32 {
        if !self.sim.is_running() {
            return 0;
        }
        systems::input::apply(&mut self.sim.world, &mut self.keyboard);

        let Self {
            sim,
            bus,
            time,
            camera_yaw,
            ..
        } = self;
        time.advance(delta, |dt| systems::tick(sim, bus, *camera_yaw, dt))
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardInput {
        &mut self.keyboard
    }

    pub fn sim(&self) -> &Sim {
        &self.sim
    }

    pub fn scene(&self) -> SceneEntities {
        self.scene
    }

    pub fn hud(&self) -> &Hud {
        &self.sim.hud
    }

    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }

    pub fn summary(&self) -> Option<RunSummary> {
        self.sim.summary()
    }

    pub fn camera_yaw(&self) -> f32 {
        self.camera_yaw
    }

    pub fn set_camera_yaw(&mut self, yaw: f32) {
        self.camera_yaw = yaw;
    }

    pub fn tick_count(&self) -> u64 {
        self.time.tick_count()
    }

    /// Drop accumulated time, e.g. after a pause.
    pub fn reset_time(&mut self) {
        self.time.reset();
    }

    /// Tear down: drop every listener and queued event.
    pub fn dispose(&mut self) {
        self.bus.clear();
        log::debug!("session disposed after {} ticks", self.time.tick_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::input::Key;
    use glam::Vec3;

    const FRAME: f64 = 1.0 / 60.0;

    fn walk_to(session: &mut Session, target: Vec3) {
        let cat = session.scene().player;
        if let Some(t) = session.sim.world.transforms.get_mut(cat) {
            t.position = target;
        }
    }

    #[test]
    fn starts_running_with_listeners() {
        let session = Session::new(GameConfig::default());
        assert!(session.is_running());
        assert!(session.bus.listener_count(EventKind::Break) >= 3);
        assert_eq!(session.camera_yaw(), INITIAL_CAMERA_YAW);
    }

    #[test]
    fn stall_is_capped_at_max_steps() {
        let mut config = GameConfig::default();
        config.time.step = 0.125;
        let mut session = Session::new(config);
        assert_eq!(session.frame(10.0), session.sim.config.time.max_steps_per_frame);
        assert_eq!(session.frame(-1.0), 0);
    }

    #[test]
    fn cat_settles_on_the_ground() {
        let mut session = Session::new(GameConfig::default());
        for _ in 0..120 {
            session.frame(FRAME);
        }
        let cat = session.scene().player;
        assert!(session.sim().world.bodies.get(cat).unwrap().on_ground);
    }

    #[test]
    fn pressing_e_at_the_crates_scores() {
        let mut session = Session::new(GameConfig::default());
        walk_to(&mut session, Vec3::new(2.0, 0.25, -0.8));
        session.frame(FRAME);
        assert_eq!(session.hud().prompt.as_deref(), Some("Press E to Push Crates"));

        session.keyboard_mut().key_down(Key::E);
        session.frame(FRAME);
        session.keyboard_mut().key_up(Key::E);

        assert!(session.hud().score > 0);
        assert_eq!(session.hud().combo, 1);
    }

    #[test]
    fn held_key_only_interacts_once() {
        let mut session = Session::new(GameConfig::default());
        walk_to(&mut session, Vec3::new(4.0, 0.25, 0.6));
        session.keyboard_mut().key_down(Key::E);
        for _ in 0..10 {
            session.frame(FRAME);
        }
        assert_eq!(session.hud().combo, 1);
    }

    #[test]
    fn frames_do_nothing_after_run_end() {
        let mut session = Session::new(GameConfig::default());
        let Session { sim, bus, .. } = &mut session;
        sim.finish_run(bus);
        let ticks = session.tick_count();
        assert_eq!(session.frame(1.0), 0);
        assert_eq!(session.tick_count(), ticks);
        assert!(session.summary().is_some());
    }

    #[test]
    fn dispose_drops_listeners() {
        let mut session = Session::new(GameConfig::default());
        session.dispose();
        assert_eq!(session.bus.listener_count(EventKind::Break), 0);
    }
}
