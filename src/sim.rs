//! Shared simulation context: the world plus per-system state that outlives a
//! tick, and the running/ended lifecycle of one play session.

use crate::config::GameConfig;
use crate::ecs::systems::ai::AiSystem;
use crate::ecs::systems::heat::HeatSystem;
use crate::ecs::systems::score::ScoreSystem;
use crate::ecs::{Entity, World};
use crate::events::{EventBus, EventKind, GameEvent};
use crate::hud::Hud;

/// End-of-run numbers, also carried by the `RunEnded` event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub score: u64,
    pub max_combo: u32,
    pub peak_heat: f32,
}

pub struct Sim {
    pub world: World,
    pub config: GameConfig,
    pub hud: Hud,
    pub ai: AiSystem,
    pub heat: HeatSystem,
    pub score: ScoreSystem,
    /// Entity whose score goes into the run summary.
    pub player: Option<Entity>,
    running: bool,
    summary: Option<RunSummary>,
}

impl Sim {
    pub fn new(config: GameConfig) -> Self {
        Self {
            world: World::new(),
            config,
            hud: Hud::new(),
            ai: AiSystem::default(),
            heat: HeatSystem::default(),
            score: ScoreSystem::default(),
            player: None,
            running: true,
            summary: None,
        }
    }

    /// Register every system's listeners, then the run-end triggers.
    pub fn subscribe(bus: &mut EventBus<Sim>) {
        ScoreSystem::subscribe(bus);
        HeatSystem::subscribe(bus);
        AiSystem::subscribe(bus);

        bus.on(EventKind::ChainProgress, |event, sim, bus| {
            let GameEvent::ChainProgress(progress) = event else {
                return;
            };
            let chain = &sim.config.chain;
            if progress.key == chain.cascade_key && progress.stage >= chain.end_run_stage {
                sim.finish_run(bus);
            }
        });
        bus.on(EventKind::HeatChanged, |event, sim, bus| {
            let GameEvent::HeatChanged(changed) = event else {
                return;
            };
            if changed.value >= sim.config.heat.max_heat {
                sim.finish_run(bus);
            }
        });
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    /// Current score of the player entity, 0 if there is none.
    pub fn player_score(&self) -> u64 {
        self.player
            .and_then(|player| self.world.scores.get(player))
            .map_or(0, |tracker| tracker.score)
    }

    /// End the run once: freeze the summary, flag the world, announce it.
    pub fn finish_run(&mut self, bus: &mut EventBus<Sim>) {
        if !self.running {
            return;
        }
        self.running = false;

        let summary = RunSummary {
            score: self.player_score(),
            max_combo: self.score.max_combo(),
            peak_heat: self.heat.peak_heat(),
        };
        log::info!(
            "Run ended - score: {} | max combo: {} | peak heat: {:.0} | chain complete: {}",
            summary.score,
            summary.max_combo,
            summary.peak_heat,
            self.score.chain_complete(),
        );

        for (_, state) in self.world.world_state.iter_mut() {
            state.end_run = true;
        }
        self.summary = Some(summary);
        self.hud.show_summary(summary);
        bus.emit(GameEvent::RunEnded(summary));
        bus.flush(self);
    }
}
