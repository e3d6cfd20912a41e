use crate::config::{GameConfig, ScoringConfig};
use crate::ecs::World;
use crate::events::{BreakEvent, ChainProgressEvent, ComboTickEvent, EventBus, EventKind, GameEvent};
use crate::hud::Hud;
use crate::sim::Sim;

/// Combo window, tiered multipliers and the run-wide score summary.
#[derive(Debug, Default)]
pub struct ScoreSystem {
    max_combo: u32,
    chain_complete: bool,
}

impl ScoreSystem {
    pub fn subscribe(bus: &mut EventBus<Sim>) {
        bus.on(EventKind::Break, |event, sim, bus| {
            if let GameEvent::Break(b) = event {
                sim.score.on_break(&mut sim.world, &sim.config, bus, b);
            }
        });
        bus.on(EventKind::ChainProgress, |event, sim, _| {
            if let GameEvent::ChainProgress(progress) = event {
                sim.score.on_chain(&sim.config, progress);
            }
        });
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Whether the cascade chain reached its completion stage this run.
    pub fn chain_complete(&self) -> bool {
        self.chain_complete
    }

    /// Run down combo windows and push score/combo to the HUD.
    pub fn update(&mut self, world: &mut World, config: &ScoringConfig, hud: &mut Hud, dt: f32) {
        for (_, tracker) in world.scores.iter_mut() {
            if tracker.combo > 0 {
                tracker.combo_timer = (tracker.combo_timer - dt * config.combo_decay).max(0.0);
                if tracker.combo_timer <= 0.0 {
                    log::trace!("combo of {} expired", tracker.combo);
                    tracker.combo = 0;
                }
            }
            tracker.best = tracker.best.max(tracker.score);

            let progress = tracker.combo_timer / config.base_combo_window;
            hud.set_score(tracker.score, tracker.best);
            hud.set_combo(tracker.combo, progress, config.multiplier(tracker.combo));
        }
    }

    /// Extend the actor's combo and bank the break's score. A keyed break
    /// also kicks the cascade chain.
    pub fn on_break(
        &mut self,
        world: &mut World,
        config: &GameConfig,
        bus: &mut EventBus<Sim>,
        event: &BreakEvent,
    ) {
        let Some(tracker) = world.scores.get_mut(event.actor) else {
            return;
        };
        let scoring = &config.scoring;
        tracker.combo += 1;
        tracker.combo_timer = scoring.base_combo_window;
        let multiplier = scoring.multiplier(tracker.combo);
        tracker.score += (event.score as f32 * multiplier).round() as u64;
        tracker.best = tracker.best.max(tracker.score);
        self.max_combo = self.max_combo.max(tracker.combo);
        log::debug!(
            "+{} x{multiplier} (combo {}, score {})",
            event.score,
            tracker.combo,
            tracker.score
        );
        bus.emit(GameEvent::ComboTick(ComboTickEvent {
            entity: event.actor,
            combo: tracker.combo,
            multiplier,
        }));

        if event.chain_key.is_some() {
            let chain = &config.chain;
            for (_, reaction) in world.chains.iter_mut() {
                if reaction.key == chain.cascade_key {
                    reaction.timer = chain.kick_timer;
                    reaction.stage = reaction.stage.max(1);
                }
            }
        }
    }

    pub fn on_chain(&mut self, config: &GameConfig, event: &ChainProgressEvent) {
        let chain = &config.chain;
        if event.key == chain.cascade_key && event.stage >= chain.complete_stage {
            self.chain_complete = true;
        }
    }
}
