use crate::config::ChainConfig;
use crate::ecs::World;
use crate::events::{ChainProgressEvent, EventBus, GameEvent};
use crate::sim::Sim;

/// Advance every active chain reaction. Stage 0 chains are left alone.
pub fn update(world: &mut World, bus: &mut EventBus<Sim>, config: &ChainConfig, dt: f32) {
    for (_, chain) in world.chains.iter_mut() {
        if chain.stage == 0 {
            continue;
        }
        chain.timer -= dt;
        if chain.timer <= 0.0 {
            chain.stage += 1;
            chain.timer = config.stage_interval;
            log::debug!("chain '{}' reached stage {}", chain.key, chain.stage);
            bus.emit(GameEvent::ChainProgress(ChainProgressEvent {
                key: chain.key.clone(),
                stage: chain.stage,
            }));
        }
    }
}
