use crate::config::GameConfig;
use crate::ecs::components::{Interactable, PropCategory};
use crate::ecs::systems::planar_distance;
use crate::ecs::{Entity, World};
use crate::events::{BreakEvent, EventBus, GameEvent, InteractionEvent, SpillEvent};
use crate::hud::Hud;
use crate::sim::Sim;

/// Prompt text for an armed prop in range.
pub fn prompt_text(label: &str) -> String {
    format!("Press E to {label}")
}

/// Tick prop cooldowns, show the interaction prompt, consume interact presses.
///
/// When several armed props are in range, table order decides: the first one
/// takes the press and the last one's label is shown.
pub fn update(
    world: &mut World,
    bus: &mut EventBus<Sim>,
    hud: &mut Hud,
    config: &GameConfig,
    dt: f32,
) {
    let World {
        interactables,
        players,
        transforms,
        inputs,
        ..
    } = world;

    // Sole rearm path.
    for (entity, prop) in interactables.iter_mut() {
        prop.cooldown = (prop.cooldown - dt).max(0.0);
        if prop.cooldown <= 0.0 && !prop.armed {
            prop.armed = true;
            prop.broken = false;
            log::trace!("{} (entity {}) re-armed", prop.id, entity.id());
        }
    }

    let mut prompt = None;
    for player in players.entities() {
        let (Some(player_transform), Some(input)) = (transforms.get(player), inputs.get_mut(player))
        else {
            continue;
        };
        let player_pos = player_transform.position;

        for (target, prop) in interactables.iter_mut() {
            let Some(target_transform) = transforms.get(target) else {
                continue;
            };
            let reach = prop.radius + config.interaction.radius_slack;
            if planar_distance(player_pos, target_transform.position) > reach || !prop.armed {
                continue;
            }
            prompt = Some(prompt_text(&prop.label));
            if input.interact.take() {
                trigger(bus, config, player, target, prop);
            }
        }
    }

    match prompt {
        Some(text) => hud.show_prompt(text),
        None => hud.hide_prompt(),
    }
}

fn trigger(
    bus: &mut EventBus<Sim>,
    config: &GameConfig,
    actor: Entity,
    target: Entity,
    prop: &mut Interactable,
) {
    let category = config.categories.get(prop.category);
    prop.armed = false;
    prop.cooldown = config.interaction.reset_cooldown;
    prop.broken = true;
    log::debug!(
        "entity {} knocked over {} ({})",
        actor.id(),
        prop.id,
        prop.category.label()
    );

    bus.emit(GameEvent::Interaction(InteractionEvent {
        actor,
        target,
        id: prop.id.clone(),
        category: prop.category,
    }));
    bus.emit(GameEvent::Break(BreakEvent {
        actor,
        target,
        category: prop.category,
        score: category.break_score(),
        heat: category.heat_on_break,
        chain_key: prop.chain_key.clone(),
    }));
    if prop.category == PropCategory::Food {
        bus.emit(GameEvent::Spill(SpillEvent {
            source: target,
            category: PropCategory::Food,
        }));
    }
}
