use glam::Vec3;

use crate::config::HeatConfig;
use crate::ecs::components::{HeatTracker, Transform, TriggerVolume};
use crate::ecs::systems::planar_distance;
use crate::ecs::{Table, World};
use crate::events::{BreakEvent, EventBus, EventKind, GameEvent, HeatChangedEvent, HideEvent};
use crate::hud::Hud;
use crate::sim::Sim;

/// Suspicion meters: decay, hide spots, break spikes and the run's peak heat.
#[derive(Debug, Default)]
pub struct HeatSystem {
    peak_heat: f32,
}

impl HeatSystem {
    pub fn subscribe(bus: &mut EventBus<Sim>) {
        bus.on(EventKind::Break, |event, sim, bus| {
            if let GameEvent::Break(b) = event {
                sim.heat.on_break(&mut sim.world, &sim.config.heat, bus, b);
            }
        });
    }

    /// Highest heat seen on any tracker this run.
    pub fn peak_heat(&self) -> f32 {
        self.peak_heat
    }

    pub fn update(
        &mut self,
        world: &mut World,
        config: &HeatConfig,
        hud: &mut Hud,
        bus: &mut EventBus<Sim>,
        dt: f32,
    ) {
        let World {
            heat,
            transforms,
            triggers,
            ..
        } = world;

        for (entity, tracker) in heat.iter_mut() {
            let Some(position) = transforms.get(entity).map(|t| t.position) else {
                continue;
            };

            let hidden = inside_hide_volume(triggers, transforms, position);
            if hidden != tracker.hidden {
                tracker.hidden = hidden;
                log::debug!(
                    "entity {} {} hiding",
                    entity.id(),
                    if hidden { "started" } else { "stopped" }
                );
                bus.emit(GameEvent::Hide(HideEvent {
                    entity,
                    entering: hidden,
                }));
            }

            let modifier = if hidden {
                config.hide_decay_multiplier
            } else {
                alert_modifier(config, tracker.value)
            };
            tracker.value =
                (tracker.value - config.decay_per_second * modifier * dt).clamp(0.0, config.max_heat);
            tracker.alert_modifier = alert_modifier(config, tracker.value);

            self.peak_heat = self.peak_heat.max(tracker.value);
            hud.set_heat(tracker.value / config.max_heat, config.label(tracker.value));
            bus.emit(GameEvent::HeatChanged(HeatChangedEvent {
                entity,
                value: tracker.value,
            }));
        }
    }

    /// Spike the actor's heat. The alert modifier follows immediately and the
    /// spiked value is announced before the next decay can shave it.
    pub fn on_break(
        &mut self,
        world: &mut World,
        config: &HeatConfig,
        bus: &mut EventBus<Sim>,
        event: &BreakEvent,
    ) {
        let Some(tracker) = world.heat.get_mut(event.actor) else {
            return;
        };
        raise(tracker, config, event.heat);
        self.peak_heat = self.peak_heat.max(tracker.value);
        log::debug!(
            "heat {:.1} ({}) after breaking a {} prop",
            tracker.value,
            config.label(tracker.value),
            event.category.label()
        );
        bus.emit(GameEvent::HeatChanged(HeatChangedEvent {
            entity: event.actor,
            value: tracker.value,
        }));
    }
}

fn raise(tracker: &mut HeatTracker, config: &HeatConfig, amount: f32) {
    tracker.value = (tracker.value + amount).clamp(0.0, config.max_heat);
    tracker.alert_modifier = alert_modifier(config, tracker.value);
}

fn alert_modifier(config: &HeatConfig, value: f32) -> f32 {
    if value >= config.alert_threshold() {
        config.alert_decay_multiplier
    } else {
        1.0
    }
}

/// Whether `position` lies inside any hide volume in `world`.
pub fn is_hidden(world: &World, position: Vec3) -> bool {
    inside_hide_volume(&world.triggers, &world.transforms, position)
}

fn inside_hide_volume(
    triggers: &Table<TriggerVolume>,
    transforms: &Table<Transform>,
    position: Vec3,
) -> bool {
    triggers.iter().any(|(volume, trigger)| {
        trigger.hide_spot
            && transforms
                .get(volume)
                .is_some_and(|t| planar_distance(position, t.position) <= trigger.radius)
    })
}
