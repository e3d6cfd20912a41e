use glam::Vec3;

use crate::config::AiConfig;
use crate::ecs::components::{DogState, HumanState};
use crate::ecs::systems::{heading, planar_distance};
use crate::ecs::World;
use crate::events::{BreakEvent, EventBus, EventKind, GameEvent};
use crate::sim::Sim;

/// Beyond this distance an investigating human turns toward the noise.
const FACE_NOISE_EPSILON: f32 = 0.1;

/// Human, dog and pigeon behaviour.
///
/// Humans re-derive their state from the player's heat every tick; breaks and
/// spills reach every actor regardless of distance.
#[derive(Debug, Default)]
pub struct AiSystem {
    last_noise: Vec3,
}

impl AiSystem {
    pub fn subscribe(bus: &mut EventBus<Sim>) {
        bus.on(EventKind::Break, |event, sim, _| {
            if let GameEvent::Break(b) = event {
                sim.ai.on_break(&mut sim.world, &sim.config.ai, b);
            }
        });
        bus.on(EventKind::Spill, |_, sim, _| {
            sim.ai.on_spill(&mut sim.world, &sim.config.ai);
        });
    }

    /// Where the most recent break happened.
    pub fn last_noise(&self) -> Vec3 {
        self.last_noise
    }

    pub fn update(&mut self, world: &mut World, config: &AiConfig, dt: f32) {
        self.update_humans(world, config, dt);
        update_dogs(world, config, dt);
        update_pigeons(world, config, dt);
    }

    fn update_humans(&self, world: &mut World, config: &AiConfig, dt: f32) {
        let player_heat = world
            .heat
            .iter()
            .map(|(_, tracker)| tracker.value)
            .fold(0.0, f32::max);
        let human_config = &config.human;

        let World {
            humans, transforms, ..
        } = world;
        for (entity, ai) in humans.iter_mut() {
            let Some(transform) = transforms.get_mut(entity) else {
                continue;
            };
            ai.timer = (ai.timer - dt).max(0.0);

            let state = if player_heat >= human_config.chase_heat {
                HumanState::Chase
            } else if player_heat >= human_config.warn_heat {
                HumanState::Warn
            } else if ai.timer > 0.0 {
                HumanState::Investigate
            } else {
                HumanState::Patrol
            };
            if state != ai.state {
                log::debug!("human {}: {:?} -> {:?}", entity.id(), ai.state, state);
                ai.state = state;
            }

            match ai.state {
                HumanState::Patrol => {
                    let Some(&target) = ai.patrol_points.get(ai.current_point) else {
                        continue;
                    };
                    if planar_distance(target, transform.position) < human_config.waypoint_radius {
                        ai.current_point = (ai.current_point + 1) % ai.patrol_points.len();
                    } else {
                        transform.rotation_y = heading(target - transform.position);
                    }
                }
                HumanState::Investigate => {
                    if planar_distance(self.last_noise, transform.position) > FACE_NOISE_EPSILON {
                        transform.rotation_y = heading(self.last_noise - transform.position);
                    }
                }
                HumanState::Warn | HumanState::Chase => {}
            }
        }
    }

    /// Every human starts investigating the break; dogs are held back.
    pub fn on_break(&mut self, world: &mut World, config: &AiConfig, event: &BreakEvent) {
        let Some(transform) = world.transforms.get(event.target) else {
            return;
        };
        self.last_noise = transform.position;
        for (_, human) in world.humans.iter_mut() {
            human.timer = config.human.investigate_time;
        }
        for (_, dog) in world.dogs.iter_mut() {
            dog.cooldown = dog.cooldown.max(config.dog.break_cooldown);
        }
    }

    /// Every flock scatters and delays its regroup.
    pub fn on_spill(&mut self, world: &mut World, config: &AiConfig) {
        for (entity, flock) in world.pigeons.iter_mut() {
            flock.regroup_timer = config.pigeon.regroup_delay;
            flock.scatter_timer = flock.scatter_timer.max(config.pigeon.scatter_time);
            log::trace!("flock {} scattered", entity.id());
        }
    }
}

fn update_dogs(world: &mut World, config: &AiConfig, dt: f32) {
    let World {
        dogs,
        transforms,
        players,
        ..
    } = world;

    // Last player with a transform wins.
    let player = players
        .entities()
        .filter_map(|player| transforms.get(player))
        .last()
        .map(|t| t.position);

    for (entity, dog) in dogs.iter_mut() {
        let Some(transform) = transforms.get_mut(entity) else {
            continue;
        };
        dog.cooldown = (dog.cooldown - dt).max(0.0);
        let Some(player) = player else {
            continue;
        };

        if planar_distance(player, transform.position) < dog.leash_radius && dog.cooldown <= 0.0 {
            if dog.state != DogState::Pursuit {
                log::debug!("dog {} gives chase", entity.id());
            }
            dog.state = DogState::Pursuit;
            transform.rotation_y = heading(player - transform.position);
        } else if dog.state == DogState::Pursuit {
            log::debug!("dog {} returns to its post", entity.id());
            dog.state = DogState::Return;
            dog.cooldown = config.dog.cooldown;
        }
    }
}

fn update_pigeons(world: &mut World, config: &AiConfig, dt: f32) {
    let pigeon = &config.pigeon;
    for (_, flock) in world.pigeons.iter_mut() {
        flock.scatter_timer = (flock.scatter_timer - dt).max(0.0);
        flock.regroup_timer = (flock.regroup_timer - dt).max(0.0);
        if flock.scatter_timer > 0.0 {
            flock.population -= pigeon.scatter_rate * dt;
        } else if flock.regroup_timer <= 0.0 {
            flock.population += pigeon.regroup_rate * dt;
        }
        flock.population = flock
            .population
            .clamp(pigeon.min_population, pigeon.max_population);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::ecs::components::*;
    use crate::ecs::Entity;
    use crate::events::SpillEvent;

    fn setup() -> (Sim, EventBus<Sim>) {
        let mut bus = EventBus::new();
        AiSystem::subscribe(&mut bus);
        (Sim::new(GameConfig::default()), bus)
    }

    fn step(sim: &mut Sim, dt: f32) {
        let Sim { ai, world, config, .. } = sim;
        ai.update(world, &config.ai, dt);
    }

    fn spawn_player(world: &mut World, at: Vec3) -> Entity {
        let cat = world.create_entity();
        world.add(cat, HeatTracker::default());
        world.add(cat, Transform::at(at));
        world.add(
            cat,
            PlayerController {
                acceleration: 0.0,
                max_speed: 0.0,
                sprint_multiplier: 0.0,
                jump_force: 0.0,
                gravity: 0.0,
                mantle_height: 0.0,
            },
        );
        cat
    }

    fn spawn_human(world: &mut World, at: Vec3, points: Vec<Vec3>) -> Entity {
        let human = world.create_entity();
        world.add(human, Transform::at(at));
        world.add(
            human,
            HumanAi {
                state: HumanState::Patrol,
                target_heat: 0.0,
                patrol_points: points,
                current_point: 0,
                timer: 0.0,
            },
        );
        human
    }

    fn spawn_dog(world: &mut World, at: Vec3) -> Entity {
        let dog = world.create_entity();
        world.add(dog, Transform::at(at));
        world.add(
            dog,
            DogAi {
                leash_origin: at,
                leash_radius: 4.5,
                cooldown: 0.0,
                state: DogState::Idle,
            },
        );
        dog
    }

    fn spawn_flock(world: &mut World, population: f32) -> Entity {
        let flock = world.create_entity();
        world.add(
            flock,
            PigeonFlock {
                home: Vec3::ZERO,
                scatter_timer: 0.0,
                regroup_timer: 0.0,
                population,
            },
        );
        flock
    }

    fn break_at(bus: &mut EventBus<Sim>, actor: Entity, target: Entity) {
        bus.emit(GameEvent::Break(BreakEvent {
            actor,
            target,
            category: PropCategory::Small,
            score: 0,
            heat: 0.0,
            chain_key: None,
        }));
    }

    #[test]
    fn reacts_to_break_and_spill() {
        let (mut sim, mut bus) = setup();
        let world = &mut sim.world;
        let human = spawn_human(
            world,
            Vec3::ZERO,
            vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)],
        );
        let pigeons = spawn_flock(world, 10.0);
        let prop = world.create_entity();
        world.add(prop, Transform::at(Vec3::new(2.0, 0.0, 0.0)));
        let player = spawn_player(world, Vec3::ZERO);

        break_at(&mut bus, player, prop);
        bus.flush(&mut sim);
        step(&mut sim, 0.5);
        assert_eq!(sim.world.humans.get(human).unwrap().state, HumanState::Investigate);
        assert_eq!(sim.ai.last_noise(), Vec3::new(2.0, 0.0, 0.0));
        // Faces +X, toward the noise.
        let facing = sim.world.transforms.get(human).unwrap().rotation_y;
        assert!((facing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        bus.emit(GameEvent::Spill(SpillEvent {
            source: prop,
            category: PropCategory::Food,
        }));
        bus.flush(&mut sim);
        step(&mut sim, 0.5);
        assert!(sim.world.pigeons.get(pigeons).unwrap().regroup_timer > 0.0);
    }

    #[test]
    fn heat_overrides_investigation() {
        let (mut sim, _) = setup();
        let player = spawn_player(&mut sim.world, Vec3::ZERO);
        let human = spawn_human(&mut sim.world, Vec3::ZERO, vec![]);
        sim.world.humans.get_mut(human).unwrap().timer = 3.0;

        let cases = [
            (10.0, HumanState::Investigate),
            (45.0, HumanState::Warn),
            (80.0, HumanState::Chase),
            (79.9, HumanState::Warn),
        ];
        for (heat, expected) in cases {
            sim.world.heat.get_mut(player).unwrap().value = heat;
            step(&mut sim, 0.01);
            assert_eq!(sim.world.humans.get(human).unwrap().state, expected, "heat {heat}");
        }

        sim.world.heat.get_mut(player).unwrap().value = 0.0;
        step(&mut sim, 5.0);
        assert_eq!(sim.world.humans.get(human).unwrap().state, HumanState::Patrol);
    }

    #[test]
    fn hottest_tracker_drives_humans() {
        let (mut sim, _) = setup();
        spawn_player(&mut sim.world, Vec3::ZERO);
        let decoy = sim.world.create_entity();
        sim.world.add(
            decoy,
            HeatTracker {
                value: 90.0,
                ..Default::default()
            },
        );
        let human = spawn_human(&mut sim.world, Vec3::ZERO, vec![]);
        step(&mut sim, 0.1);
        assert_eq!(sim.world.humans.get(human).unwrap().state, HumanState::Chase);
    }

    #[test]
    fn patrol_cycles_waypoints() {
        let (mut sim, _) = setup();
        let points = vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)];
        let human = spawn_human(&mut sim.world, Vec3::new(0.2, 0.0, 0.0), points);

        step(&mut sim, 0.1);
        assert_eq!(sim.world.humans.get(human).unwrap().current_point, 1);

        // Far from point 1: turn toward +Z, don't advance.
        step(&mut sim, 0.1);
        let ai = sim.world.humans.get(human).unwrap();
        assert_eq!(ai.current_point, 1);
        let facing = sim.world.transforms.get(human).unwrap().rotation_y;
        assert!(facing.abs() < 0.1);

        sim.world.transforms.get_mut(human).unwrap().position = Vec3::new(0.0, 0.0, 3.8);
        step(&mut sim, 0.1);
        assert_eq!(sim.world.humans.get(human).unwrap().current_point, 0);
    }

    #[test]
    fn dog_pursues_then_returns_with_cooldown() {
        let (mut sim, _) = setup();
        let player = spawn_player(&mut sim.world, Vec3::new(3.0, 0.0, 0.0));
        let dog = spawn_dog(&mut sim.world, Vec3::ZERO);

        step(&mut sim, 0.1);
        assert_eq!(sim.world.dogs.get(dog).unwrap().state, DogState::Pursuit);
        let facing = sim.world.transforms.get(dog).unwrap().rotation_y;
        assert!((facing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        sim.world.transforms.get_mut(player).unwrap().position.x = 10.0;
        step(&mut sim, 0.1);
        let state = *sim.world.dogs.get(dog).unwrap();
        assert_eq!(state.state, DogState::Return);
        assert_eq!(state.cooldown, sim.config.ai.dog.cooldown);

        // Back in range but cooling down: stays in Return.
        sim.world.transforms.get_mut(player).unwrap().position.x = 1.0;
        step(&mut sim, 1.0);
        assert_eq!(sim.world.dogs.get(dog).unwrap().state, DogState::Return);
        step(&mut sim, 2.5);
        assert_eq!(sim.world.dogs.get(dog).unwrap().state, DogState::Pursuit);
    }

    #[test]
    fn break_holds_dogs_back() {
        let (mut sim, mut bus) = setup();
        let player = spawn_player(&mut sim.world, Vec3::new(1.0, 0.0, 0.0));
        let dog = spawn_dog(&mut sim.world, Vec3::ZERO);
        break_at(&mut bus, player, player);
        bus.flush(&mut sim);
        assert_eq!(sim.world.dogs.get(dog).unwrap().cooldown, sim.config.ai.dog.break_cooldown);

        step(&mut sim, 1.0);
        assert_eq!(sim.world.dogs.get(dog).unwrap().state, DogState::Idle);
    }

    #[test]
    fn break_without_target_transform_is_ignored() {
        let (mut sim, mut bus) = setup();
        let player = spawn_player(&mut sim.world, Vec3::ZERO);
        let human = spawn_human(&mut sim.world, Vec3::ZERO, vec![]);
        let ghost = sim.world.create_entity();
        break_at(&mut bus, player, ghost);
        bus.flush(&mut sim);
        assert_eq!(sim.world.humans.get(human).unwrap().timer, 0.0);
    }

    #[test]
    fn flock_scatters_then_regroups_within_bounds() {
        let (mut sim, mut bus) = setup();
        let flock = spawn_flock(&mut sim.world, 12.0);
        let prop = sim.world.create_entity();
        bus.emit(GameEvent::Spill(SpillEvent {
            source: prop,
            category: PropCategory::Food,
        }));
        bus.flush(&mut sim);

        step(&mut sim, 0.5);
        let after_scatter = sim.world.pigeons.get(flock).unwrap().population;
        assert!((after_scatter - 7.0).abs() < 1e-4);

        step(&mut sim, 0.9);
        assert_eq!(sim.world.pigeons.get(flock).unwrap().population, 4.0);

        // Regroup delay still running: no growth yet.
        step(&mut sim, 0.5);
        assert_eq!(sim.world.pigeons.get(flock).unwrap().population, 4.0);

        for _ in 0..20 {
            step(&mut sim, 1.0);
        }
        assert_eq!(sim.world.pigeons.get(flock).unwrap().population, 24.0);
    }
}
