//! The alley: one cat, its props, the locals, and a hiding spot.

use std::f32::consts::PI;

use glam::Vec3;

use crate::config::GameConfig;
use crate::ecs::components::*;
use crate::ecs::{Entity, World};
use crate::sim::Sim;

/// Where the cat starts.
const CAT_SPAWN: Vec3 = Vec3::new(0.0, 0.5, 6.0);
/// Reach of every prop.
const PROP_RADIUS: f32 = 1.6;
/// Props start armed but with a short cooldown still ticking.
const PROP_START_COOLDOWN: f32 = 2.0;
const FLOCK_POPULATION: f32 = 18.0;

/// Entities the session keeps handles to.
#[derive(Debug, Clone, Copy)]
pub struct SceneEntities {
    pub player: Entity,
    pub world_state: Entity,
    pub chain: Entity,
}

struct PropLayout {
    id: &'static str,
    label: &'static str,
    category: PropCategory,
    position: Vec3,
    chain_key: Option<&'static str>,
}

const PROPS: &[PropLayout] = &[
    PropLayout {
        id: "crateStack",
        label: "Push Crates",
        category: PropCategory::Container,
        position: Vec3::new(2.0, 0.6, -2.0),
        chain_key: None,
    },
    PropLayout {
        id: "paintCans",
        label: "Knock Paint",
        category: PropCategory::Mechanism,
        position: Vec3::new(-3.0, 0.4, -1.0),
        chain_key: Some("laundry-line"),
    },
    PropLayout {
        id: "snackCart",
        label: "Steal Snack",
        category: PropCategory::Food,
        position: Vec3::new(4.0, 0.3, 1.6),
        chain_key: None,
    },
];

/// Populate `sim.world` with the alley and remember the player.
pub fn build_environment(sim: &mut Sim) -> SceneEntities {
    let world = &mut sim.world;
    let config = &sim.config;

    let player = spawn_cat(world);

    let world_state = world.create_entity();
    world.add(world_state, WorldState::default());

    let chain = world.create_entity();
    world.add(
        chain,
        ChainReaction {
            key: config.chain.cascade_key.clone(),
            stage: 0,
            timer: 0.0,
        },
    );

    for prop in PROPS {
        spawn_prop(world, prop);
    }

    spawn_human(world, config, Vec3::new(-6.0, 0.8, 4.0));
    spawn_dog(world, config, Vec3::new(5.0, 0.3, -3.0));
    spawn_pigeons(world, Vec3::new(-1.0, 0.0, -4.0));

    let hide = world.create_entity();
    world.add(hide, Transform::at(Vec3::new(2.0, 0.0, -2.0)));
    world.add(
        hide,
        TriggerVolume {
            radius: 1.4,
            hide_spot: true,
        },
    );

    log::info!(
        "Spawned alley: {} props, {} humans, {} dogs, {} flocks",
        world.interactables.len(),
        world.humans.len(),
        world.dogs.len(),
        world.pigeons.len(),
    );

    sim.player = Some(player);
    SceneEntities {
        player,
        world_state,
        chain,
    }
}

/// The player cat: movement, input, score and heat.
pub fn spawn_cat(world: &mut World) -> Entity {
    let entity = world.create_entity();
    world.add(entity, Transform::at(CAT_SPAWN));
    world.add(entity, PhysicsBody::default());
    world.add(entity, InputIntent::default());
    world.add(
        entity,
        PlayerController {
            acceleration: 18.0,
            max_speed: 5.2,
            sprint_multiplier: 1.35,
            jump_force: 5.5,
            gravity: 12.0,
            mantle_height: 0.8,
        },
    );
    world.add(entity, ScoreTracker::default());
    world.add(entity, HeatTracker::default());
    entity
}

/// A human pacing between `position` and a point 4 east, 2 north of it.
pub fn spawn_human(world: &mut World, config: &GameConfig, position: Vec3) -> Entity {
    let entity = world.create_entity();
    world.add(
        entity,
        Transform {
            position,
            rotation_y: PI,
        },
    );
    world.add(
        entity,
        HumanAi {
            state: HumanState::Patrol,
            target_heat: config.ai.human.warn_heat,
            patrol_points: vec![position, position + Vec3::new(4.0, 0.0, -2.0)],
            current_point: 0,
            timer: 0.0,
        },
    );
    entity
}

pub fn spawn_dog(world: &mut World, config: &GameConfig, position: Vec3) -> Entity {
    let entity = world.create_entity();
    world.add(entity, Transform::at(position));
    world.add(
        entity,
        DogAi {
            leash_origin: position,
            leash_radius: config.ai.dog.leash_radius,
            cooldown: config.ai.dog.cooldown,
            state: DogState::Idle,
        },
    );
    entity
}

pub fn spawn_pigeons(world: &mut World, position: Vec3) -> Entity {
    let entity = world.create_entity();
    world.add(entity, Transform::at(position));
    world.add(
        entity,
        PigeonFlock {
            home: position,
            scatter_timer: 0.0,
            regroup_timer: 0.0,
            population: FLOCK_POPULATION,
        },
    );
    entity
}

fn spawn_prop(world: &mut World, layout: &PropLayout) -> Entity {
    let entity = world.create_entity();
    world.add(entity, Transform::at(layout.position));
    world.add(
        entity,
        Interactable {
            id: layout.id.into(),
            label: layout.label.into(),
            category: layout.category,
            radius: PROP_RADIUS,
            cooldown: PROP_START_COOLDOWN,
            armed: true,
            chain_key: layout.chain_key.map(str::to_owned),
            broken: false,
        },
    );
    entity
}
