use glam::Vec3;

use crate::ecs::systems::heading;
use crate::ecs::World;

/// How long a jump press stays buffered before landing (seconds).
const JUMP_BUFFER_TIME: f32 = 0.16;
/// How long after leaving the ground a jump still counts (seconds).
const COYOTE_TIME: f32 = 0.18;
/// Below this squared length the move vector counts as "no input".
const MOVE_EPSILON_SQ: f32 = 0.0001;

/// Turn input intent into velocity, jumps and heading for player entities.
///
/// Movement is camera-relative: `camera_yaw` picks the forward/right basis.
pub fn update(world: &mut World, dt: f32, camera_yaw: f32) {
    let World {
        players,
        transforms,
        bodies,
        inputs,
        ..
    } = world;

    let forward = Vec3::new(camera_yaw.sin(), 0.0, camera_yaw.cos());
    let right = Vec3::new(forward.z, 0.0, -forward.x);

    for (entity, controller) in players.iter() {
        let (Some(transform), Some(body), Some(input)) = (
            transforms.get_mut(entity),
            bodies.get_mut(entity),
            inputs.get_mut(entity),
        ) else {
            continue;
        };

        let mut dir = right * input.movement.x + forward * input.movement.y;
        let moving = dir.length_squared() > MOVE_EPSILON_SQ;
        if moving {
            dir = dir.normalize();
        }

        // Exponential approach: frame-rate independent, unlike a fixed lerp.
        let sprint = if input.sprint { controller.sprint_multiplier } else { 1.0 };
        let desired = dir * controller.max_speed * sprint;
        let smoothing = 1.0 - (-controller.acceleration * dt).exp();
        let horizontal = Vec3::new(body.velocity.x, 0.0, body.velocity.z).lerp(desired, smoothing);
        body.velocity.x = horizontal.x;
        body.velocity.z = horizontal.z;

        body.jump_buffer = (body.jump_buffer - dt).max(0.0);
        body.coyote_timer = (body.coyote_timer - dt).max(0.0);
        if input.jump.take() {
            body.jump_buffer = JUMP_BUFFER_TIME;
        }
        if body.on_ground {
            body.coyote_timer = COYOTE_TIME;
        }
        if body.jump_buffer > 0.0 && body.coyote_timer > 0.0 {
            body.velocity.y = controller.jump_force;
            body.on_ground = false;
            body.jump_buffer = 0.0;
            body.coyote_timer = 0.0;
            log::trace!("entity {} jumped", entity.id());
        }

        // Always pull down; the movement system snaps to ground.
        body.velocity.y -= controller.gravity * dt;

        if moving {
            transform.rotation_y = heading(horizontal);
        }
    }
}
