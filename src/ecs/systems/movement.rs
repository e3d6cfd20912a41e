use crate::ecs::components::PropCategory;
use crate::ecs::World;
use crate::events::{EventBus, GameEvent, InteractionEvent};
use crate::sim::Sim;
use crate::terrain::ground_height;

/// Horizontal velocity kept per tick while grounded.
const GROUND_DAMPING: f32 = 0.82;
/// Horizontal velocity kept per tick while airborne.
const AIR_DAMPING: f32 = 0.98;
/// Interaction id emitted when a body touches down.
pub const LANDED_ID: &str = "land";

/// Integrate velocity into position, collide with the ground, damp sliding.
pub fn integrate(world: &mut World, bus: &mut EventBus<Sim>, dt: f32) {
    let World {
        bodies, transforms, ..
    } = world;

    for (entity, body) in bodies.iter_mut() {
        let Some(transform) = transforms.get_mut(entity) else {
            continue;
        };

        transform.position += body.velocity * dt;

        let ground = ground_height(transform.position.x, transform.position.z);
        if transform.position.y <= ground {
            transform.position.y = ground;
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
            if !body.on_ground {
                bus.emit(GameEvent::Interaction(InteractionEvent {
                    actor: entity,
                    target: entity,
                    id: LANDED_ID.into(),
                    category: PropCategory::Small,
                }));
            }
            body.on_ground = true;
        } else {
            body.on_ground = false;
        }

        let damping = if body.on_ground { GROUND_DAMPING } else { AIR_DAMPING };
        body.velocity.x *= damping;
        body.velocity.z *= damping;
    }
}
