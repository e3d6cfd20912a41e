use crate::ecs::World;
use crate::input::{KeyboardInput, Trigger};

/// Copy this frame's keyboard intent into every `InputIntent`, then close the
/// keyboard frame so unread presses don't carry over.
pub fn apply(world: &mut World, keyboard: &mut KeyboardInput) {
    let frame = keyboard.snapshot();
    for (_, input) in world.inputs.iter_mut() {
        input.movement = frame.movement;
        input.sprint = frame.sprint;
        input.jump = Trigger::from_pressed(frame.jump);
        input.interact = Trigger::from_pressed(frame.interact);
        input.scratch = Trigger::from_pressed(frame.scratch);
    }
    keyboard.frame_end();
}
