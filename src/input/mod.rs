use glam::Vec2;

/// Edge state of a one-shot action.
///
/// A press moves `Idle -> Pressed`; the first [`Trigger::take`] moves it to
/// `Consumed`. Everything returns to `Idle` at frame end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trigger {
    #[default]
    Idle,
    Pressed,
    Consumed,
}

impl Trigger {
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            Trigger::Pressed
        } else {
            Trigger::Idle
        }
    }

    pub fn press(&mut self) {
        *self = Trigger::Pressed;
    }

    /// Read-and-clear. True at most once per press.
    pub fn take(&mut self) -> bool {
        if *self == Trigger::Pressed {
            *self = Trigger::Consumed;
            true
        } else {
            false
        }
    }

    pub fn is_pressed(self) -> bool {
        self == Trigger::Pressed
    }

    pub fn reset(&mut self) {
        *self = Trigger::Idle;
    }
}

/// Physical keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    W = 0,
    A = 1,
    S = 2,
    D = 3,
    Space = 4,
    E = 5,
    F = 6,
    ShiftLeft = 7,
    ShiftRight = 8,
}

impl Key {
    pub const COUNT: usize = 9;
}

/// Per-tick intent read from the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// x: right minus left, y: back minus forward. Clamped to unit length.
    pub movement: Vec2,
    pub sprint: bool,
    pub jump: bool,
    pub interact: bool,
    pub scratch: bool,
}

/// Held-key state plus one-shot triggers for jump/interact/scratch.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    down: [bool; Key::COUNT],
    jump: Trigger,
    interact: Trigger,
    scratch: Trigger,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Auto-repeat (already held) is ignored.
    pub fn key_down(&mut self, key: Key) {
        let slot = &mut self.down[key as usize];
        if *slot {
            return;
        }
        *slot = true;
        match key {
            Key::Space => self.jump.press(),
            Key::E => self.interact.press(),
            Key::F => self.scratch.press(),
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.down[key as usize] = false;
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down[key as usize]
    }

    /// Build this tick's intent, consuming any pending one-shot presses.
    pub fn snapshot(&mut self) -> FrameInput {
        let axis = |pos: Key, neg: Key| {
            (self.is_down(pos) as i32 - self.is_down(neg) as i32) as f32
        };
        let mut movement = Vec2::new(axis(Key::D, Key::A), axis(Key::S, Key::W));
        if movement.length_squared() > 1.0 {
            movement = movement.normalize();
        }

        FrameInput {
            movement,
            sprint: self.is_down(Key::ShiftLeft) || self.is_down(Key::ShiftRight),
            jump: self.jump.take(),
            interact: self.interact.take(),
            scratch: self.scratch.take(),
        }
    }

    /// Drop any presses nobody consumed. Call once per rendered frame.
    pub fn frame_end(&mut self) {
        self.jump.reset();
        self.interact.reset();
        self.scratch.reset();
    }
}
