use glam::{Vec2, Vec3};

use crate::input::Trigger;

/// World position and heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Heading in radians around +Y.
    pub rotation_y: f32,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation_y: 0.0,
        }
    }
}

/// Velocity and grounding state. Timers are seconds remaining, never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub on_ground: bool,
    pub coyote_timer: f32,
    pub jump_buffer: f32,
}

/// Movement tuning for a player-driven entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerController {
    pub acceleration: f32,
    pub max_speed: f32,
    pub sprint_multiplier: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub mantle_height: f32,
}

/// Per-tick intent copied from the input snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputIntent {
    /// Magnitude is at most 1.
    pub movement: Vec2,
    pub sprint: bool,
    pub jump: Trigger,
    pub interact: Trigger,
    pub scratch: Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropCategory {
    Small,
    Medium,
    Container,
    Food,
    Mechanism,
}

impl PropCategory {
    pub fn label(self) -> &'static str {
        match self {
            PropCategory::Small => "small",
            PropCategory::Medium => "medium",
            PropCategory::Container => "container",
            PropCategory::Food => "food",
            PropCategory::Mechanism => "mechanism",
        }
    }
}

/// A prop the cat can knock over.
///
/// `armed` is true exactly when the cooldown has run out since the last
/// trigger; `broken` is only set while disarmed by a trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Interactable {
    pub id: String,
    pub label: String,
    pub category: PropCategory,
    pub radius: f32,
    pub cooldown: f32,
    pub armed: bool,
    pub chain_key: Option<String>,
    pub broken: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreTracker {
    pub score: u64,
    pub combo: u32,
    /// Seconds left in the combo window. Zero resets the combo.
    pub combo_timer: f32,
    /// High-water mark of `score`.
    pub best: u64,
}

/// Suspicion meter, kept within `[0, max_heat]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatTracker {
    pub value: f32,
    pub hide_boost: f32,
    /// Either 1 or the configured alert decay multiplier.
    pub alert_modifier: f32,
    /// Whether the entity sat inside a hide volume last tick.
    pub hidden: bool,
}

impl Default for HeatTracker {
    fn default() -> Self {
        Self {
            value: 0.0,
            hide_boost: 0.0,
            alert_modifier: 1.0,
            hidden: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSource {
    pub strength: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanState {
    Patrol,
    Investigate,
    Warn,
    Chase,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HumanAi {
    pub state: HumanState,
    pub target_heat: f32,
    pub patrol_points: Vec<Vec3>,
    pub current_point: usize,
    /// Investigate dwell remaining (seconds).
    pub timer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DogState {
    Idle,
    Pursuit,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DogAi {
    pub leash_origin: Vec3,
    pub leash_radius: f32,
    pub cooldown: f32,
    pub state: DogState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PigeonFlock {
    pub home: Vec3,
    pub scatter_timer: f32,
    pub regroup_timer: f32,
    pub population: f32,
}

/// Circular region on the ground plane; hide spots speed up heat decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerVolume {
    pub radius: f32,
    pub hide_spot: bool,
}

/// Staged timer automaton. Stage 0 is inactive.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainReaction {
    pub key: String,
    pub stage: u32,
    pub timer: f32,
}

/// Session-wide flags, attached to a single entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldState {
    pub end_run: bool,
}
