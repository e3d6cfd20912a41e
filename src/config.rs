//! Static tuning data, loaded once at startup and read-only afterwards.

use std::path::Path;

use serde::Deserialize;

use crate::ecs::components::PropCategory;
use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub categories: CategoriesConfig,
    pub interaction: InteractionConfig,
    pub scoring: ScoringConfig,
    pub heat: HeatConfig,
    pub ai: AiConfig,
    pub chain: ChainConfig,
    pub time: TimeConfig,
}

/// Score and heat yielded by breaking one prop of a category.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct CategoryConfig {
    pub base_score: u32,
    pub combo_bonus: u32,
    pub heat_on_break: f32,
}

impl CategoryConfig {
    /// Flat per-category score carried by a break. Does not look at the live combo.
    pub fn break_score(&self) -> u32 {
        self.base_score + self.combo_bonus * 10
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoriesConfig {
    pub small: CategoryConfig,
    pub medium: CategoryConfig,
    pub container: CategoryConfig,
    pub food: CategoryConfig,
    pub mechanism: CategoryConfig,
}

impl CategoriesConfig {
    pub fn get(&self, category: PropCategory) -> &CategoryConfig {
        match category {
            PropCategory::Small => &self.small,
            PropCategory::Medium => &self.medium,
            PropCategory::Container => &self.container,
            PropCategory::Food => &self.food,
            PropCategory::Mechanism => &self.mechanism,
        }
    }
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            small: CategoryConfig {
                base_score: 50,
                combo_bonus: 1,
                heat_on_break: 6.0,
            },
            medium: CategoryConfig {
                base_score: 100,
                combo_bonus: 2,
                heat_on_break: 10.0,
            },
            container: CategoryConfig {
                base_score: 150,
                combo_bonus: 3,
                heat_on_break: 14.0,
            },
            food: CategoryConfig {
                base_score: 80,
                combo_bonus: 2,
                heat_on_break: 12.0,
            },
            mechanism: CategoryConfig {
                base_score: 200,
                combo_bonus: 4,
                heat_on_break: 18.0,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Cooldown applied when a prop is triggered (seconds).
    pub reset_cooldown: f32,
    /// Added to each prop's radius for the range check.
    pub radius_slack: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reset_cooldown: 4.0,
            radius_slack: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct ComboRule {
    pub threshold: u32,
    pub multiplier: f32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_combo_window: f32,
    pub combo_decay: f32,
    /// Ascending by threshold.
    pub combo_multipliers: Vec<ComboRule>,
}

impl ScoringConfig {
    /// Multiplier of the highest-threshold rule `combo` satisfies, else 1.
    pub fn multiplier(&self, combo: u32) -> f32 {
        let mut multiplier = 1.0;
        for rule in &self.combo_multipliers {
            if combo >= rule.threshold {
                multiplier = rule.multiplier;
            }
        }
        multiplier
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_combo_window: 3.0,
            combo_decay: 1.0,
            combo_multipliers: vec![
                ComboRule {
                    threshold: 1,
                    multiplier: 1.0,
                },
                ComboRule {
                    threshold: 3,
                    multiplier: 1.5,
                },
                ComboRule {
                    threshold: 6,
                    multiplier: 2.0,
                },
                ComboRule {
                    threshold: 10,
                    multiplier: 3.0,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HeatThreshold {
    pub name: String,
    pub value: f32,
}

/// Index of the Alert tier in [`HeatConfig::thresholds`].
pub const ALERT_TIER: usize = 2;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeatConfig {
    pub max_heat: f32,
    pub decay_per_second: f32,
    pub hide_decay_multiplier: f32,
    pub alert_decay_multiplier: f32,
    /// Ascending tiers; the third one is Alert.
    pub thresholds: Vec<HeatThreshold>,
    pub calm_label: String,
}

impl HeatConfig {
    /// Heat at which the Alert tier starts.
    pub fn alert_threshold(&self) -> f32 {
        self.thresholds
            .get(ALERT_TIER)
            .map_or(f32::INFINITY, |tier| tier.value)
    }

    /// Name of the highest tier `value` meets, or the calm label.
    pub fn label(&self, value: f32) -> &str {
        self.thresholds
            .iter()
            .rev()
            .find(|tier| value >= tier.value)
            .map_or(self.calm_label.as_str(), |tier| tier.name.as_str())
    }
}

impl Default for HeatConfig {
    fn default() -> Self {
        let tier = |name: &str, value: f32| HeatThreshold { name: name.into(), value };
        Self {
            max_heat: 100.0,
            decay_per_second: 6.0,
            hide_decay_multiplier: 2.5,
            alert_decay_multiplier: 0.5,
            thresholds: vec![
                tier("Curious", 20.0),
                tier("Suspicious", 45.0),
                tier("Alert", 70.0),
                tier("Chasing", 90.0),
            ],
            calm_label: "Calm".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HumanConfig {
    pub warn_heat: f32,
    pub chase_heat: f32,
    pub investigate_time: f32,
    pub waypoint_radius: f32,
}

impl Default for HumanConfig {
    fn default() -> Self {
        Self {
            warn_heat: 45.0,
            chase_heat: 80.0,
            investigate_time: 4.0,
            waypoint_radius: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DogConfig {
    pub leash_radius: f32,
    pub cooldown: f32,
    /// Minimum cooldown imposed on every dog by a break.
    pub break_cooldown: f32,
}

impl Default for DogConfig {
    fn default() -> Self {
        Self {
            leash_radius: 4.5,
            cooldown: 3.0,
            break_cooldown: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PigeonConfig {
    pub min_population: f32,
    pub max_population: f32,
    /// Birds lost per second while scattering.
    pub scatter_rate: f32,
    /// Birds regained per second once regrouped.
    pub regroup_rate: f32,
    pub regroup_delay: f32,
    pub scatter_time: f32,
}

impl Default for PigeonConfig {
    fn default() -> Self {
        Self {
            min_population: 4.0,
            max_population: 24.0,
            scatter_rate: 10.0,
            regroup_rate: 6.0,
            regroup_delay: 3.0,
            scatter_time: 1.5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    pub human: HumanConfig,
    pub dog: DogConfig,
    pub pigeon: PigeonConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChainConfig {
    /// The chain a keyed break kicks off.
    pub cascade_key: String,
    /// Timer set when a keyed break arms the cascade.
    pub kick_timer: f32,
    pub stage_interval: f32,
    /// Stage at which the score summary counts the chain as complete.
    pub complete_stage: u32,
    /// Stage at which the run ends.
    pub end_run_stage: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            cascade_key: "alleyCascade".into(),
            kick_timer: 0.5,
            stage_interval: 1.2,
            complete_stage: 3,
            end_run_stage: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeConfig {
    pub step: f64,
    pub max_steps_per_frame: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            step: 1.0 / 60.0,
            max_steps_per_frame: crate::time::MAX_STEPS_PER_FRAME,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            categories: CategoriesConfig::default(),
            interaction: InteractionConfig::default(),
            scoring: ScoringConfig::default(),
            heat: HeatConfig::default(),
            ai: AiConfig::default(),
            chain: ChainConfig::default(),
            time: TimeConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse TOML; missing sections and fields fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.heat.max_heat <= 0.0 {
            return invalid(format!("heat.max_heat must be positive, got {}", self.heat.max_heat));
        }
        if self.heat.thresholds.len() <= ALERT_TIER {
            return invalid(format!(
                "heat.thresholds needs at least {} tiers, got {}",
                ALERT_TIER + 1,
                self.heat.thresholds.len()
            ));
        }
        if self.heat.thresholds.windows(2).any(|w| w[0].value > w[1].value) {
            return invalid("heat.thresholds must ascend by value".into());
        }
        if self
            .scoring
            .combo_multipliers
            .windows(2)
            .any(|w| w[0].threshold > w[1].threshold)
        {
            return invalid("scoring.combo_multipliers must ascend by threshold".into());
        }
        if self.scoring.base_combo_window <= 0.0 {
            return invalid("scoring.base_combo_window must be positive".into());
        }
        let pigeon = &self.ai.pigeon;
        if pigeon.min_population > pigeon.max_population {
            return invalid(format!(
                "ai.pigeon.min_population ({}) exceeds max_population ({})",
                pigeon.min_population, pigeon.max_population
            ));
        }
        if self.ai.human.chase_heat < self.ai.human.warn_heat {
            return invalid("ai.human.chase_heat must be at least warn_heat".into());
        }
        if !(self.time.step > 0.0) || self.time.max_steps_per_frame == 0 {
            return invalid("time.step and time.max_steps_per_frame must be positive".into());
        }
        Ok(())
    }
}
