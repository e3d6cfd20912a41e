use crate::sim::RunSummary;

/// What the presentation layer shows. Systems push into it once per tick;
/// nothing in the simulation reads it back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub best: u64,
    pub combo: u32,
    /// Remaining combo window in `[0, 1]`.
    pub combo_progress: f32,
    pub multiplier: f32,
    /// Heat as a fraction of max, in `[0, 1]`.
    pub heat_percent: f32,
    pub heat_label: String,
    pub prompt: Option<String>,
    pub summary: Option<RunSummary>,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            multiplier: 1.0,
            ..Self::default()
        }
    }

    pub fn set_score(&mut self, score: u64, best: u64) {
        self.score = score;
        self.best = best.max(score);
    }

    pub fn set_combo(&mut self, combo: u32, progress: f32, multiplier: f32) {
        self.combo = combo;
        self.combo_progress = progress.clamp(0.0, 1.0);
        self.multiplier = multiplier;
    }

    pub fn set_heat(&mut self, percent: f32, label: &str) {
        self.heat_percent = percent.clamp(0.0, 1.0);
        if self.heat_label != label {
            self.heat_label = label.to_owned();
        }
    }

    pub fn show_prompt(&mut self, text: String) {
        self.prompt = Some(text);
    }

    pub fn hide_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn show_summary(&mut self, summary: RunSummary) {
        self.summary = Some(summary);
    }
}
