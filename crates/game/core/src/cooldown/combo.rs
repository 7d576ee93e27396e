//! Input-driven combo: each follow-up must land inside the previous stage's window.
//!
//! ```text
//! Idle(stage 0) --use--> InWindow(1) --use--> InWindow(2) ... --use--> Cooldown
//!                            |                    |
//!                            +---- window expires ---> Cooldown
//! ```
//!
//! Reaching the last stage ends the combo on that `use_ability`, not on window
//! expiry. Letting any window lapse is penalized with the full cooldown.

use arrayvec::ArrayVec;

use super::Cooldown;
use super::header::{CooldownHeader, non_negative};
use crate::ability::AbilityKey;
use crate::config::EngineConfig;

/// Window durations, one per stage.
pub type ComboWindows = ArrayVec<f32, { EngineConfig::MAX_COMBO_STAGES }>;

/// Multi-stage combo gated by per-stage input windows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboWindowCooldown {
    pub(crate) ability_key: AbilityKey,
    pub(crate) playback_speed: f32,
    pub(crate) header: CooldownHeader,
    pub(crate) windows: ComboWindows,
    pub(crate) current_stage: u8,
    pub(crate) window_remaining: f32,
    pub(crate) in_window: bool,
}

impl ComboWindowCooldown {
    /// Builds a combo from its window durations.
    ///
    /// Callers validate the profile first; excess windows are dropped and
    /// negative durations clamped.
    pub fn new(ability_key: AbilityKey, windows: &[f32], cooldown: f32) -> Self {
        Self {
            ability_key,
            playback_speed: 1.0,
            header: CooldownHeader::new(cooldown),
            windows: windows
                .iter()
                .take(EngineConfig::MAX_COMBO_STAGES)
                .map(|w| non_negative(*w))
                .collect(),
            current_stage: 0,
            window_remaining: 0.0,
            in_window: false,
        }
    }

    pub fn header(&self) -> &CooldownHeader {
        &self.header
    }

    /// Number of configured stages.
    pub fn max_stage(&self) -> u8 {
        self.windows.len() as u8
    }

    pub fn current_stage(&self) -> u8 {
        self.current_stage
    }

    pub fn window_remaining(&self) -> f32 {
        self.window_remaining
    }

    pub fn in_window(&self) -> bool {
        self.in_window
    }

    pub fn set_playback_speed(&mut self, multiplier: f32) {
        self.playback_speed = non_negative(multiplier);
    }

    fn window_for(&self, stage: u8) -> f32 {
        let index = usize::from(stage.saturating_sub(1));
        self.windows.get(index).copied().unwrap_or(0.0)
    }

    fn open_window(&mut self) {
        self.window_remaining = self.window_for(self.current_stage);
        self.in_window = true;
    }

    /// Enters the full cooldown and returns to stage 0.
    fn finish(&mut self) {
        self.header.start();
        self.reset_stage();
    }

    fn reset_stage(&mut self) {
        self.current_stage = 0;
        self.window_remaining = 0.0;
        self.in_window = false;
    }
}

impl Cooldown for ComboWindowCooldown {
    fn ability_key(&self) -> AbilityKey {
        self.ability_key
    }

    fn is_ready(&self) -> bool {
        self.header.current_countdown <= 0.0 && (self.current_stage == 0 || self.in_window)
    }

    fn use_ability(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }

        let max_stage = self.max_stage();
        if self.current_stage == 0 {
            self.current_stage = 1;
            self.header.clear();
            self.open_window();
        } else if self.current_stage >= max_stage {
            self.finish();
        } else {
            self.current_stage = (self.current_stage + 1).min(max_stage);
            if self.current_stage >= max_stage {
                // Finisher: the last stage ends the combo immediately.
                self.finish();
            } else {
                self.open_window();
            }
        }
        true
    }

    fn update(&mut self, dt: f32) {
        let dt = non_negative(dt);
        self.header.tick(dt);

        if !self.in_window {
            return;
        }

        self.window_remaining = non_negative(self.window_remaining - dt);
        if self.window_remaining <= 0.0 {
            self.in_window = false;
            if self.current_stage > 0 {
                self.finish();
            }
        }
    }
}
