//! Keyframe combo: each stage is gated by playback reaching that stage's keyframe.
//!
//! The first use starts the combo and plays stage 0. When playback enters the
//! stage's trigger band the keyframe fires, the stage advances and an input
//! window opens for the follow-up (its length is the next stage's
//! `reset_window_duration`). A follow-up inside the window plays the next
//! stage from the start of its animation. Letting the window lapse, or a next
//! stage with a zero-length window, aborts into the full cooldown. Reaching the final
//! stage's keyframe completes the combo and also enters the cooldown.

use super::Cooldown;
use super::header::{CooldownHeader, non_negative};
use super::keyframe::{KeyframeEvent, Keyframes};
use super::profile::Keyframe;
use crate::ability::AbilityKey;
use crate::config::EngineConfig;

/// Multi-stage combo advanced by animation keyframes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyframeComboCooldown {
    pub(crate) ability_key: AbilityKey,
    pub(crate) playback_speed: f32,
    pub(crate) header: CooldownHeader,
    pub(crate) stages: Keyframes,
    pub(crate) current_stage: u8,
    pub(crate) window_remaining: f32,
    pub(crate) in_window: bool,
    pub(crate) combo_started: bool,
    pub(crate) playback_time: f32,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) events: Vec<KeyframeEvent>,
}

impl KeyframeComboCooldown {
    /// Builds a combo with one keyframe per stage, in stage order.
    pub fn new(ability_key: AbilityKey, stages: &[Keyframe], cooldown: f32) -> Self {
        Self {
            ability_key,
            playback_speed: 1.0,
            header: CooldownHeader::new(cooldown),
            stages: stages
                .iter()
                .take(EngineConfig::MAX_COMBO_STAGES)
                .copied()
                .collect(),
            current_stage: 0,
            window_remaining: 0.0,
            in_window: true,
            combo_started: false,
            playback_time: 0.0,
            events: Vec::new(),
        }
    }

    pub fn header(&self) -> &CooldownHeader {
        &self.header
    }

    /// Number of configured stages.
    pub fn stage_count(&self) -> u8 {
        self.stages.len() as u8
    }

    pub fn current_stage(&self) -> u8 {
        self.current_stage
    }

    pub fn in_window(&self) -> bool {
        self.in_window
    }

    pub fn window_remaining(&self) -> f32 {
        self.window_remaining
    }

    pub fn combo_started(&self) -> bool {
        self.combo_started
    }

    pub fn playback_time(&self) -> f32 {
        self.playback_time
    }

    pub fn set_playback_speed(&mut self, multiplier: f32) {
        self.playback_speed = non_negative(multiplier);
    }

    /// Takes the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<KeyframeEvent> {
        core::mem::take(&mut self.events)
    }

    fn reset_combo(&mut self) {
        self.current_stage = 0;
        self.window_remaining = 0.0;
        self.in_window = false;
        self.combo_started = false;
        self.playback_time = 0.0;
    }

    /// Full cooldown; re-armed right away when no cooldown is configured.
    fn enter_cooldown(&mut self) {
        self.header.start();
        self.reset_combo();
        if !self.header.is_cooling_down() {
            self.in_window = true;
        }
    }

    fn advance_playback(&mut self, dt: f32) {
        let Some(keyframe) = self.stages.get(usize::from(self.current_stage)).copied() else {
            self.enter_cooldown();
            return;
        };

        let from = self.playback_time;
        let to = from + dt * self.playback_speed;
        self.playback_time = to;

        if !keyframe.reached(from, to) {
            return;
        }

        self.events.push(KeyframeEvent {
            ability: self.ability_key,
            tag: keyframe.event_tag,
            stage: self.current_stage,
            playback_time: to,
        });
        self.current_stage += 1;

        match self.stages.get(usize::from(self.current_stage)) {
            Some(next) if next.reset_window_duration > 0.0 => {
                self.window_remaining = next.reset_window_duration;
                self.in_window = true;
            }
            _ => self.enter_cooldown(),
        }
    }
}

impl Cooldown for KeyframeComboCooldown {
    fn ability_key(&self) -> AbilityKey {
        self.ability_key
    }

    fn is_ready(&self) -> bool {
        if self.current_stage == 0 {
            self.header.current_countdown <= 0.0 && self.in_window
        } else {
            self.in_window && self.current_stage < self.stage_count()
        }
    }

    fn use_ability(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        if !self.combo_started && self.current_stage == 0 {
            self.combo_started = true;
        }
        self.in_window = false;
        self.window_remaining = 0.0;
        self.playback_time = 0.0;
        true
    }

    fn update(&mut self, dt: f32) {
        let dt = non_negative(dt);

        if self.header.is_cooling_down() {
            if self.header.tick(dt) {
                self.reset_combo();
                self.in_window = true;
            }
            return;
        }

        if !self.combo_started {
            return;
        }

        if self.in_window {
            self.window_remaining = non_negative(self.window_remaining - dt);
            if self.window_remaining <= 0.0 {
                self.enter_cooldown();
            }
            return;
        }

        self.advance_playback(dt);
    }
}
