//! Keyframe timeline: availability and events follow elapsed animation time.
//!
//! A cycle starts on [`use_ability`](Cooldown::use_ability): the countdown is
//! entered, playback rewinds and every keyframe becomes pending again. Once
//! the countdown has elapsed, playback advances (scaled by the playback speed)
//! and each pending keyframe whose band is reached fires exactly once.
//!
//! A keyframe that opens a reset window arms a timer. When it expires the
//! ability is used implicitly: the countdown restarts, playback rewinds and
//! every keyframe is pending again for the next cycle. Reuse is never blocked
//! on the remaining keyframes; only the countdown gates `is_ready`.

use super::Cooldown;
use super::header::{CooldownHeader, non_negative};
use super::keyframe::{FiredKeyframes, KeyframeEvent, Keyframes, sorted_keyframes};
use super::profile::Keyframe;
use crate::ability::AbilityKey;
use crate::config::EngineConfig;

/// Ability driven by an animation timeline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyframeTimelineCooldown {
    pub(crate) ability_key: AbilityKey,
    pub(crate) playback_speed: f32,
    pub(crate) header: CooldownHeader,
    pub(crate) keyframes: Keyframes,
    pub(crate) playback_time: f32,
    pub(crate) fired: FiredKeyframes,
    pub(crate) reset_window_remaining: f32,
    pub(crate) reset_window_armed: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) events: Vec<KeyframeEvent>,
}

impl KeyframeTimelineCooldown {
    /// Builds a timeline; keyframes are sorted by trigger offset.
    ///
    /// The timeline starts idle: nothing is pending until the first use.
    pub fn new(ability_key: AbilityKey, keyframes: &[Keyframe], cooldown: f32) -> Self {
        let keyframes = sorted_keyframes(keyframes, EngineConfig::MAX_KEYFRAMES);
        let fired = FiredKeyframes::all(keyframes.len());
        Self {
            ability_key,
            playback_speed: 1.0,
            header: CooldownHeader::new(cooldown),
            keyframes,
            playback_time: 0.0,
            fired,
            reset_window_remaining: 0.0,
            reset_window_armed: false,
            events: Vec::new(),
        }
    }

    pub fn header(&self) -> &CooldownHeader {
        &self.header
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn playback_time(&self) -> f32 {
        self.playback_time
    }

    pub fn fired(&self) -> FiredKeyframes {
        self.fired
    }

    pub fn reset_window(&self) -> Option<f32> {
        self.reset_window_armed.then_some(self.reset_window_remaining)
    }

    pub fn set_playback_speed(&mut self, multiplier: f32) {
        self.playback_speed = non_negative(multiplier);
    }

    /// True while some keyframe of the current cycle has not fired.
    pub fn has_pending_keyframes(&self) -> bool {
        !self.fired.is_complete(self.keyframes.len())
    }

    /// Takes the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<KeyframeEvent> {
        core::mem::take(&mut self.events)
    }

    fn arm_reset_window(&mut self, duration: f32) {
        self.reset_window_remaining = non_negative(duration);
        self.reset_window_armed = true;
    }

    fn disarm_reset_window(&mut self) {
        self.reset_window_remaining = 0.0;
        self.reset_window_armed = false;
    }

    /// Starts a new cycle: countdown entered, playback rewound, nothing fired.
    fn restart_cycle(&mut self) {
        self.header.start();
        self.playback_time = 0.0;
        self.fired.clear();
        self.disarm_reset_window();
    }

    fn advance_playback(&mut self, dt: f32) {
        let from = self.playback_time;
        let to = from + dt * self.playback_speed;
        self.playback_time = to;

        for index in 0..self.keyframes.len() {
            let keyframe = self.keyframes[index];
            if self.fired.contains(index) || !keyframe.reached(from, to) {
                continue;
            }

            self.fired.insert(index);
            self.events.push(KeyframeEvent {
                ability: self.ability_key,
                tag: keyframe.event_tag,
                stage: index as u8,
                playback_time: to,
            });

            if keyframe.opens_reset_window {
                self.arm_reset_window(keyframe.reset_window_duration);
            }
        }
    }
}

impl Cooldown for KeyframeTimelineCooldown {
    fn ability_key(&self) -> AbilityKey {
        self.ability_key
    }

    fn is_ready(&self) -> bool {
        if self.keyframes.is_empty() && self.header.configured_cooldown == 0.0 {
            return true;
        }
        self.header.current_countdown <= 0.0
    }

    fn use_ability(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.restart_cycle();
        true
    }

    fn update(&mut self, dt: f32) {
        let dt = non_negative(dt);

        if self.header.is_cooling_down() {
            self.header.tick(dt);
            return;
        }

        let was_armed = self.reset_window_armed;
        if self.has_pending_keyframes() {
            self.advance_playback(dt);
        }

        if was_armed {
            self.reset_window_remaining = non_negative(self.reset_window_remaining - dt);
        }
        // Expired window: implicit use.
        if self.reset_window_armed && self.reset_window_remaining <= 0.0 {
            self.restart_cycle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::EventTag;

    fn swing() -> KeyframeTimelineCooldown {
        KeyframeTimelineCooldown::new(
            AbilityKey::Attack,
            &[
                Keyframe::new(0.6, 0.05, EventTag(2)).with_reset_window(0.5),
                Keyframe::new(0.2, 0.05, EventTag(1)),
            ],
            1.0,
        )
    }

    #[test]
    fn idle_timeline_emits_nothing() {
        let mut timeline = swing();
        timeline.update(1.0);
        assert!(timeline.drain_events().is_empty());
        assert_eq!(timeline.playback_time, 0.0);
    }

    #[test]
    fn playback_starts_after_countdown() {
        let mut timeline = swing();
        assert!(timeline.use_ability());
        assert!(!timeline.is_ready());

        timeline.update(0.5);
        assert_eq!(timeline.playback_time, 0.0);
        timeline.update(0.5);
        assert_eq!(timeline.header.current_countdown, 0.0);
        assert_eq!(timeline.playback_time, 0.0);

        timeline.update(0.2);
        let events = timeline.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tag, EventTag(1));
        assert_eq!(events[0].stage, 0);
    }

    #[test]
    fn keyframes_fire_once_per_cycle() {
        let mut timeline = swing();
        timeline.use_ability();
        timeline.update(1.0);

        timeline.update(0.2);
        timeline.update(0.01);
        timeline.update(0.01);
        assert_eq!(timeline.drain_events().len(), 1);
        assert_eq!(timeline.fired.bits(), 0b01);
    }

    #[test]
    fn reset_window_expiry_uses_implicitly() {
        let mut timeline = swing();
        timeline.use_ability();
        timeline.update(1.0);

        timeline.update(0.6);
        let tags: Vec<_> = timeline.drain_events().iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec![EventTag(1), EventTag(2)]);
        assert_eq!(timeline.reset_window(), Some(0.5));
        assert!(timeline.is_ready());

        timeline.update(0.3);
        assert!(timeline.reset_window().is_some());
        timeline.update(0.3);
        assert_eq!(timeline.reset_window(), None);
        assert_eq!(timeline.header.current_countdown, 1.0);
        assert_eq!(timeline.playback_time, 0.0);
        assert_eq!(timeline.fired.bits(), 0);
        assert!(!timeline.is_ready());

        // The next cycle plays from the start once the countdown elapses.
        timeline.update(1.0);
        timeline.update(0.25);
        assert_eq!(timeline.playback_time, 0.25);
        let events = timeline.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tag, EventTag(1));
    }

    #[test]
    fn coarse_step_does_not_skip_a_band() {
        let mut timeline = KeyframeTimelineCooldown::new(
            AbilityKey::Skill1,
            &[Keyframe::new(0.3, 0.01, EventTag(7))],
            0.0,
        );
        timeline.use_ability();
        timeline.update(1.0);
        assert_eq!(timeline.drain_events().len(), 1);
    }

    #[test]
    fn playback_speed_scales_time() {
        let mut timeline = KeyframeTimelineCooldown::new(
            AbilityKey::Skill2,
            &[Keyframe::new(0.4, 0.01, EventTag(3))],
            0.0,
        );
        timeline.set_playback_speed(2.0);
        timeline.use_ability();
        timeline.update(0.1);
        assert!(timeline.drain_events().is_empty());
        timeline.update(0.1);
        assert_eq!(timeline.drain_events().len(), 1);
    }

    #[test]
    fn empty_timeline_without_cooldown_is_always_ready() {
        let mut timeline = KeyframeTimelineCooldown::new(AbilityKey::Emote, &[], 0.0);
        assert!(timeline.is_ready());
        assert!(timeline.use_ability());
        assert!(timeline.is_ready());
    }
}
