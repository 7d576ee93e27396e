//! Conversion between live cooldown states and snapshots.
//!
//! Every match below is exhaustive over [`CooldownState`]; adding a variant
//! without a codec arm does not compile.

use super::{CooldownSnapshot, SnapshotFields};
use crate::config::EngineConfig;
use crate::cooldown::{Cooldown, CooldownState, FiredKeyframes, non_negative};

#[inline]
fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= EngineConfig::SNAPSHOT_EPSILON
}

impl CooldownSnapshot {
    /// Captures `state`, zeroing fields its variant does not use.
    pub fn create(state: &CooldownState) -> Self {
        let header = state.header();
        let mut snapshot = Self::empty(state.ability_key(), state.kind());
        snapshot.configured_cooldown = header.configured_cooldown;
        snapshot.current_countdown = header.current_countdown;
        snapshot.playback_speed = state.playback_speed();

        match state {
            CooldownState::Simple(_) => {}
            CooldownState::ComboWindow(combo) => {
                snapshot.current_stage = combo.current_stage;
                snapshot.max_stage = combo.max_stage();
                snapshot.window_remaining = combo.window_remaining;
                snapshot.in_window = combo.in_window;
            }
            CooldownState::KeyframeTimeline(timeline) => {
                snapshot.playback_time = timeline.playback_time;
                snapshot.fired_mask = timeline.fired.bits();
                snapshot.reset_window_remaining = timeline.reset_window_remaining;
                snapshot.reset_window_armed = timeline.reset_window_armed;
            }
            CooldownState::KeyframeCombo(combo) => {
                snapshot.current_stage = combo.current_stage;
                snapshot.max_stage = combo.stage_count();
                snapshot.window_remaining = combo.window_remaining;
                snapshot.in_window = combo.in_window;
                snapshot.combo_started = combo.combo_started;
                snapshot.playback_time = combo.playback_time;
            }
        }
        snapshot
    }

    /// True if `state` is observably the same as this snapshot.
    ///
    /// Floating fields compare within [`EngineConfig::SNAPSHOT_EPSILON`];
    /// stages and flags compare exactly. Only carried fields are compared.
    pub fn matches(&self, state: &CooldownState) -> bool {
        if self.ability_key != state.ability_key() || self.kind != state.kind() || !self.is_complete()
        {
            return false;
        }
        self.approx_eq(&Self::create(state))
    }

    fn approx_eq(&self, other: &Self) -> bool {
        let fields = self.fields;

        if fields.contains(SnapshotFields::COOLDOWN)
            && !(close(self.configured_cooldown, other.configured_cooldown)
                && close(self.current_countdown, other.current_countdown))
        {
            return false;
        }
        if fields.contains(SnapshotFields::PLAYBACK_SPEED)
            && !close(self.playback_speed, other.playback_speed)
        {
            return false;
        }
        if fields.contains(SnapshotFields::STAGE)
            && (self.current_stage != other.current_stage || self.max_stage != other.max_stage)
        {
            return false;
        }
        if fields.contains(SnapshotFields::WINDOW)
            && (self.in_window != other.in_window
                || !close(self.window_remaining, other.window_remaining))
        {
            return false;
        }
        if fields.contains(SnapshotFields::COMBO_STARTED) && self.combo_started != other.combo_started
        {
            return false;
        }
        if fields.contains(SnapshotFields::PLAYBACK)
            && !close(self.playback_time, other.playback_time)
        {
            return false;
        }
        if fields.contains(SnapshotFields::FIRED) && self.fired_mask != other.fired_mask {
            return false;
        }
        if fields.contains(SnapshotFields::RESET_WINDOW)
            && (self.reset_window_armed != other.reset_window_armed
                || !close(self.reset_window_remaining, other.reset_window_remaining))
        {
            return false;
        }
        true
    }
}

impl CooldownState {
    /// Writes this state into a caller-owned snapshot.
    ///
    /// Returns false and leaves the snapshot untouched if it belongs to a
    /// different ability.
    pub fn copy_to(&self, snapshot: &mut CooldownSnapshot) -> bool {
        if snapshot.ability_key != self.ability_key() {
            return false;
        }
        *snapshot = CooldownSnapshot::create(self);
        true
    }

    /// Overwrites every timing field with authoritative values.
    ///
    /// Returns false and changes nothing if the snapshot is for another
    /// ability or another variant, or does not carry the variant's full
    /// field set. Configuration (windows, keyframes) and pending events are
    /// kept; applying the same snapshot twice yields the same state.
    pub fn refresh(&mut self, snapshot: &CooldownSnapshot) -> bool {
        if snapshot.ability_key != self.ability_key()
            || snapshot.kind != self.kind()
            || !snapshot.is_complete()
        {
            return false;
        }

        self.set_playback_speed(snapshot.playback_speed);
        match self {
            CooldownState::Simple(simple) => {
                simple
                    .header
                    .overwrite(snapshot.configured_cooldown, snapshot.current_countdown);
            }
            CooldownState::ComboWindow(combo) => {
                combo
                    .header
                    .overwrite(snapshot.configured_cooldown, snapshot.current_countdown);
                combo.current_stage = snapshot.current_stage.min(combo.max_stage());
                combo.window_remaining = non_negative(snapshot.window_remaining);
                combo.in_window = snapshot.in_window;
            }
            CooldownState::KeyframeTimeline(timeline) => {
                timeline
                    .header
                    .overwrite(snapshot.configured_cooldown, snapshot.current_countdown);
                timeline.playback_time = non_negative(snapshot.playback_time);
                let known = FiredKeyframes::all(timeline.keyframes.len()).bits();
                timeline.fired = FiredKeyframes::from_bits(snapshot.fired_mask & known);
                timeline.reset_window_remaining = non_negative(snapshot.reset_window_remaining);
                timeline.reset_window_armed = snapshot.reset_window_armed;
            }
            CooldownState::KeyframeCombo(combo) => {
                combo
                    .header
                    .overwrite(snapshot.configured_cooldown, snapshot.current_countdown);
                combo.current_stage = snapshot.current_stage.min(combo.stage_count());
                combo.window_remaining = non_negative(snapshot.window_remaining);
                combo.in_window = snapshot.in_window;
                combo.combo_started = snapshot.combo_started;
                combo.playback_time = non_negative(snapshot.playback_time);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityKey, EventTag};
    use crate::cooldown::{Keyframe, TimingProfile};

    fn state(key: AbilityKey, profile: TimingProfile) -> CooldownState {
        CooldownState::from_profile(key, &profile).unwrap()
    }

    fn combo() -> CooldownState {
        state(
            AbilityKey::Attack,
            TimingProfile::ComboWindow {
                windows: vec![0.5, 0.5, 0.5],
                cooldown: 1.0,
            },
        )
    }

    fn timeline() -> CooldownState {
        state(
            AbilityKey::Skill2,
            TimingProfile::KeyframeTimeline {
                keyframes: vec![
                    Keyframe::new(0.1, 0.05, EventTag(1)),
                    Keyframe::new(0.3, 0.05, EventTag(2)).with_reset_window(0.5),
                    Keyframe::new(0.9, 0.05, EventTag(3)),
                ],
                cooldown: 0.0,
            },
        )
    }

    fn every_variant() -> Vec<CooldownState> {
        vec![
            state(AbilityKey::Roll, TimingProfile::Simple { cooldown: 2.0 }),
            combo(),
            timeline(),
            state(
                AbilityKey::HeavyAttack,
                TimingProfile::KeyframeCombo {
                    stages: vec![
                        Keyframe::new(0.2, 0.05, EventTag(1)),
                        Keyframe::new(0.2, 0.05, EventTag(2)).with_reset_window(0.4),
                    ],
                    cooldown: 1.0,
                },
            ),
        ]
    }

    #[test]
    fn fresh_snapshot_matches_its_state() {
        for state in &mut every_variant() {
            state.use_ability();
            state.update(0.25);
            let snapshot = CooldownSnapshot::create(state);
            assert!(snapshot.matches(state), "{:?}", state.kind());
        }
    }

    #[test]
    fn create_zeroes_unused_fields() {
        let mut simple = state(AbilityKey::Roll, TimingProfile::Simple { cooldown: 2.0 });
        simple.use_ability();

        let snapshot = CooldownSnapshot::create(&simple);
        assert_eq!(snapshot.current_countdown, 2.0);
        assert_eq!(snapshot.window_remaining, 0.0);
        assert_eq!(snapshot.max_stage, 0);
        assert_eq!(snapshot.fired_mask, 0);
        assert!(!snapshot.in_window);
    }

    #[test]
    fn matches_within_epsilon_only() {
        let mut state = combo();
        state.use_ability();
        let mut snapshot = CooldownSnapshot::create(&state);

        snapshot.window_remaining += 0.0005;
        assert!(snapshot.matches(&state));

        snapshot.window_remaining += 0.01;
        assert!(!snapshot.matches(&state));

        let mut staged = CooldownSnapshot::create(&state);
        staged.current_stage = 2;
        assert!(!staged.matches(&state));
    }

    #[test]
    fn copy_to_refuses_other_ability() {
        let state = combo();
        let mut foreign = CooldownSnapshot::empty(AbilityKey::Jump, state.kind());
        let before = foreign;

        assert!(!state.copy_to(&mut foreign));
        assert_eq!(foreign, before);

        let mut own = CooldownSnapshot::empty(AbilityKey::Attack, state.kind());
        assert!(state.copy_to(&mut own));
        assert!(own.matches(&state));
    }

    #[test]
    fn refresh_ignores_mismatched_snapshot() {
        let mut state = combo();
        let before = state.clone();

        let mut snapshot = CooldownSnapshot::create(&state);
        snapshot.ability_key = AbilityKey::Dash;
        snapshot.current_stage = 2;

        assert!(!state.refresh(&snapshot));
        assert_eq!(state, before);
    }

    #[test]
    fn refresh_overwrites_prediction_and_is_idempotent() {
        let mut authoritative = combo();
        authoritative.use_ability();
        let truth = CooldownSnapshot::create(&authoritative);

        let mut predicted = combo();
        predicted.use_ability();
        predicted.update(0.2);
        predicted.use_ability();
        assert_eq!(predicted.current_stage(), 2);

        assert!(predicted.refresh(&truth));
        let once = predicted.clone();
        assert!(predicted.refresh(&truth));

        assert_eq!(predicted, once);
        assert_eq!(predicted.current_stage(), 1);
        assert!(truth.matches(&predicted));
    }

    #[test]
    fn refresh_converges_every_variant_mid_cycle() {
        for (mut authoritative, mut predicted) in every_variant().into_iter().zip(every_variant()) {
            let kind = authoritative.kind();

            authoritative.use_ability();
            authoritative.update(0.25);
            authoritative.use_ability();
            authoritative.update(0.3);
            let truth = CooldownSnapshot::create(&authoritative);

            predicted.use_ability();
            predicted.update(0.05);
            predicted.set_playback_speed(2.0);

            assert!(predicted.refresh(&truth), "{kind:?}");
            let once = predicted.clone();
            assert!(predicted.refresh(&truth), "{kind:?}");
            assert_eq!(predicted, once, "{kind:?}");
            assert!(truth.matches(&predicted), "{kind:?}");

            authoritative.drain_events();
            predicted.drain_events();
            assert_eq!(predicted, authoritative, "{kind:?}");
        }
    }

    #[test]
    fn partial_snapshots_are_neither_compared_nor_applied() {
        let mut authoritative = combo();
        authoritative.use_ability();
        let mut partial = CooldownSnapshot::create(&authoritative);
        partial.fields = SnapshotFields::COOLDOWN;

        let mut local = combo();
        let before = local.clone();
        assert!(!partial.matches(&authoritative));
        assert!(!local.refresh(&partial));
        assert_eq!(local, before);
    }

    #[test]
    fn refresh_masks_unknown_fired_bits() {
        let mut state = timeline();
        let mut snapshot = CooldownSnapshot::create(&state);
        snapshot.fired_mask = 0xffff;

        assert!(state.refresh(&snapshot));
        match &state {
            CooldownState::KeyframeTimeline(timeline) => assert_eq!(timeline.fired().bits(), 0b111),
            other => panic!("unexpected variant {:?}", other.kind()),
        }
    }
}
