//! Timing state owned by one actor slot.

use std::collections::BTreeMap;

use ability_content::{AbilityTable, ConditionSpec};
use ability_core::{
    AbilityKey, ConditionChecker, ConditionEvent, ConditionOutcome, ConnectionId, Cooldown,
    CooldownSnapshot, CooldownState, KeyframeEvent, ProfileError, RollOracle,
};

/// Result of asking an actor to use an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UseResult {
    Used,
    NotReady,
    /// The actor has no timing state for this ability.
    Unknown,
}

/// A condition that fired, by its index in the actor's condition list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggeredCondition {
    pub index: usize,
    pub outcome: ConditionOutcome,
}

/// Every cooldown state and condition checker of one actor.
///
/// Owned exclusively by the actor's simulation slot; the engine serializes
/// access per actor.
#[derive(Clone, Debug)]
pub struct ActorTimers {
    connection: ConnectionId,
    states: BTreeMap<AbilityKey, CooldownState>,
    conditions: Vec<ConditionChecker>,
}

impl ActorTimers {
    pub fn new(
        connection: ConnectionId,
        abilities: &AbilityTable,
        conditions: &[ConditionSpec],
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            connection,
            states: abilities.instantiate()?,
            conditions: conditions.iter().map(ConditionSpec::build).collect(),
        })
    }

    /// A fresh copy of this timer set assigned to another connection.
    pub fn for_connection(&self, connection: ConnectionId) -> Self {
        Self {
            connection,
            ..self.clone()
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn state(&self, key: AbilityKey) -> Option<&CooldownState> {
        self.states.get(&key)
    }

    pub fn states(&self) -> impl Iterator<Item = &CooldownState> {
        self.states.values()
    }

    pub fn conditions(&self) -> &[ConditionChecker] {
        &self.conditions
    }

    pub fn use_ability(&mut self, key: AbilityKey) -> UseResult {
        match self.states.get_mut(&key) {
            None => UseResult::Unknown,
            Some(state) => {
                if state.use_ability() {
                    UseResult::Used
                } else {
                    UseResult::NotReady
                }
            }
        }
    }

    /// Sets the playback speed of one ability. Returns false if unknown.
    pub fn set_playback_speed(&mut self, key: AbilityKey, multiplier: f32) -> bool {
        let Some(state) = self.states.get_mut(&key) else {
            return false;
        };
        state.set_playback_speed(multiplier);
        true
    }

    /// Advances every state and condition by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for state in self.states.values_mut() {
            state.update(dt);
        }
        for condition in &mut self.conditions {
            condition.update(dt);
        }
    }

    /// Evaluates every condition against `event`.
    ///
    /// `seed_for` derives the roll seed from the condition index, so each
    /// checker rolls independently.
    pub fn check_conditions<R>(
        &mut self,
        event: &ConditionEvent,
        seed_for: impl Fn(usize) -> u64,
        rng: &R,
    ) -> Vec<TriggeredCondition>
    where
        R: RollOracle + ?Sized,
    {
        self.conditions
            .iter_mut()
            .enumerate()
            .filter_map(|(index, condition)| {
                condition
                    .check(event, seed_for(index), rng)
                    .map(|outcome| TriggeredCondition { index, outcome })
            })
            .collect()
    }

    /// Keyframe events emitted by every state since the last drain.
    pub fn drain_events(&mut self) -> Vec<KeyframeEvent> {
        self.states
            .values_mut()
            .flat_map(CooldownState::drain_events)
            .collect()
    }

    pub fn snapshot(&self, key: AbilityKey) -> Option<CooldownSnapshot> {
        self.states.get(&key).map(CooldownSnapshot::create)
    }

    pub fn snapshots(&self) -> Vec<CooldownSnapshot> {
        self.states.values().map(CooldownSnapshot::create).collect()
    }

    /// Applies an authoritative snapshot. Returns false if no state accepted it.
    pub fn refresh(&mut self, snapshot: &CooldownSnapshot) -> bool {
        self.states
            .get_mut(&snapshot.ability_key)
            .is_some_and(|state| state.refresh(snapshot))
    }
}
