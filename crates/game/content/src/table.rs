//! In-memory content tables.

use std::collections::BTreeMap;

use ability_core::{
    AbilityKey, ConditionChecker, ConditionHeader, ConditionKind, CooldownState, ProfileError,
    TargetType, TimingProfile,
};

/// Timing profile of every ability an actor may use.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbilityTable {
    profiles: BTreeMap<AbilityKey, TimingProfile>,
}

impl AbilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the profile of `key`. Returns the replaced profile.
    pub fn insert(&mut self, key: AbilityKey, profile: TimingProfile) -> Option<TimingProfile> {
        self.profiles.insert(key, profile)
    }

    pub fn get(&self, key: AbilityKey) -> Option<&TimingProfile> {
        self.profiles.get(&key)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AbilityKey, &TimingProfile)> {
        self.profiles.iter().map(|(key, profile)| (*key, profile))
    }

    /// Builds a fresh timing state for every ability.
    pub fn instantiate(&self) -> Result<BTreeMap<AbilityKey, CooldownState>, ProfileError> {
        self.iter()
            .map(|(key, profile)| Ok((key, CooldownState::from_profile(key, profile)?)))
            .collect()
    }
}

impl FromIterator<(AbilityKey, TimingProfile)> for AbilityTable {
    fn from_iter<T: IntoIterator<Item = (AbilityKey, TimingProfile)>>(iter: T) -> Self {
        Self {
            profiles: iter.into_iter().collect(),
        }
    }
}

fn default_interval() -> u32 {
    1
}

fn default_probability() -> f32 {
    1.0
}

fn default_target_count() -> u8 {
    1
}

/// Content description of one condition checker.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionSpec {
    pub kind: ConditionKind,

    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: f32,

    #[cfg_attr(feature = "serde", serde(default = "default_interval"))]
    pub interval: u32,

    #[cfg_attr(feature = "serde", serde(default = "default_probability"))]
    pub probability: f32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub target_type: TargetType,

    #[cfg_attr(feature = "serde", serde(default = "default_target_count"))]
    pub target_count: u8,

    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<f32>,
}

impl ConditionSpec {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            cooldown: 0.0,
            interval: default_interval(),
            probability: default_probability(),
            target_type: TargetType::default(),
            target_count: default_target_count(),
            params: Vec::new(),
        }
    }

    /// Builds the runtime checker. Parameters beyond the header capacity are dropped.
    pub fn build(&self) -> ConditionChecker {
        let mut header = ConditionHeader::new(self.kind.trigger_type())
            .with_interval(self.interval)
            .with_probability(self.probability)
            .with_target(self.target_type, self.target_count);
        header.params = self
            .params
            .iter()
            .copied()
            .take(header.params.capacity())
            .collect();
        ConditionChecker::new(header, self.kind, self.cooldown)
    }
}
