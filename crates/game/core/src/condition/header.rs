use arrayvec::ArrayVec;

use super::{ConditionOutcome, TargetType, TriggerType};
use crate::config::EngineConfig;

/// Free-form numeric parameters handed to the effect layer.
pub type ConditionParams = ArrayVec<f32, { EngineConfig::MAX_CONDITION_PARAMS }>;

/// Static configuration shared by every checker kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionHeader {
    pub trigger_type: TriggerType,

    /// Fire on every `interval`-th matching event. `0` and `1` both mean every event.
    pub interval: u32,

    /// Chance in `[0, 1]` that a matching event fires.
    pub probability: f32,

    pub target_type: TargetType,
    pub target_count: u8,

    #[cfg_attr(feature = "serde", serde(default))]
    pub params: ConditionParams,
}

impl ConditionHeader {
    pub fn new(trigger_type: TriggerType) -> Self {
        Self {
            trigger_type,
            interval: 1,
            probability: 1.0,
            target_type: TargetType::Owner,
            target_count: 1,
            params: ConditionParams::new(),
        }
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_target(mut self, target_type: TargetType, target_count: u8) -> Self {
        self.target_type = target_type;
        self.target_count = target_count;
        self
    }

    pub(crate) fn outcome(&self) -> ConditionOutcome {
        ConditionOutcome {
            target_type: self.target_type,
            target_count: self.target_count,
        }
    }
}
