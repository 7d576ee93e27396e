//! Timing profiles - the data each cooldown state is constructed from.
//!
//! Profiles are plain data loaded from content files and handed to
//! [`CooldownState::from_profile`](super::CooldownState::from_profile). Nothing
//! here is process-wide; two actors may run the same ability with different
//! profiles.

use crate::ability::EventTag;
use crate::error::{ErrorSeverity, GameError};

/// A point on an animation timeline at which a gameplay event occurs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Keyframe {
    /// Playback time (seconds) at which the keyframe fires.
    pub trigger_offset: f32,

    /// Half-width of the band around `trigger_offset` that counts as a hit.
    pub tolerance: f32,

    /// Tag emitted on the event stream.
    pub event_tag: EventTag,

    /// Whether reaching this keyframe arms a reset window.
    pub opens_reset_window: bool,

    /// Length of the window armed by this keyframe, in seconds.
    pub reset_window_duration: f32,
}

impl Keyframe {
    pub fn new(trigger_offset: f32, tolerance: f32, event_tag: EventTag) -> Self {
        Self {
            trigger_offset,
            tolerance,
            event_tag,
            opens_reset_window: false,
            reset_window_duration: 0.0,
        }
    }

    /// Marks this keyframe as opening a reset window of `duration` seconds.
    pub fn with_reset_window(mut self, duration: f32) -> Self {
        self.opens_reset_window = true;
        self.reset_window_duration = duration;
        self
    }

    /// Lower edge of the trigger band.
    #[inline]
    pub fn band_start(&self) -> f32 {
        self.trigger_offset - self.tolerance
    }

    /// Upper edge of the trigger band.
    #[inline]
    pub fn band_end(&self) -> f32 {
        self.trigger_offset + self.tolerance
    }

    /// True if the playback step `[from, to]` touches this keyframe's band.
    ///
    /// Catches bands that a coarse step jumps over entirely, not only bands
    /// that contain the end point.
    pub fn reached(&self, from: f32, to: f32) -> bool {
        to >= self.band_start() && from <= self.band_end()
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if self.trigger_offset < 0.0 {
            return Err(ProfileError::NegativeDuration {
                field: "trigger_offset",
            });
        }
        if self.tolerance < 0.0 {
            return Err(ProfileError::NegativeDuration { field: "tolerance" });
        }
        if self.reset_window_duration < 0.0 {
            return Err(ProfileError::NegativeDuration {
                field: "reset_window_duration",
            });
        }
        Ok(())
    }
}

/// Complete timing specification for one ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimingProfile {
    /// Plain cooldown.
    Simple { cooldown: f32 },

    /// Multi-stage combo advanced by input inside bounded windows.
    ComboWindow { windows: Vec<f32>, cooldown: f32 },

    /// Availability and events driven by elapsed animation time.
    KeyframeTimeline {
        keyframes: Vec<Keyframe>,
        cooldown: f32,
    },

    /// Combo whose stages are gated by reaching each stage's keyframe.
    KeyframeCombo { stages: Vec<Keyframe>, cooldown: f32 },
}

impl TimingProfile {
    /// The configured cooldown, whatever the shape.
    pub fn cooldown(&self) -> f32 {
        match self {
            Self::Simple { cooldown }
            | Self::ComboWindow { cooldown, .. }
            | Self::KeyframeTimeline { cooldown, .. }
            | Self::KeyframeCombo { cooldown, .. } => *cooldown,
        }
    }

    /// Checks durations and capacities without building a state.
    pub fn validate(&self) -> Result<(), ProfileError> {
        use crate::config::EngineConfig;

        if self.cooldown() < 0.0 {
            return Err(ProfileError::NegativeDuration { field: "cooldown" });
        }

        match self {
            Self::Simple { .. } => Ok(()),
            Self::ComboWindow { windows, .. } => {
                if windows.is_empty() {
                    return Err(ProfileError::EmptyCombo);
                }
                if windows.len() > EngineConfig::MAX_COMBO_STAGES {
                    return Err(ProfileError::TooManyStages {
                        count: windows.len(),
                        max: EngineConfig::MAX_COMBO_STAGES,
                    });
                }
                if windows.iter().any(|w| *w < 0.0) {
                    return Err(ProfileError::NegativeDuration { field: "window" });
                }
                Ok(())
            }
            Self::KeyframeTimeline { keyframes, .. } => {
                if keyframes.len() > EngineConfig::MAX_KEYFRAMES {
                    return Err(ProfileError::TooManyKeyframes {
                        count: keyframes.len(),
                        max: EngineConfig::MAX_KEYFRAMES,
                    });
                }
                keyframes.iter().try_for_each(Keyframe::validate)
            }
            Self::KeyframeCombo { stages, .. } => {
                if stages.is_empty() {
                    return Err(ProfileError::EmptyCombo);
                }
                if stages.len() > EngineConfig::MAX_COMBO_STAGES {
                    return Err(ProfileError::TooManyStages {
                        count: stages.len(),
                        max: EngineConfig::MAX_COMBO_STAGES,
                    });
                }
                stages.iter().try_for_each(Keyframe::validate)
            }
        }
    }
}

/// Errors raised when a timing profile cannot be turned into a state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("{field} must not be negative")]
    NegativeDuration { field: &'static str },

    #[error("combo configures {count} stages, at most {max} are supported")]
    TooManyStages { count: usize, max: usize },

    #[error("timeline configures {count} keyframes, at most {max} are supported")]
    TooManyKeyframes { count: usize, max: usize },

    #[error("combo profile has no stages")]
    EmptyCombo,
}

impl GameError for ProfileError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeDuration { .. } => "PROFILE_NEGATIVE_DURATION",
            Self::TooManyStages { .. } => "PROFILE_TOO_MANY_STAGES",
            Self::TooManyKeyframes { .. } => "PROFILE_TOO_MANY_KEYFRAMES",
            Self::EmptyCombo => "PROFILE_EMPTY_COMBO",
        }
    }
}
