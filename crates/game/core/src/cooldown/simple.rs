//! Plain cooldown: use, wait, use again.

use super::Cooldown;
use super::header::{CooldownHeader, non_negative};
use crate::ability::AbilityKey;

/// Ability gated only by a countdown.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleCooldown {
    pub(crate) ability_key: AbilityKey,
    pub(crate) playback_speed: f32,
    pub(crate) header: CooldownHeader,
}

impl SimpleCooldown {
    pub fn new(ability_key: AbilityKey, cooldown: f32) -> Self {
        Self {
            ability_key,
            playback_speed: 1.0,
            header: CooldownHeader::new(cooldown),
        }
    }

    pub fn header(&self) -> &CooldownHeader {
        &self.header
    }

    pub fn set_playback_speed(&mut self, multiplier: f32) {
        self.playback_speed = non_negative(multiplier);
    }
}

impl Cooldown for SimpleCooldown {
    fn ability_key(&self) -> AbilityKey {
        self.ability_key
    }

    fn is_ready(&self) -> bool {
        self.header.is_ready()
    }

    fn use_ability(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.header.start();
        true
    }

    fn update(&mut self, dt: f32) {
        self.header.tick(dt);
    }
}
