/// Enumerated command kinds.
///
/// The numeric code travels in the envelope header; codes are never reused.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u16)]
pub enum CommandType {
    Property = 1,
    Animation = 2,
    Attack = 3,
    Skill = 4,
    AbilityUse = 5,
    AdvanceTime = 6,
    Input = 7,
    Move = 8,
    Jump = 9,
    Roll = 10,
    ItemUse = 11,
    ItemPickup = 12,
    ItemDrop = 13,
    Equip = 14,
    Interaction = 15,
    Emote = 16,
    Chat = 17,
    Respawn = 18,
    Trigger = 19,
    SnapshotRequest = 20,
}

impl CommandType {
    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        let kind = match code {
            1 => Self::Property,
            2 => Self::Animation,
            3 => Self::Attack,
            4 => Self::Skill,
            5 => Self::AbilityUse,
            6 => Self::AdvanceTime,
            7 => Self::Input,
            8 => Self::Move,
            9 => Self::Jump,
            10 => Self::Roll,
            11 => Self::ItemUse,
            12 => Self::ItemPickup,
            13 => Self::ItemDrop,
            14 => Self::Equip,
            15 => Self::Interaction,
            16 => Self::Emote,
            17 => Self::Chat,
            18 => Self::Respawn,
            19 => Self::Trigger,
            20 => Self::SnapshotRequest,
            _ => return None,
        };
        Some(kind)
    }

    /// Commands a client may never issue: they drive simulation time.
    pub const fn is_server_only(self) -> bool {
        matches!(self, Self::AdvanceTime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_round_trip() {
        for kind in CommandType::iter() {
            assert_eq!(CommandType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(CommandType::from_code(0), None);
        assert_eq!(CommandType::from_code(21), None);
    }
}
