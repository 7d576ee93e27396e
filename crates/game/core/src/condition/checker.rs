use super::{ConditionEvent, ConditionHeader, ConditionOutcome, TriggerType};
use crate::ability::AbilityKey;
use crate::cooldown::{CooldownHeader, non_negative};
use crate::env::RollOracle;

/// Variant-specific predicate of a checker.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionKind {
    Attack,
    Hit,
    /// Any skill, or only `ability` when set.
    Skill { ability: Option<AbilityKey> },
    /// `required` kills within `window` seconds of the first one. A window of
    /// zero never expires.
    Kill { required: u32, window: f32 },
    /// HP ratio strictly below `threshold`.
    HpBelow { threshold: f32 },
    /// MP ratio strictly below `threshold`.
    MpBelow { threshold: f32 },
    Critical,
    Dodge,
}

impl ConditionKind {
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            Self::Attack => TriggerType::Attack,
            Self::Hit => TriggerType::Hit,
            Self::Skill { .. } => TriggerType::Skill,
            Self::Kill { .. } => TriggerType::Kill,
            Self::HpBelow { .. } => TriggerType::HpChanged,
            Self::MpBelow { .. } => TriggerType::MpChanged,
            Self::Critical => TriggerType::Critical,
            Self::Dodge => TriggerType::Dodge,
        }
    }
}

/// One trigger condition with its rate limiting state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionChecker {
    header: ConditionHeader,
    kind: ConditionKind,
    cooldown: CooldownHeader,
    matched: u32,
    kills: u32,
    /// Seconds left in the current kill window.
    kill_deadline: Option<f32>,
}

impl ConditionChecker {
    /// Builds a checker. The header's trigger type is taken from `kind`.
    pub fn new(mut header: ConditionHeader, kind: ConditionKind, cooldown: f32) -> Self {
        header.trigger_type = kind.trigger_type();
        Self {
            header,
            kind,
            cooldown: CooldownHeader::new(cooldown),
            matched: 0,
            kills: 0,
            kill_deadline: None,
        }
    }

    pub fn header(&self) -> &ConditionHeader {
        &self.header
    }

    pub fn kind(&self) -> &ConditionKind {
        &self.kind
    }

    pub fn cooldown(&self) -> &CooldownHeader {
        &self.cooldown
    }

    pub fn kills_in_window(&self) -> u32 {
        self.kills
    }

    /// Evaluates `event`; returns the outcome if the condition fires.
    ///
    /// Gates in order: trigger type, kind predicate, interval, cooldown,
    /// probability roll. Firing starts the cooldown.
    pub fn check<R>(&mut self, event: &ConditionEvent, seed: u64, rng: &R) -> Option<ConditionOutcome>
    where
        R: RollOracle + ?Sized,
    {
        if event.trigger_type() != self.header.trigger_type || !self.predicate(event) {
            return None;
        }

        self.matched = self.matched.wrapping_add(1);
        if self.header.interval > 1 && self.matched % self.header.interval != 0 {
            return None;
        }

        if !self.cooldown.is_ready() || !rng.chance(seed, self.header.probability) {
            return None;
        }

        self.cooldown.start();
        Some(self.header.outcome())
    }

    /// Ticks the cooldown and expires a lapsed kill window.
    pub fn update(&mut self, dt: f32) {
        let dt = non_negative(dt);
        self.cooldown.tick(dt);

        if let Some(remaining) = self.kill_deadline {
            let remaining = non_negative(remaining - dt);
            if remaining <= 0.0 {
                self.kills = 0;
                self.kill_deadline = None;
            } else {
                self.kill_deadline = Some(remaining);
            }
        }
    }

    fn predicate(&mut self, event: &ConditionEvent) -> bool {
        match (self.kind, *event) {
            (ConditionKind::Skill { ability: Some(wanted) }, ConditionEvent::Skill { ability }) => {
                wanted == ability
            }
            (ConditionKind::Kill { required, window }, ConditionEvent::Kill { .. }) => {
                self.kills += 1;
                if window > 0.0 && self.kill_deadline.is_none() {
                    self.kill_deadline = Some(window);
                }
                if self.kills < required.max(1) {
                    return false;
                }
                self.kills = 0;
                self.kill_deadline = None;
                true
            }
            (ConditionKind::HpBelow { threshold }, ConditionEvent::HpChanged { ratio })
            | (ConditionKind::MpBelow { threshold }, ConditionEvent::MpChanged { ratio }) => {
                ratio < threshold
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::TargetType;
    use crate::env::PcgRng;

    fn attack_event() -> ConditionEvent {
        ConditionEvent::Attack {
            ability: AbilityKey::Attack,
            target: 7,
        }
    }

    #[test]
    fn fires_then_waits_for_cooldown() {
        let header = ConditionHeader::new(TriggerType::Attack).with_target(TargetType::EventTarget, 1);
        let mut checker = ConditionChecker::new(header, ConditionKind::Attack, 2.0);

        let outcome = checker.check(&attack_event(), 1, &PcgRng).unwrap();
        assert_eq!(outcome.target_type, TargetType::EventTarget);
        assert!(checker.check(&attack_event(), 2, &PcgRng).is_none());

        checker.update(2.0);
        assert!(checker.check(&attack_event(), 3, &PcgRng).is_some());
    }

    #[test]
    fn ignores_other_trigger_types() {
        let mut checker =
            ConditionChecker::new(ConditionHeader::new(TriggerType::Hit), ConditionKind::Hit, 0.0);
        assert!(checker.check(&attack_event(), 1, &PcgRng).is_none());
        assert!(checker.check(&ConditionEvent::Hit { attacker: 3 }, 1, &PcgRng).is_some());
    }

    #[test]
    fn interval_counts_matching_events() {
        let header = ConditionHeader::new(TriggerType::Attack).with_interval(3);
        let mut checker = ConditionChecker::new(header, ConditionKind::Attack, 0.0);

        let fired: Vec<bool> = (0..6)
            .map(|seed| checker.check(&attack_event(), seed, &PcgRng).is_some())
            .collect();
        assert_eq!(fired, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn probability_roll_is_deterministic() {
        let header = ConditionHeader::new(TriggerType::Attack).with_probability(0.5);
        let mut a = ConditionChecker::new(header.clone(), ConditionKind::Attack, 0.0);
        let mut b = ConditionChecker::new(header, ConditionKind::Attack, 0.0);

        let rolls_a: Vec<bool> = (0..100)
            .map(|seed| a.check(&attack_event(), seed, &PcgRng).is_some())
            .collect();
        let rolls_b: Vec<bool> = (0..100)
            .map(|seed| b.check(&attack_event(), seed, &PcgRng).is_some())
            .collect();

        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().any(|fired| *fired));
        assert!(rolls_a.iter().any(|fired| !*fired));
    }

    #[test]
    fn skill_filter() {
        let mut checker = ConditionChecker::new(
            ConditionHeader::new(TriggerType::Skill),
            ConditionKind::Skill {
                ability: Some(AbilityKey::Ultimate),
            },
            0.0,
        );
        let skill1 = ConditionEvent::Skill {
            ability: AbilityKey::Skill1,
        };
        let ultimate = ConditionEvent::Skill {
            ability: AbilityKey::Ultimate,
        };
        assert!(checker.check(&skill1, 0, &PcgRng).is_none());
        assert!(checker.check(&ultimate, 0, &PcgRng).is_some());
    }

    #[test]
    fn kills_must_land_inside_the_window() {
        let mut checker = ConditionChecker::new(
            ConditionHeader::new(TriggerType::Kill),
            ConditionKind::Kill {
                required: 2,
                window: 5.0,
            },
            0.0,
        );
        let kill = ConditionEvent::Kill { victim: 9 };

        assert!(checker.check(&kill, 0, &PcgRng).is_none());
        checker.update(6.0);
        assert_eq!(checker.kills_in_window(), 0);

        assert!(checker.check(&kill, 1, &PcgRng).is_none());
        checker.update(4.0);
        assert!(checker.check(&kill, 2, &PcgRng).is_some());
        assert_eq!(checker.kills_in_window(), 0);
    }

    #[test]
    fn hp_threshold() {
        let mut checker = ConditionChecker::new(
            ConditionHeader::new(TriggerType::HpChanged),
            ConditionKind::HpBelow { threshold: 0.3 },
            0.0,
        );
        assert!(
            checker
                .check(&ConditionEvent::HpChanged { ratio: 0.5 }, 0, &PcgRng)
                .is_none()
        );
        assert!(
            checker
                .check(&ConditionEvent::HpChanged { ratio: 0.2 }, 0, &PcgRng)
                .is_some()
        );
    }
}
