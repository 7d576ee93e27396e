//! The countdown primitive shared by every timing state and condition checker.

/// A configured cooldown and the time left on it.
///
/// Both fields are seconds and are never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownHeader {
    pub configured_cooldown: f32,
    pub current_countdown: f32,
}

impl CooldownHeader {
    pub fn new(configured_cooldown: f32) -> Self {
        Self {
            configured_cooldown: non_negative(configured_cooldown),
            current_countdown: 0.0,
        }
    }

    /// True when no cooldown is configured or the countdown has elapsed.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.configured_cooldown == 0.0 || self.current_countdown <= 0.0
    }

    /// True while the countdown is still running.
    #[inline]
    pub fn is_cooling_down(&self) -> bool {
        self.current_countdown > 0.0
    }

    /// Enters the full configured cooldown.
    pub fn start(&mut self) {
        self.current_countdown = self.configured_cooldown;
    }

    /// Advances the countdown by `dt` seconds.
    ///
    /// Returns true if this step brought the countdown to zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        let was_running = self.current_countdown > 0.0;
        self.current_countdown = non_negative(self.current_countdown - non_negative(dt));
        was_running && self.current_countdown <= 0.0
    }

    /// Cancels any running countdown.
    pub fn clear(&mut self) {
        self.current_countdown = 0.0;
    }

    /// Overwrites both fields from authoritative values.
    pub fn overwrite(&mut self, configured_cooldown: f32, current_countdown: f32) {
        self.configured_cooldown = non_negative(configured_cooldown);
        self.current_countdown = non_negative(current_countdown);
    }
}

/// Clamps negative (and NaN) input to zero.
///
/// Negative deltas and multipliers come from timing jitter; they are corrected,
/// not rejected.
#[inline]
pub fn non_negative(value: f32) -> f32 {
    if value > 0.0 { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_configured_is_always_ready() {
        let mut header = CooldownHeader::new(0.0);
        header.start();
        assert!(header.is_ready());
    }

    #[test]
    fn tick_clamps_at_zero_and_reports_expiry() {
        let mut header = CooldownHeader::new(1.0);
        header.start();
        assert!(!header.tick(0.4));
        assert!(header.tick(5.0));
        assert_eq!(header.current_countdown, 0.0);
        assert!(!header.tick(1.0));
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut header = CooldownHeader::new(2.0);
        header.start();
        header.tick(-3.0);
        assert_eq!(header.current_countdown, 2.0);
    }
}
