/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Maximum allowed distance between a command timestamp and the local
    /// clock, in milliseconds. Bounds how out-of-order delivery may be.
    pub timestamp_tolerance_ms: u64,

    /// Ticks between full snapshot batches. Changed states are sent every tick
    /// regardless.
    pub snapshot_interval_ticks: u64,

    /// Base seed for deterministic condition rolls. Client and server must agree.
    pub game_seed: u64,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of stages a combo may configure.
    pub const MAX_COMBO_STAGES: usize = 8;
    /// Maximum number of keyframes on a timeline (fits the 16-bit fired mask).
    pub const MAX_KEYFRAMES: usize = 16;
    /// Maximum number of condition parameters carried by a checker header.
    pub const MAX_CONDITION_PARAMS: usize = 4;
    /// Maximum number of targets an attack or skill command may name.
    pub const MAX_COMMAND_TARGETS: usize = 16;
    /// Maximum chat message length in bytes.
    pub const MAX_CHAT_LEN: usize = 256;

    /// Absolute tolerance used when comparing floating fields against a snapshot.
    pub const SNAPSHOT_EPSILON: f32 = 0.001;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TIMESTAMP_TOLERANCE_MS: u64 = 5_000;
    pub const DEFAULT_SNAPSHOT_INTERVAL_TICKS: u64 = 30;

    pub fn new() -> Self {
        Self {
            timestamp_tolerance_ms: Self::DEFAULT_TIMESTAMP_TOLERANCE_MS,
            snapshot_interval_ticks: Self::DEFAULT_SNAPSHOT_INTERVAL_TICKS,
            game_seed: 0,
        }
    }

    pub fn with_timestamp_tolerance(mut self, tolerance_ms: u64) -> Self {
        self.timestamp_tolerance_ms = tolerance_ms;
        self
    }

    pub fn with_snapshot_interval(mut self, ticks: u64) -> Self {
        self.snapshot_interval_ticks = ticks;
        self
    }

    pub fn with_game_seed(mut self, seed: u64) -> Self {
        self.game_seed = seed;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
