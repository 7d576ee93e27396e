//! Deterministic rolls for condition probabilities.
//!
//! Client prediction and the authoritative server must agree on every roll,
//! so a roll is a pure function of a seed and the seed is derived from data
//! both sides already share (game seed, tick, connection, trigger).

/// Source of deterministic random values.
///
/// Implementations must return the same value for the same seed.
pub trait RollOracle: Send + Sync {
    /// Generates a 32-bit value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)`.
    fn roll_unit(&self, seed: u64) -> f32 {
        // 24 bits keep the result exactly representable in an f32.
        (self.next_u32(seed) >> 8) as f32 / (1u32 << 24) as f32
    }

    /// True with the given probability. `>= 1` always passes, `<= 0` never does.
    fn chance(&self, seed: u64, probability: f32) -> bool {
        if probability >= 1.0 {
            return true;
        }
        if probability <= 0.0 || probability.is_nan() {
            return false;
        }
        self.roll_unit(seed) < probability
    }
}

/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RollOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Derives the seed of one condition roll.
///
/// `context` separates independent rolls made for the same event (typically
/// the index of the checker being evaluated).
pub fn compute_seed(game_seed: u64, tick: i64, connection: u32, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= (tick as u64).wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(connection).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    // SplitMix-style avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
