//! Oracles the engine consults but does not own.
//!
//! The connection registry and the random source live outside the core; the
//! engine only sees these traits so client and server can plug in their own.
mod authority;
mod rng;

pub use authority::AuthorityOracle;
pub use rng::{PcgRng, RollOracle, compute_seed};
