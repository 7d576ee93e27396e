//! Tick-loop orchestration for ability timing.
//!
//! This crate drives `ability-core` from an outer fixed-rate loop. Network
//! tasks push commands into a [`CommandInbox`]; once per tick the
//! [`TimingEngine`] drains it, validates and applies each command to the
//! issuing actor's timers, and collects the snapshots to replicate. A
//! predictive engine applies the same commands locally and reconciles
//! against batches received from the authoritative one.
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the engine and command routing
//! - [`actor`] holds one actor's cooldown states and condition checkers
//! - [`inbox`] is the async command intake
//! - [`replication`] tracks what to send and frames snapshot batches
//! - [`registry`] and [`clock`] back authority and timestamp validation
pub mod actor;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod inbox;
pub mod registry;
pub mod replication;

pub use actor::{ActorTimers, TriggeredCondition, UseResult};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RuntimeConfig, SimulationRole};
pub use engine::{CommandEffect, CommandOutcome, TickReport, TimingEngine};
pub use error::{Result, RuntimeError};
pub use inbox::{CommandInbox, CommandSender, command_channel};
pub use registry::ConnectionRegistry;
pub use replication::{SnapshotBatch, SnapshotTracker};
