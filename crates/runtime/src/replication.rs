//! Snapshot replication from the authoritative side.
//!
//! Every tick the tracker sends the states that changed since they were last
//! sent; every `snapshot_interval_ticks` it sends everything so receivers
//! recover from lost batches. Batches travel as bincode envelopes around the
//! pinned 37-byte snapshot records.

use std::collections::BTreeMap;

use ability_core::snapshot::SNAPSHOT_WIRE_LEN;
use ability_core::{AbilityKey, ConnectionId, Cooldown, CooldownSnapshot};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::actor::ActorTimers;
use crate::error::{Result, RuntimeError};

/// Snapshots of one actor produced on one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotBatch {
    pub tick: i64,
    pub connection: ConnectionId,
    /// True if the batch carries every state of the actor.
    pub full: bool,
    pub snapshots: Vec<CooldownSnapshot>,
}

#[derive(Serialize, Deserialize)]
struct WireBatch {
    tick: i64,
    connection: u32,
    full: bool,
    records: Vec<u8>,
}

impl SnapshotBatch {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let records = self
            .snapshots
            .iter()
            .flat_map(|snapshot| snapshot.encode())
            .collect();
        let wire = WireBatch {
            tick: self.tick,
            connection: self.connection.0,
            full: self.full,
            records,
        };
        Ok(bincode::serialize(&wire)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let wire: WireBatch = bincode::deserialize(bytes)?;
        if wire.records.len() % SNAPSHOT_WIRE_LEN != 0 {
            return Err(RuntimeError::RecordAlignment {
                len: wire.records.len(),
            });
        }

        let snapshots = wire
            .records
            .chunks_exact(SNAPSHOT_WIRE_LEN)
            .map(CooldownSnapshot::decode)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            tick: wire.tick,
            connection: ConnectionId(wire.connection),
            full: wire.full,
            snapshots,
        })
    }
}

/// Remembers what each receiver was last sent.
#[derive(Clone, Debug)]
pub struct SnapshotTracker {
    interval_ticks: u64,
    last_sent: BTreeMap<(ConnectionId, AbilityKey), CooldownSnapshot>,
}

impl SnapshotTracker {
    pub fn new(interval_ticks: u64) -> Self {
        Self {
            interval_ticks: interval_ticks.max(1),
            last_sent: BTreeMap::new(),
        }
    }

    /// True if `tick` is a full-batch tick.
    pub fn is_full_tick(&self, tick: i64) -> bool {
        tick.rem_euclid(self.interval_ticks as i64) == 0
    }

    /// Builds the batch to send for `actor` on `tick`, if any.
    pub fn collect(&mut self, tick: i64, actor: &ActorTimers) -> Option<SnapshotBatch> {
        let connection = actor.connection();
        let full = self.is_full_tick(tick);

        let mut snapshots = Vec::new();
        for state in actor.states() {
            let key = (connection, state.ability_key());
            let changed = self
                .last_sent
                .get(&key)
                .is_none_or(|sent| !sent.matches(state));
            if full || changed {
                let snapshot = CooldownSnapshot::create(state);
                self.last_sent.insert(key, snapshot);
                snapshots.push(snapshot);
            }
        }

        if snapshots.is_empty() {
            return None;
        }

        trace!(
            target: "runtime::replication",
            connection = %connection,
            tick,
            full,
            count = snapshots.len(),
            "collected snapshot batch"
        );
        Some(SnapshotBatch {
            tick,
            connection,
            full,
            snapshots,
        })
    }

    /// Drops everything remembered for a connection.
    pub fn forget(&mut self, connection: ConnectionId) {
        self.last_sent.retain(|(owner, _), _| *owner != connection);
    }
}
