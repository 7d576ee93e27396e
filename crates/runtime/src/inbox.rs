//! Asynchronous command intake drained synchronously once per tick.
//!
//! Network tasks push envelopes through a cloneable [`CommandSender`]; the
//! tick loop owns the [`CommandInbox`] and calls [`CommandInbox::drain`],
//! which never blocks.

use ability_core::CommandEnvelope;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tracing::{debug, trace};

use crate::error::{Result, RuntimeError};

/// Creates a bounded sender/inbox pair.
pub fn command_channel(capacity: usize) -> (CommandSender, CommandInbox) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (CommandSender { tx }, CommandInbox { rx })
}

/// Producer half, held by network I/O tasks.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: mpsc::Sender<CommandEnvelope>,
}

impl CommandSender {
    /// Enqueues a command, waiting for capacity.
    pub async fn send(&self, command: CommandEnvelope) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::InboxClosed)
    }

    /// Enqueues a command without waiting.
    pub fn try_send(&self, command: CommandEnvelope) -> Result<()> {
        self.tx.try_send(command).map_err(|err| match err {
            TrySendError::Full(_) => RuntimeError::InboxFull,
            TrySendError::Closed(_) => RuntimeError::InboxClosed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, owned by the tick loop.
#[derive(Debug)]
pub struct CommandInbox {
    rx: mpsc::Receiver<CommandEnvelope>,
}

impl CommandInbox {
    /// Takes every queued command, ordered by tick.
    ///
    /// The sort is stable, so commands stamped with the same tick keep their
    /// arrival order.
    pub fn drain(&mut self) -> Vec<CommandEnvelope> {
        let mut commands = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(command) => commands.push(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    trace!(target: "runtime::inbox", "all senders dropped");
                    break;
                }
            }
        }

        commands.sort_by_key(|command| command.tick);
        if !commands.is_empty() {
            debug!(target: "runtime::inbox", count = commands.len(), "drained commands");
        }
        commands
    }

    /// Stops accepting new commands; already queued ones can still be drained.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ability_core::command::{AdvanceTimeCommand, CommandPayload};
    use ability_core::{Authority, CommandId, ConnectionId};

    fn advance(tick: i64, sequence: u16) -> CommandEnvelope {
        CommandEnvelope::new(
            ConnectionId(1),
            tick,
            CommandId::compose(false, 0, sequence),
            0,
            Authority::Client,
            CommandPayload::AdvanceTime(AdvanceTimeCommand { dt: 0.1 }),
        )
    }

    #[test]
    fn drain_orders_by_tick_and_keeps_arrival_order() {
        let (tx, mut inbox) = command_channel(8);
        tx.try_send(advance(3, 0)).unwrap();
        tx.try_send(advance(1, 1)).unwrap();
        tx.try_send(advance(3, 2)).unwrap();
        tx.try_send(advance(2, 3)).unwrap();

        let order: Vec<u16> = inbox.drain().iter().map(|c| c.command_id.sequence()).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn full_inbox_is_reported() {
        let (tx, _inbox) = command_channel(1);
        tx.try_send(advance(0, 0)).unwrap();
        assert!(matches!(
            tx.try_send(advance(0, 1)),
            Err(RuntimeError::InboxFull)
        ));
    }

    #[test]
    fn closed_inbox_is_reported() {
        let (tx, mut inbox) = command_channel(4);
        tx.try_send(advance(0, 0)).unwrap();
        inbox.close();

        assert!(matches!(
            tx.try_send(advance(0, 1)),
            Err(RuntimeError::InboxClosed)
        ));
        assert_eq!(inbox.drain().len(), 1);
    }
}
