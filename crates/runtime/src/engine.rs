//! The timing engine driven by the outer tick loop.
//!
//! [`TimingEngine`] owns every actor's timers plus the connection registry.
//! Each command goes through validation, the authority check and routing to
//! the actor's cooldown states or condition checkers; the outcome reports
//! acceptance, emitted keyframe events and the snapshots that changed.
//! Nothing here blocks: the inbox is drained synchronously once per tick.

use std::collections::BTreeMap;
use std::path::Path;

use ability_content::{AbilityTable, ConditionSpec, ContentBundle, ContentFactory};
use ability_core::{
    AbilityKey, CommandEnvelope, CommandId, CommandIdGenerator, CommandPayload, CommandType,
    CommandValidator, ConnectionId, CooldownSnapshot, ErrorSeverity, KeyframeEvent,
    PcgRng, ValidationError, ValidationResult, compute_seed,
};
use tracing::{debug, error, info, trace, warn};

use crate::actor::{ActorTimers, TriggeredCondition, UseResult};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::inbox::CommandInbox;
use crate::registry::ConnectionRegistry;
use crate::replication::{SnapshotBatch, SnapshotTracker};

/// What an accepted command did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandEffect {
    /// The command was rejected and had no effect.
    None,
    AbilityUsed(AbilityKey),
    /// Valid use of an ability that is still cooling down.
    AbilityNotReady(AbilityKey),
    /// The actor has no timing state for this ability.
    UnknownAbility(AbilityKey),
    Advanced { dt: f32 },
    PlaybackSpeed { ability: AbilityKey, applied: bool },
    ConditionsChecked { fired: usize },
    SnapshotsRequested,
    /// The actor's timers were reset to their initial state.
    Respawned,
    /// Valid, but handled outside the timing engine.
    Forwarded(CommandType),
}

/// Result of applying one command.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandOutcome {
    pub command_id: CommandId,
    pub connection: ConnectionId,
    pub accepted: bool,
    pub errors: Vec<ValidationError>,
    pub effect: CommandEffect,
    pub events: Vec<KeyframeEvent>,
    /// Snapshots of states the command changed, or the requested snapshots.
    pub deltas: Vec<CooldownSnapshot>,
    pub triggered: Vec<TriggeredCondition>,
}

impl CommandOutcome {
    fn rejected(command: &CommandEnvelope, errors: Vec<ValidationError>) -> Self {
        Self {
            command_id: command.command_id,
            connection: command.connection_id,
            accepted: false,
            errors,
            effect: CommandEffect::None,
            events: Vec::new(),
            deltas: Vec::new(),
            triggered: Vec::new(),
        }
    }

    /// Human-readable rejection reasons.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Everything one call to [`TimingEngine::run_tick`] produced.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub tick: i64,
    pub outcomes: Vec<CommandOutcome>,
    pub batches: Vec<SnapshotBatch>,
}

/// Logs a rejected command at a level chosen by its worst error.
///
/// Transient rejections (stale timestamps, connections not yet registered)
/// are expected under jitter and stay at debug level.
fn log_rejection(command: &CommandEnvelope, validation: &ValidationResult) {
    let worst = validation.worst_severity().unwrap_or(ErrorSeverity::Validation);
    let errors = validation.messages();
    let note = validation.context.message.unwrap_or_default();

    if worst.is_internal() {
        error!(
            target: "runtime::engine",
            command = %command.command_id,
            connection = %command.connection_id,
            tick = command.tick,
            severity = worst.as_str(),
            ?errors,
            "command rejected"
        );
    } else if worst.is_recoverable() {
        debug!(
            target: "runtime::engine",
            command = %command.command_id,
            connection = %command.connection_id,
            tick = command.tick,
            ?errors,
            note,
            "command rejected"
        );
    } else {
        warn!(
            target: "runtime::engine",
            command = %command.command_id,
            connection = %command.connection_id,
            tick = command.tick,
            severity = worst.as_str(),
            ?errors,
            note,
            "command rejected"
        );
    }
}

/// Per-actor timing simulation for one side of the network.
pub struct TimingEngine {
    config: RuntimeConfig,
    validator: CommandValidator,
    registry: ConnectionRegistry,
    template: ActorTimers,
    actors: BTreeMap<ConnectionId, ActorTimers>,
    tracker: SnapshotTracker,
    ids: CommandIdGenerator,
    rng: PcgRng,
    tick: i64,
}

impl TimingEngine {
    /// Creates an engine; every profile is validated up front.
    pub fn new(
        config: RuntimeConfig,
        abilities: &AbilityTable,
        conditions: &[ConditionSpec],
    ) -> Result<Self> {
        let template = ActorTimers::new(ConnectionId::HOST, abilities, conditions)?;

        info!(
            target: "runtime::engine",
            role = ?config.role,
            abilities = abilities.len(),
            conditions = conditions.len(),
            tolerance_ms = config.engine.timestamp_tolerance_ms,
            "timing engine initialized"
        );

        Ok(Self {
            validator: CommandValidator::from_config(&config.engine),
            registry: ConnectionRegistry::new(config.role.is_authoritative()),
            tracker: SnapshotTracker::new(config.engine.snapshot_interval_ticks),
            template,
            actors: BTreeMap::new(),
            ids: CommandIdGenerator::new(),
            rng: PcgRng,
            tick: 0,
            config,
        })
    }

    /// Creates an engine from loaded content. The bundle's engine
    /// configuration replaces `config.engine`.
    pub fn from_content(config: RuntimeConfig, bundle: &ContentBundle) -> Result<Self> {
        let config = config.with_engine(bundle.config.clone());
        Self::new(config, &bundle.abilities, &bundle.conditions)
    }

    /// Loads content from a data directory and creates an engine.
    pub fn load(config: RuntimeConfig, data_dir: impl AsRef<Path>) -> Result<Self> {
        let bundle = ContentFactory::new(data_dir.as_ref())
            .load_all()
            .map_err(RuntimeError::Content)?;
        Self::from_content(config, &bundle)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The tick the next [`run_tick`](Self::run_tick) will simulate.
    pub fn tick(&self) -> i64 {
        self.tick
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn set_server_active(&mut self, active: bool) {
        self.registry.set_server_active(active);
    }

    pub fn actor(&self, connection: ConnectionId) -> Option<&ActorTimers> {
        self.actors.get(&connection)
    }

    /// Registers a connection and gives it a fresh actor slot.
    pub fn connect(&mut self, connection: ConnectionId) -> Result<()> {
        if !self.registry.connect(connection) {
            return Err(RuntimeError::DuplicateConnection(connection));
        }
        self.actors
            .insert(connection, self.template.for_connection(connection));
        info!(target: "runtime::engine", connection = %connection, "connection registered");
        Ok(())
    }

    /// Removes a connection and its actor slot. Returns false if unknown.
    pub fn disconnect(&mut self, connection: ConnectionId) -> bool {
        let known = self.registry.disconnect(connection);
        self.actors.remove(&connection);
        self.tracker.forget(connection);
        if known {
            info!(target: "runtime::engine", connection = %connection, "connection removed");
        }
        known
    }

    /// Issues a command id with this side's origin flag.
    pub fn next_command_id(&mut self, now_ms: i64) -> CommandId {
        self.ids.next(self.config.role.is_authoritative(), now_ms)
    }

    /// Validates, authorizes and applies one command.
    pub fn apply_command(&mut self, command: &CommandEnvelope, now_ms: i64) -> CommandOutcome {
        let mut validation = self.validator.validate(command, now_ms);
        if let Err(err) = CommandValidator::check_authority(command, &self.registry) {
            validation.push(err);
        }

        let actor = match self.actors.get_mut(&command.connection_id) {
            Some(actor) if validation.is_valid() => actor,
            slot => {
                if slot.is_none() && validation.is_valid() {
                    validation.context = validation.context.with_message("no actor slot");
                    validation.push(ValidationError::InactiveConnection(command.connection_id));
                }
                log_rejection(command, &validation);
                return CommandOutcome::rejected(command, validation.errors);
            }
        };

        let game_seed = self.config.engine.game_seed;
        let before = actor.snapshots();
        let mut requested = None;
        let mut triggered = Vec::new();

        let effect = match &command.payload {
            CommandPayload::AdvanceTime(cmd) => {
                actor.advance(cmd.dt);
                CommandEffect::Advanced { dt: cmd.dt }
            }
            CommandPayload::Animation(cmd) => CommandEffect::PlaybackSpeed {
                ability: cmd.ability,
                applied: actor.set_playback_speed(cmd.ability, cmd.playback_speed),
            },
            CommandPayload::Trigger(cmd) => {
                triggered = actor.check_conditions(
                    &cmd.event,
                    |index| {
                        compute_seed(
                            game_seed,
                            command.tick,
                            command.connection_id.0,
                            index as u32,
                        )
                    },
                    &self.rng,
                );
                CommandEffect::ConditionsChecked {
                    fired: triggered.len(),
                }
            }
            CommandPayload::SnapshotRequest(cmd) => {
                requested = Some(if cmd.abilities.is_empty() {
                    actor.snapshots()
                } else {
                    cmd.abilities
                        .iter()
                        .filter_map(|key| actor.snapshot(*key))
                        .collect()
                });
                CommandEffect::SnapshotsRequested
            }
            CommandPayload::Respawn(_) => {
                *actor = self.template.for_connection(command.connection_id);
                CommandEffect::Respawned
            }
            payload => match payload.used_ability() {
                Some(key) => match actor.use_ability(key) {
                    UseResult::Used => CommandEffect::AbilityUsed(key),
                    UseResult::NotReady => CommandEffect::AbilityNotReady(key),
                    UseResult::Unknown => CommandEffect::UnknownAbility(key),
                },
                None => CommandEffect::Forwarded(payload.command_type()),
            },
        };

        let events = actor.drain_events();
        let deltas = requested.unwrap_or_else(|| {
            actor
                .states()
                .zip(&before)
                .filter(|(state, previous)| !previous.matches(state))
                .map(|(state, _)| CooldownSnapshot::create(state))
                .collect()
        });

        debug!(
            target: "runtime::engine",
            command = %command.command_id,
            connection = %command.connection_id,
            tick = command.tick,
            effect = ?effect,
            events = events.len(),
            deltas = deltas.len(),
            "command applied"
        );

        CommandOutcome {
            command_id: command.command_id,
            connection: command.connection_id,
            accepted: true,
            errors: Vec::new(),
            effect,
            events,
            deltas,
            triggered,
        }
    }

    /// Drains the inbox, applies every command in tick order and collects
    /// the snapshots to replicate. Advances the engine tick by one.
    pub fn run_tick(&mut self, inbox: &mut CommandInbox, now_ms: i64) -> TickReport {
        let outcomes = inbox
            .drain()
            .iter()
            .map(|command| self.apply_command(command, now_ms))
            .collect();
        let batches = self.collect_snapshots();

        let report = TickReport {
            tick: self.tick,
            outcomes,
            batches,
        };
        self.tick += 1;
        report
    }

    /// Snapshot batches for the current tick. Empty on a predictive engine.
    pub fn collect_snapshots(&mut self) -> Vec<SnapshotBatch> {
        if !self.config.role.is_authoritative() {
            return Vec::new();
        }
        let tick = self.tick;
        self.actors
            .values()
            .filter_map(|actor| self.tracker.collect(tick, actor))
            .collect()
    }

    /// Overwrites local state with authoritative snapshots.
    ///
    /// Returns how many snapshots were applied; the rest did not match any
    /// local state and were ignored.
    pub fn reconcile(&mut self, connection: ConnectionId, snapshots: &[CooldownSnapshot]) -> usize {
        let Some(actor) = self.actors.get_mut(&connection) else {
            trace!(
                target: "runtime::replication",
                connection = %connection,
                "snapshots for unknown connection ignored"
            );
            return 0;
        };

        let mut applied = 0;
        for snapshot in snapshots {
            if actor.refresh(snapshot) {
                applied += 1;
            } else {
                trace!(
                    target: "runtime::replication",
                    connection = %connection,
                    ability = %snapshot.ability_key,
                    kind = %snapshot.kind,
                    "snapshot does not match local state"
                );
            }
        }
        applied
    }

    /// Decodes a transported batch and reconciles it.
    pub fn receive_batch(&mut self, bytes: &[u8]) -> Result<usize> {
        let batch = SnapshotBatch::decode(bytes)?;
        Ok(self.reconcile(batch.connection, &batch.snapshots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationRole;
    use crate::inbox::command_channel;
    use ability_core::command::{
        AbilityUseCommand, AdvanceTimeCommand, RespawnCommand, SnapshotRequestCommand,
        TriggerCommand,
    };
    use ability_core::{Authority, ConditionEvent, ConditionKind, TimingProfile};

    const NOW: i64 = 1_700_000_000_000;
    const PLAYER: ConnectionId = ConnectionId(7);

    fn engine(role: SimulationRole) -> TimingEngine {
        let abilities: AbilityTable = [
            (AbilityKey::Roll, TimingProfile::Simple { cooldown: 1.0 }),
            (
                AbilityKey::Attack,
                TimingProfile::ComboWindow {
                    windows: vec![0.5, 0.5],
                    cooldown: 1.0,
                },
            ),
        ]
        .into_iter()
        .collect();
        let conditions = [ConditionSpec::new(ConditionKind::Attack)];

        let mut engine = TimingEngine::new(
            RuntimeConfig::default().with_role(role),
            &abilities,
            &conditions,
        )
        .unwrap();
        engine.connect(PLAYER).unwrap();
        engine
    }

    fn command(tick: i64, payload: CommandPayload) -> CommandEnvelope {
        CommandEnvelope::new(
            PLAYER,
            tick,
            CommandId::compose(false, 0, tick as u16),
            NOW,
            Authority::Client,
            payload,
        )
    }

    fn clock_step(tick: i64, dt: f32) -> CommandEnvelope {
        let mut step = command(tick, CommandPayload::AdvanceTime(AdvanceTimeCommand { dt }));
        step.authority = Authority::System;
        step
    }

    fn use_roll(tick: i64) -> CommandEnvelope {
        command(
            tick,
            CommandPayload::AbilityUse(AbilityUseCommand {
                ability: AbilityKey::Roll,
            }),
        )
    }

    #[test]
    fn use_reports_effect_and_changed_snapshots() {
        let mut engine = engine(SimulationRole::Authoritative);

        let outcome = engine.apply_command(&use_roll(1), NOW);
        assert!(outcome.accepted);
        assert_eq!(outcome.effect, CommandEffect::AbilityUsed(AbilityKey::Roll));
        assert_eq!(outcome.deltas.len(), 1);
        assert_eq!(outcome.deltas[0].ability_key, AbilityKey::Roll);
        assert_eq!(outcome.deltas[0].current_countdown, 1.0);

        let again = engine.apply_command(&use_roll(2), NOW);
        assert!(again.accepted);
        assert_eq!(again.effect, CommandEffect::AbilityNotReady(AbilityKey::Roll));
        assert!(again.deltas.is_empty());
    }

    #[test]
    fn rejected_commands_leave_state_untouched() {
        let mut engine = engine(SimulationRole::Authoritative);

        let outcome = engine.apply_command(&use_roll(-1), NOW);
        assert!(!outcome.accepted);
        assert_eq!(outcome.effect, CommandEffect::None);
        assert!(matches!(
            outcome.errors[..],
            [ValidationError::InvalidTick { tick: -1 }]
        ));

        let stale = engine.apply_command(&use_roll(1), NOW + 60_000);
        assert!(!stale.accepted);
        assert!(matches!(
            stale.errors[..],
            [ValidationError::TimestampSkew { .. }]
        ));

        let roll = engine.actor(PLAYER).unwrap().state(AbilityKey::Roll).unwrap();
        assert_eq!(roll.current_countdown(), 0.0);
    }

    #[test]
    fn authority_is_checked_against_the_registry() {
        let mut engine = engine(SimulationRole::Predictive);

        let mut stranger = use_roll(1);
        stranger.connection_id = ConnectionId(99);
        let outcome = engine.apply_command(&stranger, NOW);
        assert_eq!(
            outcome.errors,
            vec![ValidationError::InactiveConnection(ConnectionId(99))]
        );

        let mut from_server = use_roll(1);
        from_server.authority = Authority::Server;
        let outcome = engine.apply_command(&from_server, NOW);
        assert_eq!(outcome.errors, vec![ValidationError::ServerInactive]);

        engine.set_server_active(true);
        assert!(engine.apply_command(&from_server, NOW).accepted);
    }

    #[test]
    fn clients_cannot_fast_forward_their_timers() {
        let mut engine = engine(SimulationRole::Authoritative);
        engine.apply_command(&use_roll(1), NOW);

        let skip = command(2, CommandPayload::AdvanceTime(AdvanceTimeCommand { dt: 1.0e6 }));
        let outcome = engine.apply_command(&skip, NOW);
        assert!(!outcome.accepted);
        assert_eq!(
            outcome.errors,
            vec![ValidationError::ClientNotPermitted(CommandType::AdvanceTime)]
        );

        let roll = engine.actor(PLAYER).unwrap().state(AbilityKey::Roll).unwrap();
        assert_eq!(roll.current_countdown(), 1.0);

        let mut from_tick_loop = skip;
        from_tick_loop.authority = Authority::System;
        assert!(engine.apply_command(&from_tick_loop, NOW).accepted);
    }

    #[test]
    fn system_command_for_unknown_slot_is_rejected() {
        let mut engine = engine(SimulationRole::Authoritative);
        let mut command = use_roll(1);
        command.connection_id = ConnectionId(42);
        command.authority = Authority::System;

        let outcome = engine.apply_command(&command, NOW);
        assert!(!outcome.accepted);
        assert_eq!(
            outcome.errors,
            vec![ValidationError::InactiveConnection(ConnectionId(42))]
        );
    }

    #[test]
    fn advance_respawn_and_snapshot_request() {
        let mut engine = engine(SimulationRole::Authoritative);
        engine.apply_command(&use_roll(1), NOW);

        let advanced = engine.apply_command(&clock_step(2, 0.25), NOW);
        assert_eq!(advanced.effect, CommandEffect::Advanced { dt: 0.25 });
        assert_eq!(advanced.deltas[0].current_countdown, 0.75);

        let requested = engine.apply_command(
            &command(
                3,
                CommandPayload::SnapshotRequest(SnapshotRequestCommand::default()),
            ),
            NOW,
        );
        assert_eq!(requested.effect, CommandEffect::SnapshotsRequested);
        assert_eq!(requested.deltas.len(), 2);

        let respawned = engine.apply_command(
            &command(4, CommandPayload::Respawn(RespawnCommand { spawn_point: 1 })),
            NOW,
        );
        assert_eq!(respawned.effect, CommandEffect::Respawned);
        let roll = engine.actor(PLAYER).unwrap().state(AbilityKey::Roll).unwrap();
        assert_eq!(roll.current_countdown(), 0.0);
    }

    #[test]
    fn trigger_runs_condition_checkers() {
        let mut engine = engine(SimulationRole::Authoritative);
        let outcome = engine.apply_command(
            &command(
                1,
                CommandPayload::Trigger(TriggerCommand {
                    event: ConditionEvent::Attack {
                        ability: AbilityKey::Attack,
                        target: 3,
                    },
                }),
            ),
            NOW,
        );
        assert_eq!(outcome.effect, CommandEffect::ConditionsChecked { fired: 1 });
        assert_eq!(outcome.triggered[0].index, 0);
    }

    #[test]
    fn only_the_authoritative_side_replicates() {
        let (sender, mut inbox) = command_channel(8);
        sender.try_send(use_roll(2)).unwrap();
        sender.try_send(use_roll(1)).unwrap();

        let mut server = engine(SimulationRole::Authoritative);
        let report = server.run_tick(&mut inbox, NOW);
        assert_eq!(report.tick, 0);
        assert_eq!(server.tick(), 1);
        assert_eq!(report.outcomes[0].effect, CommandEffect::AbilityUsed(AbilityKey::Roll));
        assert_eq!(
            report.outcomes[1].effect,
            CommandEffect::AbilityNotReady(AbilityKey::Roll)
        );
        assert_eq!(report.batches.len(), 1);
        assert!(report.batches[0].full);

        let mut client = engine(SimulationRole::Predictive);
        assert!(client.run_tick(&mut inbox, NOW).batches.is_empty());
    }

    #[test]
    fn reconcile_overwrites_prediction() {
        let mut server = engine(SimulationRole::Authoritative);
        let mut client = engine(SimulationRole::Predictive);

        server.apply_command(&use_roll(1), NOW);
        let truth = server.actor(PLAYER).unwrap().snapshots();

        assert_eq!(client.reconcile(PLAYER, &truth), 2);
        let roll = client.actor(PLAYER).unwrap().state(AbilityKey::Roll).unwrap();
        assert_eq!(roll.current_countdown(), 1.0);

        assert_eq!(client.reconcile(ConnectionId(99), &truth), 0);
    }

    #[test]
    fn connections_are_unique() {
        let mut engine = engine(SimulationRole::Authoritative);
        assert!(matches!(
            engine.connect(PLAYER),
            Err(RuntimeError::DuplicateConnection(PLAYER))
        ));
        assert!(engine.disconnect(PLAYER));
        assert!(engine.actor(PLAYER).is_none());
        assert!(!engine.disconnect(PLAYER));
    }
}
