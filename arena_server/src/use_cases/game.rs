// The authoritative server loop. It alone owns the world and the connection table;
// everything else talks to it through bounded queues.

use super::connection::{ConnectionEvent, ConnectionReceiver, ConnectionSender, spawn_connection};
use super::ports::{SnapshotCodec, Transport};
use super::types::{ServerEvent, ServerStats, Snapshot};
use crate::domain::{PlayerInput, Tuning, World};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(2);

/// Runtime knobs for the server loop.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Gameplay constants.
    pub tuning: Tuning,
    /// Period of the simulation tick.
    pub tick_interval: Duration,
    /// Period of the connection-count log line.
    pub diagnostic_interval: Duration,
    /// Capacity of the shared arrival/input/departure queue.
    pub event_queue_capacity: usize,
    /// Capacity of each connection's send, receive and error queues.
    pub connection_queue_capacity: usize,
    /// Consecutive snapshots a client may miss before it is treated as stalled.
    pub max_dropped_snapshots: u32,
}

/// What adapters need to feed the loop and observe it.
#[derive(Clone)]
pub struct ServerHandle {
    pub events_tx: mpsc::Sender<ServerEvent>,
    pub stats_rx: watch::Receiver<ServerStats>,
}

struct ConnectionRecord {
    sender: ConnectionSender<Snapshot>,
    dropped_snapshots: u32,
    snapshots_sent: u64,
    last_drop_log: Instant,
}

pub struct GameServer<C: SnapshotCodec> {
    settings: ServerSettings,
    world: World,
    // Keys always match the player ids present in `world`.
    connections: HashMap<u64, ConnectionRecord>,
    codec: Arc<C>,
    events_tx: mpsc::Sender<ServerEvent>,
    stats_tx: watch::Sender<ServerStats>,
    rng: StdRng,
    ticks: u64,
}

/// Builds the loop with an OS-seeded spawn RNG and runs it on its own task.
pub fn spawn_server<C: SnapshotCodec>(settings: ServerSettings, codec: C) -> ServerHandle {
    let (server, events_rx) = GameServer::new(settings, codec, StdRng::from_os_rng());
    let handle = server.handle();
    tokio::spawn(server.run(events_rx));
    handle
}

impl<C: SnapshotCodec> GameServer<C> {
    pub fn new(
        settings: ServerSettings,
        codec: C,
        rng: StdRng,
    ) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (events_tx, events_rx) = mpsc::channel(settings.event_queue_capacity);
        let (stats_tx, _stats_rx) = watch::channel(ServerStats::default());
        let server = Self {
            world: World::new(settings.tuning),
            settings,
            connections: HashMap::new(),
            codec: Arc::new(codec),
            events_tx,
            stats_tx,
            rng,
            ticks: 0,
        };
        (server, events_rx)
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            events_tx: self.events_tx.clone(),
            stats_rx: self.stats_tx.subscribe(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn stats(&self) -> ServerStats {
        ServerStats {
            connections: self.connections.len(),
            projectiles: self.world.projectiles().len(),
            ticks: self.ticks,
        }
    }

    /// Waits on arrivals/inputs/departures and both timers, one event at a time.
    /// `select!` picks randomly among ready branches, so a busy event queue cannot
    /// starve the simulation tick.
    pub async fn run(mut self, mut events_rx: mpsc::Receiver<ServerEvent>) {
        let mut sim_tick = tokio::time::interval(self.settings.tick_interval);
        sim_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let diagnostic_interval = self.settings.diagnostic_interval;
        let mut diag_tick =
            tokio::time::interval_at(Instant::now() + diagnostic_interval, diagnostic_interval);
        diag_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                Some(event) = events_rx.recv() => self.handle_event(event),
                _ = sim_tick.tick() => {
                    // Integrate real elapsed time, not the nominal period.
                    let now = Instant::now();
                    let dt = now.duration_since(last_tick).as_secs_f32();
                    last_tick = now;
                    self.tick(dt);
                }
                _ = diag_tick.tick() => self.log_diagnostics(),
            }
            self.publish_stats();
        }
    }

    pub fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Arrival(transport) => {
                self.arrive(transport);
            }
            ServerEvent::Input { player_id, input } => {
                // Inputs racing a departure are simply dropped.
                self.world.set_input(player_id, input);
            }
            ServerEvent::Departure { player_id } => self.depart(player_id),
        }
    }

    /// Creates the player and starts its connection actor plus forwarding task.
    pub fn arrive(&mut self, transport: Transport) -> u64 {
        let player_id = self.world.spawn_player(&mut self.rng);
        let (sender, receiver) = spawn_connection(
            transport,
            self.codec.clone(),
            self.settings.connection_queue_capacity,
        );
        tokio::spawn(forward_connection_events(
            player_id,
            receiver,
            self.events_tx.clone(),
        ));

        self.connections.insert(
            player_id,
            ConnectionRecord {
                sender,
                dropped_snapshots: 0,
                snapshots_sent: 0,
                last_drop_log: Instant::now() - LOG_THROTTLE,
            },
        );
        info!(
            player_id,
            connections = self.connections.len(),
            "client arrived"
        );
        player_id
    }

    /// Closes the transport and forgets the player. No-op for unknown ids.
    pub fn depart(&mut self, player_id: u64) {
        let Some(record) = self.connections.remove(&player_id) else {
            return;
        };
        record.sender.close();
        self.world.remove_player(player_id);

        debug!(
            player_id,
            snapshots_sent = record.snapshots_sent,
            dropped_snapshots = record.dropped_snapshots,
            "connection stats"
        );
        info!(
            player_id,
            connections = self.connections.len(),
            "client departed"
        );
    }

    /// Advances the world by `dt` seconds and offers every client a snapshot.
    pub fn tick(&mut self, dt: f32) {
        self.world.step(dt);
        self.ticks += 1;
        self.broadcast();
    }

    fn broadcast(&mut self) {
        let entities = self.world.entities();
        let encoded = match self.codec.encode_entities(&entities) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "failed to encode entity list");
                return;
            }
        };

        let max_dropped = self.settings.max_dropped_snapshots;
        let mut gone = Vec::new();
        for (&player_id, record) in self.connections.iter_mut() {
            let snapshot = Snapshot {
                entities: encoded.clone(),
                your_id: player_id as i64,
            };
            // Never wait on a client here: one slow socket must not stall the world.
            match record.sender.try_send(snapshot) {
                Ok(()) => {
                    record.dropped_snapshots = 0;
                    record.snapshots_sent += 1;
                }
                Err(TrySendError::Full(_)) => {
                    record.dropped_snapshots += 1;
                    if record.dropped_snapshots > max_dropped {
                        warn!(
                            player_id,
                            dropped = record.dropped_snapshots,
                            "client stalled; disconnecting"
                        );
                        gone.push(player_id);
                    } else if should_log(&mut record.last_drop_log) {
                        warn!(
                            player_id,
                            dropped = record.dropped_snapshots,
                            "send queue full; snapshot dropped"
                        );
                    }
                }
                Err(TrySendError::Closed(_)) => gone.push(player_id),
            }
        }

        for player_id in gone {
            self.depart(player_id);
        }
    }

    fn log_diagnostics(&self) {
        info!(
            connections = self.connections.len(),
            projectiles = self.world.projectiles().len(),
            ticks = self.ticks,
            "server status"
        );
    }

    fn publish_stats(&self) {
        let stats = self.stats();
        self.stats_tx.send_if_modified(|current| {
            if *current == stats {
                false
            } else {
                *current = stats;
                true
            }
        });
    }
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

/// Relays one connection's inputs and failures to the server loop. Non-fatal errors
/// are only logged; a fatal one (or both sources closing) becomes a departure.
async fn forward_connection_events(
    player_id: u64,
    mut receiver: ConnectionReceiver<PlayerInput>,
    events_tx: mpsc::Sender<ServerEvent>,
) {
    let mut msgs_in: u64 = 0;
    let mut errors: u64 = 0;
    let mut last_error_log = Instant::now() - LOG_THROTTLE;

    loop {
        match receiver.next_event().await {
            Some(ConnectionEvent::Message(input)) => {
                msgs_in += 1;
                if events_tx
                    .send(ServerEvent::Input { player_id, input })
                    .await
                    .is_err()
                {
                    return;
                }
            }
            Some(ConnectionEvent::Error(err)) if err.is_fatal() => {
                info!(player_id, error = %err, "connection failed");
                break;
            }
            Some(ConnectionEvent::Error(err)) => {
                errors += 1;
                if should_log(&mut last_error_log) {
                    warn!(player_id, error = %err, "connection error");
                } else {
                    debug!(player_id, error = %err, "connection error");
                }
            }
            None => break,
        }
    }

    debug!(player_id, msgs_in, errors, "connection stats");
    let _ = events_tx.send(ServerEvent::Departure { player_id }).await;
}
