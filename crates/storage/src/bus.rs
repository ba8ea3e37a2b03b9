//! Change notification bus.
//!
//! One typed topic per entity kind, backed by `tokio::sync::broadcast`.
//! Local mode publishes in-process only; remote mode additionally forwards
//! server-pushed `pg_notify` events onto the same bus so readers re-fetch on
//! writes from any client. Subscribers that lag observe `Lagged` and perform
//! a fresh read, so accumulated changes are never permanently missed.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// LISTEN/NOTIFY channel the remote triggers publish on.
pub const CHANGE_CHANNEL: &str = "studykeep_changes";

const TOPIC_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Course,
    Note,
    DailyEntry,
}

impl EntityKind {
    /// Map a remote table name (the notify payload) to an entity kind.
    pub fn from_table(name: &str) -> Option<Self> {
        match name {
            "courses" => Some(Self::Course),
            "notes" => Some(Self::Note),
            "daily_entries" => Some(Self::DailyEntry),
            _ => None,
        }
    }
}

/// Payload delivered to subscribers. Carries no row data: every notification
/// means "re-fetch this kind", which makes delivery order across clients
/// irrelevant to the converged end state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: EntityKind,
}

#[derive(Debug, Clone)]
pub struct ChangeBus {
    courses: broadcast::Sender<ChangeEvent>,
    notes: broadcast::Sender<ChangeEvent>,
    entries: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self {
            courses: broadcast::channel(TOPIC_CAPACITY).0,
            notes: broadcast::channel(TOPIC_CAPACITY).0,
            entries: broadcast::channel(TOPIC_CAPACITY).0,
        }
    }

    fn topic(&self, kind: EntityKind) -> &broadcast::Sender<ChangeEvent> {
        match kind {
            EntityKind::Course => &self.courses,
            EntityKind::Note => &self.notes,
            EntityKind::DailyEntry => &self.entries,
        }
    }

    /// Subscribe to one entity kind. Dropping the receiver unsubscribes.
    pub fn subscribe(&self, kind: EntityKind) -> broadcast::Receiver<ChangeEvent> {
        self.topic(kind).subscribe()
    }

    /// Notify all subscribers of `kind`. A send with no subscribers is fine.
    pub fn publish(&self, kind: EntityKind) {
        let _ = self.topic(kind).send(ChangeEvent { kind });
    }

    pub fn subscriber_count(&self, kind: EntityKind) -> usize {
        self.topic(kind).receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward remote `pg_notify` events onto the bus.
///
/// Runs until aborted. `PgListener` reconnects internally; a recv error is
/// logged and the loop retries after a short pause.
pub fn spawn_pg_change_forwarder(database_url: String, bus: ChangeBus) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut listener = match sqlx::postgres::PgListener::connect(&database_url).await {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %e, "change listener could not connect, remote push disabled");
                return;
            },
        };
        if let Err(e) = listener.listen(CHANGE_CHANNEL).await {
            tracing::warn!(error = %e, "LISTEN failed, remote push disabled");
            return;
        }
        loop {
            match listener.recv().await {
                Ok(notification) => {
                    match EntityKind::from_table(notification.payload()) {
                        Some(kind) => bus.publish(kind),
                        None => tracing::warn!(
                            payload = notification.payload(),
                            "change notification for unknown table"
                        ),
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "change listener recv failed, retrying");
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                },
            }
        }
    })
}
