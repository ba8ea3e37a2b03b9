//! Storage layer for studykeep
//!
//! Two interchangeable Entity Store backends behind one set of async traits:
//! a synchronous key-value backed local store for anonymous/offline use, and
//! a multi-tenant PostgreSQL store for authenticated use. `StorageBackend`
//! dispatches between them; `ChangeBus` propagates mutation notifications to
//! readers in both modes.

mod backend;
mod bus;
mod error;
mod kv;
mod local;
mod pg;
mod pg_migrations;
mod seed;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use bus::{spawn_pg_change_forwarder, ChangeBus, ChangeEvent, EntityKind, CHANGE_CHANNEL};
pub use error::StoreError;
pub use kv::{keys, FileKv, KvStore, MemoryKv};
pub use local::LocalStore;
pub use pg::PgStore;
pub use seed::{seed_demo_data, SeedCounts};
