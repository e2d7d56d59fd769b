//! Auth feature module: the persisted authentication flag, the storage it is
//! mirrored to, and the navigation guard that consults it. The flag is a
//! convenience for the shell only; the remote API performs no access control
//! and credentials never leave the user lookup in `features::users`.

pub mod guards;
pub mod state;
pub mod storage;

pub use guards::{GuardDecision, before_each};
pub use state::AuthStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
