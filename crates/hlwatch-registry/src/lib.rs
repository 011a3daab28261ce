//! Subscription registry: the single shared mutable resource of the
//! system.
//!
//! Owns the many-to-many subscriber/address mapping, the last-known
//! snapshot per address, and the per-pair summary send timestamps. All
//! state lives behind one mutex so that command handling and the
//! monitor loop observe it atomically (a subscriber added mid-poll is
//! either in that poll's fan-out or not, never partially).

pub mod error;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::{SubscriptionRegistry, WatchOutcome};
