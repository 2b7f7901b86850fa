//! Cityreg: Permissioned City and Agent Registry
//!
//! A single city and a table of agents keyed by identity address. An admin
//! role gates city creation, agent removal and withdrawals; anyone may
//! register one agent per owner. Agents whose reputation score reaches
//! [`MIN_REPUTATION_SCORE`] can never be removed.
//!
//! Every accepted state change is appended to a transaction log together
//! with the events it emitted, and the whole registry can be snapshotted
//! into a sled-backed store.

pub mod access;
pub mod agent;
pub mod city;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod registry;
pub mod shared;
pub mod store;
pub mod token;
pub mod tooling;
pub mod types;

pub use access::Role;
pub use agent::{Agent, AgentTraits, Persona, MIN_REPUTATION_SCORE};
pub use city::City;
pub use error::{ApiError, RegistryError, StorageError};
pub use events::{LogEntry, RegistryEvent};
pub use registry::{Operation, Registry, RegistrySnapshot};
pub use shared::SharedRegistry;
pub use types::{Address, Balance, Timestamp};
