//! Error types
//!
//! `RegistryError` carries the rejection kinds a registry operation can fail
//! with. `ApiError` is the outer error for everything around the core:
//! configuration, storage, and address parsing.

use crate::access::Role;
use crate::types::Address;
use thiserror::Error;

/// Broad classification of a registry rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller lacks the required role or ownership.
    Authorization,
    /// Malformed parameters or identity/owner conflicts.
    Validation,
    /// The registry is not in a state that admits the operation.
    State,
    /// The operation would violate the protected-agent invariant.
    InvariantProtection,
}

/// Rejection raised by a registry operation.
///
/// A rejected operation never mutates state and never emits an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Account {account} is missing role {role}")]
    Unauthorized { account: Address, role: Role },

    #[error("Accounts can only renounce roles for themselves")]
    BadConfirmation,

    #[error("Registry is already initialized")]
    InvalidInitialization,

    #[error("Invalid city parameters: name must be non-empty and max population above zero")]
    InvalidCityParams,

    #[error("City is already initialized")]
    CityAlreadyInitialized,

    #[error("Invalid agent parameters: name must be non-empty")]
    InvalidAgentParams,

    #[error("Agent {0} is already live")]
    AgentAlreadyLive(Address),

    #[error("Owner {0} already owns a live agent")]
    OwnerAgentAlreadyExists(Address),

    #[error("Agent {0} is not alive")]
    AgentNotAlive(Address),

    #[error("Agent {0} is protected by its reputation score")]
    CannotKillProtectedAgent(Address),

    #[error("Only the owner of agent {0} can claim its rewards")]
    OnlyOwnerCanClaim(Address),
}

impl RegistryError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RegistryError::Unauthorized { .. }
            | RegistryError::BadConfirmation
            | RegistryError::OnlyOwnerCanClaim(_) => ErrorClass::Authorization,
            RegistryError::InvalidCityParams
            | RegistryError::InvalidAgentParams
            | RegistryError::OwnerAgentAlreadyExists(_) => ErrorClass::Validation,
            RegistryError::InvalidInitialization
            | RegistryError::CityAlreadyInitialized
            | RegistryError::AgentAlreadyLive(_)
            | RegistryError::AgentNotAlive(_) => ErrorClass::State,
            RegistryError::CannotKillProtectedAgent(_) => ErrorClass::InvariantProtection,
        }
    }
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt registry snapshot: {0}")]
    Corrupt(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Top-level error for library callers and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("No registry stored at {0}; run `cityreg init` first")]
    NotInitialized(std::path::PathBuf),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
