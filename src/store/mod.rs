//! Registry Store
//!
//! Durable home for a registry snapshot and its transaction log. The
//! registry itself never touches storage; callers load a snapshot, apply
//! operations, and save the result.

pub mod persistence;

use crate::error::StorageError;
use crate::registry::RegistrySnapshot;

pub use persistence::SledRegistryStore;

/// Registry store interface
pub trait RegistryStore {
    /// Load the stored snapshot, if a registry has been saved
    fn load(&self) -> Result<Option<RegistrySnapshot>, StorageError>;

    /// Persist `snapshot`, replacing whatever was stored
    fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), StorageError>;
}
