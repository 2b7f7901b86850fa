//! Shared registry handle
//!
//! Wraps a registry in a single mutex so callers on several threads are
//! applied one operation at a time, in lock-acquisition order. Each
//! operation holds the lock from its first check to its last write.

use crate::agent::Agent;
use crate::city::City;
use crate::error::RegistryError;
use crate::events::RegistryEvent;
use crate::registry::{Operation, Registry, RegistrySnapshot};
use crate::types::Address;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to one registry
#[derive(Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Apply one operation under the lock
    pub fn apply(
        &self,
        caller: &Address,
        operation: Operation,
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        self.inner.lock().apply(caller, operation)
    }

    /// Run a read against a consistent view
    pub fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        let guard = self.inner.lock();
        f(&*guard)
    }

    pub fn agent(&self, identity: &Address) -> Option<Agent> {
        self.read(|registry| registry.agent(identity).cloned())
    }

    pub fn agent_of_owner(&self, owner: &Address) -> Option<Address> {
        self.read(|registry| registry.agent_of_owner(owner).copied())
    }

    pub fn city(&self) -> City {
        self.read(|registry| registry.city().clone())
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.read(Registry::snapshot)
    }
}
