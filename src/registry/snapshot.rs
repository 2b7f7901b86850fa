//! Serializable image of a registry.

use super::Registry;
use crate::access::RoleSet;
use crate::agent::{Agent, AgentTraits};
use crate::city::City;
use crate::clock::Clock;
use crate::error::StorageError;
use crate::events::LogEntry;
use crate::token::BalanceQuery;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Full registry state, minus the balance port and the clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub roles: RoleSet,
    pub default_traits: AgentTraits,
    pub token: Address,
    pub city: City,
    pub agents: BTreeMap<Address, Agent>,
    pub owner_to_agent: BTreeMap<Address, Address>,
    pub log: Vec<LogEntry>,
}

impl RegistrySnapshot {
    /// Verify the table, the owner index, and the log agree with each other
    pub fn check_consistency(&self) -> Result<(), StorageError> {
        for (identity, agent) in &self.agents {
            if agent.identity != *identity {
                return Err(StorageError::Corrupt(format!(
                    "agent keyed at {} records identity {}",
                    identity, agent.identity
                )));
            }
            if !agent.is_alive {
                return Err(StorageError::Corrupt(format!(
                    "agent {} is stored but not alive",
                    identity
                )));
            }
            if self.owner_to_agent.get(&agent.owner) != Some(identity) {
                return Err(StorageError::Corrupt(format!(
                    "owner index does not map {} to agent {}",
                    agent.owner, identity
                )));
            }
        }

        if self.owner_to_agent.len() != self.agents.len() {
            return Err(StorageError::Corrupt(format!(
                "owner index has {} entries for {} agents",
                self.owner_to_agent.len(),
                self.agents.len()
            )));
        }

        for (position, entry) in self.log.iter().enumerate() {
            if entry.sequence != position as u64 {
                return Err(StorageError::Corrupt(format!(
                    "log entry at position {} has sequence {}",
                    position, entry.sequence
                )));
            }
        }

        Ok(())
    }
}

impl Registry {
    /// Capture the current state
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            roles: self.roles.clone(),
            default_traits: self.default_traits,
            token: self.token,
            city: self.city.clone(),
            agents: self.agents.clone(),
            owner_to_agent: self.owner_to_agent.clone(),
            log: self.log.clone(),
        }
    }

    /// Rebuild a registry from a snapshot
    ///
    /// No genesis entry is written; the snapshot's log is kept as is.
    pub fn from_snapshot(
        snapshot: RegistrySnapshot,
        balances: Arc<dyn BalanceQuery>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        snapshot.check_consistency()?;
        let RegistrySnapshot {
            roles,
            default_traits,
            token,
            city,
            agents,
            owner_to_agent,
            log,
        } = snapshot;

        Ok(Self {
            roles,
            default_traits,
            token,
            balances,
            clock,
            city,
            agents,
            owner_to_agent,
            log,
        })
    }
}
