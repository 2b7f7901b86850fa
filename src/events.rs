//! Registry events and the transaction log.

use crate::access::Role;
use crate::agent::{AgentTraits, Persona};
use crate::registry::Operation;
use crate::types::{Address, Balance, Timestamp};
use serde::{Deserialize, Serialize};

/// Record emitted by a successful operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    CityCreated {
        creator: Address,
        name: String,
        max_population: u64,
        timestamp: Timestamp,
    },
    /// `balance` is the token balance queried at creation, not the stored one.
    AgentCreated {
        owner: Address,
        name: String,
        identity: Address,
        persona: Persona,
        balance: Balance,
        traits: AgentTraits,
        timestamp: Timestamp,
        reputation_score: u16,
    },
    AgentKilled {
        killer: Address,
        identity: Address,
        timestamp: Timestamp,
    },
    RoleGranted {
        role: Role,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: Role,
        account: Address,
        sender: Address,
    },
}

impl RegistryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::CityCreated { .. } => "CityCreated",
            RegistryEvent::AgentCreated { .. } => "AgentCreated",
            RegistryEvent::AgentKilled { .. } => "AgentKilled",
            RegistryEvent::RoleGranted { .. } => "RoleGranted",
            RegistryEvent::RoleRevoked { .. } => "RoleRevoked",
        }
    }
}

/// One accepted operation invocation and the events it emitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub sequence: u64,
    pub caller: Address,
    pub operation: Operation,
    pub timestamp: Timestamp,
    pub events: Vec<RegistryEvent>,
}
