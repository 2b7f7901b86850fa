//! Agent record and persona.

use super::traits::AgentTraits;
use crate::types::{Address, Balance, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Agents with a reputation score at or above this value cannot be killed.
pub const MIN_REPUTATION_SCORE: u16 = 12;

/// Role an agent plays in the city
///
/// Every agent starts as `None`; no operation currently changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Persona {
    #[default]
    None,
    Police,
    Thief,
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Persona::None => "NONE",
            Persona::Police => "POLICE",
            Persona::Thief => "THIEF",
        };
        write!(f, "{}", s)
    }
}

/// A registered agent
///
/// `balance` is always zero when the record is created, even when the
/// token reports a non-zero balance for `identity`. The queried balance only
/// appears in the `AgentCreated` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub owner: Address,
    pub identity: Address,
    pub persona: Persona,
    pub balance: Balance,
    pub traits: AgentTraits,
    pub date_of_birth: Timestamp,
    pub is_alive: bool,
    pub reputation_score: u16,
}

impl Agent {
    /// Whether the reputation score shields this agent from being killed
    pub fn is_protected(&self) -> bool {
        self.reputation_score >= MIN_REPUTATION_SCORE
    }
}
