//! Operation values accepted by [`Registry::apply`](super::Registry::apply).

use crate::access::Role;
use crate::agent::AgentTraits;
use crate::types::{Address, Balance};
use serde::{Deserialize, Serialize};

/// One invocation of the registry surface, minus the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Genesis entry written by the constructor; never accepted afterwards.
    Initialize {
        admin: Address,
        default_traits: AgentTraits,
        token: Address,
    },
    CreateCity {
        name: String,
        treasury_balance: Balance,
        max_population: u64,
    },
    CreateAgent {
        name: String,
        identity: Address,
        reputation_score: u16,
    },
    KillAgent {
        identity: Address,
    },
    ClaimAgentRewards {
        identity: Address,
    },
    WithdrawAdminFunds,
    GrantRole {
        role: Role,
        account: Address,
    },
    RevokeRole {
        role: Role,
        account: Address,
    },
    RenounceRole {
        role: Role,
        account: Address,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Initialize { .. } => "initialize",
            Operation::CreateCity { .. } => "create_city",
            Operation::CreateAgent { .. } => "create_agent",
            Operation::KillAgent { .. } => "kill_agent",
            Operation::ClaimAgentRewards { .. } => "claim_agent_rewards",
            Operation::WithdrawAdminFunds => "withdraw_admin_funds",
            Operation::GrantRole { .. } => "grant_role",
            Operation::RevokeRole { .. } => "revoke_role",
            Operation::RenounceRole { .. } => "renounce_role",
        }
    }

    /// Whether the operation only validates and never changes state
    pub fn is_read_only(&self) -> bool {
        matches!(self, Operation::ClaimAgentRewards { .. })
    }
}
