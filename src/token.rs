//! Token balance port
//!
//! The registry reads one balance per agent creation, for the
//! `AgentCreated` event only.

use crate::types::{Address, Balance};
use std::collections::HashMap;

/// Read-only view of an external fungible token.
pub trait BalanceQuery: Send + Sync {
    fn balance_of(&self, token: &Address, account: &Address) -> Balance;
}

/// Token that reports zero for every account.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBalances;

impl BalanceQuery for NoBalances {
    fn balance_of(&self, _token: &Address, _account: &Address) -> Balance {
        0
    }
}

/// Fixed balance table, typically loaded from configuration.
///
/// Balances are held for a single token; queries for any other token report
/// zero.
#[derive(Debug, Clone, Default)]
pub struct StaticBalances {
    token: Address,
    balances: HashMap<Address, Balance>,
}

impl StaticBalances {
    pub fn new(token: Address) -> Self {
        Self {
            token,
            balances: HashMap::new(),
        }
    }

    pub fn with_balance(mut self, account: Address, amount: Balance) -> Self {
        self.balances.insert(account, amount);
        self
    }

    pub fn set_balance(&mut self, account: Address, amount: Balance) {
        self.balances.insert(account, amount);
    }
}

impl BalanceQuery for StaticBalances {
    fn balance_of(&self, token: &Address, account: &Address) -> Balance {
        if *token != self.token {
            return 0;
        }
        self.balances.get(account).copied().unwrap_or(0)
    }
}
