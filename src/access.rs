//! Role-based access control
//!
//! Every admin-gated registry operation calls [`RoleSet::verify`] before it
//! looks at any other state.

use crate::error::RegistryError;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Role a principal can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates the city, kills agents, withdraws funds, manages roles
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Role membership table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    members: BTreeMap<Role, BTreeSet<Address>>,
}

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `account` holds `role`
    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.members
            .get(&role)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    /// Verify that `account` holds `role`
    pub fn verify(&self, role: Role, account: &Address) -> Result<(), RegistryError> {
        if !self.has_role(role, account) {
            return Err(RegistryError::Unauthorized {
                account: *account,
                role,
            });
        }
        Ok(())
    }

    /// Add `account` to `role`. Returns whether membership changed.
    pub fn grant(&mut self, role: Role, account: Address) -> bool {
        self.members.entry(role).or_default().insert(account)
    }

    /// Remove `account` from `role`. Returns whether membership changed.
    pub fn revoke(&mut self, role: Role, account: &Address) -> bool {
        let Some(set) = self.members.get_mut(&role) else {
            return false;
        };
        let removed = set.remove(account);
        if set.is_empty() {
            self.members.remove(&role);
        }
        removed
    }

    /// Members of `role` in address order
    pub fn members(&self, role: Role) -> Vec<Address> {
        self.members
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}
