//! Configuration
//!
//! `RegistryConfig` is assembled from layered sources by [`ConfigLoader`]:
//! built-in defaults, the global config file, the workspace file, then
//! `CITYREG__*` environment variables.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::StorageConfig;

use crate::agent::AgentTraits;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::token::StaticBalances;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub token: TokenSection,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values the registry is initialized with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Initial admin; also the default caller for CLI commands
    #[serde(default)]
    pub admin: Option<Address>,

    /// Token whose balances are reported when agents are created
    #[serde(default)]
    pub token: Address,

    /// Traits copied into every new agent
    #[serde(default)]
    pub default_traits: AgentTraits,
}

/// Fixed token balances served to the registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenSection {
    #[serde(default)]
    pub balances: BTreeMap<Address, u64>,
}

impl RegistryConfig {
    /// Configured admin, or an error naming the missing key
    pub fn admin(&self) -> Result<Address, ApiError> {
        self.registry.admin.ok_or_else(|| {
            ApiError::ConfigError(
                "registry.admin is not set (config file or CITYREG__REGISTRY__ADMIN)".to_string(),
            )
        })
    }

    /// Balance table for the configured token
    pub fn balances(&self) -> StaticBalances {
        let mut balances = StaticBalances::new(self.registry.token);
        for (account, amount) in &self.token.balances {
            balances.set_balance(*account, u128::from(*amount));
        }
        balances
    }
}
