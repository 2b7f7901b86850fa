//! City record
//!
//! A registry holds at most one city. It is created once and never updated:
//! `current_population` and `treasury_balance` keep their creation values.

use crate::error::RegistryError;
use crate::types::{Balance, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub current_population: u64,
    pub max_population: u64,
    pub treasury_balance: Balance,
    pub created_at: Timestamp,
    pub is_initialized: bool,
}

impl City {
    pub(crate) fn founded(
        name: String,
        treasury_balance: Balance,
        max_population: u64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            name,
            current_population: 0,
            max_population,
            treasury_balance,
            created_at,
            is_initialized: true,
        }
    }
}

/// Validate the parameters of a new city.
pub fn validate_city_params(name: &str, max_population: u64) -> Result<(), RegistryError> {
    if name.is_empty() || max_population == 0 {
        return Err(RegistryError::InvalidCityParams);
    }
    Ok(())
}
