//! Agent parameter validation owned by the agent domain.

use crate::error::RegistryError;

/// Validate the parameters of a new agent.
pub fn validate_agent_params(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::InvalidAgentParams);
    }
    Ok(())
}
