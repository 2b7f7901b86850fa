//! Agent Domain
//!
//! Agent records, their persona and trait block, and the checks applied when
//! a new agent is registered.

mod record;
mod traits;
pub mod validation;

pub use record::{Agent, Persona, MIN_REPUTATION_SCORE};
pub use traits::AgentTraits;
pub use validation::validate_agent_params;
