//! Integration tests for the city and agent registry

mod cli_workflow;
mod protected_agents;
mod scenarios;
mod shared_registry;
mod store_roundtrip;
