//! CLI Tooling
//!
//! Command-line interface for a workspace registry. Every mutating command
//! loads the stored snapshot, applies one operation, and saves the result
//! only when the operation was accepted.

use crate::access::Role;
use crate::agent::Agent;
use crate::city::City;
use crate::clock::SystemClock;
use crate::config::{ConfigLoader, RegistryConfig};
use crate::error::{ApiError, RegistryError, StorageError};
use crate::events::{LogEntry, RegistryEvent};
use crate::logging::LoggingConfig;
use crate::registry::{Operation, Registry};
use crate::store::{RegistryStore, SledRegistryStore};
use crate::types::{Address, Balance, Timestamp};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Cityreg CLI - permissioned city and agent registry
#[derive(Parser)]
#[command(name = "cityreg")]
#[command(about = "Permissioned city and agent registry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to act as (defaults to the configured admin)
    #[arg(long = "as", value_name = "ADDRESS")]
    pub caller: Option<Address>,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags over the configured logging section
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

/// Output format for read commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the registry from configuration
    Init,
    /// City commands
    City {
        #[command(subcommand)]
        command: CityCommands,
    },
    /// Agent commands
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Admin commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Show the transaction log
    Log {
        /// Only show the last N entries
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum CityCommands {
    /// Found the city (admin only, once)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "0")]
        treasury: Balance,
        #[arg(long)]
        max_population: u64,
    },
    /// Show the city
    Show {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum AgentCommands {
    /// Register an agent owned by the caller
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        identity: Address,
        #[arg(long, default_value = "0")]
        reputation: u16,
    },
    /// Remove an unprotected agent (admin only)
    Kill {
        #[arg(long)]
        identity: Address,
    },
    /// Check that the caller may claim an agent's rewards
    Claim {
        #[arg(long)]
        identity: Address,
    },
    /// Show one agent
    Show {
        #[arg(long)]
        identity: Address,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the agent owned by an address
    Owner {
        #[arg(long)]
        owner: Address,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List live agents
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Admin withdrawal (moves no funds)
    Withdraw,
    /// Grant the admin role
    Grant {
        #[arg(long)]
        account: Address,
    },
    /// Revoke the admin role
    Revoke {
        #[arg(long)]
        account: Address,
    },
    /// Give up the caller's admin role
    Renounce,
    /// List admins
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// CLI context for executing commands against one workspace store
pub struct CliContext {
    config: RegistryConfig,
    store: SledRegistryStore,
    store_path: PathBuf,
    caller: Option<Address>,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    /// Create a context from an already loaded configuration
    pub fn with_config(workspace_root: PathBuf, config: RegistryConfig) -> Result<Self, ApiError> {
        let store_path = config.storage.resolve_path(&workspace_root)?;
        std::fs::create_dir_all(&store_path)
            .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
        let store = SledRegistryStore::open(&store_path)?;

        Ok(Self {
            config,
            store,
            store_path,
            caller: None,
        })
    }

    /// Act as `caller` instead of the configured admin
    pub fn with_caller(mut self, caller: Option<Address>) -> Self {
        self.caller = caller;
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Init => self.init(),
            Commands::City { command } => self.execute_city(command),
            Commands::Agent { command } => self.execute_agent(command),
            Commands::Admin { command } => self.execute_admin(command),
            Commands::Log { limit, format } => {
                let registry = self.load_registry()?;
                let log = registry.log();
                let start = limit.map(|n| log.len().saturating_sub(n)).unwrap_or(0);
                Ok(match format {
                    OutputFormat::Text => format_log_text(&log[start..]),
                    OutputFormat::Json => to_json(&log[start..]),
                })
            }
        }
    }

    fn init(&self) -> Result<String, ApiError> {
        if self.store.exists()? {
            return Err(RegistryError::InvalidInitialization.into());
        }
        let admin = self.caller()?;
        let registry = Registry::new(
            admin,
            self.config.registry.default_traits,
            self.config.registry.token,
            Arc::new(self.config.balances()),
        );
        self.store.save(&registry.snapshot())?;
        info!(store = %self.store_path.display(), admin = %admin, "Registry stored");

        let mut output = format!("Registry initialized at {}\n", self.store_path.display());
        output.push_str(&format!("Admin: {}\n", admin));
        output.push_str(&format!("Token: {}", registry.token()));
        Ok(output)
    }

    fn execute_city(&self, command: &CityCommands) -> Result<String, ApiError> {
        match command {
            CityCommands::Create {
                name,
                treasury,
                max_population,
            } => {
                let events = self.commit(Operation::CreateCity {
                    name: name.clone(),
                    treasury_balance: *treasury,
                    max_population: *max_population,
                })?;
                Ok(format_outcome("City created", &events))
            }
            CityCommands::Show { format } => {
                let registry = self.load_registry()?;
                Ok(match format {
                    OutputFormat::Text => format_city_text(registry.city()),
                    OutputFormat::Json => to_json(registry.city()),
                })
            }
        }
    }

    fn execute_agent(&self, command: &AgentCommands) -> Result<String, ApiError> {
        match command {
            AgentCommands::Create {
                name,
                identity,
                reputation,
            } => {
                let events = self.commit(Operation::CreateAgent {
                    name: name.clone(),
                    identity: *identity,
                    reputation_score: *reputation,
                })?;
                Ok(format_outcome("Agent created", &events))
            }
            AgentCommands::Kill { identity } => {
                let events = self.commit(Operation::KillAgent {
                    identity: *identity,
                })?;
                Ok(format_outcome("Agent killed", &events))
            }
            AgentCommands::Claim { identity } => {
                let caller = self.caller()?;
                let registry = self.load_registry()?;
                registry.claim_agent_rewards(&caller, identity)?;
                Ok(format!(
                    "Claim accepted for agent {}; no rewards are payable",
                    identity
                ))
            }
            AgentCommands::Show { identity, format } => {
                let registry = self.load_registry()?;
                let agent = registry
                    .agent(identity)
                    .ok_or(RegistryError::AgentNotAlive(*identity))?;
                Ok(match format {
                    OutputFormat::Text => format_agent_text(agent),
                    OutputFormat::Json => to_json(agent),
                })
            }
            AgentCommands::Owner { owner, format } => {
                let registry = self.load_registry()?;
                let agent = registry
                    .agent_of_owner(owner)
                    .and_then(|identity| registry.agent(identity));
                Ok(match (agent, format) {
                    (Some(agent), OutputFormat::Text) => format_agent_text(agent),
                    (None, OutputFormat::Text) => format!("Owner {} has no live agent", owner),
                    (agent, OutputFormat::Json) => to_json(&json!({
                        "owner": owner,
                        "agent": agent,
                    })),
                })
            }
            AgentCommands::List { format } => {
                let registry = self.load_registry()?;
                let agents: Vec<&Agent> = registry.agents().collect();
                Ok(match format {
                    OutputFormat::Text => format_agent_list_text(&agents),
                    OutputFormat::Json => to_json(&json!({
                        "agents": agents,
                        "total": agents.len(),
                    })),
                })
            }
        }
    }

    fn execute_admin(&self, command: &AdminCommands) -> Result<String, ApiError> {
        match command {
            AdminCommands::Withdraw => {
                let events = self.commit(Operation::WithdrawAdminFunds)?;
                Ok(format_outcome("Withdrawal recorded; no funds moved", &events))
            }
            AdminCommands::Grant { account } => {
                let events = self.commit(Operation::GrantRole {
                    role: Role::Admin,
                    account: *account,
                })?;
                Ok(format_outcome("Grant applied", &events))
            }
            AdminCommands::Revoke { account } => {
                let events = self.commit(Operation::RevokeRole {
                    role: Role::Admin,
                    account: *account,
                })?;
                Ok(format_outcome("Revoke applied", &events))
            }
            AdminCommands::Renounce => {
                let caller = self.caller()?;
                let events = self.commit(Operation::RenounceRole {
                    role: Role::Admin,
                    account: caller,
                })?;
                Ok(format_outcome("Role renounced", &events))
            }
            AdminCommands::List { format } => {
                let registry = self.load_registry()?;
                let admins = registry.admins();
                Ok(match format {
                    OutputFormat::Text => {
                        let mut output = format!("{}\n", "Admins".bold());
                        for admin in &admins {
                            output.push_str(&format!("  {}\n", admin));
                        }
                        output.push_str(&format!("\nTotal: {} admin(s)", admins.len()));
                        output
                    }
                    OutputFormat::Json => to_json(&json!({ "admins": admins })),
                })
            }
        }
    }

    fn caller(&self) -> Result<Address, ApiError> {
        match self.caller {
            Some(caller) => Ok(caller),
            None => self.config.admin(),
        }
    }

    fn load_registry(&self) -> Result<Registry, ApiError> {
        let snapshot = self
            .store
            .load()?
            .ok_or_else(|| ApiError::NotInitialized(self.store_path.clone()))?;
        Ok(Registry::from_snapshot(
            snapshot,
            Arc::new(self.config.balances()),
            Arc::new(SystemClock),
        )?)
    }

    /// Load, apply one operation, and save only if it was accepted
    fn commit(&self, operation: Operation) -> Result<Vec<RegistryEvent>, ApiError> {
        let caller = self.caller()?;
        let mut registry = self.load_registry()?;
        let events = registry.apply(&caller, operation)?;
        self.store.save(&registry.snapshot())?;
        Ok(events)
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn format_timestamp(timestamp: Timestamp) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| timestamp.to_string())
}

/// One line per emitted event, under a headline
fn format_outcome(headline: &str, events: &[RegistryEvent]) -> String {
    let mut output = headline.to_string();
    if events.is_empty() {
        output.push_str("\n  (no events)");
    }
    for event in events {
        output.push_str(&format!("\n  {}", describe_event(event)));
    }
    output
}

fn describe_event(event: &RegistryEvent) -> String {
    match event {
        RegistryEvent::CityCreated {
            creator,
            name,
            max_population,
            timestamp,
        } => format!(
            "CityCreated name={} max_population={} creator={} at={}",
            name,
            max_population,
            creator,
            format_timestamp(*timestamp)
        ),
        RegistryEvent::AgentCreated {
            owner,
            name,
            identity,
            balance,
            reputation_score,
            timestamp,
            ..
        } => format!(
            "AgentCreated name={} identity={} owner={} balance={} reputation={} at={}",
            name,
            identity,
            owner,
            balance,
            reputation_score,
            format_timestamp(*timestamp)
        ),
        RegistryEvent::AgentKilled {
            killer,
            identity,
            timestamp,
        } => format!(
            "AgentKilled identity={} killer={} at={}",
            identity,
            killer,
            format_timestamp(*timestamp)
        ),
        RegistryEvent::RoleGranted {
            role,
            account,
            sender,
        } => format!("RoleGranted role={} account={} sender={}", role, account, sender),
        RegistryEvent::RoleRevoked {
            role,
            account,
            sender,
        } => format!("RoleRevoked role={} account={} sender={}", role, account, sender),
    }
}

fn format_city_text(city: &City) -> String {
    if !city.is_initialized {
        return "No city has been created.".to_string();
    }
    let mut output = format!("{}\n", format!("City: {}", city.name).bold());
    output.push_str(&format!(
        "Population: {} / {}\n",
        city.current_population, city.max_population
    ));
    output.push_str(&format!("Treasury: {}\n", city.treasury_balance));
    output.push_str(&format!("Founded: {}", format_timestamp(city.created_at)));
    output
}

fn format_agent_text(agent: &Agent) -> String {
    let mut output = format!("{}\n", format!("Agent: {}", agent.name).bold());
    output.push_str(&format!("Identity: {}\n", agent.identity));
    output.push_str(&format!("Owner: {}\n", agent.owner));
    output.push_str(&format!("Persona: {}\n", agent.persona));
    output.push_str(&format!("Balance: {}\n", agent.balance));
    output.push_str(&format!(
        "Reputation: {}{}\n",
        agent.reputation_score,
        if agent.is_protected() { " (protected)" } else { "" }
    ));
    output.push_str(&format!("Born: {}\n", format_timestamp(agent.date_of_birth)));

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Trait", "Value"]);
    for (name, value) in agent.traits.entries() {
        table.add_row(vec![name.to_string(), value.to_string()]);
    }
    output.push_str(&table.to_string());
    output
}

fn format_agent_list_text(agents: &[&Agent]) -> String {
    if agents.is_empty() {
        return "No live agents.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Identity", "Name", "Owner", "Reputation", "Protected"]);
    for agent in agents {
        table.add_row(vec![
            agent.identity.to_string(),
            agent.name.clone(),
            agent.owner.to_string(),
            agent.reputation_score.to_string(),
            if agent.is_protected() { "yes" } else { "no" }.to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} agent(s)", table, agents.len())
}

fn format_log_text(entries: &[LogEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Seq", "Operation", "Caller", "Time", "Events"]);
    for entry in entries {
        let events: Vec<&str> = entry.events.iter().map(|e| e.name()).collect();
        table.add_row(vec![
            entry.sequence.to_string(),
            entry.operation.name().to_string(),
            entry.caller.to_string(),
            format_timestamp(entry.timestamp),
            if events.is_empty() {
                "-".to_string()
            } else {
                events.join(", ")
            },
        ]);
    }
    table.to_string()
}
