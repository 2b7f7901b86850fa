//! Registry
//!
//! Owns the city slot, the agent table, the owner index and role membership.
//! Operations are applied one at a time through `&mut self`. A rejected
//! operation leaves every field untouched, emits nothing, and appends nothing
//! to the transaction log.

mod operation;
mod snapshot;

pub use operation::Operation;
pub use snapshot::RegistrySnapshot;

use crate::access::{Role, RoleSet};
use crate::agent::{validate_agent_params, Agent, AgentTraits, Persona};
use crate::city::{validate_city_params, City};
use crate::clock::{Clock, SystemClock};
use crate::error::RegistryError;
use crate::events::{LogEntry, RegistryEvent};
use crate::token::BalanceQuery;
use crate::types::{Address, Balance, Timestamp};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// City and agent registry
pub struct Registry {
    roles: RoleSet,
    default_traits: AgentTraits,
    token: Address,
    balances: Arc<dyn BalanceQuery>,
    clock: Arc<dyn Clock>,
    city: City,
    agents: BTreeMap<Address, Agent>,
    owner_to_agent: BTreeMap<Address, Address>,
    log: Vec<LogEntry>,
}

impl Registry {
    /// Create a registry using the system clock
    pub fn new(
        admin: Address,
        default_traits: AgentTraits,
        token: Address,
        balances: Arc<dyn BalanceQuery>,
    ) -> Self {
        Self::with_clock(admin, default_traits, token, balances, Arc::new(SystemClock))
    }

    /// Create a registry with an explicit clock
    ///
    /// Grants the admin role to `admin` and records the genesis entry of the
    /// transaction log. Trait values are stored as given.
    pub fn with_clock(
        admin: Address,
        default_traits: AgentTraits,
        token: Address,
        balances: Arc<dyn BalanceQuery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut registry = Self {
            roles: RoleSet::new(),
            default_traits,
            token,
            balances,
            clock,
            city: City::default(),
            agents: BTreeMap::new(),
            owner_to_agent: BTreeMap::new(),
            log: Vec::new(),
        };

        let now = registry.clock.now();
        let mut events = Vec::new();
        registry.roles.grant(Role::Admin, admin);
        registry.emit(
            &mut events,
            RegistryEvent::RoleGranted {
                role: Role::Admin,
                account: admin,
                sender: admin,
            },
        );
        registry.append(
            admin,
            Operation::Initialize {
                admin,
                default_traits,
                token,
            },
            now,
            events,
        );

        info!(admin = %admin, token = %token, "Registry initialized");
        registry
    }

    /// Apply one operation on behalf of `caller`
    ///
    /// Returns the events the operation emitted. Accepted operations that
    /// change state are appended to the transaction log.
    pub fn apply(
        &mut self,
        caller: &Address,
        operation: Operation,
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        let now = self.clock.now();
        match self.dispatch(caller, &operation, now) {
            Ok(events) => {
                if !operation.is_read_only() {
                    self.append(*caller, operation, now, events.clone());
                }
                Ok(events)
            }
            Err(err) => {
                warn!(
                    caller = %caller,
                    operation = operation.name(),
                    error = %err,
                    "Operation rejected"
                );
                Err(err)
            }
        }
    }

    /// Create the city. Admin only, at most once.
    pub fn create_city(
        &mut self,
        caller: &Address,
        name: &str,
        treasury_balance: Balance,
        max_population: u64,
    ) -> Result<(), RegistryError> {
        self.apply(
            caller,
            Operation::CreateCity {
                name: name.to_string(),
                treasury_balance,
                max_population,
            },
        )
        .map(|_| ())
    }

    /// Register an agent at `identity` owned by `caller`
    ///
    /// Any caller may claim any free identity; control of the identity
    /// itself is not verified.
    pub fn create_agent(
        &mut self,
        caller: &Address,
        name: &str,
        identity: &Address,
        reputation_score: u16,
    ) -> Result<(), RegistryError> {
        self.apply(
            caller,
            Operation::CreateAgent {
                name: name.to_string(),
                identity: *identity,
                reputation_score,
            },
        )
        .map(|_| ())
    }

    /// Erase an unprotected agent. Admin only.
    pub fn kill_agent(&mut self, caller: &Address, identity: &Address) -> Result<(), RegistryError> {
        self.apply(
            caller,
            Operation::KillAgent {
                identity: *identity,
            },
        )
        .map(|_| ())
    }

    /// Check that `caller` may claim rewards for the agent at `identity`
    ///
    /// Rewards are not computed; the call validates and changes nothing.
    pub fn claim_agent_rewards(
        &self,
        caller: &Address,
        identity: &Address,
    ) -> Result<(), RegistryError> {
        self.check_claim(caller, identity).map_err(|err| {
            warn!(
                caller = %caller,
                operation = "claim_agent_rewards",
                error = %err,
                "Operation rejected"
            );
            err
        })
    }

    /// Admin-gated withdrawal. No funds are moved.
    pub fn withdraw_admin_funds(&mut self, caller: &Address) -> Result<(), RegistryError> {
        self.apply(caller, Operation::WithdrawAdminFunds).map(|_| ())
    }

    /// Grant `role` to `account`. Admin only; a no-op if already held.
    pub fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), RegistryError> {
        self.apply(
            caller,
            Operation::GrantRole {
                role,
                account: *account,
            },
        )
        .map(|_| ())
    }

    /// Revoke `role` from `account`. Admin only; a no-op if not held.
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), RegistryError> {
        self.apply(
            caller,
            Operation::RevokeRole {
                role,
                account: *account,
            },
        )
        .map(|_| ())
    }

    /// Give up `role`. `account` must be the caller.
    pub fn renounce_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), RegistryError> {
        self.apply(
            caller,
            Operation::RenounceRole {
                role,
                account: *account,
            },
        )
        .map(|_| ())
    }

    /// Live agent stored at `identity`
    pub fn agent(&self, identity: &Address) -> Option<&Agent> {
        self.agents.get(identity)
    }

    /// Identity of the live agent owned by `owner`
    pub fn agent_of_owner(&self, owner: &Address) -> Option<&Address> {
        self.owner_to_agent.get(owner)
    }

    /// Current city slot; `is_initialized` is false until the city exists.
    pub fn city(&self) -> &City {
        &self.city
    }

    /// Live agents in identity order
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles.has_role(role, account)
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        self.has_role(Role::Admin, account)
    }

    pub fn admins(&self) -> Vec<Address> {
        self.roles.members(Role::Admin)
    }

    pub fn default_traits(&self) -> &AgentTraits {
        &self.default_traits
    }

    /// Token whose balances are reported in `AgentCreated`
    pub fn token(&self) -> &Address {
        &self.token
    }

    /// Transaction log, genesis entry first
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Every event emitted so far, in emission order
    pub fn events(&self) -> impl Iterator<Item = &RegistryEvent> {
        self.log.iter().flat_map(|entry| entry.events.iter())
    }

    fn dispatch(
        &mut self,
        caller: &Address,
        operation: &Operation,
        now: Timestamp,
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        match operation {
            Operation::Initialize { .. } => Err(RegistryError::InvalidInitialization),
            Operation::CreateCity {
                name,
                treasury_balance,
                max_population,
            } => self.exec_create_city(caller, name, *treasury_balance, *max_population, now),
            Operation::CreateAgent {
                name,
                identity,
                reputation_score,
            } => self.exec_create_agent(caller, name, identity, *reputation_score, now),
            Operation::KillAgent { identity } => self.exec_kill_agent(caller, identity, now),
            Operation::ClaimAgentRewards { identity } => {
                self.check_claim(caller, identity)?;
                Ok(Vec::new())
            }
            Operation::WithdrawAdminFunds => {
                self.roles.verify(Role::Admin, caller)?;
                debug!(caller = %caller, "Admin withdrawal requested; nothing to withdraw");
                Ok(Vec::new())
            }
            Operation::GrantRole { role, account } => {
                self.roles.verify(Role::Admin, caller)?;
                let mut events = Vec::new();
                if self.roles.grant(*role, *account) {
                    self.emit(
                        &mut events,
                        RegistryEvent::RoleGranted {
                            role: *role,
                            account: *account,
                            sender: *caller,
                        },
                    );
                }
                Ok(events)
            }
            Operation::RevokeRole { role, account } => {
                self.roles.verify(Role::Admin, caller)?;
                Ok(self.exec_remove_role(caller, *role, account))
            }
            Operation::RenounceRole { role, account } => {
                if account != caller {
                    return Err(RegistryError::BadConfirmation);
                }
                Ok(self.exec_remove_role(caller, *role, account))
            }
        }
    }

    fn exec_create_city(
        &mut self,
        caller: &Address,
        name: &str,
        treasury_balance: Balance,
        max_population: u64,
        now: Timestamp,
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        self.roles.verify(Role::Admin, caller)?;
        validate_city_params(name, max_population)?;
        if self.city.is_initialized {
            return Err(RegistryError::CityAlreadyInitialized);
        }

        // CityCreated goes out before the slot is written.
        let mut events = Vec::new();
        self.emit(
            &mut events,
            RegistryEvent::CityCreated {
                creator: *caller,
                name: name.to_string(),
                max_population,
                timestamp: now,
            },
        );
        self.city = City::founded(name.to_string(), treasury_balance, max_population, now);

        info!(
            city = name,
            max_population,
            treasury_balance = %treasury_balance,
            "City created"
        );
        Ok(events)
    }

    fn exec_create_agent(
        &mut self,
        caller: &Address,
        name: &str,
        identity: &Address,
        reputation_score: u16,
        now: Timestamp,
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        validate_agent_params(name)?;
        if self.agents.contains_key(identity) {
            return Err(RegistryError::AgentAlreadyLive(*identity));
        }
        if self.owner_to_agent.contains_key(caller) {
            return Err(RegistryError::OwnerAgentAlreadyExists(*caller));
        }

        // The queried balance is reported, never stored.
        let queried_balance = self.balances.balance_of(&self.token, identity);

        let mut events = Vec::new();
        self.emit(
            &mut events,
            RegistryEvent::AgentCreated {
                owner: *caller,
                name: name.to_string(),
                identity: *identity,
                persona: Persona::None,
                balance: queried_balance,
                traits: self.default_traits,
                timestamp: now,
                reputation_score,
            },
        );

        self.agents.insert(
            *identity,
            Agent {
                name: name.to_string(),
                owner: *caller,
                identity: *identity,
                persona: Persona::None,
                balance: 0,
                traits: self.default_traits,
                date_of_birth: now,
                is_alive: true,
                reputation_score,
            },
        );
        self.owner_to_agent.insert(*caller, *identity);

        info!(
            owner = %caller,
            identity = %identity,
            agent_name = name,
            reputation_score,
            "Agent created"
        );
        Ok(events)
    }

    fn exec_kill_agent(
        &mut self,
        caller: &Address,
        identity: &Address,
        now: Timestamp,
    ) -> Result<Vec<RegistryEvent>, RegistryError> {
        self.roles.verify(Role::Admin, caller)?;
        let agent = self
            .agents
            .get(identity)
            .filter(|agent| agent.is_alive)
            .ok_or(RegistryError::AgentNotAlive(*identity))?;
        if agent.is_protected() {
            return Err(RegistryError::CannotKillProtectedAgent(*identity));
        }
        let owner = agent.owner;

        let mut events = Vec::new();
        self.emit(
            &mut events,
            RegistryEvent::AgentKilled {
                killer: *caller,
                identity: *identity,
                timestamp: now,
            },
        );
        self.owner_to_agent.remove(&owner);
        self.agents.remove(identity);

        info!(identity = %identity, owner = %owner, "Agent killed");
        Ok(events)
    }

    fn exec_remove_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Vec<RegistryEvent> {
        let mut events = Vec::new();
        if self.roles.revoke(role, account) {
            self.emit(
                &mut events,
                RegistryEvent::RoleRevoked {
                    role,
                    account: *account,
                    sender: *caller,
                },
            );
        }
        events
    }

    fn check_claim(&self, caller: &Address, identity: &Address) -> Result<(), RegistryError> {
        let agent = self
            .agents
            .get(identity)
            .filter(|agent| agent.is_alive)
            .ok_or(RegistryError::AgentNotAlive(*identity))?;
        if agent.owner != *caller {
            return Err(RegistryError::OnlyOwnerCanClaim(*identity));
        }
        Ok(())
    }

    fn emit(&self, events: &mut Vec<RegistryEvent>, event: RegistryEvent) {
        debug!(target: "cityreg::events", event = event.name(), "Event emitted");
        events.push(event);
    }

    fn append(
        &mut self,
        caller: Address,
        operation: Operation,
        timestamp: Timestamp,
        events: Vec<RegistryEvent>,
    ) {
        let sequence = self.log.len() as u64;
        debug!(sequence, operation = operation.name(), "Log entry appended");
        self.log.push(LogEntry {
            sequence,
            caller,
            operation,
            timestamp,
            events,
        });
    }
}
