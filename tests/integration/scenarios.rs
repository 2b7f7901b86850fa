//! End-to-end registry scenarios: Gotham, Bruce and the Joker.

use cityreg::clock::ManualClock;
use cityreg::token::StaticBalances;
use cityreg::{Address, AgentTraits, Persona, Registry, RegistryError, RegistryEvent};
use std::sync::Arc;

const ADMIN: Address = Address::repeat_byte(0xad);
const TOKEN: Address = Address::repeat_byte(0x70);
const USER_A: Address = Address::repeat_byte(0x0a);
const USER_B: Address = Address::repeat_byte(0x0b);
const ADDR_X: Address = Address::repeat_byte(0x58);
const ADDR_Y: Address = Address::repeat_byte(0x59);

fn gotham_registry() -> Registry {
    let balances = StaticBalances::new(TOKEN)
        .with_balance(ADDR_X, 5_000_000)
        .with_balance(ADDR_Y, 13);
    Registry::with_clock(
        ADMIN,
        AgentTraits {
            strength: 40,
            intelligence: 60,
            ..AgentTraits::default()
        },
        TOKEN,
        Arc::new(balances),
        Arc::new(ManualClock::new(1_700_000_000)),
    )
}

#[test]
fn test_gotham_is_founded_once() {
    let mut registry = gotham_registry();

    registry
        .create_city(&ADMIN, "Gotham", 1_000_000, 500_000)
        .unwrap();
    assert!(registry.city().is_initialized);
    assert!(matches!(
        registry.events().last(),
        Some(RegistryEvent::CityCreated { name, max_population: 500_000, .. }) if name == "Gotham"
    ));

    for (name, treasury, max_population) in [("Gotham", 1_000_000, 500_000), ("Bludhaven", 0, 1)] {
        assert_eq!(
            registry.create_city(&ADMIN, name, treasury, max_population),
            Err(RegistryError::CityAlreadyInitialized)
        );
    }
    assert_eq!(registry.city().name, "Gotham");
    assert_eq!(registry.city().treasury_balance, 1_000_000);
}

#[test]
fn test_bruce_is_protected() {
    let mut registry = gotham_registry();
    registry
        .create_city(&ADMIN, "Gotham", 1_000_000, 500_000)
        .unwrap();

    registry.create_agent(&USER_A, "Bruce", &ADDR_X, 15).unwrap();
    let bruce = registry.agent(&ADDR_X).cloned().unwrap();
    assert_eq!(bruce.balance, 0);
    assert_eq!(bruce.persona, Persona::None);
    assert_eq!(bruce.traits.intelligence, 60);

    assert_eq!(
        registry.kill_agent(&ADMIN, &ADDR_X),
        Err(RegistryError::CannotKillProtectedAgent(ADDR_X))
    );
    assert_eq!(registry.agent(&ADDR_X), Some(&bruce));
    assert_eq!(registry.agent_of_owner(&USER_A), Some(&ADDR_X));
}

#[test]
fn test_joker_is_killed_and_returns() {
    let mut registry = gotham_registry();
    registry
        .create_city(&ADMIN, "Gotham", 1_000_000, 500_000)
        .unwrap();

    registry.create_agent(&USER_B, "Joker", &ADDR_Y, 5).unwrap();
    registry.kill_agent(&ADMIN, &ADDR_Y).unwrap();
    assert!(matches!(
        registry.events().last(),
        Some(RegistryEvent::AgentKilled { killer, identity, .. })
            if *killer == ADMIN && *identity == ADDR_Y
    ));
    assert!(registry.agent(&ADDR_Y).is_none());
    assert!(registry.agent_of_owner(&USER_B).is_none());

    registry.create_agent(&USER_B, "Joker", &ADDR_Y, 5).unwrap();
    assert_eq!(registry.agent_of_owner(&USER_B), Some(&ADDR_Y));
}

#[test]
fn test_one_agent_per_owner_and_identity() {
    let mut registry = gotham_registry();
    registry.create_agent(&USER_A, "Bruce", &ADDR_X, 15).unwrap();

    assert_eq!(
        registry.create_agent(&USER_A, "Batman", &ADDR_Y, 20),
        Err(RegistryError::OwnerAgentAlreadyExists(USER_A))
    );
    assert_eq!(
        registry.create_agent(&USER_B, "Hush", &ADDR_X, 3),
        Err(RegistryError::AgentAlreadyLive(ADDR_X))
    );
    assert_eq!(registry.agent_count(), 1);
    assert_eq!(registry.agent(&ADDR_X).unwrap().name, "Bruce");
}

#[test]
fn test_created_event_reports_queried_balance() {
    let mut registry = gotham_registry();
    registry.create_agent(&USER_B, "Joker", &ADDR_Y, 5).unwrap();

    match registry.events().last() {
        Some(RegistryEvent::AgentCreated {
            balance, traits, ..
        }) => {
            assert_eq!(*balance, 13);
            assert_eq!(traits.strength, 40);
        }
        other => panic!("expected AgentCreated, got {:?}", other),
    }
    assert_eq!(registry.agent(&ADDR_Y).unwrap().balance, 0);
}

#[test]
fn test_rewards_and_withdrawals_change_nothing() {
    let mut registry = gotham_registry();
    registry
        .create_city(&ADMIN, "Gotham", 1_000_000, 500_000)
        .unwrap();
    registry.create_agent(&USER_A, "Bruce", &ADDR_X, 15).unwrap();
    let before = registry.snapshot();

    registry.claim_agent_rewards(&USER_A, &ADDR_X).unwrap();
    assert_eq!(
        registry.claim_agent_rewards(&USER_B, &ADDR_X),
        Err(RegistryError::OnlyOwnerCanClaim(ADDR_X))
    );
    assert_eq!(registry.snapshot(), before);

    registry.withdraw_admin_funds(&ADMIN).unwrap();
    let after = registry.snapshot();
    assert_eq!(after.city, before.city);
    assert_eq!(after.agents, before.agents);
    assert_eq!(after.log.len(), before.log.len() + 1);
}
