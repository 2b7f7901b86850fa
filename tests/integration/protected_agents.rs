//! Property tests for the reputation protection threshold.

use cityreg::clock::ManualClock;
use cityreg::token::NoBalances;
use cityreg::{Address, AgentTraits, Registry, RegistryError, MIN_REPUTATION_SCORE};
use proptest::prelude::*;
use std::sync::Arc;

const ADMIN: Address = Address::repeat_byte(0xad);

fn registry() -> Registry {
    Registry::with_clock(
        ADMIN,
        AgentTraits::default(),
        Address::ZERO,
        Arc::new(NoBalances),
        Arc::new(ManualClock::new(0)),
    )
}

fn address(seed: u8) -> Address {
    Address::repeat_byte(seed)
}

proptest! {
    #[test]
    fn protected_agents_survive_repeated_kills(
        score in MIN_REPUTATION_SCORE..=u16::MAX,
        attempts in 1usize..8,
    ) {
        let mut registry = registry();
        let owner = address(1);
        let identity = address(2);
        registry.create_agent(&owner, "Bruce", &identity, score).unwrap();
        let before = registry.agent(&identity).cloned();
        let log_len = registry.log().len();

        for _ in 0..attempts {
            prop_assert_eq!(
                registry.kill_agent(&ADMIN, &identity),
                Err(RegistryError::CannotKillProtectedAgent(identity))
            );
        }

        prop_assert_eq!(registry.agent(&identity).cloned(), before);
        prop_assert_eq!(registry.agent_of_owner(&owner), Some(&identity));
        prop_assert_eq!(registry.log().len(), log_len);
    }

    #[test]
    fn unprotected_agents_can_be_killed(score in 0u16..MIN_REPUTATION_SCORE) {
        let mut registry = registry();
        let owner = address(3);
        let identity = address(4);
        registry.create_agent(&owner, "Joker", &identity, score).unwrap();

        prop_assert!(registry.kill_agent(&ADMIN, &identity).is_ok());
        prop_assert!(registry.agent(&identity).is_none());
        prop_assert!(registry.agent_of_owner(&owner).is_none());
    }

    #[test]
    fn protected_set_never_shrinks(
        scores in proptest::collection::vec(0u16..40, 1..20),
        kill_order in proptest::collection::vec(0usize..20, 0..40),
    ) {
        let mut registry = registry();
        for (i, score) in scores.iter().enumerate() {
            let seed = i as u8 + 10;
            registry
                .create_agent(&address(seed), "Citizen", &address(seed + 100), *score)
                .unwrap();
        }
        let protected: Vec<Address> = registry
            .agents()
            .filter(|agent| agent.is_protected())
            .map(|agent| agent.identity)
            .collect();

        for index in kill_order {
            let identity = address((index % scores.len()) as u8 + 110);
            let _ = registry.kill_agent(&ADMIN, &identity);
        }

        for identity in &protected {
            prop_assert!(registry.agent(identity).is_some());
        }
        prop_assert!(registry.agents().all(|agent| agent.is_alive));
        prop_assert_eq!(
            registry.agents().filter(|agent| !agent.is_protected()).count(),
            registry.agent_count() - protected.len()
        );
    }
}
