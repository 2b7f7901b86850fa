//! Concurrent callers through the shared handle.

use cityreg::clock::ManualClock;
use cityreg::token::NoBalances;
use cityreg::{Address, AgentTraits, Operation, Registry, RegistryError, SharedRegistry};
use std::sync::{Arc, Barrier};
use std::thread;

const ADMIN: Address = Address::repeat_byte(0xad);

fn shared() -> SharedRegistry {
    SharedRegistry::new(Registry::with_clock(
        ADMIN,
        AgentTraits::default(),
        Address::ZERO,
        Arc::new(NoBalances),
        Arc::new(ManualClock::new(0)),
    ))
}

#[test]
fn test_kill_and_create_race_keeps_index_consistent() {
    let registry = shared();
    let owners: Vec<Address> = (1..=6).map(Address::repeat_byte).collect();
    let identities: Vec<Address> = (101..=106).map(Address::repeat_byte).collect();
    for (owner, identity) in owners.iter().zip(&identities) {
        registry
            .apply(
                owner,
                Operation::CreateAgent {
                    name: "Thug".to_string(),
                    identity: *identity,
                    reputation_score: 1,
                },
            )
            .unwrap();
    }

    let barrier = Arc::new(Barrier::new(owners.len() * 2));
    let mut handles = Vec::new();
    for (owner, identity) in owners.iter().copied().zip(identities.iter().copied()) {
        let killer = registry.clone();
        let kill_barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            kill_barrier.wait();
            let _ = killer.apply(&ADMIN, Operation::KillAgent { identity });
        }));

        let creator = registry.clone();
        let create_barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            create_barrier.wait();
            let _ = creator.apply(
                &owner,
                Operation::CreateAgent {
                    name: "Thug II".to_string(),
                    identity,
                    reputation_score: 1,
                },
            );
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = registry.snapshot();
    snapshot.check_consistency().unwrap();
    for (owner, identity) in owners.iter().zip(&identities) {
        match registry.agent_of_owner(owner) {
            Some(found) => assert_eq!(&found, identity),
            None => assert!(registry.agent(identity).is_none()),
        }
    }
}

#[test]
fn test_rejections_are_reported_to_each_caller() {
    let registry = shared();
    let identity = Address::repeat_byte(0x42);
    let handles: Vec<_> = (1..=4u8)
        .map(|seed| {
            let registry = registry.clone();
            thread::spawn(move || {
                registry.apply(
                    &Address::repeat_byte(seed),
                    Operation::CreateAgent {
                        name: format!("Claimant {}", seed),
                        identity,
                        reputation_score: 20,
                    },
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|err| *err == RegistryError::AgentAlreadyLive(identity)));

    let winner = registry.agent(&identity).unwrap();
    assert_eq!(registry.agent_of_owner(&winner.owner), Some(identity));
}
