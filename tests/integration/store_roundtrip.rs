//! Registry state restored from a sled store.

use cityreg::clock::ManualClock;
use cityreg::store::{RegistryStore, SledRegistryStore};
use cityreg::token::StaticBalances;
use cityreg::{Address, AgentTraits, Registry, RegistryError, StorageError};
use std::sync::Arc;
use tempfile::TempDir;

const ADMIN: Address = Address::repeat_byte(0xad);
const TOKEN: Address = Address::repeat_byte(0x70);
const BRUCE: Address = Address::repeat_byte(0x58);
const JOKER: Address = Address::repeat_byte(0x59);

fn balances() -> Arc<StaticBalances> {
    Arc::new(StaticBalances::new(TOKEN).with_balance(JOKER, 99))
}

fn populated(clock: Arc<ManualClock>) -> Registry {
    let mut registry = Registry::with_clock(
        ADMIN,
        AgentTraits {
            perception: 70,
            ..AgentTraits::default()
        },
        TOKEN,
        balances(),
        clock,
    );
    registry
        .create_city(&ADMIN, "Gotham", 1_000_000, 500_000)
        .unwrap();
    registry
        .create_agent(&Address::repeat_byte(1), "Bruce", &BRUCE, 15)
        .unwrap();
    registry
        .create_agent(&Address::repeat_byte(2), "Joker", &JOKER, 5)
        .unwrap();
    registry
}

#[test]
fn test_restored_registry_answers_identically() {
    let temp_dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(100));
    let original = populated(clock.clone());

    {
        let store = SledRegistryStore::open(temp_dir.path()).unwrap();
        store.save(&original.snapshot()).unwrap();
    }

    let store = SledRegistryStore::open(temp_dir.path()).unwrap();
    let snapshot = store.load().unwrap().unwrap();
    let mut restored = Registry::from_snapshot(snapshot, balances(), clock.clone()).unwrap();

    assert_eq!(restored.city(), original.city());
    assert_eq!(restored.agent(&BRUCE), original.agent(&BRUCE));
    assert_eq!(
        restored.agent_of_owner(&Address::repeat_byte(2)),
        Some(&JOKER)
    );
    assert_eq!(restored.log(), original.log());
    assert!(restored.is_admin(&ADMIN));

    // The restored registry keeps enforcing the same rules.
    assert_eq!(
        restored.kill_agent(&ADMIN, &BRUCE),
        Err(RegistryError::CannotKillProtectedAgent(BRUCE))
    );
    clock.advance(10);
    restored.kill_agent(&ADMIN, &JOKER).unwrap();
    assert_eq!(restored.log().last().unwrap().sequence, 4);
    assert_eq!(restored.log().last().unwrap().timestamp, 110);
}

#[test]
fn test_inconsistent_snapshot_is_rejected() {
    let clock = Arc::new(ManualClock::new(0));
    let mut snapshot = populated(clock.clone()).snapshot();
    snapshot.owner_to_agent.insert(Address::repeat_byte(9), BRUCE);

    let result = Registry::from_snapshot(snapshot, balances(), clock);
    assert!(matches!(result, Err(StorageError::Corrupt(_))));
}
