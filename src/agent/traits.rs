//! Agent trait block copied into every new agent.

use serde::{Deserialize, Serialize};

/// Fixed numeric traits of an agent
///
/// Ranges are conventions only: attribute fields are expected in [0, 100],
/// `morality` and `reputation` in [-100, 100]. Nothing enforces them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentTraits {
    #[serde(default)]
    pub strength: u8,
    #[serde(default)]
    pub agility: u8,
    #[serde(default)]
    pub intelligence: u8,
    #[serde(default)]
    pub willpower: u8,
    #[serde(default)]
    pub manipulation: u8,
    #[serde(default)]
    pub intimidation: u8,
    #[serde(default)]
    pub stealth: u8,
    #[serde(default)]
    pub perception: u8,
    #[serde(default)]
    pub morality: i8,
    #[serde(default)]
    pub reputation: i8,
    #[serde(default)]
    pub wealth: u16,
}

impl AgentTraits {
    /// Field names paired with their values, in declaration order.
    pub fn entries(&self) -> [(&'static str, i32); 11] {
        [
            ("strength", i32::from(self.strength)),
            ("agility", i32::from(self.agility)),
            ("intelligence", i32::from(self.intelligence)),
            ("willpower", i32::from(self.willpower)),
            ("manipulation", i32::from(self.manipulation)),
            ("intimidation", i32::from(self.intimidation)),
            ("stealth", i32::from(self.stealth)),
            ("perception", i32::from(self.perception)),
            ("morality", i32::from(self.morality)),
            ("reputation", i32::from(self.reputation)),
            ("wealth", i32::from(self.wealth)),
        ]
    }
}
