use serde::{Deserialize, Serialize};

/// Dense, zero-based territory identifier. The store keeps territories in a
/// vec sorted so that index == id, and the interaction index uses this id as
/// the sole join key back into the store.
pub type TerritoryId = usize;

/// Owner reference as it appears on the wire: `{"name": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub name: String,
}

/// A map region with an owning player and an army count. The set of
/// territories is fixed for the game's lifetime; only `owner` and `armies`
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub owner: PlayerRef,
    pub armies: u32,
}

impl Territory {
    pub fn is_owned_by(&self, player: &str) -> bool {
        self.owner.name == player
    }
}
