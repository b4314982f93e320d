use serde::{Deserialize, Serialize};

/// Armies granted to the active player at the start of every turn.
pub const INITIAL_REINFORCEMENTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
}

/// Authoritative game snapshot: the immutable player roster (turn order is
/// each player's position in it) and a monotonically increasing turn counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub players: Vec<Player>,
    pub turn: u32,
}

impl GameInfo {
    /// The player whose turn it is: `players[turn % players.len()]`.
    pub fn current_player(&self) -> Option<&Player> {
        if self.players.is_empty() {
            return None;
        }
        self.players.get(self.turn as usize % self.players.len())
    }
}

#[cfg(test)]
mod tests {
    use super::GameInfo;

    fn game(names: &[&str], turn: u32) -> GameInfo {
        serde_json::from_value(serde_json::json!({
            "players": names.iter().map(|n| serde_json::json!({"name": n})).collect::<Vec<_>>(),
            "turn": turn,
        }))
        .unwrap()
    }

    #[test]
    fn decodes_wire_shape() {
        let info: GameInfo =
            serde_json::from_str(r#"{"players":[{"name":"Alice"},{"name":"Bob"}],"turn":3}"#)
                .expect("valid game info body");
        assert_eq!(info.players.len(), 2);
        assert_eq!(info.turn, 3);
    }

    #[test]
    fn current_player_rotates_through_roster() {
        assert_eq!(game(&["Alice", "Bob"], 0).current_player().unwrap().name, "Alice");
        assert_eq!(game(&["Alice", "Bob"], 1).current_player().unwrap().name, "Bob");
        assert_eq!(game(&["Alice", "Bob"], 2).current_player().unwrap().name, "Alice");
        assert_eq!(game(&["Alice", "Bob", "Eve"], 7).current_player().unwrap().name, "Bob");
    }

    #[test]
    fn current_player_is_none_without_roster() {
        assert!(game(&[], 0).current_player().is_none());
    }
}
