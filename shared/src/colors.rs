use std::collections::HashMap;

use crate::game::Player;

/// Display palette, assigned to players by their position in the
/// authoritative roster.
pub const PALETTE: [&str; 7] = [
    "#51d0ff", "#ff5151", "#51ffa2", "#ffff51", "#af66ff", "#ff66cc", "#afafaf",
];

/// Positional player→color assignment. Built once from the fetched roster
/// and stable for the whole session; region fills reference it continuously,
/// so it must never be rebuilt from a reordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerColors {
    by_name: HashMap<String, &'static str>,
}

impl PlayerColors {
    /// First roster entry → first palette entry, and so on. Rosters larger
    /// than the palette wrap around.
    pub fn from_players(players: &[Player]) -> Self {
        let by_name = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), PALETTE[i % PALETTE.len()]))
            .collect();
        Self { by_name }
    }

    pub fn color_of(&self, name: &str) -> Option<&'static str> {
        self.by_name.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{PALETTE, PlayerColors};
    use crate::game::Player;

    fn roster(names: &[&str]) -> Vec<Player> {
        names.iter().map(|n| Player { name: (*n).into() }).collect()
    }

    #[test]
    fn assignment_follows_roster_order() {
        let colors = PlayerColors::from_players(&roster(&["Alice", "Bob", "Eve"]));
        assert_eq!(colors.color_of("Alice"), Some(PALETTE[0]));
        assert_eq!(colors.color_of("Bob"), Some(PALETTE[1]));
        assert_eq!(colors.color_of("Eve"), Some(PALETTE[2]));
    }

    #[test]
    fn unknown_player_has_no_color() {
        let colors = PlayerColors::from_players(&roster(&["Alice"]));
        assert_eq!(colors.color_of("Bob"), None);
    }

    #[test]
    fn oversized_roster_wraps_the_palette() {
        let players: Vec<Player> = (0..9).map(|i| Player { name: format!("p{i}") }).collect();
        let colors = PlayerColors::from_players(&players);
        assert_eq!(colors.color_of("p7"), Some(PALETTE[0]));
        assert_eq!(colors.color_of("p8"), Some(PALETTE[1]));
    }

    #[test]
    fn rebuilding_from_the_same_roster_is_stable() {
        let a = PlayerColors::from_players(&roster(&["Alice", "Bob"]));
        let b = PlayerColors::from_players(&roster(&["Alice", "Bob"]));
        assert_eq!(a, b);
    }
}
