pub mod colors;
pub mod game;
pub mod territory;

pub use colors::{PALETTE, PlayerColors};
pub use game::{GameInfo, INITIAL_REINFORCEMENTS, Player};
pub use territory::{PlayerRef, Territory, TerritoryId};
