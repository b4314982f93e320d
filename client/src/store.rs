use std::fmt;

use warmap_shared::{GameInfo, INITIAL_REINFORCEMENTS, Territory, TerritoryId};

/// Session lifecycle. The interaction index is only built after game info
/// has loaded, so `Interactive` implies territories, roster, and colors are
/// all resolvable. `EndTurnRequested` gates re-entrant end-turn while the
/// authority request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    TerritoriesLoaded,
    Interactive,
    EndTurnRequested,
}

/// Rejected lifecycle mutations. The store is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Territory ids were not dense and zero-based after sorting.
    SparseIds,
    /// Game info arrived with an empty roster.
    NoPlayers,
    /// Game info was applied before territories were loaded.
    TerritoriesNotLoaded,
    /// A territory names an owner missing from the roster.
    UnresolvedOwner(String),
    UnknownTerritory(TerritoryId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::SparseIds => write!(f, "territory ids are not dense"),
            StoreError::NoPlayers => write!(f, "game info has no players"),
            StoreError::TerritoriesNotLoaded => write!(f, "territories not loaded yet"),
            StoreError::UnresolvedOwner(name) => write!(f, "owner {name:?} is not in the roster"),
            StoreError::UnknownTerritory(id) => write!(f, "unknown territory {id}"),
        }
    }
}

/// Rejected player actions. These are policy no-ops at the UI boundary, not
/// user-visible errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// The reinforcement pool has no armies left to place.
    PoolExhausted,
    /// The pool still has armies to place, so the turn cannot end.
    PoolNotSpent,
    /// The territory is not owned by the current player.
    NotOwner,
    UnknownTerritory,
    NotInteractive,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::PoolExhausted => write!(f, "no reinforcements left"),
            ActionError::PoolNotSpent => write!(f, "reinforcements still unassigned"),
            ActionError::NotOwner => write!(f, "territory not owned by current player"),
            ActionError::UnknownTerritory => write!(f, "unknown territory"),
            ActionError::NotInteractive => write!(f, "game is not interactive"),
        }
    }
}

/// The single source of truth for territories, roster, turn counter, and the
/// reinforcement pool. One instance per session, held in a signal; only the
/// sync layer and the qualifying press path write to it.
///
/// Mutations are serialized by the single-threaded event dispatch of the
/// host: each one is triggered by a discrete user or lifecycle event and
/// completes before the next can be issued.
#[derive(Debug, Clone)]
pub struct GameStore {
    territories: Vec<Territory>,
    game: Option<GameInfo>,
    pool: u32,
    phase: Phase,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    pub fn new() -> Self {
        Self {
            territories: Vec::new(),
            game: None,
            pool: 0,
            phase: Phase::Uninitialized,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pool(&self) -> u32 {
        self.pool
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn territory(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.get(id)
    }

    pub fn current_player(&self) -> Option<&str> {
        self.game
            .as_ref()
            .and_then(GameInfo::current_player)
            .map(|p| p.name.as_str())
    }

    /// Install the full territory set. Input may arrive in any order; it is
    /// stored sorted ascending by id so that index == id. Ids must be dense
    /// and zero-based, and once game info is loaded every owner must resolve
    /// against the roster. Nothing is applied on error.
    pub fn set_territories(&mut self, mut territories: Vec<Territory>) -> Result<(), StoreError> {
        territories.sort_by_key(|t| t.id);
        for (index, territory) in territories.iter().enumerate() {
            if territory.id != index {
                return Err(StoreError::SparseIds);
            }
            if let Some(game) = &self.game {
                if !game.players.iter().any(|p| p.name == territory.owner.name) {
                    return Err(StoreError::UnresolvedOwner(territory.owner.name.clone()));
                }
            }
        }

        self.territories = territories;
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::TerritoriesLoaded;
        }
        Ok(())
    }

    /// Install an authoritative game snapshot: derives the current player
    /// and resets the reinforcement pool to its per-turn constant. This is
    /// the reconciliation point at every turn boundary.
    pub fn set_game_info(&mut self, game: GameInfo) -> Result<(), StoreError> {
        if self.phase == Phase::Uninitialized {
            return Err(StoreError::TerritoriesNotLoaded);
        }
        if game.players.is_empty() {
            return Err(StoreError::NoPlayers);
        }
        for territory in &self.territories {
            if !game.players.iter().any(|p| p.name == territory.owner.name) {
                return Err(StoreError::UnresolvedOwner(territory.owner.name.clone()));
            }
        }

        self.game = Some(game);
        self.pool = INITIAL_REINFORCEMENTS;
        self.phase = Phase::Interactive;
        Ok(())
    }

    /// The optimistic half of a reinforcement: requires an interactive
    /// session, `pool >= amount`, and current-player ownership. On success
    /// the army increment and the pool decrement happen together; on error
    /// neither does.
    pub fn apply_local_increment(
        &mut self,
        id: TerritoryId,
        amount: u32,
    ) -> Result<(), ActionError> {
        if self.phase != Phase::Interactive {
            return Err(ActionError::NotInteractive);
        }
        if self.pool < amount {
            return Err(ActionError::PoolExhausted);
        }
        let current = self
            .current_player()
            .ok_or(ActionError::NotInteractive)?
            .to_owned();
        let territory = self
            .territories
            .get_mut(id)
            .ok_or(ActionError::UnknownTerritory)?;
        if !territory.is_owned_by(&current) {
            return Err(ActionError::NotOwner);
        }

        territory.armies += amount;
        self.pool -= amount;
        Ok(())
    }

    /// Overwrite one territory with its authoritative state (point refresh).
    /// The id must already exist; the territory set never grows or shrinks
    /// mid-session.
    pub fn overwrite_territory(&mut self, territory: Territory) -> Result<(), StoreError> {
        if territory.id >= self.territories.len() {
            return Err(StoreError::UnknownTerritory(territory.id));
        }
        if let Some(game) = &self.game {
            if !game.players.iter().any(|p| p.name == territory.owner.name) {
                return Err(StoreError::UnresolvedOwner(territory.owner.name.clone()));
            }
        }
        let id = territory.id;
        self.territories[id] = territory;
        Ok(())
    }

    pub fn can_end_turn(&self) -> bool {
        self.phase == Phase::Interactive && self.pool == 0
    }

    /// Gate the end-turn request: legal only with an empty pool in an
    /// interactive session. Moves to `EndTurnRequested` so a second click
    /// cannot issue a duplicate request while one is in flight.
    pub fn begin_end_turn(&mut self) -> Result<(), ActionError> {
        if self.phase != Phase::Interactive {
            return Err(ActionError::NotInteractive);
        }
        if self.pool != 0 {
            return Err(ActionError::PoolNotSpent);
        }
        self.phase = Phase::EndTurnRequested;
        Ok(())
    }

    /// Return to `Interactive` after a failed end-turn request, leaving all
    /// other state at its last known-good value.
    pub fn abort_end_turn(&mut self) {
        if self.phase == Phase::EndTurnRequested {
            self.phase = Phase::Interactive;
        }
    }
}
