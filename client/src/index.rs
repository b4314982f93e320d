use std::collections::HashMap;

use warmap_shared::{PlayerColors, TerritoryId};

use crate::store::{GameStore, Phase};
use crate::surface::{MapRegion, MapSurface, RegionHandlers, RegionShape, TextLabel};

pub const HIGHLIGHT_OPACITY: f64 = 0.5;
pub const FULL_OPACITY: f64 = 1.0;
pub const BORDER_COLOR: &str = "#FFFFFF";
pub const BORDER_WIDTH: f64 = 1.0;

/// Fill for a territory whose owner has no palette entry. Unreachable once
/// game info has validated the roster.
const FALLBACK_FILL: &str = "#afafaf";

/// What a press on a region should do. Everything but `Apply` is a policy
/// no-op at the UI boundary, logged and otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Run the optimistic-increment protocol with amount 1.
    Apply,
    PoolExhausted,
    NotOwner,
    UnknownTerritory,
    NotInteractive,
}

/// Pure press policy: a press qualifies only when the session is
/// interactive, the pool has armies left, and the territory belongs to the
/// current player.
pub fn press_outcome(store: &GameStore, id: TerritoryId) -> PressOutcome {
    if store.phase() != Phase::Interactive {
        return PressOutcome::NotInteractive;
    }
    if store.pool() == 0 {
        return PressOutcome::PoolExhausted;
    }
    let Some(current) = store.current_player() else {
        return PressOutcome::NotInteractive;
    };
    match store.territory(id) {
        None => PressOutcome::UnknownTerritory,
        Some(t) if !t.is_owned_by(current) => PressOutcome::NotOwner,
        Some(_) => PressOutcome::Apply,
    }
}

/// Maps renderable regions to territory ids and owns the per-territory army
/// labels. Built once per session after the store is populated; regions and
/// labels hold only back-references (ids) into the store, never copies of
/// owner or army data.
pub struct RegionIndex<S: MapSurface> {
    regions: Vec<MapRegion<S::Shape>>,
    labels: HashMap<TerritoryId, S::Label>,
}

/// Build the index: paint every region with its owner's color, place army
/// labels at region centers, and wire hover and press handlers. Hover
/// highlights the whole group; presses report the resolved territory id to
/// `on_press` (the policy decision happens there, against the live store).
pub fn build<S: MapSurface>(
    surface: &S,
    store: &GameStore,
    colors: &PlayerColors,
    on_press: impl Fn(TerritoryId) + Clone + 'static,
) -> RegionIndex<S>
where
    S::Shape: Clone + 'static,
{
    let regions = surface.regions();
    let mut labels = HashMap::new();

    for region in &regions {
        let Some(id) = region.territory_id() else {
            continue;
        };
        let Some(territory) = store.territory(id) else {
            continue;
        };

        let fill = colors
            .color_of(&territory.owner.name)
            .unwrap_or(FALLBACK_FILL);
        for shape in region.shapes() {
            shape.set_fill(fill);
            shape.set_stroke(BORDER_COLOR, BORDER_WIDTH);
        }

        if let Some(bbox) = region.bbox() {
            let (x, y) = bbox.center();
            if let Some(label) = surface.place_label(x, y, &territory.armies.to_string()) {
                labels.insert(id, label);
            }
        }

        // Each member shape gets its own handler set; hover fans out to the
        // whole group so linked landmasses highlight together.
        let group: Vec<S::Shape> = region.shapes().cloned().collect();
        for shape in region.shapes() {
            let enter_group = group.clone();
            let exit_group = group.clone();
            let press = on_press.clone();
            shape.set_handlers(RegionHandlers {
                on_hover_enter: Box::new(move || {
                    for member in &enter_group {
                        member.set_opacity(HIGHLIGHT_OPACITY);
                    }
                }),
                on_hover_exit: Box::new(move || {
                    for member in &exit_group {
                        member.set_opacity(FULL_OPACITY);
                    }
                }),
                on_press: Box::new(move || press(id)),
            });
        }
    }

    RegionIndex { regions, labels }
}

impl<S: MapSurface> RegionIndex<S> {
    /// Rewrite one army label from the store's current value.
    pub fn set_army_label(&self, id: TerritoryId, armies: u32) {
        if let Some(label) = self.labels.get(&id) {
            label.set_text(&armies.to_string());
        }
    }

    /// Re-derive every fill and label from the store. Used at turn
    /// boundaries, where ownership may have changed on the authority.
    pub fn repaint(&self, store: &GameStore, colors: &PlayerColors) {
        for region in &self.regions {
            let Some(id) = region.territory_id() else {
                continue;
            };
            let Some(territory) = store.territory(id) else {
                continue;
            };
            let fill = colors
                .color_of(&territory.owner.name)
                .unwrap_or(FALLBACK_FILL);
            region.set_fill_all(fill);
            self.set_army_label(id, territory.armies);
        }
    }
}
