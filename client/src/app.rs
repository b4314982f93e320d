use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;

use warmap_shared::{PlayerColors, TerritoryId};

use crate::index::{self, PressOutcome, RegionIndex};
use crate::store::GameStore;
use crate::svg::SvgSurface;
use crate::sync;
use crate::viewport;

const MAP_HOST_ID: &str = "map";

struct ResizeBinding {
    _handler: Closure<dyn Fn()>,
}

thread_local! {
    static MAP_INDEX: RefCell<Option<Rc<RegionIndex<SvgSurface>>>> = const { RefCell::new(None) };
    static MAP_SURFACE: RefCell<Option<Rc<SvgSurface>>> = const { RefCell::new(None) };
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

fn with_index(f: impl FnOnce(&RegionIndex<SvgSurface>)) {
    MAP_INDEX.with(|slot| {
        if let Some(index) = slot.borrow().as_ref() {
            f(index);
        }
    });
}

/// Root component: player/pool readout, the end-turn control, and the map
/// host. Kicks off the boot sequence and the resize binding.
#[component]
pub fn App() -> impl IntoView {
    let store: RwSignal<GameStore> = RwSignal::new(GameStore::new());
    // Session-stable player→color assignment, set once when game info first
    // loads.
    let colors: RwSignal<Option<PlayerColors>> = RwSignal::new(None);

    install_resize_handler();
    spawn_local(boot(store, colors));

    view! {
        <div>
            <h1>
                {move || {
                    let name = store
                        .with(|s| s.current_player().map(str::to_owned))
                        .unwrap_or_else(|| "-".to_string());
                    format!("Current Player: {name}")
                }}
            </h1>
            <h3>{move || format!("Armies Left: {}", store.with(|s| s.pool()))}</h3>
            <button on:click=move |_| handle_end_turn(store, colors)>"End Turn"</button>
            <div id=MAP_HOST_ID></div>
        </div>
    }
}

/// Boot sequence: territories → game info → interaction index → initial
/// scale. Each step only runs if the previous one committed; a failure
/// leaves the store at its last good phase and logs to the console.
async fn boot(store: RwSignal<GameStore>, colors: RwSignal<Option<PlayerColors>>) {
    let Some(game_id) = sync::game_id_from_path() else {
        web_sys::console::warn_1(&"no game id in path; map left uninitialized".into());
        return;
    };

    let territories = match sync::fetch_territories(&game_id).await {
        Ok(territories) => territories,
        Err(e) => {
            web_sys::console::warn_1(&format!("territory fetch failed: {e}").into());
            return;
        }
    };
    match store.try_update(|s| s.set_territories(territories)) {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            web_sys::console::warn_1(&format!("territory data rejected: {e}").into());
            return;
        }
        None => return,
    }

    let info = match sync::fetch_game_info(&game_id).await {
        Ok(info) => info,
        Err(e) => {
            web_sys::console::warn_1(&format!("game info fetch failed: {e}").into());
            return;
        }
    };
    let assignment = PlayerColors::from_players(&info.players);
    match store.try_update(|s| s.set_game_info(info)) {
        Some(Ok(())) => colors.set(Some(assignment.clone())),
        Some(Err(e)) => {
            web_sys::console::warn_1(&format!("game info rejected: {e}").into());
            return;
        }
        None => return,
    }

    let Some(surface) = SvgSurface::locate(MAP_HOST_ID) else {
        web_sys::console::warn_1(&"map svg not found; interaction index not built".into());
        return;
    };
    let built = store.with_untracked(|s| {
        index::build(&surface, s, &assignment, move |id| {
            press_territory(store, colors, id)
        })
    });
    viewport::apply_current(&surface);

    MAP_INDEX.with(|slot| *slot.borrow_mut() = Some(Rc::new(built)));
    MAP_SURFACE.with(|slot| *slot.borrow_mut() = Some(Rc::new(surface)));
}

/// Qualifying-press protocol: optimistic local commit, label rewrite, then
/// a fire-and-forget confirmation. A failed confirmation triggers a point
/// refresh of that territory instead of a local rollback.
fn press_territory(
    store: RwSignal<GameStore>,
    colors: RwSignal<Option<PlayerColors>>,
    id: TerritoryId,
) {
    let outcome = store.with_untracked(|s| index::press_outcome(s, id));
    if outcome != PressOutcome::Apply {
        web_sys::console::info_1(&format!("press ignored on territory {id}: {outcome:?}").into());
        return;
    }

    let applied = store.try_update(|s| s.apply_local_increment(id, 1));
    if !matches!(applied, Some(Ok(()))) {
        return;
    }

    let armies = store
        .with_untracked(|s| s.territory(id).map(|t| t.armies))
        .unwrap_or(0);
    with_index(|idx| idx.set_army_label(id, armies));

    let Some(game_id) = sync::game_id_from_path() else {
        return;
    };
    spawn_local(async move {
        if let Err(e) = sync::confirm_add_armies(1, id, &game_id).await {
            web_sys::console::warn_1(
                &format!("increment confirmation failed for territory {id}: {e}; refreshing").into(),
            );
            refresh_territory(store, colors, id).await;
        }
    });
}

/// Overwrite one territory with the authority's state and redraw it.
async fn refresh_territory(
    store: RwSignal<GameStore>,
    colors: RwSignal<Option<PlayerColors>>,
    id: TerritoryId,
) {
    let Some(game_id) = sync::game_id_from_path() else {
        return;
    };
    match sync::fetch_territory(id, &game_id).await {
        Ok(territory) => {
            let armies = territory.armies;
            match store.try_update(|s| s.overwrite_territory(territory)) {
                Some(Ok(())) => {
                    with_index(|idx| idx.set_army_label(id, armies));
                    repaint(store, colors);
                }
                Some(Err(e)) => {
                    web_sys::console::warn_1(&format!("territory {id} refresh rejected: {e}").into());
                }
                None => {}
            }
        }
        Err(e) => {
            web_sys::console::warn_1(&format!("territory {id} refresh failed: {e}").into());
        }
    }
}

/// End-turn protocol: gate on an empty pool, ask the authority to advance,
/// then reload game info in full — the per-turn reconciliation point.
fn handle_end_turn(store: RwSignal<GameStore>, colors: RwSignal<Option<PlayerColors>>) {
    match store.try_update(|s| s.begin_end_turn()) {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            web_sys::console::info_1(&format!("cannot end turn: {e}").into());
            return;
        }
        None => return,
    }

    let Some(game_id) = sync::game_id_from_path() else {
        store.update(|s| s.abort_end_turn());
        return;
    };
    spawn_local(async move {
        if let Err(e) = sync::request_end_turn(&game_id).await {
            web_sys::console::warn_1(&format!("end turn failed: {e}").into());
            store.update(|s| s.abort_end_turn());
            return;
        }
        match sync::fetch_game_info(&game_id).await {
            Ok(info) => {
                let applied = store.try_update(|s| s.set_game_info(info));
                if matches!(applied, Some(Ok(()))) {
                    repaint(store, colors);
                } else {
                    store.update(|s| s.abort_end_turn());
                }
            }
            Err(e) => {
                web_sys::console::warn_1(&format!("game info reload failed: {e}").into());
                store.update(|s| s.abort_end_turn());
            }
        }
    });
}

/// Re-derive every region fill and army label from the store.
fn repaint(store: RwSignal<GameStore>, colors: RwSignal<Option<PlayerColors>>) {
    let Some(assignment) = colors.get_untracked() else {
        return;
    };
    store.with_untracked(|s| with_index(|idx| idx.repaint(s, &assignment)));
}

/// Window resize keeps the drawing surface at 80% of the window width; it
/// never touches game data.
fn install_resize_handler() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let handler = Closure::<dyn Fn()>::new(move || {
        MAP_SURFACE.with(|slot| {
            if let Some(surface) = slot.borrow().as_ref() {
                viewport::apply_current(surface.as_ref());
            }
        });
    });
    if window
        .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
        .is_ok()
    {
        RESIZE_BINDING.with(|slot| {
            *slot.borrow_mut() = Some(ResizeBinding { _handler: handler });
        });
    }
}
