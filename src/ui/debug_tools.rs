use std::cell::RefCell;
use std::rc::Rc;

use gtk4::gdk;
use gtk4::prelude::*;

use super::app::{apply_events, show_game};
use super::hud::start_ticker;
use super::state::AppState;
use crate::game::{Effect, TileColor, TileState};

pub fn debug_mode_enabled() -> bool {
    match std::env::var("TESSELLA_DEBUG") {
        Ok(value) => {
            let v = value.trim().to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "yes" | "on")
        }
        Err(_) => false,
    }
}

/// Ctrl+N starts a fresh round, Ctrl+W plays the board down to its last
/// pair. Inert unless TESSELLA_DEBUG is set.
pub fn handle_debug_shortcut(
    state: &Rc<RefCell<AppState>>,
    key: gdk::Key,
    mods: gdk::ModifierType,
) -> bool {
    if !debug_mode_enabled() || !mods.contains(gdk::ModifierType::CONTROL_MASK) {
        return false;
    }

    let in_game = {
        let st = state.borrow();
        st.view_stack
            .as_ref()
            .and_then(|stack| stack.visible_child_name())
            .as_deref()
            == Some("game")
    };
    if !in_game {
        return false;
    }

    match key {
        gdk::Key::N | gdk::Key::n => {
            show_game(state);
            true
        }
        gdk::Key::W | gdk::Key::w => {
            apply_near_win(state);
            true
        }
        _ => false,
    }
}

/// Resolve every pair except one by playing them through the round itself,
/// skipping the grace delays, so the win flow can be exercised by hand.
fn apply_near_win(state: &Rc<RefCell<AppState>>) {
    let mut all_events = Vec::new();
    let mut ticker_game_id = None;

    {
        let mut st = state.borrow_mut();
        if st.round.input_locked() || st.round.is_won() {
            return;
        }
        let game_id = st.game_id;

        // Fold an open first pick back over so every selection below starts
        // a fresh pair.
        if let Some(open) = st.round.first_pick()
            && let Ok(outcome) = st.round.select(open)
        {
            all_events.extend(outcome.events);
        }

        // Pair up the unmatched tiles of each color; hold one pair back.
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for color in TileColor::ALL {
            let indices: Vec<usize> = st
                .round
                .board()
                .tiles()
                .iter()
                .enumerate()
                .filter(|(_, tile)| tile.color == color && tile.state != TileState::Matched)
                .map(|(index, _)| index)
                .collect();
            for chunk in indices.chunks(2) {
                if let [a, b] = *chunk {
                    pairs.push((a, b));
                }
            }
        }
        if pairs.len() <= 1 {
            pairs.clear();
        } else {
            pairs.pop();
        }

        for (a, b) in pairs {
            for index in [a, b] {
                let Ok(outcome) = st.round.select(index) else {
                    continue;
                };
                all_events.extend(outcome.events);
                if outcome.effect == Some(Effect::StartTicker) {
                    ticker_game_id = Some(game_id);
                }
            }
            all_events.extend(st.round.resolve_pending());
        }
    }

    apply_events(state, &all_events);
    if let Some(game_id) = ticker_game_id {
        start_ticker(state, game_id);
    }
}
