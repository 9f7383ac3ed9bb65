use std::cell::RefCell;
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;

use super::state::AppState;
use crate::game::TICK_INTERVAL_MS;

pub(super) fn set_header_menu(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_menu) {
        header.set_title_widget(Some(title));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(false);
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(false);
    }
}

pub(super) fn set_header_game(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title_box)) = (&st.header, &st.title_game) {
        update_subtitle(&st);
        header.set_title_widget(Some(title_box));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(true);
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(true);
    }
}

pub(super) fn set_header_victory(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_victory) {
        header.set_title_widget(Some(title));
    }
    if let Some(back) = &st.back_button {
        back.set_visible(true);
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(false);
    }
}

pub(super) fn update_subtitle(st: &AppState) {
    if let Some(subtitle) = &st.title_game_subtitle {
        subtitle.set_text(&format!(
            "{} flips | {:.1}s",
            st.round.flips(),
            st.round.elapsed_secs()
        ));
    }
}

pub(super) fn stop_ticker(st: &mut AppState) {
    if let Some(handle) = st.ticker_handle.take() {
        handle.remove();
    }
}

/// Drive the round's 100 ms display clock. The source lives until the
/// round it belongs to is replaced or won; `stop_ticker` removes it on win
/// before the next tick can fire.
pub(super) fn start_ticker(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let mut st = state.borrow_mut();
    stop_ticker(&mut st);

    let state_clone = state.clone();
    let handle = glib::timeout_add_local(
        std::time::Duration::from_millis(TICK_INTERVAL_MS),
        move || {
            let mut st = state_clone.borrow_mut();
            if st.game_id != game_id {
                return glib::ControlFlow::Break;
            }
            match st.round.tick() {
                Some(_) => {
                    update_subtitle(&st);
                    glib::ControlFlow::Continue
                }
                None => glib::ControlFlow::Break,
            }
        },
    );
    st.ticker_handle = Some(handle);
}
