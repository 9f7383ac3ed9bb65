use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::hud::{set_header_menu, set_header_victory, stop_ticker};
use super::state::AppState;

pub(super) fn show_victory(state: &Rc<RefCell<AppState>>) {
    {
        let st = state.borrow();
        if let Some(label) = &st.victory_stats_label {
            label.set_text(&format!(
                "{} flips\n{:.1} seconds",
                st.round.flips(),
                st.round.elapsed_secs()
            ));
        }
    }
    set_header_victory(state);
    let st = state.borrow();
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(gtk::StackTransitionType::SlideLeft);
        stack.set_visible_child_name("victory");
    }
}

pub(super) fn show_menu(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_ticker(&mut st);
        // Abandon the round; any delayed resolution still in flight dies on
        // the game_id check.
        st.reset_round();
    }
    set_header_menu(state);
    let st = state.borrow();
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(gtk::StackTransitionType::SlideRight);
        stack.set_visible_child_name("menu");
    }
}
