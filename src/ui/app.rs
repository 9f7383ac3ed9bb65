use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use gio::SimpleAction;

use super::board::{build_board_grid, CONTENT_MARGIN};
use super::debug_tools;
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::hud::{set_header_game, set_header_menu, start_ticker, stop_ticker, update_subtitle};
use super::scene::{show_menu, show_victory};
use super::state::AppState;
use crate::game::{Effect, Event, GRACE_DELAY_MS};

const APP_ID: &str = "dev.basalt.Tessella";
const FLIP_PHASE_MS: u64 = 260;
const WIN_VIEW_DELAY_MS: u64 = 900;

pub(super) fn clear_flip_classes(button: &gtk::Button) {
    button.remove_css_class("flip-show-a");
    button.remove_css_class("flip-show-b");
}

pub(super) fn redraw_button_child(button: &gtk::Button) {
    if let Some(child) = button.child() {
        child.queue_draw();
    }
}

pub(super) fn play_flip_show(st: &mut AppState, index: usize) {
    let button = st.grid_buttons[index].clone();
    clear_flip_classes(&button);
    st.flip_anim_phase = !st.flip_anim_phase;
    if st.flip_anim_phase {
        button.add_css_class("flip-show-a");
    } else {
        button.add_css_class("flip-show-b");
    }
    redraw_button_child(&button);
}

/// Mirror a batch of round events onto the widgets. Callers must not hold a
/// borrow of the state.
pub(super) fn apply_events(state: &Rc<RefCell<AppState>>, events: &[Event]) {
    for event in events {
        match *event {
            Event::TileRevealed { index, .. } => {
                let mut st = state.borrow_mut();
                if index < st.grid_buttons.len() {
                    st.grid_buttons[index].add_css_class("active");
                    play_flip_show(&mut st, index);
                }
            }
            Event::TileHidden { index } => {
                let mut st = state.borrow_mut();
                if index < st.grid_buttons.len() {
                    st.grid_buttons[index].remove_css_class("active");
                    st.grid_buttons[index].remove_css_class("mismatch-shake");
                    play_flip_show(&mut st, index);
                }
            }
            Event::TileMatched { index } => {
                let st = state.borrow();
                if let Some(button) = st.grid_buttons.get(index) {
                    clear_flip_classes(button);
                    button.remove_css_class("active");
                    button.add_css_class("matched");
                    redraw_button_child(button);
                }
            }
            Event::FlipCountChanged { .. } | Event::ElapsedTimeChanged { .. } => {
                let st = state.borrow();
                update_subtitle(&st);
            }
            Event::RoundWon => {
                let game_id = {
                    let mut st = state.borrow_mut();
                    stop_ticker(&mut st);
                    update_subtitle(&st);
                    if let Some(container) = &st.board_container {
                        container.add_css_class("victory-pending");
                    }
                    st.game_id
                };

                // Let the last pair sit face up for a beat before sliding
                // to the victory view.
                let state_victory = state.clone();
                glib::timeout_add_local(
                    std::time::Duration::from_millis(WIN_VIEW_DELAY_MS),
                    move || {
                        if state_victory.borrow().game_id != game_id {
                            return glib::ControlFlow::Break;
                        }
                        show_victory(&state_victory);
                        glib::ControlFlow::Break
                    },
                );
            }
        }
    }
}

fn schedule_resolution(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let pending = state.borrow().round.pending_resolution();

    // Mismatched pairs get a shake once the second face has flipped up.
    if let Some(pending) = pending
        && !pending.matched
    {
        let state_shake = state.clone();
        glib::timeout_add_local(std::time::Duration::from_millis(FLIP_PHASE_MS), move || {
            let st = state_shake.borrow();
            if st.game_id != game_id {
                return glib::ControlFlow::Break;
            }
            for index in [pending.first, pending.second] {
                if let Some(button) = st.grid_buttons.get(index) {
                    button.remove_css_class("mismatch-shake");
                    button.add_css_class("mismatch-shake");
                }
            }
            glib::ControlFlow::Break
        });
    }

    let state_resolve = state.clone();
    glib::timeout_add_local(std::time::Duration::from_millis(GRACE_DELAY_MS), move || {
        let events = {
            let mut st = state_resolve.borrow_mut();
            if st.game_id != game_id {
                return glib::ControlFlow::Break;
            }
            st.round.resolve_pending()
        };
        apply_events(&state_resolve, &events);
        glib::ControlFlow::Break
    });
}

pub fn handle_tile_click(state: &Rc<RefCell<AppState>>, index: usize) {
    let (events, effect, game_id) = {
        let mut st = state.borrow_mut();
        let Ok(outcome) = st.round.select(index) else {
            return;
        };
        (outcome.events, outcome.effect, st.game_id)
    };

    apply_events(state, &events);

    match effect {
        Some(Effect::StartTicker) => start_ticker(state, game_id),
        Some(Effect::ScheduleResolve) => schedule_resolution(state, game_id),
        None => {}
    }
}

pub(super) fn show_game(state: &Rc<RefCell<AppState>>) {
    {
        let mut st = state.borrow_mut();
        stop_ticker(&mut st);
        st.reset_round();
    }

    // Fresh face-down board: wipe whatever classes the last round left.
    {
        let st = state.borrow();
        if let Some(container) = &st.board_container {
            container.remove_css_class("victory-pending");
        }
        for button in &st.grid_buttons {
            button.remove_css_class("matched");
            button.remove_css_class("active");
            button.remove_css_class("mismatch-shake");
            clear_flip_classes(button);
            redraw_button_child(button);
        }
        update_subtitle(&st);
    }

    set_header_game(state);
    let st = state.borrow();
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(gtk::StackTransitionType::SlideLeft);
        stack.set_visible_child_name("game");
    }
}

pub fn run() {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();

        let state = Rc::new(RefCell::new(AppState::new()));

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);

        let dynamic_css_provider = gtk::CssProvider::new();
        if let Some(display) = gtk::gdk::Display::default() {
            gtk::style_context_add_provider_for_display(
                &display,
                &dynamic_css_provider,
                gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }
        // Stored before the views go up so the board grid can hand the
        // provider to its resize closures.
        state.borrow_mut().dynamic_css_provider = Some(dynamic_css_provider);

        let title_menu = gtk::Label::new(None);
        title_menu.set_markup("<b>Tessella</b>");
        title_menu.set_halign(gtk::Align::Center);

        let title_game_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_game_box.set_valign(gtk::Align::Center);
        title_game_box.set_halign(gtk::Align::Center);
        title_game_box.set_hexpand(true);

        let title_game_main = gtk::Label::builder()
            .label("Tessella")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let title_game_subtitle = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_game_box.append(&title_game_main);
        title_game_box.append(&title_game_subtitle);

        let title_victory_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_victory_box.set_valign(gtk::Align::Center);
        title_victory_box.set_halign(gtk::Align::Center);

        let title_victory_main = gtk::Label::new(Some("Tessella"));
        title_victory_main.add_css_class("game-title-main");

        let title_victory_sub = gtk::Label::new(Some("Victory"));
        title_victory_sub.add_css_class("game-title-subtitle");
        title_victory_sub.add_css_class("caption");

        title_victory_box.append(&title_victory_main);
        title_victory_box.append(&title_victory_sub);

        let header = adw::HeaderBar::builder()
            .title_widget(&title_menu)
            .build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let back_button = gtk::Button::builder()
            .icon_name("go-previous-symbolic")
            .build();
        back_button.set_tooltip_text(Some("Back"));
        back_button.connect_clicked({
            let state = state.clone();
            move |_| {
                show_menu(&state);
            }
        });
        header.pack_start(&back_button);

        let menu_model = gio::Menu::new();
        menu_model.append(Some("Instructions"), Some("app.instructions"));
        menu_model.append(Some("About Tessella"), Some("app.about"));
        menu_model.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .build();
        restart_button.set_tooltip_text(Some("New Round"));
        restart_button.connect_clicked({
            let state = state.clone();
            move |_| {
                show_game(&state);
            }
        });
        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&restart_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        let view_stack = gtk::Stack::new();
        view_stack.set_hexpand(true);
        view_stack.set_vexpand(true);
        view_stack.set_hhomogeneous(false);
        view_stack.set_vhomogeneous(false);
        view_stack.set_interpolate_size(false);
        view_stack.set_transition_type(gtk::StackTransitionType::SlideLeft);
        view_stack.set_transition_duration(300);

        let game_view = build_game_view(&state);
        view_stack.add_named(&game_view, Some("game"));

        let victory_view = build_victory_view(&state);
        view_stack.add_named(&victory_view, Some("victory"));

        let menu_view = build_menu_view(&state);
        view_stack.add_named(&menu_view, Some("menu"));

        view_stack.set_visible_child_name("menu");
        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&view_stack));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Tessella")
            .icon_name(APP_ID)
            .default_width(760)
            .default_height(680)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 480);
        win.add_css_class("app-window");

        let style_manager = adw::StyleManager::default();
        if style_manager.is_dark() {
            win.add_css_class("theme-dark");
        } else {
            win.add_css_class("theme-light");
        }
        style_manager.connect_notify_local(Some("dark"), {
            let win = win.clone();
            move |manager, _| {
                if manager.is_dark() {
                    win.remove_css_class("theme-light");
                    win.add_css_class("theme-dark");
                } else {
                    win.remove_css_class("theme-dark");
                    win.add_css_class("theme-light");
                }
            }
        });

        {
            let mut st = state.borrow_mut();
            st.view_stack = Some(view_stack.clone());
            st.header = Some(header.clone());
            st.back_button = Some(back_button);
            st.menu_button = Some(menu_button);
            st.restart_button = Some(restart_button);
            st.title_menu = Some(title_menu);
            st.title_game = Some(title_game_box.upcast::<gtk::Widget>());
            st.title_game_subtitle = Some(title_game_subtitle);
            st.title_victory = Some(title_victory_box.upcast::<gtk::Widget>());
        }

        let global_key = gtk::EventControllerKey::new();
        global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
        global_key.connect_key_pressed({
            let state = state.clone();
            move |_, key, _, mods| {
                if debug_tools::handle_debug_shortcut(&state, key, mods) {
                    return gtk::glib::Propagation::Stop;
                }
                if key == gdk::Key::Escape {
                    let st = state.borrow();
                    let in_game = st
                        .view_stack
                        .as_ref()
                        .and_then(|stack| stack.visible_child_name())
                        .as_deref()
                        == Some("game");
                    if in_game && !st.round.input_locked() {
                        drop(st);
                        show_menu(&state);
                        return gtk::glib::Propagation::Stop;
                    }
                }
                gtk::glib::Propagation::Proceed
            }
        });
        win.add_controller(global_key);

        set_header_menu(&state);
        win.present();
    });

    app.run();
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        gio::resources_register_include!("tessella.gresource")
            .expect("failed to register embedded resources");
    });

    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let icon_theme = gtk::IconTheme::for_display(&display);
    icon_theme.add_resource_path("/dev/basalt/Tessella/icons/hicolor");

    for resource_path in [
        "/dev/basalt/Tessella/style.css",
        "/dev/basalt/Tessella/style.dark.css",
    ] {
        let provider = gtk::CssProvider::new();
        provider.load_from_resource(resource_path);
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

fn build_menu_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("main-menu-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 6);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.add_css_class("main-menu-content");

    let icon = gtk::Image::from_icon_name(APP_ID);
    icon.set_pixel_size(160);
    icon.add_css_class("main-menu-icon");

    let title = gtk::Label::new(Some("Tessella"));
    title.add_css_class("main-menu-title");
    title.add_css_class("title-1");

    let blurb = gtk::Label::new(Some("Find the matching color pairs"));
    blurb.add_css_class("main-menu-blurb");
    blurb.add_css_class("caption");

    let buttons_box = gtk::Box::new(gtk::Orientation::Vertical, 13);
    buttons_box.set_halign(gtk::Align::Center);
    buttons_box.set_margin_top(12);

    let new_button = gtk::Button::with_label("New Game");
    new_button.add_css_class("main-menu-button");
    new_button.add_css_class("suggested-action");
    new_button.set_size_request(164, 40);
    new_button.connect_clicked({
        let state = state.clone();
        move |_| {
            show_game(&state);
        }
    });

    content.append(&icon);
    content.append(&title);
    content.append(&blurb);
    buttons_box.append(&new_button);
    content.append(&buttons_box);

    center.set_center_widget(Some(&content));
    root.append(&center);

    root
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Fill);
    content.set_valign(gtk::Align::Fill);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_grid = build_board_grid(state);

    let board_frame = gtk::AspectFrame::new(0.5, 0.5, 1.0, false);
    board_frame.set_halign(gtk::Align::Fill);
    board_frame.set_valign(gtk::Align::Fill);
    board_frame.set_hexpand(true);
    board_frame.set_vexpand(true);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("tessella-card-container");

    board_card.connect_closure(
        "notify::width",
        false,
        glib::closure_local!(move |card: gtk::Box, _: glib::ParamSpec| {
            if card.width() < 500 {
                card.add_css_class("compact");
            } else {
                card.remove_css_class("compact");
            }
        }),
    );

    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, 1.0, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&board_grid));
    board_card.append(&grid_frame);

    board_frame.set_child(Some(&board_card));
    content.append(&board_frame);
    root.append(&content);

    {
        let mut st = state.borrow_mut();
        st.board_container = Some(board_card.clone());
    }

    root
}

fn build_victory_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("victory-root");
    root.set_halign(gtk::Align::Fill);
    root.set_valign(gtk::Align::Fill);

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let card_shell = gtk::Box::new(gtk::Orientation::Vertical, 0);
    card_shell.set_halign(gtk::Align::Center);
    card_shell.set_valign(gtk::Align::Center);
    card_shell.add_css_class("victory-card");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 14);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.set_margin_top(28);
    content.set_margin_bottom(28);
    content.set_margin_start(28);
    content.set_margin_end(28);

    let title = gtk::Label::new(Some("You win!"));
    title.add_css_class("victory-title");
    title.add_css_class("title-1");

    let message = gtk::Label::new(Some("Every pair found."));
    message.add_css_class("victory-message");
    message.add_css_class("body");
    message.set_wrap(true);
    message.set_justify(gtk::Justification::Center);
    message.set_max_width_chars(36);

    let stats = gtk::Label::new(None);
    stats.add_css_class("victory-stats");
    stats.add_css_class("body");
    stats.set_wrap(true);
    stats.set_justify(gtk::Justification::Center);
    stats.set_max_width_chars(36);

    let buttons = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    buttons.set_halign(gtk::Align::Center);
    buttons.set_margin_top(6);

    let again_btn = gtk::Button::with_label("Play Again");
    again_btn.add_css_class("suggested-action");
    let menu_btn = gtk::Button::with_label("Main Menu");

    again_btn.connect_clicked({
        let state = state.clone();
        move |_| {
            show_game(&state);
        }
    });
    menu_btn.connect_clicked({
        let state = state.clone();
        move |_| {
            show_menu(&state);
        }
    });

    buttons.append(&again_btn);
    buttons.append(&menu_btn);

    content.append(&title);
    content.append(&message);
    content.append(&stats);
    content.append(&buttons);
    card_shell.append(&content);
    center.set_center_widget(Some(&card_shell));
    root.append(&center);

    {
        let mut st = state.borrow_mut();
        st.victory_stats_label = Some(stats.clone());
    }

    root
}
