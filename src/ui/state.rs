use gtk4 as gtk;
use libadwaita as adw;

use crate::game::Round;

pub struct AppState {
    pub view_stack: Option<gtk::Stack>,
    pub header: Option<adw::HeaderBar>,
    pub back_button: Option<gtk::Button>,
    pub menu_button: Option<gtk::MenuButton>,
    pub restart_button: Option<gtk::Button>,
    pub title_menu: Option<gtk::Label>,
    pub title_game: Option<gtk::Widget>,
    pub title_game_subtitle: Option<gtk::Label>,
    pub title_victory: Option<gtk::Widget>,
    pub victory_stats_label: Option<gtk::Label>,
    pub board_container: Option<gtk::Box>,
    pub dynamic_css_provider: Option<gtk::CssProvider>,

    // Game state
    pub round: Round,
    pub grid_buttons: Vec<gtk::Button>,
    pub flip_anim_phase: bool,
    pub game_id: u64,
    pub ticker_handle: Option<glib::SourceId>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            view_stack: None,
            header: None,
            back_button: None,
            menu_button: None,
            restart_button: None,
            title_menu: None,
            title_game: None,
            title_game_subtitle: None,
            title_victory: None,
            victory_stats_label: None,
            board_container: None,
            dynamic_css_provider: None,
            round: Round::new(),
            grid_buttons: Vec::new(),
            flip_anim_phase: false,
            game_id: 0,
            ticker_handle: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the round with a freshly shuffled one. Bumping `game_id`
    /// invalidates every delayed callback the old round still has in flight.
    pub fn reset_round(&mut self) {
        self.game_id = self.game_id.wrapping_add(1);
        self.round = Round::new();
    }
}
