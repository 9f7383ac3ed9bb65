use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::app::handle_tile_click;
use super::state::AppState;
use crate::game::TileState;

pub const GRID_COLS: i32 = 6;
pub const GRID_ROWS: i32 = 6;
pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: i32 = 6;

fn rounded_rect(cr: &gtk::cairo::Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let (pi, half_pi) = (std::f64::consts::PI, std::f64::consts::FRAC_PI_2);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -half_pi, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, half_pi);
    cr.arc(x + r, y + h - r, r, half_pi, pi);
    cr.arc(x + r, y + r, r, pi, pi + half_pi);
    cr.close_path();
}

pub fn build_board_grid(state: &Rc<RefCell<AppState>>) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("tessella-board");
    grid.set_row_spacing(TILE_GAP as u32);
    grid.set_column_spacing(TILE_GAP as u32);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let css_provider = {
        let st = state.borrow();
        st.dynamic_css_provider.clone()
    };

    let update_styles = {
        let css_provider = css_provider.clone();
        move |grid: &gtk::Grid| {
            let width = grid.width();
            let height = grid.height();
            if width > 0 && height > 0 {
                let cell_width = (width - (GRID_COLS - 1) * TILE_GAP) / GRID_COLS;
                let cell_height = (height - (GRID_ROWS - 1) * TILE_GAP) / GRID_ROWS;
                let min_dim = cell_width.min(cell_height);

                // Dynamic radii based on available cell size.
                let card_radius = (min_dim as f64 * 0.15) as i32;
                let container_radius = (min_dim as f64 * 0.25) as i32;

                if let Some(provider) = &css_provider {
                    provider.load_from_data(&format!(
                        ".tessella-card {{ border-radius: {card_radius}px; }} \
                         .tessella-card-container {{ border-radius: {container_radius}px; }}",
                        card_radius = card_radius,
                        container_radius = container_radius
                    ));
                }
            }
        }
    };

    let update_styles_clone = update_styles.clone();
    grid.connect_closure(
        "notify::width",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles_clone(&grid);
        }),
    );
    grid.connect_closure(
        "notify::height",
        false,
        glib::closure_local!(move |grid: gtk::Grid, _: glib::ParamSpec| {
            update_styles(&grid);
        }),
    );

    let mut buttons = Vec::new();

    for i in 0..(GRID_ROWS * GRID_COLS) {
        let index = i as usize;
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["tessella-card"])
            .build();
        button.set_hexpand(true);
        button.set_vexpand(true);

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("tessella-card-face");

        let state_draw = state.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let st = state_draw.borrow();
            let Some(tile) = st.round.board().tile(index) else {
                return;
            };

            cr.set_antialias(gtk::cairo::Antialias::Best);
            let min_dim = width.min(height) as f64;

            match tile.state {
                TileState::Matched => {}
                TileState::Revealed => {
                    let inset = (min_dim * 0.16).max(4.0);
                    let (r, g, b) = tile.color.rgb();
                    cr.set_source_rgb(r, g, b);
                    rounded_rect(
                        cr,
                        inset,
                        inset,
                        width as f64 - inset * 2.0,
                        height as f64 - inset * 2.0,
                        (min_dim * 0.12).max(3.0),
                    );
                    let _ = cr.fill();
                }
                TileState::Hidden => {
                    let layout = pangocairo::functions::create_layout(cr);
                    let mut font_desc = pango::FontDescription::new();
                    font_desc.set_family("Cantarell, Noto Sans, sans");
                    font_desc.set_weight(pango::Weight::Bold);
                    font_desc.set_size((min_dim * 0.34 * pango::SCALE as f64) as i32);
                    layout.set_font_description(Some(&font_desc));
                    layout.set_text("?");

                    let fg = area.style_context().color();
                    cr.set_source_rgba(
                        fg.red() as f64,
                        fg.green() as f64,
                        fg.blue() as f64,
                        fg.alpha() as f64,
                    );

                    let (text_width, text_height) = layout.pixel_size();
                    cr.move_to(
                        (width as f64 - text_width as f64) / 2.0,
                        (height as f64 - text_height as f64) / 2.0,
                    );

                    pangocairo::functions::show_layout(cr, &layout);
                }
            }
        });

        button.set_child(Some(&drawing_area));

        if let Some(tile) = state.borrow().round.board().tile(index) {
            match tile.state {
                TileState::Matched => button.add_css_class("matched"),
                TileState::Revealed => button.add_css_class("active"),
                TileState::Hidden => (),
            }
        }

        let state_clone = state.clone();
        button.connect_clicked(move |_| {
            handle_tile_click(&state_clone, index);
        });

        aspect_frame.set_child(Some(&button));

        let x = i % GRID_COLS;
        let y = i / GRID_COLS;
        grid.attach(&aspect_frame, x, y, 1, 1);
        buttons.push(button);
    }

    state.borrow_mut().grid_buttons = buttons;

    grid
}
