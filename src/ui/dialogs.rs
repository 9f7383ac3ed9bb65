use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("Instructions"),
        Some(
            "Every color hides under four tiles.\n\
Flip two tiles at a time to hunt for a matching pair.\n\
Matches leave the board; mismatches flip back over.\n\
Clear all 36 tiles in as few flips as you can.",
        ),
    );
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Tessella")
        .application_icon("dev.basalt.Tessella")
        .developer_name("Basalt")
        .developers(vec!["Basalt"])
        .version("1.0.0")
        .comments("A color-matching memory game.")
        .build();
    dialog.add_legal_section(
        "Tessella",
        Some("© 2026 Basalt"),
        gtk::License::MitX11,
        None,
    );
    dialog.present(app.active_window().as_ref());
    dialog
}
