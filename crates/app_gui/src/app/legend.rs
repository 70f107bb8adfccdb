//! Side panel listing the class keys and navigation shortcuts.

use super::UiApp;
use eframe::egui;

impl UiApp {
    pub(super) fn render_legend_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Classes");
        ui.add_space(8.0);
        for (digit, name) in self.classes.selectable() {
            let text = format!("{digit}  {name}");
            if self.last_class.as_deref() == Some(name) {
                ui.strong(text);
            } else {
                ui.label(text);
            }
        }

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(6.0);
        ui.heading("Keys");
        ui.label("Backspace  previous image");
        ui.label("Esc  discard this session");
        ui.label("S  save and quit");
    }
}
