use crate::{
    config::{ClickSettings, COUNT_RANGE, INTERVAL_SECS, POSITION_PERIOD},
    input::DesktopInput,
    screen::{self, Bounds},
    session::ClickSession,
};
use eframe::egui::{self, Color32, DragValue, RichText};
use std::time::{Duration, Instant};

// -------------- UI State --------------
pub struct ClickerApp {
    session: ClickSession,
    input: DesktopInput,
    desktop: Bounds,
}

impl ClickerApp {
    pub fn new(settings: ClickSettings) -> Self {
        let input = DesktopInput::new();
        let desktop = screen::virtual_desktop_or(input.main_display_size());
        tracing::debug!(?desktop, "virtual desktop");
        let settings = settings.clamped_to(desktop);
        Self {
            session: ClickSession::new(settings, Instant::now()),
            input,
            desktop,
        }
    }

    fn settings_rows(&mut self, ui: &mut egui::Ui) {
        let locked = self.session.inputs_locked();

        ui.horizontal(|ui| {
            ui.label("Clicks:");
            let mut count = self.session.settings().count;
            let edit = DragValue::new(&mut count).clamp_range(COUNT_RANGE);
            if ui.add_enabled(!locked, edit).changed() {
                self.session.set_count(count);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Interval (seconds):");
            let mut secs = self.session.settings().interval.as_secs_f64();
            let edit = DragValue::new(&mut secs)
                .clamp_range(INTERVAL_SECS)
                .speed(0.1)
                .max_decimals(2);
            if ui.add_enabled(!locked, edit).changed() {
                self.session.set_interval(Duration::from_secs_f64(secs));
            }
        });
    }

    fn target_row(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            ui.label("Position:");
            let mut target = self.session.settings().target;
            let editable = !self.session.target_locked();
            let mut edit_x = DragValue::new(&mut target.x).prefix("x: ");
            if let Some(range) = self.desktop.x_range() {
                edit_x = edit_x.clamp_range(range);
            }
            let mut edit_y = DragValue::new(&mut target.y).prefix("y: ");
            if let Some(range) = self.desktop.y_range() {
                edit_y = edit_y.clamp_range(range);
            }
            let x = ui.add_enabled(editable, edit_x);
            let y = ui.add_enabled(editable, edit_y);
            if x.changed() || y.changed() {
                self.session.set_target(target);
            }

            let selecting = self.session.selecting_target();
            let button = if selecting {
                egui::Button::new(RichText::new(self.session.selection_label()).color(Color32::WHITE)).fill(Color32::RED)
            } else {
                egui::Button::new(self.session.selection_label())
            };
            if ui.add_enabled(!self.session.inputs_locked(), button).clicked() {
                self.session.begin_selection(now);
            }
        });
    }
}

impl eframe::App for ClickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.session.advance(now, &mut self.input);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.settings_rows(ui);
            self.target_row(ui, now);

            ui.horizontal(|ui| {
                ui.label(self.session.remaining_text());
                ui.separator();
                ui.monospace(self.session.cursor_text());
            });

            ui.add_space(6.0);
            let start = egui::Button::new(self.session.start_label())
                .min_size(egui::vec2(ui.available_width(), 28.0));
            if ui.add_enabled(self.session.can_toggle(), start).clicked() {
                self.session.toggle_session(now);
            }
        });

        // Clicks only advance while eframe calls `update`. Some platforms stop
        // repainting a minimized window, so the window stays always-on-top
        // and a run should be left visible (or use --headless).
        let wait = self
            .session
            .next_deadline()
            .map_or(POSITION_PERIOD, |at| at.saturating_duration_since(Instant::now()));
        ctx.request_repaint_after(wait);
    }
}
