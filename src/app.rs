use eframe::{egui, App, Frame};
use egui::RichText;

use crate::render::{Dashboard, ACCENT, BACKGROUND, MUTED, PANEL, TEXT};
use crate::search::{NoticeLevel, SearchController, SearchState, SearchWorker};

pub struct WeatherApp {
    query: String,
    controller: SearchController,
    dashboard: Dashboard,
    worker: SearchWorker,
    pending_city: Option<String>,
}

impl App for WeatherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if let Some(city) = self.pending_city.take() {
            self.query = city;
            self.start_search(ctx);
        }

        // Apply finished searches on the UI thread
        for completion in self.worker.poll() {
            if let Some(render) = self.controller.complete(completion) {
                self.dashboard
                    .render_current(&render.location, &render.report.current);
                self.dashboard.render_forecast(&render.report.daily);
            }
        }

        let background = egui::Frame::default()
            .fill(BACKGROUND)
            .inner_margin(egui::Margin::same(10.0));

        // Status line
        egui::TopBottomPanel::bottom("status")
            .frame(background)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(self.controller.status()).size(10.0).color(MUTED));
                });
            });

        egui::CentralPanel::default().frame(background).show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Weather App").size(28.0).strong().color(TEXT));
            });
            ui.add_space(10.0);

            // Search row: Enter in the box or the button both submit
            let mut submitted = false;
            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.query)
                        .hint_text("City name")
                        .desired_width(360.0)
                        .font(egui::TextStyle::Heading),
                );
                if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submitted = true;
                }
                let search = egui::Button::new(RichText::new("Search").strong().color(egui::Color32::BLACK))
                    .fill(ACCENT);
                if ui.add(search).clicked() {
                    submitted = true;
                }
                if self.controller.state() != SearchState::Idle {
                    ui.spinner();
                }
            });
            if submitted {
                self.start_search(ctx);
            }
            ui.add_space(10.0);

            // Current conditions + forecast strip
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.dashboard.show(ui);
            });
        });

        self.show_notice(ctx);
    }
}

impl WeatherApp {
    pub fn new(worker: SearchWorker, initial_city: Option<String>) -> Self {
        Self {
            query: String::new(),
            controller: SearchController::new(),
            dashboard: Dashboard::default(),
            worker,
            pending_city: initial_city,
        }
    }

    fn start_search(&mut self, ctx: &egui::Context) {
        let Ok(ticket) = self.controller.submit(&self.query) else {
            return;
        };
        let ctx = ctx.clone();
        self.worker.dispatch(ticket, move || ctx.request_repaint());
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.notice().cloned() else {
            return;
        };

        let (icon, color) = match notice.level {
            NoticeLevel::Warning => ("⚠", ACCENT),
            NoticeLevel::Error => ("⛔", egui::Color32::from_rgb(0xf8, 0x71, 0x71)),
        };

        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(PANEL)
                    .inner_margin(egui::Margin::same(12.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(icon).size(20.0).color(color));
                    ui.label(RichText::new(&notice.message).color(TEXT));
                });
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.dismiss_notice();
        }
    }
}
