use chrono::NaiveDate;
use eframe::egui;
use egui::{Color32, RichText};

use crate::weather::{CurrentConditions, DailyForecastEntry, Location};
use crate::weather_code::{describe, WeatherType};

pub const BACKGROUND: Color32 = Color32::from_rgb(0x1e, 0x3a, 0x8a);
pub const PANEL: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);
pub const ACCENT: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);
pub const MUTED: Color32 = Color32::from_rgb(0xbf, 0xdb, 0xfe);
pub const TEXT: Color32 = Color32::WHITE;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPanel {
    pub header: String,
    pub temperature: String,
    pub condition: &'static str,
    pub humidity: String,
    pub wind: String,
    pub kind: WeatherType,
}

impl CurrentPanel {
    pub fn new(location: &Location, current: &CurrentConditions) -> Self {
        Self {
            header: location.display_name(),
            temperature: format!("{:.1}°C", current.temperature),
            condition: describe(current.weather_code),
            humidity: format!("{}%", current.humidity),
            wind: format!("{:.1} km/h", current.wind_speed),
            kind: WeatherType::from_code(current.weather_code),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTile {
    pub date: NaiveDate,
    /// Abbreviated weekday over month/day, e.g. "Mon\n01/01".
    pub day_label: String,
    pub condition: &'static str,
    pub temperatures: String,
    pub precipitation: String,
    pub kind: WeatherType,
}

impl ForecastTile {
    pub fn new(entry: &DailyForecastEntry) -> Self {
        Self {
            date: entry.date,
            day_label: entry.date.format("%a\n%m/%d").to_string(),
            condition: describe(entry.weather_code),
            temperatures: format!(
                "↑{:.1}° ↓{:.1}°",
                entry.max_temperature, entry.min_temperature
            ),
            precipitation: format!("💧 {:.1}mm", entry.precipitation),
            kind: WeatherType::from_code(entry.weather_code),
        }
    }
}

/// Widget models for the current-conditions panel and the forecast strip.
///
/// Each render call throws away the previous model for its panel and
/// rebuilds it, so rendering the same input twice gives the same result.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dashboard {
    current: Option<CurrentPanel>,
    forecast: Vec<ForecastTile>,
}

impl Dashboard {
    pub fn render_current(&mut self, location: &Location, current: &CurrentConditions) {
        self.current = Some(CurrentPanel::new(location, current));
    }

    pub fn render_forecast(&mut self, daily: &[DailyForecastEntry]) {
        self.forecast = daily.iter().map(ForecastTile::new).collect();
    }

    pub fn current(&self) -> Option<&CurrentPanel> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> &[ForecastTile] {
        &self.forecast
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        if let Some(panel) = &self.current {
            show_current(ui, panel);
            ui.add_space(10.0);
        }
        if !self.forecast.is_empty() {
            show_forecast(ui, &self.forecast);
        }
    }
}

fn panel_frame(fill: Color32) -> egui::Frame {
    egui::Frame::none()
        .fill(fill)
        .rounding(4.0)
        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(0x33, 0x4a, 0x9a)))
        .inner_margin(egui::Margin::same(10.0))
}

pub fn show_current(ui: &mut egui::Ui, panel: &CurrentPanel) {
    panel_frame(PANEL).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            // Location header
            ui.label(RichText::new(&panel.header).size(18.0).strong().color(ACCENT));
            ui.add_space(8.0);

            // Condition icon, temperature and description
            let (rect, _) = ui.allocate_exact_size(egui::vec2(72.0, 72.0), egui::Sense::hover());
            draw_condition_icon(ui.painter(), rect, panel.kind);

            ui.label(RichText::new(&panel.temperature).size(48.0).strong().color(TEXT));
            ui.label(RichText::new(panel.condition).size(14.0).color(MUTED));
        });
        ui.add_space(10.0);

        // Details
        ui.columns(2, |columns| {
            stat_tile(&mut columns[0], "Humidity", &panel.humidity);
            stat_tile(&mut columns[1], "Wind Speed", &panel.wind);
        });
    });
}

fn stat_tile(ui: &mut egui::Ui, title: &str, value: &str) {
    panel_frame(BACKGROUND).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(title).size(10.0).color(MUTED));
            ui.label(RichText::new(value).size(14.0).strong().color(TEXT));
        });
    });
}

pub fn show_forecast(ui: &mut egui::Ui, tiles: &[ForecastTile]) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("7-Day Forecast").size(14.0).strong().color(TEXT));
    });
    ui.add_space(5.0);

    ui.columns(tiles.len(), |columns| {
        for (column, tile) in columns.iter_mut().zip(tiles) {
            panel_frame(PANEL).show(column, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(&tile.day_label).size(9.0).strong().color(MUTED));
                    ui.label(RichText::new(tile.kind.glyph()).size(16.0).color(TEXT));
                    ui.label(RichText::new(tile.condition).size(8.0).color(TEXT));
                    ui.label(RichText::new(&tile.temperatures).size(9.0).strong().color(ACCENT));
                    ui.label(RichText::new(&tile.precipitation).size(8.0).color(MUTED));
                });
            });
        }
    });
}

fn draw_condition_icon(painter: &egui::Painter, rect: egui::Rect, kind: WeatherType) {
    let center = rect.center();
    let radius = rect.width().min(rect.height()) * 0.4;
    let sun = Color32::from_rgb(255, 220, 60);
    let rain = Color32::from_rgb(100, 150, 255);

    match kind {
        WeatherType::Clear => {
            // Sun with rays
            for i in 0..8 {
                let angle = i as f32 / 8.0 * std::f32::consts::TAU;
                let dir = egui::vec2(angle.cos(), angle.sin());
                painter.line_segment(
                    [center + dir * radius * 0.7, center + dir * radius],
                    egui::Stroke::new(2.0, sun),
                );
            }
            painter.circle_filled(center, radius * 0.55, sun);
        }
        WeatherType::PartlyCloudy => {
            // Sun peeking out behind a cloud
            painter.circle_filled(center + egui::vec2(-radius * 0.3, -radius * 0.3), radius * 0.45, sun);
            draw_cloud(painter, center + egui::vec2(radius * 0.1, radius * 0.2), radius * 0.4);
        }
        WeatherType::Cloudy | WeatherType::Unknown => {
            draw_cloud(painter, center, radius * 0.5);
        }
        WeatherType::Fog => {
            // Horizontal mist bands
            for i in 0..3 {
                let y = center.y + (i as f32 - 1.0) * radius * 0.4;
                painter.line_segment(
                    [egui::pos2(center.x - radius, y), egui::pos2(center.x + radius, y)],
                    egui::Stroke::new(4.0, Color32::from_rgb(200, 200, 200)),
                );
            }
        }
        WeatherType::Rain | WeatherType::Thunderstorm => {
            // Cloud above
            draw_cloud(painter, center + egui::vec2(0.0, -radius * 0.3), radius * 0.45);
            // Rain drops
            for i in 0..4 {
                let x = center.x + (i as f32 - 1.5) * radius * 0.4;
                let top = egui::pos2(x, center.y + radius * 0.3);
                painter.line_segment(
                    [top, top + egui::vec2(-radius * 0.1, radius * 0.35)],
                    egui::Stroke::new(2.0, rain),
                );
            }
            // Lightning bolt
            if kind == WeatherType::Thunderstorm {
                let start = center + egui::vec2(-radius * 0.1, 0.0);
                let mid = center + egui::vec2(radius * 0.1, radius * 0.35);
                let end = center + egui::vec2(-radius * 0.05, radius * 0.8);
                let bolt = egui::Stroke::new(3.0, Color32::from_rgb(255, 255, 200));
                painter.line_segment([start, mid], bolt);
                painter.line_segment([mid, end], bolt);
            }
        }
        WeatherType::Snow => {
            // Cloud above
            draw_cloud(painter, center + egui::vec2(0.0, -radius * 0.3), radius * 0.45);
            // Snowflakes, staggered
            for i in 0..4 {
                let x = center.x + (i as f32 - 1.5) * radius * 0.4;
                let y = center.y + radius * (0.45 + 0.2 * (i % 2) as f32);
                painter.circle_filled(egui::pos2(x, y), radius * 0.08, TEXT);
            }
        }
    }
}

fn draw_cloud(painter: &egui::Painter, center: egui::Pos2, size: f32) {
    let base = Color32::from_rgb(200, 200, 200);
    let shade = Color32::from_rgb(180, 180, 180);
    // Overlapping circles, darker underside
    painter.circle_filled(center, size, base);
    painter.circle_filled(center + egui::vec2(-size * 0.6, size * 0.2), size * 0.7, base);
    painter.circle_filled(center + egui::vec2(size * 0.6, size * 0.2), size * 0.7, base);
    painter.circle_filled(center + egui::vec2(0.0, size * 0.4), size * 0.6, shade);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> Location {
        Location {
            latitude: 51.51,
            longitude: -0.13,
            name: "London".to_string(),
            country: "UK".to_string(),
        }
    }

    fn january_week() -> Vec<DailyForecastEntry> {
        (1..=7)
            .map(|day| DailyForecastEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                weather_code: if day % 2 == 0 { 61 } else { 0 },
                max_temperature: 10.0 + day as f64,
                min_temperature: day as f64,
                precipitation: day as f64 * 0.5,
            })
            .collect()
    }

    #[test]
    fn current_panel_shows_header_and_temperature() {
        let current = CurrentConditions {
            temperature: 15.2,
            humidity: 80,
            weather_code: 3,
            wind_speed: 12.0,
        };
        let mut dashboard = Dashboard::default();
        dashboard.render_current(&london(), &current);

        let panel = dashboard.current().unwrap();
        assert_eq!(panel.header, "London, UK");
        assert_eq!(panel.temperature, "15.2°C");
        assert_eq!(panel.condition, "Overcast");
        assert_eq!(panel.humidity, "80%");
        assert_eq!(panel.wind, "12.0 km/h");
    }

    #[test]
    fn forecast_renders_one_tile_per_day_in_order() {
        let mut dashboard = Dashboard::default();
        dashboard.render_forecast(&january_week());

        let tiles = dashboard.forecast();
        assert_eq!(tiles.len(), 7);
        assert_eq!(tiles[0].day_label, "Mon\n01/01");
        assert_eq!(tiles[6].day_label, "Sun\n01/07");
        for (i, tile) in tiles.iter().enumerate() {
            let day = i as f64 + 1.0;
            assert_eq!(tile.date, NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap());
            assert_eq!(
                tile.temperatures,
                format!("↑{:.1}° ↓{:.1}°", 10.0 + day, day)
            );
            assert_eq!(tile.precipitation, format!("💧 {:.1}mm", day * 0.5));
        }
        assert_eq!(tiles[0].condition, "Clear sky");
        assert_eq!(tiles[1].condition, "Slight rain");
    }

    #[test]
    fn rendering_replaces_previous_content() {
        let mut dashboard = Dashboard::default();
        dashboard.render_forecast(&january_week());
        dashboard.render_forecast(&january_week()[..3]);
        assert_eq!(dashboard.forecast().len(), 3);

        let mut again = Dashboard::default();
        again.render_forecast(&january_week()[..3]);
        assert_eq!(dashboard, again);
    }

    #[test]
    fn unknown_code_renders_as_unknown() {
        let entry = DailyForecastEntry {
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            weather_code: 42,
            max_temperature: 1.0,
            min_temperature: -1.0,
            precipitation: 0.0,
        };
        let tile = ForecastTile::new(&entry);
        assert_eq!(tile.condition, "Unknown");
        assert_eq!(tile.temperatures, "↑1.0° ↓-1.0°");
    }
}
