use egui::Context;
use series::SeriesExtractor;

use crate::{chart::Tables, panel::ChartPanel};

/// Every chart, one below the other.
pub fn ui(panels: &mut [ChartPanel], tables: &Tables, extractor: &SeriesExtractor, ctx: &Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            for panel in panels.iter_mut() {
                ui.push_id(panel.kind(), |ui| {
                    ui.group(|ui| {
                        ui.heading(panel.kind().title());
                        ui.set_min_height(400.0);
                        panel.ui(tables, extractor, ui);
                    });
                });
                ui.add_space(16.0);
            }
        });
    });
}
