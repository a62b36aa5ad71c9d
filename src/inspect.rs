use egui::{Context, Window};
use series::SeriesExtractor;

use crate::{
    chart::{ChartKind, TableName, Tables},
    panel::ChartPanel,
};

/// Whether `kind` should be listed for `filter`, which is already lowercase.
///
/// The title, the unit and the export a chart reads from are all searchable,
/// so `kw` lists the power charts and `feedercurrent` the current ones.
fn matches(kind: ChartKind, filter: &str) -> bool {
    filter.is_empty()
        || [kind.title(), kind.unit(), kind.table().file_name()]
            .iter()
            .any(|field| field.to_lowercase().contains(filter))
}

/// Pick charts from a side list and open each of them in its own window.
#[derive(Clone)]
pub struct InspectCharts {
    parameters: Vec<Parameter>,
    filter: String,
}

impl InspectCharts {
    pub fn new(panels: &[ChartPanel]) -> Self {
        let mut parameters = vec![Parameter::default(); panels.len()];
        if let Some(parameter) = parameters.first_mut() {
            parameter.selected = true;
        }
        Self {
            parameters,
            filter: String::new(),
        }
    }

    pub fn ui(
        &mut self,
        panels: &mut [ChartPanel],
        tables: &Tables,
        extractor: &SeriesExtractor,
        ctx: &Context,
    ) {
        egui::SidePanel::right("right_panel").show(ctx, |ui| {
            // get the list of charts matching the filter:
            let filter = self.filter.to_lowercase();
            let to_display: Vec<_> = self
                .parameters
                .iter_mut()
                .zip(panels.iter())
                .filter(|(_param, panel)| matches(panel.kind(), &filter))
                .collect();

            let mut select_all = false;
            let mut close_all = false;

            ui.vertical(|ui| {
                ui.text_edit_singleline(&mut self.filter);
                ui.label(format!("Total: {}", panels.len()));
                if !self.filter.is_empty() {
                    ui.label(format!("After filter: {}", to_display.len()));
                }
                if ui.button("Select all").clicked() {
                    select_all = true;
                }
                if ui.button("Close all").clicked() {
                    close_all = true;
                }

                ui.separator();
            });
            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut to_display = to_display;
                for table in TableName::ALL {
                    let mut charts = to_display
                        .iter_mut()
                        .filter(|(_param, panel)| panel.kind().table() == table)
                        .peekable();
                    if charts.peek().is_none() {
                        continue;
                    }
                    ui.label(egui::RichText::new(table.file_name()).weak());
                    for (parameter, panel) in charts {
                        if select_all {
                            parameter.selected = true;
                        }
                        let kind = panel.kind();
                        ui.horizontal(|ui| {
                            ui.toggle_value(&mut parameter.selected, kind.title());
                            ui.label(kind.unit());
                        });
                    }
                }
            });

            if close_all {
                for parameter in self.parameters.iter_mut() {
                    parameter.selected = false;
                }
            }
        });

        egui::CentralPanel::default().show(ctx, |_ui| {
            for (parameter, panel) in self.parameters.iter_mut().zip(panels.iter_mut()) {
                parameter.ui(panel, tables, extractor, ctx);
            }
        });
    }
}

#[derive(Default, Clone)]
pub struct Parameter {
    selected: bool,
}

impl Parameter {
    pub fn ui(
        &mut self,
        panel: &mut ChartPanel,
        tables: &Tables,
        extractor: &SeriesExtractor,
        ctx: &Context,
    ) {
        if self.selected {
            let mut still_opened = true;
            Window::new(panel.kind().title())
                .default_width(800.0)
                .default_height(500.0)
                .open(&mut still_opened)
                .show(ctx, |ui| {
                    panel.ui(tables, extractor, ui);
                });
            self.selected = still_opened;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn listed(filter: &str) -> Vec<ChartKind> {
        ChartKind::ALL
            .into_iter()
            .filter(|kind| matches(*kind, &filter.to_lowercase()))
            .collect()
    }

    #[test]
    fn filter_charts() {
        assert_eq!(listed(""), ChartKind::ALL);
        assert_eq!(listed("Composite"), [ChartKind::CompositeCurrent]);
        assert_eq!(listed("kwh"), [ChartKind::HtPower]);
        assert_eq!(
            listed("kw"),
            [ChartKind::HtPower, ChartKind::FeedersStacked]
        );
        assert_eq!(
            listed("FeederCurrent"),
            [ChartKind::IndividualCurrent, ChartKind::CompositeCurrent]
        );
        assert_eq!(
            listed("htdata"),
            [ChartKind::HtPower, ChartKind::HtCurrent]
        );
        assert!(listed("humidity").is_empty());
    }
}
