use std::collections::BTreeMap;

use include_dir::{include_dir, Dir};
use series::{table::load_or_empty, table::JsonTable, Row, SerialDecoder, SeriesExtractor};

use crate::{
    chart::{ChartConfig, ChartKind, TableName, Tables},
    dashboard,
    inspect::InspectCharts,
    panel::ChartPanel,
};

static TABLES_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets/tables");

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum View {
    #[default]
    Dashboard,
    Inspect,
}

pub struct PowerApp {
    tables: Tables,
    extractor: SeriesExtractor,
    panels: Vec<ChartPanel>,
    view: View,
    inspect_view: InspectCharts,
}

fn load_table(name: TableName) -> Vec<Row> {
    match TABLES_DIR
        .get_file(name.file_name())
        .and_then(|file| file.contents_utf8())
    {
        Some(text) => load_or_empty(name.file_name(), &JsonTable::from_text(text)),
        None => {
            log::warn!("The table {} is not bundled", name.file_name());
            Vec::new()
        }
    }
}

impl PowerApp {
    /// `decoder` should be built before any thread is spawned, see [`SerialDecoder::local`].
    pub fn new(cc: &eframe::CreationContext<'_>, decoder: SerialDecoder) -> Self {
        let saved: BTreeMap<ChartKind, ChartConfig> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_configs(decoder, saved)
    }

    fn with_configs(decoder: SerialDecoder, mut saved: BTreeMap<ChartKind, ChartConfig>) -> Self {
        let mut tables = Tables::default();
        for name in TableName::ALL {
            tables.insert(name, load_table(name));
        }

        let panels: Vec<_> = ChartKind::ALL
            .into_iter()
            .map(|kind| {
                let config = saved
                    .remove(&kind)
                    .unwrap_or_else(|| ChartConfig::default_for(kind, decoder.offset()));
                ChartPanel::new(kind, config)
            })
            .collect();

        PowerApp {
            tables,
            extractor: SeriesExtractor::new(decoder),
            inspect_view: InspectCharts::new(&panels),
            panels,
            view: View::default(),
        }
    }

    fn configs(&self) -> BTreeMap<ChartKind, ChartConfig> {
        self.panels
            .iter()
            .map(|panel| (panel.kind(), *panel.config()))
            .collect()
    }

    pub fn ui(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            // The top panel is often a good place for a menu bar:

            egui::menu::bar(ui, |ui| {
                // NOTE: no File->Quit on web pages!
                let is_web = cfg!(target_arch = "wasm32");
                if !is_web {
                    ui.menu_button("File", |ui| {
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.add_space(16.0);
                }

                egui::widgets::global_dark_light_mode_buttons(ui);
                ui.separator();
                ui.selectable_value(&mut self.view, View::Dashboard, "Dashboard");
                ui.selectable_value(&mut self.view, View::Inspect, "Inspect");
            });
        });

        match self.view {
            View::Dashboard => dashboard::ui(&mut self.panels, &self.tables, &self.extractor, ctx),
            View::Inspect => {
                self.inspect_view
                    .ui(&mut self.panels, &self.tables, &self.extractor, ctx)
            }
        }
    }
}

impl eframe::App for PowerApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.ui(ctx, frame);
    }

    /// Called by the framework to save the chart windows and selectors before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.configs());
    }
}
