use egui::{RichText, Ui};
use series::{Extraction, Row, SeriesExtractor};

use crate::{
    chart::{ChartConfig, ChartKind, Tables},
    picker::WindowPicker,
    plot,
};

/// Identifies the rows an extraction was computed from.
///
/// Replacing a table moves or resizes its rows, which changes the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TableKey {
    address: usize,
    len: usize,
}

impl TableKey {
    fn of(rows: &[Row]) -> Self {
        Self {
            address: rows.as_ptr() as usize,
            len: rows.len(),
        }
    }
}

/// The last extraction of a panel, along with the inputs it was computed from.
#[derive(Debug, Clone)]
struct Cached {
    table: TableKey,
    config: ChartConfig,
    extraction: Extraction,
}

/// One chart of the dashboard and everything the user picked for it.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    kind: ChartKind,
    config: ChartConfig,
    picker: WindowPicker,
    cached: Option<Cached>,
}

impl ChartPanel {
    pub fn new(kind: ChartKind, config: ChartConfig) -> Self {
        Self {
            kind,
            picker: WindowPicker::new(&config.window),
            config,
            cached: None,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// The extraction of `rows` for the current config.
    ///
    /// Recomputed from scratch whenever the config or the rows changed since
    /// the last call, a result computed for older inputs is never handed out.
    pub fn extraction(&mut self, rows: &[Row], extractor: &SeriesExtractor) -> &Extraction {
        let table = TableKey::of(rows);
        let cached = match self.cached.take() {
            Some(cached) if cached.config == self.config && cached.table == table => cached,
            _ => {
                let specs = self.kind.specs(self.config.selector);
                Cached {
                    table,
                    config: self.config,
                    extraction: extractor.extract(rows, &self.config.window, &specs),
                }
            }
        };
        &self.cached.insert(cached).extraction
    }

    pub fn ui(&mut self, tables: &Tables, extractor: &SeriesExtractor, ui: &mut Ui) {
        if self.picker.ui(&mut self.config.window, ui) {
            log::debug!("{}: new window {:?}", self.kind.title(), self.config.window);
        }

        let choices = self.kind.selectors();
        if !choices.is_empty() {
            ui.horizontal(|ui| {
                for choice in choices {
                    ui.radio_value(&mut self.config.selector, *choice, choice.label());
                }
            });
        }
        ui.separator();

        let kind = self.kind;
        match self.extraction(tables.rows(kind.table()), extractor) {
            Extraction::Data(result) => plot::show(kind, result, ui),
            Extraction::NoData(result) => {
                ui.label(RichText::new("No data available for this window").italics());
                if result.skipped > 0 {
                    ui.label(format!("{} rows had no usable date", result.skipped));
                }
            }
        }
    }
}
