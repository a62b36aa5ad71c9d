use std::collections::BTreeMap;

use egui::Color32;
use serde::{Deserialize, Serialize};
use series::{Phase, Reshape, Row, Selector, Series, SeriesSpec, TimeWindow};
use time::{macros::datetime, UtcOffset};

use crate::plot::{palette_color, shade, TOTAL_COLOR};

/// Units measured by the HT meters.
pub const HT_UNITS: [&str; 2] = ["HT_OG1", "HT_OG2"];

/// Every feeder of the plant, in display order.
pub const FEEDERS: [&str; 16] = [
    "Alkaline_1",
    "ALOXPECVD_2",
    "ALOXPECVD_3",
    "Diffusion_1",
    "Diffusion_2",
    "Diffusion_3",
    "Diffusion_4",
    "Ext_D1_Heater",
    "Ext_D2_Heater",
    "Ext_D3_Heater",
    "Ext_D4_Heater",
    "HotWaterTank_1",
    "HotWaterTank_2",
    "PreAnnealing_1",
    "PreAnnealing_2",
    "Texture_1",
];

/// Power columns of the feeder export. The headers aren't consistent, keep them as is.
pub const FEEDER_POWER_COLUMNS: [&str; 16] = [
    "Alkaline_1_Kwh",
    "ALOXPECVD_2_KW",
    "ALOXPECVD_3_KW",
    "Diffusion-1_KW",
    "Diffusion_2_KW",
    "Diffusion_3_KW",
    "Diffusion_4_KW",
    "Ext_D1_Heater_KW",
    "Ext_D2_Heater_KW",
    "Ext_D3_Heater_KW",
    "Ext_D4_Heater_KW",
    "HotWaterTank_1_KW",
    "HotWaterTank_2_KW",
    "PreAnnealing_1_KW",
    "PreAnnealing_2_KW",
    "Texture_1_KW",
];

const PHASE_SELECTORS: [Selector; 3] = [
    Selector::Only(Phase::R),
    Selector::Only(Phase::Y),
    Selector::Only(Phase::B),
];

/// The spreadsheet exports the dashboard is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableName {
    Ht,
    FeederPower,
    FeederCurrent,
}

impl TableName {
    pub const ALL: [TableName; 3] = [TableName::Ht, TableName::FeederPower, TableName::FeederCurrent];

    pub fn file_name(&self) -> &'static str {
        match self {
            TableName::Ht => "HTdata.json",
            TableName::FeederPower => "FeederKw.json",
            TableName::FeederCurrent => "FeederCurrent.json",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tables(BTreeMap<TableName, Vec<Row>>);

impl Tables {
    pub fn insert(&mut self, name: TableName, rows: Vec<Row>) {
        self.0.insert(name, rows);
    }

    pub fn rows(&self, name: TableName) -> &[Row] {
        self.0.get(&name).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    HtPower,
    HtCurrent,
    FeedersStacked,
    IndividualCurrent,
    CompositeCurrent,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::HtPower,
        ChartKind::HtCurrent,
        ChartKind::FeedersStacked,
        ChartKind::IndividualCurrent,
        ChartKind::CompositeCurrent,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::HtPower => "HT Power Chart",
            ChartKind::HtCurrent => "HT Current Chart",
            ChartKind::FeedersStacked => "Feeders Stacked",
            ChartKind::IndividualCurrent => "Individual Current Chart",
            ChartKind::CompositeCurrent => "Composite Current Chart",
        }
    }

    pub fn table(&self) -> TableName {
        match self {
            ChartKind::HtPower | ChartKind::HtCurrent => TableName::Ht,
            ChartKind::FeedersStacked => TableName::FeederPower,
            ChartKind::IndividualCurrent | ChartKind::CompositeCurrent => TableName::FeederCurrent,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ChartKind::HtPower => "kWh",
            ChartKind::FeedersStacked => "kW",
            ChartKind::HtCurrent | ChartKind::IndividualCurrent | ChartKind::CompositeCurrent => "A",
        }
    }

    /// The selectors offered to the user, empty when the chart has none.
    pub fn selectors(&self) -> &'static [Selector] {
        match self {
            ChartKind::IndividualCurrent => &Selector::CHOICES,
            ChartKind::CompositeCurrent => &PHASE_SELECTORS,
            ChartKind::HtPower | ChartKind::HtCurrent | ChartKind::FeedersStacked => &[],
        }
    }

    pub fn default_selector(&self) -> Selector {
        match self {
            ChartKind::CompositeCurrent => Selector::Only(Phase::R),
            _ => Selector::All,
        }
    }

    /// Series drawn as a line on top of the stacked bars.
    pub fn total_series(&self) -> Option<&'static str> {
        match self {
            ChartKind::FeedersStacked => Some("total"),
            ChartKind::CompositeCurrent => Some("Total Current"),
            _ => None,
        }
    }

    pub fn stacked(&self) -> bool {
        self.total_series().is_some()
    }

    pub fn draws_as_bar(&self, series: &Series) -> bool {
        self.stacked() && self.total_series() != Some(series.name.as_str())
    }

    pub fn specs(&self, selector: Selector) -> Vec<SeriesSpec> {
        match self {
            ChartKind::HtPower => HT_UNITS
                .iter()
                .map(|unit| SeriesSpec::column(format!("{unit}_kWh")))
                .collect(),
            ChartKind::HtCurrent => Selector::All.specs(&HT_UNITS),
            ChartKind::FeedersStacked => FEEDER_POWER_COLUMNS
                .iter()
                .copied()
                .chain(["total"])
                .map(SeriesSpec::column)
                .collect(),
            ChartKind::IndividualCurrent => selector.specs(&FEEDERS),
            ChartKind::CompositeCurrent => {
                // `All` isn't offered here, a sum over every phase would be meaningless.
                let selector = match selector {
                    Selector::All => self.default_selector(),
                    selector => selector,
                };
                let mut specs = selector.specs(&FEEDERS);
                specs.push(SeriesSpec::sum("Total Current", selector.columns(&FEEDERS)));
                specs
            }
        }
    }

    /// Colour of the `index`-th series of an extraction.
    pub fn color(&self, index: usize, series: &Series) -> Color32 {
        match self {
            ChartKind::HtPower => {
                let base = [Color32::from_rgb(54, 162, 235), Color32::from_rgb(255, 99, 132)];
                shade(base[index % base.len()], index, HT_UNITS.len())
            }
            ChartKind::HtCurrent => {
                let base = if series.name.ends_with(Phase::R.column_suffix()) {
                    Color32::from_rgb(255, 0, 0)
                } else if series.name.ends_with(Phase::Y.column_suffix()) {
                    Color32::from_rgb(245, 230, 83)
                } else {
                    Color32::from_rgb(0, 0, 255)
                };
                shade(base, index % HT_UNITS.len(), HT_UNITS.len())
            }
            _ if series.reshape == Reshape::Sum || self.total_series() == Some(series.name.as_str()) => {
                TOTAL_COLOR
            }
            _ => palette_color(index),
        }
    }
}

/// Everything the user can change on a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartConfig {
    pub window: TimeWindow,
    pub selector: Selector,
}

impl ChartConfig {
    /// The hour the exports were first looked at: 2024-07-07 from 11:00 to 12:00.
    pub fn default_for(kind: ChartKind, offset: UtcOffset) -> Self {
        Self {
            window: TimeWindow::new(
                datetime!(2024-07-07 11:00:00).assume_offset(offset),
                datetime!(2024-07-07 12:00:00).assume_offset(offset),
            ),
            selector: kind.default_selector(),
        }
    }
}
