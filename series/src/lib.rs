//! Decode, filter and reshape spreadsheet exports into chart series.
//!
//! ```
//! use series::{Row, SerialDecoder, SeriesExtractor, SeriesSpec, TimeWindow, Value};
//! use time::macros::datetime;
//!
//! let rows = [
//!     Row::new()
//!         .with("DATE & TIME", Value::Number(45480.5))
//!         .with("HT_OG1_kWh", Value::Number(120.0)),
//! ];
//! let window = TimeWindow::new(
//!     datetime!(2024-07-07 11:00:00 UTC),
//!     datetime!(2024-07-07 12:00:00 UTC),
//! );
//! let extraction = SeriesExtractor::new(SerialDecoder::utc()).extract(
//!     &rows,
//!     &window,
//!     &[SeriesSpec::column("HT_OG1_kWh")],
//! );
//! let result = extraction.result();
//! assert_eq!(result.labels, ["7/7/2024, 12:00:00 PM"]);
//! assert_eq!(result.series[0].values, [120.0]);
//! ```

#![warn(clippy::all, rust_2018_idioms)]

mod error;
mod extract;
mod label;
mod row;
mod select;
mod serial;
pub mod table;

pub use error::{InvalidRowError, TableError};
pub use extract::{
    Extraction, ExtractionResult, Filtered, Reshape, Series, SeriesExtractor, SeriesSpec,
    TimeWindow, DEFAULT_TIMESTAMP_COLUMN,
};
pub use label::{IsoLabels, LabelFormat, LocaleLabels};
pub use row::{Row, Value};
pub use select::{Phase, Selector, UnknownSelector};
pub use serial::{SerialDecoder, UNIX_EPOCH_SERIAL};
