use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    error::InvalidRowError,
    label::{LabelFormat, LocaleLabels},
    row::{Row, Value},
    serial::SerialDecoder,
};

/// Column holding the serial date in every export we know of.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "DATE & TIME";

/// Inclusive `[start, end]` range of timestamps.
///
/// A window whose start is after its end is valid and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl TimeWindow {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: OffsetDateTime) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reshape {
    /// Every key becomes its own series.
    Direct,
    /// The keys are summed row by row into a single series.
    Sum,
}

/// Which columns to pull out of the table and how.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub keys: Vec<String>,
    pub reshape: Reshape,
}

impl SeriesSpec {
    pub fn direct(name: impl Into<String>, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            reshape: Reshape::Direct,
        }
    }

    /// A single column, named after itself.
    pub fn column(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::direct(key.clone(), [key])
    }

    pub fn sum(name: impl Into<String>, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            reshape: Reshape::Sum,
        }
    }
}

/// One output sequence, aligned with [`ExtractionResult::labels`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// The column for a direct projection, the [`SeriesSpec`] name for a sum.
    pub name: String,
    /// Name of the [`SeriesSpec`] that produced this series.
    pub group: String,
    pub reshape: Reshape,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// Rows dropped because their timestamp couldn't be read.
    pub skipped: usize,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|series| series.name == name)
    }
}

/// Outcome of an extraction.
///
/// An empty window or an empty table isn't an error, but the renderer wants
/// to tell it apart to show a placeholder instead of a blank chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Data(ExtractionResult),
    NoData(ExtractionResult),
}

impl Extraction {
    fn new(result: ExtractionResult) -> Self {
        if result.is_empty() {
            Extraction::NoData(result)
        } else {
            Extraction::Data(result)
        }
    }

    pub fn result(&self) -> &ExtractionResult {
        match self {
            Extraction::Data(result) | Extraction::NoData(result) => result,
        }
    }

    pub fn into_result(self) -> ExtractionResult {
        match self {
            Extraction::Data(result) | Extraction::NoData(result) => result,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Extraction::NoData(_))
    }
}

/// Rows retained by a window, in input order, with their decoded timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtered<'a> {
    pub rows: Vec<(&'a Row, OffsetDateTime)>,
    pub skipped: usize,
}

/// Decodes, filters and reshapes the rows of a table into chart series.
#[derive(Debug, Clone)]
pub struct SeriesExtractor<L = LocaleLabels> {
    decoder: SerialDecoder,
    timestamp_column: String,
    labels: L,
}

impl SeriesExtractor {
    pub fn new(decoder: SerialDecoder) -> Self {
        Self {
            decoder,
            timestamp_column: String::from(DEFAULT_TIMESTAMP_COLUMN),
            labels: LocaleLabels,
        }
    }
}

impl Default for SeriesExtractor {
    fn default() -> Self {
        Self::new(SerialDecoder::default())
    }
}

impl<L: LabelFormat> SeriesExtractor<L> {
    pub fn with_labels<M: LabelFormat>(self, labels: M) -> SeriesExtractor<M> {
        SeriesExtractor {
            decoder: self.decoder,
            timestamp_column: self.timestamp_column,
            labels,
        }
    }

    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = column.into();
        self
    }

    pub fn decoder(&self) -> &SerialDecoder {
        &self.decoder
    }

    pub fn timestamp(&self, row: &Row) -> Result<OffsetDateTime, InvalidRowError> {
        match row.get(&self.timestamp_column) {
            Some(Value::Number(serial)) => self.decoder.decode(*serial),
            Some(Value::Text(text)) => Err(InvalidRowError::NonNumericTimestamp {
                column: self.timestamp_column.clone(),
                value: text.clone(),
            }),
            None | Some(Value::Empty) => Err(InvalidRowError::MissingTimestamp(
                self.timestamp_column.clone(),
            )),
        }
    }

    /// Keep the rows whose timestamp lies inside `window`, never reordering them.
    pub fn filter<'a>(&self, rows: &'a [Row], window: &TimeWindow) -> Filtered<'a> {
        let mut filtered = Filtered::default();
        for (index, row) in rows.iter().enumerate() {
            match self.timestamp(row) {
                Ok(date) if window.contains(date) => filtered.rows.push((row, date)),
                Ok(_) => (),
                Err(e) => {
                    log::debug!("Skipping row {index}: {e}");
                    filtered.skipped += 1;
                }
            }
        }
        filtered
    }

    pub fn extract(&self, rows: &[Row], window: &TimeWindow, specs: &[SeriesSpec]) -> Extraction {
        let filtered = self.filter(rows, window);

        let labels = filtered
            .rows
            .iter()
            .map(|(_, date)| self.labels.label(*date))
            .collect();

        let mut series = Vec::new();
        for spec in specs {
            match spec.reshape {
                Reshape::Direct => {
                    series.extend(spec.keys.iter().map(|key| Series {
                        name: key.clone(),
                        group: spec.name.clone(),
                        reshape: Reshape::Direct,
                        values: filtered
                            .rows
                            .iter()
                            .map(|(row, _)| row.number_or_zero(key))
                            .collect(),
                    }));
                }
                Reshape::Sum => series.push(Series {
                    name: spec.name.clone(),
                    group: spec.name.clone(),
                    reshape: Reshape::Sum,
                    values: filtered
                        .rows
                        .iter()
                        .map(|(row, _)| spec.keys.iter().map(|key| row.number_or_zero(key)).sum())
                        .collect(),
                }),
            }
        }

        if filtered.skipped > 0 {
            log::debug!("{} rows without a usable timestamp were skipped", filtered.skipped);
        }

        Extraction::new(ExtractionResult {
            labels,
            series,
            skipped: filtered.skipped,
        })
    }
}

#[cfg(test)]
mod test {
    use time::{macros::datetime, Duration};

    use super::*;
    use crate::label::IsoLabels;

    // 2024-07-07 00:00:00
    const JULY_7_2024: f64 = 45480.0;

    fn at(hour: u32, minute: u32, second: u32) -> f64 {
        JULY_7_2024 + (hour * 3600 + minute * 60 + second) as f64 / 86400.0
    }

    fn sample(serial: f64) -> Row {
        Row::new().with(DEFAULT_TIMESTAMP_COLUMN, Value::Number(serial))
    }

    fn extractor() -> SeriesExtractor<IsoLabels> {
        SeriesExtractor::new(SerialDecoder::utc()).with_labels(IsoLabels)
    }

    fn window() -> TimeWindow {
        TimeWindow::new(
            datetime!(2024-07-07 11:00:00 UTC),
            datetime!(2024-07-07 12:00:00 UTC),
        )
    }

    #[test]
    fn window_is_inclusive() {
        let rows = [
            sample(at(10, 59, 59)),
            sample(at(11, 0, 0)),
            sample(at(11, 30, 0)),
            sample(at(12, 0, 0)),
            sample(at(12, 0, 1)),
        ];
        let filtered = extractor().filter(&rows, &window());
        let dates: Vec<_> = filtered.rows.iter().map(|(_, date)| *date).collect();
        assert_eq!(
            dates,
            [
                datetime!(2024-07-07 11:00:00 UTC),
                datetime!(2024-07-07 11:30:00 UTC),
                datetime!(2024-07-07 12:00:00 UTC),
            ]
        );
        assert_eq!(filtered.skipped, 0);

        let end = window().end;
        assert!(window().contains(end));
        assert!(!window().contains(end + Duration::SECOND));
    }

    #[test]
    fn input_order_is_preserved() {
        let rows = [
            sample(at(11, 45, 0)).with("a", Value::Number(1.0)),
            sample(at(11, 15, 0)).with("a", Value::Number(2.0)),
            sample(at(11, 30, 0)).with("a", Value::Number(3.0)),
        ];
        let result = extractor()
            .extract(&rows, &window(), &[SeriesSpec::column("a")])
            .into_result();
        assert_eq!(
            result.labels,
            ["2024-07-07 11:45:00", "2024-07-07 11:15:00", "2024-07-07 11:30:00"]
        );
        assert_eq!(result.series("a").unwrap().values, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_table_is_no_data() {
        let specs = [SeriesSpec::column("a"), SeriesSpec::sum("total", ["a", "b"])];
        let extraction = extractor().extract(&[], &window(), &specs);
        assert!(extraction.is_no_data());

        let result = extraction.result();
        assert!(result.labels.is_empty());
        assert_eq!(result.series.len(), 2);
        assert!(result.series.iter().all(|series| series.values.is_empty()));
    }

    #[test]
    fn inverted_window_matches_nothing() {
        let rows = [sample(at(11, 30, 0))];
        let inverted = TimeWindow::new(window().end, window().start);
        let extraction = extractor().extract(&rows, &inverted, &[SeriesSpec::column("a")]);
        assert!(extraction.is_no_data());
        assert_eq!(extraction.result().skipped, 0);
    }

    #[test]
    fn sum_treats_missing_terms_as_zero() {
        let rows = [
            sample(at(11, 0, 0))
                .with("a", Value::Number(3.0))
                .with("b", Value::Number(4.0)),
            sample(at(11, 5, 0)).with("a", Value::Number(5.0)),
        ];
        let result = extractor()
            .extract(&rows, &window(), &[SeriesSpec::sum("total", ["a", "b"])])
            .into_result();
        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].name, "total");
        assert_eq!(result.series[0].reshape, Reshape::Sum);
        assert_eq!(result.series[0].values, [7.0, 5.0]);
    }

    #[test]
    fn missing_columns_project_to_zero() {
        let rows = [
            sample(at(11, 0, 0)).with("a", Value::Number(1.5)),
            sample(at(11, 5, 0)).with("a", Value::Text(String::from("offline"))),
            sample(at(11, 10, 0)),
        ];
        let result = extractor()
            .extract(&rows, &window(), &[SeriesSpec::direct("unit", ["a", "b"])])
            .into_result();
        assert_eq!(result.series("a").unwrap().values, [1.5, 0.0, 0.0]);
        assert_eq!(result.series("b").unwrap().values, [0.0, 0.0, 0.0]);
        assert_eq!(result.series("b").unwrap().group, "unit");
    }

    #[test]
    fn invalid_rows_are_skipped_and_counted() {
        let rows = [
            sample(at(11, 0, 0)).with("a", Value::Number(1.0)),
            Row::new().with("a", Value::Number(2.0)),
            Row::new()
                .with(DEFAULT_TIMESTAMP_COLUMN, Value::Text(String::from("07/07/2024 11:02")))
                .with("a", Value::Number(3.0)),
            Row::new()
                .with(DEFAULT_TIMESTAMP_COLUMN, Value::Empty)
                .with("a", Value::Number(4.0)),
            sample(f64::NAN).with("a", Value::Number(5.0)),
            sample(at(11, 5, 0)).with("a", Value::Number(6.0)),
        ];
        let extraction = extractor().extract(&rows, &window(), &[SeriesSpec::column("a")]);
        assert!(!extraction.is_no_data());

        let result = extraction.into_result();
        assert_eq!(result.skipped, 4);
        assert_eq!(result.series("a").unwrap().values, [1.0, 6.0]);
    }

    #[test]
    fn timestamp_errors() {
        let extractor = extractor();
        assert_eq!(
            extractor.timestamp(&Row::new()),
            Err(InvalidRowError::MissingTimestamp(String::from("DATE & TIME")))
        );
        assert_eq!(
            extractor
                .timestamp(&Row::new().with("DATE & TIME", Value::Text(String::from("noon"))))
                .unwrap_err()
                .to_string(),
            "the timestamp column `DATE & TIME` holds the non-numeric value \"noon\""
        );
    }

    #[test]
    fn every_series_is_aligned_with_the_labels() {
        let rows: Vec<_> = (0..=120)
            .map(|minute| {
                let row = sample(at(10 + minute / 60, minute % 60, 0))
                    .with("a", Value::Number(minute as f64));
                if minute % 3 == 0 {
                    row.with("b", Value::Number(1.0))
                } else {
                    row
                }
            })
            .collect();
        let specs = [
            SeriesSpec::direct("unit", ["a", "b", "c"]),
            SeriesSpec::sum("total", ["a", "b"]),
        ];
        let result = extractor().extract(&rows, &window(), &specs).into_result();
        assert_eq!(result.len(), 61);
        assert_eq!(result.series.len(), 4);
        for series in &result.series {
            assert_eq!(series.values.len(), result.labels.len(), "{}", series.name);
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let rows: Vec<_> = (0..30)
            .map(|minute| {
                sample(at(11, minute * 2, 0))
                    .with("z", Value::Number(minute as f64))
                    .with("a", Value::Number(1.0))
            })
            .collect();
        let specs = [SeriesSpec::direct("unit", ["z", "a"]), SeriesSpec::sum("total", ["z", "a"])];
        let extractor = SeriesExtractor::new(SerialDecoder::utc());
        assert_eq!(
            extractor.extract(&rows, &window(), &specs),
            extractor.extract(&rows, &window(), &specs)
        );
    }

    #[test]
    fn custom_timestamp_column() {
        let rows = [Row::new()
            .with("when", Value::Number(at(11, 20, 0)))
            .with("a", Value::Number(1.0))];
        let extractor = extractor().with_timestamp_column("when");
        let result = extractor
            .extract(&rows, &window(), &[SeriesSpec::column("a")])
            .into_result();
        assert_eq!(result.labels, ["2024-07-07 11:20:00"]);
    }
}
