use time::{macros::format_description, OffsetDateTime};

/// Turns the timestamp of a retained row into the label shown on the category axis.
pub trait LabelFormat {
    fn label(&self, date: OffsetDateTime) -> String;
}

impl<F> LabelFormat for F
where
    F: Fn(OffsetDateTime) -> String,
{
    fn label(&self, date: OffsetDateTime) -> String {
        self(date)
    }
}

/// `7/7/2024, 11:05:00 AM`, the way an `en-US` browser prints a date.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LocaleLabels;

impl LabelFormat for LocaleLabels {
    fn label(&self, date: OffsetDateTime) -> String {
        let format = format_description!(
            "[month padding:none]/[day padding:none]/[year], [hour repr:12 padding:none]:[minute]:[second] [period]"
        );
        date.format(format).unwrap_or_else(|_| date.to_string())
    }
}

/// `2024-07-07 11:05:00`, sortable and unambiguous.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IsoLabels;

impl LabelFormat for IsoLabels {
    fn label(&self, date: OffsetDateTime) -> String {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        date.format(format).unwrap_or_else(|_| date.to_string())
    }
}
