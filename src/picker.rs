use egui::{Color32, RichText, Ui};
use series::TimeWindow;
use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime, UtcOffset};

#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error("Invalid start date-time: {0}")]
    Start(time::error::Parse),
    #[error("Invalid end date-time: {0}")]
    End(time::error::Parse),
}

fn parse(text: &str, offset: UtcOffset) -> Result<OffsetDateTime, time::error::Parse> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    Ok(PrimitiveDateTime::parse(text.trim(), format)?.assume_offset(offset))
}

fn format(date: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    date.format(format).unwrap_or_else(|_| date.to_string())
}

/// Read a window typed as two `YYYY-MM-DD HH:MM:SS` dates in `offset`.
pub fn parse_window(start: &str, end: &str, offset: UtcOffset) -> Result<TimeWindow, PickerError> {
    Ok(TimeWindow::new(
        parse(start, offset).map_err(PickerError::Start)?,
        parse(end, offset).map_err(PickerError::End)?,
    ))
}

/// Start and end date-time fields of a chart.
///
/// What the user types is kept apart from the window so a half typed date
/// doesn't wipe the chart.
#[derive(Debug, Clone)]
pub struct WindowPicker {
    start: String,
    end: String,
    error: Option<String>,
}

impl WindowPicker {
    pub fn new(window: &TimeWindow) -> Self {
        Self {
            start: format(window.start),
            end: format(window.end),
            error: None,
        }
    }

    /// Returns `true` when `window` was replaced.
    pub fn ui(&mut self, window: &mut TimeWindow, ui: &mut Ui) -> bool {
        let mut edited = false;
        ui.horizontal(|ui| {
            ui.label("Start Date-Time:");
            edited |= ui.text_edit_singleline(&mut self.start).lost_focus();
            ui.label("End Date-Time:");
            edited |= ui.text_edit_singleline(&mut self.end).lost_focus();
        });
        if let Some(error) = &self.error {
            ui.label(RichText::new(error).color(Color32::RED));
        }
        edited && self.apply(window)
    }

    fn apply(&mut self, window: &mut TimeWindow) -> bool {
        match parse_window(&self.start, &self.end, window.start.offset()) {
            Ok(parsed) => {
                self.error = None;
                let changed = parsed != *window;
                *window = parsed;
                changed
            }
            Err(e) => {
                log::debug!("{e}");
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::{datetime, offset};

    use super::*;

    #[test]
    fn parse_windows() {
        let window = parse_window("2024-07-07 11:00:00", " 2024-07-07 12:30:15 ", offset!(+2)).unwrap();
        assert_eq!(window.start, datetime!(2024-07-07 11:00:00 +2));
        assert_eq!(window.end, datetime!(2024-07-07 12:30:15 +2));
    }

    #[test]
    fn reject_malformed_dates() {
        assert!(matches!(
            parse_window("July 7 2024", "2024-07-07 12:00:00", UtcOffset::UTC),
            Err(PickerError::Start(_))
        ));
        assert!(matches!(
            parse_window("2024-07-07 11:00:00", "2024-07-07 25:00:00", UtcOffset::UTC),
            Err(PickerError::End(_))
        ));
    }

    #[test]
    fn apply_keeps_the_previous_window_on_error() {
        let mut window = TimeWindow::new(
            datetime!(2024-07-07 11:00:00 UTC),
            datetime!(2024-07-07 12:00:00 UTC),
        );
        let mut picker = WindowPicker::new(&window);
        assert_eq!(picker.start, "2024-07-07 11:00:00");
        assert!(!picker.apply(&mut window));

        picker.end = String::from("tomorrow");
        assert!(!picker.apply(&mut window));
        assert!(picker.error.is_some());
        assert_eq!(window.end, datetime!(2024-07-07 12:00:00 UTC));

        picker.end = String::from("2024-07-07 13:00:00");
        assert!(picker.apply(&mut window));
        assert!(picker.error.is_none());
        assert_eq!(window.end, datetime!(2024-07-07 13:00:00 UTC));
    }
}
