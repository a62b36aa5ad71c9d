//! Spreadsheet serial dates.
//!
//! A serial date counts the days elapsed since 1899-12-30, the fractional part
//! being the fraction of the day elapsed.

use time::{Duration, OffsetDateTime, Time, UtcOffset};

use crate::error::InvalidRowError;

/// Serial date of 1970-01-01.
pub const UNIX_EPOCH_SERIAL: f64 = 25569.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// Added to the fraction of the day before truncating to whole seconds, so
/// that `12:00:00` stored as `0.49999999999` doesn't become `11:59:59`.
const ROUNDING_EPSILON: f64 = 1e-7;

/// Turns serial dates into calendar timestamps.
///
/// The calendar day is the one of the serial's midnight *as seen from
/// `offset`*, then the time of day is written over it. With a negative offset
/// this lands on the previous day; that is how the exports were always read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialDecoder {
    offset: UtcOffset,
}

impl Default for SerialDecoder {
    fn default() -> Self {
        Self::local()
    }
}

impl SerialDecoder {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(UtcOffset::UTC)
    }

    /// Uses the offset of the machine running the dashboard.
    ///
    /// Some platforms refuse to tell the local offset once several threads are
    /// running, in which case we fall back to UTC.
    ///
    /// The offset is the one in effect *now* and is applied to every date. In a
    /// zone with daylight saving, dates on the other side of the switch are
    /// read with the current offset rather than their own, which can move
    /// serials near midnight to another calendar day (e.g. `Atlantic/Azores`,
    /// `-1` in winter and `+0` in summer).
    pub fn local() -> Self {
        match UtcOffset::current_local_offset() {
            Ok(offset) => Self::new(offset),
            Err(e) => {
                log::warn!("Could not determine the local offset ({e}), decoding dates as UTC");
                Self::utc()
            }
        }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn decode(&self, serial: f64) -> Result<OffsetDateTime, InvalidRowError> {
        if !serial.is_finite() {
            return Err(InvalidRowError::NonFinite(serial));
        }
        let out_of_range = || InvalidRowError::OutOfRange(serial);

        let whole_days = (serial - UNIX_EPOCH_SERIAL).floor();
        if whole_days.abs() > (i64::MAX / SECONDS_PER_DAY) as f64 {
            return Err(out_of_range());
        }
        // Same instant, seen from `offset`.
        let base = OffsetDateTime::from_unix_timestamp(whole_days as i64 * SECONDS_PER_DAY)
            .map_err(|_| out_of_range())?
            .checked_add(Duration::seconds(self.offset.whole_seconds() as i64))
            .ok_or_else(out_of_range)?
            .replace_offset(self.offset);

        let fractional_day = serial - serial.floor() + ROUNDING_EPSILON;
        let total_seconds = (SECONDS_PER_DAY as f64 * fractional_day).floor() as i64;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds - hours * 3600) / 60;
        let seconds = total_seconds % 60;

        // `hours` reaches 24 when the fraction is a hair below a full day,
        // which rolls over to the next midnight.
        let time_of_day =
            Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds);
        base.replace_time(Time::MIDNIGHT)
            .checked_add(time_of_day)
            .ok_or_else(out_of_range)
    }
}

#[cfg(test)]
mod test {
    use time::macros::{datetime, offset};

    use super::*;

    // 2024-07-07 00:00:00
    const JULY_7_2024: f64 = 45480.0;

    #[test]
    fn noon_is_not_rounded_down() {
        let date = SerialDecoder::utc().decode(JULY_7_2024 + 0.5).unwrap();
        assert_eq!(date, datetime!(2024-07-07 12:00:00 UTC));
        assert_eq!((date.hour(), date.minute(), date.second()), (12, 0, 0));
    }

    #[test]
    fn every_second_of_a_day() {
        let decoder = SerialDecoder::utc();
        for second in 0..SECONDS_PER_DAY {
            let serial = JULY_7_2024 + second as f64 / SECONDS_PER_DAY as f64;
            let date = decoder.decode(serial).unwrap();
            assert_eq!(
                date,
                datetime!(2024-07-07 00:00:00 UTC) + Duration::seconds(second),
                "error on {serial}"
            );
        }
    }

    #[test]
    fn seconds_of_day_follow_the_truncation_rule() {
        let decoder = SerialDecoder::utc();
        for serial in [1.0, 25569.25, 43831.123456, 45480.458333, 45480.999, 60000.7777777] {
            let fraction: f64 = serial - f64::floor(serial);
            let expected = (86400.0 * (fraction + 1e-7)).floor() as i64;
            let date = decoder.decode(serial).unwrap();
            let seconds_of_day = date.hour() as i64 * 3600 + date.minute() as i64 * 60 + date.second() as i64;
            assert_eq!(seconds_of_day, expected, "error on {serial}");
            assert_eq!(decoder.decode(serial).unwrap(), date);
        }
    }

    #[test]
    fn fraction_just_below_a_day_rolls_over() {
        let date = SerialDecoder::utc().decode(JULY_7_2024 + 0.99999999).unwrap();
        assert_eq!(date, datetime!(2024-07-08 00:00:00 UTC));
    }

    #[test]
    fn calendar_day_is_taken_in_the_decoder_offset() {
        let date = SerialDecoder::new(offset!(-5))
            .decode(JULY_7_2024 + 0.5)
            .unwrap();
        assert_eq!(date, datetime!(2024-07-06 12:00:00 -5));

        let date = SerialDecoder::new(offset!(+2))
            .decode(JULY_7_2024 + 0.5)
            .unwrap();
        assert_eq!(date, datetime!(2024-07-07 12:00:00 +2));
    }

    #[test]
    fn one_offset_for_every_date() {
        // A winter offset of -1 still reads a July serial with -1, not with
        // the +0 of summer, so the calendar day moves back.
        let winter = SerialDecoder::new(offset!(-1));
        assert_eq!(
            winter.decode(JULY_7_2024 + 0.5).unwrap(),
            datetime!(2024-07-06 12:00:00 -1)
        );
        assert_eq!(
            SerialDecoder::utc().decode(JULY_7_2024 + 0.5).unwrap(),
            datetime!(2024-07-07 12:00:00 UTC)
        );
    }

    #[test]
    fn local_decoder_uses_the_current_offset() {
        let expected = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        assert_eq!(SerialDecoder::local().offset(), expected);
    }

    #[test]
    fn before_the_unix_epoch() {
        let decoder = SerialDecoder::utc();
        assert_eq!(decoder.decode(0.0).unwrap(), datetime!(1899-12-30 00:00:00 UTC));
        assert_eq!(decoder.decode(-1.25).unwrap(), datetime!(1899-12-28 18:00:00 UTC));
    }

    #[test]
    fn reject_unusable_serials() {
        let decoder = SerialDecoder::utc();
        assert_eq!(
            decoder.decode(f64::NAN).unwrap_err().to_string(),
            "NaN is not a finite serial date"
        );
        assert!(matches!(
            decoder.decode(f64::INFINITY),
            Err(InvalidRowError::NonFinite(_))
        ));
        assert_eq!(
            decoder.decode(1e15),
            Err(InvalidRowError::OutOfRange(1e15))
        );
        assert_eq!(
            decoder.decode(-1e300),
            Err(InvalidRowError::OutOfRange(-1e300))
        );
    }
}
