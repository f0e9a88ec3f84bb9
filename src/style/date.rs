//! Serial dates: days since the workbook epoch, with the time of day as the
//! fractional part.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Serials below this still count from 1899-12-31; from here on the phantom
/// 1900-02-29 has been passed and the epoch moves back one day.
const FIRST_SERIAL_AFTER_LEAP_BUG: f64 = 61.0;

/// Rendering used for every date cell.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts a serial date to a calendar date-time, rounding to the nearest
/// millisecond. Negative and non-finite serials are not dates.
pub fn serial_to_datetime(serial: f64, date1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let whole_days = serial.floor();
    let millis = ((serial - whole_days) * MILLIS_PER_DAY).round();

    let epoch = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else if whole_days < FIRST_SERIAL_AFTER_LEAP_BUG {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };

    // Both values are whole numbers bounded well inside i64 by the checks above
    // and by chrono's own range checks below.
    let days = TimeDelta::try_days(whole_days as i64)?;
    let time = TimeDelta::try_milliseconds(millis as i64)?;
    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(days)?
        .checked_add_signed(time)
}

/// Renders a serial date as `YYYY-MM-DD HH:MM:SS`.
pub fn format_serial(serial: f64, date1904: bool) -> Option<String> {
    serial_to_datetime(serial, date1904).map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
}
