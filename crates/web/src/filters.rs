//! Custom Askama template filters and display helpers.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, Utc};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(Utc::now().year())
}

/// Format a timestamp the way the request forms display it: `dd/mm/yyyy hh:mm`.
///
/// Used by the view structs rather than inside templates so Option handling
/// stays out of the markup.
#[must_use]
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

/// Format a date-only value for queue rows: `dd/mm/yyyy`.
#[must_use]
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn datetime_formats_with_padding() {
        let when = Utc.with_ymd_and_hms(2025, 1, 3, 7, 5, 0).unwrap();
        assert_eq!(format_datetime(&when), "03/01/2025 07:05");
        assert_eq!(format_date(&when), "03/01/2025");
    }
}
