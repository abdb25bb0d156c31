// Calendar-date handling for chart query windows
use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date or date-time string and keep only the calendar date as written.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, ApiError> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Ok(date_time.naive_local().date());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|date_time| date_time.date())
        .ok_or_else(|| ApiError::InvalidDate(input.to_string()))
}

/// Canonical wire form: the date at midnight, `YYYY-MM-DDT00:00:00`.
pub fn format_midnight(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00").to_string()
}

pub fn normalize_to_midnight(input: &str) -> Result<String, ApiError> {
    parse_calendar_date(input).map(format_midnight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_is_discarded() {
        assert_eq!(
            normalize_to_midnight("2020-06-13T15:00:00").unwrap(),
            "2020-06-13T00:00:00"
        );
        assert_eq!(
            normalize_to_midnight("2020-06-13 23:59:59.999").unwrap(),
            "2020-06-13T00:00:00"
        );
        assert_eq!(normalize_to_midnight("2020-06-13").unwrap(), "2020-06-13T00:00:00");
        assert_eq!(
            normalize_to_midnight("2020-06-13T08:30").unwrap(),
            "2020-06-13T00:00:00"
        );
    }

    #[test]
    fn test_offset_keeps_written_date() {
        assert_eq!(
            normalize_to_midnight("2020-06-13T23:30:00+08:00").unwrap(),
            "2020-06-13T00:00:00"
        );
    }

    #[test]
    fn test_round_trip_any_hour() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        for hour in 0..24 {
            let input = format!("2024-02-29T{:02}:17:05", hour);
            let normalized = normalize_to_midnight(&input).unwrap();
            assert_eq!(parse_calendar_date(&normalized).unwrap(), date);
        }
    }

    #[test]
    fn test_invalid_dates() {
        for input in ["", "yesterday", "2020-13-01", "2021-02-29", "13/06/2020"] {
            assert_eq!(
                parse_calendar_date(input),
                Err(ApiError::InvalidDate(input.to_string()))
            );
        }
    }
}
