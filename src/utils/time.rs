use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Accepts the shapes the backend has been seen to return for stored dates:
/// plain `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps.
pub fn parse_server_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_server_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_stored_date_shape() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 9);
        assert_eq!(parse_server_date("2021-03-09"), expected);
        assert_eq!(parse_server_date("2021-03-09 00:00:00"), expected);
        assert_eq!(parse_server_date("2021-03-09T10:15:00+00:00"), expected);
        assert_eq!(parse_server_date("2021-03-09T10:15:00.000000Z"), expected);
        assert_eq!(parse_server_date(""), None);
        assert_eq!(parse_server_date("not a date"), None);
    }

    #[test]
    fn formats_as_iso_day() {
        let date = NaiveDate::from_ymd_opt(1999, 12, 1).unwrap();
        assert_eq!(format_date(date), "1999-12-01");
    }
}
