//! Timestamp parsing for persisted logs and rollback requests.
//!
//! Logs written by this crate use RFC 3339. Capture-side logs use the
//! compact `yyyy_MM_dd_HH_mm_ss` form, and operator requests use
//! `dd/MM/yyyy HH:mm:ss` (date and time may be split by a newline).
//! Naive forms are interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

const CAPTURE_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";
const ISO_SPACE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const REQUEST_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Parse any of the accepted timestamp forms.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let flattened = raw.replace('\n', " ");
    [CAPTURE_FORMAT, ISO_SPACE_FORMAT, REQUEST_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&flattened, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format in the compact capture form.
pub fn to_capture_format(ts: &DateTime<Utc>) -> String {
    ts.format(CAPTURE_FORMAT).to_string()
}

/// Serde adapter: writes RFC 3339, reads every accepted form.
pub mod flexible {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_capture_form() {
        let ts = parse_timestamp("2024_05_02_14_03_09").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 2, 14, 3, 9).unwrap());
        assert_eq!(to_capture_format(&ts), "2024_05_02_14_03_09");
    }

    #[test]
    fn parses_request_form_with_newline() {
        let ts = parse_timestamp("02/05/2024\n14:03:09").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 2, 14, 3, 9).unwrap());
    }

    #[test]
    fn parses_rfc3339_offset() {
        let ts = parse_timestamp("2024-05-02T16:03:09+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 2, 14, 3, 9).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
