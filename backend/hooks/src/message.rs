//! The document shipped to the search index for each log entry.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::entry::LogEntry;

/// Field name reserved for an entry's error.
pub const ERROR_KEY: &str = "error";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogMessage {
    #[serde(rename = "Host")]
    pub host: String,
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Data")]
    pub data: Map<String, Value>,
    #[serde(rename = "Level")]
    pub level: String,
}

impl LogMessage {
    /// Build the document for `entry`. Error-typed fields, including the
    /// reserved `error` key, are rendered as their description.
    pub fn from_entry(entry: &LogEntry, host: &str) -> Self {
        let data = entry
            .data
            .iter()
            .map(|(key, field)| (key.clone(), field.to_json()))
            .collect();

        Self {
            host: host.to_string(),
            timestamp: rfc3339_nano(&entry.time),
            message: entry.message.clone(),
            data,
            level: entry.level.as_str().to_uppercase(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// UTC timestamp with up to nine fractional digits, trailing zeros dropped:
/// `2024-03-01T08:15:00.1234Z`.
pub fn rfc3339_nano(time: &DateTime<FixedOffset>) -> String {
    let utc = time.with_timezone(&Utc);
    let mut out = utc.format("%Y-%m-%dT%H:%M:%S").to_string();
    // Leap seconds are carried as nanos >= 1e9.
    let nanos = utc.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let digits = format!("{nanos:09}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out.push('Z');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use chrono::TimeZone;
    use serde_json::json;
    use std::io;

    fn at(offset_secs: i32, h: u32, nanos: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_secs)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, h, 15, 0)
            .unwrap()
            .with_nanosecond(nanos)
            .unwrap()
    }

    #[test]
    fn timestamp_is_converted_to_utc() {
        assert_eq!(rfc3339_nano(&at(8 * 3600, 16, 0)), "2024-03-01T08:15:00Z");
        assert_eq!(rfc3339_nano(&at(-5 * 3600, 3, 0)), "2024-03-01T08:15:00Z");
        assert_eq!(rfc3339_nano(&at(0, 8, 0)), "2024-03-01T08:15:00Z");
    }

    #[test]
    fn fractional_seconds_trim_trailing_zeros() {
        assert_eq!(rfc3339_nano(&at(0, 8, 123_400_000)), "2024-03-01T08:15:00.1234Z");
        assert_eq!(rfc3339_nano(&at(0, 8, 1)), "2024-03-01T08:15:00.000000001Z");
        assert_eq!(rfc3339_nano(&at(3600, 9, 500_000_000)), "2024-03-01T08:15:00.5Z");
    }

    #[test]
    fn reserved_error_field_becomes_text() {
        let entry = LogEntry::new(Severity::Error, "write failed")
            .with_error(io::Error::new(io::ErrorKind::NotFound, "config.yaml missing"));
        let msg = LogMessage::from_entry(&entry, "web-1");
        assert_eq!(msg.data[ERROR_KEY], json!("config.yaml missing"));
    }

    #[test]
    fn serialized_document_uses_wire_names() {
        let entry = LogEntry::new(Severity::Warning, "disk at 91%")
            .at(at(0, 8, 0))
            .with_field("mount", "/var")
            .with_field("pct", 91);
        let body = LogMessage::from_entry(&entry, "localhost").to_json().unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "Host": "localhost",
                "@timestamp": "2024-03-01T08:15:00Z",
                "Message": "disk at 91%",
                "Data": { "mount": "/var", "pct": 91 },
                "Level": "WARNING",
            })
        );
    }

    #[test]
    fn empty_data_serializes_as_object() {
        let entry = LogEntry::new(Severity::Info, "boot");
        let value: Value =
            serde_json::from_slice(&LogMessage::from_entry(&entry, "h").to_json().unwrap()).unwrap();
        assert_eq!(value["Data"], json!({}));
        assert_eq!(value["Level"], json!("INFO"));
    }
}
