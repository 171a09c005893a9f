// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document metadata records and the date formats they carry.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::Serialize;

/// A single metadata value. Dates that parse are kept typed; anything else is
/// passed through as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MetadataValue {
    Text(String),
    Date(DateTime<FixedOffset>),
}

impl MetadataValue {
    /// Interpret a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`).
    pub fn from_pdf_date(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match parse_pdf_date(&raw) {
            Some(date) => Self::Date(date),
            None => Self::Text(raw),
        }
    }

    /// Interpret a W3CDTF timestamp as used by OOXML core properties.
    pub fn from_w3c_date(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match parse_w3c_date(&raw) {
            Some(date) => Self::Date(date),
            None => Self::Text(raw),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S%:z")),
        }
    }
}

/// Ordered field list describing one document. Field order is part of the
/// record; absent fields are kept as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    fields: Vec<(&'static str, Option<MetadataValue>)>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: Option<MetadataValue>) {
        self.fields.push((name, value));
    }

    /// Value of the named field, `None` if absent or not part of the record.
    pub fn get(&self, name: &str) -> Option<&MetadataValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&MetadataValue>)> {
        self.fields.iter().map(|(name, value)| (*name, value.as_ref()))
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Parse a PDF date. Every component after the year is optional; a missing
/// offset means UTC.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("D:").unwrap_or(trimmed);
    let digit_count = body.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count < 4 {
        return None;
    }
    let (digits, rest) = body.split_at(digit_count);

    let field = |start: usize, len: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + len) {
            Some(part) => part.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;

    let offset_seconds = parse_pdf_offset(rest)?;
    let offset = FixedOffset::east_opt(offset_seconds)?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    offset.from_local_datetime(&naive).single()
}

/// `Z`, `+HH'mm'`, `-HH'mm`, `+HH`, or nothing.
fn parse_pdf_offset(rest: &str) -> Option<i32> {
    let mut chars = rest.chars();
    let sign = match chars.next() {
        None | Some('Z') | Some('z') => return Some(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };
    let digits: String = chars.filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..4) {
        Some(part) => part.parse().ok()?,
        None => 0,
    };
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Parse a W3CDTF timestamp (`2024-03-01T09:30:00Z`) or a bare date.
pub fn parse_w3c_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(date);
    }
    let naive = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    FixedOffset::east_opt(0)?.from_local_datetime(&naive).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pdf_date_with_offset() {
        let date = parse_pdf_date("D:20240301093000+02'00'").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T09:30:00+02:00");
    }

    #[test]
    fn short_pdf_dates_default_missing_parts() {
        let date = parse_pdf_date("D:2023").unwrap();
        assert_eq!(date.to_rfc3339(), "2023-01-01T00:00:00+00:00");

        let date = parse_pdf_date("20231224183000Z").unwrap();
        assert_eq!(date.to_rfc3339(), "2023-12-24T18:30:00+00:00");

        let date = parse_pdf_date("D:20231224183000-05'30").unwrap();
        assert_eq!(date.to_rfc3339(), "2023-12-24T18:30:00-05:30");
    }

    #[test]
    fn garbage_pdf_date_stays_text() {
        assert!(parse_pdf_date("yesterday").is_none());
        assert_eq!(
            MetadataValue::from_pdf_date("D:20241399"),
            MetadataValue::Text("D:20241399".into())
        );
    }

    #[test]
    fn w3c_dates() {
        let date = parse_w3c_date("2024-03-01T09:30:00Z").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T09:30:00+00:00");
        assert!(parse_w3c_date("2024-03-01").is_some());
        assert!(parse_w3c_date("March").is_none());
    }

    #[test]
    fn date_display() {
        let value = MetadataValue::from_w3c_date("2024-03-01T09:30:00Z");
        assert_eq!(value.to_string(), "2024-03-01 09:30:00+00:00");
    }

    #[test]
    fn record_keeps_order_and_absent_fields() {
        let mut record = MetadataRecord::new();
        record.push("Author", Some(MetadataValue::Text("Ada".into())));
        record.push("Title", None);

        assert_eq!(record.field_names(), vec!["Author", "Title"]);
        assert_eq!(record.get("Author"), Some(&MetadataValue::Text("Ada".into())));
        assert_eq!(record.get("Title"), None);
        assert_eq!(record.len(), 2);
    }
}
