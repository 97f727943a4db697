//! Fixed-format timestamp strings used in backup manifests.
//!
//! The archive stores every date as `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`. The trailing
//! `Z` is a literal: values are written exactly as stored, with no timezone
//! conversion, so they are modelled as [`NaiveDateTime`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// chrono format string matching `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

/// Serde adapter for `#[serde(with = "shared::timestamp")]`
pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
