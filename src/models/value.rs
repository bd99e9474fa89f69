//! Dynamic value tree for CRM payloads.
//!
//! `CrmValue` mirrors JSON but keeps two temporal scalars typed until the
//! normalizer turns them into strings: absolute timestamps and the "local
//! timezone" descriptor.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use indexmap::IndexMap;

/// A nested CRM value: mapping, sequence, or scalar.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CrmValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// An absolute instant with its original offset.
    Timestamp(DateTime<FixedOffset>),
    /// The system's local timezone, as opposed to a fixed offset.
    ///
    /// No HubSpot payload decodes to this variant; it exists for callers that
    /// build values carrying a local-zone descriptor, which the normalizer
    /// renders as `UTC±HH:MM`.
    LocalZone,
    List(Vec<CrmValue>),
    /// Keys keep their insertion (source) order.
    Map(IndexMap<String, CrmValue>),
}

impl CrmValue {
    /// Build a mapping from key/value pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CrmValue)>,
    {
        CrmValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Empty mapping.
    pub fn empty_map() -> Self {
        CrmValue::Map(IndexMap::new())
    }

    /// Copy an optional borrowed JSON value, `Null` when absent.
    pub fn from_json(value: Option<&Value>) -> Self {
        value.cloned().map(CrmValue::from).unwrap_or_default()
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&CrmValue> {
        match self {
            CrmValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CrmValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[CrmValue]> {
        match self {
            CrmValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CrmValue::Null)
    }

    /// True for the scalars the normalizer rewrites.
    pub fn is_temporal(&self) -> bool {
        matches!(self, CrmValue::Timestamp(_) | CrmValue::LocalZone)
    }
}

/// ISO-8601 form of a timestamp, keeping its original offset.
pub fn iso_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Render an offset in seconds east of UTC as `UTC±HH:MM`.
pub fn format_utc_offset(seconds_east: i32) -> String {
    let sign = if seconds_east < 0 { '-' } else { '+' };
    let abs = seconds_east.unsigned_abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

/// Label for the local timezone using the offset in effect right now.
pub fn local_zone_label() -> String {
    format_utc_offset(chrono::Local::now().offset().local_minus_utc())
}

impl From<Value> for CrmValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CrmValue::Null,
            Value::Bool(b) => CrmValue::Bool(b),
            Value::Number(n) => CrmValue::Number(n),
            Value::String(s) => CrmValue::String(s),
            Value::Array(items) => CrmValue::List(items.into_iter().map(CrmValue::from).collect()),
            Value::Object(map) => {
                CrmValue::Map(map.into_iter().map(|(k, v)| (k, CrmValue::from(v))).collect())
            }
        }
    }
}

impl From<String> for CrmValue {
    fn from(s: String) -> Self {
        CrmValue::String(s)
    }
}

impl From<&str> for CrmValue {
    fn from(s: &str) -> Self {
        CrmValue::String(s.to_string())
    }
}

impl From<bool> for CrmValue {
    fn from(b: bool) -> Self {
        CrmValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for CrmValue {
    fn from(ts: DateTime<Utc>) -> Self {
        CrmValue::Timestamp(ts.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for CrmValue {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        CrmValue::Timestamp(ts)
    }
}

impl<T: Into<CrmValue>> From<Option<T>> for CrmValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<T: Into<CrmValue>> From<Vec<T>> for CrmValue {
    fn from(items: Vec<T>) -> Self {
        CrmValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl Serialize for CrmValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CrmValue::Null => serializer.serialize_unit(),
            CrmValue::Bool(b) => serializer.serialize_bool(*b),
            CrmValue::Number(n) => n.serialize(serializer),
            CrmValue::String(s) => serializer.serialize_str(s),
            CrmValue::Timestamp(ts) => serializer.serialize_str(&iso_timestamp(ts)),
            CrmValue::LocalZone => serializer.serialize_str(&local_zone_label()),
            CrmValue::List(items) => items.serialize(serializer),
            CrmValue::Map(map) => serializer.collect_map(map),
        }
    }
}
