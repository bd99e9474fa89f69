//! Temporal normalization of CRM payloads.
//!
//! Every data-returning operation passes its result through [`normalize`]
//! before serialization, so timestamps and timezone descriptors always leave
//! the server as plain strings.

use crate::models::value::{iso_timestamp, local_zone_label, CrmValue};

/// Recursively replace temporal scalars with their canonical string form.
///
/// - mappings and sequences are rebuilt with every element normalized,
///   keys and ordering untouched
/// - `Timestamp` becomes its ISO-8601 string
/// - `LocalZone` becomes `UTC±HH:MM` for the offset in effect at call time,
///   not the offset at the instant the value originally described
/// - every other scalar is returned as-is
///
/// Strings are never re-parsed, so applying this twice equals applying it once.
pub fn normalize(value: CrmValue) -> CrmValue {
    match value {
        CrmValue::Map(map) => {
            CrmValue::Map(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
        }
        CrmValue::List(items) => CrmValue::List(items.into_iter().map(normalize).collect()),
        CrmValue::Timestamp(ts) => CrmValue::String(iso_timestamp(&ts)),
        CrmValue::LocalZone => CrmValue::String(local_zone_label()),
        other => other,
    }
}

/// True if no temporal scalar remains anywhere in the tree.
pub fn is_normalized(value: &CrmValue) -> bool {
    match value {
        CrmValue::Map(map) => map.values().all(is_normalized),
        CrmValue::List(items) => items.iter().all(is_normalized),
        scalar => !scalar.is_temporal(),
    }
}
