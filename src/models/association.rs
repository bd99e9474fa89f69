//! Association links from the CRM v4 associations API.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept an object ID sent either as a JSON number or a string.
fn deserialize_object_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "unexpected object id: {}",
            other
        ))),
    }
}

/// One link from the source object to a target object.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssociationLink {
    #[serde(default, deserialize_with = "deserialize_object_id")]
    pub to_object_id: String,
}

/// A single page of association links.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct AssociationPage {
    /// Missing in the response means no links.
    #[serde(default)]
    pub results: Vec<AssociationLink>,
}

impl AssociationPage {
    /// Target IDs in source order, duplicates kept.
    pub fn target_ids(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|link| link.to_object_id.clone())
            .collect()
    }
}
