//! Decoding of JSON and YAML payload text into raw mappings ready for
//! construction. YAML is read into `serde_json::Value` first, so both
//! formats share one conversion into [`Value`].

use thiserror::Error;

use crate::value::{map_from_json, Map, Value};

/// Error while decoding payload text into a raw mapping.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The text is not valid YAML, or uses keys JSON cannot represent.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document decoded fine but its root is not a mapping.
    #[error("expected a mapping at the document root, found {found}")]
    NotAMapping {
        /// Kind of the root value.
        found: &'static str,
    },
}

/// Decode a JSON object into a raw mapping.
pub fn json_mapping(text: &str) -> Result<Map, DecodeError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    into_mapping(json)
}

/// Decode a YAML mapping into a raw mapping.
pub fn yaml_mapping(text: &str) -> Result<Map, DecodeError> {
    let json: serde_json::Value = serde_yaml::from_str(text)?;
    into_mapping(json)
}

fn into_mapping(json: serde_json::Value) -> Result<Map, DecodeError> {
    match json {
        serde_json::Value::Object(map) => Ok(map_from_json(map)),
        other => Err(DecodeError::NotAMapping {
            found: Value::from(other).kind(),
        }),
    }
}
