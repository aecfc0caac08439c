use thiserror::Error;

use crate::models::{Catalog, REQUIRED_SECTIONS};

/// Why a snapshot could not be imported.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot is not valid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Snapshot is not a JSON object")]
    NotAnObject,

    #[error("Snapshot is missing the '{0}' section")]
    MissingSection(&'static str),
}

/// Parses a serialized catalog, requiring every top-level section.
pub fn parse_snapshot(json: &str) -> Result<Catalog, SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let object = value.as_object().ok_or(SnapshotError::NotAnObject)?;

    for section in REQUIRED_SECTIONS {
        match object.get(section) {
            None | Some(serde_json::Value::Null) => {
                return Err(SnapshotError::MissingSection(section))
            }
            Some(_) => {}
        }
    }

    Ok(serde_json::from_value(value)?)
}
