use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let data = fs::read_to_string(file_path).map_err(Error::IoError)?;

    let parsed_data: T = serde_json::from_str(&data).map_err(Error::DeserializationError)?;

    Ok(parsed_data)
}

/// Like [`parse_json_file`], but a missing file yields `T::default()`.
pub fn parse_json_file_or_default<T: DeserializeOwned + Default>(file_path: &Path) -> Result<T> {
    match fs::read_to_string(file_path) {
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(Error::IoError(e)),
    }
}

/// Writes `value` as pretty JSON, replacing the file atomically via a sibling temp file.
pub fn write_json_file<T: Serialize>(file_path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_string_pretty(value)?;
    let tmp_path = file_path.with_extension("json.tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, file_path)?;

    Ok(())
}
