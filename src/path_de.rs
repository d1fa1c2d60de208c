use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_error)
}

/// Same as [`from_str_with_path`] for an already parsed subtree. `base` is
/// prepended to the reported path so errors point into the whole document.
pub fn from_value_with_path<T: DeserializeOwned>(value: serde_json::Value, base: &str) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| {
        let inner = err.path().to_string();
        let path = if inner == "." { base.to_string() } else { format!("{base}.{inner}") };
        Error::Json { path, message: err.into_inner().to_string() }
    })
}

fn into_error(err: serde_path_to_error::Error<serde_json::Error>) -> Error {
    let path = err.path().to_string();
    Error::Json { path, message: err.into_inner().to_string() }
}
