use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages. Field lists and
/// config files are hand-edited, so "at JSON path" beats a byte offset.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> anyhow::Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(value) => Ok(value),
        Err(err) => {
            let path = err.path().to_string();
            Err(anyhow::anyhow!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}
