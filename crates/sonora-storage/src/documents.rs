use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;
use crate::objects::ObjectStore;

const JSON: &str = "application/json";

/// Load and deserialize a JSON document.
pub async fn load<T: DeserializeOwned>(store: &ObjectStore, key: &str) -> Result<T, StorageError> {
    let body = store.get(key).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Serialize and store a JSON document, replacing any previous version.
pub async fn save<T: Serialize>(
    store: &ObjectStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put(key, body, Some(JSON)).await
}

/// Load every document under `prefix`, skipping keys rejected by `keep`.
pub async fn load_all<T: DeserializeOwned>(
    store: &ObjectStore,
    prefix: &str,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<T>, StorageError> {
    let mut values = Vec::new();
    for key in store.list(prefix).await? {
        if keep(&key) {
            values.push(load(store, &key).await?);
        }
    }
    Ok(values)
}
