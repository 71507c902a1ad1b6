use std::collections::BTreeMap;
use std::sync::Arc;

use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;
use tokio::sync::RwLock;

use crate::error::StorageError;

/// Flat key/value document store.
///
/// `S3` is the production backend. `Memory` keeps everything in a shared map
/// and backs the tests and local runs; clones share the same map.
#[derive(Clone)]
pub enum ObjectStore {
    S3 { client: Client, bucket: String },
    Memory(Arc<RwLock<BTreeMap<String, Vec<u8>>>>),
}

impl ObjectStore {
    pub fn s3(client: Client, bucket: impl Into<String>) -> Self {
        ObjectStore::S3 {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn in_memory() -> Self {
        ObjectStore::Memory(Arc::default())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            ObjectStore::S3 { .. } => "s3",
            ObjectStore::Memory(_) => "memory",
        }
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            ObjectStore::S3 { client, bucket } => get_object(client, bucket, key).await,
            ObjectStore::Memory(map) => {
                map.read()
                    .await
                    .get(key)
                    .cloned()
                    .ok_or_else(|| StorageError::NotFound {
                        key: key.to_string(),
                    })
            }
        }
    }

    /// Like [`get`](Self::get), but a missing key is `Ok(None)`.
    pub async fn get_optional(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match self.get(key).await {
            Ok(body) => Ok(Some(body)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        match self {
            ObjectStore::S3 { client, bucket } => {
                put_object(client, bucket, key, body, content_type).await
            }
            ObjectStore::Memory(map) => {
                map.write().await.insert(key.to_string(), body);
                Ok(())
            }
        }
    }

    /// Deleting a missing key is not an error.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self {
            ObjectStore::S3 { client, bucket } => delete_object(client, bucket, key).await,
            ObjectStore::Memory(map) => {
                map.write().await.remove(key);
                Ok(())
            }
        }
    }

    /// Keys under `prefix`, in lexicographic order.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        match self {
            ObjectStore::S3 { client, bucket } => list_objects(client, bucket, prefix).await,
            ObjectStore::Memory(map) => Ok(map
                .read()
                .await
                .range(prefix.to_string()..)
                .take_while(|(key, _)| key.starts_with(prefix))
                .map(|(key, _)| key.clone())
                .collect()),
        }
    }

    /// Delete every object under `prefix`. Returns the number removed.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let keys = self.list(prefix).await?;
        for key in &keys {
            self.delete(key).await?;
        }
        Ok(keys.len())
    }
}

async fn get_object(client: &Client, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::GetObject(err.to_string())
            }
        })?;

    let body = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?
        .into_bytes()
        .to_vec();

    Ok(body)
}

async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
) -> Result<(), StorageError> {
    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body));

    if let Some(ct) = content_type {
        req = req.content_type(ct);
    }

    req.send()
        .await
        .map_err(|e| StorageError::PutObject(e.into_service_error().to_string()))?;

    Ok(())
}

async fn delete_object(client: &Client, bucket: &str, key: &str) -> Result<(), StorageError> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| StorageError::DeleteObject(e.into_service_error().to_string()))?;

    Ok(())
}

async fn list_objects(
    client: &Client,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<String>, StorageError> {
    let mut keys = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let mut req = client.list_objects_v2().bucket(bucket).prefix(prefix);

        if let Some(token) = &continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                keys.push(key.to_string());
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(|s| s.to_string());
        } else {
            break;
        }
    }

    Ok(keys)
}
