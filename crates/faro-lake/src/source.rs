//! Raw record loading from object storage.
//!
//! Records live as NDJSON objects (`.jsonl` / `.ndjson`) under a per-source
//! prefix. Loading is all-or-nothing: a listing failure, download failure, or
//! undecodable line fails the whole source rather than silently dropping
//! data.

use futures::TryStreamExt;
use object_store::path::Path;
use object_store::{ObjectStore, aws::AmazonS3};
use tracing::debug;

use faro_config::StorageConfig;
use faro_core::Record;

use crate::store::build_store;
use crate::LakeError;

/// Where raw interaction records come from.
pub trait RecordSource: Send + Sync {
    /// List every record object under `prefix` and decode all of them.
    fn list_and_load(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<Record>, LakeError>> + Send;
}

/// [`RecordSource`] over an S3-compatible bucket.
pub struct S3RecordSource {
    store: AmazonS3,
}

impl S3RecordSource {
    /// # Errors
    ///
    /// Returns [`LakeError::NotConfigured`] when the storage section is
    /// incomplete.
    pub fn new(config: &StorageConfig) -> Result<Self, LakeError> {
        Ok(Self {
            store: build_store(config, &config.bucket)?,
        })
    }
}

impl RecordSource for S3RecordSource {
    async fn list_and_load(&self, prefix: &str) -> Result<Vec<Record>, LakeError> {
        let prefix = Path::from(prefix.trim_end_matches('/'));
        let mut objects: Vec<_> = self
            .store
            .list(Some(&prefix))
            .try_filter(|meta| futures::future::ready(is_record_object(meta.location.as_ref())))
            .try_collect()
            .await?;
        // Listing order is backend-dependent.
        objects.sort_by(|a, b| a.location.cmp(&b.location));

        let mut records = Vec::new();
        for meta in objects {
            let bytes = self.store.get(&meta.location).await?.bytes().await?;
            let decoded = decode_records(meta.location.as_ref(), &bytes)?;
            debug!(key = %meta.location, count = decoded.len(), "loaded record object");
            records.extend(decoded);
        }
        Ok(records)
    }
}

fn is_record_object(key: &str) -> bool {
    key.ends_with(".jsonl") || key.ends_with(".ndjson")
}

/// Decode one NDJSON object body. Blank lines are skipped; anything else
/// must be a valid record.
fn decode_records(key: &str, bytes: &[u8]) -> Result<Vec<Record>, LakeError> {
    let text = String::from_utf8_lossy(bytes);
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str::<Record>(line).map_err(|error| {
            LakeError::InvalidRecord {
                key: key.to_string(),
                line: index + 1,
                reason: error.to_string(),
            }
        })?;
        records.push(record);
    }
    Ok(records)
}
