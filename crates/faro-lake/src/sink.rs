//! Persistence of generated documents and fatal records.

use object_store::path::Path;
use object_store::{ObjectStore, PutPayload, aws::AmazonS3};
use tracing::info;

use faro_config::StorageConfig;

use crate::store::build_store;
use crate::LakeError;

/// Where generated documents land. Writes are full overwrites; key
/// derivation decides whether reruns replace or accumulate.
pub trait InsightSink: Send + Sync {
    fn write(&self, key: &str, body: &[u8]) -> impl Future<Output = Result<(), LakeError>> + Send;
}

/// [`InsightSink`] over an S3-compatible bucket (the configured output
/// bucket, falling back to the input bucket).
pub struct S3InsightSink {
    store: AmazonS3,
}

impl S3InsightSink {
    /// # Errors
    ///
    /// Returns [`LakeError::NotConfigured`] when the storage section is
    /// incomplete.
    pub fn new(config: &StorageConfig) -> Result<Self, LakeError> {
        Ok(Self {
            store: build_store(config, config.output_bucket())?,
        })
    }
}

impl InsightSink for S3InsightSink {
    async fn write(&self, key: &str, body: &[u8]) -> Result<(), LakeError> {
        let path = Path::from(key);
        self.store
            .put(&path, PutPayload::from(body.to_vec()))
            .await?;
        info!(key, bytes = body.len(), "document persisted");
        Ok(())
    }
}
