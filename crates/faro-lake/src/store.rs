//! S3-compatible store construction shared by source and sink.

use object_store::aws::{AmazonS3, AmazonS3Builder};

use faro_config::StorageConfig;

use crate::LakeError;

/// Build a client for `bucket` from the storage section.
///
/// # Errors
///
/// Returns [`LakeError::NotConfigured`] when credentials or bucket are
/// missing, or the builder's own error for invalid values.
pub fn build_store(config: &StorageConfig, bucket: &str) -> Result<AmazonS3, LakeError> {
    if !config.is_configured() {
        return Err(LakeError::NotConfigured(
            "set storage.bucket, storage.access_key_id and storage.secret_access_key".into(),
        ));
    }

    let mut builder = AmazonS3Builder::new()
        .with_region(&config.region)
        .with_bucket_name(bucket)
        .with_access_key_id(&config.access_key_id)
        .with_secret_access_key(&config.secret_access_key);

    if !config.endpoint.is_empty() {
        // Custom endpoints (MinIO, localstack) are path-style and may be http.
        builder = builder
            .with_endpoint(&config.endpoint)
            .with_allow_http(true)
            .with_virtual_hosted_style_request(false);
    }

    Ok(builder.build()?)
}
