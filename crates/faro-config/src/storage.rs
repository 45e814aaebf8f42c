//! Object-storage configuration (S3-compatible).

use serde::{Deserialize, Serialize};

/// Default region.
fn default_region() -> String {
    String::from("us-east-1")
}

/// Default input bucket (silver layer).
fn default_bucket() -> String {
    String::from("eess-silver-layer")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Region for the object store.
    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket holding raw conversation records.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Bucket for generated insights and fatal records. Empty means: reuse
    /// the input bucket.
    #[serde(default)]
    pub output_bucket: String,

    /// Custom endpoint URL (MinIO, localstack). Empty uses the AWS default.
    #[serde(default)]
    pub endpoint: String,

    /// Access key ID.
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key.
    #[serde(default)]
    pub secret_access_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            bucket: default_bucket(),
            output_bucket: String::new(),
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
        }
    }
}

impl StorageConfig {
    /// Check if the storage config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.bucket.is_empty()
            && !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
    }

    /// The bucket generated documents are written to.
    #[must_use]
    pub fn output_bucket(&self) -> &str {
        if self.output_bucket.is_empty() {
            &self.bucket
        } else {
            &self.output_bucket
        }
    }
}
