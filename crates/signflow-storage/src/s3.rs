use crate::keys::generate_object_key;
use crate::traits::{ArtifactStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use signflow_core::{ArtifactReference, StorageConnection};
use std::sync::Arc;

/// S3-compatible artifact store (AWS S3, MinIO, ...)
#[derive(Clone)]
pub struct S3ArtifactStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_url: String,
}

impl S3ArtifactStore {
    /// Create a new S3ArtifactStore from resolved connection settings
    ///
    /// Requests use path-style addressing (`{endpoint}/{bucket}/{key}`), which
    /// MinIO and most S3-compatible providers require.
    pub fn new(connection: &StorageConnection) -> StorageResult<Self> {
        let allow_http = connection.endpoint.starts_with("http://");
        let store = AmazonS3Builder::new()
            .with_endpoint(connection.endpoint.clone())
            .with_region(connection.region.clone())
            .with_bucket_name(connection.bucket.clone())
            .with_access_key_id(connection.access_key.clone())
            .with_secret_access_key(connection.secret_key.clone())
            .with_virtual_hosted_style_request(false)
            .with_allow_http(allow_http)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(
            Arc::new(store),
            connection.bucket.clone(),
            connection.public_url.clone(),
        ))
    }

    /// Wrap an already configured object store writing into `bucket`.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        public_url: String,
    ) -> Self {
        S3ArtifactStore {
            store,
            bucket,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public URL for an object: {public_url}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, self.bucket, key)
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn store(
        &self,
        data: Bytes,
        content_type: &str,
        extension: Option<&str>,
    ) -> StorageResult<ArtifactReference> {
        let key = generate_object_key(extension);
        let size = data.len() as u64;
        let location = Path::from(key.clone());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        self.store
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let url = self.generate_url(&key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(ArtifactReference {
            bucket: self.bucket.clone(),
            key,
            content_type: content_type.to_string(),
            url,
        })
    }
}
