use super::{object_key, Storage};
use crate::config::StorageConfig;
use crate::error::{SyncError, SyncResult};
use s3::{creds::Credentials, Bucket, Region};
use std::path::Path;
use tracing::info;

const DEFAULT_REGION: &str = "us-east-1";

pub struct S3Storage {
    pub bucket: Box<Bucket>,
    pub bucket_name: String,
}

#[async_trait::async_trait]
impl Storage for S3Storage {
    async fn upload(&self, file_path: &Path, folder: &str) -> SyncResult<String> {
        let s3_key = object_key(file_path, folder)?;

        let mut file = tokio::fs::File::open(file_path)
            .await
            .map_err(|e| SyncError::io("open dump file", file_path, e))?;

        // multipart upload; the dump is never held in memory as a whole
        let res = self
            .bucket
            .put_object_stream(&mut file, &s3_key)
            .await
            .map_err(|e| SyncError::Upload(format!("S3 upload failed: {}", e)))?;

        if (200..300).contains(&res.status_code()) {
            info!(
                "<upload_db_to_s3> uploaded dump to s3://{}/{}",
                self.bucket_name, s3_key
            );
            Ok(s3_key)
        } else {
            Err(SyncError::Upload(format!(
                "S3 upload failed with HTTP code: {}",
                res.status_code()
            )))
        }
    }
}

impl S3Storage {
    pub fn new(config: &StorageConfig) -> SyncResult<Self> {
        let region_name = config.region.as_deref().unwrap_or(DEFAULT_REGION);

        // S3-compatible services (MinIO, OSS, ...) are addressed by endpoint
        let custom_endpoint = config.endpoint.as_deref().filter(|e| !e.is_empty());
        let region = match custom_endpoint {
            Some(endpoint) => Region::Custom {
                region: region_name.to_string(),
                endpoint: endpoint.to_string(),
            },
            None => region_name.parse().map_err(|e| {
                SyncError::Config(format!("invalid S3 region {}: {}", region_name, e))
            })?,
        };

        let credentials = Credentials {
            access_key: Some(config.access_key.to_string()),
            secret_key: Some(config.secret_key.to_string()),
            security_token: None,
            session_token: None,
            expiration: None,
        };

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| SyncError::Upload(format!("create s3 bucket failed: {}", e)))?;
        let bucket = if custom_endpoint.is_some() {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(S3Storage {
            bucket,
            bucket_name: config.bucket.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StorageConfig {
        StorageConfig {
            access_key: "AKIDEXAMPLE".into(),
            secret_key: "secret".into(),
            bucket: "crm-backups".into(),
            folder: "vtiger".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_resolves_named_bucket() {
        let storage = S3Storage::new(&config()).unwrap();
        assert_eq!(storage.bucket_name, "crm-backups");
        assert_eq!(storage.bucket.name(), "crm-backups");
    }

    #[test]
    fn test_new_with_custom_endpoint() {
        let config = StorageConfig {
            endpoint: Some("http://127.0.0.1:9000".into()),
            ..config()
        };
        let storage = S3Storage::new(&config).unwrap();
        assert!(matches!(storage.bucket.region(), Region::Custom { .. }));
    }

    #[tokio::test]
    async fn test_upload_missing_dump_fails_before_request() {
        let storage = S3Storage::new(&config()).unwrap();
        let missing = Path::new("/nonexistent/vtiger60-backup-20240101-0300.sql");

        let result = storage.upload(missing, "vtiger").await;
        assert!(matches!(result, Err(SyncError::Io { .. })));
    }
}
