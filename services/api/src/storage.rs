//! Audio blob storage backed by S3
//!
//! Uploaded exercise audio lives in a public bucket; the database only
//! stores the returned URL and object key.

use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use std::env;
use tracing::info;

/// S3-backed audio storage
#[derive(Clone)]
pub struct AudioStorage {
    client: Client,
    bucket_name: String,
    public_base_url: String,
}

impl AudioStorage {
    /// Initialize the storage client from the ambient AWS configuration
    ///
    /// # Environment Variables
    /// - `AUDIO_BUCKET_NAME`: bucket holding exercise audio
    /// - `AUDIO_PUBLIC_URL`: base URL the bucket is served from (defaults to
    ///   the standard S3 URL for the bucket)
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let bucket_name =
            env::var("AUDIO_BUCKET_NAME").unwrap_or_else(|_| "studio-audio".to_string());
        let public_base_url = env::var("AUDIO_PUBLIC_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.amazonaws.com", bucket_name));

        Ok(Self {
            client,
            bucket_name,
            public_base_url,
        })
    }

    /// Upload a file and return its public URL
    pub async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        info!("Uploading {} bytes to s3://{}/{}", bytes.len(), self.bucket_name, key);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await?;

        Ok(self.public_url(key))
    }

    /// Delete an object by key
    pub async fn delete(&self, key: &str) -> Result<()> {
        info!("Deleting s3://{}/{}", self.bucket_name, key);

        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        Ok(())
    }

    /// Public URL for an object key
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

/// Build an object key for an uploaded exercise file: a timestamp prefix
/// plus the original name with anything unsafe replaced.
pub fn object_key(file_name: &str, timestamp_millis: i64) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("exercises/{}-{}", timestamp_millis, sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_sanitizes_names() {
        let key = object_key("my song (final).mp3", 1700000000000);
        assert_eq!(key, "exercises/1700000000000-my_song__final_.mp3");
    }

    #[test]
    fn object_key_keeps_safe_characters() {
        let key = object_key("etude-no1.mp3", 42);
        assert_eq!(key, "exercises/42-etude-no1.mp3");
    }
}
