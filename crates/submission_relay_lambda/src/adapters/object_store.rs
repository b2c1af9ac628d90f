use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use super::block_on;

pub trait ArtifactStore {
    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), String>;
}

#[derive(Debug, Clone)]
pub struct S3ArtifactStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ArtifactStore {
    pub fn new(bucket: impl Into<String>, s3_client: aws_sdk_s3::Client) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }
}

impl ArtifactStore for S3ArtifactStore {
    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), String> {
        let request = self
            .s3_client
            .put_object()
            .bucket(self.bucket.clone())
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body.to_vec()));

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    format!("failed to write object to s3: {}", DisplayErrorContext(&error))
                })
        })
    }
}
