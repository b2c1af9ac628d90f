use super::block_on;

pub trait ArtifactSource {
    fn download(&self, url: &str) -> Result<Vec<u8>, String>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpArtifactSource {
    client: reqwest::Client,
}

impl HttpArtifactSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn download_async(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self.client.get(url).send().await.map_err(|error| {
            if error.is_connect() {
                format!("connection failed for '{url}': {error}")
            } else {
                format!("request to '{url}' failed: {error}")
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status} fetching '{url}'"));
        }

        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|error| format!("failed to read response body from '{url}': {error}"))
    }
}

impl ArtifactSource for HttpArtifactSource {
    fn download(&self, url: &str) -> Result<Vec<u8>, String> {
        block_on(self.download_async(url))
    }
}
