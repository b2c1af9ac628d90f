use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use submission_relay_core::contract::{is_zip_url, StagedArtifact};
use submission_relay_core::error::SubmissionError;
use submission_relay_core::storage_keys::staged_file_name;

use crate::adapters::fetch::ArtifactSource;

/// Downloads submission archives into the scratch directory.
pub struct ArtifactFetcher<'a> {
    source: &'a dyn ArtifactSource,
    scratch_dir: PathBuf,
}

impl<'a> ArtifactFetcher<'a> {
    pub fn new(source: &'a dyn ArtifactSource, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Non-zip urls are rejected before any network access.
    pub fn fetch(&self, recipient_email: &str, url: &str) -> Result<StagedArtifact, SubmissionError> {
        if !is_zip_url(url) {
            tracing::warn!(recipient = %recipient_email, url, "rejected non-zip submission url");
            return Err(SubmissionError::InvalidInputUrl {
                url: url.to_string(),
            });
        }

        let fetch_failure = |cause: String| {
            tracing::error!(recipient = %recipient_email, url, error = %cause, "artifact fetch failed");
            SubmissionError::FetchFailure {
                url: url.to_string(),
                cause,
            }
        };

        let body = self.source.download(url).map_err(fetch_failure)?;
        let path = self
            .scratch_dir
            .join(staged_file_name(recipient_email, Utc::now()));
        fs::write(&path, &body).map_err(|error| {
            fetch_failure(format!("failed to write '{}': {error}", path.display()))
        })?;

        let staged = StagedArtifact {
            path,
            size_bytes: body.len() as u64,
        };
        tracing::info!(
            recipient = %recipient_email,
            path = %staged.path.display(),
            size_bytes = staged.size_bytes,
            "artifact staged"
        );
        Ok(staged)
    }
}

/// Removes a staged file once it is no longer needed.
pub fn discard_staged(path: &Path) {
    if let Err(error) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), %error, "failed to remove staged artifact");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct CountingSource {
        body: Result<Vec<u8>, String>,
        requests: Mutex<Vec<String>>,
    }

    impl CountingSource {
        fn serving(body: &[u8]) -> Self {
            Self {
                body: Ok(body.to_vec()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                body: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().expect("poisoned mutex").clone()
        }
    }

    impl ArtifactSource for CountingSource {
        fn download(&self, url: &str) -> Result<Vec<u8>, String> {
            self.requests
                .lock()
                .expect("poisoned mutex")
                .push(url.to_string());
            self.body.clone()
        }
    }

    #[test]
    fn rejects_non_zip_urls_without_downloading() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let source = CountingSource::serving(b"PK");
        let fetcher = ArtifactFetcher::new(&source, scratch.path());

        for url in [
            "https://host/repo.tar",
            "https://host/repo.zip.gz",
            "https://host/repo",
            "",
        ] {
            let error = fetcher
                .fetch("student@example.edu", url)
                .expect_err("non-zip url should fail");
            assert_eq!(error.kind(), "invalid_input_url");
        }

        assert!(source.requests().is_empty());
        assert_eq!(fs::read_dir(scratch.path()).expect("read dir").count(), 0);
    }

    #[test]
    fn stages_body_under_recipient_named_file() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let source = CountingSource::serving(b"PK\x03\x04archive");
        let fetcher = ArtifactFetcher::new(&source, scratch.path());

        let staged = fetcher
            .fetch("student@example.edu", "https://host/REPO.ZIP")
            .expect("fetch should succeed");

        assert_eq!(source.requests(), vec!["https://host/REPO.ZIP".to_string()]);
        assert_eq!(staged.size_bytes, 12);
        assert!(staged.path.starts_with(scratch.path()));
        let file_name = staged
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("file name");
        assert!(file_name.starts_with("student@example.edu_"));
        assert!(file_name.ends_with(".zip"));
        assert_eq!(
            fs::read(&staged.path).expect("staged file"),
            b"PK\x03\x04archive"
        );
    }

    #[test]
    fn download_error_collapses_to_fetch_failure() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let source = CountingSource::failing("connection refused");
        let fetcher = ArtifactFetcher::new(&source, scratch.path());

        let error = fetcher
            .fetch("student@example.edu", "https://host/repo.zip")
            .expect_err("fetch should fail");

        assert_eq!(error.user_message(), "Invalid URL or Zip file.");
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn unwritable_scratch_dir_is_a_fetch_failure() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let missing = scratch.path().join("does-not-exist");
        let source = CountingSource::serving(b"PK");
        let fetcher = ArtifactFetcher::new(&source, &missing);

        let error = fetcher
            .fetch("student@example.edu", "https://host/repo.zip")
            .expect_err("fetch should fail");

        assert_eq!(error.kind(), "fetch_failure");
    }

    #[test]
    fn discard_removes_staged_file() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let path = scratch.path().join("staged.zip");
        fs::write(&path, b"PK").expect("write");

        discard_staged(&path);
        assert!(!path.exists());

        // Already gone; only logs.
        discard_staged(&path);
    }
}
