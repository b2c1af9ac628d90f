use std::fs;

use chrono::Utc;
use submission_relay_core::contract::{RelocatedArtifact, StagedArtifact, ZIP_CONTENT_TYPE};
use submission_relay_core::error::SubmissionError;
use submission_relay_core::storage_keys::{
    canonical_object_url, console_object_url, destination_object_name,
};

use crate::adapters::object_store::ArtifactStore;
use crate::config::StorageSettings;

/// Moves staged artifacts into the submission bucket.
pub struct ArtifactRelocator<'a> {
    store: &'a dyn ArtifactStore,
    settings: StorageSettings,
}

impl<'a> ArtifactRelocator<'a> {
    pub fn new(store: &'a dyn ArtifactStore, settings: StorageSettings) -> Self {
        Self { store, settings }
    }

    pub fn relocate(
        &self,
        staged: &StagedArtifact,
        recipient_email: &str,
    ) -> Result<RelocatedArtifact, SubmissionError> {
        let object_name =
            destination_object_name(&self.settings.object_prefix, recipient_email, Utc::now());
        tracing::info!(
            recipient = %recipient_email,
            bucket = %self.settings.bucket,
            object_key = %object_name,
            "uploading artifact"
        );

        let relocation_failure = |cause: String| {
            tracing::error!(
                recipient = %recipient_email,
                object_key = %object_name,
                error = %cause,
                "artifact upload failed"
            );
            SubmissionError::RelocationFailure {
                object_name: object_name.clone(),
                cause,
            }
        };

        let body = fs::read(&staged.path).map_err(|error| {
            relocation_failure(format!(
                "failed to read staged artifact '{}': {error}",
                staged.path.display()
            ))
        })?;
        self.store
            .put_object(&object_name, &body, ZIP_CONTENT_TYPE)
            .map_err(relocation_failure)?;

        tracing::info!(object_key = %object_name, "artifact upload finished");
        Ok(RelocatedArtifact {
            primary_url: canonical_object_url(&self.settings.bucket, &object_name),
            authenticated_url: console_object_url(
                &self.settings.console_region,
                &self.settings.bucket,
                &object_name,
            ),
        })
    }
}
