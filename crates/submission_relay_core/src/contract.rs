use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::SubmissionError;

pub const RECORD_SCHEMA_VERSION: &str = "v1";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Payload published by the submission service.
#[derive(Debug, Clone, Deserialize)]
struct SubmissionMessage {
    user_email: String,
    submission_url: String,
    assignment_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionEvent {
    pub recipient_email: String,
    pub artifact_url: String,
    pub assignment_id: String,
}

impl SubmissionEvent {
    pub fn from_json_str(payload: &str) -> Result<Self, SubmissionError> {
        let message: SubmissionMessage = serde_json::from_str(payload)
            .map_err(|error| SubmissionError::malformed(format!("invalid payload: {error}")))?;
        Self::from_message(message)
    }

    pub fn from_value(payload: Value) -> Result<Self, SubmissionError> {
        let message: SubmissionMessage = serde_json::from_value(payload)
            .map_err(|error| SubmissionError::malformed(format!("invalid payload: {error}")))?;
        Self::from_message(message)
    }

    fn from_message(message: SubmissionMessage) -> Result<Self, SubmissionError> {
        let recipient_email = message.user_email.trim().to_string();
        if recipient_email.is_empty() {
            return Err(SubmissionError::malformed("user_email cannot be empty"));
        }

        let artifact_url = message.submission_url.trim().to_string();
        if artifact_url.is_empty() {
            return Err(SubmissionError::malformed("submission_url cannot be empty"));
        }

        Ok(Self {
            recipient_email,
            artifact_url,
            assignment_id: message.assignment_id.trim().to_string(),
        })
    }
}

pub fn is_zip_url(url: &str) -> bool {
    url.to_ascii_lowercase().ends_with(".zip")
}

/// A fetched artifact sitting in the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Where a relocated artifact can be found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelocatedArtifact {
    pub primary_url: String,
    pub authenticated_url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// Submission outcome attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeMeta {
    pub submission_url: String,
    pub assignment_id: String,
    pub status: NotificationStatus,
    pub relocated: Option<RelocatedArtifact>,
}

impl OutcomeMeta {
    pub fn success(event: &SubmissionEvent, relocated: RelocatedArtifact) -> Self {
        Self {
            submission_url: event.artifact_url.clone(),
            assignment_id: event.assignment_id.clone(),
            status: NotificationStatus::Success,
            relocated: Some(relocated),
        }
    }

    pub fn failed(event: &SubmissionEvent) -> Self {
        Self {
            submission_url: event.artifact_url.clone(),
            assignment_id: event.assignment_id.clone(),
            status: NotificationStatus::Failed,
            relocated: None,
        }
    }
}

/// Audit row written once per notification attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: Uuid,
    pub recipient_email: String,
    pub submission_url: String,
    pub storage_url: Option<String>,
    pub authenticated_url: Option<String>,
    pub sent_at: String,
    pub assignment_id: String,
    pub status: NotificationStatus,
    pub delivered: bool,
    pub delivery_id: Option<String>,
    pub record_schema: String,
}

impl NotificationRecord {
    pub fn new(
        recipient_email: &str,
        outcome: &OutcomeMeta,
        sent_at: String,
        delivery_id: Option<String>,
        delivered: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_email: recipient_email.to_string(),
            submission_url: outcome.submission_url.clone(),
            storage_url: outcome
                .relocated
                .as_ref()
                .map(|relocated| relocated.primary_url.clone()),
            authenticated_url: outcome
                .relocated
                .as_ref()
                .map(|relocated| relocated.authenticated_url.clone()),
            sent_at,
            assignment_id: outcome.assignment_id.clone(),
            status: outcome.status,
            delivered,
            delivery_id,
            record_schema: RECORD_SCHEMA_VERSION.to_string(),
        }
    }
}
