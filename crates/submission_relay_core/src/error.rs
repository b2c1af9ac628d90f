use thiserror::Error;

pub const INVALID_URL_REASON: &str =
    "Invalid GitHub repository URL. It must be a link to a zip file.";
pub const FETCH_FAILURE_REASON: &str = "Invalid URL or Zip file.";
pub const RELOCATION_FAILURE_REASON: &str = "Could not upload zip file. Try again!";
pub const DELIVERY_FAILURE_REASON: &str = "Could not deliver notification email.";
pub const PERSISTENCE_FAILURE_REASON: &str = "Could not store notification record.";
pub const MALFORMED_EVENT_REASON: &str = "Malformed submission event.";

/// Every way a submission can go wrong.
///
/// Variants keep the underlying cause so logs stay diagnosable; submitters
/// only ever see [`SubmissionError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("submission url is not a zip link: {url}")]
    InvalidInputUrl { url: String },

    #[error("failed to fetch artifact from {url}: {cause}")]
    FetchFailure { url: String, cause: String },

    #[error("failed to upload {object_name}: {cause}")]
    RelocationFailure { object_name: String, cause: String },

    #[error("failed to deliver notification to {recipient}: {cause}")]
    DeliveryFailure { recipient: String, cause: String },

    #[error("failed to persist notification record {record_id}: {cause}")]
    PersistenceFailure { record_id: String, cause: String },

    #[error("malformed submission event: {reason}")]
    MalformedEvent { reason: String },
}

impl SubmissionError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            reason: reason.into(),
        }
    }

    /// Stable code used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInputUrl { .. } => "invalid_input_url",
            Self::FetchFailure { .. } => "fetch_failure",
            Self::RelocationFailure { .. } => "relocation_failure",
            Self::DeliveryFailure { .. } => "delivery_failure",
            Self::PersistenceFailure { .. } => "persistence_failure",
            Self::MalformedEvent { .. } => "malformed_event",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInputUrl { .. } => INVALID_URL_REASON,
            Self::FetchFailure { .. } => FETCH_FAILURE_REASON,
            Self::RelocationFailure { .. } => RELOCATION_FAILURE_REASON,
            Self::DeliveryFailure { .. } => DELIVERY_FAILURE_REASON,
            Self::PersistenceFailure { .. } => PERSISTENCE_FAILURE_REASON,
            Self::MalformedEvent { .. } => MALFORMED_EVENT_REASON,
        }
    }
}
