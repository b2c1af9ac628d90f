use serde::{Deserialize, Serialize};

use crate::contract::RelocatedArtifact;

pub const SUCCESS_SUBJECT: &str = "Submission Successful";
pub const FAILURE_SUBJECT: &str = "Submission Unsuccessful";
pub const SUCCESS_BODY: &str = "Your submission was successful.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

pub fn success_body(relocated: &RelocatedArtifact) -> String {
    format!(
        "{SUCCESS_BODY}\n\nStorage URL: {}\n\nConsole URL: {}",
        relocated.primary_url, relocated.authenticated_url
    )
}
