use serde::Deserialize;
use submission_relay_core::message::OutgoingEmail;

use super::block_on;

pub const DEFAULT_MAILGUN_API_BASE: &str = "https://api.mailgun.net/v3";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveryReceipt {
    pub message_id: Option<String>,
}

/// Anything that can hand a plain-text email to a delivery service.
pub trait MailTransport {
    fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, String>;
}

#[derive(Debug, Deserialize)]
struct MailgunReply {
    id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MailgunTransport {
    client: reqwest::Client,
    api_base: String,
    domain: String,
    api_key: String,
}

impl MailgunTransport {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        domain: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            domain: domain.into(),
            api_key: api_key.into(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.api_base.trim_end_matches('/'),
            self.domain
        )
    }

    async fn send_async(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, String> {
        let form = [
            ("from", email.from.as_str()),
            ("to", email.to.as_str()),
            ("subject", email.subject.as_str()),
            ("text", email.text.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await
            .map_err(|error| format!("mailgun request failed: {error}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("mailgun returned {status}: {body}"));
        }

        // A 2xx means mailgun accepted the message; the id is only bookkeeping.
        let body = response.text().await.unwrap_or_default();
        let message_id = match serde_json::from_str::<MailgunReply>(&body) {
            Ok(reply) => reply.id,
            Err(error) => {
                tracing::warn!(%status, %error, "mailgun accepted message without a readable id");
                None
            }
        };
        Ok(DeliveryReceipt { message_id })
    }
}

impl MailTransport for MailgunTransport {
    fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, String> {
        block_on(self.send_async(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_tolerates_trailing_slash() {
        let transport = MailgunTransport::new(
            reqwest::Client::new(),
            "https://api.eu.mailgun.net/v3/",
            "mg.example.edu",
            "key-123",
        );

        assert_eq!(
            transport.messages_url(),
            "https://api.eu.mailgun.net/v3/mg.example.edu/messages"
        );
    }
}
