use chrono::Utc;
use submission_relay_core::contract::{NotificationRecord, OutcomeMeta};
use submission_relay_core::error::SubmissionError;
use submission_relay_core::message::OutgoingEmail;

use crate::adapters::mail::MailTransport;
use crate::adapters::record_store::RecordStore;

/// Emails the submitter and writes the audit record for that email.
pub struct OutcomeNotifier<'a> {
    transport: &'a dyn MailTransport,
    records: &'a dyn RecordStore,
    source_email: String,
}

impl<'a> OutcomeNotifier<'a> {
    pub fn new(
        transport: &'a dyn MailTransport,
        records: &'a dyn RecordStore,
        source_email: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            records,
            source_email: source_email.into(),
        }
    }

    /// Always produces exactly one record; the write is attempted even when
    /// delivery failed. Neither failure is retried or returned.
    pub fn notify(
        &self,
        recipient_email: &str,
        subject: &str,
        body: &str,
        outcome: &OutcomeMeta,
    ) -> NotificationRecord {
        let email = OutgoingEmail {
            from: self.source_email.clone(),
            to: recipient_email.to_string(),
            subject: subject.to_string(),
            text: body.to_string(),
        };

        let (delivered, delivery_id) = match self.transport.send(&email) {
            Ok(receipt) => {
                tracing::info!(
                    recipient = %recipient_email,
                    subject,
                    message_id = receipt.message_id.as_deref().unwrap_or("unknown"),
                    "notification email sent"
                );
                (true, receipt.message_id)
            }
            Err(cause) => {
                let error = SubmissionError::DeliveryFailure {
                    recipient: recipient_email.to_string(),
                    cause,
                };
                tracing::error!(error_kind = error.kind(), %error, "notification email failed");
                (false, None)
            }
        };

        let record = NotificationRecord::new(
            recipient_email,
            outcome,
            Utc::now().to_rfc3339(),
            delivery_id,
            delivered,
        );

        match self.records.put_record(&record) {
            Ok(()) => tracing::info!(
                record_id = %record.id,
                status = record.status.as_str(),
                "notification record saved"
            ),
            Err(cause) => {
                let error = SubmissionError::PersistenceFailure {
                    record_id: record.id.to_string(),
                    cause,
                };
                tracing::error!(error_kind = error.kind(), %error, "notification record lost");
            }
        }

        record
    }
}
