use std::time::Instant;

use submission_relay_core::contract::{NotificationRecord, OutcomeMeta, SubmissionEvent};
use submission_relay_core::error::SubmissionError;
use submission_relay_core::message::{success_body, FAILURE_SUBJECT, SUCCESS_SUBJECT};

use crate::steps::fetcher::{discard_staged, ArtifactFetcher};
use crate::steps::notifier::OutcomeNotifier;
use crate::steps::relocator::ArtifactRelocator;

/// Result of one workflow run: the stored record plus what the trigger gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub record: NotificationRecord,
    pub result: Result<String, SubmissionError>,
}

impl WorkflowReport {
    pub fn summary(&self) -> String {
        match &self.result {
            Ok(summary) => summary.clone(),
            Err(error) => error.user_message().to_string(),
        }
    }
}

/// Fetch, relocate and notify for a single submission.
pub struct SubmissionWorkflow<'a> {
    fetcher: ArtifactFetcher<'a>,
    relocator: ArtifactRelocator<'a>,
    notifier: OutcomeNotifier<'a>,
}

impl<'a> SubmissionWorkflow<'a> {
    pub fn new(
        fetcher: ArtifactFetcher<'a>,
        relocator: ArtifactRelocator<'a>,
        notifier: OutcomeNotifier<'a>,
    ) -> Self {
        Self {
            fetcher,
            relocator,
            notifier,
        }
    }

    pub fn run(&self, event: &SubmissionEvent) -> WorkflowReport {
        let started_at = Instant::now();
        tracing::info!(
            recipient = %event.recipient_email,
            url = %event.artifact_url,
            assignment_id = %event.assignment_id,
            "submission started"
        );

        let staged = match self
            .fetcher
            .fetch(&event.recipient_email, &event.artifact_url)
        {
            Ok(staged) => staged,
            Err(error) => return self.fail(event, error, started_at),
        };

        let relocation = self.relocator.relocate(&staged, &event.recipient_email);
        discard_staged(&staged.path);

        let relocated = match relocation {
            Ok(relocated) => relocated,
            Err(error) => return self.fail(event, error, started_at),
        };

        let record = self.notifier.notify(
            &event.recipient_email,
            SUCCESS_SUBJECT,
            &success_body(&relocated),
            &OutcomeMeta::success(event, relocated),
        );
        tracing::info!(
            recipient = %event.recipient_email,
            record_id = %record.id,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "submission completed"
        );

        WorkflowReport {
            record,
            result: Ok(format!(
                "Successfully processed {} for {}",
                event.artifact_url, event.recipient_email
            )),
        }
    }

    fn fail(
        &self,
        event: &SubmissionEvent,
        error: SubmissionError,
        started_at: Instant,
    ) -> WorkflowReport {
        let record = self.notifier.notify(
            &event.recipient_email,
            FAILURE_SUBJECT,
            error.user_message(),
            &OutcomeMeta::failed(event),
        );
        tracing::warn!(
            recipient = %event.recipient_email,
            record_id = %record.id,
            error_kind = error.kind(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "submission failed"
        );

        WorkflowReport {
            record,
            result: Err(error),
        }
    }
}
