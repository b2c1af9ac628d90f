use serde_json::Value;
use submission_relay_core::contract::SubmissionEvent;
use submission_relay_core::error::SubmissionError;

use crate::handlers::submission::SubmissionWorkflow;

/// Decodes every submission carried by a trigger event.
///
/// SNS notifications, SQS batches and direct invocations are accepted. All
/// records are decoded up front so a malformed record fails the whole
/// invocation before any submission is processed.
pub fn decode_trigger_event(event: Value) -> Result<Vec<SubmissionEvent>, SubmissionError> {
    if event.get("Records").is_none() {
        return SubmissionEvent::from_value(event).map(|submission| vec![submission]);
    }

    let records = event["Records"]
        .as_array()
        .ok_or_else(|| SubmissionError::malformed("Records must be an array"))?;
    if records.is_empty() {
        return Err(SubmissionError::malformed("Records cannot be empty"));
    }

    records.iter().map(decode_record).collect()
}

fn decode_record(record: &Value) -> Result<SubmissionEvent, SubmissionError> {
    if let Some(sns) = record.get("Sns") {
        let message = sns
            .get("Message")
            .and_then(Value::as_str)
            .ok_or_else(|| SubmissionError::malformed("SNS record Message must be a string"))?;
        return SubmissionEvent::from_json_str(message);
    }

    if is_sqs_record(record) {
        let body = record
            .get("body")
            .and_then(Value::as_str)
            .ok_or_else(|| SubmissionError::malformed("SQS record body must be a string"))?;
        return SubmissionEvent::from_json_str(body);
    }

    Err(SubmissionError::malformed(
        "record is neither an SNS notification nor an SQS message",
    ))
}

fn is_sqs_record(record: &Value) -> bool {
    record
        .get("eventSource")
        .and_then(Value::as_str)
        .map(|source| source == "aws:sqs")
        .unwrap_or(false)
}

/// Runs the workflow once per decoded submission and returns one summary per run.
pub fn handle_trigger_event(
    event: Value,
    workflow: &SubmissionWorkflow<'_>,
) -> Result<Vec<String>, SubmissionError> {
    let submissions = decode_trigger_event(event).inspect_err(|error| {
        tracing::error!(error_kind = error.kind(), %error, "rejected trigger event");
    })?;

    Ok(submissions
        .iter()
        .map(|submission| workflow.run(submission).summary())
        .collect())
}
