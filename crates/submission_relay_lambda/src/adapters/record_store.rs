use std::collections::HashMap;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Value;
use submission_relay_core::contract::NotificationRecord;

use super::block_on;

pub trait RecordStore {
    fn put_record(&self, record: &NotificationRecord) -> Result<(), String>;
}

#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    table_name: String,
    dynamo_client: aws_sdk_dynamodb::Client,
}

impl DynamoRecordStore {
    pub fn new(table_name: impl Into<String>, dynamo_client: aws_sdk_dynamodb::Client) -> Self {
        Self {
            table_name: table_name.into(),
            dynamo_client,
        }
    }
}

impl RecordStore for DynamoRecordStore {
    fn put_record(&self, record: &NotificationRecord) -> Result<(), String> {
        let item = record_item(record)?;
        // Records are write-once; a colliding id must never replace an existing row.
        let request = self
            .dynamo_client
            .put_item()
            .table_name(self.table_name.clone())
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", "id");

        block_on(async move {
            request.send().await.map(|_| ()).map_err(|error| {
                format!(
                    "failed to write record to dynamodb: {}",
                    DisplayErrorContext(&error)
                )
            })
        })
    }
}

pub fn record_item(record: &NotificationRecord) -> Result<HashMap<String, AttributeValue>, String> {
    match serde_json::to_value(record)
        .map_err(|error| format!("failed to serialize notification record: {error}"))?
    {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, attribute_value(value)))
            .collect()),
        _ => Err("notification record must serialize to an object".to_string()),
    }
}

fn attribute_value(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text),
        Value::Array(items) => AttributeValue::L(items.into_iter().map(attribute_value).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(name, value)| (name, attribute_value(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use submission_relay_core::contract::{
        OutcomeMeta, RelocatedArtifact, SubmissionEvent, RECORD_SCHEMA_VERSION,
    };

    use super::*;

    fn sample_event() -> SubmissionEvent {
        SubmissionEvent {
            recipient_email: "student@example.edu".to_string(),
            artifact_url: "https://host/repo.zip".to_string(),
            assignment_id: "a-1".to_string(),
        }
    }

    #[test]
    fn success_record_maps_to_string_attributes() {
        let outcome = OutcomeMeta::success(
            &sample_event(),
            RelocatedArtifact {
                primary_url: "s3://bucket/key.zip".to_string(),
                authenticated_url: "https://console/key.zip".to_string(),
            },
        );
        let record = NotificationRecord::new(
            "student@example.edu",
            &outcome,
            "2024-03-01T10:15:30Z".to_string(),
            Some("<id@mail>".to_string()),
            true,
        );

        let item = record_item(&record).expect("record should map");

        assert_eq!(item.get("id"), Some(&AttributeValue::S(record.id.to_string())));
        assert_eq!(
            item.get("status"),
            Some(&AttributeValue::S("success".to_string()))
        );
        assert_eq!(
            item.get("storageUrl"),
            Some(&AttributeValue::S("s3://bucket/key.zip".to_string()))
        );
        assert_eq!(item.get("delivered"), Some(&AttributeValue::Bool(true)));
        assert_eq!(
            item.get("recordSchema"),
            Some(&AttributeValue::S(RECORD_SCHEMA_VERSION.to_string()))
        );
    }

    #[test]
    fn failed_record_maps_missing_urls_to_null() {
        let record = NotificationRecord::new(
            "student@example.edu",
            &OutcomeMeta::failed(&sample_event()),
            "2024-03-01T10:15:30Z".to_string(),
            None,
            false,
        );

        let item = record_item(&record).expect("record should map");

        assert_eq!(item.get("storageUrl"), Some(&AttributeValue::Null(true)));
        assert_eq!(item.get("authenticatedUrl"), Some(&AttributeValue::Null(true)));
        assert_eq!(item.get("deliveryId"), Some(&AttributeValue::Null(true)));
        assert_eq!(
            item.get("status"),
            Some(&AttributeValue::S("failed".to_string()))
        );
    }
}
