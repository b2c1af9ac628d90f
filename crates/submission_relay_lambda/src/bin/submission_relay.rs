use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use submission_relay_lambda::adapters::fetch::HttpArtifactSource;
use submission_relay_lambda::adapters::mail::MailgunTransport;
use submission_relay_lambda::adapters::object_store::S3ArtifactStore;
use submission_relay_lambda::adapters::record_store::DynamoRecordStore;
use submission_relay_lambda::config::RelayConfig;
use submission_relay_lambda::handlers::submission::SubmissionWorkflow;
use submission_relay_lambda::handlers::trigger::handle_trigger_event;
use submission_relay_lambda::steps::fetcher::ArtifactFetcher;
use submission_relay_lambda::steps::notifier::OutcomeNotifier;
use submission_relay_lambda::steps::relocator::ArtifactRelocator;
use submission_relay_lambda::telemetry::init_tracing;

struct RuntimeDependencies {
    config: RelayConfig,
    source: HttpArtifactSource,
    store: S3ArtifactStore,
    records: DynamoRecordStore,
    transport: MailgunTransport,
}

impl RuntimeDependencies {
    async fn load() -> Result<Self, Error> {
        let config = RelayConfig::from_env()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = config.region.clone() {
            loader = loader.region(aws_config::Region::new(region));
        }
        let aws_config = loader.load().await;

        let http_client = reqwest::Client::new();
        Ok(Self {
            source: HttpArtifactSource::new(http_client.clone()),
            store: S3ArtifactStore::new(
                config.storage.bucket.clone(),
                aws_sdk_s3::Client::new(&aws_config),
            ),
            records: DynamoRecordStore::new(
                config.record_table.clone(),
                aws_sdk_dynamodb::Client::new(&aws_config),
            ),
            transport: MailgunTransport::new(
                http_client,
                config.mail.api_base.clone(),
                config.mail.domain.clone(),
                config.mail.api_key.clone(),
            ),
            config,
        })
    }

    fn workflow(&self) -> SubmissionWorkflow<'_> {
        SubmissionWorkflow::new(
            ArtifactFetcher::new(&self.source, self.config.scratch_dir.clone()),
            ArtifactRelocator::new(&self.store, self.config.storage.clone()),
            OutcomeNotifier::new(
                &self.transport,
                &self.records,
                self.config.mail.source_email.clone(),
            ),
        )
    }
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<Vec<String>, Error> {
    tracing::info!(request_id = %event.context.request_id, "submission relay invoked");
    handle_trigger_event(event.payload, &deps.workflow()).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let deps = RuntimeDependencies::load().await?;
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, deps).await
    }))
    .await
}
