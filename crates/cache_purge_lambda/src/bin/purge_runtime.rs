use std::time::Duration;

use cache_purge_core::event::decode_finalize_events;
use cache_purge_lambda::adapters::http_purge::HttpPurgeClient;
use cache_purge_lambda::adapters::object_store::ObjectStore;
use cache_purge_lambda::adapters::purge::PurgeClient;
use cache_purge_lambda::adapters::s3_store::S3ObjectStore;
use cache_purge_lambda::config::RuntimeConfig;
use cache_purge_lambda::handlers::finalize::CacheInvalidationWorker;
use cache_purge_lambda::logging;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tracing::{info, warn};

async fn handle_request<S: ObjectStore, P: PurgeClient>(
    worker: &CacheInvalidationWorker<S, P>,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let batch = match decode_finalize_events(&event.payload) {
        Ok(batch) => batch,
        Err(error) => {
            warn!(
                request_id = %event.context.request_id,
                error = %error,
                "ignoring undecodable finalize payload"
            );
            return Ok(json!({ "status": "ignored" }));
        }
    };

    if batch.skipped > 0 {
        info!(skipped = batch.skipped, "skipped non-create storage records");
    }

    for storage_event in &batch.events {
        worker.handle(storage_event).await;
    }

    Ok(json!({
        "status": "ok",
        "processed": batch.events.len(),
        "skipped": batch.skipped,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let config = RuntimeConfig::from_env()?;
    info!(
        category = %config.worker.category,
        base_url = %config.worker.base_url,
        "cache purge worker starting"
    );

    let store = S3ObjectStore::from_env(config.storage_endpoint_url.as_deref()).await;
    let purger = HttpPurgeClient::new(Duration::from_secs(config.timeout_secs))?;
    let worker = CacheInvalidationWorker::new(config.worker, store, purger);
    let worker = &worker;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(worker, event).await
    }))
    .await
}
