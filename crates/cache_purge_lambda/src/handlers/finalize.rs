use cache_purge_core::event::StorageEvent;
use cache_purge_core::metadata::MetadataPatch;
use cache_purge_core::target::PurgeTarget;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, warn};

use crate::adapters::object_store::ObjectStore;
use crate::adapters::purge::PurgeClient;
use crate::config::WorkerConfig;
use crate::error::PurgeError;

/// Confirmation returned by the edge cache for an accepted purge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurgeReceipt {
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// Some caches answer with a numeric purge id.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// One worker per artifact category; the algorithm is shared by all of them.
pub struct CacheInvalidationWorker<S, P> {
    config: WorkerConfig,
    store: S,
    purger: P,
}

impl<S: ObjectStore, P: PurgeClient> CacheInvalidationWorker<S, P> {
    pub fn new(config: WorkerConfig, store: S, purger: P) -> Self {
        Self {
            config,
            store,
            purger,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Entry point for the triggering platform. Failures are logged and
    /// absorbed so that every invocation completes normally.
    pub async fn handle(&self, event: &StorageEvent) {
        if let Err(purge_error) = self.process(event).await {
            error!(
                category = %self.config.category,
                bucket = %event.bucket,
                name = %event.name,
                stage = purge_error.stage(),
                status = purge_error.status(),
                error = %purge_error,
                "cache invalidation failed"
            );
        }
    }

    pub async fn process(&self, event: &StorageEvent) -> Result<PurgeReceipt, PurgeError> {
        let target = PurgeTarget::new(&self.config.base_url, &event.name);
        info!(
            category = %self.config.category,
            bucket = %event.bucket,
            name = %event.name,
            url = %target.complete_url,
            "processing finalize event"
        );

        let exists = self
            .store
            .exists(&event.bucket, &event.name)
            .await
            .map_err(|message| PurgeError::ExistenceCheck {
                bucket: event.bucket.clone(),
                key: event.name.clone(),
                message,
            })?;

        if exists {
            let patch = MetadataPatch::for_file(&target.file_name);
            self.store
                .set_metadata(&event.bucket, &event.name, &patch)
                .await
                .map_err(|message| PurgeError::MetadataUpdate {
                    bucket: event.bucket.clone(),
                    key: event.name.clone(),
                    message,
                })?;
            info!(
                bucket = %event.bucket,
                name = %event.name,
                cache_control = %patch.cache_control,
                content_type = patch.content_type.as_deref(),
                "object metadata updated"
            );
        } else {
            warn!(
                bucket = %event.bucket,
                name = %event.name,
                "object not found in storage, skipping metadata update"
            );
        }

        let url = target.complete_url;
        let response = self
            .purger
            .send_purge(&url)
            .await
            .map_err(|message| PurgeError::Transport {
                url: url.clone(),
                message,
            })?;

        if !response.is_success() {
            return Err(PurgeError::Status {
                url,
                status: response.status,
            });
        }

        let receipt: PurgeReceipt =
            serde_json::from_slice(&response.body).map_err(|parse_error| {
                PurgeError::MalformedResponse {
                    url: url.clone(),
                    message: parse_error.to_string(),
                }
            })?;

        info!(url = %url, purge_id = %receipt.id, "purge confirmed");
        Ok(receipt)
    }
}
