use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::head_object::HeadObjectOutput;
use aws_sdk_s3::types::{MetadataDirective, ServerSideEncryption, StorageClass};
use cache_purge_core::metadata::MetadataPatch;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

use crate::adapters::object_store::ObjectStore;

/// Characters left untouched in an `x-amz-copy-source` value.
const COPY_SOURCE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Largest object a single `CopyObject` request accepts (5 GiB).
pub const MAX_SINGLE_COPY_BYTES: i64 = 5 * 1024 * 1024 * 1024;

/// Headers of a stored object that a self-copy would otherwise reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectHeaders {
    pub cache_control: Option<String>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub content_disposition: Option<String>,
    pub content_language: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
    pub storage_class: Option<StorageClass>,
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub ssekms_key_id: Option<String>,
    pub content_length: Option<i64>,
}

impl ObjectHeaders {
    pub fn from_head(head: &HeadObjectOutput) -> Self {
        Self {
            cache_control: head.cache_control().map(str::to_string),
            content_type: head.content_type().map(str::to_string),
            content_encoding: head.content_encoding().map(str::to_string),
            content_disposition: head.content_disposition().map(str::to_string),
            content_language: head.content_language().map(str::to_string),
            metadata: head.metadata().cloned(),
            storage_class: head.storage_class().cloned(),
            server_side_encryption: head.server_side_encryption().cloned(),
            ssekms_key_id: head.ssekms_key_id().map(str::to_string),
            content_length: head.content_length(),
        }
    }

    /// A self-copy raises another `ObjectCreated:Copy` notification, so an
    /// object that already carries the patch must not be copied again.
    pub fn satisfies(&self, patch: &MetadataPatch) -> bool {
        let cache_control_matches =
            self.cache_control.as_deref() == Some(patch.cache_control.as_str());
        let content_type_matches = match &patch.content_type {
            Some(wanted) => self.content_type.as_deref() == Some(wanted.as_str()),
            None => true,
        };
        cache_control_matches && content_type_matches
    }

    pub fn exceeds_single_copy(&self) -> bool {
        self.content_length
            .map(|length| length > MAX_SINGLE_COPY_BYTES)
            .unwrap_or(false)
    }

    pub fn patched_content_type(&self, patch: &MetadataPatch) -> Option<String> {
        patch
            .content_type
            .clone()
            .or_else(|| self.content_type.clone())
    }
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(s3_client: aws_sdk_s3::Client) -> Self {
        Self { s3_client }
    }

    /// Loads the default AWS configuration, optionally pointed at an
    /// S3-compatible endpoint with path-style addressing.
    pub async fn from_env(endpoint_url: Option<&str>) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self::new(aws_sdk_s3::Client::from_conf(builder.build()))
    }
}

pub fn copy_source(bucket: &str, key: &str) -> String {
    utf8_percent_encode(&format!("{bucket}/{key}"), COPY_SOURCE).to_string()
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, String> {
        match self
            .s3_client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(error) => {
                if error
                    .as_service_error()
                    .map(|service_error| service_error.is_not_found())
                    .unwrap_or(false)
                {
                    Ok(false)
                } else {
                    Err(format!(
                        "failed to head object in s3: {}",
                        DisplayErrorContext(&error)
                    ))
                }
            }
        }
    }

    // S3 only rewrites metadata through a self-copy, which replaces every
    // header; the ones the patch leaves alone are carried over.
    async fn set_metadata(
        &self,
        bucket: &str,
        key: &str,
        patch: &MetadataPatch,
    ) -> Result<(), String> {
        let head = self
            .s3_client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|error| {
                format!(
                    "failed to read current object metadata: {}",
                    DisplayErrorContext(&error)
                )
            })?;
        let current = ObjectHeaders::from_head(&head);

        if current.satisfies(patch) {
            debug!(bucket, key, "object metadata already current, skipping copy");
            return Ok(());
        }

        if current.exceeds_single_copy() {
            return Err(format!(
                "object is {} bytes, above the {MAX_SINGLE_COPY_BYTES} byte single-copy limit; \
                 metadata left unchanged",
                current.content_length.unwrap_or_default()
            ));
        }

        self.s3_client
            .copy_object()
            .bucket(bucket)
            .key(key)
            .copy_source(copy_source(bucket, key))
            .metadata_directive(MetadataDirective::Replace)
            .cache_control(&patch.cache_control)
            .set_content_type(current.patched_content_type(patch))
            .set_content_encoding(current.content_encoding)
            .set_content_disposition(current.content_disposition)
            .set_content_language(current.content_language)
            .set_metadata(current.metadata)
            .set_storage_class(current.storage_class)
            .set_server_side_encryption(current.server_side_encryption)
            .set_ssekms_key_id(current.ssekms_key_id)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                format!(
                    "failed to rewrite object metadata in s3: {}",
                    DisplayErrorContext(&error)
                )
            })
    }
}
