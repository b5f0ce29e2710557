use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An object write that completed in storage (create or overwrite).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageEvent {
    pub name: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeBatch {
    pub events: Vec<StorageEvent>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EventDecodeError(pub String);

const S3_EVENT_SOURCE: &str = "aws:s3";
const OBJECT_CREATED_PREFIX: &str = "ObjectCreated:";

/// Accepts either a bare `{name, bucket}` finalize payload or an S3
/// notification with `Records`. Non-create S3 records are counted as skipped.
pub fn decode_finalize_events(payload: &Value) -> Result<FinalizeBatch, EventDecodeError> {
    let Some(object) = payload.as_object() else {
        return Err(EventDecodeError(
            "finalize payload must be a JSON object".to_string(),
        ));
    };

    if object.contains_key("Records") {
        return decode_s3_records(payload);
    }

    let name = required_str(payload, "name")?;
    let bucket = required_str(payload, "bucket")?;
    Ok(FinalizeBatch {
        events: vec![StorageEvent {
            name: name.to_string(),
            bucket: bucket.to_string(),
        }],
        skipped: 0,
    })
}

fn decode_s3_records(payload: &Value) -> Result<FinalizeBatch, EventDecodeError> {
    let records = payload
        .get("Records")
        .and_then(Value::as_array)
        .filter(|records| !records.is_empty())
        .ok_or_else(|| EventDecodeError("S3 event must include a non-empty Records array".into()))?;

    let mut batch = FinalizeBatch::default();
    for record in records {
        let source = record.get("eventSource").and_then(Value::as_str);
        if source != Some(S3_EVENT_SOURCE) {
            return Err(EventDecodeError(format!(
                "unsupported event source {}",
                source.unwrap_or("<missing>")
            )));
        }

        let event_name = required_str(record, "eventName")?;
        if !event_name.starts_with(OBJECT_CREATED_PREFIX) {
            batch.skipped += 1;
            continue;
        }

        let bucket = record
            .pointer("/s3/bucket/name")
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| EventDecodeError("S3 record must include s3.bucket.name".into()))?;
        let raw_key = record
            .pointer("/s3/object/key")
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| EventDecodeError("S3 record must include s3.object.key".into()))?;

        batch.events.push(StorageEvent {
            name: decode_s3_key(raw_key)?,
            bucket: bucket.to_string(),
        });
    }

    Ok(batch)
}

/// S3 notification keys are form-encoded: `+` is a space, `%XX` an escape.
pub fn decode_s3_key(raw_key: &str) -> Result<String, EventDecodeError> {
    let spaced = raw_key.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|error| EventDecodeError(format!("S3 object key is not valid UTF-8: {error}")))
}

fn required_str<'a>(value: &'a Value, field: &str) -> Result<&'a str, EventDecodeError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            EventDecodeError(format!(
                "finalize payload field `{field}` must be a non-empty string"
            ))
        })
}
