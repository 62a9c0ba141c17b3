//! Decoding of stored job hashes.

use crate::error::{BoardError, BoardResult};
use crate::job::JobData;
use serde_json::Value;
use std::collections::HashMap;

/// Raw job hash as returned by `HGETALL`.
pub type JobHash = HashMap<String, String>;

/// Name given to jobs enqueued without one.
pub const DEFAULT_JOB_NAME: &str = "__default__";

fn present<'a>(hash: &'a JobHash, field: &str) -> Option<&'a str> {
    hash.get(field)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn json_field(hash: &JobHash, field: &'static str, default: Value) -> BoardResult<Value> {
    present(hash, field).map_or(Ok(default), |raw| {
        serde_json::from_str(raw).map_err(|source| BoardError::Decode { field, source })
    })
}

fn int_field(hash: &JobHash, field: &'static str) -> BoardResult<Option<u64>> {
    present(hash, field)
        .map(|raw| {
            raw.parse().map_err(|_| BoardError::InvalidInteger {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

/// Decode a job hash into [`JobData`].
///
/// The attempt count is read from the first field of `attempt_fields` that
/// is present; generations disagree on its name.
///
/// # Errors
///
/// Returns an error when a present field holds malformed JSON or a
/// malformed integer.
pub fn decode_job(id: &str, hash: &JobHash, attempt_fields: &[&'static str]) -> BoardResult<JobData> {
    let attempts_made = attempt_fields
        .iter()
        .copied()
        .find(|field| present(hash, field).is_some())
        .map_or(Ok(None), |field| int_field(hash, field))?
        .unwrap_or(0);

    let stacktrace = match json_field(hash, "stacktrace", Value::Array(Vec::new()))? {
        Value::Array(frames) => frames
            .into_iter()
            .map(|frame| match frame {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    };

    Ok(JobData {
        id: id.to_string(),
        name: present(hash, "name").unwrap_or(DEFAULT_JOB_NAME).to_string(),
        data: json_field(hash, "data", Value::Object(serde_json::Map::new()))?,
        opts: json_field(hash, "opts", Value::Object(serde_json::Map::new()))?,
        progress: json_field(hash, "progress", Value::from(0))?,
        timestamp: int_field(hash, "timestamp")?,
        processed_on: int_field(hash, "processedOn")?,
        finished_on: int_field(hash, "finishedOn")?,
        attempts_made,
        failed_reason: present(hash, "failedReason").map(str::to_string),
        stacktrace,
    })
}
