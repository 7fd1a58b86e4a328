//! Reply decoder: normalizes a raw JSON-RPC reply into one [`ProbeResult`].
//!
//! The decoder is total. Every reply maps to exactly one result, and only an
//! explicit error object or empty content counts as failure. Text-shaped
//! models answer with a JSON object; image and audio models answer with
//! opaque base64 blobs. A blob that does not parse as JSON is still a
//! successful probe, just an unstructured one.
//!
//! Successful replies from the worker embed a compute-cost annotation behind
//! the payload:
//!
//! ```text
//! {"response":"4"}
//!
//! [Neurons used: 12]
//! ```
//!
//! The annotation is optional and its parsing is best-effort; a malformed
//! suffix leaves the count unset rather than failing the decode.

use serde_json::{Map, Value};

use crate::catalog::ProbeTarget;
use crate::probe::{OutputShape, ProbeResult, ProbeStatus};
use crate::util::{char_prefix, truncate_with_ellipsis};

/// Longest error message carried in a result, ellipsis included.
pub const MAX_ERROR_LEN: usize = 100;

/// Longest response sample carried in a result.
pub const MAX_SAMPLE_LEN: usize = 50;

/// Fixed message for a success reply with no content items.
pub const NO_CONTENT_MESSAGE: &str = "No content in response";

/// Separator between the JSON payload and the trailing annotation.
const NEURONS_MARKER: &str = "\n\n[Neurons used:";

/// Start of the annotation itself.
const NEURONS_PREFIX: &str = "[Neurons used: ";

/// Decode one raw `tools/call` reply into a [`ProbeResult`].
pub fn decode(reply: &Value, target: &ProbeTarget, input: &Map<String, Value>) -> ProbeResult {
    let input_fields: Vec<String> = input.keys().cloned().collect();

    // 1. Explicit RPC error object.
    if let Some(error) = reply.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return ProbeResult::failed(
            target,
            input_fields,
            truncate_with_ellipsis(message, MAX_ERROR_LEN),
        );
    }

    // 2. Success reply must carry at least one content item.
    let first_item = reply
        .pointer("/result/content")
        .and_then(Value::as_array)
        .and_then(|items| items.first());
    let Some(first_item) = first_item else {
        return ProbeResult::failed(target, input_fields, NO_CONTENT_MESSAGE.to_string());
    };

    // 3. The body is the first item's text blob.
    let body = first_item.get("text").and_then(Value::as_str).unwrap_or("");
    let json_part = body.split(NEURONS_MARKER).next().unwrap_or(body);

    match serde_json::from_str::<Value>(json_part) {
        Ok(Value::Object(payload)) => ProbeResult {
            model_id: target.model_id.clone(),
            category: target.category,
            status: ProbeStatus::Success,
            input_fields,
            output_shape: OutputShape::Structured(payload.keys().cloned().collect()),
            error: None,
            neurons_used: parse_neurons(body),
            response_sample: sample_from(&payload),
        },
        // Not JSON at all, or JSON but not an object: connectivity succeeded,
        // the shape is merely unstructured.
        _ => ProbeResult {
            model_id: target.model_id.clone(),
            category: target.category,
            status: ProbeStatus::Success,
            input_fields,
            output_shape: OutputShape::RawText,
            error: None,
            neurons_used: None,
            response_sample: Some(char_prefix(body, MAX_SAMPLE_LEN)),
        },
    }
}

/// Pull the integer out of a `[Neurons used: N]` suffix, if well formed.
fn parse_neurons(body: &str) -> Option<u64> {
    let (_, tail) = body.split_once(NEURONS_PREFIX)?;
    tail.trim().trim_end_matches(']').trim().parse().ok()
}

/// Sample string for a structured payload: the `response` field when
/// present, else `result`, else nothing.
fn sample_from(payload: &Map<String, Value>) -> Option<String> {
    let value = payload.get("response").or_else(|| payload.get("result"))?;
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Some(char_prefix(&text, MAX_SAMPLE_LEN))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
