//! Compact wrapper codec: `base64(zlib(json))` for the bulky report sections.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use ra_core::{ReportError, Result};
use serde_json::Value;
use std::io::{Read, Write};

/// Sections stored encoded when `compressed` is set.
pub const ENCODED_FIELDS: &[&str] = &["results", "project_metadata"];

pub fn is_compressed(report: &Value) -> bool {
    report.get("compressed").and_then(Value::as_bool).unwrap_or(false)
}

/// Decode one section back into structured JSON.
pub fn decode_field(field: &str, encoded: &str) -> Result<Value> {
    let compressed = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ReportError::decode(field, format!("invalid base64: {e}")))?;

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut text = Vec::new();
    decoder
        .read_to_end(&mut text)
        .map_err(|e| ReportError::decode(field, format!("corrupt zlib stream: {e}")))?;

    serde_json::from_slice(&text).map_err(|e| ReportError::parse(format!("decoded `{field}`"), e))
}

/// Encode one section the way compressed reports store it.
pub fn encode_field(field: &str, value: &Value) -> Result<String> {
    let text = serde_json::to_vec(value).map_err(|e| ReportError::parse(format!("`{field}`"), e))?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&text)
        .and_then(|_| encoder.finish())
        .map(|bytes| STANDARD.encode(bytes))
        .map_err(|e| ReportError::decode(field, format!("compression error: {e}")))
}

/// Expand a compressed report in place. Uncompressed reports pass through unchanged.
pub fn decode(mut report: Value) -> Result<Value> {
    if !is_compressed(&report) {
        return Ok(report);
    }
    let Some(root) = report.as_object_mut() else {
        return Err(ReportError::schema("$", "report is not an object"));
    };

    tracing::info!("Decompressing report sections");
    for field in ENCODED_FIELDS {
        let decoded = match root.get(*field) {
            Some(Value::String(encoded)) => decode_field(field, encoded)?,
            Some(_) => return Err(ReportError::decode(*field, "expected a base64 string")),
            None => return Err(ReportError::decode(*field, "field is missing")),
        };
        root.insert((*field).to_string(), decoded);
    }
    root.insert("compressed".into(), Value::Bool(false));
    Ok(report)
}

/// Inverse of [`decode`]. Already-compressed reports pass through unchanged.
pub fn encode(mut report: Value) -> Result<Value> {
    if is_compressed(&report) {
        return Ok(report);
    }
    let Some(root) = report.as_object_mut() else {
        return Err(ReportError::schema("$", "report is not an object"));
    };

    for field in ENCODED_FIELDS {
        let value = root.get(*field).cloned().unwrap_or(Value::Null);
        root.insert((*field).to_string(), Value::String(encode_field(field, &value)?));
    }
    root.insert("compressed".into(), Value::Bool(true));
    Ok(report)
}
