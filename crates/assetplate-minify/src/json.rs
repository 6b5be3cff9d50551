//! JSON minification. Keys keep their source order.

use crate::MinifyError;

/// Re-serializes a JSON document without insignificant whitespace.
pub fn minify(input: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let value: serde_json::Value = serde_json::from_slice(input)?;
    Ok(serde_json::to_vec(&value)?)
}
