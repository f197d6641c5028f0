//! JSON serialization support for SenML

use crate::format::{Format, OutputOptions};
use crate::{Result, SenMLError, SenMLPack};

/// Serialize a pack to JSON.
///
/// The pretty layout keeps each record on a single line so large packs stay
/// readable and line-oriented tools can still split records.
pub fn encode(pack: &SenMLPack, options: &OutputOptions) -> Result<Vec<u8>> {
    if !options.pretty {
        return serde_json::to_vec(pack).map_err(|e| SenMLError::encode(Format::Json, e.to_string()));
    }

    let mut out = b"[\n".to_vec();
    for (i, record) in pack.iter().enumerate() {
        if i != 0 {
            out.extend_from_slice(b",\n");
        }
        out.extend_from_slice(b"  ");
        serde_json::to_writer(&mut out, record)
            .map_err(|e| SenMLError::encode(Format::Json, e.to_string()))?;
    }
    if !pack.is_empty() {
        out.push(b'\n');
    }
    out.extend_from_slice(b"]\n");
    Ok(out)
}

/// Deserialize a pack from JSON bytes
pub fn decode(bytes: &[u8]) -> Result<SenMLPack> {
    serde_json::from_slice(bytes).map_err(|e| SenMLError::decode(Format::Json, e.to_string()))
}
