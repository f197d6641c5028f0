//! MessagePack serialization support for SenML
//!
//! Records are written as maps keyed by the JSON field names.

use crate::format::Format;
use crate::{Result, SenMLError, SenMLPack};

/// Serialize a pack to MessagePack bytes
pub fn encode(pack: &SenMLPack) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(pack).map_err(|e| SenMLError::encode(Format::MessagePack, e.to_string()))
}

/// Deserialize a pack from MessagePack bytes
pub fn decode(bytes: &[u8]) -> Result<SenMLPack> {
    rmp_serde::from_slice(bytes).map_err(|e| SenMLError::decode(Format::MessagePack, e.to_string()))
}
