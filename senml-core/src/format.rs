//! Wire format selection and dispatch
//!
//! Each [`Format`] maps to one codec module. Decoding is only available for
//! the formats that carry the full record model; CSV and line protocol are
//! output-only.

use std::fmt;
use std::str::FromStr;

use crate::{Result, SenMLError, SenMLPack};

/// Media type used when a pack is delivered over HTTP
pub const SENML_JSON_CONTENT_TYPE: &str = "application/senml+json";

/// Wire formats a pack can be converted between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Json,
    Cbor,
    Xml,
    Csv,
    MessagePack,
    LineProtocol,
}

impl Format {
    /// All formats, in flag order
    pub const ALL: [Format; 6] = [
        Format::Json,
        Format::Cbor,
        Format::Xml,
        Format::Csv,
        Format::MessagePack,
        Format::LineProtocol,
    ];

    /// Short name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Cbor => "cbor",
            Format::Xml => "xml",
            Format::Csv => "csv",
            Format::MessagePack => "mpack",
            Format::LineProtocol => "linp",
        }
    }

    /// True if packs can be read from this format
    pub fn can_decode(&self) -> bool {
        matches!(
            self,
            Format::Json | Format::Cbor | Format::Xml | Format::MessagePack
        )
    }

    /// Media type of the encoded output
    pub fn media_type(&self) -> &'static str {
        match self {
            Format::Json => SENML_JSON_CONTENT_TYPE,
            Format::Cbor => "application/senml+cbor",
            Format::Xml => "application/senml+xml",
            Format::Csv => "text/csv",
            Format::MessagePack => "application/msgpack",
            Format::LineProtocol => "text/plain",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = SenMLError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "cbor" => Ok(Format::Cbor),
            "xml" => Ok(Format::Xml),
            "csv" => Ok(Format::Csv),
            "mpack" | "msgpack" | "messagepack" => Ok(Format::MessagePack),
            "linp" | "line-protocol" => Ok(Format::LineProtocol),
            _ => Err(SenMLError::unsupported(s)),
        }
    }
}

/// Encoder settings
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    /// Human friendly layout where the format has one
    pub pretty: bool,
    /// Measurement (series) name for line protocol output
    pub topic: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            topic: "senml".to_string(),
        }
    }
}

/// Decode `bytes` as a pack in `format`
pub fn decode(bytes: &[u8], format: Format) -> Result<SenMLPack> {
    tracing::trace!(%format, len = bytes.len(), "decoding SenML pack");

    #[allow(unreachable_patterns)]
    match format {
        #[cfg(feature = "json")]
        Format::Json => crate::json::decode(bytes),
        #[cfg(feature = "cbor")]
        Format::Cbor => crate::cbor::decode(bytes),
        #[cfg(feature = "xml")]
        Format::Xml => crate::xml::decode(bytes),
        #[cfg(feature = "msgpack")]
        Format::MessagePack => crate::msgpack::decode(bytes),
        _ => Err(SenMLError::unsupported(format!("{format} input"))),
    }
}

/// Encode `pack` in `format`
pub fn encode(pack: &SenMLPack, format: Format, options: &OutputOptions) -> Result<Vec<u8>> {
    tracing::trace!(%format, records = pack.len(), "encoding SenML pack");

    #[allow(unreachable_patterns)]
    match format {
        #[cfg(feature = "json")]
        Format::Json => crate::json::encode(pack, options),
        #[cfg(feature = "cbor")]
        Format::Cbor => crate::cbor::encode(pack),
        #[cfg(feature = "xml")]
        Format::Xml => crate::xml::encode(pack, options),
        #[cfg(feature = "csv")]
        Format::Csv => crate::csv::encode(pack, options),
        #[cfg(feature = "msgpack")]
        Format::MessagePack => crate::msgpack::encode(pack),
        Format::LineProtocol => Ok(crate::linep::encode(pack, options)),
        _ => Err(SenMLError::unsupported(format!("{format} output"))),
    }
}
