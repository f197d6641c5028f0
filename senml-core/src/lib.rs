//! # senml-core - Sensor Measurement Lists for Rust
//!
//! An implementation of the record model of [RFC 8428](https://tools.ietf.org/html/rfc8428),
//! Sensor Measurement Lists (SenML), together with the pieces needed to move
//! packs between wire formats:
//!
//! - **Validation**: collect every structural defect of a pack in one pass
//! - **Resolution**: fold base fields into self-contained records
//! - **Formats**: JSON, CBOR, XML and MessagePack in both directions, CSV
//!   and InfluxDB line protocol as output only
//!
//! ## Quick Start
//!
//! ```rust
//! use senml_core::{Format, OutputOptions, SenMLBuilder, Result};
//!
//! fn example() -> Result<()> {
//!     let pack = SenMLBuilder::new()
//!         .base_name("urn:dev:sensor1:")
//!         .base_unit("Cel")
//!         .add_value("temperature", 22.5)
//!         .build();
//!
//!     assert!(pack.validate().is_empty());
//!     let resolved = pack.resolve()?;
//!     assert_eq!(resolved.records[0].n.as_deref(), Some("urn:dev:sensor1:temperature"));
//!
//!     let json = senml_core::encode(&resolved, Format::Json, &OutputOptions::default())?;
//!     println!("{}", String::from_utf8_lossy(&json));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## SenML Data Model
//!
//! A pack is an ordered array of records, where each record can contain:
//! - **Base fields** (bn, bt, bu, bv, bs, bver), legal on the first record only
//! - **Record fields** (n, u, v, vs, vb, vd, s, t, ut)

pub mod builder;
pub mod error;
pub mod format;
pub mod linep;
pub mod pack;
pub mod record;
pub mod resolve;
pub mod validation;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "cbor")]
pub mod cbor;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "msgpack")]
pub mod msgpack;

#[cfg(feature = "csv")]
pub mod csv;

// Re-export main types
pub use builder::SenMLBuilder;
pub use error::{Result, SenMLError};
pub use format::{Format, OutputOptions, decode, encode};
pub use pack::{BaseValues, SenMLPack};
pub use record::{SenMLRecord, SenMLValue, ValueKind};
pub use resolve::resolve;
pub use validation::{PackValidator, ValidationError, validate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_validate_resolve_encode() {
        let input = br#"[{"bn":"dev1/","bt":1000,"bu":"Cel","n":"temp","v":20},{"n":"temp","t":5,"v":21}]"#;

        let pack = decode(input, Format::Json).unwrap();
        assert!(validate(&pack).is_empty());

        let resolved = resolve(&pack).unwrap();
        let out = encode(&resolved, Format::Json, &OutputOptions::default()).unwrap();
        assert_eq!(
            std::str::from_utf8(&out).unwrap(),
            concat!(
                r#"[{"n":"dev1/temp","u":"Cel","v":20.0,"t":1000.0},"#,
                r#"{"n":"dev1/temp","u":"Cel","v":21.0,"t":1005.0}]"#
            )
        );
    }
}
