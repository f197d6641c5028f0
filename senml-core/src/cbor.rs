//! CBOR serialization support for SenML
//!
//! Records are CBOR maps keyed by the integer labels of RFC 8428 §6. Text
//! keys are accepted on input as well, since some producers send the JSON
//! names unchanged. `vd` is written as text; on input a byte string is also
//! accepted and carried as unpadded base64url.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ciborium::value::Value;

use crate::format::Format;
use crate::{Result, SenMLError, SenMLPack, SenMLRecord};

/// CBOR integer labels (RFC 8428 Table 6)
pub mod labels {
    pub const BVER: i64 = -1;
    pub const BN: i64 = -2;
    pub const BT: i64 = -3;
    pub const BU: i64 = -4;
    pub const BV: i64 = -5;
    pub const BS: i64 = -6;
    pub const N: i64 = 0;
    pub const U: i64 = 1;
    pub const V: i64 = 2;
    pub const VS: i64 = 3;
    pub const VB: i64 = 4;
    pub const S: i64 = 5;
    pub const T: i64 = 6;
    pub const UT: i64 = 7;
    pub const VD: i64 = 8;

    /// Label for a JSON field name
    pub fn from_name(name: &str) -> Option<i64> {
        Some(match name {
            "bver" => BVER,
            "bn" => BN,
            "bt" => BT,
            "bu" => BU,
            "bv" => BV,
            "bs" => BS,
            "n" => N,
            "u" => U,
            "v" => V,
            "vs" => VS,
            "vb" => VB,
            "s" => S,
            "t" => T,
            "ut" => UT,
            "vd" => VD,
            _ => return None,
        })
    }
}

/// Serialize a pack to CBOR bytes
pub fn encode(pack: &SenMLPack) -> Result<Vec<u8>> {
    let value = Value::Array(pack.iter().map(record_to_value).collect());

    let mut buffer = Vec::new();
    ciborium::ser::into_writer(&value, &mut buffer)
        .map_err(|e| SenMLError::encode(Format::Cbor, e.to_string()))?;
    Ok(buffer)
}

/// Deserialize a pack from CBOR bytes
pub fn decode(bytes: &[u8]) -> Result<SenMLPack> {
    let value: Value = ciborium::de::from_reader(bytes)
        .map_err(|e| SenMLError::decode(Format::Cbor, e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(SenMLError::decode(Format::Cbor, "expected an array of records"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            record_from_value(item)
                .map_err(|message| SenMLError::decode(Format::Cbor, format!("record {index}: {message}")))
        })
        .collect()
}

fn record_to_value(record: &SenMLRecord) -> Value {
    let mut entries = Vec::new();
    let mut put = |label: i64, value: Value| entries.push((Value::Integer(label.into()), value));

    if let Some(bver) = record.bver {
        put(labels::BVER, Value::Integer(bver.into()));
    }
    if let Some(bn) = &record.bn {
        put(labels::BN, Value::Text(bn.clone()));
    }
    if let Some(bt) = record.bt {
        put(labels::BT, Value::Float(bt));
    }
    if let Some(bu) = &record.bu {
        put(labels::BU, Value::Text(bu.clone()));
    }
    if let Some(bv) = record.bv {
        put(labels::BV, Value::Float(bv));
    }
    if let Some(bs) = record.bs {
        put(labels::BS, Value::Float(bs));
    }
    if let Some(n) = &record.n {
        put(labels::N, Value::Text(n.clone()));
    }
    if let Some(u) = &record.u {
        put(labels::U, Value::Text(u.clone()));
    }
    if let Some(v) = record.v {
        put(labels::V, Value::Float(v));
    }
    if let Some(vs) = &record.vs {
        put(labels::VS, Value::Text(vs.clone()));
    }
    if let Some(vb) = record.vb {
        put(labels::VB, Value::Bool(vb));
    }
    if let Some(s) = record.s {
        put(labels::S, Value::Float(s));
    }
    if let Some(t) = record.t {
        put(labels::T, Value::Float(t));
    }
    if let Some(ut) = record.ut {
        put(labels::UT, Value::Float(ut));
    }
    if let Some(vd) = &record.vd {
        put(labels::VD, Value::Text(vd.clone()));
    }

    Value::Map(entries)
}

fn record_from_value(value: Value) -> std::result::Result<SenMLRecord, String> {
    let Value::Map(entries) = value else {
        return Err("expected a map".into());
    };

    let mut record = SenMLRecord::default();
    for (key, value) in entries {
        let label = match &key {
            Value::Integer(i) => i64::try_from(*i).ok(),
            Value::Text(name) => labels::from_name(name),
            _ => return Err("map keys must be integers or text".into()),
        };
        // Unknown labels are extensions this decoder does not understand
        let Some(label) = label else { continue };

        match label {
            labels::BVER => record.bver = Some(as_int(value, "bver")?),
            labels::BN => record.bn = Some(as_text(value, "bn")?),
            labels::BT => record.bt = Some(as_number(value, "bt")?),
            labels::BU => record.bu = Some(as_text(value, "bu")?),
            labels::BV => record.bv = Some(as_number(value, "bv")?),
            labels::BS => record.bs = Some(as_number(value, "bs")?),
            labels::N => record.n = Some(as_text(value, "n")?),
            labels::U => record.u = Some(as_text(value, "u")?),
            labels::V => record.v = Some(as_number(value, "v")?),
            labels::VS => record.vs = Some(as_text(value, "vs")?),
            labels::VB => record.vb = Some(as_bool(value, "vb")?),
            labels::S => record.s = Some(as_number(value, "s")?),
            labels::T => record.t = Some(as_number(value, "t")?),
            labels::UT => record.ut = Some(as_number(value, "ut")?),
            labels::VD => record.vd = Some(as_data(value)?),
            _ => {}
        }
    }

    Ok(record)
}

fn as_int(value: Value, field: &str) -> std::result::Result<i64, String> {
    match value {
        Value::Integer(i) => i64::try_from(i).map_err(|_| format!("'{field}' out of range")),
        _ => Err(format!("'{field}' must be an integer")),
    }
}

fn as_number(value: Value, field: &str) -> std::result::Result<f64, String> {
    match value {
        Value::Float(f) => Ok(f),
        Value::Integer(i) => Ok(i128::from(i) as f64),
        _ => Err(format!("'{field}' must be a number")),
    }
}

fn as_text(value: Value, field: &str) -> std::result::Result<String, String> {
    match value {
        Value::Text(s) => Ok(s),
        _ => Err(format!("'{field}' must be a text string")),
    }
}

fn as_data(value: Value) -> std::result::Result<String, String> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Bytes(b) => Ok(URL_SAFE_NO_PAD.encode(b)),
        _ => Err("'vd' must be a byte or text string".into()),
    }
}

fn as_bool(value: Value, field: &str) -> std::result::Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(b),
        _ => Err(format!("'{field}' must be a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SenMLBuilder;
    use ciborium::value::Integer;

    fn integer_map(entries: Vec<(i64, Value)>) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Value::Integer(Integer::from(k)), v))
                .collect(),
        )
    }

    #[test]
    fn test_cbor_roundtrip() {
        let pack = SenMLBuilder::new()
            .base_name("dev1/")
            .base_version(10)
            .add_value("temp", 25.0)
            .add_string_value("status", "OK")
            .add_bool_value("enabled", true)
            .build();

        let cbor = encode(&pack).unwrap();
        assert_eq!(decode(&cbor).unwrap(), pack);
    }

    #[test]
    fn test_cbor_uses_integer_labels() {
        let mut pack = SenMLPack::new();
        pack.add_record(SenMLRecord::with_value("temp", 1.5));

        let cbor = encode(&pack).unwrap();
        let value: Value = ciborium::de::from_reader(cbor.as_slice()).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![integer_map(vec![
                (labels::N, Value::Text("temp".into())),
                (labels::V, Value::Float(1.5)),
            ])])
        );
    }

    #[test]
    fn test_cbor_accepts_text_keys_and_integer_numbers() {
        let value = Value::Array(vec![Value::Map(vec![
            (Value::Text("n".into()), Value::Text("temp".into())),
            (Value::Text("v".into()), Value::Integer(21_i64.into())),
            (Value::Text("x-vendor".into()), Value::Bool(true)),
        ])]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).unwrap();

        let pack = decode(&bytes).unwrap();
        assert_eq!(pack.records, vec![SenMLRecord::with_value("temp", 21.0)]);
    }

    #[test]
    fn test_cbor_data_value_as_bytes() {
        let value = Value::Array(vec![integer_map(vec![
            (labels::N, Value::Text("blob".into())),
            (labels::VD, Value::Bytes(b"hello?".to_vec())),
        ])]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).unwrap();

        let pack = decode(&bytes).unwrap();
        assert_eq!(
            pack.records,
            vec![SenMLRecord::with_data_value("blob", "aGVsbG8_")]
        );
    }

    #[test]
    fn test_cbor_data_value_as_text() {
        let value = Value::Array(vec![integer_map(vec![
            (labels::N, Value::Text("blob".into())),
            (labels::VD, Value::Text("aGVsbG8".into())),
        ])]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).unwrap();

        let pack = decode(&bytes).unwrap();
        assert_eq!(pack.records[0].vd.as_deref(), Some("aGVsbG8"));
    }

    #[test]
    fn test_cbor_empty_array() {
        let cbor = encode(&SenMLPack::new()).unwrap();
        assert_eq!(cbor, vec![0x80]);
    }

    #[test]
    fn test_cbor_wrong_field_type() {
        let value = Value::Array(vec![integer_map(vec![(labels::VB, Value::Text("yes".into()))])]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&value, &mut bytes).unwrap();

        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("'vb' must be a boolean"));
    }

    #[test]
    fn test_cbor_not_an_array() {
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&Value::Text("nope".into()), &mut bytes).unwrap();
        assert!(matches!(
            decode(&bytes),
            Err(SenMLError::Decode {
                format: Format::Cbor,
                ..
            })
        ));
        assert!(decode(&[0xff, 0x00]).is_err());
    }
}
