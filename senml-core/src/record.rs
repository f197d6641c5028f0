//! SenML Record types and values

use serde::{Deserialize, Serialize};

/// Times below 2^28 are relative, times at or above it are absolute (RFC 8428 §4.5.3)
pub const TIME_THRESHOLD: f64 = 268_435_456.0;

/// A SenML Record represents a single sensor measurement, a declaration of
/// base fields, or both.
///
/// Base fields (`bn`, `bt`, `bu`, `bv`, `bs`, `bver`) are only legal on the
/// first record of a pack, where they apply to every following record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SenMLRecord {
    /// Base Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bver: Option<i64>,

    /// Base Name - prepended to record names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bn: Option<String>,

    /// Base Time - added to record timestamps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bt: Option<f64>,

    /// Base Unit - used when a record has no unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bu: Option<String>,

    /// Base Value - added to numeric record values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bv: Option<f64>,

    /// Base Sum - added to sum values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bs: Option<f64>,

    /// Name - identifies the sensor or parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// Unit - SI unit or custom unit string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub u: Option<String>,

    /// Value - numeric measurement value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<f64>,

    /// String Value - textual measurement value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vs: Option<String>,

    /// Boolean Value - true/false measurement value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vb: Option<bool>,

    /// Data Value - base64 encoded binary data, kept opaque
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vd: Option<String>,

    /// Sum - integrated sum of values over time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<f64>,

    /// Time - timestamp, relative to base time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,

    /// Update Time - maximum time before next update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ut: Option<f64>,
}

/// Which of the mutually exclusive value fields a record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `v`
    Numeric,
    /// `vs`
    String,
    /// `vb`
    Boolean,
    /// `vd`
    Opaque,
    /// No value field; the record may still carry a sum
    None,
}

/// Union type for SenML values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SenMLValue {
    /// Numeric value
    Number(f64),
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Data value, still base64 encoded
    Data(String),
}

impl SenMLRecord {
    /// Create a new empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with a numeric value
    pub fn with_value<S: Into<String>>(name: S, value: f64) -> Self {
        Self {
            n: Some(name.into()),
            v: Some(value),
            ..Default::default()
        }
    }

    /// Create a record with a string value
    pub fn with_string_value<S: Into<String>, V: Into<String>>(name: S, value: V) -> Self {
        Self {
            n: Some(name.into()),
            vs: Some(value.into()),
            ..Default::default()
        }
    }

    /// Create a record with a boolean value
    pub fn with_bool_value<S: Into<String>>(name: S, value: bool) -> Self {
        Self {
            n: Some(name.into()),
            vb: Some(value),
            ..Default::default()
        }
    }

    /// Create a record with an already encoded data value
    pub fn with_data_value<S: Into<String>, D: Into<String>>(name: S, data: D) -> Self {
        Self {
            n: Some(name.into()),
            vd: Some(data.into()),
            ..Default::default()
        }
    }

    /// Set the name of this record
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.n = Some(name.into());
        self
    }

    /// Set the unit for this record
    pub fn with_unit<S: Into<String>>(mut self, unit: S) -> Self {
        self.u = Some(unit.into());
        self
    }

    /// Set the timestamp for this record
    pub fn with_time(mut self, time: f64) -> Self {
        self.t = Some(time);
        self
    }

    /// Set the sum value for this record
    pub fn with_sum(mut self, sum: f64) -> Self {
        self.s = Some(sum);
        self
    }

    /// Set update time for this record
    pub fn with_update_time(mut self, ut: f64) -> Self {
        self.ut = Some(ut);
        self
    }

    /// True if any base field is set. Empty `bn` and `bu` count as absent.
    pub fn has_base_fields(&self) -> bool {
        self.bver.is_some()
            || self.bn.as_deref().is_some_and(|bn| !bn.is_empty())
            || self.bt.is_some()
            || self.bu.as_deref().is_some_and(|bu| !bu.is_empty())
            || self.bv.is_some()
            || self.bs.is_some()
    }

    /// True if the record only declares base fields, with no value and no sum.
    /// Such records never appear in resolved output.
    pub fn is_base_declaration(&self) -> bool {
        self.has_base_fields() && !self.has_value() && self.s.is_none()
    }

    /// The populated value field. If several are set the first of
    /// `v`, `vs`, `vb`, `vd` wins; the validator flags that case.
    pub fn value_kind(&self) -> ValueKind {
        if self.v.is_some() {
            ValueKind::Numeric
        } else if self.vs.is_some() {
            ValueKind::String
        } else if self.vb.is_some() {
            ValueKind::Boolean
        } else if self.vd.is_some() {
            ValueKind::Opaque
        } else {
            ValueKind::None
        }
    }

    /// Number of value fields set, at most one on a valid record
    pub fn value_field_count(&self) -> usize {
        [
            self.v.is_some(),
            self.vs.is_some(),
            self.vb.is_some(),
            self.vd.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Get the primary value from this record
    pub fn value(&self) -> Option<SenMLValue> {
        match self.value_kind() {
            ValueKind::Numeric => self.v.map(SenMLValue::Number),
            ValueKind::String => self.vs.clone().map(SenMLValue::String),
            ValueKind::Boolean => self.vb.map(SenMLValue::Boolean),
            ValueKind::Opaque => self.vd.clone().map(SenMLValue::Data),
            ValueKind::None => None,
        }
    }

    /// Check if this record has a value
    pub fn has_value(&self) -> bool {
        self.value_kind() != ValueKind::None
    }

    /// Get the name of this record, resolving with base name if needed
    pub fn resolved_name(&self, base_name: Option<&str>) -> String {
        let mut name = base_name.unwrap_or_default().to_string();
        if let Some(n) = &self.n {
            name.push_str(n);
        }
        name
    }
}

impl From<SenMLValue> for SenMLRecord {
    fn from(value: SenMLValue) -> Self {
        match value {
            SenMLValue::Number(n) => Self {
                v: Some(n),
                ..Default::default()
            },
            SenMLValue::String(s) => Self {
                vs: Some(s),
                ..Default::default()
            },
            SenMLValue::Boolean(b) => Self {
                vb: Some(b),
                ..Default::default()
            },
            SenMLValue::Data(d) => Self {
                vd: Some(d),
                ..Default::default()
            },
        }
    }
}

/// Check if a time value is relative (< 2^28)
pub fn is_relative_time(time: f64) -> bool {
    time < TIME_THRESHOLD
}

/// Check if a time value is an absolute Unix timestamp (>= 2^28)
pub fn is_absolute_time(time: f64) -> bool {
    time >= TIME_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = SenMLRecord::with_value("temperature", 22.5);
        assert_eq!(record.n, Some("temperature".to_string()));
        assert_eq!(record.v, Some(22.5));
        assert!(!record.has_base_fields());
    }

    #[test]
    fn test_record_with_unit() {
        let record = SenMLRecord::with_value("temperature", 22.5).with_unit("Cel");
        assert_eq!(record.u, Some("Cel".to_string()));
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(
            SenMLRecord::with_value("a", 1.0).value_kind(),
            ValueKind::Numeric
        );
        assert_eq!(
            SenMLRecord::with_string_value("a", "on").value_kind(),
            ValueKind::String
        );
        assert_eq!(
            SenMLRecord::with_bool_value("a", true).value_kind(),
            ValueKind::Boolean
        );
        assert_eq!(
            SenMLRecord::with_data_value("a", "aGVsbG8=").value_kind(),
            ValueKind::Opaque
        );
        assert_eq!(
            SenMLRecord::new().with_name("a").with_sum(3.0).value_kind(),
            ValueKind::None
        );
    }

    #[test]
    fn test_value_field_count() {
        let mut record = SenMLRecord::with_value("a", 1.0);
        assert_eq!(record.value_field_count(), 1);
        record.vs = Some("x".into());
        assert_eq!(record.value_field_count(), 2);
        assert_eq!(record.value_kind(), ValueKind::Numeric);
    }

    #[test]
    fn test_has_base_fields() {
        let record = SenMLRecord {
            bu: Some("Cel".into()),
            ..Default::default()
        };
        assert!(record.has_base_fields());

        let record = SenMLRecord {
            bver: Some(10),
            ..Default::default()
        };
        assert!(record.has_base_fields());
    }

    #[test]
    fn test_empty_base_strings_are_absent() {
        let record = SenMLRecord {
            bn: Some(String::new()),
            bu: Some(String::new()),
            ..SenMLRecord::with_value("temp", 1.0)
        };
        assert!(!record.has_base_fields());
    }

    #[test]
    fn test_base_declaration() {
        let header = SenMLRecord {
            bt: Some(1_320_067_464.0),
            bu: Some("Cel".into()),
            ..Default::default()
        };
        assert!(header.is_base_declaration());

        let with_value = SenMLRecord {
            bt: Some(1_320_067_464.0),
            ..SenMLRecord::with_value("temp", 20.0)
        };
        assert!(!with_value.is_base_declaration());

        let with_sum = SenMLRecord {
            bs: Some(10.0),
            ..SenMLRecord::new().with_name("energy").with_sum(1.0)
        };
        assert!(!with_sum.is_base_declaration());

        assert!(!SenMLRecord::new().is_base_declaration());
    }

    #[test]
    fn test_value_accessor() {
        let record = SenMLRecord::with_bool_value("enabled", true);
        assert_eq!(record.value(), Some(SenMLValue::Boolean(true)));
        assert_eq!(SenMLRecord::new().value(), None);
    }

    #[test]
    fn test_resolved_name() {
        let record = SenMLRecord::with_value("temp", 25.0);
        assert_eq!(record.resolved_name(Some("device1/")), "device1/temp");
        assert_eq!(record.resolved_name(None), "temp");
        assert_eq!(SenMLRecord::new().resolved_name(None), "");
    }

    #[test]
    fn test_time_classification() {
        assert!(is_relative_time(1000.0));
        assert!(is_relative_time(-60.0));
        assert!(is_absolute_time(1640995200.0));
        assert!(is_absolute_time(TIME_THRESHOLD));
    }
}
