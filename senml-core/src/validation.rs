//! Structural validation of SenML packs according to RFC 8428
//!
//! Validation is collect-all: every check runs against every record and the
//! full list of violations is returned, ordered by record index and then by
//! check category.

use thiserror::Error;

use crate::{SenMLPack, SenMLRecord};

/// Default SenML version (RFC 8428)
pub const DEFAULT_SENML_VERSION: i64 = 10;

/// A single structural defect in a pack
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Base fields are only allowed on the first record
    #[error("base field on record at index {index}, only the first record may carry base fields")]
    BaseFieldMisplaced { index: usize },

    /// `bver` does not match the version this validator accepts
    #[error("unsupported SenML version {found} (expected {expected})")]
    UnsupportedVersion { found: i64, expected: i64 },

    /// More than one of `v`, `vs`, `vb`, `vd` is set
    #[error("record at index {index} carries more than one value field")]
    AmbiguousValueKind { index: usize },

    /// Base name plus record name is empty or has no name segment
    #[error("record at index {index} resolves to an empty name")]
    MissingName { index: usize },

    /// Resolved name uses characters RFC 8428 does not allow
    #[error("record at index {index} resolves to invalid name '{name}'")]
    InvalidName { index: usize, name: String },

    /// A numeric field is NaN or infinite
    #[error("record at index {index} has non-finite value in '{field}'")]
    NonFiniteNumber { index: usize, field: &'static str },
}

impl ValidationError {
    /// Index of the offending record, if the error is tied to one
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::BaseFieldMisplaced { index }
            | Self::AmbiguousValueKind { index }
            | Self::MissingName { index }
            | Self::InvalidName { index, .. }
            | Self::NonFiniteNumber { index, .. } => Some(*index),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

/// Validator for SenML packs
#[derive(Debug, Clone)]
pub struct PackValidator {
    /// Version `bver` must match
    pub expected_version: i64,
}

impl Default for PackValidator {
    fn default() -> Self {
        Self {
            expected_version: DEFAULT_SENML_VERSION,
        }
    }
}

impl PackValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept packs declaring a different `bver`
    pub fn expected_version(mut self, version: i64) -> Self {
        self.expected_version = version;
        self
    }

    /// Validate a pack, returning every violation found
    pub fn validate_pack(&self, pack: &SenMLPack) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let base_name = pack.records.first().and_then(|r| r.bn.as_deref());

        for (index, record) in pack.iter().enumerate() {
            self.check_base_fields(index, record, &mut errors);
            self.check_version(record, &mut errors);
            self.check_value_kind(index, record, &mut errors);
            self.check_name(index, record, base_name, &mut errors);
            self.check_numbers(index, record, &mut errors);
        }

        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "SenML pack failed validation");
        }

        errors
    }

    fn check_base_fields(
        &self,
        index: usize,
        record: &SenMLRecord,
        errors: &mut Vec<ValidationError>,
    ) {
        if index > 0 && record.has_base_fields() {
            errors.push(ValidationError::BaseFieldMisplaced { index });
        }
    }

    fn check_version(&self, record: &SenMLRecord, errors: &mut Vec<ValidationError>) {
        if let Some(found) = record.bver {
            if found != self.expected_version {
                errors.push(ValidationError::UnsupportedVersion {
                    found,
                    expected: self.expected_version,
                });
            }
        }
    }

    fn check_value_kind(
        &self,
        index: usize,
        record: &SenMLRecord,
        errors: &mut Vec<ValidationError>,
    ) {
        if record.value_field_count() > 1 {
            errors.push(ValidationError::AmbiguousValueKind { index });
        }
    }

    fn check_name(
        &self,
        index: usize,
        record: &SenMLRecord,
        base_name: Option<&str>,
        errors: &mut Vec<ValidationError>,
    ) {
        // Base declarations are dropped on resolution and need no name
        if record.is_base_declaration() {
            return;
        }

        let name = record.resolved_name(base_name);
        if name.chars().all(|c| c == '/') {
            errors.push(ValidationError::MissingName { index });
        } else if !is_valid_name(&name) {
            errors.push(ValidationError::InvalidName { index, name });
        }
    }

    fn check_numbers(&self, index: usize, record: &SenMLRecord, errors: &mut Vec<ValidationError>) {
        let fields = [
            ("bt", record.bt),
            ("bv", record.bv),
            ("bs", record.bs),
            ("v", record.v),
            ("s", record.s),
            ("t", record.t),
            ("ut", record.ut),
        ];
        for (field, value) in fields {
            if value.is_some_and(|v| !v.is_finite()) {
                errors.push(ValidationError::NonFiniteNumber { index, field });
            }
        }
    }
}

/// Validate a pack against the default version
pub fn validate(pack: &SenMLPack) -> Vec<ValidationError> {
    PackValidator::default().validate_pack(pack)
}

/// Check a resolved name against the RFC 8428 character set
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.' | '/' | '_'))
}
