//! SenML Pack - ordered collection of SenML records

use serde::{Deserialize, Serialize};

use crate::{Result, SenMLRecord, ValidationError};

/// A SenML Pack represents an ordered collection of SenML records
///
/// According to RFC 8428, a SenML Pack is an array of SenML Records. The first
/// record can contain base values (fields starting with 'b') that apply to
/// subsequent records, reducing redundancy in the representation. Record
/// order is significant and is preserved by every codec.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenMLPack {
    /// Array of SenML records
    pub records: Vec<SenMLRecord>,
}

/// Base values declared by the first record of a pack
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BaseValues {
    /// Base Name - prepended to record names
    pub bn: Option<String>,
    /// Base Time - added to record timestamps
    pub bt: Option<f64>,
    /// Base Unit - used when record has no unit
    pub bu: Option<String>,
    /// Base Value - added to numeric record values
    pub bv: Option<f64>,
    /// Base Sum - added to sum values
    pub bs: Option<f64>,
    /// Base Version - SenML version number
    pub bver: Option<i64>,
}

impl From<&SenMLRecord> for BaseValues {
    fn from(record: &SenMLRecord) -> Self {
        Self {
            bn: record.bn.clone(),
            bt: record.bt,
            bu: record.bu.clone(),
            bv: record.bv,
            bs: record.bs,
            bver: record.bver,
        }
    }
}

impl SenMLPack {
    /// Create a new empty pack
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Add a record to this pack
    pub fn add_record(&mut self, record: SenMLRecord) {
        self.records.push(record);
    }

    /// Add multiple records to this pack
    pub fn add_records<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = SenMLRecord>,
    {
        self.records.extend(records);
    }

    /// Get base values from the first record (if any)
    pub fn base_values(&self) -> BaseValues {
        self.records
            .first()
            .map(BaseValues::from)
            .unwrap_or_default()
    }

    /// Check if any record of this pack carries base fields
    pub fn has_base_values(&self) -> bool {
        self.records.iter().any(SenMLRecord::has_base_fields)
    }

    /// Get the number of records in this pack
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if this pack is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in this pack
    pub fn iter(&self) -> impl Iterator<Item = &SenMLRecord> {
        self.records.iter()
    }

    /// Get a mutable iterator over records
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SenMLRecord> {
        self.records.iter_mut()
    }

    /// Validate this pack according to RFC 8428, collecting every violation
    pub fn validate(&self) -> Vec<ValidationError> {
        crate::validation::validate(self)
    }

    /// Resolve base fields into every record
    pub fn resolve(&self) -> Result<SenMLPack> {
        crate::resolve::resolve(self)
    }
}

impl FromIterator<SenMLRecord> for SenMLPack {
    fn from_iter<I: IntoIterator<Item = SenMLRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<SenMLRecord>> for SenMLPack {
    fn from(records: Vec<SenMLRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for SenMLPack {
    type Item = SenMLRecord;
    type IntoIter = std::vec::IntoIter<SenMLRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a SenMLPack {
    type Item = &'a SenMLRecord;
    type IntoIter = std::slice::Iter<'a, SenMLRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
