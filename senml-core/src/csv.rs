//! CSV output for SenML packs
//!
//! One row per record. Absent fields are written as empty cells so every row
//! has the same columns; the header row is only written in pretty mode.

use crate::format::{Format, OutputOptions};
use crate::{Result, SenMLError, SenMLPack, SenMLRecord};

/// Column names, in output order
pub const HEADER: [&str; 8] = [
    "name",
    "time",
    "unit",
    "value",
    "sum",
    "string_value",
    "bool_value",
    "data_value",
];

/// Serialize a pack to CSV
pub fn encode(pack: &SenMLPack, options: &OutputOptions) -> Result<Vec<u8>> {
    let err = |e: &dyn std::fmt::Display| SenMLError::encode(Format::Csv, e.to_string());

    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if options.pretty && !pack.is_empty() {
        writer.write_record(HEADER).map_err(|e| err(&e))?;
    }
    for record in pack {
        writer.write_record(row(record)).map_err(|e| err(&e))?;
    }

    writer.into_inner().map_err(|e| err(&e))
}

fn row(record: &SenMLRecord) -> [String; 8] {
    fn num(value: Option<f64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    [
        record.n.clone().unwrap_or_default(),
        num(record.t),
        record.u.clone().unwrap_or_default(),
        num(record.v),
        num(record.s),
        record.vs.clone().unwrap_or_default(),
        record.vb.map(|b| b.to_string()).unwrap_or_default(),
        record.vd.clone().unwrap_or_default(),
    ]
}
