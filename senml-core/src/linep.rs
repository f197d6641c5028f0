//! InfluxDB line protocol output for SenML packs
//!
//! Every record carrying a value or a sum becomes one point of the series
//! named by [`OutputOptions::topic`], tagged with the record name and unit:
//!
//! ```text
//! senml,n=dev1/temp,u=Cel v=22.5 1640995200000000000
//! ```

use crate::format::OutputOptions;
use crate::{SenMLPack, SenMLRecord, ValueKind};

/// Serialize a pack to line protocol. Records without a value or sum are skipped.
pub fn encode(pack: &SenMLPack, options: &OutputOptions) -> Vec<u8> {
    let mut out = String::new();
    for record in pack {
        if let Some(line) = point(record, &options.topic) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.into_bytes()
}

fn point(record: &SenMLRecord, topic: &str) -> Option<String> {
    let mut fields = Vec::with_capacity(2);
    match record.value_kind() {
        ValueKind::Numeric => fields.push(format!("v={}", record.v?)),
        ValueKind::String => fields.push(format!("vs={}", quote(record.vs.as_deref()?))),
        ValueKind::Boolean => fields.push(format!("vb={}", record.vb?)),
        ValueKind::Opaque => fields.push(format!("vd={}", quote(record.vd.as_deref()?))),
        ValueKind::None => {}
    }
    if let Some(s) = record.s {
        fields.push(format!("s={s}"));
    }
    if fields.is_empty() {
        return None;
    }

    let mut line = escape(topic, &[',', ' ']);
    if let Some(n) = &record.n {
        line.push_str(&format!(",n={}", escape(n, &[',', '=', ' '])));
    }
    if let Some(u) = &record.u {
        line.push_str(&format!(",u={}", escape(u, &[',', '=', ' '])));
    }
    line.push(' ');
    line.push_str(&fields.join(","));
    if let Some(t) = record.t {
        line.push_str(&format!(" {}", (t * 1e9) as i64));
    }

    Some(line)
}

fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s, &['"', '\\']))
}
