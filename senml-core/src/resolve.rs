//! SenML resolution - expanding packs into self-contained records
//!
//! Resolution folds the base fields of the first record into every record
//! of the pack and strips them afterwards. The base values are carried in an
//! explicit [`BaseState`] threaded through a single left-to-right pass, so
//! packs can be resolved independently and concurrently.

use crate::{BaseValues, Result, SenMLError, SenMLPack, SenMLRecord, ValueKind};

/// Base values applied to each record during resolution.
///
/// Every field defaults to its identity (empty prefix, zero offset, no
/// unit), which is what makes resolving an already resolved pack a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseState {
    name: String,
    time: Option<f64>,
    unit: Option<String>,
    value: Option<f64>,
    sum: Option<f64>,
}

impl From<BaseValues> for BaseState {
    fn from(base: BaseValues) -> Self {
        Self {
            name: base.bn.unwrap_or_default(),
            time: base.bt,
            unit: base.bu.filter(|bu| !bu.is_empty()),
            value: base.bv,
            sum: base.bs,
        }
    }
}

impl BaseState {
    /// Produce the self-contained form of `record`
    pub fn apply(&self, record: &SenMLRecord) -> SenMLRecord {
        let name = format!("{}{}", self.name, record.n.as_deref().unwrap_or_default());

        let time = match (self.time, record.t) {
            (Some(bt), Some(t)) => Some(bt + t),
            (Some(bt), None) => Some(bt),
            (None, t) => t,
        };

        let value = match (record.value_kind(), record.v, self.value) {
            (ValueKind::Numeric, Some(v), Some(bv)) => Some(v + bv),
            (_, v, _) => v,
        };

        let sum = match (record.s, self.sum) {
            (Some(s), Some(bs)) => Some(s + bs),
            (s, _) => s,
        };

        SenMLRecord {
            n: (!name.is_empty()).then_some(name),
            u: record.u.clone().or_else(|| self.unit.clone()),
            v: value,
            vs: record.vs.clone(),
            vb: record.vb,
            vd: record.vd.clone(),
            s: sum,
            t: time,
            ut: record.ut,
            ..Default::default()
        }
    }
}

/// Resolve every record of `pack` against the base fields of its first record.
///
/// The input pack is left untouched. Records that only declare base fields,
/// without a value or a sum, are not carried into the output. Callers are
/// expected to validate first; a pack with base fields past the first record
/// is refused with [`SenMLError::Malformed`].
pub fn resolve(pack: &SenMLPack) -> Result<SenMLPack> {
    if let Some(index) = pack
        .iter()
        .skip(1)
        .position(SenMLRecord::has_base_fields)
    {
        return Err(SenMLError::malformed(format!(
            "base field on record at index {}",
            index + 1
        )));
    }

    let base = BaseState::from(pack.base_values());

    let records: Vec<SenMLRecord> = pack
        .iter()
        .filter(|record| !record.is_base_declaration())
        .map(|record| base.apply(record))
        .collect();

    tracing::trace!(
        input = pack.len(),
        output = records.len(),
        "resolved SenML pack"
    );

    Ok(SenMLPack { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SenMLBuilder;

    #[test]
    fn test_name_concatenation() {
        let pack = SenMLBuilder::new()
            .base_name("dev1/")
            .add_value("temp", 22.5)
            .build();

        let resolved = resolve(&pack).unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.records[0].n.as_deref(), Some("dev1/temp"));
        assert!(!resolved.has_base_values());
    }

    #[test]
    fn test_time_offset_is_not_cumulative() {
        let pack = SenMLBuilder::new()
            .base_name("dev1/")
            .base_time(1000.0)
            .add_measurement("temp", 20.0, 0.0)
            .add_measurement("temp", 21.0, 5.0)
            .build();

        let resolved = resolve(&pack).unwrap();
        let times: Vec<_> = resolved.iter().map(|r| r.t).collect();

        assert_eq!(times, vec![Some(1000.0), Some(1005.0)]);
    }

    #[test]
    fn test_missing_time_takes_base_time() {
        let pack = SenMLBuilder::new()
            .base_time(1000.0)
            .add_value("temp", 20.0)
            .build();

        let resolved = resolve(&pack).unwrap();
        assert_eq!(resolved.records[0].t, Some(1000.0));
    }

    #[test]
    fn test_missing_base_time_keeps_relative_time() {
        let pack = SenMLBuilder::new()
            .base_name("dev1/")
            .add_measurement("temp", 20.0, -5.0)
            .add_value("hum", 40.0)
            .build();

        let resolved = resolve(&pack).unwrap();
        assert_eq!(resolved.records[0].t, Some(-5.0));
        assert_eq!(resolved.records[1].t, None);
    }

    #[test]
    fn test_unit_fallback() {
        let pack = SenMLBuilder::new()
            .base_unit("Cel")
            .add_value("temp", 20.0)
            .add_record(SenMLRecord::with_value("hum", 40.0).with_unit("%RH"))
            .build();

        let resolved = resolve(&pack).unwrap();
        assert_eq!(resolved.records[0].u.as_deref(), Some("Cel"));
        assert_eq!(resolved.records[1].u.as_deref(), Some("%RH"));
    }

    #[test]
    fn test_sum_accumulation() {
        let pack = SenMLBuilder::new()
            .base_name("meter/")
            .base_sum(10.0)
            .add_sum("energy", 2.5, 0.0)
            .add_value("power", 3.0)
            .build();

        let resolved = resolve(&pack).unwrap();
        assert_eq!(resolved.records[0].s, Some(12.5));
        assert_eq!(resolved.records[1].s, None);
    }

    #[test]
    fn test_base_value_only_applies_to_numeric() {
        let pack = SenMLBuilder::new()
            .base_value(20.0)
            .add_value("temp", 2.5)
            .add_string_value("status", "OK")
            .build();

        let resolved = resolve(&pack).unwrap();
        assert_eq!(resolved.records[0].v, Some(22.5));
        assert_eq!(resolved.records[1].v, None);
        assert_eq!(resolved.records[1].vs.as_deref(), Some("OK"));
    }

    #[test]
    fn test_base_declaration_dropped() {
        let pack = SenMLBuilder::new()
            .base_name("dev1/")
            .base_version(10)
            .add_value("temp", 1.0)
            .build();
        assert_eq!(pack.len(), 2);

        let resolved = resolve(&pack).unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_header_without_base_name() {
        let pack: SenMLPack = vec![
            SenMLRecord {
                bt: Some(1_320_067_464.0),
                bu: Some("Cel".into()),
                ..Default::default()
            },
            SenMLRecord::with_value("temp", 20.0),
            SenMLRecord::with_value("hum", 21.0).with_time(5.0),
        ]
        .into();

        let resolved = resolve(&pack).unwrap();
        let names: Vec<_> = resolved.iter().map(|r| r.n.as_deref()).collect();
        assert_eq!(names, vec![Some("temp"), Some("hum")]);
        assert_eq!(resolved.records[1].t, Some(1_320_067_469.0));
        assert_eq!(resolved.records[1].u.as_deref(), Some("Cel"));
    }

    #[test]
    fn test_empty_base_unit_ignored() {
        let pack: SenMLPack = vec![SenMLRecord {
            bu: Some(String::new()),
            ..SenMLRecord::with_value("temp", 20.0)
        }]
        .into();

        let resolved = resolve(&pack).unwrap();
        assert_eq!(resolved.records, vec![SenMLRecord::with_value("temp", 20.0)]);
    }

    #[test]
    fn test_first_record_with_base_fields_and_value_kept() {
        let pack: SenMLPack = vec![
            SenMLRecord {
                bn: Some("dev1/".into()),
                bver: Some(10),
                ..SenMLRecord::with_value("temp", 20.0)
            },
            SenMLRecord::with_value("hum", 40.0),
        ]
        .into();

        let resolved = resolve(&pack).unwrap();
        assert_eq!(
            resolved.records,
            vec![
                SenMLRecord::with_value("dev1/temp", 20.0),
                SenMLRecord::with_value("dev1/hum", 40.0),
            ]
        );
    }

    #[test]
    fn test_empty_pack() {
        let resolved = resolve(&SenMLPack::new()).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let pack = SenMLBuilder::new()
            .base_name("dev1/")
            .base_time(1_640_995_200.0)
            .base_unit("Cel")
            .base_value(1.0)
            .base_sum(5.0)
            .add_measurement("temp", 20.0, 10.0)
            .add_sum("energy", 1.0, 20.0)
            .add_bool_value("door", false)
            .build();

        let once = resolve(&pack).unwrap();
        let twice = resolve(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_pack_untouched() {
        let pack = SenMLBuilder::new()
            .base_name("dev1/")
            .add_value("temp", 1.0)
            .build();
        let before = pack.clone();

        let _ = resolve(&pack).unwrap();
        assert_eq!(pack, before);
    }

    #[test]
    fn test_misplaced_base_field_refused() {
        let pack: SenMLPack = vec![
            SenMLRecord::with_value("a", 1.0),
            SenMLRecord {
                bu: Some("Cel".into()),
                ..SenMLRecord::with_value("b", 2.0)
            },
        ]
        .into();

        assert!(matches!(resolve(&pack), Err(SenMLError::Malformed { .. })));
    }
}
