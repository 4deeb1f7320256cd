//! Compact columnar weapon codec for shipping decoded weapons over the wire.
//!
//! Top level: `[stringTable, records]`. A record is a positional tuple:
//!
//! | pos | content |
//! |----:|---------|
//! | 0 | name (string index) |
//! | 1 | weight |
//! | 2 | highest upgrade level shipped |
//! | 3 | upgrade path max (25 standard, 10 somber) |
//! | 4 | base weapon name (string index) |
//! | 5 | affinity index |
//! | 6 | weapon type index |
//! | 7 | requirements by attribute |
//! | 8 | damage attack by level, each by damage type |
//! | 9 | attribute scaling by level, each by attribute |
//! | 10 | scaling attribute indices by attack power type |
//! | 11 | curve id by attack power type (-1 = none) |
//! | 12 | status buildup by level, each by status type |
//! | 13 | flags: paired 1, sorcery tool 2, incantation tool 4 |
//!
//! Every array drops trailing defaults (0, -1 or `[]`), including the record itself
//! from position 7 on. Decoders treat missing entries as defaults, and defaults as
//! absent.

use crate::config::{DEFAULT_MAX_UPGRADE_LEVEL, SOMBER_MAX_UPGRADE_LEVEL};
use crate::model::{
    Affinity, AttackPowerRecord, AttackPowerType, Attribute, PerAttackPower, PerAttribute,
    Weapon, WeaponType,
};
use serde_json::{json, Value};
use std::collections::HashMap;

pub const FLAG_PAIRED: u64 = 1;
pub const FLAG_SORCERY_TOOL: u64 = 2;
pub const FLAG_INCANTATION_TOOL: u64 = 4;

/// First position that may be truncated from the end of a record.
const FIRST_OPTIONAL_SLOT: usize = 7;

/// Highest upgrade level a record may claim in positions 2 and 3.
pub const MAX_RECORD_UPGRADE_LEVEL: usize = 99;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("expected a two-element array [stringTable, records]")]
    TopLevel,
    #[error("record {record}: {field} is missing or malformed")]
    Field { record: usize, field: &'static str },
    #[error("record {record}: string index {index} out of range")]
    StringIndex { record: usize, index: u64 },
    #[error("record {record}: unknown affinity index {index}")]
    UnknownAffinity { record: usize, index: u64 },
    #[error("record {record}: unknown weapon type index {index}")]
    UnknownWeaponType { record: usize, index: u64 },
    #[error("record {record}: unknown attribute index {index}")]
    UnknownAttribute { record: usize, index: u64 },
    #[error("record {record}: {field} has {len} entries, expected at most {max}")]
    TooLong {
        record: usize,
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("invalid JSON: {0}")]
    Json(String),
}

/// Interned strings, in first-seen order.
#[derive(Debug, Default)]
pub struct StringTable {
    strings: Vec<String>,
    index: HashMap<String, usize>,
}

impl StringTable {
    pub fn intern(&mut self, s: &str) -> usize {
        if let Some(&i) = self.index.get(s) {
            return i;
        }
        let i = self.strings.len();
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), i);
        i
    }

    pub fn into_vec(self) -> Vec<String> {
        self.strings
    }
}

fn truncate_trailing(mut values: Vec<Value>, is_default: impl Fn(&Value) -> bool) -> Vec<Value> {
    while values.last().map(&is_default).unwrap_or(false) {
        values.pop();
    }
    values
}

fn is_zero(v: &Value) -> bool {
    v.as_f64() == Some(0.0)
}

fn is_empty_array(v: &Value) -> bool {
    v.as_array().map(|a| a.is_empty()).unwrap_or(false)
}

fn is_none_curve(v: &Value) -> bool {
    v.as_i64() == Some(-1)
}

fn number(v: f64) -> Value {
    json!(v)
}

fn encode_values(values: impl Iterator<Item = f64>) -> Value {
    Value::Array(truncate_trailing(values.map(number).collect(), is_zero))
}

fn encode_levels(levels: Vec<Value>) -> Value {
    Value::Array(truncate_trailing(levels, is_empty_array))
}

fn upgrade_path_max(weapon: &Weapon) -> usize {
    if weapon.is_somber() {
        SOMBER_MAX_UPGRADE_LEVEL
    } else {
        DEFAULT_MAX_UPGRADE_LEVEL.max(weapon.max_upgrade_level())
    }
}

/// Encode one weapon into its positional record, interning names into `strings`.
pub fn encode_weapon(weapon: &Weapon, strings: &mut StringTable) -> Value {
    let requirements = Value::Array(truncate_trailing(
        weapon.requirements.0.iter().map(|&r| json!(r)).collect(),
        is_zero,
    ));
    let attack = encode_levels(
        weapon
            .attack
            .iter()
            .map(|level| {
                encode_values(
                    AttackPowerType::DAMAGE_TYPES
                        .iter()
                        .map(|&t| level[t].unwrap_or(0.0)),
                )
            })
            .collect(),
    );
    let scaling = encode_levels(
        weapon
            .attribute_scaling
            .iter()
            .map(|level| encode_values(level.0.iter().copied()))
            .collect(),
    );
    let scaling_attributes = Value::Array(truncate_trailing(
        weapon
            .attack_element_correct
            .0
            .iter()
            .map(|attrs| json!(attrs.iter().map(|a| a.index()).collect::<Vec<_>>()))
            .collect(),
        is_empty_array,
    ));
    let curves = Value::Array(truncate_trailing(
        weapon
            .calc_correct_graph_ids
            .0
            .iter()
            .map(|id| id.map(|id| json!(id)).unwrap_or_else(|| json!(-1)))
            .collect(),
        is_none_curve,
    ));
    let status = encode_levels(
        weapon
            .attack
            .iter()
            .map(|level| {
                encode_values(
                    AttackPowerType::STATUS_TYPES
                        .iter()
                        .map(|&t| level[t].unwrap_or(0.0)),
                )
            })
            .collect(),
    );
    let mut flags = 0;
    if weapon.paired {
        flags |= FLAG_PAIRED;
    }
    if weapon.sorcery_tool {
        flags |= FLAG_SORCERY_TOOL;
    }
    if weapon.incantation_tool {
        flags |= FLAG_INCANTATION_TOOL;
    }

    let mut record = vec![
        json!(strings.intern(&weapon.name)),
        number(weapon.weight),
        json!(weapon.max_upgrade_level()),
        json!(upgrade_path_max(weapon)),
        json!(strings.intern(&weapon.weapon_name)),
        json!(weapon.affinity.index()),
        json!(weapon.weapon_type.index()),
        requirements,
        attack,
        scaling,
        scaling_attributes,
        curves,
        status,
        json!(flags),
    ];
    while record.len() > FIRST_OPTIONAL_SLOT {
        let last = &record[record.len() - 1];
        if is_empty_array(last) || last.as_u64() == Some(0) {
            record.pop();
        } else {
            break;
        }
    }
    Value::Array(record)
}

/// Encode a weapon list into `[stringTable, records]`.
pub fn encode_weapons(weapons: &[Weapon]) -> Value {
    let mut strings = StringTable::default();
    let records: Vec<Value> = weapons
        .iter()
        .map(|w| encode_weapon(w, &mut strings))
        .collect();
    json!([strings.into_vec(), records])
}

pub fn encode_weapons_string(weapons: &[Weapon]) -> Result<String, CodecError> {
    serde_json::to_string(&encode_weapons(weapons)).map_err(|e| CodecError::Json(e.to_string()))
}

struct RecordReader<'a> {
    slots: &'a [Value],
    record: usize,
}

impl<'a> RecordReader<'a> {
    fn field(&self, field: &'static str) -> CodecError {
        CodecError::Field {
            record: self.record,
            field,
        }
    }

    fn required(&self, pos: usize, field: &'static str) -> Result<&'a Value, CodecError> {
        self.slots.get(pos).ok_or_else(|| self.field(field))
    }

    fn u64(&self, pos: usize, field: &'static str) -> Result<u64, CodecError> {
        self.required(pos, field)?
            .as_u64()
            .ok_or_else(|| self.field(field))
    }

    /// Upgrade level slot, bounded by [`MAX_RECORD_UPGRADE_LEVEL`].
    fn upgrade_level(&self, pos: usize, field: &'static str) -> Result<usize, CodecError> {
        let level = self.u64(pos, field)?;
        match usize::try_from(level) {
            Ok(level) if level <= MAX_RECORD_UPGRADE_LEVEL => Ok(level),
            _ => Err(CodecError::TooLong {
                record: self.record,
                field,
                len: usize::try_from(level).unwrap_or(usize::MAX),
                max: MAX_RECORD_UPGRADE_LEVEL,
            }),
        }
    }

    /// Optional array slot; missing means empty.
    fn array(&self, pos: usize, field: &'static str) -> Result<&'a [Value], CodecError> {
        match self.slots.get(pos) {
            None => Ok(&[]),
            Some(v) => v
                .as_array()
                .map(|a| a.as_slice())
                .ok_or_else(|| self.field(field)),
        }
    }

    fn string(&self, pos: usize, field: &'static str, strings: &[String]) -> Result<String, CodecError> {
        let index = self.u64(pos, field)?;
        strings
            .get(index as usize)
            .cloned()
            .ok_or(CodecError::StringIndex {
                record: self.record,
                index,
            })
    }

    fn numbers(&self, values: &[Value], field: &'static str, max: usize) -> Result<Vec<f64>, CodecError> {
        if values.len() > max {
            return Err(CodecError::TooLong {
                record: self.record,
                field,
                len: values.len(),
                max,
            });
        }
        values
            .iter()
            .map(|v| v.as_f64().ok_or_else(|| self.field(field)))
            .collect()
    }

    /// Per-level arrays, padded with empty levels up to `levels`.
    fn levels(&self, pos: usize, field: &'static str, levels: usize) -> Result<Vec<&'a [Value]>, CodecError> {
        let outer = self.array(pos, field)?;
        if outer.len() > levels {
            return Err(CodecError::TooLong {
                record: self.record,
                field,
                len: outer.len(),
                max: levels,
            });
        }
        let mut out = Vec::with_capacity(levels);
        for i in 0..levels {
            match outer.get(i) {
                Some(v) => out.push(v.as_array().map(|a| a.as_slice()).ok_or_else(|| self.field(field))?),
                None => out.push(&[][..]),
            }
        }
        Ok(out)
    }
}

fn nonzero(v: f64) -> Option<f64> {
    if v != 0.0 {
        Some(v)
    } else {
        None
    }
}

fn decode_record(slots: &[Value], record: usize, strings: &[String]) -> Result<Weapon, CodecError> {
    let r = RecordReader { slots, record };

    let name = r.string(0, "name", strings)?;
    let weight = r
        .required(1, "weight")?
        .as_f64()
        .ok_or_else(|| r.field("weight"))?;
    let upgrade_level = r.upgrade_level(2, "upgrade level")?;
    let path_max = r.upgrade_level(3, "max upgrade level")?;
    if upgrade_level > path_max {
        return Err(CodecError::TooLong {
            record,
            field: "upgrade level",
            len: upgrade_level,
            max: path_max,
        });
    }
    let weapon_name = r.string(4, "base name", strings)?;
    let affinity_index = r.u64(5, "affinity")?;
    let affinity = Affinity::from_index(affinity_index as usize).ok_or(CodecError::UnknownAffinity {
        record,
        index: affinity_index,
    })?;
    let type_index = r.u64(6, "weapon type")?;
    let weapon_type =
        WeaponType::from_index(type_index as usize).ok_or(CodecError::UnknownWeaponType {
            record,
            index: type_index,
        })?;

    let mut requirements = PerAttribute::default();
    let values = r.array(7, "requirements")?;
    if values.len() > Attribute::ALL.len() {
        return Err(CodecError::TooLong {
            record,
            field: "requirements",
            len: values.len(),
            max: Attribute::ALL.len(),
        });
    }
    for (attr, v) in Attribute::ALL.iter().zip(values) {
        requirements[*attr] = v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| r.field("requirements"))?;
    }

    let level_count = upgrade_level
        .checked_add(1)
        .ok_or_else(|| r.field("upgrade level"))?;
    let mut attack: Vec<AttackPowerRecord> = vec![PerAttackPower::default(); level_count];
    for (level, values) in r.levels(8, "attack", level_count)?.into_iter().enumerate() {
        let values = r.numbers(values, "attack", AttackPowerType::DAMAGE_TYPES.len())?;
        for (t, v) in AttackPowerType::DAMAGE_TYPES.iter().zip(values) {
            attack[level][*t] = nonzero(v);
        }
    }
    for (level, values) in r.levels(12, "status", level_count)?.into_iter().enumerate() {
        let values = r.numbers(values, "status", AttackPowerType::STATUS_TYPES.len())?;
        for (t, v) in AttackPowerType::STATUS_TYPES.iter().zip(values) {
            attack[level][*t] = nonzero(v);
        }
    }

    let mut attribute_scaling = Vec::with_capacity(level_count);
    for values in r.levels(9, "scaling", level_count)? {
        let values = r.numbers(values, "scaling", Attribute::ALL.len())?;
        let mut scaling = PerAttribute([0.0; 5]);
        for (attr, v) in Attribute::ALL.iter().zip(values) {
            scaling[*attr] = v;
        }
        attribute_scaling.push(scaling);
    }

    let mut attack_element_correct: PerAttackPower<Vec<Attribute>> = PerAttackPower::default();
    let lists = r.array(10, "scaling attributes")?;
    if lists.len() > AttackPowerType::ALL.len() {
        return Err(CodecError::TooLong {
            record,
            field: "scaling attributes",
            len: lists.len(),
            max: AttackPowerType::ALL.len(),
        });
    }
    for (t, list) in AttackPowerType::ALL.iter().zip(lists) {
        let list = list.as_array().ok_or_else(|| r.field("scaling attributes"))?;
        for v in list {
            let index = v.as_u64().ok_or_else(|| r.field("scaling attributes"))?;
            let attr = Attribute::from_index(index as usize)
                .ok_or(CodecError::UnknownAttribute { record, index })?;
            attack_element_correct[*t].push(attr);
        }
    }

    let mut calc_correct_graph_ids: PerAttackPower<Option<u32>> = PerAttackPower::default();
    let curves = r.array(11, "curves")?;
    if curves.len() > AttackPowerType::ALL.len() {
        return Err(CodecError::TooLong {
            record,
            field: "curves",
            len: curves.len(),
            max: AttackPowerType::ALL.len(),
        });
    }
    for (t, v) in AttackPowerType::ALL.iter().zip(curves) {
        let id = v.as_i64().ok_or_else(|| r.field("curves"))?;
        calc_correct_graph_ids[*t] = u32::try_from(id).ok();
    }

    let flags = match slots.get(13) {
        None => 0,
        Some(v) => v.as_u64().ok_or_else(|| r.field("flags"))?,
    };

    Ok(Weapon {
        name,
        weapon_name,
        affinity,
        weapon_type,
        weight,
        requirements,
        attack,
        attribute_scaling,
        attack_element_correct,
        calc_correct_graph_ids,
        paired: flags & FLAG_PAIRED != 0,
        sorcery_tool: flags & FLAG_SORCERY_TOOL != 0,
        incantation_tool: flags & FLAG_INCANTATION_TOOL != 0,
        somber: path_max <= SOMBER_MAX_UPGRADE_LEVEL,
    })
}

/// Decode one record produced by [`encode_weapon`] against its string table.
pub fn decode_weapon(record: &Value, strings: &[String]) -> Result<Weapon, CodecError> {
    let slots = record
        .as_array()
        .ok_or(CodecError::Field { record: 0, field: "record" })?;
    decode_record(slots, 0, strings)
}

/// Decode `[stringTable, records]`.
pub fn decode_weapons(value: &Value) -> Result<Vec<Weapon>, CodecError> {
    let top = value.as_array().filter(|a| a.len() == 2).ok_or(CodecError::TopLevel)?;
    let strings: Vec<String> = top[0]
        .as_array()
        .ok_or(CodecError::TopLevel)?
        .iter()
        .map(|s| s.as_str().map(str::to_string).ok_or(CodecError::TopLevel))
        .collect::<Result<_, _>>()?;
    let records = top[1].as_array().ok_or(CodecError::TopLevel)?;
    let mut out = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let slots = record
            .as_array()
            .ok_or(CodecError::Field { record: i, field: "record" })?;
        out.push(decode_record(slots, i, &strings)?);
    }
    tracing::debug!(weapons = out.len(), strings = strings.len(), "decoded weapon list");
    Ok(out)
}

pub fn decode_weapons_str(content: &str) -> Result<Vec<Weapon>, CodecError> {
    let value: Value = serde_json::from_str(content).map_err(|e| CodecError::Json(e.to_string()))?;
    decode_weapons(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{empty_weapon, strength_weapon};
    use proptest::prelude::*;

    #[test]
    fn zero_trailing_scaling_is_truncated() {
        let mut w = strength_weapon("Longsword", WeaponType::StraightSword, 110.0, 0.5, 10);
        w.attribute_scaling[0][Attribute::Dex] = 0.33;
        let mut strings = StringTable::default();
        let record = encode_weapon(&w, &mut strings);
        assert_eq!(record[9], json!([[0.5, 0.33]]));
        assert_eq!(record[7], json!([10]));
        assert_eq!(record[8], json!([[110.0]]));
    }

    #[test]
    fn record_drops_default_tail_slots() {
        let w = strength_weapon("Longsword", WeaponType::StraightSword, 110.0, 0.5, 10);
        let mut strings = StringTable::default();
        let record = encode_weapon(&w, &mut strings);
        // No status, no flags.
        assert_eq!(record.as_array().unwrap().len(), 12);
        assert_eq!(record[11], json!([0]));
        assert_eq!(record[10], json!([[0]]));
    }

    #[test]
    fn string_table_dedupes_base_names() {
        let mut heavy = strength_weapon("Heavy Longsword", WeaponType::StraightSword, 120.0, 0.9, 10);
        heavy.weapon_name = "Longsword".to_string();
        heavy.affinity = Affinity::Heavy;
        let plain = strength_weapon("Longsword", WeaponType::StraightSword, 110.0, 0.5, 10);
        let encoded = encode_weapons(&[heavy, plain]);
        assert_eq!(encoded[0], json!(["Heavy Longsword", "Longsword"]));
        assert_eq!(encoded[1][1][0], json!(1));
        assert_eq!(encoded[1][1][4], json!(1));
    }

    #[test]
    fn round_trip_with_status_and_flags() {
        let mut w = strength_weapon("Rivers of Blood", WeaponType::Katana, 76.0, 0.2, 12);
        w.affinity = Affinity::Unique;
        w.attack = vec![w.attack[0]; 3];
        w.attribute_scaling = vec![w.attribute_scaling[0]; 3];
        w.attack[2][AttackPowerType::Fire] = Some(90.0);
        w.attack[1][AttackPowerType::Bleed] = Some(50.0);
        w.attack_element_correct[AttackPowerType::Bleed] = vec![Attribute::Arc];
        w.calc_correct_graph_ids[AttackPowerType::Bleed] = Some(6);
        w.paired = true;
        w.incantation_tool = true;
        let decoded = decode_weapons(&encode_weapons(&[w.clone()])).unwrap();
        assert_eq!(decoded, vec![w]);
    }

    #[test]
    fn decodes_short_records() {
        let value = json!([["Torch"], [[0, 0.5, 0, 10, 0, 1, 33, [], [[50]]]]]);
        let ws = decode_weapons(&value).unwrap();
        let w = &ws[0];
        assert_eq!(w.weapon_type, WeaponType::Torch);
        assert_eq!(w.attack[0][AttackPowerType::Physical], Some(50.0));
        assert_eq!(w.attribute_scaling, vec![PerAttribute([0.0; 5])]);
        assert!(w.calc_correct_graph_ids.present().next().is_none());
        assert!(!w.paired);
    }

    #[test]
    fn unknown_indices_are_errors() {
        let bad_affinity = json!([["X"], [[0, 1, 0, 10, 0, 99, 0, [], []]]]);
        assert_eq!(
            decode_weapons(&bad_affinity),
            Err(CodecError::UnknownAffinity { record: 0, index: 99 })
        );
        let bad_type = json!([["X"], [[0, 1, 0, 10, 0, 1, 500, [], []]]]);
        assert_eq!(
            decode_weapons(&bad_type),
            Err(CodecError::UnknownWeaponType { record: 0, index: 500 })
        );
        let bad_string = json!([["X"], [[3, 1, 0, 10, 0, 1, 0, [], []]]]);
        assert!(matches!(
            decode_weapons(&bad_string),
            Err(CodecError::StringIndex { index: 3, .. })
        ));
    }

    #[test]
    fn too_many_levels_rejected() {
        let value = json!([["X"], [[0, 1, 0, 10, 0, 1, 0, [], [[1], [2]]]]]);
        assert!(matches!(
            decode_weapons(&value),
            Err(CodecError::TooLong { field: "attack", .. })
        ));
    }

    #[test]
    fn huge_upgrade_levels_are_rejected() {
        let max = json!([["X"], [[0, 1, u64::MAX, u64::MAX, 0, 1, 0, [], []]]]);
        assert!(matches!(
            decode_weapons(&max),
            Err(CodecError::TooLong { field: "upgrade level", max: MAX_RECORD_UPGRADE_LEVEL, .. })
        ));
        let million = json!([["X"], [[0, 1, 1_000_000, 1_000_000, 0, 1, 0, [], []]]]);
        assert_eq!(
            decode_weapons(&million),
            Err(CodecError::TooLong {
                record: 0,
                field: "upgrade level",
                len: 1_000_000,
                max: MAX_RECORD_UPGRADE_LEVEL,
            })
        );
        let path = json!([["X"], [[0, 1, 0, 1_000_000, 0, 1, 0, [], []]]]);
        assert!(matches!(
            decode_weapons(&path),
            Err(CodecError::TooLong { field: "max upgrade level", .. })
        ));
    }

    #[test]
    fn requirements_must_be_whole_numbers() {
        for bad in [json!(-1), json!(10.5), json!(u64::MAX), json!("10")] {
            let value = json!([["X"], [[0, 1, 0, 10, 0, 1, 0, [10, bad]]]]);
            assert_eq!(
                decode_weapons(&value),
                Err(CodecError::Field { record: 0, field: "requirements" }),
                "{}",
                value
            );
        }
        let value = json!([["X"], [[0, 1, 0, 10, 0, 1, 0, [12, 18]]]]);
        let w = &decode_weapons(&value).unwrap()[0];
        assert_eq!(w.requirements.0, [12, 18, 0, 0, 0]);
    }

    #[test]
    fn capped_standard_weapon_keeps_standard_path() {
        let mut w = strength_weapon("Longsword", WeaponType::StraightSword, 110.0, 0.5, 10);
        w.attack = vec![w.attack[0]; 11];
        w.attribute_scaling = vec![w.attribute_scaling[0]; 11];
        let mut strings = StringTable::default();
        let record = encode_weapon(&w, &mut strings);
        assert_eq!(record[2], json!(10));
        assert_eq!(record[3], json!(DEFAULT_MAX_UPGRADE_LEVEL));
        let decoded = decode_weapons(&encode_weapons(&[w.clone()])).unwrap();
        assert!(!decoded[0].is_somber());
        assert_eq!(decoded[0].resolve_upgrade_level(5), 5);
        assert_eq!(decoded, vec![w.clone()]);

        w.somber = true;
        let record = encode_weapon(&w, &mut strings);
        assert_eq!(record[3], json!(SOMBER_MAX_UPGRADE_LEVEL));
        let decoded = decode_weapons(&encode_weapons(&[w.clone()])).unwrap();
        assert!(decoded[0].is_somber());
        assert_eq!(decoded[0].resolve_upgrade_level(5), 2);
    }

    #[test]
    fn malformed_top_level() {
        assert_eq!(decode_weapons(&json!({})), Err(CodecError::TopLevel));
        assert_eq!(decode_weapons(&json!([[]])), Err(CodecError::TopLevel));
    }

    fn arb_weapon() -> impl Strategy<Value = Weapon> {
        let levels = 1usize..4;
        (
            levels,
            0..Affinity::ALL.len(),
            0..WeaponType::ALL.len(),
            prop::array::uniform5(0u32..40),
            prop::collection::vec((0usize..12, 1u32..300), 0..6),
            prop::collection::vec((0usize..5, 0u32..5, 0u32..200), 0..6),
            prop::collection::vec((0usize..12, 0u32..20), 0..4),
            0u64..8,
            any::<bool>(),
        )
            .prop_map(
                |(levels, affinity, weapon_type, reqs, attacks, scalings, curves, flags, somber)| {
                    let mut w = empty_weapon("Arbitrary", WeaponType::ALL[weapon_type]);
                    w.weapon_name = "Base".to_string();
                    w.affinity = Affinity::ALL[affinity];
                    w.requirements = PerAttribute(reqs);
                    w.attack = vec![PerAttackPower::default(); levels];
                    w.attribute_scaling = vec![PerAttribute::default(); levels];
                    for (i, (t, v)) in attacks.into_iter().enumerate() {
                        w.attack[i % levels][AttackPowerType::ALL[t]] = Some(v as f64 / 4.0);
                    }
                    for (a, level, v) in scalings {
                        w.attribute_scaling[level as usize % levels][Attribute::ALL[a]] =
                            v as f64 / 100.0;
                    }
                    for (t, id) in curves {
                        w.calc_correct_graph_ids[AttackPowerType::ALL[t]] = Some(id);
                        w.attack_element_correct[AttackPowerType::ALL[t]] =
                            vec![Attribute::ALL[(id % 5) as usize]];
                    }
                    w.paired = flags & FLAG_PAIRED != 0;
                    w.sorcery_tool = flags & FLAG_SORCERY_TOOL != 0;
                    w.incantation_tool = flags & FLAG_INCANTATION_TOOL != 0;
                    w.somber = somber;
                    w
                },
            )
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(w in arb_weapon()) {
            let text = encode_weapons_string(&[w.clone()]).unwrap();
            let decoded = decode_weapons_str(&text).unwrap();
            prop_assert_eq!(decoded, vec![w]);
        }
    }
}
