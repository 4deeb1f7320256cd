//! Regulation decoder: expands the compact, id-referenced dataset into fully
//! denormalized weapons, one attack record per upgrade level.

mod exceptions;
mod json;

pub use exceptions::ExceptionTable;
pub use json::{RegulationDataJson, ReinforceParamJson, WeaponJson};

use crate::config::{DEFAULT_INEFFECTIVE_ATTRIBUTE_PENALTY, SOMBER_MAX_UPGRADE_LEVEL};
use crate::curve::{CurveTable, STATUS_CURVE_ID};
use crate::model::{
    Affinity, AttackPowerRecord, AttackPowerType, Attribute, PerAttackPower, PerAttribute,
    Weapon, WeaponType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-version rule toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationRules {
    #[serde(default)]
    pub disable_two_handing_attack_power_bonus: bool,
    #[serde(default = "default_penalty")]
    pub ineffective_attribute_penalty: f64,
    /// Caps every weapon's upgrade path; `None` keeps the dataset's own levels.
    #[serde(default)]
    pub max_upgrade_level: Option<usize>,
    /// Report spell scaling for every element instead of only the tool's school.
    #[serde(default)]
    pub split_spell_scaling: bool,
}

fn default_penalty() -> f64 {
    DEFAULT_INEFFECTIVE_ATTRIBUTE_PENALTY
}

impl Default for RegulationRules {
    fn default() -> Self {
        Self {
            disable_two_handing_attack_power_bonus: false,
            ineffective_attribute_penalty: DEFAULT_INEFFECTIVE_ATTRIBUTE_PENALTY,
            max_upgrade_level: None,
            split_spell_scaling: false,
        }
    }
}

/// A decoded regulation version. Immutable once built.
#[derive(Debug, Clone)]
pub struct Regulation {
    pub curves: CurveTable,
    pub rules: RegulationRules,
    pub weapons: Vec<Weapon>,
}

impl Regulation {
    pub fn find_weapon(&self, name: &str) -> Option<&Weapon> {
        let key = crate::util::normalize_name(name);
        self.weapons
            .iter()
            .find(|w| crate::util::normalize_name(&w.name) == key)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegulationError {
    #[error("weapon {weapon:?}: attack element correct {id} not found")]
    MissingAttackElementCorrect { weapon: String, id: u32 },
    #[error("weapon {weapon:?}: reinforce type {id} not found")]
    MissingReinforceType { weapon: String, id: u32 },
    #[error("weapon {weapon:?}: unknown weapon type id {id}")]
    UnknownWeaponType { weapon: String, id: u32 },
    #[error("weapon {weapon:?}: unknown affinity id {id}")]
    UnknownAffinity { weapon: String, id: i32 },
    #[error("{context}: unknown attack power type id {id}")]
    UnknownAttackPowerType { context: String, id: u8 },
    #[error("{context}: unknown attribute {key:?}")]
    UnknownAttribute { context: String, key: String },
    #[error("invalid regulation JSON: {0}")]
    Json(String),
}

pub fn parse_regulation_json(content: &str) -> Result<RegulationDataJson, RegulationError> {
    serde_json::from_str(content).map_err(|e| RegulationError::Json(e.to_string()))
}

/// Reinforce record with keys resolved to enums.
#[derive(Debug, Clone)]
struct ReinforceLevel {
    attack: PerAttackPower<f64>,
    attribute_scaling: PerAttribute<f64>,
    status_sp_effect_offsets: [u32; 3],
}

/// Lookup tables with keys resolved once, shared by every weapon record.
struct Tables {
    element_corrects: BTreeMap<u32, PerAttackPower<Vec<Attribute>>>,
    reinforce_types: BTreeMap<u32, Vec<ReinforceLevel>>,
    status_params: BTreeMap<u32, AttackPowerRecord>,
}

fn attack_power_type(id: u8, context: impl FnOnce() -> String) -> Result<AttackPowerType, RegulationError> {
    AttackPowerType::from_id(id).ok_or_else(|| RegulationError::UnknownAttackPowerType {
        context: context(),
        id,
    })
}

fn attribute(key: &str, context: impl FnOnce() -> String) -> Result<Attribute, RegulationError> {
    key.parse::<Attribute>()
        .map_err(|_| RegulationError::UnknownAttribute {
            context: context(),
            key: key.to_string(),
        })
}

fn nonzero(v: f64) -> Option<f64> {
    if v != 0.0 {
        Some(v)
    } else {
        None
    }
}

fn resolve_tables(data: &RegulationDataJson) -> Result<Tables, RegulationError> {
    let mut element_corrects = BTreeMap::new();
    for (id, by_type) in &data.attack_element_corrects {
        let mut resolved: PerAttackPower<Vec<Attribute>> = PerAttackPower::default();
        for (type_id, attrs) in by_type {
            let t = attack_power_type(*type_id, || format!("attackElementCorrects[{}]", id))?;
            resolved[t] = attrs.clone();
        }
        element_corrects.insert(*id, resolved);
    }

    let mut reinforce_types = BTreeMap::new();
    for (id, levels) in &data.reinforce_types {
        let mut resolved = Vec::with_capacity(levels.len());
        for (level, param) in levels.iter().enumerate() {
            let context = || format!("reinforceTypes[{}][{}]", id, level);
            let mut attack = PerAttackPower([1.0; 12]);
            for (type_id, rate) in &param.attack {
                attack[attack_power_type(*type_id, context)?] = *rate;
            }
            let mut attribute_scaling = PerAttribute([1.0; 5]);
            for (key, rate) in &param.attribute_scaling {
                attribute_scaling[attribute(key, context)?] = *rate;
            }
            resolved.push(ReinforceLevel {
                attack,
                attribute_scaling,
                status_sp_effect_offsets: param.status_sp_effect_offsets,
            });
        }
        reinforce_types.insert(*id, resolved);
    }

    let mut status_params = BTreeMap::new();
    for (id, by_type) in &data.status_sp_effect_params {
        let mut resolved: AttackPowerRecord = PerAttackPower::default();
        for (type_id, value) in by_type {
            let t = attack_power_type(*type_id, || format!("statusSpEffectParams[{}]", id))?;
            if !t.is_status() {
                tracing::debug!(status = id, %t, "ignoring non-status entry in status effect");
                continue;
            }
            resolved[t] = nonzero(*value);
        }
        status_params.insert(*id, resolved);
    }

    Ok(Tables {
        element_corrects,
        reinforce_types,
        status_params,
    })
}

/// Decode a regulation dataset into its weapon list.
///
/// A weapon referencing a missing attack element correct or reinforce type aborts the
/// whole decode: the dataset is corrupt or built for another version. Missing status
/// effects and curves only cost that weapon the bonus.
pub fn decode_regulation(
    data: &RegulationDataJson,
    rules: &RegulationRules,
    exceptions: &ExceptionTable,
) -> Result<Regulation, RegulationError> {
    let mut curves = CurveTable::builtin();
    for (id, graph) in &data.calc_correct_graphs {
        curves.insert(*id, graph.clone());
    }
    let tables = resolve_tables(data)?;

    let mut weapons = Vec::with_capacity(data.weapons.len());
    for record in &data.weapons {
        let weapon = decode_weapon(record, &tables, rules, exceptions)?;
        for (t, id) in weapon.calc_correct_graph_ids.present() {
            if !curves.contains(*id) {
                tracing::debug!(weapon = %weapon.name, %t, curve = id, "unknown scaling curve");
            }
        }
        weapons.push(weapon);
    }
    tracing::info!(
        weapons = weapons.len(),
        curves = curves.len(),
        "decoded regulation data"
    );
    Ok(Regulation {
        curves,
        rules: rules.clone(),
        weapons,
    })
}

fn decode_weapon(
    record: &WeaponJson,
    tables: &Tables,
    rules: &RegulationRules,
    exceptions: &ExceptionTable,
) -> Result<Weapon, RegulationError> {
    let name = record.name.as_str();
    let context = || format!("weapon {:?}", name);

    let weapon_type =
        WeaponType::from_id(record.weapon_type).ok_or_else(|| RegulationError::UnknownWeaponType {
            weapon: name.to_string(),
            id: record.weapon_type,
        })?;
    let affinity = if exceptions.forces_unique(record.id) {
        Affinity::Unique
    } else {
        Affinity::from_id(record.affinity_id).ok_or_else(|| RegulationError::UnknownAffinity {
            weapon: name.to_string(),
            id: record.affinity_id,
        })?
    };

    let attack_element_correct = tables
        .element_corrects
        .get(&record.attack_element_correct_id)
        .ok_or_else(|| RegulationError::MissingAttackElementCorrect {
            weapon: name.to_string(),
            id: record.attack_element_correct_id,
        })?
        .clone();
    let reinforce = tables
        .reinforce_types
        .get(&record.reinforce_type_id)
        .filter(|levels| !levels.is_empty())
        .ok_or_else(|| RegulationError::MissingReinforceType {
            weapon: name.to_string(),
            id: record.reinforce_type_id,
        })?;
    let level_count = match rules.max_upgrade_level {
        Some(max) => max.saturating_add(1).min(reinforce.len()),
        None => reinforce.len(),
    };

    let mut requirements = PerAttribute::default();
    for (key, value) in &record.requirements {
        requirements[attribute(key, context)?] = *value;
    }
    let mut base_attack = PerAttackPower([0.0; 12]);
    for (type_id, value) in &record.attack {
        base_attack[attack_power_type(*type_id, context)?] = *value;
    }
    let mut base_scaling = PerAttribute([0.0; 5]);
    for (key, value) in &record.attribute_scaling {
        base_scaling[attribute(key, context)?] = *value;
    }

    let status_ids = exceptions
        .status_override(name)
        .unwrap_or(record.status_sp_effect_param_ids.as_slice());

    let mut attack = Vec::with_capacity(level_count);
    let mut attribute_scaling = Vec::with_capacity(level_count);
    for level in &reinforce[..level_count] {
        let mut record_at_level: AttackPowerRecord = PerAttackPower::default();
        for t in AttackPowerType::ALL {
            record_at_level[t] = nonzero(base_attack[t] * level.attack[t]);
        }
        for (slot, id) in status_ids.iter().take(3).enumerate() {
            let Some(id) = id else { continue };
            let offset = if exceptions.suppresses_status_offset(name, slot) {
                0
            } else {
                level.status_sp_effect_offsets[slot]
            };
            let Some(key) = id.checked_add(offset) else {
                tracing::debug!(weapon = name, status = id, offset, "status effect id overflows");
                continue;
            };
            match tables.status_params.get(&key) {
                Some(params) => {
                    for (t, value) in params.present() {
                        record_at_level[t] = Some(*value);
                    }
                }
                None => tracing::debug!(weapon = name, status = key, "unknown status effect"),
            }
        }
        attack.push(record_at_level);

        let mut scaling = PerAttribute([0.0; 5]);
        for attr in Attribute::ALL {
            scaling[attr] = base_scaling[attr] * level.attribute_scaling[attr];
        }
        attribute_scaling.push(scaling);
    }

    let mut calc_correct_graph_ids: PerAttackPower<Option<u32>> = PerAttackPower::default();
    for (type_id, graph_id) in &record.calc_correct_graph_ids {
        calc_correct_graph_ids[attack_power_type(*type_id, context)?] = Some(*graph_id);
    }

    let mut weapon = Weapon {
        name: record.name.clone(),
        weapon_name: record.weapon_name.clone(),
        affinity,
        weapon_type,
        weight: record.weight,
        requirements,
        attack,
        attribute_scaling,
        attack_element_correct,
        calc_correct_graph_ids,
        paired: record.paired,
        sorcery_tool: record.sorcery_tool,
        incantation_tool: record.incantation_tool,
        // The path is a property of the reinforce type, before any version cap.
        somber: reinforce.len() <= SOMBER_MAX_UPGRADE_LEVEL + 1,
    };
    for t in AttackPowerType::STATUS_TYPES {
        if weapon.calc_correct_graph_ids[t].is_none() && weapon.has_attack_power_type(t) {
            weapon.calc_correct_graph_ids[t] = Some(STATUS_CURVE_ID);
        }
    }
    Ok(weapon)
}
