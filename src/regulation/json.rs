//! Regulation dataset wire format: shared lookup tables plus compact weapon records
//! that reference them by id.

use crate::curve::CalcCorrectGraph;
use crate::model::Attribute;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulationDataJson {
    /// Curve variants that override or extend the built-in table.
    #[serde(default)]
    pub calc_correct_graphs: BTreeMap<u32, CalcCorrectGraph>,
    /// Rule id -> attack power type id -> scaling attributes.
    #[serde(default)]
    pub attack_element_corrects: BTreeMap<u32, BTreeMap<u8, Vec<Attribute>>>,
    /// Reinforce type id -> one record per upgrade level.
    #[serde(default)]
    pub reinforce_types: BTreeMap<u32, Vec<ReinforceParamJson>>,
    /// Status effect id -> attack power type id -> base buildup.
    #[serde(default)]
    pub status_sp_effect_params: BTreeMap<u32, BTreeMap<u8, f64>>,
    #[serde(default)]
    pub weapons: Vec<WeaponJson>,
}

/// Multipliers for one upgrade level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReinforceParamJson {
    /// Attack power type id -> attack rate. Missing types keep a rate of 1.
    #[serde(default)]
    pub attack: BTreeMap<u8, f64>,
    /// Attribute key -> scaling rate. Missing attributes keep a rate of 1.
    #[serde(default)]
    pub attribute_scaling: BTreeMap<String, f64>,
    /// Added to the weapon's status effect ids, slot by slot.
    #[serde(default)]
    pub status_sp_effect_offsets: [u32; 3],
}

/// Compact weapon record as shipped in the dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponJson {
    #[serde(default)]
    pub id: Option<u32>,
    pub name: String,
    pub weapon_name: String,
    pub affinity_id: i32,
    pub weapon_type: u32,
    #[serde(default)]
    pub weight: f64,
    /// Attribute key -> minimum value.
    #[serde(default)]
    pub requirements: BTreeMap<String, u32>,
    /// (attack power type id, unupgraded base attack).
    #[serde(default)]
    pub attack: Vec<(u8, f64)>,
    /// (attribute key, unupgraded scaling coefficient).
    #[serde(default)]
    pub attribute_scaling: Vec<(String, f64)>,
    pub attack_element_correct_id: u32,
    /// Attack power type id -> curve variant id.
    #[serde(default)]
    pub calc_correct_graph_ids: BTreeMap<u8, u32>,
    pub reinforce_type_id: u32,
    /// Up to three status effect ids, offset per upgrade level.
    #[serde(default)]
    pub status_sp_effect_param_ids: Vec<Option<u32>>,
    #[serde(default)]
    pub paired: bool,
    #[serde(default)]
    pub sorcery_tool: bool,
    #[serde(default)]
    pub incantation_tool: bool,
}
