//! Configuration: constants and query settings.

use crate::model::{Affinity, Attributes, WeaponType};
use serde::Deserialize;
use std::path::PathBuf;

pub const MIN_ATTRIBUTE_VALUE: u32 = 1;
pub const MAX_ATTRIBUTE_VALUE: u32 = 99;

/// Highest upgrade level on the standard smithing-stone path.
pub const DEFAULT_MAX_UPGRADE_LEVEL: usize = 25;

/// Highest upgrade level on the somber smithing-stone path.
pub const SOMBER_MAX_UPGRADE_LEVEL: usize = 10;

/// Fraction of base attack lost per damage type when a scaling requirement is unmet.
pub const DEFAULT_INEFFECTIVE_ATTRIBUTE_PENALTY: f64 = 0.4;

/// Strength multiplier when wielding with both hands.
pub const TWO_HANDING_STRENGTH_MULTIPLIER: f64 = 1.5;

/// Default path of the regulation version registry.
pub const DEFAULT_REGISTRY_PATH: &str = "regulations.toml";

/// Maximum size in bytes for one regulation data file.
pub const MAX_REGULATION_FILE_BYTES: u64 = 64 * 1024 * 1024;

/// One calculator query: the build plus the filter and sort settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CalcConfig {
    pub version: String,
    #[serde(default = "default_attributes")]
    pub attributes: Attributes,
    #[serde(default)]
    pub two_handing: bool,
    #[serde(default = "default_upgrade_level")]
    pub upgrade_level: usize,
    #[serde(default)]
    pub weapon_types: Vec<WeaponType>,
    #[serde(default)]
    pub affinities: Vec<Affinity>,
    /// Hide weapons whose requirements the build does not meet.
    #[serde(default)]
    pub effective_only: bool,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default)]
    pub reverse: bool,
    pub limit: Option<usize>,
    pub report: Option<PathBuf>,
}

fn default_attributes() -> Attributes {
    Attributes::new(10, 10, 10, 10, 10)
}

fn default_upgrade_level() -> usize {
    DEFAULT_MAX_UPGRADE_LEVEL
}

fn default_sort_by() -> String {
    "totalAttack".to_string()
}

impl CalcConfig {
    pub fn new(version: String) -> Self {
        Self {
            version,
            attributes: default_attributes(),
            two_handing: false,
            upgrade_level: default_upgrade_level(),
            weapon_types: Vec::new(),
            affinities: Vec::new(),
            effective_only: false,
            sort_by: default_sort_by(),
            reverse: false,
            limit: None,
            report: None,
        }
    }
}
