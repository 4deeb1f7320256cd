//! Weapon model: attributes, attack power types, categories, and the decoded weapon.

mod attack;
mod attributes;
mod category;

pub use attack::{AttackPowerType, PerAttackPower, ATTACK_POWER_TYPE_COUNT};
pub use attributes::{Attribute, Attributes, PerAttribute};
pub use category::{Affinity, WeaponType};
use serde::{Deserialize, Serialize};

/// Base attack power per type at one upgrade level. `None` means the weapon cannot deal
/// that type at all.
pub type AttackPowerRecord = PerAttackPower<Option<f64>>;

/// Denormalized armament: one affinity variant of one base weapon, with every upgrade
/// level already resolved. Never mutated after decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Display name, e.g. "Heavy Longsword".
    pub name: String,
    /// Base weapon family name shared by all affinity variants.
    pub weapon_name: String,
    pub affinity: Affinity,
    pub weapon_type: WeaponType,
    pub weight: f64,
    pub requirements: PerAttribute<u32>,
    /// Indexed by upgrade level.
    pub attack: Vec<AttackPowerRecord>,
    /// Indexed by upgrade level.
    pub attribute_scaling: Vec<PerAttribute<f64>>,
    /// Which attributes each attack power type scales with.
    pub attack_element_correct: PerAttackPower<Vec<Attribute>>,
    /// Scaling curve variant per attack power type.
    pub calc_correct_graph_ids: PerAttackPower<Option<u32>>,
    /// Dual-wielded pair; never receives the two-handing bonus.
    pub paired: bool,
    pub sorcery_tool: bool,
    pub incantation_tool: bool,
    /// Upgraded with somber smithing stones (+10 path). Fixed by the dataset's reinforce
    /// type, not by how many levels a version ships.
    #[serde(default)]
    pub somber: bool,
}

impl Weapon {
    pub fn max_upgrade_level(&self) -> usize {
        self.attack.len().saturating_sub(1)
    }

    /// Somber weapons stop at +10 while standard ones go to +25.
    pub fn is_somber(&self) -> bool {
        self.somber
    }

    /// Map a standard upgrade level (+0..+25) onto this weapon's own upgrade path.
    pub fn resolve_upgrade_level(&self, regular_level: usize) -> usize {
        let max = self.max_upgrade_level();
        if self.somber {
            let somber = ((regular_level as f64 + 1.0) / 2.5).floor() as usize;
            somber.min(max)
        } else {
            regular_level.min(max)
        }
    }

    pub fn is_spell_tool(&self) -> bool {
        self.sorcery_tool || self.incantation_tool
    }

    /// True when the weapon has this attack power type at any upgrade level.
    pub fn has_attack_power_type(&self, t: AttackPowerType) -> bool {
        self.attack.iter().any(|level| level[t].is_some())
    }

    pub fn attack_at(&self, upgrade_level: usize) -> Option<&AttackPowerRecord> {
        self.attack.get(upgrade_level)
    }

    pub fn scaling_at(&self, upgrade_level: usize) -> Option<&PerAttribute<f64>> {
        self.attribute_scaling.get(upgrade_level)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Hand-built weapons shared by unit tests across modules.

    use super::*;

    pub fn empty_weapon(name: &str, weapon_type: WeaponType) -> Weapon {
        Weapon {
            name: name.to_string(),
            weapon_name: name.to_string(),
            affinity: Affinity::Standard,
            weapon_type,
            weight: 3.5,
            requirements: PerAttribute::default(),
            attack: vec![PerAttackPower::default()],
            attribute_scaling: vec![PerAttribute::default()],
            attack_element_correct: PerAttackPower::default(),
            calc_correct_graph_ids: PerAttackPower::default(),
            paired: false,
            sorcery_tool: false,
            incantation_tool: false,
            somber: false,
        }
    }

    /// Single-level weapon dealing `physical` damage, scaling with strength on curve 0.
    pub fn strength_weapon(
        name: &str,
        weapon_type: WeaponType,
        physical: f64,
        str_scaling: f64,
        str_requirement: u32,
    ) -> Weapon {
        let mut w = empty_weapon(name, weapon_type);
        w.attack[0][AttackPowerType::Physical] = Some(physical);
        w.attribute_scaling[0][Attribute::Str] = str_scaling;
        w.requirements[Attribute::Str] = str_requirement;
        w.attack_element_correct[AttackPowerType::Physical] = vec![Attribute::Str];
        w.calc_correct_graph_ids[AttackPowerType::Physical] = Some(0);
        w
    }
}
