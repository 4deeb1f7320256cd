//! Weapon filtering by category, affinity, and whether a build can wield it effectively.

use crate::calc::adjust_attributes_for_two_handing;
use crate::model::{Affinity, Attributes, Weapon, WeaponType};
use crate::regulation::RegulationRules;
use std::collections::BTreeSet;

/// Filter criteria. An empty set or `None` places no constraint on that axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub weapon_types: BTreeSet<WeaponType>,
    pub affinities: BTreeSet<Affinity>,
    /// Keep only weapons whose requirements these attributes meet.
    pub effective_with_attributes: Option<Attributes>,
    /// Apply the two-handing adjustment before the effectiveness check.
    pub two_handing: bool,
}

impl FilterCriteria {
    fn matches_weapon_type(&self, weapon: &Weapon) -> bool {
        if self.weapon_types.is_empty() || self.weapon_types.contains(&weapon.weapon_type) {
            return true;
        }
        // Hybrid casting tools also count as staves or seals.
        (weapon.sorcery_tool && self.weapon_types.contains(&WeaponType::GlintstoneStaff))
            || (weapon.incantation_tool && self.weapon_types.contains(&WeaponType::SacredSeal))
    }

    fn matches_affinity(&self, weapon: &Weapon) -> bool {
        if self.affinities.is_empty() || self.affinities.contains(&weapon.affinity) {
            return true;
        }
        weapon.weapon_type.is_uninfusable()
            && (self.affinities.contains(&Affinity::Standard)
                || self.affinities.contains(&Affinity::Unique))
    }

    fn matches_effectiveness(&self, weapon: &Weapon, rules: &RegulationRules) -> bool {
        match &self.effective_with_attributes {
            Some(attributes) => {
                adjust_attributes_for_two_handing(attributes, weapon, self.two_handing, rules)
                    .meets(&weapon.requirements)
            }
            None => true,
        }
    }

    pub fn matches(&self, weapon: &Weapon, rules: &RegulationRules) -> bool {
        self.matches_weapon_type(weapon)
            && self.matches_affinity(weapon)
            && self.matches_effectiveness(weapon, rules)
    }
}

/// Weapons matching every criterion, in input order.
pub fn filter_weapons<'a>(
    weapons: &'a [Weapon],
    criteria: &FilterCriteria,
    rules: &RegulationRules,
) -> Vec<&'a Weapon> {
    let out: Vec<&Weapon> = weapons
        .iter()
        .filter(|w| criteria.matches(w, rules))
        .collect();
    tracing::debug!(input = weapons.len(), kept = out.len(), "filtered weapons");
    out
}
