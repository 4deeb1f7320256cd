//! Attack power calculator: base attack plus attribute scaling per damage and status type.

use crate::config::TWO_HANDING_STRENGTH_MULTIPLIER;
use crate::curve::CurveTable;
use crate::model::{AttackPowerType, Attribute, Attributes, PerAttackPower, Weapon};
use crate::regulation::{Regulation, RegulationRules};
use serde::Serialize;

/// Shared read-only inputs for a calculation.
#[derive(Debug, Clone, Copy)]
pub struct CalcContext<'a> {
    pub curves: &'a CurveTable,
    pub rules: &'a RegulationRules,
}

impl Regulation {
    pub fn calc_context(&self) -> CalcContext<'_> {
        CalcContext {
            curves: &self.curves,
            rules: &self.rules,
        }
    }
}

/// Attack power for one type, split into the unscaled base and the attribute bonus.
/// `scaling` is negative when a requirement is unmet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttackPower {
    pub base: f64,
    pub scaling: f64,
}

impl AttackPower {
    pub fn total(&self) -> f64 {
        self.base + self.scaling
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackResult {
    pub upgrade_level: usize,
    /// Attribute values actually used, after two-handing adjustment.
    pub attributes: Attributes,
    /// `None` for types the weapon cannot deal at all.
    pub attack_power: PerAttackPower<Option<AttackPower>>,
    /// Spell scaling per damage element, for catalysts only.
    pub spell_scaling: PerAttackPower<Option<f64>>,
    /// Attributes below the weapon's requirement.
    pub ineffective_attributes: Vec<Attribute>,
    /// Types whose scaling was replaced by the unmet-requirement penalty.
    pub ineffective_attack_power_types: Vec<AttackPowerType>,
}

impl AttackResult {
    /// Sum over damage types; status buildup is not damage.
    pub fn total_attack(&self) -> f64 {
        AttackPowerType::DAMAGE_TYPES
            .iter()
            .filter_map(|&t| self.attack_power[t])
            .map(|ap| ap.total())
            .sum()
    }

    pub fn attack(&self, t: AttackPowerType) -> Option<f64> {
        self.attack_power[t].map(|ap| ap.total())
    }
}

/// One computed table row: a weapon and its attack at the chosen level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponTableRow<'a> {
    pub weapon: &'a Weapon,
    pub result: AttackResult,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("weapon {weapon:?}: upgrade level {level} out of range (max {max})")]
    UpgradeLevelOutOfRange {
        weapon: String,
        level: usize,
        max: usize,
    },
}

/// True when the two-handing strength bonus applies to this weapon.
pub fn two_handing_bonus_applies(weapon: &Weapon, two_handing: bool, rules: &RegulationRules) -> bool {
    if rules.disable_two_handing_attack_power_bonus {
        return false;
    }
    if weapon.weapon_type.is_always_two_handed() {
        return true;
    }
    two_handing && !weapon.paired
}

/// Attributes as the game sees them for this weapon: strength x1.5 (floored) when
/// the two-handing bonus applies.
pub fn adjust_attributes_for_two_handing(
    attributes: &Attributes,
    weapon: &Weapon,
    two_handing: bool,
    rules: &RegulationRules,
) -> Attributes {
    let mut adjusted = *attributes;
    if two_handing_bonus_applies(weapon, two_handing, rules) {
        let strength = attributes[Attribute::Str] as f64 * TWO_HANDING_STRENGTH_MULTIPLIER;
        adjusted[Attribute::Str] = strength.floor() as u32;
    }
    adjusted
}

/// Multiplier applied to a base value: `1 + Σ curve × coefficient`, or `1 - penalty`
/// when any scaling attribute is below its requirement.
fn scaling_multiplier(
    ctx: CalcContext<'_>,
    weapon: &Weapon,
    t: AttackPowerType,
    coefficients: &crate::model::PerAttribute<f64>,
    attributes: &Attributes,
    ineffective: &[Attribute],
) -> (f64, bool) {
    let scaling_attributes = &weapon.attack_element_correct[t];
    if scaling_attributes.iter().any(|a| ineffective.contains(a)) {
        return (1.0 - ctx.rules.ineffective_attribute_penalty, true);
    }
    let Some(curve_id) = weapon.calc_correct_graph_ids[t] else {
        return (1.0, false);
    };
    let bonus: f64 = scaling_attributes
        .iter()
        .map(|&attr| ctx.curves.curve(curve_id, attributes[attr]) * coefficients[attr])
        .sum();
    (1.0 + bonus, false)
}

/// Damage elements reported as spell scaling for a catalyst.
fn spell_scaling_types(weapon: &Weapon, rules: &RegulationRules) -> Vec<AttackPowerType> {
    if rules.split_spell_scaling {
        return AttackPowerType::DAMAGE_TYPES.to_vec();
    }
    let mut types = Vec::new();
    if weapon.sorcery_tool {
        types.push(AttackPowerType::Magic);
    }
    if weapon.incantation_tool {
        types.push(AttackPowerType::Holy);
    }
    types
}

/// Compute attack power for `weapon` at its own `upgrade_level`.
pub fn compute_attack(
    ctx: CalcContext<'_>,
    weapon: &Weapon,
    upgrade_level: usize,
    attributes: &Attributes,
    two_handing: bool,
) -> Result<AttackResult, CalcError> {
    let (Some(base_attack), Some(coefficients)) = (
        weapon.attack_at(upgrade_level),
        weapon.scaling_at(upgrade_level),
    ) else {
        return Err(CalcError::UpgradeLevelOutOfRange {
            weapon: weapon.name.clone(),
            level: upgrade_level,
            max: weapon.max_upgrade_level(),
        });
    };

    let adjusted = adjust_attributes_for_two_handing(attributes, weapon, two_handing, ctx.rules);
    let ineffective_attributes: Vec<Attribute> = Attribute::ALL
        .iter()
        .copied()
        .filter(|&attr| adjusted[attr] < weapon.requirements[attr])
        .collect();

    let mut attack_power: PerAttackPower<Option<AttackPower>> = PerAttackPower::default();
    let mut ineffective_attack_power_types = Vec::new();
    for (t, base) in base_attack.present() {
        let (multiplier, penalized) =
            scaling_multiplier(ctx, weapon, t, coefficients, &adjusted, &ineffective_attributes);
        if penalized {
            ineffective_attack_power_types.push(t);
        }
        attack_power[t] = Some(AttackPower {
            base: *base,
            scaling: base * (multiplier - 1.0),
        });
    }

    let mut spell_scaling: PerAttackPower<Option<f64>> = PerAttackPower::default();
    if weapon.is_spell_tool() {
        for t in spell_scaling_types(weapon, ctx.rules) {
            if weapon.attack_element_correct[t].is_empty() {
                continue;
            }
            let (multiplier, penalized) =
                scaling_multiplier(ctx, weapon, t, coefficients, &adjusted, &ineffective_attributes);
            if penalized && !ineffective_attack_power_types.contains(&t) {
                ineffective_attack_power_types.push(t);
            }
            spell_scaling[t] = Some(100.0 * multiplier);
        }
    }

    Ok(AttackResult {
        upgrade_level,
        attributes: adjusted,
        attack_power,
        spell_scaling,
        ineffective_attributes,
        ineffective_attack_power_types,
    })
}
