//! Sorting computed weapon rows.

use crate::calc::WeaponTableRow;
use crate::model::{AttackPowerType, Attribute};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortBy {
    /// Base weapon name, then affinity, so affinity variants stay adjacent.
    Name,
    TotalAttack,
    Attack(AttackPowerType),
    SpellScaling(AttackPowerType),
    Scaling(Attribute),
    Requirement(Attribute),
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::Name => write!(f, "name"),
            SortBy::TotalAttack => write!(f, "totalAttack"),
            SortBy::Attack(t) => write!(f, "{}Attack", t),
            SortBy::SpellScaling(t) => write!(f, "{}SpellScaling", t),
            SortBy::Scaling(a) => write!(f, "{}Scaling", a),
            SortBy::Requirement(a) => write!(f, "{}Requirement", a),
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    /// Accepts `name`, `totalAttack`, `<type>Attack`, `<type>SpellScaling`,
    /// `<attr>Scaling` and `<attr>Requirement`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "name" => return Ok(SortBy::Name),
            "totalattack" => return Ok(SortBy::TotalAttack),
            _ => {}
        }
        let lower = s.to_lowercase();
        if let Some(prefix) = lower.strip_suffix("spellscaling") {
            let t = prefix.parse::<AttackPowerType>()?;
            if !t.is_damage() {
                return Err(format!("spell scaling needs a damage type: {}", s));
            }
            return Ok(SortBy::SpellScaling(t));
        }
        if let Some(prefix) = lower.strip_suffix("scaling") {
            return prefix.parse().map(SortBy::Scaling);
        }
        if let Some(prefix) = lower.strip_suffix("requirement") {
            return prefix.parse().map(SortBy::Requirement);
        }
        if let Some(prefix) = lower.strip_suffix("attack") {
            return prefix.parse().map(SortBy::Attack);
        }
        Err(format!("unknown sort key: {}", s))
    }
}

/// Numeric value of a row for a numeric key. Missing values sort as 0.
fn numeric_key(row: &WeaponTableRow<'_>, sort_by: SortBy) -> f64 {
    let level = row.result.upgrade_level;
    match sort_by {
        SortBy::Name => 0.0,
        SortBy::TotalAttack => row.result.total_attack(),
        SortBy::Attack(t) => row.result.attack(t).unwrap_or(0.0),
        SortBy::SpellScaling(t) => row.result.spell_scaling[t].unwrap_or(0.0),
        SortBy::Scaling(a) => row
            .weapon
            .scaling_at(level)
            .map(|s| s[a])
            .unwrap_or(0.0),
        SortBy::Requirement(a) => row.weapon.requirements[a] as f64,
    }
}

fn compare(a: &WeaponTableRow<'_>, b: &WeaponTableRow<'_>, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Name => a
            .weapon
            .weapon_name
            .cmp(&b.weapon.weapon_name)
            .then_with(|| a.weapon.affinity.index().cmp(&b.weapon.affinity.index())),
        // Highest first.
        _ => numeric_key(b, sort_by).total_cmp(&numeric_key(a, sort_by)),
    }
}

/// Stable sort of `rows` by `sort_by`. Numeric keys put the highest value first unless
/// `reverse` is set; names sort alphabetically unless `reverse` is set.
pub fn sort_weapons<'a>(
    mut rows: Vec<WeaponTableRow<'a>>,
    sort_by: SortBy,
    reverse: bool,
) -> Vec<WeaponTableRow<'a>> {
    rows.sort_by(|a, b| {
        let ord = compare(a, b, sort_by);
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compute_attack, CalcContext};
    use crate::curve::CurveTable;
    use crate::model::fixtures::strength_weapon;
    use crate::model::{Affinity, Attributes, Weapon, WeaponType};
    use crate::regulation::RegulationRules;
    use proptest::prelude::*;

    fn rows(weapons: &[Weapon]) -> Vec<WeaponTableRow<'_>> {
        let curves = CurveTable::builtin();
        let rules = RegulationRules::default();
        let ctx = CalcContext {
            curves: &curves,
            rules: &rules,
        };
        let attrs = Attributes::new(40, 10, 10, 10, 10);
        weapons
            .iter()
            .map(|w| WeaponTableRow {
                weapon: w,
                result: compute_attack(ctx, w, 0, &attrs, false).unwrap(),
            })
            .collect()
    }

    fn sample() -> Vec<Weapon> {
        let mut heavy = strength_weapon("Heavy Longsword", WeaponType::StraightSword, 120.0, 0.9, 10);
        heavy.weapon_name = "Longsword".to_string();
        heavy.affinity = Affinity::Heavy;
        let longsword = strength_weapon("Longsword", WeaponType::StraightSword, 110.0, 0.5, 10);
        let axe = strength_weapon("Battle Axe", WeaponType::Axe, 130.0, 0.6, 14);
        let dagger = strength_weapon("Dagger", WeaponType::Dagger, 75.0, 0.2, 5);
        vec![heavy, longsword, axe, dagger]
    }

    fn names(rows: &[WeaponTableRow<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.weapon.name.clone()).collect()
    }

    #[test]
    fn parse_sort_keys() {
        assert_eq!("name".parse::<SortBy>(), Ok(SortBy::Name));
        assert_eq!("totalAttack".parse::<SortBy>(), Ok(SortBy::TotalAttack));
        assert_eq!(
            "physicalAttack".parse::<SortBy>(),
            Ok(SortBy::Attack(AttackPowerType::Physical))
        );
        assert_eq!(
            "magicSpellScaling".parse::<SortBy>(),
            Ok(SortBy::SpellScaling(AttackPowerType::Magic))
        );
        assert_eq!("strScaling".parse::<SortBy>(), Ok(SortBy::Scaling(Attribute::Str)));
        assert_eq!(
            "dexRequirement".parse::<SortBy>(),
            Ok(SortBy::Requirement(Attribute::Dex))
        );
        assert!("bleedSpellScaling".parse::<SortBy>().is_err());
        assert!("weight".parse::<SortBy>().is_err());
        for key in ["scarletRotAttack", "arcRequirement", "holySpellScaling"] {
            let parsed: SortBy = key.parse().unwrap();
            assert_eq!(parsed.to_string(), key);
        }
    }

    #[test]
    fn name_sort_keeps_affinity_variants_adjacent() {
        let ws = sample();
        let sorted = sort_weapons(rows(&ws), SortBy::Name, false);
        assert_eq!(
            names(&sorted),
            ["Battle Axe", "Dagger", "Longsword", "Heavy Longsword"]
        );
    }

    #[test]
    fn numeric_sort_is_descending_by_default() {
        let ws = sample();
        let sorted = sort_weapons(rows(&ws), SortBy::TotalAttack, false);
        let totals: Vec<f64> = sorted.iter().map(|r| r.result.total_attack()).collect();
        assert!(totals.windows(2).all(|w| w[0] >= w[1]));

        let sorted = sort_weapons(rows(&ws), SortBy::Requirement(Attribute::Str), true);
        assert_eq!(sorted[0].weapon.name, "Dagger");
        assert_eq!(sorted[3].weapon.name, "Battle Axe");
    }

    #[test]
    fn ties_keep_input_order() {
        let ws = sample();
        let sorted = sort_weapons(rows(&ws), SortBy::Requirement(Attribute::Str), false);
        assert_eq!(
            names(&sorted),
            ["Battle Axe", "Heavy Longsword", "Longsword", "Dagger"]
        );
    }

    proptest! {
        #[test]
        fn reverse_flips_untied_order(bases in prop::collection::btree_set(1u32..500, 1..8)) {
            let ws: Vec<Weapon> = bases
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    strength_weapon(&format!("W{}", i), WeaponType::Hammer, *b as f64, 0.0, 1)
                })
                .collect();
            let forward = names(&sort_weapons(rows(&ws), SortBy::TotalAttack, false));
            let mut backward = names(&sort_weapons(rows(&ws), SortBy::TotalAttack, true));
            backward.reverse();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn consecutive_rows_respect_comparator(bases in prop::collection::vec(1u32..200, 1..10)) {
            let ws: Vec<Weapon> = bases
                .iter()
                .map(|b| strength_weapon("W", WeaponType::Hammer, *b as f64, 0.5, 20))
                .collect();
            let sorted = sort_weapons(rows(&ws), SortBy::Attack(AttackPowerType::Physical), false);
            for pair in sorted.windows(2) {
                prop_assert!(compare(&pair[0], &pair[1], SortBy::Attack(AttackPowerType::Physical)) != Ordering::Greater);
            }
        }
    }
}
