//! JSON reports: the computed weapon table, and the change between two versions.

use crate::calc::WeaponTableRow;
use crate::model::{AttackPowerType, Attribute, Attributes};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub weapon_name: String,
    pub affinity: String,
    pub weapon_type: String,
    pub upgrade_level: usize,
    pub total_attack: f64,
    /// Attack power type key -> total attack, present types only.
    pub attack: BTreeMap<String, f64>,
    pub spell_scaling: BTreeMap<String, f64>,
    pub ineffective_attributes: Vec<Attribute>,
}

impl ReportRow {
    pub fn from_row(row: &WeaponTableRow<'_>) -> Self {
        let mut attack = BTreeMap::new();
        let mut spell_scaling = BTreeMap::new();
        for t in AttackPowerType::ALL {
            if let Some(v) = row.result.attack(t) {
                attack.insert(t.key().to_string(), v);
            }
            if let Some(v) = row.result.spell_scaling[t] {
                spell_scaling.insert(t.key().to_string(), v);
            }
        }
        Self {
            name: row.weapon.name.clone(),
            weapon_name: row.weapon.weapon_name.clone(),
            affinity: row.weapon.affinity.to_string(),
            weapon_type: row.weapon.weapon_type.to_string(),
            upgrade_level: row.result.upgrade_level,
            total_attack: row.result.total_attack(),
            attack,
            spell_scaling,
            ineffective_attributes: row.result.ineffective_attributes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalcReport {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub attributes: Attributes,
    pub two_handing: bool,
    pub upgrade_level: usize,
    pub sort_by: String,
    pub rows: Vec<ReportRow>,
}

impl CalcReport {
    pub fn new(
        version: &str,
        query: &crate::query::CalcQuery,
        rows: &[WeaponTableRow<'_>],
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            version: version.to_string(),
            attributes: query.attributes,
            two_handing: query.two_handing,
            upgrade_level: query.upgrade_level,
            sort_by: query.sort_by.to_string(),
            rows: rows.iter().map(ReportRow::from_row).collect(),
        }
    }
}

pub fn write_json_report<T: Serialize>(report: &T, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(report).map_err(|e| e.to_string())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(path, json).map_err(|e| e.to_string())?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackChange {
    pub name: String,
    pub before: f64,
    pub after: f64,
}

impl AttackChange {
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

/// Weapons added, removed, or changed in total attack between two versions.
#[derive(Debug, Clone, Serialize)]
pub struct VersionDiff {
    pub generated_at: DateTime<Utc>,
    pub version_a: String,
    pub version_b: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Largest absolute change first.
    pub changed: Vec<AttackChange>,
}

/// Compare two computed tables by weapon name. Changes smaller than `epsilon` are ignored.
pub fn diff_versions(
    version_a: &str,
    rows_a: &[WeaponTableRow<'_>],
    version_b: &str,
    rows_b: &[WeaponTableRow<'_>],
    epsilon: f64,
) -> VersionDiff {
    let totals_a: HashMap<&str, f64> = rows_a
        .iter()
        .map(|r| (r.weapon.name.as_str(), r.result.total_attack()))
        .collect();
    let totals_b: HashMap<&str, f64> = rows_b
        .iter()
        .map(|r| (r.weapon.name.as_str(), r.result.total_attack()))
        .collect();

    let added = rows_b
        .iter()
        .map(|r| r.weapon.name.as_str())
        .filter(|n| !totals_a.contains_key(n))
        .map(str::to_string)
        .collect();
    let removed = rows_a
        .iter()
        .map(|r| r.weapon.name.as_str())
        .filter(|n| !totals_b.contains_key(n))
        .map(str::to_string)
        .collect();
    let mut changed: Vec<AttackChange> = rows_a
        .iter()
        .filter_map(|r| {
            let name = r.weapon.name.as_str();
            let before = totals_a[name];
            let after = *totals_b.get(name)?;
            ((after - before).abs() >= epsilon).then(|| AttackChange {
                name: name.to_string(),
                before,
                after,
            })
        })
        .collect();
    changed.sort_by(|a, b| b.delta().abs().total_cmp(&a.delta().abs()));

    VersionDiff {
        generated_at: Utc::now(),
        version_a: version_a.to_string(),
        version_b: version_b.to_string(),
        added,
        removed,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compute_attack, CalcContext};
    use crate::curve::CurveTable;
    use crate::model::fixtures::strength_weapon;
    use crate::model::{Weapon, WeaponType};
    use crate::regulation::RegulationRules;

    fn rows(weapons: &[Weapon]) -> Vec<WeaponTableRow<'_>> {
        let curves = CurveTable::builtin();
        let rules = RegulationRules::default();
        let ctx = CalcContext {
            curves: &curves,
            rules: &rules,
        };
        let attrs = Attributes::new(5, 10, 10, 10, 10);
        weapons
            .iter()
            .map(|w| WeaponTableRow {
                weapon: w,
                result: compute_attack(ctx, w, 0, &attrs, false).unwrap(),
            })
            .collect()
    }

    #[test]
    fn report_row_lists_present_types() {
        let ws = vec![strength_weapon("Club", WeaponType::Hammer, 100.0, 0.5, 10)];
        let row = ReportRow::from_row(&rows(&ws)[0]);
        assert_eq!(row.attack.len(), 1);
        // Unmet strength requirement: 100 - 40.
        assert_eq!(row.attack["physical"], 60.0);
        assert_eq!(row.total_attack, 60.0);
        assert_eq!(row.ineffective_attributes, vec![Attribute::Str]);
        assert_eq!(row.weapon_type, "Hammer");
    }

    #[test]
    fn writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let ws = vec![strength_weapon("Club", WeaponType::Hammer, 100.0, 0.5, 1)];
        let rows = rows(&ws);
        let report: Vec<ReportRow> = rows.iter().map(ReportRow::from_row).collect();
        let path = dir.path().join("out").join("report.json");
        write_json_report(&report, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["name"], "Club");
        assert_eq!(value[0]["affinity"], "Standard");
    }

    #[test]
    fn diff_reports_added_removed_and_changed() {
        let a = vec![
            strength_weapon("Club", WeaponType::Hammer, 100.0, 0.0, 1),
            strength_weapon("Mace", WeaponType::Hammer, 110.0, 0.0, 1),
            strength_weapon("Dagger", WeaponType::Dagger, 70.0, 0.0, 1),
        ];
        let b = vec![
            strength_weapon("Club", WeaponType::Hammer, 120.0, 0.0, 1),
            strength_weapon("Mace", WeaponType::Hammer, 110.0, 0.0, 1),
            strength_weapon("Morning Star", WeaponType::Hammer, 115.0, 0.0, 1),
        ];
        let (ra, rb) = (rows(&a), rows(&b));
        let diff = diff_versions("1.09", &ra, "1.10", &rb, 0.01);
        assert_eq!(diff.added, ["Morning Star"]);
        assert_eq!(diff.removed, ["Dagger"]);
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].name, "Club");
        assert_eq!(diff.changed[0].delta(), 20.0);
    }
}
