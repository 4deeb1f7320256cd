//! Weapon table query: filter, compute at the requested level, sort, limit.

use crate::calc::{compute_attack, CalcError, WeaponTableRow};
use crate::config::CalcConfig;
use crate::filter::{filter_weapons, FilterCriteria};
use crate::model::Attributes;
use crate::regulation::Regulation;
use crate::sort::{sort_weapons, SortBy};

/// A parsed, validated calculator query.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcQuery {
    pub attributes: Attributes,
    pub two_handing: bool,
    /// Standard upgrade level; somber weapons get their mapped equivalent.
    pub upgrade_level: usize,
    pub criteria: FilterCriteria,
    pub sort_by: SortBy,
    pub reverse: bool,
    pub limit: Option<usize>,
}

impl CalcQuery {
    pub fn from_config(config: &CalcConfig) -> Result<Self, String> {
        let attributes = Attributes::from_input(config.attributes.0);
        let criteria = FilterCriteria {
            weapon_types: config.weapon_types.iter().copied().collect(),
            affinities: config.affinities.iter().copied().collect(),
            effective_with_attributes: config.effective_only.then_some(attributes),
            two_handing: config.two_handing,
        };
        Ok(Self {
            attributes,
            two_handing: config.two_handing,
            upgrade_level: config.upgrade_level,
            criteria,
            sort_by: config.sort_by.parse()?,
            reverse: config.reverse,
            limit: config.limit,
        })
    }
}

/// Run `query` against one regulation version.
pub fn run_query<'a>(
    regulation: &'a Regulation,
    query: &CalcQuery,
) -> Result<Vec<WeaponTableRow<'a>>, CalcError> {
    let ctx = regulation.calc_context();
    let weapons = filter_weapons(&regulation.weapons, &query.criteria, &regulation.rules);
    let mut rows = Vec::with_capacity(weapons.len());
    for weapon in weapons {
        let level = weapon.resolve_upgrade_level(query.upgrade_level);
        let result = compute_attack(ctx, weapon, level, &query.attributes, query.two_handing)?;
        rows.push(WeaponTableRow { weapon, result });
    }
    let mut rows = sort_weapons(rows, query.sort_by, query.reverse);
    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }
    tracing::debug!(rows = rows.len(), sort_by = %query.sort_by, "query complete");
    Ok(rows)
}
