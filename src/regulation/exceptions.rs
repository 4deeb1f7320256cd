//! One-off corrections for specific upstream data bugs.
//!
//! Each entry targets a single named weapon or weapon id. None of them describes a
//! general rule; do not extend the decoder's logic from them.

use crate::util::normalize_name;

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionTable {
    /// (weapon name, status slot): the slot ignores the reinforce level's offset, so the
    /// buildup stays at its unupgraded value.
    pub suppressed_status_offsets: Vec<(String, usize)>,
    /// (weapon name, status effect ids): replaces the weapon's status effect ids.
    pub status_overrides: Vec<(String, Vec<Option<u32>>)>,
    /// Weapon ids that upstream lists as infusable but that only exist as a fixed variant.
    pub forced_unique_weapon_ids: Vec<u32>,
}

impl Default for ExceptionTable {
    fn default() -> Self {
        Self {
            suppressed_status_offsets: vec![("Antspur Rapier".to_string(), 0)],
            status_overrides: vec![(
                "Mohgwyn's Sacred Spear".to_string(),
                vec![Some(6_800), None, None],
            )],
            forced_unique_weapon_ids: vec![2_190_000, 16_160_000],
        }
    }
}

impl ExceptionTable {
    /// Table with no corrections.
    pub fn none() -> Self {
        Self {
            suppressed_status_offsets: Vec::new(),
            status_overrides: Vec::new(),
            forced_unique_weapon_ids: Vec::new(),
        }
    }

    pub fn suppresses_status_offset(&self, weapon_name: &str, slot: usize) -> bool {
        let key = normalize_name(weapon_name);
        self.suppressed_status_offsets
            .iter()
            .any(|(name, s)| *s == slot && normalize_name(name) == key)
    }

    pub fn status_override(&self, weapon_name: &str) -> Option<&[Option<u32>]> {
        let key = normalize_name(weapon_name);
        self.status_overrides
            .iter()
            .find(|(name, _)| normalize_name(name) == key)
            .map(|(_, ids)| ids.as_slice())
    }

    pub fn forces_unique(&self, weapon_id: Option<u32>) -> bool {
        weapon_id
            .map(|id| self.forced_unique_weapon_ids.contains(&id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_match_by_normalized_name() {
        let t = ExceptionTable::default();
        assert!(t.suppresses_status_offset("antspur rapier", 0));
        assert!(!t.suppresses_status_offset("Antspur Rapier", 1));
        assert!(t.status_override("Mohgwyn's Sacred Spear").is_some());
        assert!(t.status_override("Longsword").is_none());
        assert!(t.forces_unique(Some(2_190_000)));
        assert!(!t.forces_unique(None));
    }

    #[test]
    fn none_has_no_entries() {
        let t = ExceptionTable::none();
        assert!(!t.suppresses_status_offset("Antspur Rapier", 0));
        assert!(!t.forces_unique(Some(2_190_000)));
    }
}
