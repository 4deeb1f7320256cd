//! Damage and status-buildup types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Every kind of attack power a weapon can have. Discriminants are the ids used by
/// regulation data and define the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttackPowerType {
    Physical = 0,
    Magic = 1,
    Fire = 2,
    Lightning = 3,
    Holy = 4,
    Poison = 5,
    ScarletRot = 6,
    Bleed = 7,
    Frost = 8,
    Sleep = 9,
    Madness = 10,
    DeathBlight = 11,
}

pub const ATTACK_POWER_TYPE_COUNT: usize = 12;

impl AttackPowerType {
    pub const ALL: [AttackPowerType; ATTACK_POWER_TYPE_COUNT] = [
        AttackPowerType::Physical,
        AttackPowerType::Magic,
        AttackPowerType::Fire,
        AttackPowerType::Lightning,
        AttackPowerType::Holy,
        AttackPowerType::Poison,
        AttackPowerType::ScarletRot,
        AttackPowerType::Bleed,
        AttackPowerType::Frost,
        AttackPowerType::Sleep,
        AttackPowerType::Madness,
        AttackPowerType::DeathBlight,
    ];

    pub const DAMAGE_TYPES: [AttackPowerType; 5] = [
        AttackPowerType::Physical,
        AttackPowerType::Magic,
        AttackPowerType::Fire,
        AttackPowerType::Lightning,
        AttackPowerType::Holy,
    ];

    pub const STATUS_TYPES: [AttackPowerType; 7] = [
        AttackPowerType::Poison,
        AttackPowerType::ScarletRot,
        AttackPowerType::Bleed,
        AttackPowerType::Frost,
        AttackPowerType::Sleep,
        AttackPowerType::Madness,
        AttackPowerType::DeathBlight,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_id(id: u8) -> Option<AttackPowerType> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn is_damage(self) -> bool {
        self.index() < Self::DAMAGE_TYPES.len()
    }

    pub fn is_status(self) -> bool {
        !self.is_damage()
    }

    /// camelCase key used in sort keys and reports.
    pub fn key(self) -> &'static str {
        match self {
            AttackPowerType::Physical => "physical",
            AttackPowerType::Magic => "magic",
            AttackPowerType::Fire => "fire",
            AttackPowerType::Lightning => "lightning",
            AttackPowerType::Holy => "holy",
            AttackPowerType::Poison => "poison",
            AttackPowerType::ScarletRot => "scarletRot",
            AttackPowerType::Bleed => "bleed",
            AttackPowerType::Frost => "frost",
            AttackPowerType::Sleep => "sleep",
            AttackPowerType::Madness => "madness",
            AttackPowerType::DeathBlight => "deathBlight",
        }
    }
}

impl fmt::Display for AttackPowerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AttackPowerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        AttackPowerType::ALL
            .iter()
            .copied()
            .find(|t| t.key().to_lowercase() == lower)
            .ok_or_else(|| format!("unknown attack power type: {}", s))
    }
}

/// Fixed-shape map with one slot per attack power type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerAttackPower<T>(pub [T; ATTACK_POWER_TYPE_COUNT]);

impl<T> PerAttackPower<T> {
    pub fn iter(&self) -> impl Iterator<Item = (AttackPowerType, &T)> {
        AttackPowerType::ALL.iter().copied().zip(self.0.iter())
    }
}

impl<T> Index<AttackPowerType> for PerAttackPower<T> {
    type Output = T;

    fn index(&self, t: AttackPowerType) -> &T {
        &self.0[t.index()]
    }
}

impl<T> IndexMut<AttackPowerType> for PerAttackPower<T> {
    fn index_mut(&mut self, t: AttackPowerType) -> &mut T {
        &mut self.0[t.index()]
    }
}

impl<T> PerAttackPower<Option<T>> {
    /// Types with a defined value, in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (AttackPowerType, &T)> {
        self.iter().filter_map(|(t, v)| v.as_ref().map(|v| (t, v)))
    }
}
