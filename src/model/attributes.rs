//! Character attributes and the fixed-shape per-attribute map.

use crate::config::{MAX_ATTRIBUTE_VALUE, MIN_ATTRIBUTE_VALUE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// The five scaling attributes. Declaration order is the canonical order used by
/// every fixed-shape array and by the weapon codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "str")]
    Str,
    #[serde(rename = "dex")]
    Dex,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "fai")]
    Fai,
    #[serde(rename = "arc")]
    Arc,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Str,
        Attribute::Dex,
        Attribute::Int,
        Attribute::Fai,
        Attribute::Arc,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Attribute> {
        Self::ALL.get(i).copied()
    }

    pub fn key(self) -> &'static str {
        match self {
            Attribute::Str => "str",
            Attribute::Dex => "dex",
            Attribute::Int => "int",
            Attribute::Fai => "fai",
            Attribute::Arc => "arc",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Attribute::Str),
            "dex" | "dexterity" => Ok(Attribute::Dex),
            "int" | "intelligence" => Ok(Attribute::Int),
            "fai" | "faith" => Ok(Attribute::Fai),
            "arc" | "arcane" => Ok(Attribute::Arc),
            other => Err(format!("unknown attribute: {}", other)),
        }
    }
}

/// Fixed-shape map with one slot per attribute.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerAttribute<T>(pub [T; 5]);

impl<T> PerAttribute<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &T)> {
        Attribute::ALL.iter().copied().zip(self.0.iter())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PerAttribute<U> {
        PerAttribute(self.0.map(f))
    }
}

impl<T> Index<Attribute> for PerAttribute<T> {
    type Output = T;

    fn index(&self, attr: Attribute) -> &T {
        &self.0[attr.index()]
    }
}

impl<T> IndexMut<Attribute> for PerAttribute<T> {
    fn index_mut(&mut self, attr: Attribute) -> &mut T {
        &mut self.0[attr.index()]
    }
}

/// A character's attribute values. All five are always present.
pub type Attributes = PerAttribute<u32>;

impl PerAttribute<u32> {
    pub fn new(strength: u32, dexterity: u32, intelligence: u32, faith: u32, arcane: u32) -> Self {
        PerAttribute([strength, dexterity, intelligence, faith, arcane])
    }

    /// Build from user input, clamping every value into the playable range.
    pub fn from_input(values: [u32; 5]) -> Self {
        PerAttribute(values.map(|v| v.clamp(MIN_ATTRIBUTE_VALUE, MAX_ATTRIBUTE_VALUE)))
    }

    /// Attributes of a fresh character with every value at its minimum.
    pub fn minimum() -> Self {
        PerAttribute([MIN_ATTRIBUTE_VALUE; 5])
    }

    /// True when every value meets the matching requirement.
    pub fn meets(&self, requirements: &PerAttribute<u32>) -> bool {
        Attribute::ALL
            .iter()
            .all(|&attr| self[attr] >= requirements[attr])
    }
}
