//! Affinities and weapon categories. The `ALL` tables are the ordering shared by the
//! weapon codec's encoder and decoder; reordering them breaks the wire format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Affinity {
    /// Fixed variant that can never be infused.
    Unique,
    /// No infusion applied.
    Standard,
    Heavy,
    Keen,
    Quality,
    Fire,
    FlameArt,
    Lightning,
    Sacred,
    Magic,
    Cold,
    Poison,
    Blood,
    Occult,
}

impl Affinity {
    pub const ALL: [Affinity; 14] = [
        Affinity::Unique,
        Affinity::Standard,
        Affinity::Heavy,
        Affinity::Keen,
        Affinity::Quality,
        Affinity::Fire,
        Affinity::FlameArt,
        Affinity::Lightning,
        Affinity::Sacred,
        Affinity::Magic,
        Affinity::Cold,
        Affinity::Poison,
        Affinity::Blood,
        Affinity::Occult,
    ];

    /// Signed id used by regulation data: -1 for unique, 0 for standard, 1.. for infusions.
    pub fn id(self) -> i32 {
        self.index() as i32 - 1
    }

    pub fn from_id(id: i32) -> Option<Affinity> {
        id.checked_add(1)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Affinity> {
        Self::ALL.get(i).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Affinity::Unique => "Unique",
            Affinity::Standard => "Standard",
            Affinity::Heavy => "Heavy",
            Affinity::Keen => "Keen",
            Affinity::Quality => "Quality",
            Affinity::Fire => "Fire",
            Affinity::FlameArt => "Flame Art",
            Affinity::Lightning => "Lightning",
            Affinity::Sacred => "Sacred",
            Affinity::Magic => "Magic",
            Affinity::Cold => "Cold",
            Affinity::Poison => "Poison",
            Affinity::Blood => "Blood",
            Affinity::Occult => "Occult",
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Affinity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = crate::util::normalize_key(s);
        Affinity::ALL
            .iter()
            .copied()
            .find(|a| crate::util::normalize_key(a.name()) == key)
            .ok_or_else(|| format!("unknown affinity: {}", s))
    }
}

macro_rules! weapon_types {
    ($($variant:ident = $id:literal, $name:literal;)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum WeaponType {
            $($variant,)*
        }

        impl WeaponType {
            pub const ALL: &'static [WeaponType] = &[$(WeaponType::$variant,)*];

            /// Game category id used by regulation data.
            pub fn id(self) -> u32 {
                match self {
                    $(WeaponType::$variant => $id,)*
                }
            }

            pub fn from_id(id: u32) -> Option<WeaponType> {
                match id {
                    $($id => Some(WeaponType::$variant),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(WeaponType::$variant => $name,)*
                }
            }
        }
    };
}

weapon_types! {
    Dagger = 1, "Dagger";
    StraightSword = 3, "Straight Sword";
    Greatsword = 5, "Greatsword";
    ColossalSword = 7, "Colossal Sword";
    CurvedSword = 9, "Curved Sword";
    CurvedGreatsword = 11, "Curved Greatsword";
    Katana = 13, "Katana";
    Twinblade = 14, "Twinblade";
    ThrustingSword = 15, "Thrusting Sword";
    HeavyThrustingSword = 16, "Heavy Thrusting Sword";
    Axe = 17, "Axe";
    Greataxe = 19, "Greataxe";
    Hammer = 21, "Hammer";
    GreatHammer = 23, "Great Hammer";
    Flail = 24, "Flail";
    Spear = 25, "Spear";
    GreatSpear = 28, "Great Spear";
    Halberd = 29, "Halberd";
    Reaper = 31, "Reaper";
    Fist = 35, "Fist";
    Claw = 37, "Claw";
    Whip = 39, "Whip";
    ColossalWeapon = 41, "Colossal Weapon";
    LightBow = 50, "Light Bow";
    Bow = 51, "Bow";
    Greatbow = 53, "Greatbow";
    Crossbow = 55, "Crossbow";
    Ballista = 56, "Ballista";
    GlintstoneStaff = 57, "Glintstone Staff";
    SacredSeal = 61, "Sacred Seal";
    SmallShield = 65, "Small Shield";
    MediumShield = 67, "Medium Shield";
    Greatshield = 69, "Greatshield";
    Torch = 87, "Torch";
    HandToHand = 88, "Hand-to-Hand Art";
    PerfumeBottle = 89, "Perfume Bottle";
    ThrustingShield = 90, "Thrusting Shield";
    ThrowingBlade = 91, "Throwing Blade";
    BackhandBlade = 92, "Backhand Blade";
    LightGreatsword = 93, "Light Greatsword";
    GreatKatana = 94, "Great Katana";
    BeastClaw = 95, "Beast Claw";
}

impl WeaponType {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<WeaponType> {
        Self::ALL.get(i).copied()
    }

    /// Categories that cannot take an affinity. Filters treat them as standard or unique.
    pub fn is_uninfusable(self) -> bool {
        matches!(
            self,
            WeaponType::LightBow
                | WeaponType::Bow
                | WeaponType::Greatbow
                | WeaponType::Crossbow
                | WeaponType::Ballista
                | WeaponType::GlintstoneStaff
                | WeaponType::SacredSeal
                | WeaponType::Torch
                | WeaponType::PerfumeBottle
        )
    }

    /// Categories that can only be wielded with both hands.
    pub fn is_always_two_handed(self) -> bool {
        matches!(
            self,
            WeaponType::LightBow | WeaponType::Bow | WeaponType::Greatbow | WeaponType::Ballista
        )
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeaponType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = crate::util::normalize_key(s);
        WeaponType::ALL
            .iter()
            .copied()
            .find(|t| crate::util::normalize_key(t.name()) == key)
            .ok_or_else(|| format!("unknown weapon type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affinity_ids_round_trip() {
        assert_eq!(Affinity::Unique.id(), -1);
        assert_eq!(Affinity::Standard.id(), 0);
        assert_eq!(Affinity::Occult.id(), 12);
        for a in Affinity::ALL {
            assert_eq!(Affinity::from_id(a.id()), Some(a));
        }
        assert_eq!(Affinity::from_id(13), None);
        assert_eq!(Affinity::from_id(-2), None);
        assert_eq!(Affinity::from_id(i32::MAX), None);
        assert_eq!(Affinity::from_id(i32::MIN), None);
    }

    #[test]
    fn weapon_type_index_matches_table() {
        for (i, t) in WeaponType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
            assert_eq!(WeaponType::from_id(t.id()), Some(*t));
        }
        assert_eq!(WeaponType::from_id(2), None);
    }

    #[test]
    fn parse_names_loosely() {
        assert_eq!("flame art".parse::<Affinity>(), Ok(Affinity::FlameArt));
        assert_eq!("FlameArt".parse::<Affinity>(), Ok(Affinity::FlameArt));
        assert_eq!(
            "glintstone-staff".parse::<WeaponType>(),
            Ok(WeaponType::GlintstoneStaff)
        );
        assert!("lance".parse::<WeaponType>().is_err());
    }

    #[test]
    fn category_flags() {
        assert!(WeaponType::Bow.is_always_two_handed());
        assert!(!WeaponType::Crossbow.is_always_two_handed());
        assert!(WeaponType::Crossbow.is_uninfusable());
        assert!(!WeaponType::Katana.is_uninfusable());
    }
}
