//! Record types for the Pokédex dataset.
//!
//! These mirror the shape of the bulk JSON source: snake_case field names,
//! one record per stringified id. Records are immutable once loaded.

use serde::{Deserialize, Serialize};

/// One creature entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Height in decimetres.
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms.
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Category tags, one or two per record.
    pub types: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<BaseStat>,
    #[serde(default)]
    pub sprites: Sprites,
}

impl Pokemon {
    /// Base value for one stat kind, if the record carries it.
    pub fn stat(&self, kind: StatKind) -> Option<u32> {
        self.stats
            .iter()
            .find(|s| s.name == kind)
            .map(|s| s.base_stat)
    }

    /// Sum of all base stats.
    pub fn base_stat_total(&self) -> u32 {
        self.stats.iter().map(|s| s.base_stat).sum()
    }
}

/// An ability the creature can have, with the locator used to resolve its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub name: String,
    /// Fully-qualified URL of the upstream ability resource.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_hidden: bool,
    pub slot: u8,
}

/// The six recognised stat kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Hp,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::SpecialAttack,
        StatKind::SpecialDefense,
        StatKind::Speed,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: StatKind,
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
}

/// Optional image references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_shiny: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_shiny: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_artwork: Option<String>,
}

/// Resolved English description of an ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDescription {
    pub name: String,
    pub effect: String,
}
