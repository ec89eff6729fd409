// Wire models for the lookup service
use serde::{Deserialize, Serialize};

/// One creature record as returned by the lookup endpoint.
///
/// Every field the payload may omit is optional; absent values render as
/// "unknown" rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub name: Option<String>,
    /// Height in decimeters.
    pub height: Option<u32>,
    /// Weight in hectograms.
    pub weight: Option<u32>,
    pub types: Option<Vec<String>>,
    pub abilities: Option<Vec<String>>,
    #[serde(default)]
    pub stats: StatBlock,
    #[serde(default)]
    pub sprites: Vec<String>,
    pub cries: Option<String>,
}

/// The six battle statistics. Each may be absent independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatBlock {
    pub attack: Option<u32>,
    pub defense: Option<u32>,
    pub hp: Option<u32>,
    #[serde(rename = "special-attack")]
    pub special_attack: Option<u32>,
    #[serde(rename = "special-defense")]
    pub special_defense: Option<u32>,
    pub speed: Option<u32>,
}

/// Structured failure body returned with error statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub msg: String,
}
