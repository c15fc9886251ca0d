//! Core data models for the Pokedex CLI
//!
//! JSON shapes returned by PokeAPI for location areas and Pokemon, plus the
//! HTTP client that fetches them through the response cache.

pub mod client;

pub use client::{ApiError, PokeApiClient, DEFAULT_BASE_URL};

use serde::{Deserialize, Serialize};

/// A name/URL pair, PokeAPI's reference to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the location-area listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas
    pub count: u32,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub previous: Option<String>,
    /// Location areas on this page (20 by default)
    pub results: Vec<NamedResource>,
}

/// A single location area and the Pokemon that can be encountered there
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAreaDetail {
    pub name: String,
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

/// Details for one Pokemon species
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Experience gained for defeating it; higher means harder to catch.
    /// Null for some forms in the API.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub base_experience: u32,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub type_: NamedResource,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}
