use crate::config::MAX_BASE_STAT;
use crate::error::PokedexError;
use serde::{Deserialize, Serialize};

/// A `{name, url}` reference as returned by PokeAPI list endpoints
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

impl NamedResource {
    pub fn new(name: &str, url: &str) -> Self {
        NamedResource {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    /// Numeric id from the last path segment, e.g. `.../pokemon/25/` -> 25
    pub fn id(&self) -> Option<u32> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NamedResourceList {
    pub count: Option<u32>,
    pub next: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TypeMember {
    pub slot: Option<u32>,
    pub pokemon: NamedResource,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TypeDetail {
    pub name: String,
    pub pokemon: Vec<TypeMember>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTier {
    Low,
    Medium,
    High,
}

impl StatTier {
    pub fn from_base_stat(base_stat: u32) -> Self {
        if base_stat < 50 {
            StatTier::Low
        } else if base_stat < 80 {
            StatTier::Medium
        } else {
            StatTier::High
        }
    }

    /// Color name used by the views for this tier
    pub fn color_name(self) -> &'static str {
        match self {
            StatTier::Low => "green",
            StatTier::Medium => "yellow",
            StatTier::High => "red",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PokemonStat {
    pub name: String,
    pub base_stat: u32,
}

impl PokemonStat {
    /// Width of the stat bar in whole percent of [`MAX_BASE_STAT`], at most 100
    pub fn bar_percent(&self) -> u32 {
        let percent = u64::from(self.base_stat) * 100 / u64::from(MAX_BASE_STAT);
        percent.min(100) as u32
    }

    pub fn tier(&self) -> StatTier {
        StatTier::from_base_stat(self.base_stat)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub artwork_url: Option<String>,
}

impl Pokemon {
    pub fn from_api_object(
        d: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Pokemon, PokedexError> {
        let id = d
            .get("id")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| PokedexError::InvalidPokemon("Missing id field".to_string()))?;
        let id = to_u32(id, "id")?;

        let name = d
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| PokedexError::InvalidPokemon("Missing name field".to_string()))?
            .to_string();

        let height = to_u32(d.get("height").and_then(|v| v.as_u64()).unwrap_or(0), "height")?;
        let weight = to_u32(d.get("weight").and_then(|v| v.as_u64()).unwrap_or(0), "weight")?;

        let types = nested_names(d, "types", "type")?;
        let abilities = nested_names(d, "abilities", "ability")?;

        let stats = d
            .get("stats")
            .and_then(|v| v.as_array())
            .ok_or_else(|| PokedexError::InvalidPokemon("Missing stats field".to_string()))?
            .iter()
            .map(|entry| {
                let name = entry["stat"]["name"].as_str().ok_or_else(|| {
                    PokedexError::InvalidPokemon("Missing stat name".to_string())
                })?;
                let base_stat = entry["base_stat"].as_u64().ok_or_else(|| {
                    PokedexError::InvalidPokemon(format!("Missing base_stat for {}", name))
                })?;
                Ok(PokemonStat {
                    name: name.to_string(),
                    base_stat: to_u32(base_stat, name)?,
                })
            })
            .collect::<Result<Vec<_>, PokedexError>>()?;

        // Some forms have no official artwork
        let artwork_url = d
            .get("sprites")
            .and_then(|sprites| sprites["other"]["official-artwork"]["front_default"].as_str())
            .map(String::from);

        Ok(Pokemon {
            id,
            name,
            height,
            weight,
            types,
            abilities,
            stats,
            artwork_url,
        })
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// First two types joined for display, e.g. "grass / poison"
    pub fn type_line(&self) -> String {
        self.types
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

fn to_u32(value: u64, field: &str) -> Result<u32, PokedexError> {
    u32::try_from(value)
        .map_err(|_| PokedexError::InvalidPokemon(format!("{} out of range: {}", field, value)))
}

/// Collect `d[list][i][key].name`, e.g. `types[i].type.name`
fn nested_names(
    d: &serde_json::Map<String, serde_json::Value>,
    list: &str,
    key: &str,
) -> Result<Vec<String>, PokedexError> {
    let entries = d
        .get(list)
        .and_then(|v| v.as_array())
        .ok_or_else(|| PokedexError::InvalidPokemon(format!("Missing {} field", list)))?;

    entries
        .iter()
        .map(|entry| {
            entry[key]["name"]
                .as_str()
                .map(String::from)
                .ok_or_else(|| PokedexError::InvalidPokemon(format!("Missing {} name", key)))
        })
        .collect()
}
