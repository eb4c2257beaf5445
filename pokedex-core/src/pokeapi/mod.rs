pub mod api;
pub mod client;
pub mod models;

pub use client::{ApiCall, ApiCallType, PokeApiClient};
pub use models::{NamedResource, Pokemon, PokemonStat, StatTier};
