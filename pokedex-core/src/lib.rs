pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod globals;
pub mod listing;
pub mod pagination;
pub mod pokeapi;
pub mod routes;
pub mod session;

pub use cache::{CacheConfig, CacheStats, LruCache};
pub use error::PokedexError;
pub use filter::{TypeFilter, filter_by_name};
pub use globals::{
    get_cache_info, get_or_fetch_image_bytes, get_or_fetch_pokemon, get_or_fetch_pokemon_by_id,
    get_pokeapi_client, init_pokeapi_client,
};
pub use listing::{ListingState, Upstream};
pub use pagination::{PAGES_PER_BLOCK, PageResult, PageSize, paginate};
pub use pokeapi::{NamedResource, PokeApiClient, Pokemon, PokemonStat, StatTier};
pub use routes::{Route, resolve};
pub use session::{Session, TrainerStore};

use config::POKEMON_LIST_LIMIT;

/// Entry points shared by the front-ends
pub struct Pokedex;

impl Pokedex {
    /// Fetch the list the listing needs for its selected type
    pub async fn fetch_upstream(upstream: &Upstream) -> Result<Vec<NamedResource>, PokedexError> {
        let client = get_pokeapi_client();
        match upstream {
            Upstream::All => client.list_pokemon(POKEMON_LIST_LIMIT).await,
            Upstream::ByType(type_name) => client.pokemon_by_type(type_name).await,
        }
    }

    pub async fn fetch_types() -> Result<Vec<String>, PokedexError> {
        get_pokeapi_client().list_types().await
    }

    /// Build a listing for a type and name query, ready to paginate
    pub async fn load_listing(
        type_filter: TypeFilter,
        name_query: &str,
    ) -> Result<ListingState, PokedexError> {
        let mut listing = ListingState::new();
        listing.set_type(type_filter);
        let pokemons = Self::fetch_upstream(&listing.upstream()).await?;
        listing.set_pokemons(pokemons);
        listing.set_name_query(name_query);
        Ok(listing)
    }

    pub async fn pokemon(id_or_name: &str) -> Result<Pokemon, PokedexError> {
        get_or_fetch_pokemon_by_id(id_or_name).await
    }
}
