use crate::PokedexError;
use crate::cache::{CacheConfig, CacheStats, LruCache};
use crate::config::{DEFAULT_API_BASE, IMAGE_CACHE_MAX_BYTES, POKEMON_CACHE_MAX_ENTRIES};
use crate::pokeapi::{ApiCallType, PokeApiClient, Pokemon};
use std::sync::{Arc, OnceLock, RwLock};
use tracing::{debug, info};

pub type PokemonCache = LruCache<String, Pokemon>;
pub type ImageCache = LruCache<String, Vec<u8>>;

// Global singletons - initialized once, shared everywhere
static POKEAPI_CLIENT: OnceLock<PokeApiClient> = OnceLock::new();
static POKEMON_CACHE: OnceLock<Arc<RwLock<PokemonCache>>> = OnceLock::new();
static IMAGE_CACHE: OnceLock<Arc<RwLock<ImageCache>>> = OnceLock::new();

/// Configure the shared client before first use. Returns false when the
/// client was already created.
pub fn init_pokeapi_client(base_url: &str) -> Result<bool, PokedexError> {
    if POKEAPI_CLIENT.get().is_some() {
        return Ok(false);
    }
    let client = PokeApiClient::with_base_url(base_url)?;
    info!(base_url = %client.base_url(), "PokeAPI client initialized");
    Ok(POKEAPI_CLIENT.set(client).is_ok())
}

pub fn get_pokeapi_client() -> &'static PokeApiClient {
    POKEAPI_CLIENT.get_or_init(|| {
        PokeApiClient::with_base_url(DEFAULT_API_BASE).expect("Failed to create PokeApiClient")
    })
}

pub fn get_pokemon_cache() -> &'static Arc<RwLock<PokemonCache>> {
    POKEMON_CACHE.get_or_init(|| {
        let config = CacheConfig {
            max_entries: Some(POKEMON_CACHE_MAX_ENTRIES),
            max_size_bytes: None,
        };
        Arc::new(RwLock::new(LruCache::new("pokemon", config)))
    })
}

pub fn get_image_cache() -> &'static Arc<RwLock<ImageCache>> {
    IMAGE_CACHE.get_or_init(|| {
        let config = CacheConfig {
            max_entries: None,
            max_size_bytes: Some(IMAGE_CACHE_MAX_BYTES),
        };
        Arc::new(RwLock::new(LruCache::new("image", config)))
    })
}

/// Detail record for a listing url, fetched once per process
pub async fn get_or_fetch_pokemon(url: &str) -> Result<Pokemon, PokedexError> {
    let cache = get_pokemon_cache();

    // Separate scope so the lock is released before awaiting
    let cached = {
        let mut guard = cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.get(&url.to_string())
    };

    if let Some(pokemon) = cached {
        debug!(url = %url, "Pokemon cache HIT");
        PokeApiClient::record_cache_operation(url, ApiCallType::CacheHit);
        return Ok(pokemon);
    }

    debug!(url = %url, "Pokemon cache MISS, fetching from API");
    PokeApiClient::record_cache_operation(url, ApiCallType::CacheMiss);
    let pokemon = get_pokeapi_client().pokemon_by_url(url).await?;

    {
        let mut guard = cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(url.to_string(), pokemon.clone());
    }

    Ok(pokemon)
}

/// Detail record by id or name, sharing the cache with listing urls
pub async fn get_or_fetch_pokemon_by_id(id_or_name: &str) -> Result<Pokemon, PokedexError> {
    let url = get_pokeapi_client().pokemon_url(id_or_name);
    get_or_fetch_pokemon(&url).await
}

pub async fn get_or_fetch_image_bytes(url: &str) -> Result<Vec<u8>, PokedexError> {
    let cache = get_image_cache();

    let cached = {
        let mut guard = cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.get(&url.to_string())
    };

    match cached {
        Some(bytes) => Ok(bytes),
        None => {
            debug!(url = %url, "Image cache MISS, fetching from network");
            let bytes = get_pokeapi_client().image_bytes(url).await?;
            {
                let mut guard = cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
                guard.insert(url.to_string(), bytes.clone());
            }
            Ok(bytes)
        }
    }
}

/// Statistics for the detail record and image caches
pub fn get_cache_info() -> (CacheStats, CacheStats) {
    let pokemon = get_pokemon_cache()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .stats();
    let images = get_image_cache()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .stats();
    (pokemon, images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokeapi::PokemonStat;

    fn cached_pokemon(url: &str) -> Pokemon {
        let pokemon = Pokemon {
            id: 9001,
            name: "testmon".to_string(),
            height: 1,
            weight: 2,
            types: vec!["normal".to_string()],
            abilities: vec![],
            stats: vec![PokemonStat {
                name: "hp".to_string(),
                base_stat: 10,
            }],
            artwork_url: None,
        };
        get_pokemon_cache()
            .write()
            .unwrap()
            .insert(url.to_string(), pokemon.clone());
        pokemon
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        // Not a reachable host: a cache miss would fail
        let url = "http://127.0.0.1:9/pokemon/9001/";
        let expected = cached_pokemon(url);

        let pokemon = get_or_fetch_pokemon(url).await.unwrap();
        assert_eq!(pokemon, expected);
    }

    #[test]
    fn test_cache_info_counts_entries() {
        cached_pokemon("http://127.0.0.1:9/pokemon/9002/");
        let (pokemon, _images) = get_cache_info();
        assert!(pokemon.entry_count >= 1);
    }

    #[test]
    fn test_image_cache_stays_within_byte_limit() {
        let image_size = 256 * 1024;
        let inserted = (IMAGE_CACHE_MAX_BYTES / image_size) as usize + 50;
        {
            let mut cache = get_image_cache().write().unwrap();
            for i in 0..inserted {
                cache.insert(
                    format!("http://127.0.0.1:9/artwork/{}.png", i),
                    vec![0u8; image_size as usize],
                );
            }
        }

        let (_pokemon, images) = get_cache_info();
        assert!(images.size_bytes <= IMAGE_CACHE_MAX_BYTES);
        assert!(images.entry_count < inserted);

        let cache = get_image_cache().read().unwrap();
        assert!(!cache.contains(&"http://127.0.0.1:9/artwork/0.png".to_string()));
        assert!(cache.contains(&format!("http://127.0.0.1:9/artwork/{}.png", inserted - 1)));
    }
}
