//! Built-in defaults. Front-ends override them through command-line flags.

/// Public PokeAPI endpoint
pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

/// Size of the unfiltered listing fetched when no type is selected
pub const POKEMON_LIST_LIMIT: usize = 1281;

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Page sizes offered by the listing views
pub const PAGE_SIZE_CHOICES: [usize; 6] = [4, 8, 12, 16, 20, 24];

/// Base stats are drawn against this maximum
pub const MAX_BASE_STAT: u32 = 255;

/// Application name used for platform config directories
pub const APP_NAME: &str = "pokedex";

/// Detail records kept in memory. Covers the full unfiltered listing.
pub const POKEMON_CACHE_MAX_ENTRIES: usize = 2000;

/// Artwork bytes kept in memory
pub const IMAGE_CACHE_MAX_BYTES: u64 = 64 * 1024 * 1024;
