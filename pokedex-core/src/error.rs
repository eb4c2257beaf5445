use std::fmt;

#[derive(Debug)]
pub enum PokedexError {
    Network(reqwest::Error),
    Json(serde_json::Error),
    NotFound(String),
    InvalidPokemon(String),
    Storage(String),
    Io(std::io::Error),
}

impl fmt::Display for PokedexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PokedexError::Network(e) => write!(f, "Network error: {}", e),
            PokedexError::Json(e) => write!(f, "JSON parsing error: {}", e),
            PokedexError::NotFound(e) => write!(f, "Not found: {}", e),
            PokedexError::InvalidPokemon(e) => write!(f, "Invalid pokemon: {}", e),
            PokedexError::Storage(e) => write!(f, "Storage error: {}", e),
            PokedexError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PokedexError {}

impl From<reqwest::Error> for PokedexError {
    fn from(err: reqwest::Error) -> Self {
        PokedexError::Network(err)
    }
}

impl From<serde_json::Error> for PokedexError {
    fn from(err: serde_json::Error) -> Self {
        PokedexError::Json(err)
    }
}

impl From<std::io::Error> for PokedexError {
    fn from(err: std::io::Error) -> Self {
        PokedexError::Io(err)
    }
}
