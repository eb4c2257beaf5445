use crate::session::Session;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DETAIL_PATH: Regex = Regex::new(r"^/pokedex/([^/]+)/?$").unwrap();
    static ref LISTING_PATH: Regex = Regex::new(r"^/pokedex/?$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Pokedex,
    PokemonDetail(String),
}

impl Route {
    /// Map a path to a route. Unknown paths go home.
    pub fn parse(path: &str) -> Route {
        let path = path.trim();
        if LISTING_PATH.is_match(path) {
            Route::Pokedex
        } else if let Some(captures) = DETAIL_PATH.captures(path) {
            Route::PokemonDetail(captures[1].to_string())
        } else {
            Route::Home
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Pokedex => "/pokedex".to_string(),
            Route::PokemonDetail(id) => format!("/pokedex/{}", id),
        }
    }

    pub fn requires_trainer(&self) -> bool {
        !matches!(self, Route::Home)
    }
}

/// Apply the trainer-name guard: pokedex routes need a logged-in trainer
pub fn resolve(route: Route, session: &Session) -> Route {
    if route.requires_trainer() && !session.is_authenticated() {
        log::debug!("No trainer name, redirecting {} to /", route.path());
        Route::Home
    } else {
        route
    }
}
