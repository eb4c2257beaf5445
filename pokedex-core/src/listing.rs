//! View model behind the pokemon listing.
//!
//! Owns the mutable inputs of the listing (fetched pokemon, name query,
//! selected type, current page and page-size text). Pagination itself is
//! recomputed from those inputs on every [`ListingState::page`] call.

use crate::config::DEFAULT_PAGE_SIZE;
use crate::filter::{TypeFilter, filter_by_name};
use crate::pagination::{PageResult, PageSize, paginate};
use crate::pokeapi::NamedResource;
use log::debug;

/// Which upstream list the listing needs for its current type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upstream {
    All,
    ByType(String),
}

#[derive(Debug, Clone)]
pub struct ListingState {
    pokemons: Vec<NamedResource>,
    filtered: Vec<NamedResource>,
    types: Vec<String>,
    name_query: String,
    current_type: TypeFilter,
    current_page: i64,
    page_size_text: String,
}

impl ListingState {
    pub fn new() -> Self {
        Self {
            pokemons: Vec::new(),
            filtered: Vec::new(),
            types: Vec::new(),
            name_query: String::new(),
            current_type: TypeFilter::All,
            current_page: 1,
            page_size_text: DEFAULT_PAGE_SIZE.to_string(),
        }
    }

    /// Current page of the name-filtered pokemon
    pub fn page(&self) -> PageResult<'_, NamedResource> {
        paginate(self.current_page, &self.filtered, self.page_size())
    }

    pub fn page_size(&self) -> PageSize {
        PageSize::parse(&self.page_size_text)
    }

    pub fn filtered(&self) -> &[NamedResource] {
        &self.filtered
    }

    pub fn pokemons(&self) -> &[NamedResource] {
        &self.pokemons
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    pub fn current_type(&self) -> &TypeFilter {
        &self.current_type
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn page_size_text(&self) -> &str {
        &self.page_size_text
    }

    pub fn upstream(&self) -> Upstream {
        match &self.current_type {
            TypeFilter::All => Upstream::All,
            TypeFilter::Type(name) => Upstream::ByType(name.clone()),
        }
    }

    /// Replace the fetched list. The current page is kept as is.
    pub fn set_pokemons(&mut self, pokemons: Vec<NamedResource>) {
        self.pokemons = pokemons;
        self.refilter();
    }

    pub fn set_types(&mut self, types: Vec<String>) {
        self.types = types;
    }

    pub fn set_name_query(&mut self, query: &str) {
        self.name_query = query.to_string();
        self.current_page = 1;
        self.refilter();
    }

    /// Select a type. Clears the name query and returns to page 1; the
    /// caller refetches [`ListingState::upstream`] afterwards.
    pub fn set_type(&mut self, type_filter: TypeFilter) {
        debug!("Listing type changed to {}", type_filter);
        self.current_type = type_filter;
        self.name_query.clear();
        self.current_page = 1;
        self.refilter();
    }

    /// Store the raw page-size text; it is converted when paginating
    pub fn set_page_size(&mut self, text: &str) {
        self.page_size_text = text.to_string();
    }

    pub fn previous_page(&mut self) -> bool {
        let target = self.page().prev_page();
        match target {
            Some(page) => {
                self.current_page = page;
                true
            }
            None => false,
        }
    }

    pub fn next_page(&mut self) -> bool {
        let target = self.page().next_page();
        match target {
            Some(page) => {
                self.current_page = page;
                true
            }
            None => false,
        }
    }

    /// Jump to a page number from the navigation block
    pub fn go_to_page(&mut self, page: usize) {
        let last_page = self.page().last_page;
        self.current_page = page.clamp(1, last_page) as i64;
    }

    fn refilter(&mut self) {
        self.filtered = filter_by_name(&self.pokemons, &self.name_query);
    }
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokemons(count: usize) -> Vec<NamedResource> {
        (1..=count)
            .map(|i| {
                NamedResource::new(
                    &format!("mon{}", i),
                    &format!("https://pokeapi.co/api/v2/pokemon/{}/", i),
                )
            })
            .collect()
    }

    #[test]
    fn test_default_state() {
        let state = ListingState::new();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_size().get(), 12);
        assert_eq!(state.upstream(), Upstream::All);

        let page = state.page();
        assert!(page.items_on_page.is_empty());
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn test_next_and_previous_are_clamped() {
        let mut state = ListingState::new();
        state.set_pokemons(pokemons(27));

        assert!(!state.previous_page());
        assert!(state.next_page());
        assert!(state.next_page());
        assert_eq!(state.current_page(), 3);
        assert!(!state.next_page());
        assert_eq!(state.current_page(), 3);
        assert_eq!(state.page().items_on_page.len(), 3);

        assert!(state.previous_page());
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn test_name_query_resets_page() {
        let mut state = ListingState::new();
        state.set_pokemons(pokemons(27));
        state.next_page();

        state.set_name_query("MON1");
        assert_eq!(state.current_page(), 1);
        // mon1, mon10..mon19
        assert_eq!(state.filtered().len(), 11);
        assert_eq!(state.page().items_on_page.len(), 11);
    }

    #[test]
    fn test_type_change_clears_query_and_page() {
        let mut state = ListingState::new();
        state.set_pokemons(pokemons(40));
        state.set_name_query("mon2");
        state.next_page();

        state.set_type(TypeFilter::Type("fire".into()));
        assert_eq!(state.name_query(), "");
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.upstream(), Upstream::ByType("fire".into()));
        assert_eq!(state.filtered().len(), 40);
    }

    #[test]
    fn test_shrinking_list_leaves_page_out_of_range() {
        let mut state = ListingState::new();
        state.set_pokemons(pokemons(50));
        state.go_to_page(5);
        assert_eq!(state.current_page(), 5);

        state.set_pokemons(pokemons(10));
        {
            let page = state.page();
            assert!(page.items_on_page.is_empty());
            assert!(page.is_out_of_range());
            assert_eq!(page.last_page, 1);
        }

        assert!(state.previous_page());
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_page_size_text_is_coerced() {
        let mut state = ListingState::new();
        state.set_pokemons(pokemons(27));

        state.set_page_size("8");
        assert_eq!(state.page().last_page, 4);

        state.set_page_size("garbage");
        assert_eq!(state.page_size().get(), 1);
        assert_eq!(state.page().last_page, 27);
        assert_eq!(state.page_size_text(), "garbage");
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut state = ListingState::new();
        state.set_pokemons(pokemons(27));

        state.go_to_page(0);
        assert_eq!(state.current_page(), 1);
        state.go_to_page(99);
        assert_eq!(state.current_page(), 3);
    }
}
