use iced::widget::{
    Column, Row, button, column, container, image, pick_list, progress_bar, row, scrollable, text,
    text_input,
};
use iced::{Alignment, Color, Element, Length, Task};
use pokedex_core::config::{MAX_BASE_STAT, PAGE_SIZE_CHOICES};
use pokedex_core::{
    ListingState, NamedResource, Pokedex, Pokemon, PokemonStat, Route, Session, StatTier,
    TrainerStore, TypeFilter, Upstream, get_or_fetch_image_bytes, get_or_fetch_pokemon, resolve,
};
use std::collections::{HashMap, HashSet};

const CARDS_PER_ROW: usize = 4;
const CARD_WIDTH: f32 = 220.0;
const CARD_IMAGE_SIZE: f32 = 150.0;
const DETAIL_IMAGE_SIZE: f32 = 260.0;

#[derive(Debug, Clone)]
pub enum Message {
    // Home
    NameInputChanged(String),
    Start,
    Logout,

    Navigate(Route),

    // Listing
    TypesLoaded(Result<Vec<String>, String>),
    PokemonsLoaded(Upstream, Result<Vec<NamedResource>, String>),
    SearchInputChanged(String),
    SearchSubmitted,
    TypeSelected(TypeFilter),
    PageSizeSelected(usize),
    PreviousPage,
    NextPage,
    GoToPage(usize),
    CardLoaded(String, Result<Pokemon, String>),
    ImageLoaded(String, Result<Vec<u8>, String>),

    // Detail
    DetailLoaded(String, Result<Pokemon, String>),
}

pub struct AppState {
    session: Session,
    route: Route,
    name_input: String,
    search_input: String,
    listing: ListingState,
    is_loading_listing: bool,
    cards: HashMap<String, Pokemon>,
    images: HashMap<String, image::Handle>,
    detail: Option<Pokemon>,
    error_message: Option<String>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            name_input: session.trainer_name().to_string(),
            session,
            route: Route::Home,
            search_input: String::new(),
            listing: ListingState::new(),
            is_loading_listing: false,
            cards: HashMap::new(),
            images: HashMap::new(),
            detail: None,
            error_message: None,
        }
    }
}

pub fn initialize() -> (AppState, Task<Message>) {
    let store = TrainerStore::new().unwrap_or_else(|e| {
        log::warn!("{}; keeping the trainer name in the temp directory", e);
        TrainerStore::with_path(std::env::temp_dir().join("pokedex-trainer.json"))
    });
    let mut state = AppState::new(Session::load(store));
    // Returning trainers skip the landing page
    let task = navigate(&mut state, Route::Pokedex);
    (state, task)
}

pub fn update(state: &mut AppState, message: Message) -> Task<Message> {
    match message {
        Message::NameInputChanged(name) => {
            state.name_input = name;
        }
        Message::Start => {
            if state.name_input.trim().is_empty() {
                state.error_message = Some("Please type your name first!".to_string());
                return Task::none();
            }
            let saved = state.session.set_trainer_name(&state.name_input);
            let task = navigate(state, Route::Pokedex);
            if let Err(e) = saved {
                log::error!("Failed to save trainer name: {}", e);
                state.error_message = Some(e.to_string());
            }
            return task;
        }
        Message::Logout => {
            if let Err(e) = state.session.logout() {
                log::error!("Failed to clear trainer name: {}", e);
            }
            state.name_input.clear();
            return navigate(state, Route::Pokedex);
        }
        Message::Navigate(route) => {
            return navigate(state, route);
        }
        Message::TypesLoaded(result) => match result {
            Ok(types) => state.listing.set_types(types),
            Err(e) => log::error!("Failed to load types: {}", e),
        },
        Message::PokemonsLoaded(upstream, result) => {
            // A newer type selection superseded this response
            if upstream != state.listing.upstream() {
                log::debug!("Dropping stale listing for {:?}", upstream);
                return Task::none();
            }
            state.is_loading_listing = false;
            match result {
                Ok(pokemons) => {
                    state.listing.set_pokemons(pokemons);
                    state.error_message = None;
                    return load_visible_cards(state);
                }
                Err(e) => {
                    log::error!("Failed to load pokemon: {}", e);
                    state.error_message = Some(e);
                }
            }
        }
        Message::SearchInputChanged(query) => {
            state.search_input = query;
        }
        Message::SearchSubmitted => {
            state.listing.set_name_query(&state.search_input);
            return load_visible_cards(state);
        }
        Message::TypeSelected(type_filter) => {
            state.listing.set_type(type_filter);
            state.search_input.clear();
            return fetch_listing(state);
        }
        Message::PageSizeSelected(size) => {
            state.listing.set_page_size(&size.to_string());
            // Larger pages can leave the current page past the end
            let current = state.listing.current_page().max(1) as usize;
            state.listing.go_to_page(current);
            return load_visible_cards(state);
        }
        Message::PreviousPage => {
            if state.listing.previous_page() {
                return load_visible_cards(state);
            }
        }
        Message::NextPage => {
            if state.listing.next_page() {
                return load_visible_cards(state);
            }
        }
        Message::GoToPage(page) => {
            state.listing.go_to_page(page);
            return load_visible_cards(state);
        }
        Message::CardLoaded(url, result) => match result {
            Ok(pokemon) => {
                let image_task = fetch_image(state, pokemon.artwork_url.as_deref());
                state.cards.insert(url, pokemon);
                return image_task;
            }
            Err(e) => log::error!("Failed to load card {}: {}", url, e),
        },
        Message::ImageLoaded(url, result) => match result {
            Ok(bytes) => {
                state.images.insert(url, image::Handle::from_bytes(bytes));
            }
            Err(e) => log::warn!("Failed to load image {}: {}", url, e),
        },
        Message::DetailLoaded(id, result) => {
            if state.route != Route::PokemonDetail(id.clone()) {
                return Task::none();
            }
            match result {
                Ok(pokemon) => {
                    let image_task = fetch_image(state, pokemon.artwork_url.as_deref());
                    state.detail = Some(pokemon);
                    state.error_message = None;
                    return image_task;
                }
                Err(e) => {
                    log::error!("Failed to load pokemon {}: {}", id, e);
                    state.error_message = Some(e);
                }
            }
        }
    }

    Task::none()
}

/// Switch views through the trainer-name guard and start any loading
fn navigate(state: &mut AppState, requested: Route) -> Task<Message> {
    let route = resolve(requested, &state.session);
    state.route = route.clone();
    state.error_message = None;

    match route {
        Route::Home => Task::none(),
        Route::Pokedex => {
            if state.listing.pokemons().is_empty() {
                let types = Task::perform(
                    async { Pokedex::fetch_types().await.map_err(|e| e.to_string()) },
                    Message::TypesLoaded,
                );
                Task::batch([types, fetch_listing(state)])
            } else {
                load_visible_cards(state)
            }
        }
        Route::PokemonDetail(id) => {
            state.detail = None;
            Task::perform(
                async move {
                    let result = Pokedex::pokemon(&id).await.map_err(|e| e.to_string());
                    (id, result)
                },
                |(id, result)| Message::DetailLoaded(id, result),
            )
        }
    }
}

fn fetch_listing(state: &mut AppState) -> Task<Message> {
    state.is_loading_listing = true;
    let upstream = state.listing.upstream();
    Task::perform(
        async move {
            let result = Pokedex::fetch_upstream(&upstream)
                .await
                .map_err(|e| e.to_string());
            (upstream, result)
        },
        |(upstream, result)| Message::PokemonsLoaded(upstream, result),
    )
}

/// Fetch detail records for cards on the current page that are not loaded yet
fn load_visible_cards(state: &mut AppState) -> Task<Message> {
    prune_offscreen(state);
    let tasks: Vec<Task<Message>> = state
        .listing
        .page()
        .items_on_page
        .iter()
        .filter(|resource| !state.cards.contains_key(&resource.url))
        .map(|resource| {
            let url = resource.url.clone();
            Task::perform(
                async move {
                    let result = get_or_fetch_pokemon(&url).await.map_err(|e| e.to_string());
                    (url, result)
                },
                |(url, result)| Message::CardLoaded(url, result),
            )
        })
        .collect();
    Task::batch(tasks)
}

/// Drop cards and artwork handles the current page no longer shows. The
/// core caches keep the underlying data for quick reloads.
fn prune_offscreen(state: &mut AppState) {
    let visible: HashSet<String> = state
        .listing
        .page()
        .items_on_page
        .iter()
        .map(|resource| resource.url.clone())
        .collect();
    state.cards.retain(|url, _| visible.contains(url));

    let artwork: HashSet<String> = state
        .cards
        .values()
        .chain(state.detail.as_ref())
        .filter_map(|pokemon| pokemon.artwork_url.clone())
        .collect();
    state.images.retain(|url, _| artwork.contains(url));
}

fn fetch_image(state: &AppState, url: Option<&str>) -> Task<Message> {
    match url {
        Some(url) if !state.images.contains_key(url) => {
            let url = url.to_string();
            Task::perform(
                async move {
                    let result = get_or_fetch_image_bytes(&url)
                        .await
                        .map_err(|e| e.to_string());
                    (url, result)
                },
                |(url, result)| Message::ImageLoaded(url, result),
            )
        }
        _ => Task::none(),
    }
}

pub fn view(state: &AppState) -> Element<Message> {
    let content = match &state.route {
        Route::Home => home_view(state),
        Route::Pokedex => listing_view(state),
        Route::PokemonDetail(_) => detail_view(state),
    };

    let error_section: Element<Message> = match &state.error_message {
        Some(error) => text(format!("Error: {}", error))
            .size(14)
            .color(Color::from_rgb(0.9, 0.2, 0.2))
            .into(),
        None => column![].into(),
    };

    container(column![content, error_section].spacing(10))
        .padding(20)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn home_view(state: &AppState) -> Element<Message> {
    column![
        text("Pokédex").size(40),
        text("Let's Catch Them All").size(20),
        row![
            text_input("Type your name...", &state.name_input)
                .on_input(Message::NameInputChanged)
                .on_submit(Message::Start)
                .padding(10)
                .width(Length::Fixed(320.0)),
            button("Start").on_press(Message::Start).padding(10),
        ]
        .spacing(5),
    ]
    .spacing(20)
    .align_x(Alignment::Center)
    .width(Length::Fill)
    .into()
}

fn header(state: &AppState) -> Element<Message> {
    row![
        text(format!("Welcome {}, here you can find your favorite pokemon", state.session.trainer_name()))
            .size(18)
            .width(Length::Fill),
        button("Log out").on_press(Message::Logout).padding(8),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

fn listing_view(state: &AppState) -> Element<Message> {
    let listing = &state.listing;
    let page = listing.page();

    let filters = row![
        text_input("Search your Pokemon", &state.search_input)
            .on_input(Message::SearchInputChanged)
            .on_submit(Message::SearchSubmitted)
            .padding(8)
            .width(Length::Fixed(320.0)),
        button("Search").on_press(Message::SearchSubmitted).padding(8),
        pick_list(
            TypeFilter::choices(listing.types()),
            Some(listing.current_type().clone()),
            Message::TypeSelected,
        )
        .width(Length::Fixed(200.0)),
        text("Per page:").size(14),
        pick_list(
            &PAGE_SIZE_CHOICES[..],
            Some(page.page_size),
            Message::PageSizeSelected,
        ),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let grid: Element<Message> = if state.is_loading_listing {
        text("Loading pokemon...").size(16).into()
    } else if page.items_on_page.is_empty() {
        text("No pokemon found.").size(16).into()
    } else {
        let rows = page.items_on_page.chunks(CARDS_PER_ROW).map(|chunk| {
            Element::from(
                Row::with_children(chunk.iter().map(|resource| pokemon_card(state, resource)))
                    .spacing(15),
            )
        });
        scrollable(Column::with_children(rows).spacing(15))
            .height(Length::Fill)
            .into()
    };

    let mut navigation = Row::new().spacing(8).align_y(Alignment::Center);
    if page.can_go_prev() {
        navigation = navigation.push(button("< Previous").on_press(Message::PreviousPage));
    }
    for page_number in &page.pages_in_block {
        let is_current = *page_number as i64 == page.current_page;
        let label = text(page_number.to_string());
        navigation = navigation.push(
            button(label)
                .on_press_maybe((!is_current).then_some(Message::GoToPage(*page_number)))
                .padding(6),
        );
    }
    if page.can_go_next() {
        navigation = navigation.push(button("Next >").on_press(Message::NextPage));
    }

    column![
        header(state),
        filters,
        text(format!(
            "{} pokemon, page {} of {}",
            listing.filtered().len(),
            page.current_page,
            page.last_page
        ))
        .size(14),
        grid,
        navigation,
    ]
    .spacing(15)
    .into()
}

fn pokemon_card<'a>(state: &'a AppState, resource: &'a NamedResource) -> Element<'a, Message> {
    let loaded = state.cards.get(&resource.url);

    let id = loaded
        .map(|p| p.id.to_string())
        .or_else(|| resource.id().map(|id| id.to_string()))
        .unwrap_or_else(|| resource.name.clone());

    let picture = artwork(state, loaded.and_then(|p| p.artwork_url.as_deref()), CARD_IMAGE_SIZE);
    let type_line = loaded
        .map(|p| format!("Type: {}", p.type_line()))
        .unwrap_or_else(|| "Type: ...".to_string());

    button(
        column![
            picture,
            text(&resource.name).size(22),
            text(format!("ID: {}", id)).size(14),
            text(type_line).size(14),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .width(Length::Fill),
    )
    .on_press(Message::Navigate(Route::PokemonDetail(id)))
    .width(Length::Fixed(CARD_WIDTH))
    .padding(10)
    .into()
}

fn artwork<'a>(state: &'a AppState, url: Option<&str>, size: f32) -> Element<'a, Message> {
    match url.and_then(|url| state.images.get(url)) {
        Some(handle) => image::Image::<image::Handle>::new(handle.clone())
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into(),
        None => container(text("...").size(14))
            .center_x(Length::Fixed(size))
            .center_y(Length::Fixed(size))
            .into(),
    }
}

fn detail_view(state: &AppState) -> Element<Message> {
    let back = button("Go back")
        .on_press(Message::Navigate(Route::Pokedex))
        .padding(10);

    let Some(pokemon) = &state.detail else {
        return column![header(state), text("Loading pokemon...").size(16), back]
            .spacing(15)
            .into();
    };

    let general = column![
        text(format!("# {}", pokemon.id)).size(16),
        text(&pokemon.name).size(32),
        row![
            text(format!("Weight: {}", pokemon.weight)).size(14),
            text(format!("Height: {}", pokemon.height)).size(14),
        ]
        .spacing(20),
        text(format!("Types: {}", pokemon.types.join(", "))).size(14),
        text(format!("Abilities: {}", pokemon.abilities.join(", "))).size(14),
    ]
    .spacing(8);

    let stats = Column::with_children(pokemon.stats.iter().map(stat_row))
        .spacing(8)
        .width(Length::Fixed(420.0));

    column![
        header(state),
        row![
            artwork(state, pokemon.artwork_url.as_deref(), DETAIL_IMAGE_SIZE),
            column![general, text("Stats").size(22), stats].spacing(12),
        ]
        .spacing(30),
        back,
    ]
    .spacing(20)
    .into()
}

fn stat_row(stat: &PokemonStat) -> Element<Message> {
    column![
        row![
            text(&stat.name)
                .size(13)
                .color(tier_color(stat.tier()))
                .width(Length::Fill),
            text(format!("{}/{}", stat.base_stat, MAX_BASE_STAT)).size(13),
        ],
        progress_bar(0.0..=100.0, stat.bar_percent() as f32).height(Length::Fixed(12.0)),
    ]
    .spacing(2)
    .into()
}

fn tier_color(tier: StatTier) -> Color {
    match tier {
        StatTier::Low => Color::from_rgb(0.2, 0.7, 0.3),
        StatTier::Medium => Color::from_rgb(0.85, 0.75, 0.1),
        StatTier::High => Color::from_rgb(0.85, 0.2, 0.2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(test_name: &str) -> AppState {
        let path = std::env::temp_dir().join(format!(
            "pokedex-gui-{}-{}.json",
            test_name,
            std::process::id()
        ));
        std::fs::remove_file(&path).ok();
        AppState::new(Session::load(TrainerStore::with_path(path)))
    }

    fn resources(count: usize) -> Vec<NamedResource> {
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
    fn test_listing_redirects_home_without_name() {
        let mut state = test_state("guard");
        let _ = update(&mut state, Message::Navigate(Route::Pokedex));
        assert_eq!(state.route, Route::Home);

        let _ = update(&mut state, Message::Start);
        assert_eq!(state.route, Route::Home);
        assert!(state.error_message.is_some());
    }

    #[test]
    fn test_start_then_logout() {
        let mut state = test_state("start");
        let _ = update(&mut state, Message::NameInputChanged("Ash".to_string()));
        let _ = update(&mut state, Message::Start);
        assert_eq!(state.route, Route::Pokedex);
        assert!(state.is_loading_listing);

        let _ = update(&mut state, Message::Logout);
        assert_eq!(state.route, Route::Home);
        assert_eq!(state.session.trainer_name(), "");
    }

    #[test]
    fn test_stale_listing_is_dropped() {
        let mut state = test_state("stale");
        let _ = update(&mut state, Message::TypeSelected(TypeFilter::Type("fire".into())));

        let _ = update(
            &mut state,
            Message::PokemonsLoaded(Upstream::All, Ok(resources(30))),
        );
        assert!(state.listing.pokemons().is_empty());

        let _ = update(
            &mut state,
            Message::PokemonsLoaded(Upstream::ByType("fire".into()), Ok(resources(30))),
        );
        assert_eq!(state.listing.pokemons().len(), 30);
        assert!(!state.is_loading_listing);
    }

    #[test]
    fn test_page_navigation_messages() {
        let mut state = test_state("paging");
        let _ = update(
            &mut state,
            Message::PokemonsLoaded(Upstream::All, Ok(resources(30))),
        );

        let _ = update(&mut state, Message::NextPage);
        assert_eq!(state.listing.current_page(), 2);
        let _ = update(&mut state, Message::GoToPage(3));
        assert_eq!(state.listing.current_page(), 3);
        let _ = update(&mut state, Message::NextPage);
        assert_eq!(state.listing.current_page(), 3);

        let _ = update(&mut state, Message::PageSizeSelected(4));
        assert_eq!(state.listing.page().last_page, 8);

        let _ = update(&mut state, Message::SearchInputChanged("mon1".to_string()));
        let _ = update(&mut state, Message::SearchSubmitted);
        assert_eq!(state.listing.current_page(), 1);
        assert_eq!(state.listing.filtered().len(), 11);
    }

    fn card(id: u32) -> Pokemon {
        Pokemon {
            id,
            name: format!("mon{}", id),
            height: 1,
            weight: 1,
            types: vec!["normal".to_string()],
            abilities: vec![],
            stats: vec![],
            artwork_url: Some(format!("https://img.example/{}.png", id)),
        }
    }

    #[test]
    fn test_larger_page_size_clamps_current_page() {
        let mut state = test_state("page-size");
        let _ = update(
            &mut state,
            Message::PokemonsLoaded(Upstream::All, Ok(resources(100))),
        );
        let _ = update(&mut state, Message::PageSizeSelected(4));
        let _ = update(&mut state, Message::GoToPage(25));
        assert_eq!(state.listing.current_page(), 25);

        let _ = update(&mut state, Message::PageSizeSelected(24));
        let page = state.listing.page();
        assert_eq!(page.last_page, 5);
        assert_eq!(page.current_page, 5);
        assert_eq!(page.items_on_page.len(), 4);
        assert!(page.pages_in_block.contains(&5));
    }

    #[test]
    fn test_page_change_drops_offscreen_cards_and_images() {
        let mut state = test_state("prune");
        let _ = update(
            &mut state,
            Message::PokemonsLoaded(Upstream::All, Ok(resources(30))),
        );

        let first = resources(1).remove(0);
        let _ = update(&mut state, Message::CardLoaded(first.url.clone(), Ok(card(1))));
        let _ = update(
            &mut state,
            Message::ImageLoaded("https://img.example/1.png".to_string(), Ok(vec![1, 2, 3])),
        );
        assert!(state.cards.contains_key(&first.url));
        assert_eq!(state.images.len(), 1);

        let _ = update(&mut state, Message::NextPage);
        assert!(state.cards.is_empty());
        assert!(state.images.is_empty());
    }
}
