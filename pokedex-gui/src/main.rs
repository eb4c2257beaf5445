mod app;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            // Example: RUST_LOG=pokedex_core::globals=debug,pokedex_gui=debug
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokedex_core=info,pokedex_gui=info".into()),
        )
        .init();
}

fn main() -> iced::Result {
    init_logging();

    iced::application("Pokédex", app::update, app::view).run_with(app::initialize)
}
