use clap::{Parser, Subcommand};
use pokedex_core::config::{DEFAULT_API_BASE, DEFAULT_PAGE_SIZE};
use pokedex_core::{
    Pokedex, Pokemon, PokemonStat, Route, Session, TrainerStore, TypeFilter, init_pokeapi_client,
    resolve,
};

const STAT_BAR_WIDTH: u32 = 20;

#[derive(Parser)]
#[command(name = "pokedex-cli")]
#[command(about = "Browse the Pokédex from the terminal")]
struct Cli {
    /// PokeAPI base url
    #[arg(long, global = true, default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save your trainer name
    Login {
        name: String,
    },
    /// Forget the saved trainer name
    Logout,
    /// Show the saved trainer name
    Whoami,
    /// List all pokemon types
    Types,
    /// List pokemon, filtered by name and type
    List {
        /// Name substring to search for
        #[arg(short, long, default_value = "")]
        name: String,
        /// Only list pokemon of this type
        #[arg(short, long, default_value = "")]
        r#type: String,
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: i64,
        /// Pokemon per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE.to_string())]
        per_page: String,
    },
    /// Show one pokemon by id or name
    Show {
        id: String,
    },
    /// Open an app path such as /pokedex or /pokedex/25
    Open {
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    init_pokeapi_client(&cli.api_base)?;
    let mut session = Session::load(TrainerStore::new()?);

    match cli.command {
        Commands::Login { name } => {
            if name.trim().is_empty() {
                eprintln!("Trainer name cannot be empty.");
                std::process::exit(1);
            }
            session.set_trainer_name(&name)?;
            println!("Welcome, {}! Let's catch them all.", session.trainer_name());
        }
        Commands::Logout => {
            session.logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => {
            if session.is_authenticated() {
                println!("{}", session.trainer_name());
            } else {
                println!("No trainer name saved. Use `login <name>`.");
            }
        }
        Commands::Types => match Pokedex::fetch_types().await {
            Ok(types) => {
                for type_name in types {
                    println!("  {}", type_name);
                }
            }
            Err(e) => {
                eprintln!("Fetching types failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::List {
            name,
            r#type,
            page,
            per_page,
        } => {
            require_trainer(&Route::Pokedex, &session);
            list(&name, &r#type, page, &per_page).await;
        }
        Commands::Show { id } => {
            require_trainer(&Route::PokemonDetail(id.clone()), &session);
            show(&id).await;
        }
        Commands::Open { path } => match resolve(Route::parse(&path), &session) {
            Route::Home => {
                if session.is_authenticated() {
                    println!("Hi {}! Open /pokedex to start.", session.trainer_name());
                } else {
                    println!("Welcome! Save your trainer name with `login <name>` to start.");
                }
            }
            Route::Pokedex => list("", "", 1, &DEFAULT_PAGE_SIZE.to_string()).await,
            Route::PokemonDetail(id) => show(&id).await,
        },
    }

    Ok(())
}

fn require_trainer(route: &Route, session: &Session) {
    if resolve(route.clone(), session) != *route {
        eprintln!("{} needs a trainer name. Use `login <name>` first.", route.path());
        std::process::exit(1);
    }
}

async fn list(name: &str, type_selection: &str, page: i64, per_page: &str) {
    let type_filter = TypeFilter::from_selection(type_selection);
    println!("Loading {}...", type_filter);

    let mut listing = match Pokedex::load_listing(type_filter, name).await {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("Loading pokemon failed: {}", e);
            std::process::exit(1);
        }
    };
    listing.set_page_size(per_page);
    listing.go_to_page(page.max(1) as usize);
    if page < 1 {
        log::warn!("Page {} is before the first page, showing page 1", page);
    }

    let result = listing.page();
    let (start, _) = result.range();
    for (i, pokemon) in result.items_on_page.iter().enumerate() {
        let id = pokemon
            .id()
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "#?".to_string());
        println!("  {:>4}. {:<24} {}", start + i + 1, pokemon.name, id);
    }
    if result.items_on_page.is_empty() {
        println!("  No pokemon found.");
    }

    println!(
        "Page {} of {} ({} pokemon)",
        result.current_page,
        result.last_page,
        listing.filtered().len()
    );
    let block: Vec<String> = result
        .pages_in_block
        .iter()
        .map(|p| {
            if *p as i64 == result.current_page {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .collect();
    println!(
        "{} {} {}",
        if result.can_go_prev() { "< Previous" } else { "" },
        block.join(" "),
        if result.can_go_next() { "Next >" } else { "" }
    );
}

async fn show(id: &str) {
    match Pokedex::pokemon(id).await {
        Ok(pokemon) => print_pokemon(&pokemon),
        Err(e) => {
            eprintln!("Fetching pokemon '{}' failed: {}", id, e);
            std::process::exit(1);
        }
    }
}

fn print_pokemon(pokemon: &Pokemon) {
    println!("# {} {}", pokemon.id, pokemon.name);
    println!("  Weight: {}  Height: {}", pokemon.weight, pokemon.height);
    println!("  Types: {}", pokemon.types.join(", "));
    println!("  Abilities: {}", pokemon.abilities.join(", "));
    if let Some(url) = &pokemon.artwork_url {
        println!("  Artwork: {}", url);
    }
    println!("  Stats:");
    for stat in &pokemon.stats {
        println!("    {}", format_stat(stat));
    }
}

fn format_stat(stat: &PokemonStat) -> String {
    let filled = (stat.bar_percent() * STAT_BAR_WIDTH / 100) as usize;
    format!(
        "{:<16} {:>3}/255 [{:<width$}] {}",
        stat.name,
        stat.base_stat,
        "#".repeat(filled),
        stat.tier().color_name(),
        width = STAT_BAR_WIDTH as usize
    )
}
