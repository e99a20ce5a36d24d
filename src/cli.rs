use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::engine::Engine;
use crate::games::geography::settings::CONTINENT_CHOICES;
use crate::games::geography::stats::ProfileStore;
use crate::games::geography::{Catalog, Difficulty, GameSettings, GeographyGame};

const DEFAULT_PROFILE: &str = "geoterm_profile.json";

#[derive(Parser)]
#[command(name = "geoterm")]
#[command(about = "🌍 A terminal geography quiz - find the country before the clock runs out")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play the quiz
    Play {
        /// Continent filter ("all" or a continent name)
        #[arg(short, long, default_value = "all")]
        continent: String,

        /// Difficulty tier (sets the clock and the hint budget)
        #[arg(short, long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,

        /// Country catalog JSON to play with instead of the built-in one
        #[arg(long)]
        countries: Option<PathBuf>,

        /// Where the player profile is kept
        #[arg(long, default_value = DEFAULT_PROFILE)]
        profile: PathBuf,
    },
    /// List the continents and countries in the catalog
    List {
        /// Country catalog JSON instead of the built-in one
        #[arg(long)]
        countries: Option<PathBuf>,
    },
    /// Show the saved player profile
    Stats {
        #[arg(long, default_value = DEFAULT_PROFILE)]
        profile: PathBuf,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { countries }) => {
            let catalog = load_catalog(countries)?;
            println!("🗺  Catalog: {} countries", catalog.len());
            println!();
            for continent in catalog.continents() {
                println!("  {:<15} {}", continent, catalog.filtered(continent).len());
            }
            Ok(())
        }

        Some(Commands::Stats { profile }) => {
            let store = ProfileStore::new(profile);
            let p = store.load()?;
            println!("🏅 Player profile ({})", store.path().display());
            println!("   Games played: {}", p.games_played);
            println!("   Total score:  {}", p.total_score);
            println!("   High score:   {}", p.high_score);
            println!("   Best streak:  {}x", p.best_streak);
            match p.last_played {
                Some(t) => println!("   Last played:  {}", t.to_rfc3339()),
                None => println!("   Last played:  never"),
            }
            if !p.achievements.is_empty() {
                println!("   Achievements: {}", p.achievements.join(", "));
            }
            Ok(())
        }

        Some(Commands::Play {
            continent,
            difficulty,
            countries,
            profile,
        }) => play(continent, difficulty, countries, profile).await,

        // No subcommand - jump straight into a default game
        None => play(
            "all".to_string(),
            Difficulty::Medium,
            None,
            PathBuf::from(DEFAULT_PROFILE),
        )
        .await,
    }
}

async fn play(
    continent: String,
    difficulty: Difficulty,
    countries: Option<PathBuf>,
    profile: PathBuf,
) -> Result<()> {
    if !CONTINENT_CHOICES.contains(&continent.as_str()) {
        eprintln!("❌ Unknown continent '{continent}'");
        eprintln!("Available choices:");
        for choice in CONTINENT_CHOICES {
            eprintln!("  • {choice}");
        }
        std::process::exit(1);
    }

    let catalog = load_catalog(countries)?;
    let settings = GameSettings {
        continent,
        difficulty,
    };
    let game = GeographyGame::new(catalog, settings, ProfileStore::new(profile))?;

    let terminal = ratatui::init();
    let result = Engine::new(game).run(terminal).await;
    ratatui::restore();
    result
}

fn load_catalog(path: Option<PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(&path),
        None => Ok(Catalog::builtin()),
    }
}
