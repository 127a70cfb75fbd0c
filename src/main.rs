// Entry point for the Minesweeper terminal game
// Parses the command line, loads configuration, sets up logging and launches the UI

use clap::Parser;
use log::LevelFilter;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::path::PathBuf;

use xtmines::xtm_app::App;
use xtmines::xtm_game::{config_path, data_path, load_or_create_config, save_config};
use xtmines::xtm_scores::ScoreLog;
use xtmines::{xtm_log, xtm_ui};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Score log file (defaults to the config file setting, then the data directory)
    #[arg(long)]
    scores: Option<PathBuf>,
    #[arg(long, help = "Fix RNG seed for reproducible boards (e.g., --seed 12345)")]
    seed: Option<u64>,
    /// Log level written to the log file (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
    /// Use plain ASCII glyphs for flags and bombs (remembered in the config file)
    #[arg(long)]
    ascii: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    xtm_log::init_logging(&data_path("xtmines.log"), cli.log_level);

    // Load or create user configuration (last player, difficulty, display preferences)
    let mut cfg = load_or_create_config();
    if cli.ascii && !cfg.ascii_icons {
        cfg.ascii_icons = true;
        save_config(&cfg);
    }

    let score_file = cli
        .scores
        .or_else(|| cfg.score_file.clone())
        .unwrap_or_else(|| data_path("highscore.txt"));
    let rng = match cli.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    log::info!("starting, score log at {}", score_file.display());

    let mut app = App::new(cfg, config_path(), ScoreLog::new(score_file), rng);
    xtm_ui::run(&mut app)
}
