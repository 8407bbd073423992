use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use consonance_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "consonance", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the artist catalog CSV (default: ~/.local/share/consonance/artists.csv)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend artists similar to three artists you like
    ///
    /// Each name is looked up on Last.fm. The top tags of the three artists
    /// are combined into one taste profile, and every catalog artist is
    /// scored by how closely its tags match that profile (0-100%). The
    /// three seed artists themselves are never recommended.
    ///
    /// Requires a Last.fm API key (see `consonance config`). Artist images
    /// are fetched from Spotify when client credentials are configured.
    Recommend {
        /// Three artist names
        #[arg(num_args = 3, required = true, value_name = "ARTIST")]
        artists: Vec<String>,

        /// Number of recommendations (default: from config, 3)
        #[arg(long, short = 'k')]
        top_k: Option<usize>,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,

        /// Skip the Spotify image lookup
        #[arg(long)]
        no_images: bool,
    },
    /// Rank the catalog against explicit tag lists, without network access
    ///
    /// Each --seed is one artist's tags, separated by commas, e.g.
    /// --seed "shoegaze,dream pop" --seed "britpop".
    Tags {
        /// Comma-separated tags for one seed (repeat for more seeds)
        #[arg(long = "seed", required = true, value_name = "TAGS")]
        seeds: Vec<String>,

        /// Number of recommendations (default: from config, 3)
        #[arg(long, short = 'k')]
        top_k: Option<usize>,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect the artist catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, clap::Subcommand)]
enum CatalogCommand {
    /// Load the catalog and report what was kept and dropped
    Stats {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file when no key is given
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_catalog(cli.catalog)?;
    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Warning: could not set up logging: {:?}", e);
    }

    match cli.command {
        Commands::Recommend {
            artists,
            top_k,
            json,
            no_images,
        } => {
            commands::run_recommend(config, &artists, top_k, json, no_images).await?;
        }
        Commands::Tags { seeds, top_k, json } => {
            commands::run_tags(&config, &seeds, top_k, json)?;
        }
        Commands::Catalog { command } => match command {
            CatalogCommand::Stats { json } => commands::show_catalog_stats(&config, json)?,
        },
        Commands::Config { command } => match command {
            ConfigCommand::Show => commands::config::show_config(&config)?,
            ConfigCommand::Get { key } => commands::config::get_config(&config, key)?,
            ConfigCommand::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigCommand::Path => commands::config::show_path()?,
            ConfigCommand::Example => commands::config::show_example()?,
            ConfigCommand::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
