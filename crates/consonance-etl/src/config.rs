use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use consonance_core::model::DEFAULT_TAG_LIMIT;
use consonance_search::{EmptySeedPolicy, DEFAULT_TOP_K};

use crate::catalog::CatalogColumns;

/// Configuration for consonance.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (CONSONANCE_* prefix)
/// 3. Config file (~/.config/consonance/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Last.fm API key (required for artist search and tags).
    ///
    /// Can be set via:
    /// - ENV: CONSONANCE_LASTFM_API_KEY
    /// - Config: lastfm_api_key = "..."
    pub lastfm_api_key: Option<String>,

    /// Spotify client ID for artist image lookup.
    pub spotify_client_id: Option<String>,

    /// Spotify client secret for artist image lookup.
    pub spotify_client_secret: Option<String>,

    /// Path to the artist catalog CSV.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/artists.csv
    /// - ENV: CONSONANCE_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/artists.csv"
    /// - Default: ~/.local/share/consonance/artists.csv
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Header of the catalog column holding artist names.
    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Header of the catalog column holding tag text.
    #[serde(default = "default_tags_column")]
    pub tags_column: String,

    /// Number of recommendations to return.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Number of top tags fetched per seed artist.
    #[serde(default = "default_tag_limit")]
    pub tag_limit: usize,

    /// What to do with seed artists that have no tags.
    #[serde(default)]
    pub empty_seed_policy: EmptySeedPolicy,

    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lastfm_api_key: None,
            spotify_client_id: None,
            spotify_client_secret: None,
            catalog_path: default_catalog_path(),
            name_column: default_name_column(),
            tags_column: default_tags_column(),
            top_k: default_top_k(),
            tag_limit: default_tag_limit(),
            empty_seed_policy: EmptySeedPolicy::default(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/consonance/config.toml
    /// Reads environment variables with CONSONANCE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("consonance");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration, overriding the catalog path when the --catalog
    /// CLI flag is provided.
    pub fn load_with_catalog(catalog_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load()?;
        if let Some(path) = catalog_path {
            config.catalog_path = path;
        }
        Ok(config)
    }

    /// Spotify client credentials, if both halves are configured.
    pub fn spotify_credentials(&self) -> Option<(String, String)> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(id), Some(secret)) => Some((id.clone(), secret.clone())),
            _ => None,
        }
    }

    pub fn catalog_columns(&self) -> CatalogColumns {
        CatalogColumns::new(&self.name_column, &self.tags_column)
    }
}

/// Keys accepted by `config get` / `config set`.
pub const KEYS: &[&str] = &[
    "lastfm_api_key",
    "spotify_client_id",
    "spotify_client_secret",
    "catalog_path",
    "name_column",
    "tags_column",
    "top_k",
    "tag_limit",
    "empty_seed_policy",
];

fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("consonance")
        .join("artists.csv")
}

fn default_name_column() -> String {
    "Name".to_string()
}

fn default_tags_column() -> String {
    "Tags".to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_tag_limit() -> usize {
    DEFAULT_TAG_LIMIT
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/consonance/config.toml
/// - macOS: ~/Library/Application Support/consonance/config.toml
/// - Windows: %APPDATA%\consonance\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("consonance")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Consonance Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (CONSONANCE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Last.fm API key, used to find artists and fetch their top tags
#
# Register for a free API key at: https://www.last.fm/api/account/create
#
# Can also be set via:
# - Environment: CONSONANCE_LASTFM_API_KEY=your-key-here
lastfm_api_key = "your-lastfm-api-key-here"

# Spotify client credentials, used only to show artist images.
# Leave unset to skip images.
#
# Create an app at: https://developer.spotify.com/dashboard
#spotify_client_id = "your-client-id"
#spotify_client_secret = "your-client-secret"

# Artist catalog: a CSV file with a header row, one artist per row
#
# Can also be set via:
# - CLI: consonance --catalog /custom/artists.csv recommend ...
# - Environment: CONSONANCE_CATALOG_PATH=/custom/artists.csv
#
# Default: Platform-specific data directory
#catalog_path = "/path/to/artists.csv"

# Column headers for artist names and tag text
#name_column = "Name"
#tags_column = "Tags"

# Number of recommendations to show
#top_k = 3

# Number of top Last.fm tags used per seed artist
#tag_limit = 5

# Seed artists without any tags: "include" averages in an empty
# profile, "skip" leaves them out of the preference
#empty_seed_policy = "include"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.catalog_path.as_os_str().is_empty());
        assert!(config.lastfm_api_key.is_none());
        assert_eq!(config.top_k, 3);
        assert_eq!(config.tag_limit, 5);
        assert_eq!(config.empty_seed_policy, EmptySeedPolicy::Include);
        assert_eq!(config.name_column, "Name");
        assert_eq!(config.tags_column, "Tags");
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_catalog_path() {
        let custom_path = PathBuf::from("/tmp/artists.csv");
        let config = Config::load_with_catalog(Some(custom_path.clone()));
        assert!(config.is_ok());
        assert_eq!(config.unwrap().catalog_path, custom_path);
    }

    #[test]
    fn test_spotify_credentials_need_both_halves() {
        let mut config = Config::default();
        config.spotify_client_id = Some("id".to_string());
        assert!(config.spotify_credentials().is_none());

        config.spotify_client_secret = Some("secret".to_string());
        assert_eq!(
            config.spotify_credentials(),
            Some(("id".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn test_example_config_mentions_every_key() {
        let example = example_config();
        for key in KEYS {
            assert!(example.contains(key), "example config missing {key}");
        }
    }
}
