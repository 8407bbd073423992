use anyhow::{Context, Result};
use toml_edit::{value, DocumentMut};

use consonance_etl::config::{self, KEYS};
use consonance_etl::Config;

fn not_set(value: Option<&str>) -> &str {
    value.unwrap_or("<not set>")
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!("Unknown config key: {}\n\nValid keys: {}", key, KEYS.join(", "))
}

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  lastfm_api_key: {}", not_set(config.lastfm_api_key.as_deref()));
    println!("  spotify_client_id: {}", not_set(config.spotify_client_id.as_deref()));
    println!(
        "  spotify_client_secret: {}",
        if config.spotify_client_secret.is_some() { "<set>" } else { "<not set>" }
    );
    println!("  catalog_path: {}", config.catalog_path.display());
    println!("  name_column: {}", config.name_column);
    println!("  tags_column: {}", config.tags_column);
    println!("  top_k: {}", config.top_k);
    println!("  tag_limit: {}", config.tag_limit);
    println!("  empty_seed_policy: {:?}", config.empty_seed_policy);
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (CONSONANCE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the config file when no key is given.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'consonance config init' to create it.");
        }
        return Ok(());
    };

    match key.as_str() {
        "lastfm_api_key" => println!("{}", not_set(config.lastfm_api_key.as_deref())),
        "spotify_client_id" => println!("{}", not_set(config.spotify_client_id.as_deref())),
        "spotify_client_secret" => println!("{}", not_set(config.spotify_client_secret.as_deref())),
        "catalog_path" => println!("{}", config.catalog_path.display()),
        "name_column" => println!("{}", config.name_column),
        "tags_column" => println!("{}", config.tags_column),
        "top_k" => println!("{}", config.top_k),
        "tag_limit" => println!("{}", config.tag_limit),
        "empty_seed_policy" => println!("{:?}", config.empty_seed_policy),
        _ => return Err(unknown_key(&key)),
    }

    Ok(())
}

/// Set `key` to `raw` in a TOML document, keeping comments and layout.
fn update_document(contents: &str, key: &str, raw: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    match key {
        "top_k" | "tag_limit" => {
            let n: i64 = raw
                .parse()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| anyhow::anyhow!("{} must be a non-negative integer", key))?;
            doc[key] = value(n);
        }
        "empty_seed_policy" => {
            if raw != "include" && raw != "skip" {
                anyhow::bail!("empty_seed_policy must be \"include\" or \"skip\"");
            }
            doc[key] = value(raw);
        }
        k if KEYS.contains(&k) => {
            doc[key] = value(raw);
        }
        _ => return Err(unknown_key(key)),
    }

    Ok(doc.to_string())
}

/// Set a config value.
pub fn set_config(key: &str, raw: &str) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = update_document(&contents, key, raw)?;
    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, raw);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure consonance.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_keeps_comments() {
        let updated = update_document(config::example_config(), "lastfm_api_key", "abc123").unwrap();
        assert!(updated.contains("lastfm_api_key = \"abc123\""));
        assert!(updated.contains("# Consonance Configuration File"));
        assert!(!updated.contains("your-lastfm-api-key-here"));
    }

    #[test]
    fn test_update_integer_key() {
        let updated = update_document("", "top_k", "10").unwrap();
        assert_eq!(updated.trim(), "top_k = 10");
    }

    #[test]
    fn test_update_rejects_bad_values() {
        assert!(update_document("", "top_k", "-1").is_err());
        assert!(update_document("", "tag_limit", "many").is_err());
        assert!(update_document("", "empty_seed_policy", "drop").is_err());
    }

    #[test]
    fn test_update_unknown_key() {
        let err = update_document("", "database_path", "/tmp").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn test_update_policy() {
        let updated = update_document("top_k = 3\n", "empty_seed_policy", "skip").unwrap();
        assert!(updated.contains("top_k = 3"));
        assert!(updated.contains("empty_seed_policy = \"skip\""));
    }
}
