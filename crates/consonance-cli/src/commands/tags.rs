use anyhow::{Context, Result};
use std::collections::HashSet;

use consonance_core::model::{Recommendation, SeedArtist};
use consonance_etl::{open_catalog, Config};
use consonance_search::{Catalog, EmptySeedPolicy};

/// Split one `--seed` argument into its tags.
fn parse_seed(index: usize, raw: &str) -> SeedArtist {
    let tags = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    SeedArtist::new(format!("seed {}", index + 1), tags)
}

/// Rank the catalog against tag-only seeds. The seeds are not catalog
/// artists, so nothing is excluded.
fn rank_tag_seeds(
    catalog: &Catalog,
    seeds: &[SeedArtist],
    k: usize,
    policy: EmptySeedPolicy,
) -> Result<Vec<Recommendation>> {
    let matches = catalog.recommend_excluding(seeds, &HashSet::new(), k, policy)?;
    Ok(matches
        .into_iter()
        .enumerate()
        .map(|(i, m)| Recommendation::from_match(i + 1, m))
        .collect())
}

pub fn run_tags(config: &Config, seeds: &[String], top_k: Option<usize>, json: bool) -> Result<()> {
    let catalog = open_catalog(config).context("Failed to load catalog")?;
    let seeds: Vec<SeedArtist> = seeds
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_seed(i, raw))
        .collect();

    let k = top_k.unwrap_or(config.top_k);
    let recommendations = rank_tag_seeds(&catalog, &seeds, k, config.empty_seed_policy)?;

    if !json {
        println!("\n🎵 Closest catalog artists:\n");
    }
    super::print_recommendations(&recommendations, json)
}
