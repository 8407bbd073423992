use anyhow::{Context, Result};
use std::sync::Arc;

use consonance_etl::sources::{LastFmClient, SpotifyClient};
use consonance_etl::{
    open_catalog, Config, ImageLookup, NoImages, RecommendSettings, Recommender, SlotOutcome,
};

pub async fn run_recommend(
    mut config: Config,
    artists: &[String],
    top_k: Option<usize>,
    json: bool,
    no_images: bool,
) -> Result<()> {
    if let Some(k) = top_k {
        config.top_k = k;
    }

    let lastfm = LastFmClient::from_config(&config).context(
        "Run 'consonance config set lastfm_api_key <KEY>' to configure Last.fm",
    )?;
    let catalog = open_catalog(&config).context("Failed to load catalog")?;

    let images: Arc<dyn ImageLookup> = match config.spotify_credentials() {
        Some((id, secret)) if !no_images => Arc::new(SpotifyClient::new(id, secret)?),
        _ => {
            log::debug!("Artist images disabled");
            Arc::new(NoImages)
        }
    };

    // Clones share one HTTP pool and rate limiter.
    let recommender = Recommender::new(
        catalog,
        Arc::new(lastfm.clone()),
        Arc::new(lastfm),
        images,
        RecommendSettings::from(&config),
    );

    let (slots, outcomes) = recommender.fill_slots(artists).await?;
    if !json {
        for outcome in &outcomes {
            let marker = if outcome.is_found() { "✓" } else { "✗" };
            println!("{} {}", marker, outcome);
        }
    }

    if !slots.is_complete() {
        let problems: Vec<String> = outcomes
            .iter()
            .filter(|o| !matches!(o, SlotOutcome::Found(_)))
            .map(ToString::to_string)
            .collect();
        anyhow::bail!(
            "Need three different artists to recommend from\n\n{}",
            problems.join("\n")
        );
    }

    let recommendations = recommender.recommend(&slots).await?;

    if !json {
        println!("\n🎵 Because you like {}:\n", slots.names().join(", "));
    }
    super::print_recommendations(&recommendations, json)
}
