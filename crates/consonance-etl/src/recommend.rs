//! One recommendation request, end to end.
//!
//! The [`Recommender`] owns shared handles to the prepared catalog and the
//! external collaborators. A request fills three [`SeedSlots`] from free
//! text, fetches each seed's top tags, ranks the catalog, and finally
//! attaches display images.

use std::fmt;
use std::sync::Arc;

use consonance_core::model::{Recommendation, SeedArtist};
use consonance_core::session::SEED_SLOTS;
use consonance_core::{Error, SeedSlots};
use consonance_search::{Catalog, EmptySeedPolicy};

use crate::config::Config;
use crate::error::EtlResult;
use crate::sources::{ArtistResolver, ImageLookup, TagSource};

/// What happened when a query was entered into a seed slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The query resolved to this artist, now held in the slot.
    Found(String),
    /// The resolver found nothing for the query.
    NotFound(String),
    /// The query resolved to an artist already held by another slot.
    Duplicate(String),
}

impl SlotOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for SlotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(name) => write!(f, "Found: {name}"),
            Self::NotFound(query) => write!(
                f,
                "{query} could not be found. Maybe you misspelt their name."
            ),
            Self::Duplicate(name) => write!(f, "You've already picked {name}"),
        }
    }
}

/// Request-independent settings for a [`Recommender`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendSettings {
    pub top_k: usize,
    pub tag_limit: usize,
    pub empty_seed_policy: EmptySeedPolicy,
}

impl From<&Config> for RecommendSettings {
    fn from(config: &Config) -> Self {
        Self {
            top_k: config.top_k,
            tag_limit: config.tag_limit,
            empty_seed_policy: config.empty_seed_policy,
        }
    }
}

/// Drives recommendation requests against a shared, prepared catalog.
pub struct Recommender {
    catalog: Arc<Catalog>,
    resolver: Arc<dyn ArtistResolver>,
    tags: Arc<dyn TagSource>,
    images: Arc<dyn ImageLookup>,
    settings: RecommendSettings,
}

impl fmt::Debug for Recommender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recommender")
            .field("catalog_entries", &self.catalog.entries().len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Recommender {
    pub fn new(
        catalog: Arc<Catalog>,
        resolver: Arc<dyn ArtistResolver>,
        tags: Arc<dyn TagSource>,
        images: Arc<dyn ImageLookup>,
        settings: RecommendSettings,
    ) -> Self {
        Self {
            catalog,
            resolver,
            tags,
            images,
            settings,
        }
    }

    pub fn settings(&self) -> RecommendSettings {
        self.settings
    }

    /// Resolve `query` and place the result in slot `index`.
    ///
    /// The slot is emptied first, so a failed lookup never leaves a stale
    /// artist behind.
    ///
    /// # Errors
    ///
    /// Returns resolver failures other than "not found", and
    /// [`Error::SlotOutOfRange`] for an invalid index.
    pub async fn fill_slot(
        &self,
        slots: &mut SeedSlots,
        index: usize,
        query: &str,
    ) -> EtlResult<SlotOutcome> {
        slots.clear(index)?;

        let Some(identity) = self.resolver.resolve(query).await? else {
            log::info!("No artist found for {query:?}");
            return Ok(SlotOutcome::NotFound(query.to_string()));
        };

        let name = identity.name.clone();
        match slots.set(index, identity) {
            Ok(()) => {
                log::info!("Slot {index}: {query:?} -> {name}");
                Ok(SlotOutcome::Found(name))
            }
            Err(Error::DuplicateSeed { name }) => Ok(SlotOutcome::Duplicate(name)),
            Err(e) => Err(e.into()),
        }
    }

    /// Fill every slot from `queries`, one query per slot in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless exactly one query per slot is
    /// given, and any error from [`fill_slot`](Self::fill_slot).
    pub async fn fill_slots<S: AsRef<str>>(
        &self,
        queries: &[S],
    ) -> EtlResult<(SeedSlots, Vec<SlotOutcome>)> {
        if queries.len() != SEED_SLOTS {
            return Err(Error::invalid_input(
                "seed",
                format!("expected {SEED_SLOTS} artists, got {}", queries.len()),
            )
            .into());
        }

        let mut slots = SeedSlots::new();
        let mut outcomes = Vec::with_capacity(SEED_SLOTS);
        for (index, query) in queries.iter().enumerate() {
            outcomes.push(self.fill_slot(&mut slots, index, query.as_ref()).await?);
        }
        Ok((slots, outcomes))
    }

    /// Fetch top tags for every filled slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any slot is empty, and tag-source
    /// failures.
    pub async fn seed_artists(&self, slots: &SeedSlots) -> EtlResult<Vec<SeedArtist>> {
        if !slots.is_complete() {
            return Err(Error::invalid_input(
                "seed",
                format!(
                    "{} of {SEED_SLOTS} artists chosen; pick all {SEED_SLOTS} first",
                    slots.filled()
                ),
            )
            .into());
        }

        let mut seeds = Vec::with_capacity(SEED_SLOTS);
        for identity in slots.identities() {
            let tags = self.tags.top_tags(identity, self.settings.tag_limit).await?;
            let seed = SeedArtist::from_ranked_tags(
                identity.name.clone(),
                tags,
                self.settings.tag_limit,
            );
            log::debug!("Seed {}: {:?}", seed.name, seed.tags);
            seeds.push(seed);
        }
        Ok(seeds)
    }

    /// Rank the catalog for already-built seeds and attach images.
    ///
    /// # Errors
    ///
    /// Returns aggregation and ranking errors from the core.
    pub async fn recommend_seeds(&self, seeds: &[SeedArtist]) -> EtlResult<Vec<Recommendation>> {
        let matches =
            self.catalog
                .recommend_with(seeds, self.settings.top_k, self.settings.empty_seed_policy)?;

        let mut recommendations = Vec::with_capacity(matches.len());
        for (i, ranked) in matches.into_iter().enumerate() {
            let image_url = match self.images.image_url(&ranked.name).await {
                Ok(url) => url,
                Err(e) => {
                    log::warn!("Image lookup failed for {}: {}", ranked.name, e);
                    None
                }
            };
            recommendations.push(Recommendation::from_match(i + 1, ranked).with_image_url(image_url));
        }
        Ok(recommendations)
    }

    /// Recommend from a complete set of seed slots.
    ///
    /// # Errors
    ///
    /// See [`seed_artists`](Self::seed_artists) and
    /// [`recommend_seeds`](Self::recommend_seeds).
    pub async fn recommend(&self, slots: &SeedSlots) -> EtlResult<Vec<Recommendation>> {
        let seeds = self.seed_artists(slots).await?;
        self.recommend_seeds(&seeds).await
    }
}
