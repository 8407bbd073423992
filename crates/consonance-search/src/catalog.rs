//! Catalog preparation: cleaning raw rows, fitting the vectorizer, and
//! vectorizing every surviving entry.
//!
//! The result is a single immutable [`Catalog`] value. It is built once at
//! startup and shared read-only (typically behind an `Arc`) by every
//! recommendation request.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use consonance_core::model::{CatalogEntry, RankedMatch, RawCatalogRow, SeedArtist};
use consonance_core::{Error, Result};

use crate::aggregate::{aggregate_with, EmptySeedPolicy};
use crate::rank::rank;
use crate::vector::Vector;
use crate::vectorizer::{TfIdfVectorizer, VectorSpace};

/// Counts gathered while cleaning the raw catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PreparationReport {
    pub rows_read: usize,
    pub dropped_incomplete: usize,
    pub dropped_duplicate: usize,
    pub kept: usize,
    pub vocabulary_size: usize,
}

/// Artist name → tag vector, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct VectorizedCatalog {
    dimension: usize,
    entries: Vec<(String, Vector)>,
    index: HashMap<String, usize>,
}

impl VectorizedCatalog {
    /// Build from `(name, vector)` pairs in a space of `dimension` terms.
    ///
    /// Later pairs with an already-seen name are ignored.
    #[must_use]
    pub fn from_pairs(dimension: usize, pairs: Vec<(String, Vector)>) -> Self {
        let mut entries = Vec::with_capacity(pairs.len());
        let mut index = HashMap::with_capacity(pairs.len());
        for (name, vector) in pairs {
            if index.contains_key(&name) {
                continue;
            }
            index.insert(name.clone(), entries.len());
            entries.push((name, vector));
        }
        Self {
            dimension,
            entries,
            index,
        }
    }

    /// Length every vector in this catalog is expected to have.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Vector> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vector)> {
        self.entries.iter().map(|(name, v)| (name.as_str(), v))
    }
}

/// A prepared recommendation catalog: cleaned entries, the vectorizer
/// fitted on their tags, and each entry's tag vector.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    vectorizer: TfIdfVectorizer,
    vectorized: VectorizedCatalog,
    report: PreparationReport,
}

impl Catalog {
    /// Clean `raw`, fit the vectorizer on the surviving tags, and
    /// vectorize every entry.
    ///
    /// Fields are trimmed and rows with a missing or blank field are
    /// dropped. Rows whose trimmed name was already seen (exact match,
    /// case-sensitive) are then dropped, keeping the first.
    /// Preparing the same input twice yields identical catalogs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCorpus`] when no row survives cleaning or the
    /// surviving tags contain no tokens.
    pub fn prepare(raw: &[RawCatalogRow]) -> Result<Self> {
        let mut report = PreparationReport {
            rows_read: raw.len(),
            ..PreparationReport::default()
        };

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for row in raw {
            let Some(entry) = row.clone().into_entry() else {
                report.dropped_incomplete += 1;
                continue;
            };
            if !seen.insert(entry.name.clone()) {
                log::debug!("Dropping duplicate catalog row for {}", entry.name);
                report.dropped_duplicate += 1;
                continue;
            }
            entries.push(entry);
        }
        report.kept = entries.len();

        if entries.is_empty() {
            return Err(Error::EmptyCorpus {
                rows_read: report.rows_read,
            });
        }

        let tags: Vec<&str> = entries.iter().map(|e| e.tags.as_str()).collect();
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&tags).map_err(|e| match e {
            Error::EmptyCorpus { .. } => Error::EmptyCorpus {
                rows_read: report.rows_read,
            },
            other => other,
        })?;
        let vectors = vectorizer.transform_many(&tags)?;
        report.vocabulary_size = vectorizer.dimension();

        let vectorized = VectorizedCatalog::from_pairs(
            vectorizer.dimension(),
            entries.iter().map(|e| e.name.clone()).zip(vectors).collect(),
        );

        log::info!(
            "Prepared catalog: {} of {} rows kept ({} incomplete, {} duplicate), {} terms",
            report.kept,
            report.rows_read,
            report.dropped_incomplete,
            report.dropped_duplicate,
            report.vocabulary_size
        );

        Ok(Self {
            entries,
            vectorizer,
            vectorized,
            report,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    #[must_use]
    pub fn vectorized(&self) -> &VectorizedCatalog {
        &self.vectorized
    }

    #[must_use]
    pub fn report(&self) -> PreparationReport {
        self.report
    }

    #[must_use]
    pub fn space(&self) -> Option<&VectorSpace> {
        self.vectorizer.space()
    }

    /// Aggregate `seeds` and rank the catalog against them, excluding the
    /// seeds themselves.
    ///
    /// # Errors
    ///
    /// Propagates errors from aggregation and ranking.
    pub fn recommend(&self, seeds: &[SeedArtist], k: usize) -> Result<Vec<RankedMatch>> {
        self.recommend_with(seeds, k, EmptySeedPolicy::default())
    }

    /// [`recommend`](Self::recommend) with an explicit [`EmptySeedPolicy`].
    ///
    /// # Errors
    ///
    /// Propagates errors from aggregation and ranking.
    pub fn recommend_with(
        &self,
        seeds: &[SeedArtist],
        k: usize,
        policy: EmptySeedPolicy,
    ) -> Result<Vec<RankedMatch>> {
        let exclude: HashSet<String> = seeds.iter().map(|s| s.name.clone()).collect();
        self.recommend_excluding(seeds, &exclude, k, policy)
    }

    /// Aggregate `seeds` and rank the catalog, leaving out exactly the
    /// names in `exclude`. Seed names are not excluded implicitly.
    ///
    /// # Errors
    ///
    /// Propagates errors from aggregation and ranking.
    pub fn recommend_excluding(
        &self,
        seeds: &[SeedArtist],
        exclude: &HashSet<String>,
        k: usize,
        policy: EmptySeedPolicy,
    ) -> Result<Vec<RankedMatch>> {
        let preference = aggregate_with(&self.vectorizer, seeds, policy)?;
        rank(&preference, &self.vectorized, exclude, k)
    }
}
