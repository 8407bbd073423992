//! Folding seed artists' tags into one preference vector.

use serde::{Deserialize, Serialize};

use consonance_core::model::SeedArtist;
use consonance_core::{Error, Result};

use crate::vector::Vector;
use crate::vectorizer::TfIdfVectorizer;

/// The mean of the seed artists' tag vectors.
pub type PreferenceVector = Vector;

/// How seeds whose tag source returned no tags enter the mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySeedPolicy {
    /// Average in a zero vector for the seed, diluting the others.
    #[default]
    Include,
    /// Leave the seed out of the mean entirely.
    Skip,
}

/// Normalise a curated tag into a single token: lower-cased, with all
/// internal whitespace removed ("Indie Pop" → "indiepop").
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    tag.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Join a seed's normalised tags into one space-separated document.
#[must_use]
pub fn seed_document(seed: &SeedArtist) -> String {
    seed.tags
        .iter()
        .map(|tag| normalize_tag(tag))
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the preference vector for `seeds` using the default
/// [`EmptySeedPolicy::Include`].
///
/// # Errors
///
/// See [`aggregate_with`].
pub fn aggregate(vectorizer: &TfIdfVectorizer, seeds: &[SeedArtist]) -> Result<PreferenceVector> {
    aggregate_with(vectorizer, seeds, EmptySeedPolicy::default())
}

/// Build the preference vector for `seeds`: each seed's tags are
/// transformed through the fitted vectorizer and the resulting vectors are
/// averaged componentwise.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `seeds` is empty and
/// [`Error::NotFitted`] when the vectorizer has not been fitted.
pub fn aggregate_with(
    vectorizer: &TfIdfVectorizer,
    seeds: &[SeedArtist],
    policy: EmptySeedPolicy,
) -> Result<PreferenceVector> {
    if seeds.is_empty() {
        return Err(Error::invalid_input("aggregate", "no seed artists given"));
    }

    let mut vectors = Vec::with_capacity(seeds.len());
    for seed in seeds {
        if seed.has_no_tags() {
            log::warn!(
                "Seed artist {} has no tags; {} in preference",
                seed.name,
                match policy {
                    EmptySeedPolicy::Include => "averaging a zero vector",
                    EmptySeedPolicy::Skip => "leaving it out",
                }
            );
            if policy == EmptySeedPolicy::Skip {
                continue;
            }
        }

        let document = seed_document(seed);
        log::debug!("Seed {} -> {:?}", seed.name, document);
        vectors.push(vectorizer.transform(&document)?);
    }

    // Every seed may have been skipped without touching the vectorizer.
    if !vectorizer.is_fitted() {
        return Err(Error::NotFitted);
    }

    Ok(Vector::mean(&vectors, vectorizer.dimension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> TfIdfVectorizer {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer
            .fit(&["indiepop twee", "shoegaze dreampop", "indiepop shoegaze"])
            .unwrap();
        vectorizer
    }

    fn seed(name: &str, tags: &[&str]) -> SeedArtist {
        SeedArtist::new(name, tags.iter().map(|t| (*t).to_string()).collect())
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("Indie Pop"), "indiepop");
        assert_eq!(normalize_tag("  Dream\tPop "), "dreampop");
        assert_eq!(normalize_tag("80s"), "80s");
    }

    #[test]
    fn test_seed_document() {
        let s = seed("Belle and Sebastian", &["Indie Pop", "twee", "  "]);
        assert_eq!(seed_document(&s), "indiepop twee");
    }

    #[test]
    fn test_multi_word_tag_matches_joined_vocabulary() {
        let vectorizer = fitted();
        let pref = aggregate(&vectorizer, &[seed("Slowdive", &["Dream Pop"])]).unwrap();
        let space = vectorizer.space().unwrap();
        assert!(pref[space.position("dreampop").unwrap()] > 0.0);
    }

    #[test]
    fn test_mean_of_seed_vectors() {
        let vectorizer = fitted();
        let a = seed("A", &["twee"]);
        let b = seed("B", &["shoegaze"]);
        let pref = aggregate(&vectorizer, &[a.clone(), b.clone()]).unwrap();

        let va = vectorizer.transform(&seed_document(&a)).unwrap();
        let vb = vectorizer.transform(&seed_document(&b)).unwrap();
        for i in 0..pref.len() {
            assert!((pref[i] - (va[i] + vb[i]) / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dimension_matches_vocabulary() {
        let vectorizer = fitted();
        let pref = aggregate(
            &vectorizer,
            &[seed("A", &["twee"]), seed("B", &["polka"]), seed("C", &[])],
        )
        .unwrap();
        assert_eq!(pref.len(), vectorizer.dimension());
    }

    #[test]
    fn test_empty_seed_included_dilutes() {
        let vectorizer = fitted();
        let tagged = seed("A", &["twee"]);
        let empty = seed("B", &[]);

        let alone = aggregate(&vectorizer, &[tagged.clone()]).unwrap();
        let diluted = aggregate(&vectorizer, &[tagged, empty]).unwrap();
        let i = vectorizer.space().unwrap().position("twee").unwrap();
        assert!((diluted[i] - alone[i] / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_seed_skipped() {
        let vectorizer = fitted();
        let tagged = seed("A", &["twee"]);
        let empty = seed("B", &[]);

        let alone = aggregate(&vectorizer, &[tagged.clone()]).unwrap();
        let skipped =
            aggregate_with(&vectorizer, &[tagged, empty], EmptySeedPolicy::Skip).unwrap();
        assert_eq!(alone, skipped);
    }

    #[test]
    fn test_all_empty_seeds_give_zero_vector() {
        let vectorizer = fitted();
        let seeds = [seed("A", &[]), seed("B", &[]), seed("C", &[])];
        for policy in [EmptySeedPolicy::Include, EmptySeedPolicy::Skip] {
            let pref = aggregate_with(&vectorizer, &seeds, policy).unwrap();
            assert_eq!(pref.len(), vectorizer.dimension());
            assert!(pref.is_zero());
        }
    }

    #[test]
    fn test_no_seeds_is_invalid_input() {
        let vectorizer = fitted();
        let err = aggregate(&vectorizer, &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput {
                stage: "aggregate",
                ..
            }
        ));
    }

    #[test]
    fn test_unfitted_vectorizer() {
        let vectorizer = TfIdfVectorizer::new();
        assert!(matches!(
            aggregate(&vectorizer, &[seed("A", &["twee"])]),
            Err(Error::NotFitted)
        ));
        assert!(matches!(
            aggregate_with(&vectorizer, &[seed("A", &[])], EmptySeedPolicy::Skip),
            Err(Error::NotFitted)
        ));
    }
}
