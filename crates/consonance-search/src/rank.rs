//! Cosine-similarity ranking of catalog artists.

use std::collections::HashSet;

use consonance_core::model::RankedMatch;
use consonance_core::{Error, Result};

use crate::catalog::VectorizedCatalog;
use crate::vector::Vector;

/// Number of recommendations returned when the caller does not choose.
pub const DEFAULT_TOP_K: usize = 3;

/// Cosine similarity as a percentage rounded to two decimals, clamped to
/// `[0, 100]`.
#[must_use]
pub fn score(preference: &Vector, candidate: &Vector) -> f64 {
    let percent = (preference.cosine(candidate) * 100.0).clamp(0.0, 100.0);
    (percent * 100.0).round() / 100.0
}

/// Rank `catalog` against `preference` and return the best `k` matches.
///
/// Names in `exclude` never appear in the output. Entries whose vector
/// does not fit the catalog's vector space are skipped. The sort is
/// stable, so equal scores keep catalog order.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `preference` was built in a
/// different vector space than `catalog` or holds a non-finite weight.
pub fn rank(
    preference: &Vector,
    catalog: &VectorizedCatalog,
    exclude: &HashSet<String>,
    k: usize,
) -> Result<Vec<RankedMatch>> {
    if preference.len() != catalog.dimension() {
        return Err(Error::invalid_input(
            "rank",
            format!(
                "preference vector has {} dimensions, catalog has {}",
                preference.len(),
                catalog.dimension()
            ),
        ));
    }

    if !preference.is_finite() {
        return Err(Error::invalid_input(
            "rank",
            "preference vector has a non-finite weight",
        ));
    }

    if k == 0 {
        return Ok(Vec::new());
    }

    let mut scored: Vec<RankedMatch> = catalog
        .iter()
        .filter(|(name, _)| !exclude.contains(*name))
        .filter(|(name, vector)| {
            let complete = vector.len() == catalog.dimension() && vector.is_finite();
            if !complete {
                log::warn!("Skipping {name}: incomplete vector");
            }
            complete
        })
        .map(|(name, vector)| RankedMatch::new(name, score(preference, vector)))
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(k);

    log::debug!(
        "Ranked {} candidates ({} excluded names)",
        catalog.len(),
        exclude.len()
    );

    Ok(scored)
}
