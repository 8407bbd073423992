//! Integration tests for the CSV → catalog → recommendation flow.
//!
//! The remote services are replaced with in-memory fakes so the whole
//! request path runs without network access or API keys.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use consonance_core::model::{ArtistIdentity, SeedArtist, SeedTag};
use consonance_etl::{
    open_catalog, ArtistResolver, Config, EtlResult, ImageLookup, NoImages, RecommendSettings,
    Recommender, SlotOutcome, TagSource,
};
use consonance_search::EmptySeedPolicy;
use tempfile::NamedTempFile;

const CATALOG_CSV: &str = "\
,Name,Tags,Listeners
0,Slowdive,shoegaze dreampop british,812345
1,Ride,shoegaze britpop british,400000
2,Cocteau Twins,dreampop ethereal,600000
3,Miles Davis,jazz trumpet,1500000
4,Bill Evans,jazz piano,700000
5,Lush,shoegaze dreampop,200000
6,Nameless,,10
7,Ride,noise,1
";

/// Catalog-backed resolver: matches queries case-insensitively against a
/// fixed list of known artists.
struct KnownArtists(Vec<&'static str>);

#[async_trait]
impl ArtistResolver for KnownArtists {
    async fn resolve(&self, query: &str) -> EtlResult<Option<ArtistIdentity>> {
        let query = query.trim().to_lowercase();
        Ok(self
            .0
            .iter()
            .find(|name| name.to_lowercase() == query)
            .map(|name| ArtistIdentity::new(*name)))
    }
}

struct FixedTags(HashMap<&'static str, Vec<&'static str>>);

#[async_trait]
impl TagSource for FixedTags {
    async fn top_tags(&self, artist: &ArtistIdentity, limit: usize) -> EtlResult<Vec<SeedTag>> {
        let tags = self.0.get(artist.name.as_str()).cloned().unwrap_or_default();
        Ok(tags
            .into_iter()
            .take(limit)
            .zip(0u32..)
            .map(|(name, rank)| SeedTag::new(name, rank))
            .collect())
    }
}

struct UrlImages;

#[async_trait]
impl ImageLookup for UrlImages {
    async fn image_url(&self, name: &str) -> EtlResult<Option<String>> {
        Ok(Some(format!("https://images.test/{}", name.replace(' ', "_"))))
    }
}

fn write_catalog() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CATALOG_CSV.as_bytes()).unwrap();
    file
}

fn build_recommender(file: &NamedTempFile, top_k: usize, images: Arc<dyn ImageLookup>) -> Recommender {
    let config = Config {
        catalog_path: file.path().to_path_buf(),
        top_k,
        ..Config::default()
    };
    let catalog = open_catalog(&config).expect("catalog should load");

    let resolver = KnownArtists(vec![
        "Slowdive",
        "Ride",
        "Cocteau Twins",
        "Miles Davis",
        "Bill Evans",
        "Lush",
        "Mazzy Star",
    ]);
    let tags = FixedTags(HashMap::from([
        ("Slowdive", vec!["Shoegaze", "Dream Pop", "British"]),
        ("Ride", vec!["shoegaze", "Britpop"]),
        ("Cocteau Twins", vec!["dream pop", "ethereal"]),
        ("Miles Davis", vec!["jazz", "trumpet"]),
    ]));

    Recommender::new(
        catalog,
        Arc::new(resolver),
        Arc::new(tags),
        images,
        RecommendSettings::from(&config),
    )
}

/// Loading drops incomplete and duplicate rows and ignores extra columns
#[test]
fn test_catalog_preparation_report() {
    let file = write_catalog();
    let config = Config {
        catalog_path: file.path().to_path_buf(),
        ..Config::default()
    };
    let catalog = open_catalog(&config).unwrap();
    let report = catalog.report();

    assert_eq!(report.rows_read, 8);
    assert_eq!(report.dropped_incomplete, 1);
    assert_eq!(report.dropped_duplicate, 1);
    assert_eq!(report.kept, 6);
    assert!(catalog.vectorized().get("Nameless").is_none());
}

/// Three shoegaze seeds recommend the remaining shoegaze band first
#[tokio::test]
async fn test_recommend_end_to_end() {
    let file = write_catalog();
    let recommender = build_recommender(&file, 3, Arc::new(UrlImages));

    let (slots, outcomes) = recommender
        .fill_slots(&["slowdive", "RIDE", "cocteau twins"])
        .await
        .unwrap();
    assert!(outcomes.iter().all(SlotOutcome::is_found));

    let recs = recommender.recommend(&slots).await.unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].name, "Lush");
    assert_eq!(recs[0].position, 1);
    assert!(recs[0].score > 0.0 && recs[0].score <= 100.0);
    assert_eq!(recs[0].image_url.as_deref(), Some("https://images.test/Lush"));

    for rec in &recs {
        assert!(!["Slowdive", "Ride", "Cocteau Twins"].contains(&rec.name.as_str()));
    }
    for pair in recs.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

/// top_k larger than the candidate pool returns every candidate
#[tokio::test]
async fn test_top_k_exceeds_candidates() {
    let file = write_catalog();
    let recommender = build_recommender(&file, 50, Arc::new(NoImages));

    let (slots, _) = recommender
        .fill_slots(&["Slowdive", "Ride", "Miles Davis"])
        .await
        .unwrap();
    let recs = recommender.recommend(&slots).await.unwrap();

    assert_eq!(recs.len(), 3);
    assert!(recs.iter().all(|r| r.image_url.is_none()));
}

/// Entering the same artist twice leaves the second slot empty
#[tokio::test]
async fn test_duplicate_seed_blocks_recommendation() {
    let file = write_catalog();
    let recommender = build_recommender(&file, 3, Arc::new(NoImages));

    let (slots, outcomes) = recommender
        .fill_slots(&["Slowdive", "slowdive", "Ride"])
        .await
        .unwrap();
    assert_eq!(outcomes[1], SlotOutcome::Duplicate("Slowdive".to_string()));
    assert!(!slots.is_complete());
    assert!(recommender.recommend(&slots).await.is_err());
}

/// An unknown artist is reported and leaves its slot empty
#[tokio::test]
async fn test_unknown_artist_not_found() {
    let file = write_catalog();
    let recommender = build_recommender(&file, 3, Arc::new(NoImages));

    let (slots, outcomes) = recommender
        .fill_slots(&["Slowdive", "Ride", "Slowdve"])
        .await
        .unwrap();
    assert_eq!(outcomes[2], SlotOutcome::NotFound("Slowdve".to_string()));
    assert_eq!(slots.filled(), 2);
}

/// A seed outside the catalog with no tags still produces recommendations
#[tokio::test]
async fn test_seed_missing_from_catalog_and_tags() {
    let file = write_catalog();
    let recommender = build_recommender(&file, 2, Arc::new(NoImages));

    let (slots, _) = recommender
        .fill_slots(&["Mazzy Star", "Miles Davis", "Ride"])
        .await
        .unwrap();
    let seeds = recommender.seed_artists(&slots).await.unwrap();
    assert!(seeds[0].has_no_tags());

    let recs = recommender.recommend_seeds(&seeds).await.unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r.name != "Miles Davis" && r.name != "Ride"));
}

/// The skip policy ignores tagless seeds instead of diluting the mean
#[tokio::test]
async fn test_skip_policy_matches_two_seed_mean() {
    let file = write_catalog();
    let config = Config {
        catalog_path: file.path().to_path_buf(),
        ..Config::default()
    };
    let catalog = open_catalog(&config).unwrap();

    let seeds = vec![
        SeedArtist::new("Miles Davis", vec!["jazz".to_string(), "trumpet".to_string()]),
        SeedArtist::new("Mazzy Star", Vec::new()),
    ];
    let included = catalog
        .recommend_with(&seeds, 1, EmptySeedPolicy::Include)
        .unwrap();
    let skipped = catalog
        .recommend_with(&seeds, 1, EmptySeedPolicy::Skip)
        .unwrap();

    assert_eq!(included[0].name, "Bill Evans");
    assert_eq!(skipped[0].name, "Bill Evans");
    assert!((included[0].score - skipped[0].score).abs() < 0.01);
}
