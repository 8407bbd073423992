//! Tag-similarity search for consonance.
//!
//! Fits a TF-IDF model over the catalog's tag text, folds seed artists'
//! tags into a single preference vector in the same space, and ranks
//! catalog artists by cosine similarity to it.
//!
//! # Example
//!
//! ```
//! use consonance_core::model::{RawCatalogRow, SeedArtist};
//! use consonance_search::Catalog;
//!
//! let raw = vec![
//!     RawCatalogRow::new("A", "rock guitar"),
//!     RawCatalogRow::new("B", "jazz piano"),
//!     RawCatalogRow::new("C", "rock metal"),
//! ];
//! let catalog = Catalog::prepare(&raw).unwrap();
//!
//! let seeds = vec![SeedArtist::new("Seed", vec!["rock".into(), "guitar".into()])];
//! let matches = catalog.recommend(&seeds, 3).unwrap();
//! assert_eq!(matches[0].name, "A");
//! ```

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod aggregate;
pub mod catalog;
pub mod rank;
pub mod vector;
pub mod vectorizer;

pub use aggregate::{aggregate, EmptySeedPolicy, PreferenceVector};
pub use catalog::{Catalog, PreparationReport, VectorizedCatalog};
pub use rank::{rank, DEFAULT_TOP_K};
pub use vector::Vector;
pub use vectorizer::{TfIdfVectorizer, VectorSpace};
