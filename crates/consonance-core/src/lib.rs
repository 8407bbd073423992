//! Core domain model for consonance.
//!
//! This crate defines the catalog and seed types shared by the ranking
//! engine and the I/O layers, the three-slot seed session, and the core
//! error taxonomy.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod session;

pub use error::{Error, Result};
pub use session::SeedSlots;
