//! Seed-slot session state.
//!
//! A recommendation request is built from a fixed number of seed slots,
//! each of which is either empty or holds a resolved artist identity. The
//! session owns the slots and is passed explicitly to whatever assembles
//! the request; no artist may occupy two slots at once.

use crate::error::{Error, Result};
use crate::model::ArtistIdentity;

/// Number of seed artists a recommendation is built from.
pub const SEED_SLOTS: usize = 3;

/// Fixed-size set of seed slots for one recommendation session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSlots {
    slots: [Option<ArtistIdentity>; SEED_SLOTS],
}

impl SeedSlots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `identity` in slot `index`.
    ///
    /// The slot is cleared before the duplicate check, so re-entering the
    /// same artist in the same slot succeeds, while entering an artist
    /// already held by another slot fails and leaves the slot empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] for an invalid index and
    /// [`Error::DuplicateSeed`] when another slot already holds the artist.
    pub fn set(&mut self, index: usize, identity: ArtistIdentity) -> Result<()> {
        self.clear(index)?;

        if self.contains(&identity) {
            return Err(Error::DuplicateSeed {
                name: identity.name,
            });
        }

        self.slots[index] = Some(identity);
        Ok(())
    }

    /// Empty slot `index`, returning what it held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] for an invalid index.
    pub fn clear(&mut self, index: usize) -> Result<Option<ArtistIdentity>> {
        let slot = self.slots.get_mut(index).ok_or(Error::SlotOutOfRange {
            index,
            slots: SEED_SLOTS,
        })?;
        Ok(slot.take())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ArtistIdentity> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn contains(&self, identity: &ArtistIdentity) -> bool {
        self.identities().any(|held| held.same_artist(identity))
    }

    /// Whether every slot is filled; recommendations require this.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of filled slots.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Filled slots in slot order.
    pub fn identities(&self) -> impl Iterator<Item = &ArtistIdentity> {
        self.slots.iter().flatten()
    }

    /// Names of the filled slots, in slot order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.identities().map(|id| id.name.clone()).collect()
    }
}
