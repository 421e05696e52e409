//! Canonical and working record lists.
//!
//! The canonical list is set once, from the first successful fetch, and is
//! never touched again. The working list starts as a first-name-sorted copy
//! and is only ever replaced wholesale by delete, restore, or sort. Since
//! nothing inserts, the working list is always a subset of the canonical one.

use crate::directory::sort::{sort_listings, SortMode};
use crate::domain::error::Result;
use crate::domain::{Coordinates, Listing, NameParser, UserId, UserRecord};

/// Record store holding the fetched directory and the displayed list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    canonical: Vec<UserRecord>,
    working: Vec<Listing>,
    loaded: bool,
}

impl Directory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the fetched records.
    ///
    /// The records become the canonical list as given (fetch order); the
    /// working list is a first-name-sorted copy.
    ///
    /// # Parameters
    ///
    /// * `users` - Decoded records in fetch order
    /// * `parser` - Name key extractor for the initial first-name sort
    ///
    /// # Returns
    ///
    /// `true` on the first call. Later calls drop `users` and return `false`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use yellowpage::directory::Directory;
    /// use yellowpage::domain::{HumanNameParser, UserRecord};
    ///
    /// let users: Vec<UserRecord> = serde_json::from_str(
    ///     r#"[{"id": 1, "name": "Bob Young"}, {"id": 2, "name": "Amy Young"}]"#,
    /// )?;
    /// let mut directory = Directory::new();
    /// assert!(directory.load(users, &HumanNameParser));
    /// assert_eq!(directory.working()[0].user.name, "Amy Young");
    /// assert_eq!(directory.canonical()[0].name, "Bob Young");
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn load(&mut self, users: Vec<UserRecord>, parser: &dyn NameParser) -> bool {
        if self.loaded {
            tracing::debug!(user_count = users.len(), "directory already loaded, ignoring");
            return false;
        }

        let initial: Vec<Listing> = users.iter().cloned().map(Listing::from).collect();
        self.working = sort_listings(&initial, SortMode::FirstName, None, parser).unwrap_or(initial);
        self.canonical = users;
        self.loaded = true;

        tracing::debug!(user_count = self.canonical.len(), "directory loaded");
        true
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn canonical(&self) -> &[UserRecord] {
        &self.canonical
    }

    #[must_use]
    pub fn working(&self) -> &[Listing] {
        &self.working
    }

    /// Removes the record with `id` from the working list.
    ///
    /// The remaining rows keep their relative order.
    ///
    /// # Returns
    ///
    /// `false` (and the list as it was) when no such record is displayed.
    pub fn delete(&mut self, id: UserId) -> bool {
        let next = delete_listing(&self.working, id);
        let removed = next.len() != self.working.len();
        if removed {
            self.working = next;
        }
        tracing::debug!(id = id, removed = removed, remaining = self.working.len(), "delete");
        removed
    }

    /// Resets the working list to a fresh copy of the canonical list, in fetch
    /// order and without distance annotations.
    pub fn restore(&mut self) {
        self.working = restore_listings(&self.canonical);
        tracing::debug!(count = self.working.len(), "working list restored");
    }

    /// Whether restore would change anything.
    ///
    /// Compares lengths only. That equals "nothing was deleted" solely because
    /// no operation ever adds records to the working list.
    #[must_use]
    pub fn can_restore(&self) -> bool {
        self.working.len() != self.canonical.len()
    }

    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.canonical.len().saturating_sub(self.working.len())
    }

    /// Whether the working list carries distance annotations.
    #[must_use]
    pub fn is_annotated(&self) -> bool {
        self.working.first().is_some_and(|l| l.distance.is_some())
    }

    /// Re-sorts the current working list (deletions included) by `mode`.
    ///
    /// # Parameters
    ///
    /// * `mode` - Key to order by
    /// * `origin` - Viewer position; required for [`SortMode::Distance`]
    /// * `parser` - Name key extractor for the name modes
    ///
    /// # Errors
    ///
    /// Propagates [`sort_listings`] errors; the working list is unchanged then.
    pub fn sort(
        &mut self,
        mode: SortMode,
        origin: Option<Coordinates>,
        parser: &dyn NameParser,
    ) -> Result<()> {
        self.working = sort_listings(&self.working, mode, origin, parser)?;
        Ok(())
    }
}

/// Copy of `listings` without the record `id`; unchanged copy if absent.
#[must_use]
pub fn delete_listing(listings: &[Listing], id: UserId) -> Vec<Listing> {
    let mut next = Vec::with_capacity(listings.len());
    let mut removed = false;
    for listing in listings {
        if !removed && listing.id() == id {
            removed = true;
        } else {
            next.push(listing.clone());
        }
    }
    next
}

/// Fresh unannotated working list mirroring `canonical`.
#[must_use]
pub fn restore_listings(canonical: &[UserRecord]) -> Vec<Listing> {
    canonical.iter().cloned().map(Listing::from).collect()
}
