//! Clue disclosure, projected from access state.

use super::decision::AccessState;
use super::listing::GhostListing;

/// What a host may show of a listing's clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClueDisclosure<'a> {
    /// State not yet known; nothing to show.
    Hidden,
    /// Listing is locked; show the hint.
    Revealed(&'a str),
    /// Listing is unlocked (or not gated); the clue is moot.
    Resolved,
}

impl<'a> ClueDisclosure<'a> {
    /// Project the disclosure for `listing` in `state`.
    pub fn project(listing: &'a GhostListing, state: AccessState) -> Self {
        if !listing.is_ghost() {
            return Self::Resolved;
        }
        match state {
            AccessState::Locked => Self::Revealed(listing.clue()),
            AccessState::Unlocked => Self::Resolved,
            AccessState::Indeterminate => Self::Hidden,
        }
    }

    /// The clue text, if revealed.
    pub fn text(&self) -> Option<&'a str> {
        match self {
            Self::Revealed(clue) => Some(clue),
            _ => None,
        }
    }
}
