//! Rejections for privileged actions on gated listings.

use thiserror::Error;

use super::listing::ListingId;
use crate::location::UnavailableReason;

/// Why a purchase (or other privileged action) was refused.
///
/// Hosts match on this to tell a proximity rejection apart from their own
/// failures such as stock or payment errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessDenied {
    /// A fix is available but the viewer is outside the radius.
    #[error("Listing {listing} is locked: {distance_m:.0} m away (radius {radius_m} m)")]
    OutOfRange {
        listing: ListingId,
        distance_m: f64,
        radius_m: u32,
    },

    /// Location cannot be used, so the listing stays locked.
    #[error("Listing {listing} is locked: location {reason}")]
    LocationUnavailable {
        listing: ListingId,
        reason: UnavailableReason,
    },

    /// Still waiting for the first location reading.
    #[error("Listing {listing} is not yet unlocked: waiting for location")]
    Indeterminate { listing: ListingId },

    /// No controller is tracking this listing.
    #[error("Listing {listing} is not visible")]
    NotVisible { listing: ListingId },
}

impl AccessDenied {
    /// The listing the rejection concerns.
    pub fn listing(&self) -> &ListingId {
        match self {
            Self::OutOfRange { listing, .. }
            | Self::LocationUnavailable { listing, .. }
            | Self::Indeterminate { listing }
            | Self::NotVisible { listing } => listing,
        }
    }

    /// The location failure behind the rejection, if that was the cause.
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self {
            Self::LocationUnavailable { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
