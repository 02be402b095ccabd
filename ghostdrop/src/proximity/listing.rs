//! Ghost listing metadata supplied by the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{CoordError, Coordinates};

/// Catalog identifier of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    /// Wrap a catalog identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Errors raised when a catalog record cannot be used as a listing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListingError {
    /// Radius below zero.
    #[error("Listing {id}: radius must not be negative (got {radius})")]
    NegativeRadius { id: ListingId, radius: i64 },

    /// Radius larger than the representable range.
    #[error("Listing {id}: radius {radius} is too large")]
    RadiusTooLarge { id: ListingId, radius: i64 },

    /// Ghost listing without usable target coordinates.
    #[error("Listing {id}: invalid target: {source}")]
    InvalidTarget {
        id: ListingId,
        #[source]
        source: CoordError,
    },

    /// Ghost listing missing a target coordinate entirely.
    #[error("Listing {id}: ghost listing has no target coordinates")]
    MissingTarget { id: ListingId },

    /// Ghost listing without a radius.
    #[error("Listing {id}: ghost listing has no radius")]
    MissingRadius { id: ListingId },
}

/// A catalog record as it arrives over the wire.
///
/// Field names follow the catalog API. Convert with
/// [`GhostListing::try_from`] to validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub id: String,
    #[serde(default)]
    pub target_latitude: Option<f64>,
    #[serde(default)]
    pub target_longitude: Option<f64>,
    /// Required for ghost listings.
    #[serde(default)]
    pub radius_meters: Option<i64>,
    #[serde(default)]
    pub clue: String,
    #[serde(default)]
    pub is_ghost: bool,
}

/// A validated, read-only listing as the core sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostListing {
    id: ListingId,
    target: Coordinates,
    radius_m: u32,
    clue: String,
    is_ghost: bool,
}

impl GhostListing {
    /// A proximity-gated listing.
    ///
    /// A radius of `0` requires standing on the exact target point.
    pub fn ghost(
        id: impl Into<ListingId>,
        target: Coordinates,
        radius_m: u32,
        clue: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target,
            radius_m,
            clue: clue.into(),
            is_ghost: true,
        }
    }

    /// An ordinary listing that is always accessible.
    pub fn regular(id: impl Into<ListingId>) -> Self {
        Self {
            id: id.into(),
            target: Coordinates::from_raw(0.0, 0.0),
            radius_m: 0,
            clue: String::new(),
            is_ghost: false,
        }
    }

    pub fn id(&self) -> &ListingId {
        &self.id
    }

    pub fn target(&self) -> Coordinates {
        self.target
    }

    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    pub fn clue(&self) -> &str {
        &self.clue
    }

    pub fn is_ghost(&self) -> bool {
        self.is_ghost
    }
}

impl From<String> for ListingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl TryFrom<CatalogListing> for GhostListing {
    type Error = ListingError;

    fn try_from(record: CatalogListing) -> Result<Self, Self::Error> {
        let id = ListingId::new(record.id);

        let radius = match record.radius_meters {
            Some(radius) => radius,
            None if record.is_ghost => return Err(ListingError::MissingRadius { id }),
            None => 0,
        };
        if radius < 0 {
            return Err(ListingError::NegativeRadius { id, radius });
        }
        let radius_m = u32::try_from(radius).map_err(|_| ListingError::RadiusTooLarge {
            id: id.clone(),
            radius,
        })?;

        if !record.is_ghost {
            // Target is never consulted for regular listings.
            return Ok(Self {
                id,
                target: Coordinates::from_raw(
                    record.target_latitude.unwrap_or(0.0),
                    record.target_longitude.unwrap_or(0.0),
                ),
                radius_m,
                clue: record.clue,
                is_ghost: false,
            });
        }

        let (Some(lat), Some(lon)) = (record.target_latitude, record.target_longitude) else {
            return Err(ListingError::MissingTarget { id });
        };
        let target = Coordinates::new(lat, lon).map_err(|source| ListingError::InvalidTarget {
            id: id.clone(),
            source,
        })?;

        Ok(Self {
            id,
            target,
            radius_m,
            clue: record.clue,
            is_ghost: true,
        })
    }
}
