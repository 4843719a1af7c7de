//! Opaque identifiers for cart rows.
//!
//! A [`LineItemId`] exists only so the view layer can reference a row
//! ("remove this row"). It is never used to de-duplicate products; that is
//! done by product name in [`CartStore`](crate::CartStore).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable, unique token for one line item.
///
/// Wraps a random v4 UUID so ids minted for different rows (or different
/// site instances) never collide.
///
/// # Example
///
/// ```rust
/// # use embed_cart_core::LineItemId;
/// let id = LineItemId::new();
/// let parsed: LineItemId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(Uuid);

impl LineItemId {
    /// Mint a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LineItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LineItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<Uuid> for LineItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<LineItemId> for Uuid {
    fn from(id: LineItemId) -> Self {
        id.0
    }
}
