//! Page cursor and the stored catalog state.
//!
//! The cursor is a bare page number. It knows nothing about filters; whoever
//! changes the active filter is responsible for moving it back to page 1.
//!
//! The stored catalog state pairs the cursor with the filters it was reached
//! under: `{"state": {"page": 3, "filters": {...}}, "version": 2}`.
//! Version 1 stored filters as `{brand, price, fromKm, toKm}` and is migrated on read.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::filter::{parse_lenient_number, Filter};
use crate::persist::{read_envelope, write_envelope};

/// Storage namespace for the catalog state.
pub const CATALOG_STATE_NAMESPACE: &str = "car-store";

/// Schema version written with the catalog state.
pub const CATALOG_STATE_VERSION: u32 = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("Page must be at least 1, got {0}")]
    InvalidPage(u32),
}

/// Next page to request. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageCursor(u32);

impl PageCursor {
    pub fn first() -> Self {
        PageCursor(1)
    }

    pub fn new(page: u32) -> Result<Self, CursorError> {
        if page == 0 {
            return Err(CursorError::InvalidPage(page));
        }
        Ok(PageCursor(page))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first()
    }
}

impl TryFrom<u32> for PageCursor {
    type Error = CursorError;

    fn try_from(page: u32) -> Result<Self, Self::Error> {
        PageCursor::new(page)
    }
}

impl From<PageCursor> for u32 {
    fn from(cursor: PageCursor) -> Self {
        cursor.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    pub page: PageCursor,
    #[serde(default)]
    pub filters: Filter,
}

impl CatalogState {
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        write_envelope(self, CATALOG_STATE_VERSION)
    }

    /// Rehydrate from storage. Missing, corrupt, or newer-than-known data yields defaults.
    pub fn from_stored(raw: Option<&str>) -> Self {
        let Some(envelope) = raw.and_then(read_envelope) else {
            return Self::default();
        };

        let decoded = match envelope.version {
            CATALOG_STATE_VERSION => serde_json::from_value::<CatalogState>(envelope.state),
            1 => serde_json::from_value::<LegacyCatalogState>(envelope.state).map(Into::into),
            other => {
                warn!(
                    "stored catalog state has unknown version {}, using defaults",
                    other
                );
                return Self::default();
            }
        };

        decoded.unwrap_or_else(|err| {
            warn!("ignoring unreadable catalog state: {}", err);
            Self::default()
        })
    }
}

/// Catalog state as written by schema version 1.
#[derive(Debug, Deserialize)]
struct LegacyCatalogState {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    filters: LegacyFilters,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyFilters {
    brand: Option<String>,
    price: Option<serde_json::Value>,
    from_km: Option<f64>,
    to_km: Option<f64>,
}

impl From<LegacyCatalogState> for CatalogState {
    fn from(legacy: LegacyCatalogState) -> Self {
        let price = legacy.filters.price.and_then(|price| match price {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => parse_lenient_number(&s),
            _ => None,
        });

        CatalogState {
            page: legacy
                .page
                .and_then(|p| PageCursor::new(p).ok())
                .unwrap_or_default(),
            filters: Filter {
                brand: legacy.filters.brand.filter(|b| !b.is_empty()),
                rental_price: price,
                min_mileage: legacy.filters.from_km,
                max_mileage: legacy.filters.to_km,
            },
        }
    }
}
