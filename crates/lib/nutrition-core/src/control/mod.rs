use std::{error::Error, fmt, future::Future};

use nutrition_store::models::FoodRecord;
use surrealdb::{Connection, Surreal};

use crate::store::{StoreError, SurrealFoodStore};

pub mod queries;

pub use queries::split_terms;

#[derive(Debug)]
pub enum ControlError {
    Store(StoreError),
    InvalidInput(String),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for ControlError {}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl ControlError {
    /// True when the failure was caused by caller input rather than the store.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::Store(StoreError::InvalidInput(_))
        )
    }
}

/// One-based page selector applied as `LIMIT size START (number - 1) * size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: usize,
    size: usize,
    offset: usize,
}

impl Page {
    pub const DEFAULT_NUMBER: usize = 1;
    pub const DEFAULT_SIZE: usize = 5;

    /// Builds a page selector.
    ///
    /// # Errors
    /// Returns `ControlError::InvalidInput` if either value is zero or the
    /// resulting offset does not fit the store's integer range.
    pub fn new(number: usize, size: usize) -> Result<Self, ControlError> {
        if number == 0 {
            return Err(ControlError::InvalidInput(
                "page must be a positive integer".to_string(),
            ));
        }
        if size == 0 {
            return Err(ControlError::InvalidInput(
                "pageSize must be a positive integer".to_string(),
            ));
        }
        let offset = (number - 1)
            .checked_mul(size)
            .filter(|offset| i64::try_from(*offset).is_ok() && i64::try_from(size).is_ok())
            .ok_or_else(|| {
                ControlError::InvalidInput(format!(
                    "page {number} with pageSize {size} is out of range"
                ))
            })?;
        Ok(Self {
            number,
            size,
            offset,
        })
    }

    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: Self::DEFAULT_NUMBER,
            size: Self::DEFAULT_SIZE,
            offset: 0,
        }
    }
}

/// Read operations the tool dispatcher routes to.
///
/// Absence is never an error: searches return an empty list and lookups
/// return `None`. Errors mean the store could not answer.
pub trait FoodQueries: Send + Sync {
    /// Lists records where every whitespace-separated term of `query` occurs,
    /// case-insensitively, in the name or one of the alternate names.
    fn search_by_name(
        &self,
        query: &str,
        page: Page,
    ) -> impl Future<Output = Result<Vec<FoodRecord>, ControlError>> + Send;

    /// Lists all records in id order.
    fn list_all(
        &self,
        page: Page,
    ) -> impl Future<Output = Result<Vec<FoodRecord>, ControlError>> + Send;

    fn get_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<FoodRecord>, ControlError>> + Send;

    /// Returns the first record with the barcode; duplicates are not rejected.
    fn get_by_barcode(
        &self,
        ean_13: &str,
    ) -> impl Future<Output = Result<Option<FoodRecord>, ControlError>> + Send;
}

/// Query engine backed by the `SurrealDB` food store.
pub struct NutritionControlPlane<C: Connection> {
    store: SurrealFoodStore<C>,
}

impl<C: Connection> Clone for NutritionControlPlane<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C: Connection> NutritionControlPlane<C> {
    #[must_use]
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            store: SurrealFoodStore::new(db),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &SurrealFoodStore<C> {
        &self.store
    }
}
