use nutrition_store::codec::decode_row;
use nutrition_store::models::FoodRecord;
use surrealdb::Connection;
use tracing::debug;

use super::{ControlError, FoodQueries, NutritionControlPlane, Page};

impl<C: Connection> FoodQueries for NutritionControlPlane<C> {
    async fn search_by_name(
        &self,
        query: &str,
        page: Page,
    ) -> Result<Vec<FoodRecord>, ControlError> {
        let terms = split_terms(query);
        if terms.is_empty() {
            return Err(ControlError::InvalidInput(
                "query must contain at least one search term".to_string(),
            ));
        }
        debug!(
            terms = terms.len(),
            page = page.number(),
            size = page.size(),
            "searching foods"
        );
        let rows = self
            .store
            .search_foods(&terms, page.size(), page.offset())
            .await?;
        Ok(rows.into_iter().map(decode_row).collect())
    }

    async fn list_all(&self, page: Page) -> Result<Vec<FoodRecord>, ControlError> {
        debug!(page = page.number(), size = page.size(), "listing foods");
        let rows = self.store.list_foods(page.size(), page.offset()).await?;
        Ok(rows.into_iter().map(decode_row).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<FoodRecord>, ControlError> {
        Ok(self.store.get_food(id).await?.map(decode_row))
    }

    async fn get_by_barcode(&self, ean_13: &str) -> Result<Option<FoodRecord>, ControlError> {
        Ok(self.store.get_food_by_ean13(ean_13).await?.map(decode_row))
    }
}

/// Splits a search query into lowercased whitespace-separated terms.
#[must_use]
pub fn split_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}
