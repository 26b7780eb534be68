//! Decoding of stored rows into `FoodRecord` values.
//!
//! Every structured column is decoded on its own. A column holding text that
//! is not valid JSON of the expected shape decodes to `None` so that one bad
//! row never fails the query that returned it.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::models::{FoodRecord, FoodRow, Nutrition};
use crate::schema::build_search_text;

/// Materializes a stored row into an owned record.
#[must_use]
pub fn decode_row(row: FoodRow) -> FoodRecord {
    FoodRecord {
        labels: decode_string_list(row.labels.as_deref()),
        nutrition_100g: decode_nutrition(row.nutrition_100g.as_deref()),
        alternate_names: decode_string_list(row.alternate_names.as_deref()),
        source: decode_json(row.source.as_deref()),
        serving: decode_json(row.serving.as_deref()),
        package_size: decode_json(row.package_size.as_deref()),
        ingredient_analysis: decode_json(row.ingredient_analysis.as_deref()),
        id: row.food_id,
        name: row.name,
        food_type: non_empty(row.food_type),
        ean_13: non_empty(row.ean_13),
    }
}

/// Decodes a serialized JSON column, treating blank, `null` and malformed
/// text alike as absent.
#[must_use]
pub fn decode_json<T: DeserializeOwned>(raw: Option<&str>) -> Option<T> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    serde_json::from_str::<Option<T>>(raw).ok().flatten()
}

#[must_use]
pub fn decode_string_list(raw: Option<&str>) -> Option<Vec<String>> {
    decode_json(raw)
}

/// Decodes the nutrition map, keeping only numeric entries.
#[must_use]
pub fn decode_nutrition(raw: Option<&str>) -> Option<Nutrition> {
    let entries: Map<String, Value> = decode_json(raw)?;
    Some(
        entries
            .into_iter()
            .filter_map(|(key, value)| value.as_f64().map(|amount| (key, amount)))
            .collect(),
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl FoodRow {
    /// Recomputes `search_text` from the name and the serialized alternate names.
    #[must_use]
    pub fn with_search_text(mut self) -> Self {
        let aliases = decode_string_list(self.alternate_names.as_deref()).unwrap_or_default();
        self.search_text = build_search_text(&self.name, &aliases);
        self
    }
}
