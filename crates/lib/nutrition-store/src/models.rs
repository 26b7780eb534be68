use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nutrient name to amount per 100 g. Missing keys are unknown, not zero.
pub type Nutrition = BTreeMap<String, f64>;

/// Row persisted in the `food` table.
///
/// Structured columns keep the dataset's serialized JSON text; they are only
/// decoded when a record is materialized for a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodRow {
    pub food_id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub food_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean_13: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_100g: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_analysis: Option<String>,
    #[serde(default)]
    pub search_text: String,
}

impl FoodRow {
    /// Creates a row with only the required columns set.
    #[must_use]
    pub fn new(food_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            food_id: food_id.into(),
            name: name.into(),
            food_type: None,
            ean_13: None,
            labels: None,
            nutrition_100g: None,
            alternate_names: None,
            source: None,
            serving: None,
            package_size: None,
            ingredient_analysis: None,
            search_text: String::new(),
        }
    }
}

/// JSON object column carried through to callers as stored.
pub type SubObject = Map<String, Value>;

/// Fully decoded food record returned by every query.
///
/// Every field is always serialized; absent values are emitted as `null`.
/// `source`, `serving`, `package_size` and `ingredient_analysis` are passed
/// through untouched apart from the shape check in the codec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub food_type: Option<String>,
    pub ean_13: Option<String>,
    pub labels: Option<Vec<String>>,
    pub nutrition_100g: Option<Nutrition>,
    pub alternate_names: Option<Vec<String>>,
    /// Provenance entries, normally one object per upstream database.
    pub source: Option<Vec<Value>>,
    pub serving: Option<SubObject>,
    pub package_size: Option<SubObject>,
    pub ingredient_analysis: Option<SubObject>,
}
