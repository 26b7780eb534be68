use nutrition_core::control::Page;
use nutrition_store::schema::{EAN13_LEN, FOOD_ID_PREFIX, is_food_id};
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ToolError;

/// Operations exposed to MCP callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SearchFoodByName,
    GetFoods,
    GetFoodById,
    GetFoodByEan13,
}

impl Operation {
    pub const ALL: [Self; 4] = [
        Self::SearchFoodByName,
        Self::GetFoods,
        Self::GetFoodById,
        Self::GetFoodByEan13,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SearchFoodByName => "search-food-by-name",
            Self::GetFoods => "get-foods",
            Self::GetFoodById => "get-food-by-id",
            Self::GetFoodByEan13 => "get-food-by-ean13",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operation| operation.name() == name)
    }
}

// Wire argument shapes. The derived JSON Schemas are what `tools/list`
// advertises, so the attributes below are the published constraints.

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct SearchFoodByNameArgs {
    #[schemars(description = "Search query for food name", length(min = 1))]
    pub query: String,
    #[schemars(
        description = "Page number (1-indexed)",
        range(min = 1),
        extend("default" = 1)
    )]
    pub page: Option<usize>,
    #[serde(rename = "pageSize", alias = "page_size")]
    #[schemars(
        description = "Number of results per page",
        range(min = 1),
        extend("default" = 5)
    )]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct GetFoodsArgs {
    #[schemars(
        description = "Page number (1-indexed)",
        range(min = 1),
        extend("default" = 1)
    )]
    pub page: Option<usize>,
    #[serde(rename = "pageSize", alias = "page_size")]
    #[schemars(
        description = "Number of results per page",
        range(min = 1),
        extend("default" = 5)
    )]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct GetFoodByIdArgs {
    #[schemars(description = "Food ID (must start with 'fd_')", regex(pattern = "^fd_"))]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct GetFoodByEan13Args {
    #[schemars(
        description = "EAN-13 barcode (exactly 13 characters)",
        length(min = 13, max = 13)
    )]
    pub ean_13: String,
}

/// A tool call whose arguments passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoodRequest {
    SearchFoodByName { query: String, page: Page },
    GetFoods { page: Page },
    GetFoodById { id: String },
    GetFoodByEan13 { ean_13: String },
}

impl FoodRequest {
    /// Resolves the operation name and validates its arguments.
    ///
    /// # Errors
    /// Returns `ToolError::UnknownOperation` for names outside the catalog and
    /// `ToolError::Validation` for missing, mistyped or out-of-range arguments.
    pub fn parse(operation: &str, arguments: &Map<String, Value>) -> Result<Self, ToolError> {
        let Some(operation) = Operation::from_name(operation) else {
            return Err(ToolError::UnknownOperation(operation.to_string()));
        };
        match operation {
            Operation::SearchFoodByName => {
                let args: SearchFoodByNameArgs = decode(arguments)?;
                if args.query.trim().is_empty() {
                    return Err(ToolError::Validation(
                        "query must be a non-empty string".to_string(),
                    ));
                }
                Ok(Self::SearchFoodByName {
                    page: page_from(args.page, args.page_size)?,
                    query: args.query,
                })
            }
            Operation::GetFoods => {
                let args: GetFoodsArgs = decode(arguments)?;
                Ok(Self::GetFoods {
                    page: page_from(args.page, args.page_size)?,
                })
            }
            Operation::GetFoodById => {
                let GetFoodByIdArgs { id } = decode(arguments)?;
                if !is_food_id(&id) {
                    return Err(ToolError::Validation(format!(
                        "id must start with '{FOOD_ID_PREFIX}'"
                    )));
                }
                Ok(Self::GetFoodById { id })
            }
            Operation::GetFoodByEan13 => {
                let GetFoodByEan13Args { ean_13 } = decode(arguments)?;
                let length = ean_13.chars().count();
                if length != EAN13_LEN {
                    return Err(ToolError::Validation(format!(
                        "ean_13 must be exactly {EAN13_LEN} characters long (got {length})"
                    )));
                }
                Ok(Self::GetFoodByEan13 { ean_13 })
            }
        }
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::SearchFoodByName { .. } => Operation::SearchFoodByName,
            Self::GetFoods { .. } => Operation::GetFoods,
            Self::GetFoodById { .. } => Operation::GetFoodById,
            Self::GetFoodByEan13 { .. } => Operation::GetFoodByEan13,
        }
    }
}

/// Deserializes the argument object; `null` reads as an omitted optional.
fn decode<T: DeserializeOwned>(arguments: &Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|err| ToolError::Validation(err.to_string()))
}

fn page_from(number: Option<usize>, size: Option<usize>) -> Result<Page, ToolError> {
    Ok(Page::new(
        number.unwrap_or(Page::DEFAULT_NUMBER),
        size.unwrap_or(Page::DEFAULT_SIZE),
    )?)
}
