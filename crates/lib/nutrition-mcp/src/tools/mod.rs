//! Transport-agnostic tool dispatch: validates `(operation, arguments)` pairs
//! and routes them to the query engine.

use std::{error::Error, fmt};

use nutrition_core::control::{ControlError, FoodQueries};
use nutrition_core::store::StoreError;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

pub mod catalog;
pub mod request;

pub use catalog::{ToolDescriptor, catalog};
pub use request::{FoodRequest, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    Validation,
    UnknownOperation,
    Infrastructure,
}

impl ToolErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::UnknownOperation => "unknown-operation",
            Self::Infrastructure => "infrastructure",
        }
    }
}

#[derive(Debug)]
pub enum ToolError {
    /// Missing, mistyped or out-of-range argument.
    Validation(String),
    /// Operation name outside the catalog.
    UnknownOperation(String),
    /// The store could not answer.
    Infrastructure(String),
}

impl ToolError {
    #[must_use]
    pub const fn kind(&self) -> ToolErrorKind {
        match self {
            Self::Validation(_) => ToolErrorKind::Validation,
            Self::UnknownOperation(_) => ToolErrorKind::UnknownOperation,
            Self::Infrastructure(_) => ToolErrorKind::Infrastructure,
        }
    }

    /// Structured `{kind, message}` form returned to callers.
    #[must_use]
    pub fn envelope(&self) -> Value {
        json!({
            "kind": self.kind().as_str(),
            "message": self.to_string(),
        })
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "invalid arguments: {message}"),
            Self::UnknownOperation(name) => write!(f, "unknown operation: {name}"),
            Self::Infrastructure(message) => write!(f, "food store unavailable: {message}"),
        }
    }
}

impl Error for ToolError {}

impl From<ControlError> for ToolError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::InvalidInput(message)
            | ControlError::Store(StoreError::InvalidInput(message)) => Self::Validation(message),
            other => Self::Infrastructure(other.to_string()),
        }
    }
}

/// Routes validated tool calls to a [`FoodQueries`] implementation.
pub struct ToolDispatcher<Q> {
    queries: Q,
}

impl<Q: FoodQueries> ToolDispatcher<Q> {
    #[must_use]
    pub const fn new(queries: Q) -> Self {
        Self { queries }
    }

    #[must_use]
    pub const fn queries(&self) -> &Q {
        &self.queries
    }

    /// Validates and executes a tool call.
    ///
    /// Lists serialize to a JSON array; lookups serialize to a record or `null`.
    ///
    /// # Errors
    /// Returns `ToolError` for unknown operations, invalid arguments or store failures.
    pub async fn dispatch(
        &self,
        operation: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ToolError> {
        debug!(operation, "dispatching tool call");
        let request = FoodRequest::parse(operation, arguments).inspect_err(|err| {
            debug!(operation, "rejected tool call: {err}");
        })?;
        self.execute(request).await.inspect_err(|err| {
            if err.kind() == ToolErrorKind::Infrastructure {
                warn!(operation, "tool call failed: {err}");
            }
        })
    }

    /// Executes an already validated request.
    ///
    /// # Errors
    /// Returns `ToolError` when the store fails.
    pub async fn execute(&self, request: FoodRequest) -> Result<Value, ToolError> {
        match request {
            FoodRequest::SearchFoodByName { query, page } => {
                to_json(&self.queries.search_by_name(&query, page).await?)
            }
            FoodRequest::GetFoods { page } => to_json(&self.queries.list_all(page).await?),
            FoodRequest::GetFoodById { id } => {
                let record = self.queries.get_by_id(&id).await?;
                if record.is_none() {
                    warn!(%id, "food not found");
                }
                to_json(&record)
            }
            FoodRequest::GetFoodByEan13 { ean_13 } => {
                let record = self.queries.get_by_barcode(&ean_13).await?;
                if record.is_none() {
                    warn!(%ean_13, "food not found");
                }
                to_json(&record)
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|err| ToolError::Infrastructure(format!("failed to encode result: {err}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use nutrition_core::control::{NutritionControlPlane, Page};
    use nutrition_store::models::FoodRecord;
    use serde_json::json;
    use surrealdb::Surreal;
    use surrealdb::engine::local::Db;

    use super::*;

    fn record(id: &str, name: &str) -> FoodRecord {
        serde_json::from_value(json!({ "id": id, "name": name }))
            .expect("minimal record should deserialize")
    }

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test arguments must be a JSON object"),
        }
    }

    /// In-memory queries that record every page they are asked for.
    struct FakeQueries {
        records: Vec<FoodRecord>,
        pages: Mutex<Vec<Page>>,
    }

    impl FakeQueries {
        fn with_records(records: Vec<FoodRecord>) -> Self {
            Self {
                records,
                pages: Mutex::new(Vec::new()),
            }
        }

        fn window(&self, page: Page, matches: impl Fn(&FoodRecord) -> bool) -> Vec<FoodRecord> {
            self.pages.lock().expect("pages lock").push(page);
            self.records
                .iter()
                .filter(|record| matches(record))
                .skip(page.offset())
                .take(page.size())
                .cloned()
                .collect()
        }
    }

    impl FoodQueries for FakeQueries {
        async fn search_by_name(
            &self,
            query: &str,
            page: Page,
        ) -> Result<Vec<FoodRecord>, ControlError> {
            let query = query.to_lowercase();
            Ok(self.window(page, |record| record.name.to_lowercase().contains(&query)))
        }

        async fn list_all(&self, page: Page) -> Result<Vec<FoodRecord>, ControlError> {
            Ok(self.window(page, |_| true))
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<FoodRecord>, ControlError> {
            Ok(self.records.iter().find(|record| record.id == id).cloned())
        }

        async fn get_by_barcode(
            &self,
            ean_13: &str,
        ) -> Result<Option<FoodRecord>, ControlError> {
            Ok(self
                .records
                .iter()
                .find(|record| record.ean_13.as_deref() == Some(ean_13))
                .cloned())
        }
    }

    /// Control plane whose client never connected; every store call fails.
    fn disconnected() -> NutritionControlPlane<Db> {
        NutritionControlPlane::new(Surreal::init())
    }

    fn sample() -> FakeQueries {
        let mut yogurt = record("fd_002", "Greek Yogurt");
        yogurt.ean_13 = Some("4006381333931".to_string());
        FakeQueries::with_records(vec![
            record("fd_001", "Banana"),
            yogurt,
            record("fd_003", "Banana Bread"),
        ])
    }

    #[tokio::test]
    async fn list_operations_return_arrays() {
        let dispatcher = ToolDispatcher::new(sample());

        let value = dispatcher
            .dispatch("search-food-by-name", &args(json!({ "query": "banana" })))
            .await
            .expect("search should succeed");
        let names: Vec<&str> = value
            .as_array()
            .expect("search returns an array")
            .iter()
            .filter_map(|item| item["name"].as_str())
            .collect();
        assert_eq!(names, vec!["Banana", "Banana Bread"]);

        let value = dispatcher
            .dispatch("get-foods", &args(json!({ "page": 2, "pageSize": 2 })))
            .await
            .expect("listing should succeed");
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["id"], "fd_003");
    }

    #[tokio::test]
    async fn defaults_reach_the_query_engine() {
        let dispatcher = ToolDispatcher::new(sample());
        dispatcher
            .dispatch("get-foods", &args(json!({})))
            .await
            .expect("listing should succeed");
        let pages = dispatcher.queries().pages.lock().expect("pages lock").clone();
        assert_eq!(pages, vec![Page::default()]);
    }

    #[tokio::test]
    async fn lookups_return_record_or_null() {
        let dispatcher = ToolDispatcher::new(sample());

        let found = dispatcher
            .dispatch("get-food-by-ean13", &args(json!({ "ean_13": "4006381333931" })))
            .await
            .expect("lookup should succeed");
        assert_eq!(found["id"], "fd_002");
        assert!(found.get("labels").is_some_and(Value::is_null));

        let missing = dispatcher
            .dispatch("get-food-by-id", &args(json!({ "id": "fd_999" })))
            .await
            .expect("lookup should succeed");
        assert!(missing.is_null());
    }

    #[tokio::test]
    async fn unknown_operation_is_checked_before_arguments() {
        let dispatcher = ToolDispatcher::new(sample());
        let err = dispatcher
            .dispatch("delete-food", &args(json!({ "id": "xyz123" })))
            .await
            .expect_err("unknown operation should fail");
        assert_eq!(err.kind(), ToolErrorKind::UnknownOperation);
        assert_eq!(
            err.envelope(),
            json!({ "kind": "unknown-operation", "message": "unknown operation: delete-food" })
        );
    }

    #[tokio::test]
    async fn validation_errors_never_reach_the_store() {
        let dispatcher = ToolDispatcher::new(disconnected());
        let err = dispatcher
            .dispatch("get-food-by-id", &args(json!({ "id": "xyz123" })))
            .await
            .expect_err("bad id should fail");
        assert_eq!(err.kind(), ToolErrorKind::Validation);
        assert_eq!(err.envelope()["kind"], "validation");
    }

    #[tokio::test]
    async fn store_failures_are_infrastructure_errors() {
        let dispatcher = ToolDispatcher::new(disconnected());
        let err = dispatcher
            .dispatch("get-foods", &args(json!({})))
            .await
            .expect_err("failing store should fail");
        assert_eq!(err.kind(), ToolErrorKind::Infrastructure);
        assert_eq!(err.envelope()["kind"], "infrastructure");
    }

    #[test]
    fn store_input_errors_map_to_validation() {
        let rejected = ControlError::Store(StoreError::InvalidInput("no terms".to_string()));
        assert_eq!(ToolError::from(rejected).kind(), ToolErrorKind::Validation);
        let missing = ControlError::InvalidInput("page must be a positive integer".to_string());
        assert_eq!(ToolError::from(missing).kind(), ToolErrorKind::Validation);
    }
}
