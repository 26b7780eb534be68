use std::{error::Error, fmt, sync::Arc};

use nutrition_store::models::FoodRow;
use nutrition_store::schema::TABLE_FOOD;
use surrealdb::{Connection, Surreal};

#[derive(Debug)]
pub enum StoreError {
    Surreal(Box<surrealdb::Error>),
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surreal(err) => write!(f, "SurrealDB error: {err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Surreal(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct SurrealFoodStore<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> Clone for SurrealFoodStore<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealFoodStore<C> {
    #[must_use]
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db: Arc::new(db),
        }
    }

    /// Upserts a batch of food rows in one round trip.
    ///
    /// # Errors
    /// Returns `StoreError` if any row lacks an id or the database write fails.
    pub async fn upsert_foods(&self, rows: Vec<FoodRow>) -> StoreResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        for row in &rows {
            ensure_non_empty(&row.food_id, "food_id")?;
        }
        let count = rows.len();
        let query = "FOR $row IN $rows { UPSERT type::thing($table, $row.food_id) CONTENT $row; };";
        self.db
            .query(query)
            .bind(("table", TABLE_FOOD))
            .bind(("rows", rows))
            .await?
            .check()?;
        Ok(count)
    }

    /// Fetches a food row by id.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn get_food(&self, food_id: &str) -> StoreResult<Option<FoodRow>> {
        let record: Option<FoodRow> = self.db.select((TABLE_FOOD, food_id)).await?;
        Ok(record)
    }

    /// Fetches the food row with the lowest id carrying the given EAN-13 barcode.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn get_food_by_ean13(&self, ean_13: &str) -> StoreResult<Option<FoodRow>> {
        let ean_13 = ean_13.to_string();
        let query = "SELECT * FROM food WHERE ean_13 = $ean_13 ORDER BY id LIMIT 1;";
        let mut response = self.db.query(query).bind(("ean_13", ean_13)).await?;
        let mut records: Vec<FoodRow> = response.take(0)?;
        Ok(records.pop())
    }

    /// Lists food rows in id order.
    ///
    /// # Errors
    /// Returns `StoreError` if the paging values are invalid or the database query fails.
    pub async fn list_foods(&self, limit: usize, start: usize) -> StoreResult<Vec<FoodRow>> {
        let limit = to_i64(limit, "limit")?;
        let start = to_i64(start, "start")?;
        let query = "SELECT * FROM food ORDER BY id LIMIT $limit START $start;";
        let mut response = self
            .db
            .query(query)
            .bind(("limit", limit))
            .bind(("start", start))
            .await?;
        let records: Vec<FoodRow> = response.take(0)?;
        Ok(records)
    }

    /// Lists food rows whose name index contains every term.
    ///
    /// Terms are matched as-is against the lowercased `search_text` column, so
    /// callers pass them already lowercased.
    ///
    /// # Errors
    /// Returns `StoreError` if no terms are given, the paging values are
    /// invalid, or the database query fails.
    pub async fn search_foods(
        &self,
        terms: &[String],
        limit: usize,
        start: usize,
    ) -> StoreResult<Vec<FoodRow>> {
        if terms.is_empty() {
            return Err(StoreError::InvalidInput(
                "at least one search term is required".to_string(),
            ));
        }
        let limit = to_i64(limit, "limit")?;
        let start = to_i64(start, "start")?;
        let query = build_search_query(terms.len());
        let mut request = self.db.query(query);
        for (index, term) in terms.iter().enumerate() {
            request = request.bind((format!("term{index}"), term.clone()));
        }
        let mut response = request
            .bind(("limit", limit))
            .bind(("start", start))
            .await?;
        let records: Vec<FoodRow> = response.take(0)?;
        Ok(records)
    }

    /// Counts stored food rows.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn count_foods(&self) -> StoreResult<u64> {
        let query = "SELECT count() FROM food GROUP ALL;";
        let mut response = self.db.query(query).await?;
        let rows: Vec<CountRow> = response.take(0)?;
        Ok(rows.first().map_or(0, |row| row.count))
    }
}

#[derive(serde::Deserialize)]
struct CountRow {
    count: u64,
}

fn ensure_non_empty(value: &str, field: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

fn to_i64(value: usize, field: &str) -> StoreResult<i64> {
    i64::try_from(value).map_err(|_| {
        StoreError::InvalidInput(format!("{field} exceeds supported range"))
    })
}

fn build_search_query(term_count: usize) -> String {
    let clauses = (0..term_count)
        .map(|index| format!("search_text CONTAINS $term{index}"))
        .collect::<Vec<_>>()
        .join(" AND ");
    format!("SELECT * FROM food WHERE {clauses} ORDER BY id LIMIT $limit START $start;")
}
