//! Farm repository
//!
//! - create: single INSERT ... RETURNING, prediction included
//! - list: newest first, with total count in the same query

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Row, SqlitePool};

use crate::models::{City, FarmName, LocationField, Paginated, Pagination};

/// Farm record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Farm {
    pub id: i64,
    pub farm_name: String,
    pub city: Option<String>,
    pub farm_location: String,
    pub prediction: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for a new farm
#[derive(Debug, Clone)]
pub struct NewFarm {
    pub farm_name: FarmName,
    pub city: City,
    pub location: LocationField,
    pub prediction: Option<f64>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

const FARM_COLUMNS: &str = "id, farm_name, city, farm_location, prediction, created_at";

/// Farm repository
pub struct FarmRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FarmRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a farm and return the stored row.
    pub async fn create(&self, farm: &NewFarm) -> Result<Farm, DbError> {
        let sql = format!(
            "INSERT INTO farms (farm_name, city, farm_location, prediction, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {FARM_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Farm>(&sql)
            .bind(farm.farm_name.as_str())
            .bind(farm.city.as_deref())
            .bind(farm.location.as_str())
            .bind(farm.prediction)
            .bind(Utc::now())
            .fetch_one(self.pool)
            .await?;

        tracing::debug!(id = row.id, location = %row.farm_location, "farm created");
        Ok(row)
    }

    /// Get one farm by id.
    pub async fn get(&self, id: i64) -> Result<Farm, DbError> {
        let sql = format!("SELECT {FARM_COLUMNS} FROM farms WHERE id = ?");

        sqlx::query_as::<_, Farm>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// List farms newest first.
    ///
    /// Uses COUNT(*) OVER() so the page and the total come from one query.
    pub async fn list(&self, page: Pagination) -> Result<Paginated<Farm>, DbError> {
        let sql = format!(
            "SELECT {FARM_COLUMNS}, COUNT(*) OVER() AS total FROM farms \
             ORDER BY id DESC LIMIT ? OFFSET ?"
        );

        let rows = sqlx::query(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            // past the last page: the window count has no row to ride on
            None => self.count().await?,
        };

        let items = rows
            .iter()
            .map(Farm::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM farms")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Delete a farm.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM farms WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: i64) -> DbError {
    DbError::NotFound {
        resource: "farm",
        id: id.to_string(),
    }
}
