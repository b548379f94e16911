//! Schema setup for the farm registry

use sqlx::SqlitePool;

/// Create tables and indexes if they don't exist yet.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running farm migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS farms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            farm_name TEXT NOT NULL CHECK (length(farm_name) BETWEEN 1 AND 50),
            city TEXT CHECK (city IS NULL OR length(city) <= 255),
            farm_location TEXT NOT NULL CHECK (length(farm_location) BETWEEN 1 AND 50),
            prediction REAL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_farms_location ON farms (farm_location)")
        .execute(pool)
        .await?;

    tracing::info!("Farm migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = create_memory_pool().await.unwrap();
        run(&pool).await.unwrap();
        run(&pool).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM farms")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn schema_rejects_empty_names() {
        let pool = create_memory_pool().await.unwrap();
        run(&pool).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO farms (farm_name, farm_location, created_at) VALUES ('', 'Loc1', '2026-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
