//! Neighborhood CRUD operations.

use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::Neighborhood;

/// Create a new neighborhood.
pub async fn create_neighborhood(pool: &SqlitePool, id: &str, name: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO neighborhoods (id, name)
        VALUES (?, ?)
        "#,
    )
    .bind(id)
    .bind(name)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return StorageError::AlreadyExists {
                    entity: "Neighborhood",
                    id: id.to_string(),
                };
            }
        }
        StorageError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a neighborhood by ID.
pub async fn get_neighborhood(pool: &SqlitePool, id: &str) -> Result<Neighborhood> {
    sqlx::query_as::<_, Neighborhood>(
        r#"
        SELECT id, name, created_at
        FROM neighborhoods
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StorageError::NotFound {
        entity: "Neighborhood",
        id: id.to_string(),
    })
}

/// Rename a neighborhood.
pub async fn rename_neighborhood(pool: &SqlitePool, id: &str, name: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE neighborhoods
        SET name = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound {
            entity: "Neighborhood",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all neighborhoods.
pub async fn list_neighborhoods(pool: &SqlitePool) -> Result<Vec<Neighborhood>> {
    let neighborhoods = sqlx::query_as::<_, Neighborhood>(
        r#"
        SELECT id, name, created_at
        FROM neighborhoods
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(neighborhoods)
}
