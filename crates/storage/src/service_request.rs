//! VIP service request persistence.

use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::ServiceRequest;

/// Insert a service request row.
pub async fn insert_service_request(
    pool: &SqlitePool,
    id: &str,
    resident_id: &str,
    resident_name: &str,
    neighborhood_id: &str,
    kind: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO service_requests (id, resident_id, resident_name, neighborhood_id, kind)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(resident_id)
    .bind(resident_name)
    .bind(neighborhood_id)
    .bind(kind)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update a service request's status ("pending" or "done").
pub async fn set_service_request_status(
    pool: &SqlitePool,
    id: &str,
    status: &str,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE service_requests
        SET status = ?
        WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound {
            entity: "ServiceRequest",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List pending requests, oldest first, optionally scoped to a neighborhood.
pub async fn pending_service_requests(
    pool: &SqlitePool,
    neighborhood_id: Option<&str>,
) -> Result<Vec<ServiceRequest>> {
    let requests = match neighborhood_id {
        Some(hood) => {
            sqlx::query_as::<_, ServiceRequest>(
                r#"
                SELECT id, resident_id, resident_name, neighborhood_id, kind, status, created_at
                FROM service_requests
                WHERE status = 'pending' AND neighborhood_id = ?
                ORDER BY created_at
                "#,
            )
            .bind(hood)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ServiceRequest>(
                r#"
                SELECT id, resident_id, resident_name, neighborhood_id, kind, status, created_at
                FROM service_requests
                WHERE status = 'pending'
                ORDER BY created_at
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(requests)
}
