//! Alert persistence.

use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::Alert;

/// Insert a panic-button event row.
pub async fn insert_alert(
    pool: &SqlitePool,
    id: &str,
    kind: &str,
    actor_id: &str,
    actor_name: &str,
    neighborhood_id: Option<&str>,
    note: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO alerts (id, kind, actor_id, actor_name, neighborhood_id, note)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(kind)
    .bind(actor_id)
    .bind(actor_name)
    .bind(neighborhood_id)
    .bind(note)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get an alert by ID.
pub async fn get_alert(pool: &SqlitePool, id: &str) -> Result<Alert> {
    sqlx::query_as::<_, Alert>(
        r#"
        SELECT id, kind, actor_id, actor_name, neighborhood_id, note, status, created_at
        FROM alerts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StorageError::NotFound {
        entity: "Alert",
        id: id.to_string(),
    })
}

/// Update an alert's status ("open" or "resolved").
pub async fn set_alert_status(pool: &SqlitePool, id: &str, status: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE alerts
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
            entity: "Alert",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List recent alerts, newest first, optionally scoped to a neighborhood.
pub async fn recent_alerts(
    pool: &SqlitePool,
    neighborhood_id: Option<&str>,
    limit: i64,
) -> Result<Vec<Alert>> {
    let alerts = match neighborhood_id {
        Some(hood) => {
            sqlx::query_as::<_, Alert>(
                r#"
                SELECT id, kind, actor_id, actor_name, neighborhood_id, note, status, created_at
                FROM alerts
                WHERE neighborhood_id = ?
                ORDER BY created_at DESC
                LIMIT ?
                "#,
            )
            .bind(hood)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Alert>(
                r#"
                SELECT id, kind, actor_id, actor_name, neighborhood_id, note, status, created_at
                FROM alerts
                ORDER BY created_at DESC
                LIMIT ?
                "#,
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(alerts)
}
