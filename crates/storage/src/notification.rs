//! Outbound notification ledger.

use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::NotificationRecord;

/// Record a fan-out. The body may be unknown at persist time (formatting
/// happens later); pass `None` and fill it in with [`mark_dispatched`].
pub async fn record_notification(
    pool: &SqlitePool,
    id: &str,
    kind: &str,
    body: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, kind, body)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(kind)
    .bind(body)
    .execute(pool)
    .await?;

    Ok(())
}

/// Append a completed fan-out in one shot, body and target count included.
/// Used by flows whose durable record lives in another table.
pub async fn record_dispatched(
    pool: &SqlitePool,
    id: &str,
    kind: &str,
    body: &str,
    target_count: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, kind, body, target_count)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(kind)
    .bind(body)
    .bind(target_count)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fill in the rendered body and target count after dispatch.
pub async fn mark_dispatched(
    pool: &SqlitePool,
    id: &str,
    body: &str,
    target_count: i64,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET body = ?, target_count = ?
        WHERE id = ?
        "#,
    )
    .bind(body)
    .bind(target_count)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound {
            entity: "Notification",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List recent ledger rows, newest first.
pub async fn recent_notifications(pool: &SqlitePool, limit: i64) -> Result<Vec<NotificationRecord>> {
    let records = sqlx::query_as::<_, NotificationRecord>(
        r#"
        SELECT id, kind, body, target_count, created_at
        FROM notifications
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(records)
}
