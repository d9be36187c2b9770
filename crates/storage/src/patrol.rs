//! Patrol check-in persistence.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::PatrolLog;

/// Insert a patrol check-in row.
pub async fn insert_patrol_log(
    pool: &SqlitePool,
    id: &str,
    operator_id: &str,
    operator_name: &str,
    neighborhood_id: Option<&str>,
    note: &str,
    target_resident_id: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO patrol_logs
            (id, operator_id, operator_name, neighborhood_id, note, target_resident_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(operator_id)
    .bind(operator_name)
    .bind(neighborhood_id)
    .bind(note)
    .bind(target_resident_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// List recent check-ins, newest first, optionally scoped to a neighborhood.
pub async fn recent_patrol_logs(
    pool: &SqlitePool,
    neighborhood_id: Option<&str>,
    limit: i64,
) -> Result<Vec<PatrolLog>> {
    let logs = match neighborhood_id {
        Some(hood) => {
            sqlx::query_as::<_, PatrolLog>(
                r#"
                SELECT id, operator_id, operator_name, neighborhood_id, note,
                       target_resident_id, created_at
                FROM patrol_logs
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
            sqlx::query_as::<_, PatrolLog>(
                r#"
                SELECT id, operator_id, operator_name, neighborhood_id, note,
                       target_resident_id, created_at
                FROM patrol_logs
                ORDER BY created_at DESC
                LIMIT ?
                "#,
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(logs)
}
