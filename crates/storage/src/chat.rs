//! Community chat feed persistence.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::ChatMessage;

/// Insert a chat message. System rows (`is_system = true`) are engine
/// mirrors, not user posts, and carry no sender id.
pub async fn insert_message(
    pool: &SqlitePool,
    id: &str,
    neighborhood_id: Option<&str>,
    sender_id: Option<&str>,
    sender_name: &str,
    body: &str,
    is_system: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_messages (id, neighborhood_id, sender_id, sender_name, body, is_system)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(neighborhood_id)
    .bind(sender_id)
    .bind(sender_name)
    .bind(body)
    .bind(is_system)
    .execute(pool)
    .await?;

    Ok(())
}

/// List recent messages for a neighborhood, newest first.
pub async fn recent_messages(
    pool: &SqlitePool,
    neighborhood_id: &str,
    limit: i64,
) -> Result<Vec<ChatMessage>> {
    let messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, neighborhood_id, sender_id, sender_name, body, is_system, created_at
        FROM chat_messages
        WHERE neighborhood_id = ?
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(neighborhood_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
