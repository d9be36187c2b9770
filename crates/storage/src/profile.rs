//! Profile CRUD operations.
//!
//! Roster queries (`profiles_by_*`, `list_approved_profiles`) only return
//! approved rows; pending registrations never receive notifications.

use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::Profile;

/// Create a new profile.
pub async fn create_profile(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    phone: Option<&str>,
    role: &str,
    neighborhood_id: Option<&str>,
    approved: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, name, phone, role, neighborhood_id, approved)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(role)
    .bind(neighborhood_id)
    .bind(approved)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return StorageError::AlreadyExists {
                    entity: "Profile",
                    id: id.to_string(),
                };
            }
        }
        StorageError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a profile by ID.
pub async fn get_profile(pool: &SqlitePool, id: &str) -> Result<Profile> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, name, phone, role, neighborhood_id, approved, created_at
        FROM profiles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StorageError::NotFound {
        entity: "Profile",
        id: id.to_string(),
    })
}

/// List approved profiles in a neighborhood.
pub async fn profiles_by_neighborhood(
    pool: &SqlitePool,
    neighborhood_id: &str,
) -> Result<Vec<Profile>> {
    let profiles = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, name, phone, role, neighborhood_id, approved, created_at
        FROM profiles
        WHERE neighborhood_id = ? AND approved = 1
        ORDER BY name
        "#,
    )
    .bind(neighborhood_id)
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}

/// List approved profiles with the given role, optionally scoped to a
/// neighborhood.
pub async fn profiles_by_role(
    pool: &SqlitePool,
    role: &str,
    neighborhood_id: Option<&str>,
) -> Result<Vec<Profile>> {
    let profiles = match neighborhood_id {
        Some(hood) => {
            sqlx::query_as::<_, Profile>(
                r#"
                SELECT id, name, phone, role, neighborhood_id, approved, created_at
                FROM profiles
                WHERE role = ? AND neighborhood_id = ? AND approved = 1
                ORDER BY name
                "#,
            )
            .bind(role)
            .bind(hood)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Profile>(
                r#"
                SELECT id, name, phone, role, neighborhood_id, approved, created_at
                FROM profiles
                WHERE role = ? AND approved = 1
                ORDER BY name
                "#,
            )
            .bind(role)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(profiles)
}

/// List every approved profile system-wide.
pub async fn list_approved_profiles(pool: &SqlitePool) -> Result<Vec<Profile>> {
    let profiles = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, name, phone, role, neighborhood_id, approved, created_at
        FROM profiles
        WHERE approved = 1
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}

/// List pending (unapproved) profiles, newest first.
pub async fn list_pending_profiles(pool: &SqlitePool) -> Result<Vec<Profile>> {
    let profiles = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, name, phone, role, neighborhood_id, approved, created_at
        FROM profiles
        WHERE approved = 0
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}

/// Approve or revoke a profile.
pub async fn set_profile_approved(pool: &SqlitePool, id: &str, approved: bool) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET approved = ?
        WHERE id = ?
        "#,
    )
    .bind(approved)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound {
            entity: "Profile",
            id: id.to_string(),
        });
    }

    Ok(())
}
