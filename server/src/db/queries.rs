//! Database Queries

use sqlx::PgPool;
use uuid::Uuid;

use super::models::User;

/// Find a user by ID.
pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Update the user's profile image path.
///
/// Returns `None` if no user row exists for `user_id`.
pub async fn update_profile_image(
    pool: &PgPool,
    user_id: Uuid,
    relative_path: &str,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET profile_image = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(relative_path)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
