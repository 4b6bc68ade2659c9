use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::user::{Role, User},
};

/// The column list shared by every query that returns user rows.
const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        name: row.try_get("name").map_err(|_| AppError::MissingData("name".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|_| AppError::MissingData("password_hash".to_string()))?,
        role: row.try_get("role").map_err(|_| AppError::MissingData("role".to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|_| AppError::MissingData("created_at".to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|_| AppError::MissingData("updated_at".to_string()))?,
    })
}

/// Inserts a new user row.
///
/// Statements are prepared through the pool's per-connection cache, so
/// each distinct query is prepared once per connection, not per call.
pub async fn create_user(
    pool: &Pool,
    id: Uuid,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let client = pool.get().await?;
    let query = format!(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING {USER_COLUMNS}
        "#
    );
    let statement = client.prepare_cached(&query).await?;
    let row = client
        .query_one(&statement, &[&id, &name, &email, &password_hash])
        .await?;
    row_to_user(&row)
}

/// Finds a user by their email address.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let query = format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE email = $1
        "#
    );
    let statement = client.prepare_cached(&query).await?;
    let row = client.query_opt(&statement, &[&email]).await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Finds a user by their ID.
pub async fn find_by_id(pool: &Pool, user_id: &Uuid) -> Result<Option<User>> {
    let client = pool.get().await?;
    let query = format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1
        "#
    );
    let statement = client.prepare_cached(&query).await?;
    let row = client.query_opt(&statement, &[user_id]).await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Whether an email is already registered, optionally ignoring one user
/// (used when that user updates their own email).
pub async fn email_taken(pool: &Pool, email: &str, exclude: Option<Uuid>) -> Result<bool> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            ) AS taken
            "#,
        )
        .await?;
    let row = client.query_one(&statement, &[&email, &exclude]).await?;
    row.try_get("taken")
        .map_err(|_| AppError::MissingData("taken".to_string()))
}

/// Lists users, newest first.
pub async fn list_users(pool: &Pool, limit: i64, offset: i64) -> Result<Vec<User>> {
    let client = pool.get().await?;
    let query = format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#
    );
    let statement = client.prepare_cached(&query).await?;
    let rows = client.query(&statement, &[&limit, &offset]).await?;
    rows.iter().map(row_to_user).collect()
}

/// Applies a partial update to a user row and returns the updated row.
///
/// `None` fields keep their current value via `COALESCE`.
pub async fn update_user(
    pool: &Pool,
    user_id: &Uuid,
    name: Option<&str>,
    email: Option<&str>,
    password_hash: Option<&str>,
    role: Option<Role>,
) -> Result<User> {
    let client = pool.get().await?;
    let query = format!(
        r#"
        UPDATE users
        SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash),
            role = COALESCE($5, role),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    );
    let statement = client.prepare_cached(&query).await?;
    let row = client
        .query_opt(&statement, &[user_id, &name, &email, &password_hash, &role])
        .await?
        .ok_or(AppError::NotFound)?;
    row_to_user(&row)
}

/// Deletes a user row. Returns `NotFound` if no row matched.
pub async fn delete_user(pool: &Pool, user_id: &Uuid) -> Result<()> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached("DELETE FROM users WHERE id = $1")
        .await?;
    let deleted = client.execute(&statement, &[user_id]).await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
