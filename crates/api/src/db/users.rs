//! User persistence in `PostgreSQL`.
//!
//! Queries are checked at runtime (`sqlx::query_as`) so the crate builds
//! without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use cake_maker_core::{AccessToken, Email, OrderId, UserId};

use super::{PgStore, RepositoryError, UserStore, sql_limit};
use crate::models::{NewUser, PasswordDigest, User};

/// Name Postgres gives the unique constraint on `cake_user.email`.
const EMAIL_CONSTRAINT: &str = "cake_user_email_key";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    password_hash: String,
    access_token: AccessToken,
    ordered_cakes: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            password_hash: PasswordDigest::new(row.password_hash),
            access_token: row.access_token,
            ordered_cakes: row.ordered_cakes.into_iter().map(OrderId::new).collect(),
            created_at: row.created_at,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> Result<Vec<User>, RepositoryError> {
    rows.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO cake_user (name, email, password_hash, access_token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, access_token, ordered_cakes, created_at
            ",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(&user.access_token)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
                && db_err.constraint() == Some(EMAIL_CONSTRAINT)
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    async fn list_users(&self, limit: usize) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_hash, access_token, ordered_cakes, created_at
            FROM cake_user
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(sql_limit(limit))
        .fetch_all(self.pool())
        .await?;

        into_users(rows)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_hash, access_token, ordered_cakes, created_at
            FROM cake_user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_hash, access_token, ordered_cakes, created_at
            FROM cake_user
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_hash, access_token, ordered_cakes, created_at
            FROM cake_user
            WHERE access_token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = ids.iter().map(UserId::as_uuid).collect();
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, password_hash, access_token, ordered_cakes, created_at
            FROM cake_user
            WHERE id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await?;

        into_users(rows)
    }

    async fn append_order(&self, user: UserId, order: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cake_user
            SET ordered_cakes = array_append(ordered_cakes, $2)
            WHERE id = $1 AND NOT ($2 = ANY(ordered_cakes))
            ",
        )
        .bind(user)
        .bind(order.as_uuid())
        .execute(self.pool())
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing updated: either already recorded, or no such user
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cake_user WHERE id = $1)")
                .bind(user)
                .fetch_one(self.pool())
                .await?;

        if exists {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}
