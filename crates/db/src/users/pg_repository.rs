use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::users::models::User;
use crate::users::repositories::UserRepository;
use sentinel_common::error::{SentinelError, SentinelResult};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_user_row(row: PgRow) -> User {
        User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_id(&self, id: Uuid) -> SentinelResult<Option<User>> {
        let row = sqlx::query("select id, username, email, created_at from users where id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SentinelError::Database(e.to_string()))?;

        Ok(row.map(Self::map_user_row))
    }

    async fn create(&self, user: User) -> SentinelResult<User> {
        let row = sqlx::query(
            "insert into users (id, username, email, created_at) \
             values ($1, $2, $3, $4) \
             returning id, username, email, created_at",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        Ok(Self::map_user_row(row))
    }
}
