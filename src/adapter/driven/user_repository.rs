use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Email, Role, UserAccount, UserId};
use crate::domain::port::{RepositoryError, UserRepository};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
}

impl UserRow {
    fn into_domain(self) -> Result<UserAccount, RepositoryError> {
        let email = Email::new(&self.email).map_err(|e| {
            RepositoryError::FetchFailed(format!("メールアドレスの解析に失敗しました: {}", e))
        })?;
        let role = Role::from_string(&self.role).map_err(|e| {
            RepositoryError::FetchFailed(format!("ロールの解析に失敗しました: {}", e))
        })?;
        Ok(UserAccount::reconstruct(
            UserId::from_uuid(self.id),
            email,
            role,
            self.password_hash,
        ))
    }
}

/// PostgreSQLユーザーリポジトリ
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::classify(e, "ユーザーの存在確認に失敗しました"))
            .map_err(RepositoryError::from)
    }

    async fn insert(&self, user: &UserAccount) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, $4)")
            .bind(user.id().as_uuid())
            .bind(user.email().as_str())
            .bind(user.password_hash())
            .bind(user.role().as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::classify(e, "ユーザーの登録に失敗しました"))
            .map_err(RepositoryError::from)?;
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, role FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "ユーザーの取得に失敗しました"))
        .map_err(RepositoryError::from)?;

        row.map(UserRow::into_domain).transpose()
    }
}
