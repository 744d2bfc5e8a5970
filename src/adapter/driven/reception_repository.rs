use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{PvzId, Reception, ReceptionId, ReceptionStatus};
use crate::domain::port::{ReceptionRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ReceptionRow {
    id: Uuid,
    datetime: DateTime<Utc>,
    pvz_id: Uuid,
    status: String,
}

impl ReceptionRow {
    fn into_domain(self) -> Result<Reception, RepositoryError> {
        let status = ReceptionStatus::from_string(&self.status).map_err(|e| {
            RepositoryError::FetchFailed(format!("受付ステータスの解析に失敗しました: {}", e))
        })?;
        Ok(Reception::reconstruct(
            ReceptionId::from_uuid(self.id),
            self.datetime,
            PvzId::from_uuid(self.pvz_id),
            status,
        ))
    }
}

/// PostgreSQL受付リポジトリ
/// 状態遷移はステータスを条件に含む単一の文で行い、並行する書き込みと競合しない
pub struct PostgresReceptionRepository {
    pool: PgPool,
}

impl PostgresReceptionRepository {
    /// 新しいPostgreSQL受付リポジトリを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReceptionRepository for PostgresReceptionRepository {
    async fn insert_open(&self, reception: &Reception) -> Result<(), RepositoryError> {
        // reception_one_open_per_pvz 部分一意インデックスが同時オープンを拒否する
        sqlx::query(
            "INSERT INTO reception (id, datetime, pvz_id, status) VALUES ($1, $2, $3, $4)",
        )
        .bind(reception.id().as_uuid())
        .bind(reception.date_time())
        .bind(reception.pvz_id().as_uuid())
        .bind(ReceptionStatus::InProgress.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "受付の作成に失敗しました"))
        .map_err(RepositoryError::from)?;
        Ok(())
    }

    async fn find_open_by_point(
        &self,
        pvz_id: PvzId,
    ) -> Result<Option<Reception>, RepositoryError> {
        let row: Option<ReceptionRow> = sqlx::query_as(
            r#"
            SELECT id, datetime, pvz_id, status FROM reception
            WHERE pvz_id = $1 AND status = 'in_progress'
            ORDER BY datetime DESC
            LIMIT 1
            "#,
        )
        .bind(pvz_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "開いている受付の取得に失敗しました"))
        .map_err(RepositoryError::from)?;

        row.map(ReceptionRow::into_domain).transpose()
    }

    async fn close(&self, reception_id: ReceptionId) -> Result<Option<Reception>, RepositoryError> {
        let row: Option<ReceptionRow> = sqlx::query_as(
            r#"
            UPDATE reception SET status = 'close'
            WHERE id = $1 AND status = 'in_progress'
            RETURNING id, datetime, pvz_id, status
            "#,
        )
        .bind(reception_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "受付の終了に失敗しました"))
        .map_err(RepositoryError::from)?;

        row.map(ReceptionRow::into_domain).transpose()
    }

    async fn find_by_point(&self, pvz_id: PvzId) -> Result<Vec<Reception>, RepositoryError> {
        let rows: Vec<ReceptionRow> = sqlx::query_as(
            r#"
            SELECT id, datetime, pvz_id, status FROM reception
            WHERE pvz_id = $1
            ORDER BY datetime DESC
            "#,
        )
        .bind(pvz_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "受付一覧の取得に失敗しました"))
        .map_err(RepositoryError::from)?;

        rows.into_iter().map(ReceptionRow::into_domain).collect()
    }
}
