use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{City, PickupPoint, PvzId, RegistrationPeriod};
use crate::domain::port::{PickupPointRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct PickupPointRow {
    id: Uuid,
    registration_date: DateTime<Utc>,
    city: String,
}

impl PickupPointRow {
    fn into_domain(self) -> Result<PickupPoint, RepositoryError> {
        let city = City::from_string(&self.city).map_err(|e| {
            RepositoryError::FetchFailed(format!("都市の解析に失敗しました: {}", e))
        })?;
        Ok(PickupPoint::reconstruct(
            PvzId::from_uuid(self.id),
            self.registration_date,
            city,
        ))
    }
}

/// PostgreSQL受付ポイントリポジトリ
pub struct PostgresPickupPointRepository {
    pool: PgPool,
}

impl PostgresPickupPointRepository {
    /// 新しいPostgreSQL受付ポイントリポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - PostgreSQLコネクションプール
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PickupPointRepository for PostgresPickupPointRepository {
    async fn save(&self, pickup_point: &PickupPoint) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO pvz (id, registration_date, city) VALUES ($1, $2, $3)")
            .bind(pickup_point.id().as_uuid())
            .bind(pickup_point.registration_date())
            .bind(pickup_point.city().as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::classify(e, "受付ポイントの保存に失敗しました"))
            .map_err(RepositoryError::from)?;
        Ok(())
    }

    async fn count(&self, period: &RegistrationPeriod) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM pvz
            WHERE ($1::timestamptz IS NULL OR registration_date >= $1)
              AND ($2::timestamptz IS NULL OR registration_date <= $2)
            "#,
        )
        .bind(period.start())
        .bind(period.end())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "受付ポイント数の取得に失敗しました"))
        .map_err(RepositoryError::from)?;

        Ok(count.max(0) as u64)
    }

    async fn find_page(
        &self,
        period: &RegistrationPeriod,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<PickupPoint>, RepositoryError> {
        let rows: Vec<PickupPointRow> = sqlx::query_as(
            r#"
            SELECT id, registration_date, city FROM pvz
            WHERE ($1::timestamptz IS NULL OR registration_date >= $1)
              AND ($2::timestamptz IS NULL OR registration_date <= $2)
            ORDER BY registration_date DESC, id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(period.start())
        .bind(period.end())
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "受付ポイントの取得に失敗しました"))
        .map_err(RepositoryError::from)?;

        rows.into_iter().map(PickupPointRow::into_domain).collect()
    }
}
