use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Product, ProductId, ProductType, ReceptionId};
use crate::domain::port::{ProductRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    datetime: DateTime<Utc>,
    product_type: String,
    reception_id: Uuid,
}

impl ProductRow {
    fn into_domain(self) -> Result<Product, RepositoryError> {
        let product_type = ProductType::from_string(&self.product_type).map_err(|e| {
            RepositoryError::FetchFailed(format!("商品種別の解析に失敗しました: {}", e))
        })?;
        Ok(Product::reconstruct(
            ProductId::from_uuid(self.id),
            self.datetime,
            product_type,
            ReceptionId::from_uuid(self.reception_id),
        ))
    }
}

/// PostgreSQL商品リポジトリ
/// 「最後の商品」はdatetimeの降順、同時刻はseqの降順で決める
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// 新しいPostgreSQL商品リポジトリを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert_into_open(&self, product: &Product) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO product (id, datetime, type, reception_id)
            SELECT $1::uuid, $2::timestamptz, $3::text, $4::uuid
            WHERE EXISTS (
                SELECT 1 FROM reception WHERE id = $4::uuid AND status = 'in_progress'
            )
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.date_time())
        .bind(product.product_type().as_str())
        .bind(product.reception_id().as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "商品の追加に失敗しました"))
        .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_last_by_reception(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, datetime, type AS product_type, reception_id FROM product
            WHERE reception_id = $1
            ORDER BY datetime DESC, seq DESC
            LIMIT 1
            "#,
        )
        .bind(reception_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "最後の商品の取得に失敗しました"))
        .map_err(RepositoryError::from)?;

        row.map(ProductRow::into_domain).transpose()
    }

    async fn delete(
        &self,
        product_id: ProductId,
        reception_id: ReceptionId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM product
            WHERE id = $1 AND reception_id = $2
              AND EXISTS (
                  SELECT 1 FROM reception WHERE id = $2 AND status = 'in_progress'
              )
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(reception_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "商品の削除に失敗しました"))
        .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_reception(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, datetime, type AS product_type, reception_id FROM product
            WHERE reception_id = $1
            ORDER BY datetime DESC, seq DESC
            "#,
        )
        .bind(reception_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::classify(e, "商品一覧の取得に失敗しました"))
        .map_err(RepositoryError::from)?;

        rows.into_iter().map(ProductRow::into_domain).collect()
    }
}
