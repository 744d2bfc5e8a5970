use crate::adapter::database_error::DatabaseError;
use sqlx::{Executor, PgPool};
use tracing::info;

// 適用順に並べる
const MIGRATIONS: [(&str, &str); 4] = [
    (
        "001_create_pvz_table",
        include_str!("../../migrations/001_create_pvz_table.sql"),
    ),
    (
        "002_create_reception_table",
        include_str!("../../migrations/002_create_reception_table.sql"),
    ),
    (
        "003_create_product_table",
        include_str!("../../migrations/003_create_product_table.sql"),
    ),
    (
        "004_create_users_table",
        include_str!("../../migrations/004_create_users_table.sql"),
    ),
];

/// データベースマイグレーションを管理する構造体
pub struct DatabaseMigration {
    pool: PgPool,
}

impl DatabaseMigration {
    /// 新しいDatabaseMigrationインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// マイグレーションを実行
    /// べき等性を保証（CREATE ... IF NOT EXISTS）
    /// 1ファイルに複数の文を含むため、プリペアドではない単純クエリとして送る
    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            info!(migration = name, "running migration");
            self.pool.execute(sql).await.map_err(|e| {
                DatabaseError::MigrationError(format!("Migration {} failed: {}", name, e))
            })?;
        }

        info!(count = MIGRATIONS.len(), "all migrations completed");
        Ok(())
    }
}
