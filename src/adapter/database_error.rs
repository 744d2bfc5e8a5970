use crate::domain::port::RepositoryError;

// PostgreSQLのSQLSTATE
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// データベースエラー型
/// データベース操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseError {
    /// データベース接続エラー
    ConnectionError(String),
    /// SQLクエリエラー
    QueryError(String),
    /// マイグレーションエラー
    MigrationError(String),
    /// 一意制約違反（制約名）
    UniqueViolation(String),
    /// 外部キー制約違反（制約名）
    ForeignKeyViolation(String),
}

impl DatabaseError {
    /// sqlxのエラーを分類する
    ///
    /// # Arguments
    /// * `err` - sqlxのエラー
    /// * `context` - 失敗した操作の説明
    pub fn classify(err: sqlx::Error, context: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                match db_err.code().as_deref() {
                    Some(UNIQUE_VIOLATION) => DatabaseError::UniqueViolation(constraint),
                    Some(FOREIGN_KEY_VIOLATION) => DatabaseError::ForeignKeyViolation(constraint),
                    _ => DatabaseError::QueryError(format!("{}: {}", context, err)),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DatabaseError::ConnectionError(format!("{}: {}", context, err)),
            _ => DatabaseError::QueryError(format!("{}: {}", context, err)),
        }
    }
}

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::ConnectionError(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::QueryError(msg) => write!(f, "Database query error: {}", msg),
            DatabaseError::MigrationError(msg) => write!(f, "Migration error: {}", msg),
            DatabaseError::UniqueViolation(name) => write!(f, "Unique violation: {}", name),
            DatabaseError::ForeignKeyViolation(name) => {
                write!(f, "Foreign key violation: {}", name)
            }
        }
    }
}

impl std::error::Error for DatabaseError {}

/// DatabaseErrorからRepositoryErrorへの変換
impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConnectionError(msg) => RepositoryError::ConnectionFailed(msg),
            DatabaseError::QueryError(msg) | DatabaseError::MigrationError(msg) => {
                RepositoryError::OperationFailed(msg)
            }
            DatabaseError::UniqueViolation(name) => RepositoryError::UniqueViolation(name),
            DatabaseError::ForeignKeyViolation(name) => RepositoryError::ForeignKeyViolation(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let err = DatabaseError::classify(sqlx::Error::PoolTimedOut, "insert reception");
        assert!(matches!(err, DatabaseError::ConnectionError(_)));
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_row_not_found_is_query_error() {
        let err = DatabaseError::classify(sqlx::Error::RowNotFound, "find pickup point");
        assert!(err.to_string().contains("find pickup point"));
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::OperationFailed(_)
        ));
    }

    #[test]
    fn test_constraint_violations_keep_their_kind() {
        assert_eq!(
            RepositoryError::from(DatabaseError::UniqueViolation(
                "reception_one_open_per_pvz".to_string()
            )),
            RepositoryError::UniqueViolation("reception_one_open_per_pvz".to_string())
        );
        assert_eq!(
            RepositoryError::from(DatabaseError::ForeignKeyViolation("fk".to_string())),
            RepositoryError::ForeignKeyViolation("fk".to_string())
        );
    }
}
