use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// データベース接続設定を管理する構造体
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub ssl_mode: String,
    pub max_connections: u32,
}

/// 設定エラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// 環境変数を読み取り、指定の型に変換する
/// 未設定の場合はデフォルト値を使用
pub(crate) fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

impl DatabaseConfig {
    /// 環境変数から設定を読み取る
    /// 環境変数が設定されていない場合はデフォルト値を使用
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("DB_HOST", "localhost".to_string())?,
            port: env_or("DB_PORT", 5432)?,
            database: env_or("DB_NAME", "pvz".to_string())?,
            username: env_or("DB_USER", "root".to_string())?,
            password: env_or("DB_PASSWORD", "password".to_string())?,
            ssl_mode: env_or("DB_SSLMODE", "disable".to_string())?,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
        })
    }

    /// PostgreSQL接続文字列を生成
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.username, self.password, self.host, self.port, self.database, self.ssl_mode
        )
    }
}
