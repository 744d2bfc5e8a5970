use crate::adapter::database_config::{env_or, ConfigError, DatabaseConfig};
use std::time::Duration;

/// HTTPサーバーの設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// 1リクエストの処理時間の上限
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_or("SERVER_PORT", 8080)?;
        let timeout_secs: u64 = env_or("SERVER_REQUEST_TIMEOUT_SECS", 15)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SERVER_REQUEST_TIMEOUT_SECS must be positive".to_string(),
            ));
        }
        Ok(Self {
            port,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// トークン発行とパスワードハッシュの設定
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expire_hours: i64,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret: String = env_or("JWT_SECRET", "secret-key".to_string())?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET must not be empty".to_string(),
            ));
        }

        let jwt_expire_hours: i64 = env_or("JWT_EXPIRE_HOURS", 24)?;
        if jwt_expire_hours <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_EXPIRE_HOURS must be positive".to_string(),
            ));
        }

        // bcryptが受け付けるコストは4..=31
        let bcrypt_cost: u32 = env_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                bcrypt_cost
            )));
        }

        Ok(Self {
            jwt_secret,
            jwt_expire_hours,
            bcrypt_cost,
        })
    }
}

/// アプリケーション全体の設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// 環境変数からすべての設定を読み取る
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
        })
    }
}
