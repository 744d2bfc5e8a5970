use crate::domain::error::{DomainError, ErrorKind};
use crate::domain::port::{PasswordHashError, RepositoryError, TokenError};

/// アプリケーション層のエラー型
/// ドメインエラー、リポジトリエラー、内部エラーをラップする
#[derive(Debug)]
pub enum ApplicationError {
    /// ドメインエラー（ビジネスルール違反）
    DomainError(DomainError),
    /// リポジトリエラー（永続化の失敗）
    RepositoryError(RepositoryError),
    /// その他の内部エラー（トークン発行、ハッシュ計算、タスク実行の失敗など）
    Internal(String),
}

impl ApplicationError {
    /// エラーの分類
    /// ドメインエラー以外はすべて内部エラーとして扱う
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::DomainError(err) => err.kind(),
            ApplicationError::RepositoryError(_) | ApplicationError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl std::fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationError::DomainError(err) => write!(f, "Domain error: {}", err),
            ApplicationError::RepositoryError(err) => write!(f, "Repository error: {}", err),
            ApplicationError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApplicationError {}

// From実装でエラー変換を簡潔に
impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        ApplicationError::DomainError(err)
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        ApplicationError::RepositoryError(err)
    }
}

impl From<TokenError> for ApplicationError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(msg) => DomainError::Unauthenticated(msg).into(),
            TokenError::Expired => DomainError::Unauthenticated("token expired".to_string()).into(),
            TokenError::IssueFailed(msg) => ApplicationError::Internal(msg),
        }
    }
}

impl From<PasswordHashError> for ApplicationError {
    fn from(err: PasswordHashError) -> Self {
        ApplicationError::Internal(err.to_string())
    }
}
