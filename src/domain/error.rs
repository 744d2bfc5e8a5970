use crate::domain::model::PvzId;

/// エラーの分類
/// APIレイヤーはこの分類だけを見てHTTPステータスを決める
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力値の形式・範囲が不正
    Validation,
    /// 不変条件違反（既に開いている受付がある等）
    Conflict,
    /// 参照先が存在しない（開いている受付がない等）
    NotFound,
    /// ロール不一致
    Forbidden,
    /// 認証されていない
    Unauthorized,
    /// ストレージ障害など
    Internal,
}

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// 無効な値（例: 未知の都市、未知の商品種別）
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// ロールが操作に対して不足している
    #[error("Access denied: {0}")]
    Forbidden(String),
    /// 受付ポイントに未完了の受付が既に存在する
    #[error("pickup point already has an unclosed reception")]
    ReceptionAlreadyOpen,
    /// 受付が既に閉じられている
    #[error("reception already closed")]
    ReceptionAlreadyClosed,
    /// 受付ポイントに開いている受付がない
    #[error("no active reception for pickup point {0}")]
    NoActiveReception(PvzId),
    /// 削除できる商品がない
    #[error("no products to delete")]
    NoProductsToDelete,
    /// 受付ポイントが存在しない
    #[error("pickup point {0} does not exist")]
    UnknownPickupPoint(PvzId),
    /// メールアドレスが登録済み
    #[error("user with this email already exists")]
    EmailAlreadyRegistered,
    /// メールアドレスまたはパスワードが一致しない
    #[error("invalid credentials")]
    InvalidCredentials,
    /// トークンがない、または検証に失敗した
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

impl DomainError {
    /// エラーの分類を返す
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidValue(_)
            | DomainError::UnknownPickupPoint(_)
            | DomainError::EmailAlreadyRegistered => ErrorKind::Validation,
            DomainError::ReceptionAlreadyOpen | DomainError::ReceptionAlreadyClosed => {
                ErrorKind::Conflict
            }
            DomainError::NoActiveReception(_) | DomainError::NoProductsToDelete => {
                ErrorKind::NotFound
            }
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::InvalidCredentials | DomainError::Unauthenticated(_) => {
                ErrorKind::Unauthorized
            }
        }
    }
}
