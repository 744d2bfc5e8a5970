// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{
    Email, PickupPoint, Principal, Product, ProductId, PvzId, Reception, ReceptionId,
    RegistrationPeriod, UserAccount,
};
use async_trait::async_trait;

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// 操作に失敗
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    /// データの取得に失敗
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
    /// 一意制約違反
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    /// 外部キー制約違反
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

/// 受付ポイントリポジトリトレイト
#[async_trait]
pub trait PickupPointRepository: Send + Sync {
    /// 受付ポイントを保存する
    async fn save(&self, pickup_point: &PickupPoint) -> Result<(), RepositoryError>;

    /// 期間に一致する受付ポイントの件数を数える
    async fn count(&self, period: &RegistrationPeriod) -> Result<u64, RepositoryError>;

    /// 期間に一致する受付ポイントを1ページ分取得する
    /// 登録日時の降順で並べて返す
    ///
    /// # Arguments
    /// * `period` - 登録日時の絞り込み期間
    /// * `offset` - 読み飛ばす件数
    /// * `limit` - 取得する最大件数
    async fn find_page(
        &self,
        period: &RegistrationPeriod,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<PickupPoint>, RepositoryError>;
}

/// 受付リポジトリトレイト
/// 受付の状態遷移はすべて条件付きの単一書き込みとして実装する
#[async_trait]
pub trait ReceptionRepository: Send + Sync {
    /// 開いている受付を追加する
    ///
    /// # Returns
    /// * `Err(RepositoryError::UniqueViolation)` - 同じ受付ポイントに開いている受付が既にある
    /// * `Err(RepositoryError::ForeignKeyViolation)` - 受付ポイントが存在しない
    async fn insert_open(&self, reception: &Reception) -> Result<(), RepositoryError>;

    /// 受付ポイントの開いている受付を取得する
    /// 複数ある場合は最も新しいもの
    ///
    /// # Returns
    /// * `Ok(Some(Reception))` - 開いている受付が見つかった
    /// * `Ok(None)` - 開いている受付がない
    async fn find_open_by_point(&self, pvz_id: PvzId)
        -> Result<Option<Reception>, RepositoryError>;

    /// 受付を閉じる
    /// ステータスがInProgressの場合のみ更新する
    ///
    /// # Returns
    /// * `Ok(Some(Reception))` - 閉じた後の受付
    /// * `Ok(None)` - 既に閉じられていた（並行する呼び出しに先を越された）
    async fn close(&self, reception_id: ReceptionId) -> Result<Option<Reception>, RepositoryError>;

    /// 受付ポイントのすべての受付を開始日時の降順で取得する
    async fn find_by_point(&self, pvz_id: PvzId) -> Result<Vec<Reception>, RepositoryError>;
}

/// 商品リポジトリトレイト
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 受付が開いている場合のみ商品を追加する
    ///
    /// # Returns
    /// * `Ok(true)` - 追加成功
    /// * `Ok(false)` - 受付が既に閉じられていた
    async fn insert_into_open(&self, product: &Product) -> Result<bool, RepositoryError>;

    /// 受付で最後に追加された商品を取得する
    async fn find_last_by_reception(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Option<Product>, RepositoryError>;

    /// 受付が開いている場合のみ商品を削除する
    ///
    /// # Returns
    /// * `Ok(true)` - 1件削除した
    /// * `Ok(false)` - 削除対象がなかった
    async fn delete(
        &self,
        product_id: ProductId,
        reception_id: ReceptionId,
    ) -> Result<bool, RepositoryError>;

    /// 受付のすべての商品を追加日時の降順で取得する
    async fn find_by_reception(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Vec<Product>, RepositoryError>;
}

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError>;

    /// ユーザーを追加する
    /// メールアドレスが重複する場合は`UniqueViolation`
    async fn insert(&self, user: &UserAccount) -> Result<(), RepositoryError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, RepositoryError>;
}

/// トークンエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token expired")]
    Expired,
    #[error("failed to issue token: {0}")]
    IssueFailed(String),
}

/// 認証トークンの発行と検証を行うポート
pub trait TokenService: Send + Sync {
    /// 呼び出し元を表すトークンを発行する
    fn issue(&self, principal: &Principal) -> Result<String, TokenError>;

    /// トークンを検証し、呼び出し元を復元する
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
}

/// パスワードハッシュエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("failed to hash password: {0}")]
    HashFailed(String),
    #[error("failed to verify password: {0}")]
    VerifyFailed(String),
}

/// パスワードのハッシュ化と照合を行うポート
/// CPUを占有するため、非同期コンテキストからはブロッキングタスクとして呼び出す
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
