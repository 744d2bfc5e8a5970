use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{Email, Principal, Role, UserAccount, UserId};
use crate::domain::port::{PasswordHasher, RepositoryError, TokenService, UserRepository};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// パスワードの最小文字数
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// 認証アプリケーションサービス
/// ユーザー登録、ログイン、トークンの検証を行う
pub struct AuthApplicationService {
    user_repository: Arc<dyn UserRepository>,
    token_service: Arc<dyn TokenService>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl AuthApplicationService {
    /// 新しい認証アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `user_repository` - ユーザーリポジトリ
    /// * `token_service` - トークンの発行・検証
    /// * `password_hasher` - パスワードのハッシュ化・照合
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_service: Arc<dyn TokenService>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            password_hasher,
        }
    }

    /// 資格情報の確認なしで指定ロールのトークンを発行する（テスト用）
    /// 毎回新しいランダムな主体IDを割り当てる
    #[instrument(skip(self))]
    pub fn dummy_login(&self, role: Role) -> Result<String, ApplicationError> {
        let principal = Principal::new(UserId::new(), role);
        let token = self.token_service.issue(&principal)?;
        Ok(token)
    }

    /// ユーザーを登録
    /// バリデーション:
    /// - メールアドレスの形式
    /// - パスワードはMIN_PASSWORD_LENGTH文字以上
    /// - メールアドレスが未登録
    ///
    /// # Returns
    /// * `Ok(UserAccount)` - 登録されたユーザー
    /// * `Err(ApplicationError)` - 入力不正、メールアドレス登録済み
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserAccount, ApplicationError> {
        let email = Email::new(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::InvalidValue(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ))
            .into());
        }

        if self.user_repository.exists_by_email(&email).await? {
            return Err(DomainError::EmailAlreadyRegistered.into());
        }

        let password_hash = self.hash_password(password.to_string()).await?;
        let user = UserAccount::register(email, role, password_hash);

        match self.user_repository.insert(&user).await {
            Ok(()) => {
                info!(user_id = %user.id(), role = %user.role(), "user registered");
                Ok(user)
            }
            Err(RepositoryError::UniqueViolation(_)) => {
                Err(DomainError::EmailAlreadyRegistered.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// メールアドレスとパスワードでログインし、トークンを発行する
    ///
    /// # Returns
    /// * `Ok(String)` - 発行されたトークン
    /// * `Err(ApplicationError)` - 資格情報が一致しない
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApplicationError> {
        let email = Email::new(email)?;

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("login attempt for unknown email");
                return Err(DomainError::InvalidCredentials.into());
            }
        };

        let matches = self
            .verify_password(password.to_string(), user.password_hash().to_string())
            .await?;
        if !matches {
            warn!(user_id = %user.id(), "login attempt with wrong password");
            return Err(DomainError::InvalidCredentials.into());
        }

        let principal = Principal::new(user.id(), user.role());
        let token = self.token_service.issue(&principal)?;
        info!(user_id = %user.id(), "user logged in");
        Ok(token)
    }

    /// トークンを検証し、呼び出し元を返す
    pub fn authenticate(&self, token: &str) -> Result<Principal, ApplicationError> {
        self.token_service
            .verify(token)
            .map_err(ApplicationError::from)
    }

    async fn hash_password(&self, password: String) -> Result<String, ApplicationError> {
        let hasher = Arc::clone(&self.password_hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ApplicationError::Internal(format!("hashing task failed: {}", e)))??;
        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: String,
        hash: String,
    ) -> Result<bool, ApplicationError> {
        let hasher = Arc::clone(&self.password_hasher);
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| ApplicationError::Internal(format!("verification task failed: {}", e)))??;
        Ok(matches)
    }
}
