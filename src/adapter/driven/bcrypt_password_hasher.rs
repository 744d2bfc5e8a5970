use crate::domain::port::{PasswordHashError, PasswordHasher};

/// bcryptによるパスワードハッシュ
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// bcryptが受け付ける最小コスト（テスト用）
    pub const MIN_COST: u32 = 4;

    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordHashError::HashFailed(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        bcrypt::verify(password, hash).map_err(|e| PasswordHashError::VerifyFailed(e.to_string()))
    }
}
