use crate::domain::model::{Email, Role, UserId};

/// ユーザーアカウント
/// 登録時に作成され、以後変更されない
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    id: UserId,
    email: Email,
    role: Role,
    password_hash: String,
}

impl UserAccount {
    /// 新しいユーザーを作成
    /// パスワードはハッシュ済みの値を受け取る
    pub fn register(email: Email, role: Role, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            email,
            role,
            password_hash,
        }
    }

    /// データベースから取得したデータでユーザーを再構築
    pub fn reconstruct(id: UserId, email: Email, role: Role, password_hash: String) -> Self {
        Self {
            id,
            email,
            role,
            password_hash,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}
