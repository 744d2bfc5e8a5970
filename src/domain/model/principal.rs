use crate::domain::error::DomainError;
use crate::domain::model::{Role, UserId};

/// 認証済みの呼び出し元
/// リクエストごとに生成し、各サービス操作へ引数として渡す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    subject_id: UserId,
    role: Role,
}

impl Principal {
    pub fn new(subject_id: UserId, role: Role) -> Self {
        Self { subject_id, role }
    }

    pub fn subject_id(&self) -> UserId {
        self.subject_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// 呼び出し元が指定ロールであることを要求する
    ///
    /// # Arguments
    /// * `required` - 必要なロール
    /// * `action` - エラーメッセージに含める操作名
    pub fn require_role(&self, required: Role, action: &str) -> Result<(), DomainError> {
        if self.role == required {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "only {} can {}",
                required, action
            )))
        }
    }
}
