use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// 受付ポイント（ПВЗ）の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PvzId(Uuid);

impl PvzId {
    /// 新しい一意のPvzIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから PvzId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からPvzIdを作成
    /// 空文字列とUUIDでない文字列は入力エラーとして扱う
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidValue(
                "missing pickup point id".to_string(),
            ));
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::InvalidValue(format!("invalid pickup point id: {}", s)))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for PvzId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for PvzId {
    fn default() -> Self {
        Self::new()
    }
}

/// 受付の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceptionId(Uuid);

impl ReceptionId {
    /// 新しい一意のReceptionIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから ReceptionId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ReceptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ReceptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// 商品の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// 新しい一意のProductIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから ProductId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// ユーザーの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// 新しい一意のUserIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから UserId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からUserIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// 受付ポイントを開設できる都市
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Moscow,
    SaintPetersburg,
    Kazan,
}

impl City {
    /// 文字列からCityを作成
    /// 正式名称に加えて英語表記も受け付ける
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s.trim() {
            "Москва" | "Moscow" => Ok(City::Moscow),
            "Санкт-Петербург" | "Saint Petersburg" => Ok(City::SaintPetersburg),
            "Казань" | "Kazan" => Ok(City::Kazan),
            other => Err(DomainError::InvalidValue(format!("unsupported city: {}", other))),
        }
    }

    /// 永続化・レスポンスで使う正式名称
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Moscow => "Москва",
            City::SaintPetersburg => "Санкт-Петербург",
            City::Kazan => "Казань",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 商品の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductType {
    Electronics,
    Clothes,
    Shoes,
}

impl ProductType {
    /// 文字列からProductTypeを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s.trim() {
            "электроника" | "electronics" => Ok(ProductType::Electronics),
            "одежда" | "clothes" => Ok(ProductType::Clothes),
            "обувь" | "shoes" => Ok(ProductType::Shoes),
            other => Err(DomainError::InvalidValue(format!(
                "unsupported product type: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Electronics => "электроника",
            ProductType::Clothes => "одежда",
            ProductType::Shoes => "обувь",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 受付のステータス
/// InProgress -> Closed の一方向のみ遷移する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceptionStatus {
    /// 受付中
    InProgress,
    /// 終了（終端状態）
    Closed,
}

impl ReceptionStatus {
    /// 文字列からReceptionStatusを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "in_progress" => Ok(ReceptionStatus::InProgress),
            "close" => Ok(ReceptionStatus::Closed),
            _ => Err(DomainError::InvalidValue(format!(
                "unknown reception status: {}",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::InProgress => "in_progress",
            ReceptionStatus::Closed => "close",
        }
    }
}

impl fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ユーザーのロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 受付ポイントの従業員
    Employee,
    /// モデレーター
    Moderator,
}

impl Role {
    /// 文字列からRoleを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "employee" => Ok(Role::Employee),
            "moderator" => Ok(Role::Moderator),
            _ => Err(DomainError::InvalidValue(format!("unknown role: {}", s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Moderator => "moderator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// メールアドレスを表す値オブジェクト
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// 新しいメールアドレスを作成
    /// バリデーション:
    /// - ローカル部とドメイン部が空でない
    /// - ドメイン部にドットを含む
    /// - 空白を含まない
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        if !Self::is_valid(value) {
            return Err(DomainError::InvalidValue(format!(
                "invalid email: {}",
                value
            )));
        }
        Ok(Self(value.to_lowercase()))
    }

    fn is_valid(value: &str) -> bool {
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
