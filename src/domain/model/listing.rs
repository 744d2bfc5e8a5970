use crate::domain::error::DomainError;
use crate::domain::model::{PickupPoint, Product, Reception};
use chrono::{DateTime, Utc};

/// 登録日時による絞り込み期間
/// 両端とも含む。指定されない側は無制限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistrationPeriod {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl RegistrationPeriod {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// クエリ文字列から期間を作成
    /// RFC3339として解釈できない値は無視し、その側の絞り込みを行わない
    pub fn parse_lenient(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start: start.and_then(parse_timestamp),
            end: end.and_then(parse_timestamp),
        }
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// 指定日時が期間内かどうか
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// ページング指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 30;

    /// ページング指定を作成
    /// バリデーション:
    /// - pageは1以上
    /// - limitは1以上MAX_LIMIT以下
    ///
    /// # Arguments
    /// * `page` - ページ番号（省略時は1）
    /// * `limit` - 1ページの件数（省略時は10）
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, DomainError> {
        let page = page.unwrap_or(Self::DEFAULT_PAGE as i64);
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT as i64);

        if page < 1 || page > u32::MAX as i64 {
            return Err(DomainError::InvalidValue(format!(
                "page must be at least 1, got {}",
                page
            )));
        }
        if limit < 1 || limit > Self::MAX_LIMIT as i64 {
            return Err(DomainError::InvalidValue(format!(
                "limit must be between 1 and {}, got {}",
                Self::MAX_LIMIT,
                limit
            )));
        }

        Ok(Self {
            page: page as u32,
            limit: limit as u32,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// 読み飛ばす件数 = (page - 1) * limit
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// 受付とその商品（新しい順）
#[derive(Debug, Clone, PartialEq)]
pub struct ReceptionOverview {
    pub reception: Reception,
    pub products: Vec<Product>,
}

/// 受付ポイントとその受付一覧（新しい順）
#[derive(Debug, Clone, PartialEq)]
pub struct PickupPointOverview {
    pub pickup_point: PickupPoint,
    pub receptions: Vec<ReceptionOverview>,
}

/// 一覧取得の結果
#[derive(Debug, Clone, PartialEq)]
pub struct PickupPointPage {
    /// 絞り込み条件に一致する全件数
    pub total: u64,
    pub items: Vec<PickupPointOverview>,
}
