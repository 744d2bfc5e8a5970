use crate::domain::model::{City, PvzId};
use chrono::{DateTime, Utc};

/// 受付ポイント（ПВЗ）
/// 登録後は変更・削除されない
#[derive(Debug, Clone, PartialEq)]
pub struct PickupPoint {
    id: PvzId,
    registration_date: DateTime<Utc>,
    city: City,
}

impl PickupPoint {
    /// 新しい受付ポイントを登録
    pub fn register(city: City) -> Self {
        Self {
            id: PvzId::new(),
            registration_date: Utc::now(),
            city,
        }
    }

    /// データベースから取得したデータで受付ポイントを再構築
    pub fn reconstruct(id: PvzId, registration_date: DateTime<Utc>, city: City) -> Self {
        Self {
            id,
            registration_date,
            city,
        }
    }

    pub fn id(&self) -> PvzId {
        self.id
    }

    pub fn registration_date(&self) -> DateTime<Utc> {
        self.registration_date
    }

    pub fn city(&self) -> City {
        self.city
    }
}
