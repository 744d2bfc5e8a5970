use crate::domain::model::{ProductId, ProductType, ReceptionId};
use chrono::{DateTime, Utc};

/// 商品エンティティ
/// 受付に追加順で積まれ、末尾からのみ削除される
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    date_time: DateTime<Utc>,
    product_type: ProductType,
    reception_id: ReceptionId,
}

impl Product {
    /// 受付に追加する新しい商品を作成
    pub fn new(reception_id: ReceptionId, product_type: ProductType) -> Self {
        Self {
            id: ProductId::new(),
            date_time: Utc::now(),
            product_type,
            reception_id,
        }
    }

    /// データベースから取得したデータで商品を再構築
    pub fn reconstruct(
        id: ProductId,
        date_time: DateTime<Utc>,
        product_type: ProductType,
        reception_id: ReceptionId,
    ) -> Self {
        Self {
            id,
            date_time,
            product_type,
            reception_id,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn date_time(&self) -> DateTime<Utc> {
        self.date_time
    }

    pub fn product_type(&self) -> ProductType {
        self.product_type
    }

    pub fn reception_id(&self) -> ReceptionId {
        self.reception_id
    }
}
