use crate::domain::model::{
    PickupPoint, PickupPointOverview, Product, Reception, ReceptionOverview, UserAccount,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// トークン用のレスポンスDTO
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// 登録ユーザー用のレスポンスDTO
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl UserResponse {
    pub fn from_user(user: &UserAccount) -> Self {
        Self {
            id: user.id().as_uuid(),
            email: user.email().to_string(),
            role: user.role().to_string(),
        }
    }
}

/// 受付ポイント用のレスポンスDTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointResponse {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub city: String,
}

impl PickupPointResponse {
    pub fn from_pickup_point(pickup_point: &PickupPoint) -> Self {
        Self {
            id: pickup_point.id().as_uuid(),
            registration_date: pickup_point.registration_date(),
            city: pickup_point.city().to_string(),
        }
    }
}

/// 受付用のレスポンスDTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionResponse {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub pvz_id: Uuid,
    pub status: String,
}

impl ReceptionResponse {
    pub fn from_reception(reception: &Reception) -> Self {
        Self {
            id: reception.id().as_uuid(),
            date_time: reception.date_time(),
            pvz_id: reception.pvz_id().as_uuid(),
            status: reception.status().to_string(),
        }
    }
}

/// 商品用のレスポンスDTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub product_type: String,
    pub reception_id: Uuid,
}

impl ProductResponse {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id().as_uuid(),
            date_time: product.date_time(),
            product_type: product.product_type().to_string(),
            reception_id: product.reception_id().as_uuid(),
        }
    }
}

/// 受付と商品一覧
#[derive(Debug, Serialize)]
pub struct ReceptionWithProductsResponse {
    pub reception: ReceptionResponse,
    pub products: Vec<ProductResponse>,
}

impl ReceptionWithProductsResponse {
    pub fn from_overview(overview: &ReceptionOverview) -> Self {
        Self {
            reception: ReceptionResponse::from_reception(&overview.reception),
            products: overview
                .products
                .iter()
                .map(ProductResponse::from_product)
                .collect(),
        }
    }
}

/// 一覧取得用のレスポンスDTO
/// 受付ポイントごとに受付と商品を入れ子で返す
#[derive(Debug, Serialize)]
pub struct PickupPointWithReceptionsResponse {
    pub pvz: PickupPointResponse,
    pub receptions: Vec<ReceptionWithProductsResponse>,
}

impl PickupPointWithReceptionsResponse {
    pub fn from_overview(overview: &PickupPointOverview) -> Self {
        Self {
            pvz: PickupPointResponse::from_pickup_point(&overview.pickup_point),
            receptions: overview
                .receptions
                .iter()
                .map(ReceptionWithProductsResponse::from_overview)
                .collect(),
        }
    }
}
