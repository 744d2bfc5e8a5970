use serde::Deserialize;

/// ダミーログイン用のリクエストDTO
#[derive(Debug, Deserialize)]
pub struct DummyLoginRequest {
    pub role: String,
}

/// ユーザー登録用のリクエストDTO
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// ログイン用のリクエストDTO
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 受付ポイント登録用のリクエストDTO
#[derive(Debug, Deserialize)]
pub struct CreatePickupPointRequest {
    pub city: String,
}

/// 受付開始用のリクエストDTO
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceptionRequest {
    pub pvz_id: String,
}

/// 商品追加用のリクエストDTO
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    #[serde(rename = "type")]
    pub product_type: String,
    pub pvz_id: String,
}

/// 受付ポイント一覧取得用のクエリパラメータ
/// 日付は文字列のまま受け取り、解釈できない値は無視する
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointsQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
