// アプリケーションサービス
// 認可が必要な操作はすべて呼び出し元の`Principal`を引数で受け取る

mod auth_service;
mod pickup_point_service;
mod product_service;
mod reception_service;

pub use auth_service::AuthApplicationService;
pub use pickup_point_service::PickupPointApplicationService;
pub use product_service::ProductApplicationService;
pub use reception_service::ReceptionApplicationService;
