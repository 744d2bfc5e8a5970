// ドメインモデル（エンティティと値オブジェクト）

mod listing;
mod pickup_point;
mod principal;
mod product;
mod reception;
mod user;
mod value_objects;

pub use value_objects::{
    City, Email, ProductId, ProductType, PvzId, ReceptionId, ReceptionStatus, Role, UserId,
};

pub use listing::{
    Pagination, PickupPointOverview, PickupPointPage, ReceptionOverview, RegistrationPeriod,
};
pub use pickup_point::PickupPoint;
pub use principal::Principal;
pub use product::Product;
pub use reception::Reception;
pub use user::UserAccount;
