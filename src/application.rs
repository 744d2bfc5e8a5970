// アプリケーション層
// ユースケースを調整し、ドメインモデルとポートを組み合わせる

pub mod error;
pub mod service;

pub use error::ApplicationError;
pub use service::{
    AuthApplicationService, PickupPointApplicationService, ProductApplicationService,
    ReceptionApplicationService,
};
