// 駆動される側アダプター（リポジトリ実装など）

mod bcrypt_password_hasher;
mod in_memory_store;
mod jwt_token_service;
mod pickup_point_repository;
mod product_repository;
mod reception_repository;
mod user_repository;

pub use bcrypt_password_hasher::BcryptPasswordHasher;
pub use in_memory_store::InMemoryStore;
pub use jwt_token_service::JwtTokenService;
pub use pickup_point_repository::PostgresPickupPointRepository;
pub use product_repository::PostgresProductRepository;
pub use reception_repository::PostgresReceptionRepository;
pub use user_repository::PostgresUserRepository;
