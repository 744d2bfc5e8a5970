// ドメイン層
// 外部に依存しないビジネスルールを置く

pub mod error;
pub mod model;
pub mod port;
