use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::adapter::driver::auth::AuthenticatedPrincipal;
use crate::adapter::driver::request_dto::{
    AddProductRequest, CreatePickupPointRequest, CreateReceptionRequest, DummyLoginRequest,
    LoginRequest, PickupPointsQueryParams, RegisterRequest,
};
use crate::adapter::driver::response_dto::{
    PickupPointResponse, PickupPointWithReceptionsResponse, ProductResponse, ReceptionResponse,
    TokenResponse, UserResponse,
};
use crate::application::service::{
    AuthApplicationService, PickupPointApplicationService, ProductApplicationService,
    ReceptionApplicationService,
};
use crate::application::ApplicationError;
use crate::domain::error::ErrorKind;
use crate::domain::model::{City, Pagination, ProductType, PvzId, RegistrationPeriod, Role};
use crate::domain::port::{
    PasswordHasher, PickupPointRepository, ProductRepository, ReceptionRepository, TokenService,
    UserRepository,
};

/// 総件数を返すヘッダー
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub code: String,
}

pub type ApiFailure = (StatusCode, Json<ApiError>);

// アプリケーションサービスを含む状態
#[derive(Clone)]
pub struct AppState {
    pub pickup_point_service: Arc<PickupPointApplicationService>,
    pub reception_service: Arc<ReceptionApplicationService>,
    pub product_service: Arc<ProductApplicationService>,
    pub auth_service: Arc<AuthApplicationService>,
}

impl AppState {
    /// ポートの実装からすべてのアプリケーションサービスを組み立てる
    pub fn new(
        pickup_point_repository: Arc<dyn PickupPointRepository>,
        reception_repository: Arc<dyn ReceptionRepository>,
        product_repository: Arc<dyn ProductRepository>,
        user_repository: Arc<dyn UserRepository>,
        token_service: Arc<dyn TokenService>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            pickup_point_service: Arc::new(PickupPointApplicationService::new(
                pickup_point_repository,
                reception_repository.clone(),
                product_repository.clone(),
            )),
            reception_service: Arc::new(ReceptionApplicationService::new(
                reception_repository.clone(),
            )),
            product_service: Arc::new(ProductApplicationService::new(
                reception_repository,
                product_repository,
            )),
            auth_service: Arc::new(AuthApplicationService::new(
                user_repository,
                token_service,
                password_hasher,
            )),
        }
    }
}

// REST APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dummyLogin", post(dummy_login))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/pvz", post(create_pickup_point).get(list_pickup_points))
        .route(
            "/pvz/:pvz_id/close_last_reception",
            post(close_last_reception),
        )
        .route("/pvz/:pvz_id/delete_last_product", post(delete_last_product))
        .route("/receptions", post(open_reception))
        .route("/products", post(add_product))
        .with_state(state)
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "pvz-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn bad_request(message: impl Into<String>) -> ApiFailure {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            message: message.into(),
            code: "VALIDATION_ERROR".to_string(),
        }),
    )
}

fn parse_role(raw: &str) -> Result<Role, ApiFailure> {
    Role::from_string(raw).map_err(|e| map_application_error(e.into()))
}

// ダミーログインエンドポイント
async fn dummy_login(
    State(state): State<AppState>,
    body: Result<Json<DummyLoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiFailure> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let role = parse_role(&request.role)?;

    let token = state
        .auth_service
        .dummy_login(role)
        .map_err(map_application_error)?;
    Ok(Json(TokenResponse { token }))
}

// ユーザー登録エンドポイント
async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiFailure> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let role = parse_role(&request.role)?;

    let user = state
        .auth_service
        .register(&request.email, &request.password, role)
        .await
        .map_err(map_application_error)?;
    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

// ログインエンドポイント
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiFailure> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;

    let token = state
        .auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(map_application_error)?;
    Ok(Json(TokenResponse { token }))
}

// 受付ポイント登録エンドポイント
async fn create_pickup_point(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    body: Result<Json<CreatePickupPointRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PickupPointResponse>), ApiFailure> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let city = City::from_string(&request.city).map_err(|e| map_application_error(e.into()))?;

    let pickup_point = state
        .pickup_point_service
        .create_pickup_point(&principal, city)
        .await
        .map_err(map_application_error)?;
    Ok((
        StatusCode::CREATED,
        Json(PickupPointResponse::from_pickup_point(&pickup_point)),
    ))
}

// 受付ポイント一覧取得エンドポイント
async fn list_pickup_points(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    query: Result<Query<PickupPointsQueryParams>, QueryRejection>,
) -> Result<
    (
        [(&'static str, String); 1],
        Json<Vec<PickupPointWithReceptionsResponse>>,
    ),
    ApiFailure,
> {
    let Query(params) = query.map_err(|_| bad_request("invalid query parameters"))?;
    let period =
        RegistrationPeriod::parse_lenient(params.start_date.as_deref(), params.end_date.as_deref());
    let pagination =
        Pagination::new(params.page, params.limit).map_err(|e| map_application_error(e.into()))?;

    let page = state
        .pickup_point_service
        .list_pickup_points(&principal, period, pagination)
        .await
        .map_err(map_application_error)?;

    let response = page
        .items
        .iter()
        .map(PickupPointWithReceptionsResponse::from_overview)
        .collect();
    Ok(([(TOTAL_COUNT_HEADER, page.total.to_string())], Json(response)))
}

// 受付開始エンドポイント
async fn open_reception(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    body: Result<Json<CreateReceptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReceptionResponse>), ApiFailure> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let pvz_id = PvzId::parse(&request.pvz_id).map_err(|e| map_application_error(e.into()))?;

    let reception = state
        .reception_service
        .open_reception(&principal, pvz_id)
        .await
        .map_err(map_application_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ReceptionResponse::from_reception(&reception)),
    ))
}

// 受付終了エンドポイント
async fn close_last_reception(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(pvz_id): Path<String>,
) -> Result<Json<ReceptionResponse>, ApiFailure> {
    let pvz_id = PvzId::parse(&pvz_id).map_err(|e| map_application_error(e.into()))?;

    let reception = state
        .reception_service
        .close_last_reception(&principal, pvz_id)
        .await
        .map_err(map_application_error)?;
    Ok(Json(ReceptionResponse::from_reception(&reception)))
}

// 商品追加エンドポイント
async fn add_product(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    body: Result<Json<AddProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiFailure> {
    let Json(request) = body.map_err(|e| bad_request(e.body_text()))?;
    let pvz_id = PvzId::parse(&request.pvz_id).map_err(|e| map_application_error(e.into()))?;
    let product_type = ProductType::from_string(&request.product_type)
        .map_err(|e| map_application_error(e.into()))?;

    let product = state
        .product_service
        .add_product(&principal, pvz_id, product_type)
        .await
        .map_err(map_application_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::from_product(&product)),
    ))
}

// 最後の商品の削除エンドポイント
async fn delete_last_product(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(pvz_id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    let pvz_id = PvzId::parse(&pvz_id).map_err(|e| map_application_error(e.into()))?;

    state
        .product_service
        .delete_last_product(&principal, pvz_id)
        .await
        .map_err(map_application_error)?;
    Ok(StatusCode::OK)
}

// アプリケーションエラーをHTTPエラーにマッピング
// 内部エラーの詳細はログにのみ出力する
pub(crate) fn map_application_error(err: ApplicationError) -> ApiFailure {
    let kind = err.kind();
    let (status, code) = match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Conflict => (StatusCode::BAD_REQUEST, "CONFLICT"),
        ErrorKind::NotFound => (StatusCode::BAD_REQUEST, "NOT_FOUND"),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    let message = match err {
        ApplicationError::DomainError(domain_err) => domain_err.to_string(),
        other => {
            error!(error = %other, "request failed with internal error");
            "internal server error".to_string()
        }
    };

    (
        status,
        Json(ApiError {
            message,
            code: code.to_string(),
        }),
    )
}

#[cfg(test)]
mod error_handling_tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::domain::port::RepositoryError;

    #[test]
    fn test_conflict_and_not_found_are_bad_request() {
        let (status, Json(api_error)) =
            map_application_error(DomainError::ReceptionAlreadyOpen.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.code, "CONFLICT");
        assert_eq!(
            api_error.message,
            "pickup point already has an unclosed reception"
        );

        let (status, Json(api_error)) =
            map_application_error(DomainError::NoProductsToDelete.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.code, "NOT_FOUND");
    }

    #[test]
    fn test_forbidden_and_unauthorized() {
        let (status, _) =
            map_application_error(DomainError::Forbidden("only moderator".to_string()).into());
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = map_application_error(DomainError::InvalidCredentials.into());
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let (status, Json(api_error)) = map_application_error(
            RepositoryError::OperationFailed("relation \"pvz\" does not exist".to_string()).into(),
        );

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "internal server error");
        assert!(!api_error.message.contains("pvz"));
    }
}
