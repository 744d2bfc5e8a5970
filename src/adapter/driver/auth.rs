use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::Json,
};

use crate::adapter::driver::rest_api::{map_application_error, ApiError, ApiFailure, AppState};
use crate::domain::model::Principal;

/// `Authorization: Bearer <token>`から復元した呼び出し元
/// ハンドラーの引数に置くと、認証されていないリクエストは401で拒否される
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedPrincipal(pub Principal);

fn unauthorized(message: &str) -> ApiFailure {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiError {
            message: message.to_string(),
            code: "UNAUTHORIZED".to_string(),
        }),
    )
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiFailure> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("missing authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("malformed authorization header"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| unauthorized("malformed authorization header"))?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(unauthorized("malformed authorization header"));
    }
    Ok(token.trim())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedPrincipal {
    type Rejection = ApiFailure;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        state
            .auth_service
            .authenticate(token)
            .map(AuthenticatedPrincipal)
            .map_err(map_application_error)
    }
}
