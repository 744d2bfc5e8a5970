use crate::domain::model::{Principal, Role, UserId};
use crate::domain::port::{TokenError, TokenService};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// トークンに含めるクレーム
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    user_id: String,
    role: Role,
    exp: i64,
    iat: i64,
}

/// HS256で署名するJWTトークンサービス
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expire: Duration,
}

impl JwtTokenService {
    /// # Arguments
    /// * `secret` - 署名鍵
    /// * `expire_hours` - トークンの有効時間
    pub fn new(secret: &str, expire_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            expire: Duration::hours(expire_hours),
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let now = Utc::now();
        let subject = principal.subject_id().to_string();
        let claims = Claims {
            sub: subject.clone(),
            user_id: subject,
            role: principal.role(),
            exp: (now + self.expire).timestamp(),
            iat: now.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::IssueFailed(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        let subject_id = UserId::from_string(&data.claims.user_id)
            .map_err(|e| TokenError::Invalid(format!("malformed user id: {}", e)))?;
        Ok(Principal::new(subject_id, data.claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let service = JwtTokenService::new("secret", 24);
        let principal = Principal::new(UserId::new(), Role::Employee);

        let token = service.issue(&principal).unwrap();

        assert_eq!(service.verify(&token).unwrap(), principal);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = JwtTokenService::new("secret", 24);
        let verifier = JwtTokenService::new("other-secret", 24);
        let token = issuer
            .issue(&Principal::new(UserId::new(), Role::Moderator))
            .unwrap();

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtTokenService::new("secret", 24);
        let past = Utc::now() - Duration::hours(2);
        let id = UserId::new().to_string();
        let claims = Claims {
            sub: id.clone(),
            user_id: id,
            role: Role::Employee,
            exp: past.timestamp(),
            iat: (past - Duration::hours(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_unknown_role_is_invalid() {
        let service = JwtTokenService::new("secret", 24);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({
                "sub": "x",
                "user_id": UserId::new().to_string(),
                "role": "admin",
                "exp": (Utc::now() + Duration::hours(1)).timestamp(),
                "iat": Utc::now().timestamp(),
            }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid(_))));
    }
}
