//! Authentication middleware
//!
//! JWT authentication and role-based access control middleware

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::models::Role;

use crate::error::{AppError, AppResult, ErrorDetail, ErrorResponse};

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Guard for mutations that require the admin role
pub fn require_admin(user: &AuthUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}

/// Authentication middleware that validates JWT tokens.
/// Note: This middleware extracts and validates the JWT token from the
/// Authorization header. The actual token validation is done inline to
/// avoid state dependency issues.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    // Decode and validate JWT token
    // Get JWT secret from environment (fallback for middleware without state)
    let jwt_secret = std::env::var("RIM__JWT__SECRET")
        .or_else(|_| std::env::var("RIM_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    let claims = match decode_jwt(token, &jwt_secret) {
        Ok(claims) => claims,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    // Parse identity from claims
    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid user ID in token"),
    };

    let role = match Role::parse(&claims.role) {
        Some(role) => role,
        None => return unauthorized_response("Invalid role in token"),
    };

    // Create AuthUser and insert into request extensions
    let auth_user = AuthUser {
        user_id,
        username: claims.username,
        role,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Decode and validate JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        ok: false,
        message: message.to_string(),
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message_en: message.to_string(),
            message_id: "Tidak terautentikasi".to_string(),
            field: None,
            violations: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// Extractor for authenticated user.
/// Use this in handlers to get the current user.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let body = ErrorResponse {
                    ok: false,
                    message: "Authentication required".to_string(),
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message_en: "Authentication required".to_string(),
                        message_id: "Harus masuk terlebih dahulu".to_string(),
                        field: None,
                        violations: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(body))
            })
    }
}
