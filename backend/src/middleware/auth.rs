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

use crate::error::{AppError, ErrorResponse};

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub role: Role,
    pub email: String,
}

impl AuthUser {
    /// Check if user's role may create, update, or delete records
    pub fn can_mutate(&self) -> bool {
        self.role.can_mutate()
    }

    /// Check if user's role may administer user accounts
    pub fn can_manage_users(&self) -> bool {
        self.role.can_manage_users()
    }
}

/// Authentication middleware that validates JWT tokens
/// Note: This middleware extracts and validates the JWT token from the Authorization header.
/// The actual token validation is done inline to avoid state dependency issues.
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
    let jwt_secret = std::env::var("HSM__JWT__SECRET")
        .or_else(|_| std::env::var("HSM_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    let claims = match decode_jwt(token, &jwt_secret) {
        Ok(claims) => claims,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    // Parse user ID and role from claims
    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid user ID in token"),
    };

    let role = match Role::parse(&claims.role) {
        Some(role) => role,
        None => return unauthorized_response("Invalid role in token"),
    };

    if !claims.status.eq_ignore_ascii_case("active") {
        return unauthorized_response("Account is disabled");
    }

    // Create AuthUser and insert into request extensions
    let auth_user = AuthUser {
        user_id,
        role,
        email: claims.email,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    role: String,
    name: String,
    email: String,
    status: String,
    exp: i64,
    iat: i64,
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
    let error = ErrorResponse {
        error: crate::error::ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
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
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

/// Role guard for mutating endpoints
/// Returns an error if the user's role has read-only access
pub fn require_mutation_access(user: &AuthUser) -> Result<(), AppError> {
    if user.can_mutate() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Your role has read-only access".to_string(),
        ))
    }
}

/// Role guard for user administration endpoints
pub fn require_user_management_access(user: &AuthUser) -> Result<(), AppError> {
    if user.can_manage_users() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "User administration requires the admin role".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(role: Role) -> AuthUser {
        AuthUser {
            user_id: uuid::Uuid::new_v4(),
            role,
            email: "user@school.test".to_string(),
        }
    }

    #[test]
    fn test_mutation_guard_by_role() {
        assert!(require_mutation_access(&auth_user(Role::Admin)).is_ok());
        assert!(require_mutation_access(&auth_user(Role::Manager)).is_ok());
        assert!(require_mutation_access(&auth_user(Role::Tutor)).is_err());
    }

    #[test]
    fn test_user_management_guard_is_admin_only() {
        assert!(require_user_management_access(&auth_user(Role::Admin)).is_ok());
        assert!(require_user_management_access(&auth_user(Role::Manager)).is_err());
        assert!(require_user_management_access(&auth_user(Role::Tutor)).is_err());
    }
}
