use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, HttpRequest};
use uuid::Uuid;

use super::jwt::validate_token;
use super::model::{Claims, User};
use super::store::UserStore;

/// Extract token from Authorization header.
fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Validate token from HttpRequest and return claims.
pub fn validate_request_token(req: &HttpRequest) -> Result<Claims, Error> {
    let token =
        extract_token(req).ok_or_else(|| ErrorUnauthorized("Missing authorization token"))?;

    let claims = validate_token(&token).map_err(|e| {
        log::warn!("Token validation failed: {:?}", e);
        ErrorUnauthorized("Invalid or expired token")
    })?;

    Ok(claims)
}

/// Resolve the authenticated user for a request, or fail with 401.
pub fn require_actor(req: &HttpRequest, users: &UserStore) -> Result<User, Error> {
    let claims = validate_request_token(req)?;
    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ErrorUnauthorized("Invalid token subject"))?;
    users
        .get_by_id(&id)
        .ok_or_else(|| ErrorUnauthorized("Unknown user"))
}

/// Resolve the authenticated user if the request carries a valid token.
///
/// Endpoints that allow guests use this: a missing or bad token is not an
/// error, it just means the caller is a guest.
pub fn optional_actor(req: &HttpRequest, users: &UserStore) -> Option<User> {
    let claims = validate_request_token(req).ok()?;
    let id = Uuid::parse_str(&claims.sub).ok()?;
    users.get_by_id(&id)
}
