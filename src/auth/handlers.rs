use actix_web::{web, HttpResponse, Responder};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use uuid::Uuid;

use super::jwt::{generate_access_token, get_access_token_expiry};
use super::model::{LoginRequest, RegisterRequest, TokenResponse, User, UserInfo};
use crate::state::AppState;
use crate::ErrorResponse;

/// Register a new user account.
#[utoipa::path(
    context_path = "/api",
    tag = "Authentication",
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(state: web::Data<AppState>, body: web::Json<RegisterRequest>) -> impl Responder {
    let request = body.into_inner();
    if request.username.trim().is_empty() || request.password.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "Username and password must not be empty",
        ));
    }

    if state.users.find_by_username(&request.username).is_some() {
        return HttpResponse::Conflict().json(ErrorResponse::new(
            "Conflict",
            "Username already taken",
        ));
    }

    let password_hash = match hash(&request.password, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Failed to hash password: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Registration failed"));
        }
    };

    let user = User {
        id: Uuid::new_v4(),
        username: request.username,
        password_hash,
        created_at: Utc::now(),
    };
    let info: UserInfo = user.clone().into();
    state.users.insert(user);

    HttpResponse::Created().json(info)
}

/// Login endpoint.
#[utoipa::path(
    context_path = "/api",
    tag = "Authentication",
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    let user = match state.users.find_by_username(&body.username) {
        Some(user) => user,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse::new(
                "Unauthorized",
                "Invalid username or password",
            ));
        }
    };

    let password_valid = verify(&body.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return HttpResponse::Unauthorized().json(ErrorResponse::new(
            "Unauthorized",
            "Invalid username or password",
        ));
    }

    let access_token = match generate_access_token(&user.id.to_string(), &user.username) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to generate access token: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to generate token"));
        }
    };

    HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: get_access_token_expiry(),
    })
}
