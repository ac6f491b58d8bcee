use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use validator::Validate;

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse},
    entity::admin_profiles::{Column, Entity as AdminProfiles, Model as AdminModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::AdminProfile,
    response::ApiResponse,
    state::AppState,
};

pub const SESSION_HOURS: i64 = 12;

/// Emails are stored and looked up trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn issue_token(user: &AuthUser, secret: &str) -> AppResult<LoginResponse> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(SESSION_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.user_id.to_string(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(LoginResponse {
        token,
        expires_at: expiration.timestamp(),
    })
}

pub async fn login_admin(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    payload.validate()?;
    let LoginRequest { email, password } = payload;

    let admin = AdminProfiles::find()
        .filter(Column::Email.eq(normalize_email(&email)))
        .one(&state.orm)
        .await?;

    let admin = match admin {
        Some(a) => a,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&admin.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let user = AuthUser {
        user_id: admin.id,
        role: admin.role.clone(),
    };
    let login = issue_token(&user, &state.config.jwt_secret)?;
    tracing::info!(admin_id = %admin.id, "admin signed in");

    Ok(ApiResponse::success("Login success", login, None))
}

pub async fn current_admin(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminProfile>> {
    ensure_admin(user)?;
    let admin = AdminProfiles::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(ApiResponse::success("Admin profile", admin_from_entity(admin), None))
}

fn admin_from_entity(model: AdminModel) -> AdminProfile {
    AdminProfile {
        id: model.id,
        email: model.email,
        display_name: model.display_name,
        role: model.role,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
