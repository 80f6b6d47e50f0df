use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, LoginForm, TokenResponse, TokenService},
    error::AppError,
    models::SignupRequest,
    store,
};

/// Register a new user
///
/// Validates the payload (email format, password within bcrypt's 72-byte
/// limit), rejects already-registered emails, and persists the user with a
/// bcrypt-hashed password.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    signup_data.validate()?;

    // Check if email already exists. Not race-proof; the UNIQUE constraint
    // in the users table is the authoritative guard.
    let existing_user = store::users::find_by_email(&pool, &signup_data.email).await?;
    if existing_user.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&signup_data.password)?;

    store::users::insert(&pool, &signup_data.email, &password_hash).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User created successfully"
    })))
}

/// Login user
///
/// Accepts form-encoded credentials in the OAuth2 password-flow shape
/// (`username` carries the email) and returns a bearer access token.
///
/// An unknown email and a wrong password both produce the identical 401
/// response, so the two causes cannot be told apart by the caller.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let user = match store::users::find_by_email(&pool, &form.username).await? {
        Some(user) => user,
        None => {
            return Err(AppError::Unauthorized(
                "Incorrect username or password".into(),
            ))
        }
    };

    if !verify_password(&form.password, &user.hashed_password)? {
        return Err(AppError::Unauthorized(
            "Incorrect username or password".into(),
        ));
    }

    let access_token = tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}
