use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// Extracts the authenticated user from request extensions.
///
/// This extractor is intended to be used on routes protected by `AuthMiddleware`,
/// which is responsible for validating the bearer token, resolving it to a user
/// row, and inserting that user into request extensions.
///
/// If no user is found in the extensions (e.g., if `AuthMiddleware` did not run),
/// this extractor returns an `AppError::Unauthorized` error.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => {
                // This case should not be reached if AuthMiddleware is correctly
                // applied. Responding with Unauthorized is a safe default.
                let err =
                    AppError::Unauthorized("Could not validate credentials".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
