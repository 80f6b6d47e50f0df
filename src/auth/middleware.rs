use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::store;

/// Authentication middleware for all protected routes.
///
/// Extracts the bearer token from the `Authorization` header, verifies it
/// against the process-wide `TokenService`, then resolves the token subject
/// to a `User` row. The resolved user is inserted into request extensions
/// for the `CurrentUser` extractor.
///
/// Token verification and user resolution are deliberately two separate
/// failure points: a correctly signed token whose subject has since been
/// deleted passes verification and fails only at the lookup, with the same
/// 401 status.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Skip authentication for the health check and auth endpoints
        let path = req.path();
        if path == "/health" || path == "/api/signup" || path == "/api/login" {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned)
                .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

            let tokens = req
                .app_data::<web::Data<TokenService>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("TokenService not configured".into())
                })?;
            let pool = req.app_data::<web::Data<PgPool>>().cloned().ok_or_else(|| {
                AppError::InternalServerError("Database pool not configured".into())
            })?;

            let user_id = tokens.verify(&token)?;

            // Stateless verification passed; the subject may still be gone.
            let user = store::users::find_by_id(&pool, user_id)
                .await?
                .ok_or_else(|| {
                    AppError::Unauthorized("Could not validate credentials".into())
                })?;

            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}
