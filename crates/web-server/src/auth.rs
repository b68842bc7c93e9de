use crate::error::AppError;
use crate::AppState;
use accounts::AccountError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// The authenticated user behind a request, extracted from the
/// `Authorization: Bearer <token>` header. Routes that take this extractor
/// reject unauthenticated requests before the handler body runs.
pub struct AuthUser {
    pub user_id: i64,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Account(AccountError::InvalidToken))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Account(AccountError::InvalidToken))?;

        let user_id = state.tokens.verify(token)?;
        Ok(AuthUser { user_id })
    }
}
