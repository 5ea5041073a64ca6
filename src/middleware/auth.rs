// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};

use crate::{common::error::AppError, config::AppState, models::auth::User};

/// Idade máxima do token para as rotas de conta: passou disso, a sessão
/// vale para navegar, mas não para mexer na conta.
pub const FRESH_SESSION_WINDOW_MINUTES: i64 = 15;

// A sessão da requisição: o usuário recarregado do banco e o instante em
// que o token foi emitido.
#[derive(Clone)]
pub struct Session {
    pub user: User,
    pub issued_at: DateTime<Utc>,
}

pub fn is_fresh(issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - issued_at <= Duration::minutes(FRESH_SESSION_WINDOW_MINUTES)
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let (user, issued_at) = app_state.auth_service.validate_token(token).await?;

            // Insere a sessão nos "extensions" da requisição
            request.extensions_mut().insert(Session { user, issued_at });
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(|session| AuthenticatedUser(session.user))
            .ok_or(AppError::InvalidToken)
    }
}

// Extrator das rotas de conta: além do token válido, o login precisa ser
// recente. Sessão velha manda o usuário autenticar de novo.
pub struct FreshlyAuthenticated(pub User);

impl<S> FromRequestParts<S> for FreshlyAuthenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if !is_fresh(session.issued_at, Utc::now()) {
            return Err(AppError::StaleSession);
        }

        Ok(FreshlyAuthenticated(session.user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_age_out_of_freshness() {
        let now = Utc::now();

        assert!(is_fresh(now, now));
        assert!(is_fresh(now - Duration::minutes(14), now));
        // O limite é inclusivo
        assert!(is_fresh(
            now - Duration::minutes(FRESH_SESSION_WINDOW_MINUTES),
            now
        ));
        assert!(!is_fresh(
            now - Duration::minutes(FRESH_SESSION_WINDOW_MINUTES + 1),
            now
        ));
    }
}
