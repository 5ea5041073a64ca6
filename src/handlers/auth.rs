// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AuthResponse, LoginPayload, MessageResponse, SignupPayload, SignupResponse, User,
    },
};

// Handler de cadastro
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Usuário criado; organização resolvida pelo domínio do e-mail", body = SignupResponse),
        (status = 400, description = "Um ou mais campos inválidos")
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state.auth_service.signup(&payload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão aberta", body = AuthResponse),
        (status = 401, description = "E-mail ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state.auth_service.login(&payload).await?;

    Ok(Json(response))
}

// O descarte do token é responsabilidade do cliente; aqui só registramos
// a saída e devolvemos a confirmação.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão encerrada", body = MessageResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(AuthenticatedUser(user): AuthenticatedUser) -> Json<MessageResponse> {
    tracing::info!("Usuário {} saiu", user.id);
    Json(MessageResponse {
        message: format!("{} logged out.", user.name),
    })
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "O usuário da sessão", body = User)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
