// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, FreshlyAuthenticated},
    models::auth::{MessageResponse, UpdateUserPayload, User},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: User,
    #[schema(example = "Account changes have been saved.")]
    pub message: String,
}

// Visualizar um usuário: precisa existir e ser colega de organização
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "O usuário pedido", body = User),
        (status = 403, description = "Usuário de outra organização"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn view_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = app_state.user_service.view(&actor, id).await?;
    Ok(Json(user))
}

// Editar a conta: só a própria, e só com sessão fresca
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Conta atualizada", body = UserResponse),
        (status = 400, description = "Um ou mais campos inválidos"),
        (status = 401, description = "Sessão antiga demais para mexer na conta"),
        (status = 403, description = "A conta não é a sua")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    FreshlyAuthenticated(actor): FreshlyAuthenticated,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.user_service.edit(&actor, id, &payload).await?;

    Ok(Json(UserResponse {
        user,
        message: "Account changes have been saved.".to_string(),
    }))
}

// Excluir a conta: remove também todas as coisas do usuário
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Conta excluída", body = MessageResponse),
        (status = 401, description = "Sessão antiga demais para mexer na conta"),
        (status = 403, description = "A conta não é a sua")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    FreshlyAuthenticated(actor): FreshlyAuthenticated,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.user_service.delete(&actor, id).await?;

    Ok(Json(MessageResponse {
        message: "Your account and all personal information has been permanently deleted."
            .to_string(),
    }))
}
