// src/handlers/organisations.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::MessageResponse,
        organisation::{
            CreateOrganisationResponse, Organisation, OrganisationPayload, OrganisationResponse,
        },
    },
};

// Criar a organização: só para quem ainda não tem uma; quem cria vira admin
#[utoipa::path(
    post,
    path = "/api/organisations",
    tag = "Organisations",
    request_body = OrganisationPayload,
    responses(
        (status = 201, description = "Organização criada; o fundador agora é admin", body = CreateOrganisationResponse),
        (status = 400, description = "Um ou mais campos inválidos"),
        (status = 403, description = "Quem já pertence a uma organização não cria outra")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_organisation(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<OrganisationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (organisation, user) = app_state
        .organisation_service
        .create(&actor, &payload)
        .await?;

    let message = format!("{} has been created.", organisation.name);
    Ok((
        StatusCode::CREATED,
        Json(CreateOrganisationResponse {
            organisation,
            user,
            message,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/organisations/{id}",
    tag = "Organisations",
    params(("id" = Uuid, Path, description = "ID da organização")),
    responses(
        (status = 200, description = "A organização pedida", body = Organisation),
        (status = 403, description = "Você não é membro desta organização"),
        (status = 404, description = "Organização não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn view_organisation(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Organisation>, AppError> {
    let organisation = app_state.organisation_service.view(&actor, id).await?;
    Ok(Json(organisation))
}

// Editar: membros com papel de admin
#[utoipa::path(
    put,
    path = "/api/organisations/{id}",
    tag = "Organisations",
    params(("id" = Uuid, Path, description = "ID da organização")),
    request_body = OrganisationPayload,
    responses(
        (status = 200, description = "Alterações salvas", body = OrganisationResponse),
        (status = 400, description = "Um ou mais campos inválidos"),
        (status = 403, description = "Apenas admins editam a organização"),
        (status = 404, description = "Organização não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_organisation(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrganisationPayload>,
) -> Result<Json<OrganisationResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let organisation = app_state
        .organisation_service
        .edit(&actor, id, &payload)
        .await?;

    let message = format!("Your changes to {} have been saved.", organisation.name);
    Ok(Json(OrganisationResponse {
        organisation,
        message,
    }))
}

// Excluir: membros com papel de admin; os membros são soltos, não excluídos
#[utoipa::path(
    delete,
    path = "/api/organisations/{id}",
    tag = "Organisations",
    params(("id" = Uuid, Path, description = "ID da organização")),
    responses(
        (status = 200, description = "Organização excluída; membros desvinculados", body = MessageResponse),
        (status = 403, description = "Apenas admins excluem a organização"),
        (status = 404, description = "Organização não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_organisation(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let organisation = app_state.organisation_service.delete(&actor, id).await?;

    Ok(Json(MessageResponse {
        message: format!("{} has been deleted.", organisation.name),
    }))
}
