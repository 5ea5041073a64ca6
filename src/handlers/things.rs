// src/handlers/things.rs

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
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
        thing::{Page, PageRequest, Thing, ThingFilter, ThingPayload, ThingResponse},
    },
};

// A listagem: filtro, ordenação e paginação sobre todas as coisas
#[utoipa::path(
    get,
    path = "/api/things",
    tag = "Things",
    params(ThingFilter, PageRequest),
    responses(
        (status = 200, description = "Uma página de coisas", body = Page<Thing>),
        (status = 400, description = "Parâmetro de filtro ou ordenação inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_things(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<ThingFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<Thing>>, AppError> {
    let page = app_state.thing_service.list(&filter, &page).await?;
    Ok(Json(page))
}

// O download em CSV: mesmo filtro e ordenação da listagem, sem paginação.
// A resposta é transmitida em pedaços, lote a lote.
#[utoipa::path(
    get,
    path = "/api/things/download",
    tag = "Things",
    params(ThingFilter),
    responses(
        (status = 200, description = "CSV com as coisas filtradas", content_type = "text/csv")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_things(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<ThingFilter>,
) -> Result<impl IntoResponse, AppError> {
    let stream = app_state.thing_service.csv_stream(filter);
    let body = Body::from_stream(stream);

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"things.csv\"",
        ),
    ];
    Ok((headers, body))
}

#[utoipa::path(
    post,
    path = "/api/things",
    tag = "Things",
    request_body = ThingPayload,
    responses(
        (status = 201, description = "Coisa criada, nome já normalizado", body = ThingResponse),
        (status = 400, description = "Um ou mais campos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_thing(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<ThingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let thing = app_state.thing_service.create(&actor, &payload).await?;

    let message = format!("{} has been created.", thing.name);
    Ok((StatusCode::CREATED, Json(ThingResponse { thing, message })))
}

// Visualizar: o dono, ou um colega da organização do dono
#[utoipa::path(
    get,
    path = "/api/things/{id}",
    tag = "Things",
    params(("id" = Uuid, Path, description = "ID da coisa")),
    responses(
        (status = 200, description = "A coisa pedida", body = Thing),
        (status = 403, description = "A coisa pertence a outra organização"),
        (status = 404, description = "Coisa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn view_thing(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Thing>, AppError> {
    let thing = app_state.thing_service.view(&actor, id).await?;
    Ok(Json(thing))
}

// Editar: só o dono
#[utoipa::path(
    put,
    path = "/api/things/{id}",
    tag = "Things",
    params(("id" = Uuid, Path, description = "ID da coisa")),
    request_body = ThingPayload,
    responses(
        (status = 200, description = "Alterações salvas", body = ThingResponse),
        (status = 400, description = "Um ou mais campos inválidos"),
        (status = 403, description = "Só o dono edita a coisa"),
        (status = 404, description = "Coisa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_thing(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ThingPayload>,
) -> Result<Json<ThingResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let thing = app_state.thing_service.edit(&actor, id, &payload).await?;

    let message = format!("Your changes to {} have been saved.", thing.name);
    Ok(Json(ThingResponse { thing, message }))
}

// Excluir: só o dono
#[utoipa::path(
    delete,
    path = "/api/things/{id}",
    tag = "Things",
    params(("id" = Uuid, Path, description = "ID da coisa")),
    responses(
        (status = 200, description = "Coisa excluída", body = MessageResponse),
        (status = 403, description = "Só o dono exclui a coisa"),
        (status = 404, description = "Coisa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_thing(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let thing = app_state.thing_service.delete(&actor, id).await?;

    Ok(Json(MessageResponse {
        message: format!("{} has been deleted.", thing.name),
    }))
}
