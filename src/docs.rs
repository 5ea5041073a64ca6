// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::logout,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::view_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Organisations ---
        handlers::organisations::create_organisation,
        handlers::organisations::view_organisation,
        handlers::organisations::update_organisation,
        handlers::organisations::delete_organisation,

        // --- Things ---
        handlers::things::list_things,
        handlers::things::download_things,
        handlers::things::create_thing,
        handlers::things::view_thing,
        handlers::things::update_thing,
        handlers::things::delete_thing,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::SignupPayload,
            models::auth::UpdateUserPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::SignupResponse,
            models::auth::MessageResponse,

            // --- Organisations ---
            models::organisation::Organisation,
            models::organisation::OrganisationPayload,
            models::organisation::OrganisationResponse,
            models::organisation::CreateOrganisationResponse,

            // --- Things ---
            models::thing::Colour,
            models::thing::SortKey,
            models::thing::Thing,
            models::thing::ThingPayload,
            models::thing::ThingResponse,
            models::thing::Page<models::thing::Thing>,

            // --- Payloads ---
            handlers::users::UserResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Cadastro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Organisations", description = "Gestão de Organizações e Membros"),
        (name = "Things", description = "Gestão de Things (CRUD, Filtros e Exportação)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
