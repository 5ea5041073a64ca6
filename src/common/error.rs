// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Todos os handlers e serviços devolvem `Result<_, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Domínio já existe")]
    DomainAlreadyInUse,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // A sessão é válida, mas não é "fresca" o suficiente para operações de conta.
    #[error("Sessão antiga demais para operações sensíveis")]
    StaleSession,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Organização não encontrada")]
    OrganisationNotFound,

    #[error("Thing não encontrada")]
    ThingNotFound,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Monta um `ValidationErrors` de um único campo, para regras que só o serviço
/// consegue verificar (e-mail duplicado, domínio pessoal, etc.). Assim todas as
/// falhas de validação chegam ao cliente com o mesmo formato de resposta.
pub fn field_error(field: &'static str, code: &'static str, message: &str) -> AppError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::ValidationError(errors)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Corrida perdida contra o índice único do banco. O caminho normal é
            // barrado antes do INSERT, como erro de validação de campo.
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Email address is already in use.")
            }
            AppError::DomainAlreadyInUse => {
                (StatusCode::CONFLICT, "Domain name is already in use.")
            }

            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email address or password.")
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid or missing authentication token.",
            ),
            AppError::StaleSession => (
                StatusCode::UNAUTHORIZED,
                "To protect your account, please log in again to access this page.",
            ),

            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action.",
            ),

            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found."),
            AppError::OrganisationNotFound => (StatusCode::NOT_FOUND, "Organisation not found."),
            AppError::ThingNotFound => (StatusCode::NOT_FOUND, "Thing not found."),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu;
            // o cliente só recebe um corpo opaco.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error has occurred.",
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_renders_403() {
        let response = AppError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn stale_session_renders_401() {
        let response = AppError::StaleSession.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_variants_render_404() {
        for error in [
            AppError::UserNotFound,
            AppError::OrganisationNotFound,
            AppError::ThingNotFound,
        ] {
            assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn duplicate_backstops_render_409() {
        assert_eq!(
            AppError::EmailAlreadyExists.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DomainAlreadyInUse.into_response().status(),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn field_error_renders_400_with_details() {
        let response = field_error(
            "email_address",
            "personal_domain",
            "Email address must not be a personal address.",
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "One or more fields are invalid.");
        assert_eq!(
            body["details"]["email_address"][0],
            "Email address must not be a personal address."
        );
    }
}
