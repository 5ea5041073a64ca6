// src/models/organisation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ---
// 1. Organisation (o inquilino do sistema)
// ---
// O `domain` é a chave de associação: no cadastro, o domínio do e-mail do
// usuário é comparado (em minúsculas) com esta coluna.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    pub id: Uuid,

    #[schema(example = "Example Ltd")]
    pub name: String,

    #[schema(example = "example.com")]
    pub domain: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ---
// 2. Payload de criação/edição
// ---
// O mesmo "formulário" serve para criar e para editar.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationPayload {
    #[validate(length(min = 1, message = "Enter a name"))]
    #[schema(example = "Example Ltd")]
    pub name: String,

    #[validate(custom(function = "validate_domain_name"))]
    #[schema(example = "example.com")]
    pub domain: String,
}

/// Domínio obrigatório, com o mesmo teto da coluna no banco.
pub fn validate_domain_name(domain: &str) -> Result<(), ValidationError> {
    if domain.trim().is_empty() {
        let mut error = ValidationError::new("domain");
        error.message = Some("Enter a domain name".into());
        return Err(error);
    }
    // O teto conta caracteres, como a coluna VARCHAR(255), não bytes.
    if domain.chars().count() > 255 {
        let mut error = ValidationError::new("domain");
        error.message = Some("Domain name must be 255 characters or fewer".into());
        return Err(error);
    }
    Ok(())
}

// ---
// 3. Respostas com a mensagem de confirmação
// ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationResponse {
    pub organisation: Organisation,
    #[schema(example = "Your changes to Example Ltd have been saved.")]
    pub message: String,
}

// A criação devolve também o usuário, que acabou de virar admin
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganisationResponse {
    pub organisation: Organisation,
    pub user: crate::models::auth::User,
    #[schema(example = "Example Ltd has been created.")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_requires_name_and_domain() {
        let payload = OrganisationPayload {
            name: String::new(),
            domain: String::new(),
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("domain"));
    }

    #[test]
    fn payload_rejects_oversized_domain() {
        let payload = OrganisationPayload {
            name: "Example Ltd".to_string(),
            domain: "a".repeat(256),
        };
        assert!(payload.validate().is_err());

        // Domínio internacionalizado: 255 caracteres de 2 bytes passam,
        // porque o limite conta caracteres.
        let payload = OrganisationPayload {
            name: "Example Ltd".to_string(),
            domain: "ç".repeat(255),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn payload_accepts_regular_domain() {
        let payload = OrganisationPayload {
            name: "Example Ltd".to_string(),
            domain: "example.com".to_string(),
        };
        assert!(payload.validate().is_ok());
    }
}
