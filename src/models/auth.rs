// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::organisation::Organisation;

// ---
// 1. Papel do usuário dentro da organização
// ---
// O primeiro usuário de um domínio vira `admin` ao criar a organização;
// quem entra depois, pelo resolvedor de domínio, nasce `user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

// ---
// 2. User (o que sai do banco)
// ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(example = "Ada Lovelace")]
    pub name: String,

    #[schema(example = "ada@example.com")]
    pub email_address: String,

    // IMPORTANTE para segurança: o hash nunca sai na resposta.
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    #[schema(example = "Europe/London")]
    pub timezone: String,

    pub role: UserRole,

    // Referência fraca: apagar a organização apenas "solta" o usuário.
    pub organisation_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub login_at: Option<DateTime<Utc>>,
}

// ---
// 3. Payloads (os "formulários" da API)
// ---

fn default_timezone() -> String {
    "Europe/London".to_string()
}

/// Valida o fuso horário contra a base IANA (equivalente às escolhas do pytz).
pub fn validate_timezone(timezone: &str) -> Result<(), ValidationError> {
    if timezone.parse::<chrono_tz::Tz>().is_ok() {
        return Ok(());
    }
    let mut error = ValidationError::new("timezone");
    error.message = Some("Select a valid timezone.".into());
    Err(error)
}

// Dados para cadastro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[validate(length(min = 1, message = "Enter your full name"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,

    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 256, message = "Email address must be 256 characters or fewer")
    )]
    #[schema(example = "ada@example.com")]
    pub email_address: String,

    #[validate(length(
        min = 8,
        max = 72,
        message = "Password must be between 8 and 72 characters"
    ))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords must match."))]
    pub confirm_password: String,

    #[serde(default = "default_timezone")]
    #[validate(custom(function = "validate_timezone"))]
    #[schema(example = "Europe/London")]
    pub timezone: String,
}

// Dados para edição de conta. A senha não muda por aqui; o teto de 255
// no e-mail é o que o formulário de edição sempre aplicou.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "Enter your full name"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,

    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 255, message = "Email address must be 255 characters or fewer")
    )]
    #[schema(example = "ada@example.com")]
    pub email_address: String,

    #[serde(default = "default_timezone")]
    #[validate(custom(function = "validate_timezone"))]
    #[schema(example = "Europe/London")]
    pub timezone: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 256, message = "Email address must be 256 characters or fewer")
    )]
    #[schema(example = "ada@example.com")]
    pub email_address: String,

    #[validate(length(
        min = 8,
        max = 72,
        message = "Password must be between 8 and 72 characters"
    ))]
    pub password: String,
}

// ---
// 4. Respostas
// ---

// Resposta de login com o token e o usuário autenticado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Resposta do cadastro. `organisation` preenchida quando o domínio do e-mail
// já pertence a uma organização; `None` manda o cliente para o fluxo de criação.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub token: String,
    pub user: User,
    pub organisation: Option<Organisation>,
    #[schema(example = "Looks like you're the first person here from your organisation.")]
    pub message: String,
}

// Resposta genérica só com uma mensagem (logout, exclusões)
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ---
// 5. Claims do JWT
// ---
// `iat` também decide se a sessão ainda é "fresca" para operações de conta.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_string(),
            email_address: "ada@example.com".to_string(),
            password_hash: "$2b$12$segredo".to_string(),
            timezone: "Europe/London".to_string(),
            role: UserRole::User,
            organisation_id: None,
            created_at: Utc::now(),
            updated_at: None,
            login_at: None,
        }
    }

    #[test]
    fn password_hash_never_serialized() {
        let value = serde_json::to_value(sample_user()).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["emailAddress"], "ada@example.com");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "admin");
        assert_eq!(serde_json::to_value(UserRole::User).unwrap(), "user");
    }

    #[test]
    fn timezone_must_be_iana() {
        assert!(validate_timezone("Europe/London").is_ok());
        assert!(validate_timezone("America/Sao_Paulo").is_ok());
        assert!(validate_timezone("Lua/Cratera").is_err());
    }

    #[test]
    fn signup_rejects_mismatched_passwords() {
        let payload = SignupPayload {
            name: "Ada Lovelace".to_string(),
            email_address: "ada@example.com".to_string(),
            password: "correcthorse".to_string(),
            confirm_password: "wronghorse".to_string(),
            timezone: default_timezone(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn signup_rejects_short_password() {
        let payload = SignupPayload {
            name: "Ada Lovelace".to_string(),
            email_address: "ada@example.com".to_string(),
            password: "curta".to_string(),
            confirm_password: "curta".to_string(),
            timezone: default_timezone(),
        };
        assert!(payload.validate().is_err());
    }
}
