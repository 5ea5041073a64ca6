// src/models/thing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Tamanho de página padrão e teto (os mesmos do seletor "Items per page").
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 40;

// ---
// 1. Colour: as 8 cores fixas
// ---
// ATENÇÃO: no banco o tipo `colour` é declarado em ordem ALFABÉTICA, para que
// `ORDER BY colour ASC` ordene pelo nome da cor e não pela ordem de cadastro.
// Aqui as variantes seguem a ordem de apresentação do produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "colour", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Black,
    White,
}

impl Colour {
    /// A grafia que circula na API, no banco e no CSV.
    pub fn as_str(self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Green => "green",
            Colour::Blue => "blue",
            Colour::Yellow => "yellow",
            Colour::Orange => "orange",
            Colour::Purple => "purple",
            Colour::Black => "black",
            Colour::White => "white",
        }
    }
}

// ---
// 2. Thing (o que sai do banco)
// ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Thing {
    pub id: Uuid,
    pub user_id: Uuid,

    #[schema(example = "Teapot")]
    pub name: String,

    pub colour: Colour,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ---
// 3. Payload de criação/edição
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThingPayload {
    #[validate(custom(function = "validate_thing_name"))]
    #[schema(example = "teapot")]
    pub name: String,

    // Option + required: assim a falta do campo vira erro de validação
    // com a mensagem do produto, e não um erro de desserialização.
    #[validate(required(message = "Select a colour"))]
    pub colour: Option<Colour>,
}

/// Nome obrigatório, com o mesmo teto da coluna no banco.
pub fn validate_thing_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut error = ValidationError::new("name");
        error.message = Some("Enter a name".into());
        return Err(error);
    }
    // O teto conta caracteres, como a coluna VARCHAR(32), não bytes.
    if name.chars().count() > 32 {
        let mut error = ValidationError::new("name");
        error.message = Some("Name must be 32 characters or fewer".into());
        return Err(error);
    }
    Ok(())
}

// ---
// 4. Filtro da listagem e do download
// ---
// Os mesmos parâmetros servem para `GET /things` e `GET /things/download`;
// a paginação só existe na listagem.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ThingFilter {
    /// Busca por substring no nome (sem diferenciar maiúsculas).
    pub query: Option<String>,
    /// Filtra por uma cor exata.
    pub colour: Option<Colour>,
    /// Chave de ordenação.
    #[serde(default)]
    pub sort: SortKey,
}

impl ThingFilter {
    /// Termo de busca efetivo; busca vazia é tratada como ausente.
    pub fn search_term(&self) -> Option<&str> {
        self.query.as_deref().filter(|term| !term.is_empty())
    }
}

// Chaves de ordenação permitidas. Enum fechado: valores fora da lista
// são rejeitados na desserialização dos parâmetros (400).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Name,
    Colour,
    UserId,
}

impl SortKey {
    /// Cláusula ORDER BY correspondente. Fora do padrão "mais recente",
    /// o desempate é pela data de criação, do mais novo ao mais velho;
    /// o `id` fecha a cláusula para a ordem ser total (linhas empatadas
    /// não podem trocar de lugar entre uma página e outra).
    pub fn order_clause(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at DESC, id",
            SortKey::Name => "name ASC, created_at DESC, id",
            SortKey::Colour => "colour ASC, created_at DESC, id",
            SortKey::UserId => "user_id ASC, created_at DESC, id",
        }
    }
}

// ---
// 5. Paginação
// ---
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageRequest {
    /// Número da página, a partir de 1.
    pub page: Option<i64>,
    /// Itens por página (1 a 40).
    pub per_page: Option<i64>,
}

impl PageRequest {
    pub fn number(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    // Saturado: uma página absurda não pode estourar a conta nem virar
    // OFFSET negativo; o banco só devolve uma página vazia.
    pub fn offset(&self) -> i64 {
        self.number().saturating_sub(1).saturating_mul(self.size())
    }
}

// Envelope de página com os metadados que a listagem exibe.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: i64) -> Self {
        let per_page = request.size();
        let total_pages = (total_items + per_page - 1) / per_page;
        Self {
            items,
            page: request.number(),
            per_page,
            total_items,
            total_pages,
        }
    }
}

// ---
// 6. Resposta das mutações, com a mensagem de confirmação
// ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThingResponse {
    pub thing: Thing,
    #[schema(example = "Teapot has been created.")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Colour::Red).unwrap(), "red");
        assert_eq!(
            serde_json::from_str::<Colour>("\"purple\"").unwrap(),
            Colour::Purple
        );
    }

    #[test]
    fn colour_rejects_unknown_value() {
        assert!(serde_json::from_str::<Colour>("\"magenta\"").is_err());
    }

    #[test]
    fn sort_key_is_a_closed_set() {
        assert_eq!(
            serde_json::from_str::<SortKey>("\"user_id\"").unwrap(),
            SortKey::UserId
        );
        assert!(serde_json::from_str::<SortKey>("\"ctime\"").is_err());
        assert_eq!(SortKey::default(), SortKey::CreatedAt);
    }

    #[test]
    fn order_clause_breaks_ties_by_recency_then_id() {
        assert_eq!(SortKey::CreatedAt.order_clause(), "created_at DESC, id");
        assert_eq!(SortKey::Name.order_clause(), "name ASC, created_at DESC, id");
        assert_eq!(
            SortKey::Colour.order_clause(),
            "colour ASC, created_at DESC, id"
        );
        assert_eq!(
            SortKey::UserId.order_clause(),
            "user_id ASC, created_at DESC, id"
        );
    }

    #[test]
    fn page_request_clamps_size_and_number() {
        let defaults = PageRequest::default();
        assert_eq!(defaults.number(), 1);
        assert_eq!(defaults.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(defaults.offset(), 0);

        let oversized = PageRequest {
            page: Some(3),
            per_page: Some(100),
        };
        assert_eq!(oversized.size(), MAX_PAGE_SIZE);
        assert_eq!(oversized.offset(), 80);

        let undersized = PageRequest {
            page: Some(0),
            per_page: Some(0),
        };
        assert_eq!(undersized.number(), 1);
        assert_eq!(undersized.size(), 1);
    }

    #[test]
    fn offset_survives_a_huge_page_number() {
        let way_past_the_end = PageRequest {
            page: Some(i64::MAX),
            per_page: Some(MAX_PAGE_SIZE),
        };
        // Satura em vez de estourar; o deslocamento nunca fica negativo.
        assert_eq!(way_past_the_end.offset(), i64::MAX);

        let last_before_saturation = PageRequest {
            page: Some(i64::MAX / MAX_PAGE_SIZE),
            per_page: Some(MAX_PAGE_SIZE),
        };
        assert!(last_before_saturation.offset() >= 0);
    }

    #[test]
    fn page_envelope_counts_pages() {
        let request = PageRequest {
            page: Some(1),
            per_page: Some(20),
        };
        let empty: Page<Thing> = Page::new(Vec::new(), &request, 0);
        assert_eq!(empty.total_pages, 0);

        let full: Page<Thing> = Page::new(Vec::new(), &request, 41);
        assert_eq!(full.total_pages, 3);
    }

    #[test]
    fn empty_search_is_ignored() {
        let filter = ThingFilter {
            query: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), None);

        let filter = ThingFilter {
            query: Some("teapot".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), Some("teapot"));
    }

    #[test]
    fn thing_name_bounds() {
        assert!(validate_thing_name("Teapot").is_ok());
        assert!(validate_thing_name("   ").is_err());
        assert!(validate_thing_name(&"a".repeat(33)).is_err());

        // O limite é de caracteres: 32 letras acentuadas ocupam 64 bytes
        // e ainda assim cabem.
        assert!(validate_thing_name(&"ã".repeat(32)).is_ok());
        assert!(validate_thing_name(&"ã".repeat(33)).is_err());
    }

    #[test]
    fn payload_requires_a_colour() {
        let payload = ThingPayload {
            name: "Teapot".to_string(),
            colour: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("colour"));
    }
}
