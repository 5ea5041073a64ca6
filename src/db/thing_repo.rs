// src/db/thing_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::thing::{Colour, PageRequest, Thing, ThingFilter},
};

const THING_COLUMNS: &str = "id, user_id, name, colour, created_at, updated_at";

// O mesmo filtro serve para listagem, contagem e download. Os únicos
// trechos montados por string são esta cláusula fixa e o ORDER BY, que
// vem de um enum fechado; valores de usuário entram sempre por bind.
const FILTER_CLAUSE: &str =
    "($1::text IS NULL OR name ILIKE $1) AND ($2::colour IS NULL OR colour = $2)";

fn like_pattern(filter: &ThingFilter) -> Option<String> {
    filter.search_term().map(|query| format!("%{}%", query))
}

// Repositório das coisas
#[derive(Clone)]
pub struct ThingRepository {
    pool: PgPool,
}

impl ThingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Thing>, AppError> {
        let sql = format!("SELECT {THING_COLUMNS} FROM things WHERE id = $1");
        let maybe_thing = sqlx::query_as::<_, Thing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_thing)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        colour: Colour,
    ) -> Result<Thing, AppError> {
        let sql = format!(
            "INSERT INTO things (user_id, name, colour) VALUES ($1, $2, $3) \
             RETURNING {THING_COLUMNS}"
        );
        let thing = sqlx::query_as::<_, Thing>(&sql)
            .bind(user_id)
            .bind(name)
            .bind(colour)
            .fetch_one(&self.pool)
            .await?;
        Ok(thing)
    }

    pub async fn update(&self, id: Uuid, name: &str, colour: Colour) -> Result<Thing, AppError> {
        let sql = format!(
            "UPDATE things SET name = $2, colour = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {THING_COLUMNS}"
        );
        let thing = sqlx::query_as::<_, Thing>(&sql)
            .bind(id)
            .bind(name)
            .bind(colour)
            .fetch_one(&self.pool)
            .await?;
        Ok(thing)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM things WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Remove todas as coisas de um dono. Participa da transação de
    // exclusão de conta (a cascata é explícita, além da FK).
    pub async fn delete_all_for_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM things WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // Uma página da listagem filtrada e ordenada
    pub async fn list(
        &self,
        filter: &ThingFilter,
        page: &PageRequest,
    ) -> Result<Vec<Thing>, AppError> {
        let sql = format!(
            "SELECT {THING_COLUMNS} FROM things WHERE {FILTER_CLAUSE} \
             ORDER BY {} LIMIT $3 OFFSET $4",
            filter.sort.order_clause()
        );
        let things = sqlx::query_as::<_, Thing>(&sql)
            .bind(like_pattern(filter))
            .bind(filter.colour)
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(things)
    }

    // Total de itens do mesmo filtro (metadados da página)
    pub async fn count(&self, filter: &ThingFilter) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM things WHERE {FILTER_CLAUSE}");
        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(like_pattern(filter))
            .bind(filter.colour)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    // Janela do download em CSV: mesmíssimo filtro e ordenação da
    // listagem, mas varrido em lotes para não carregar tudo na memória.
    pub async fn fetch_batch(
        &self,
        filter: &ThingFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Thing>, AppError> {
        let sql = format!(
            "SELECT {THING_COLUMNS} FROM things WHERE {FILTER_CLAUSE} \
             ORDER BY {} LIMIT $3 OFFSET $4",
            filter.sort.order_clause()
        );
        let things = sqlx::query_as::<_, Thing>(&sql)
            .bind(like_pattern(filter))
            .bind(filter.colour)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(things)
    }
}
