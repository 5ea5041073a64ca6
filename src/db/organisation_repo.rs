// src/db/organisation_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::organisation::Organisation};

// Repositório das organizações (os inquilinos do sistema)
#[derive(Clone)]
pub struct OrganisationRepository {
    pool: PgPool,
}

impl OrganisationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Organisation>, AppError> {
        let maybe_org = sqlx::query_as::<_, Organisation>(
            "SELECT id, name, domain, created_at, updated_at FROM organisations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_org)
    }

    // Resolução de inquilino: o domínio chega em minúsculas e a busca é
    // exata. Aceita um executor para rodar dentro da transação do cadastro.
    pub async fn find_by_domain<'e, E>(
        &self,
        executor: E,
        domain: &str,
    ) -> Result<Option<Organisation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_org = sqlx::query_as::<_, Organisation>(
            "SELECT id, name, domain, created_at, updated_at FROM organisations WHERE domain = $1",
        )
        .bind(domain)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_org)
    }

    // Cria a organização. Participa da transação que também promove o
    // fundador a admin.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        domain: &str,
    ) -> Result<Organisation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Organisation>(
            "INSERT INTO organisations (name, domain) VALUES ($1, $2) \
             RETURNING id, name, domain, created_at, updated_at",
        )
        .bind(name)
        .bind(domain)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DomainAlreadyInUse;
                }
            }
            e.into()
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        domain: &str,
    ) -> Result<Organisation, AppError> {
        sqlx::query_as::<_, Organisation>(
            "UPDATE organisations SET name = $2, domain = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, name, domain, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .bind(domain)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DomainAlreadyInUse;
                }
            }
            e.into()
        })
    }

    // Exclui a organização. Os membros já devem ter sido soltos na mesma
    // transação (a referência deles é fraca).
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM organisations WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
