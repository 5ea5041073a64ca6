// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

const USER_COLUMNS: &str = "id, name, email_address, password_hash, timezone, role, \
                            organisation_id, created_at, updated_at, login_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail (sempre armazenado em minúsculas)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email_address = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário. `login_at` já nasce preenchido: o cadastro
    // também autentica. Aceita um executor para participar da transação
    // do cadastro (resolução de organização na sequência).
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
        timezone: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO users (name, email_address, password_hash, timezone, login_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(timezone)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // Converte violação de chave única em um erro mais amigável.
                // A unicidade do banco é a última linha de defesa contra corridas.
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })
    }

    // Atualiza os dados de perfil (edição de conta)
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        timezone: &str,
    ) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users \
             SET name = $2, email_address = $3, timezone = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(timezone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })
    }

    // Registra o instante do login e devolve o usuário já atualizado
    pub async fn record_login(&self, id: Uuid) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET login_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    // Vincula o usuário a uma organização, ajustando o papel.
    // Usado no cadastro (papel continua `user`) e na criação de
    // organização (fundador vira `admin`), sempre dentro da transação.
    pub async fn attach_to_organisation<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        organisation_id: Uuid,
        role: UserRole,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE users SET organisation_id = $2, role = $3 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(organisation_id)
            .bind(role)
            .fetch_one(executor)
            .await?;
        Ok(user)
    }

    // Solta todos os membros de uma organização (referência fraca:
    // excluir a organização não exclui ninguém). Papéis ficam como estão.
    pub async fn detach_members<'e, E>(
        &self,
        executor: E,
        organisation_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE users SET organisation_id = NULL WHERE organisation_id = $1")
            .bind(organisation_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // Exclui a conta. As coisas do usuário já devem ter sido removidas
    // na mesma transação (exclusão em cascata explícita).
    pub async fn delete_user<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
