// src/config.rs

use crate::db::{OrganisationRepository, ThingRepository, UserRepository};
use crate::services::{AuthService, OrganisationService, ThingService, UserService};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub organisation_service: OrganisationService,
    pub thing_service: ThingService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, o main decide parar.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_parts(db_pool, jwt_secret))
    }

    // --- Monta o gráfico de dependências ---
    // Separado de `new` para que os testes montem o estado com um pool próprio.
    pub fn from_parts(db_pool: PgPool, jwt_secret: String) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let organisation_repo = OrganisationRepository::new(db_pool.clone());
        let thing_repo = ThingRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            organisation_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let user_service = UserService::new(
            user_repo.clone(),
            organisation_repo.clone(),
            thing_repo.clone(),
            db_pool.clone(),
        );
        let organisation_service =
            OrganisationService::new(organisation_repo, user_repo.clone(), db_pool.clone());
        let thing_service = ThingService::new(thing_repo, user_repo);

        Self {
            db_pool,
            auth_service,
            user_service,
            organisation_service,
            thing_service,
        }
    }
}
