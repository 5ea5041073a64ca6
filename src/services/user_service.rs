// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{field_error, AppError},
    db::{OrganisationRepository, ThingRepository, UserRepository},
    models::auth::{UpdateUserPayload, User},
    services::{
        auth::email_domain,
        policy::{self, Operation},
    },
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    organisation_repo: OrganisationRepository,
    thing_repo: ThingRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(
        user_repo: UserRepository,
        organisation_repo: OrganisationRepository,
        thing_repo: ThingRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            organisation_repo,
            thing_repo,
            pool,
        }
    }

    // Visualizar: primeiro o alvo precisa existir (404), depois a
    // política decide (403); um colega de organização passa.
    pub async fn view(&self, actor: &User, id: Uuid) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        policy::authorise_user(actor, &user, Operation::View)?;
        Ok(user)
    }

    pub async fn edit(
        &self,
        actor: &User,
        id: Uuid,
        payload: &UpdateUserPayload,
    ) -> Result<User, AppError> {
        policy::authorise_account_mutation(actor, id)?;

        let name = payload.name.trim();
        let email = payload.email_address.trim().to_lowercase();

        // Mudou o e-mail? Não pode colidir com o de outro usuário.
        if email != actor.email_address
            && self.user_repo.find_by_email(&email).await?.is_some()
        {
            return Err(field_error(
                "email_address",
                "taken",
                "Email address is already in use",
            ));
        }

        // Quem pertence a uma organização só troca de e-mail dentro do
        // domínio dela. Sem organização, não há domínio a respeitar.
        if let Some(organisation_id) = actor.organisation_id {
            let organisation = self
                .organisation_repo
                .find_by_id(organisation_id)
                .await?
                .ok_or(AppError::OrganisationNotFound)?;
            let domain = email_domain(&email).ok_or_else(|| {
                field_error("email_address", "email", "Enter a valid email address")
            })?;
            if domain != organisation.domain {
                return Err(field_error(
                    "email_address",
                    "domain",
                    &format!(
                        "Email address must be in the {} domain",
                        organisation.domain
                    ),
                ));
            }
        }

        let user = self
            .user_repo
            .update_profile(id, name, &email, &payload.timezone)
            .await?;
        tracing::info!("✅ Usuário {} atualizou a conta", user.id);
        Ok(user)
    }

    // Excluir a conta remove as coisas do usuário e só então o usuário,
    // na mesma transação. A FK em cascata fica de rede de segurança.
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        policy::authorise_account_mutation(actor, id)?;

        let mut tx = self.pool.begin().await?;

        let things_removed = self.thing_repo.delete_all_for_user(&mut *tx, id).await?;
        self.user_repo.delete_user(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(
            "Usuário {} excluiu a conta ({} coisas removidas)",
            id,
            things_removed
        );
        Ok(())
    }
}
