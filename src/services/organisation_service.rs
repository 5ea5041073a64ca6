// src/services/organisation_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{field_error, AppError},
    db::{OrganisationRepository, UserRepository},
    models::{
        auth::{User, UserRole},
        organisation::{Organisation, OrganisationPayload},
    },
    services::policy::{self, Operation},
};

#[derive(Clone)]
pub struct OrganisationService {
    organisation_repo: OrganisationRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl OrganisationService {
    pub fn new(
        organisation_repo: OrganisationRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            organisation_repo,
            user_repo,
            pool,
        }
    }

    // Cria a organização e promove o fundador a admin na mesma transação.
    // Devolve o usuário atualizado junto, para a resposta refletir o novo papel.
    pub async fn create(
        &self,
        actor: &User,
        payload: &OrganisationPayload,
    ) -> Result<(Organisation, User), AppError> {
        policy::authorise_organisation_create(actor)?;

        let name = payload.name.trim();
        let domain = payload.domain.trim().to_lowercase();

        // Checagem amigável; a chave única do banco decide corridas.
        if self
            .organisation_repo
            .find_by_domain(&self.pool, &domain)
            .await?
            .is_some()
        {
            return Err(field_error(
                "domain",
                "taken",
                "Domain name is already in use",
            ));
        }

        let mut tx = self.pool.begin().await?;

        let organisation = self.organisation_repo.create(&mut *tx, name, &domain).await?;
        let user = self
            .user_repo
            .attach_to_organisation(&mut *tx, actor.id, organisation.id, UserRole::Admin)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🚀 Organização {} criada pelo usuário {}",
            organisation.id,
            user.id
        );
        Ok((organisation, user))
    }

    pub async fn view(&self, actor: &User, id: Uuid) -> Result<Organisation, AppError> {
        let organisation = self
            .organisation_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::OrganisationNotFound)?;
        policy::authorise_organisation(actor, organisation.id, Operation::View)?;
        Ok(organisation)
    }

    pub async fn edit(
        &self,
        actor: &User,
        id: Uuid,
        payload: &OrganisationPayload,
    ) -> Result<Organisation, AppError> {
        let organisation = self
            .organisation_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::OrganisationNotFound)?;
        policy::authorise_organisation(actor, organisation.id, Operation::Edit)?;

        let name = payload.name.trim();
        let domain = payload.domain.trim().to_lowercase();

        // Mudou de domínio? Não pode colidir com outra organização.
        if domain != organisation.domain
            && self
                .organisation_repo
                .find_by_domain(&self.pool, &domain)
                .await?
                .is_some()
        {
            return Err(field_error(
                "domain",
                "taken",
                "Domain name is already in use",
            ));
        }

        let organisation = self.organisation_repo.update(id, name, &domain).await?;
        Ok(organisation)
    }

    // Excluir a organização solta os membros (papéis ficam como estão) e
    // então remove a linha, tudo na mesma transação. Devolve a organização
    // excluída para a mensagem de confirmação.
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<Organisation, AppError> {
        let organisation = self
            .organisation_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::OrganisationNotFound)?;
        policy::authorise_organisation(actor, organisation.id, Operation::Delete)?;

        let mut tx = self.pool.begin().await?;

        let detached = self.user_repo.detach_members(&mut *tx, id).await?;
        self.organisation_repo.delete(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(
            "Organização {} excluída ({} membros soltos)",
            organisation.id,
            detached
        );
        Ok(organisation)
    }
}
