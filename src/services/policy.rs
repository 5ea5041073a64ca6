// src/services/policy.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{User, UserRole},
        thing::Thing,
    },
};

// ---
// A política de autorização inteira mora aqui, em funções puras.
// Os serviços carregam os dados, chamam a política e só então mexem no
// banco; negar é sempre `AppError::Forbidden`, nunca um efeito parcial.
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    View,
    Edit,
    Delete,
}

/// Coisas: só o dono edita ou exclui. Visualizar exige estar na mesma
/// organização do dono (a igualdade cobre o caso de ambos sem organização,
/// e cobre o próprio dono por consequência).
pub fn authorise_thing(
    actor: &User,
    thing: &Thing,
    owner_organisation: Option<Uuid>,
    operation: Operation,
) -> Result<(), AppError> {
    match operation {
        Operation::View => {
            if actor.organisation_id == owner_organisation {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
        Operation::Edit | Operation::Delete => {
            if thing.user_id == actor.id {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Usuários: qualquer um vê colegas da própria organização; editar e
/// excluir é sempre e somente a própria conta.
pub fn authorise_user(actor: &User, target: &User, operation: Operation) -> Result<(), AppError> {
    match operation {
        Operation::View => {
            if actor.organisation_id == target.organisation_id {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
        Operation::Edit | Operation::Delete => {
            if target.id == actor.id {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Variante por id para as rotas de conta, que negam antes de qualquer
/// consulta: um id alheio leva 403 mesmo que não exista.
pub fn authorise_account_mutation(actor: &User, target_id: Uuid) -> Result<(), AppError> {
    if target_id == actor.id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Organizações: membros veem a própria; editar e excluir exige ser
/// admin dela.
pub fn authorise_organisation(
    actor: &User,
    organisation_id: Uuid,
    operation: Operation,
) -> Result<(), AppError> {
    if actor.organisation_id != Some(organisation_id) {
        return Err(AppError::Forbidden);
    }
    match operation {
        Operation::View => Ok(()),
        Operation::Edit | Operation::Delete => {
            if actor.role == UserRole::Admin {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Criar uma organização é permitido apenas a quem ainda não pertence a
/// nenhuma. Quem cria vira admin dela; é assim que nasce o primeiro admin.
pub fn authorise_organisation_create(actor: &User) -> Result<(), AppError> {
    if actor.organisation_id.is_none() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::thing::Colour;

    fn user(organisation_id: Option<Uuid>, role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_string(),
            email_address: "ada@example.com".to_string(),
            password_hash: String::new(),
            timezone: "Europe/London".to_string(),
            role,
            organisation_id,
            created_at: Utc::now(),
            updated_at: None,
            login_at: None,
        }
    }

    fn thing_of(owner: &User) -> Thing {
        Thing {
            id: Uuid::new_v4(),
            user_id: owner.id,
            name: "Teapot".to_string(),
            colour: Colour::Red,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn owner_may_edit_and_delete_their_thing() {
        let org = Some(Uuid::new_v4());
        let owner = user(org, UserRole::User);
        let thing = thing_of(&owner);

        assert!(authorise_thing(&owner, &thing, org, Operation::Edit).is_ok());
        assert!(authorise_thing(&owner, &thing, org, Operation::Delete).is_ok());
        assert!(authorise_thing(&owner, &thing, org, Operation::View).is_ok());
    }

    #[test]
    fn colleague_may_view_but_not_edit() {
        let org = Some(Uuid::new_v4());
        let owner = user(org, UserRole::User);
        let colleague = user(org, UserRole::Admin);
        let thing = thing_of(&owner);

        assert!(authorise_thing(&colleague, &thing, org, Operation::View).is_ok());
        assert!(authorise_thing(&colleague, &thing, org, Operation::Edit).is_err());
        assert!(authorise_thing(&colleague, &thing, org, Operation::Delete).is_err());
    }

    #[test]
    fn stranger_from_another_organisation_sees_nothing() {
        let owner = user(Some(Uuid::new_v4()), UserRole::User);
        let stranger = user(Some(Uuid::new_v4()), UserRole::Admin);
        let thing = thing_of(&owner);

        assert!(
            authorise_thing(&stranger, &thing, owner.organisation_id, Operation::View).is_err()
        );
    }

    #[test]
    fn two_unattached_users_share_visibility() {
        // Igualdade de organização inclui ambos sem organização.
        let owner = user(None, UserRole::User);
        let other = user(None, UserRole::User);
        let thing = thing_of(&owner);

        assert!(authorise_thing(&other, &thing, None, Operation::View).is_ok());
        assert!(authorise_thing(&other, &thing, None, Operation::Edit).is_err());
    }

    #[test]
    fn users_view_colleagues_but_touch_only_themselves() {
        let org = Some(Uuid::new_v4());
        let actor = user(org, UserRole::User);
        let colleague = user(org, UserRole::User);
        let outsider = user(Some(Uuid::new_v4()), UserRole::User);

        assert!(authorise_user(&actor, &colleague, Operation::View).is_ok());
        assert!(authorise_user(&actor, &outsider, Operation::View).is_err());
        assert!(authorise_user(&actor, &colleague, Operation::Edit).is_err());
        assert!(authorise_user(&actor, &colleague, Operation::Delete).is_err());
        assert!(authorise_user(&actor, &actor, Operation::Edit).is_ok());
        assert!(authorise_user(&actor, &actor, Operation::Delete).is_ok());
    }

    #[test]
    fn organisation_mutations_are_admin_only() {
        let org_id = Uuid::new_v4();
        let admin = user(Some(org_id), UserRole::Admin);
        let member = user(Some(org_id), UserRole::User);
        let outsider = user(Some(Uuid::new_v4()), UserRole::Admin);

        assert!(authorise_organisation(&admin, org_id, Operation::View).is_ok());
        assert!(authorise_organisation(&admin, org_id, Operation::Edit).is_ok());
        assert!(authorise_organisation(&admin, org_id, Operation::Delete).is_ok());

        assert!(authorise_organisation(&member, org_id, Operation::View).is_ok());
        assert!(authorise_organisation(&member, org_id, Operation::Edit).is_err());
        assert!(authorise_organisation(&member, org_id, Operation::Delete).is_err());

        // Admin de outra organização não enxerga esta.
        assert!(authorise_organisation(&outsider, org_id, Operation::View).is_err());
        assert!(authorise_organisation(&outsider, org_id, Operation::Edit).is_err());
    }

    #[test]
    fn account_mutation_denies_foreign_ids_without_lookup() {
        let actor = user(None, UserRole::User);

        assert!(authorise_account_mutation(&actor, actor.id).is_ok());
        assert!(authorise_account_mutation(&actor, Uuid::new_v4()).is_err());
    }

    #[test]
    fn a_member_cannot_create_a_second_organisation() {
        let unattached = user(None, UserRole::User);
        let member = user(Some(Uuid::new_v4()), UserRole::Admin);

        assert!(authorise_organisation_create(&unattached).is_ok());
        assert!(authorise_organisation_create(&member).is_err());
    }
}
