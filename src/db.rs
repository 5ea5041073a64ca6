pub mod user_repo;
pub use user_repo::UserRepository;
pub mod organisation_repo;
pub use organisation_repo::OrganisationRepository;
pub mod thing_repo;
pub use thing_repo::ThingRepository;
