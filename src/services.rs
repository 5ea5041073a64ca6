pub mod auth;
pub use auth::AuthService;
pub mod policy;
pub mod organisation_service;
pub use organisation_service::OrganisationService;
pub mod thing_service;
pub use thing_service::ThingService;
pub mod user_service;
pub use user_service::UserService;
