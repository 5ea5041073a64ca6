pub mod auth;
pub mod organisation;
pub mod thing;
