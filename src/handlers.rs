pub mod auth;
pub mod organisations;
pub mod things;
pub mod users;
