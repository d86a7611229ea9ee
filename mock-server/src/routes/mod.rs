pub mod account;
pub mod auth;
pub mod photo;
pub mod profile;
