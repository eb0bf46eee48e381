pub mod auth;
pub mod message;
pub mod session;
pub mod event;
pub mod emotion;
pub mod mood;
pub mod wellness;
pub mod practice;
pub mod profile;
pub mod config;
pub mod error;


pub use error::CompanionError;
pub type Result<T> = std::result::Result<T, CompanionError>;
