pub mod auth;
pub mod nav;
pub mod chat;
pub mod camera;
pub mod wellness;
pub mod modals;
pub mod practice;
pub mod toasts;
