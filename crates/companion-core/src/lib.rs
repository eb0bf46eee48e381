pub mod ports;
pub mod event_bus;
pub mod epoch;
pub mod auth;
pub mod chat;
pub mod camera;
pub mod practice;
pub mod modals;
pub mod dashboard;

#[cfg(test)]
mod tests;
