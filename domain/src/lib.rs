pub mod auth;
pub mod ban;
pub mod error;
pub mod events;
