// keep public for OpenAPI docs
pub mod admin;
pub mod ban;
pub mod health;
