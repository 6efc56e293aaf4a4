pub mod admin;
pub mod ban;
