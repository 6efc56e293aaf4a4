pub mod audit_mpsc;
pub mod memory;
pub mod postgres_sqlx;
