pub mod user_store_postgres;
pub mod utils;
