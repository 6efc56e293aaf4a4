pub mod user_store_memory;
