pub mod notifier;
pub mod user_store;
