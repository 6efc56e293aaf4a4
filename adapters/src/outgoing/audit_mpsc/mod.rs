pub mod consumer;
pub mod tokio_mpsc;
