pub mod client;
pub mod classifier;
pub mod processor;
pub mod monitor;

pub use client::{TronClient, API_KEY_HEADER};
pub use classifier::TransferClassifier;
pub use processor::TransferProcessor;
pub use monitor::{PollSummary, TransactionMonitor};
