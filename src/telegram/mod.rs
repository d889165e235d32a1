pub mod client;
pub mod notifier;

pub use client::{ParseMode, TelegramClient};
pub use notifier::Notifier;
