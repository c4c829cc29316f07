pub mod telegram;
pub mod types;

pub use telegram::{ChannelApi, ChannelError, TelegramClient};
pub use types::*;

#[cfg(test)]
pub use telegram::MockChannelApi;
