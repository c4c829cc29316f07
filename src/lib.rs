//! Polls car-listing sources, keeps the first few deals and posts them to a
//! Telegram channel, either on demand or from a schedule.

pub mod api;
pub mod core;
pub mod messaging;
pub mod pipeline;
pub mod scanner;
pub mod server;
