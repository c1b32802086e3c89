//! Messenger-facing types: inbound updates, outbound replies and the port the
//! Telegram adapter implements.

pub mod port;
pub mod throttled;
pub mod types;
