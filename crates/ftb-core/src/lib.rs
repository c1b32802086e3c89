//! Core domain + application logic for the files Telegram bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the database
//! live behind ports (traits) implemented in adapter crates.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod i18n;
pub mod locks;
pub mod logging;
pub mod messaging;
pub mod parse;
pub mod pending;
pub mod store;

pub use errors::{Error, Result};
