//! # Dotma Bot
//!
//! The binary crate: gateway client, message event handler feeding the
//! dispatcher, tracing initialization, and the debug-channel log relay.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod discord;
pub mod error;
pub mod logging;

pub use bot::*;
pub use error::*;
