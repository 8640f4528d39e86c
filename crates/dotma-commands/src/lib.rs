//! # Dotma Commands
//!
//! Built-in command set and passive triggers for Dotma Bot.
//!
//! Commands are registered through an explicit start-up manifest (see
//! [`default_commands`]) rather than any runtime module scanning, so
//! key uniqueness is validated once at load time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod announce;
pub mod help;
pub mod manifest;
pub mod ping;
pub mod shop;
pub mod targets;
pub mod triggers;

pub use announce::Announcer;
pub use manifest::{default_commands, CommandDeps};
pub use shop::Item;
