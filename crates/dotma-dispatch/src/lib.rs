//! # Dotma Dispatch
//!
//! The command dispatch core of Dotma Bot.
//!
//! An inbound message either starts with a configured prefix, in which
//! case it is resolved against the command registry and executed with the
//! invoking user's persisted record, or it does not, in which case every
//! registered passive trigger is evaluated against it. The dispatcher
//! receives its collaborators (persistence, platform handle, registries)
//! at construction; nothing in this crate reads ambient globals.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod flow;
pub mod platform;
pub mod prefix;
pub mod registry;
pub mod state;
pub mod store;

pub use command::*;
pub use dispatcher::*;
pub use error::*;
pub use flow::*;
pub use platform::*;
pub use prefix::*;
pub use registry::*;
pub use state::*;
pub use store::*;
