//! # Dotma Store
//!
//! In-memory implementation of the persistence collaborator traits.
//!
//! Backed by concurrent maps so currency increments and access-level
//! writes are atomic under concurrent dispatch cycles. The dispatcher
//! and the built-in commands only ever see the trait objects.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod memory;

pub use memory::*;
