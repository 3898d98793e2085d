//! # Vouch Config
//!
//! Type-safe configuration management for Vouch Bot.
//!
//! Configuration is read from a YAML file, overridden from the environment
//! and validated before the bot connects.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
