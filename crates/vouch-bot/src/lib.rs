//! # Vouch Bot
//!
//! Discord bot that records member vouches and can re-post a guild's vouch
//! history.
//!
//! This is the main binary crate that wires configuration, logging, the vouch
//! store and the Poise framework together.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod error;

pub use bot::*;
pub use error::*;
