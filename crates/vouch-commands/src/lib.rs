//! # Vouch Commands
//!
//! Slash commands and the handlers behind them.
//!
//! The handlers in [`submission`] and [`restore`] hold the command logic and
//! talk to Discord only through the capability traits in [`traits`], which
//! [`discord`] implements over serenity. The poise commands in [`vouch`] and
//! [`restore_vouches`] are thin wrappers that check permissions, call a
//! handler and reply.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod discord;
pub mod framework;
pub mod messages;
pub mod permissions;
pub mod restore;
pub mod restore_vouches;
pub mod submission;
pub mod traits;
pub mod vouch;

pub use framework::*;
pub use permissions::*;
pub use restore::*;
pub use submission::*;
pub use traits::*;
