//! # Vouch Store
//!
//! Durable storage for vouches.
//!
//! Every guild owns an append-only ledger; all ledgers live in one JSON
//! document that is read whole and replaced whole. Appends inside one process
//! are serialised so concurrent submissions cannot overwrite each other.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod book;
pub mod store;

pub use book::*;
pub use store::*;
