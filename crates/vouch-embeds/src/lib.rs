//! # Vouch Embeds
//!
//! Rendering of vouches into notification payloads.
//!
//! The payload types here mirror a Discord embed but carry no platform
//! dependency, so formatting stays a pure function that can be tested without
//! a gateway connection. Conversion to the wire type happens at the edge.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod formatter;
pub mod payload;
pub mod stars;

pub use formatter::*;
pub use payload::*;
pub use stars::*;
