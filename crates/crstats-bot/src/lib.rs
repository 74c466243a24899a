//! # crstats bot
//!
//! Discord bot answering prefix commands with Clash Royale player statistics
//! and decks.
//!
//! This is the binary crate that wires configuration, logging, the statistics
//! client and the command dispatcher to a serenity gateway connection through
//! the Poise framework.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod cli;
pub mod error;
pub mod session;

pub use bot::*;
pub use cli::*;
pub use error::*;
pub use session::*;
