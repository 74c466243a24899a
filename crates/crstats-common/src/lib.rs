//! # crstats common
//!
//! Shared types, utilities, and common functionality for the stats bot.
//!
//! This crate provides the foundational types used across all other crates in
//! the workspace: id newtypes, the inbound message and embed models, the
//! [`ChatSession`] capability the command layer talks to, the error type, and
//! logging setup.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod embed;
pub mod error;
pub mod logging;
pub mod session;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use embed::*;
pub use error::*;
pub use session::*;
pub use types::*;
pub use utils::*;
