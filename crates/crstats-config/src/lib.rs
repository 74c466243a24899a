//! # crstats config
//!
//! Configuration management for the stats bot.
//!
//! The configuration is a small JSON document loaded once at startup and passed
//! explicitly to the components that need it. There is no live reload.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
