//! # crstats api
//!
//! Access to the remote player-statistics service.
//!
//! Responses are loosely typed, so fields are pulled out of the decoded JSON tree
//! with a generic depth-first [`walk`] instead of fixed response structs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod deck;
pub mod player;
pub mod query;
pub mod traits;
pub mod walker;

pub use client::*;
pub use deck::*;
pub use player::*;
pub use query::*;
pub use traits::*;
pub use walker::*;
