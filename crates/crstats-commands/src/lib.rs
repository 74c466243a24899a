//! # crstats commands
//!
//! Text command handling for the stats bot.
//!
//! Inbound messages go through the [`Dispatcher`], which strips the prefix,
//! applies the per-user [`CooldownTable`], resolves the command in the
//! [`CommandRegistry`], checks ownership and permissions, and finally runs the
//! command's [`CommandHandler`]. Everything platform specific sits behind the
//! [`ChatSession`](crstats_common::ChatSession) capability.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod cooldown;
pub mod deck;
pub mod dispatcher;
pub mod framework;
pub mod guilds;
pub mod help;
pub mod info;
pub mod player_lookup;
pub mod registry;
pub mod replies;
pub mod stats;

pub use context::*;
pub use cooldown::*;
pub use dispatcher::*;
pub use framework::*;
pub use guilds::*;
pub use registry::*;
pub use replies::*;
