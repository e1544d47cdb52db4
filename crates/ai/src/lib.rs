//! Command-line front end of the Zappy artificial intelligence.
//!
//! This crate turns the arguments passed to `zappy_ai` into a validated [`args::Configuration`]
//! that the game client consumes.

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod args;
pub mod logging;
