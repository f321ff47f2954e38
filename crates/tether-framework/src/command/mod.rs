//! CLI commands contributed by plugins.
//!
//! The host parses its own command line, picks the command name and hands the
//! remaining tokens to [`CommandRouter::dispatch`]. Handlers receive them as
//! [`Args`], or parsed with clap as [`Parsed<T>`] when the `command` feature
//! is enabled.

mod extractor;
#[cfg(feature = "command")]
mod parsed;
mod router;
mod split;

pub use extractor::{Args, CommandName};
#[cfg(feature = "command")]
pub use parsed::Parsed;
pub use router::{BoxedCommand, CommandRouter, CommandRouterBuilder};
pub use split::{parse_command_line, split_command_line};
