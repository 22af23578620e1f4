//! Roster CLI - terminal front end
//!
//! Text rendering of the presentation model and a [`roster_core::RenderSurface`]
//! that prints it, shared by the one-shot subcommands and the interactive
//! session of the `roster` binary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod render;
pub mod session;
pub mod terminal;

pub use session::{Command, ParseError};
pub use terminal::{spawn_notification_printers, Console, TerminalSurface};
