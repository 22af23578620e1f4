//! Roster HTTP - remote activity service over HTTP
//!
//! Implements [`roster_core::RosterService`] with `reqwest`:
//! - Activity names and emails are escaped as path segments and query values
//! - 2xx bodies are parsed as the success shape
//! - Non-2xx JSON bodies become rejections carrying the server `detail`
//! - Anything else (no response, unparsable body) is a transport failure

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod error;

pub use client::HttpRosterService;
pub use error::ClientBuildError;
