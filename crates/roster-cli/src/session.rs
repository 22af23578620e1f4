//! Interactive session commands
//!
//! One line of input maps to one controller operation. Activity names may
//! contain spaces, so they always come last on the line.

use crate::render::categories_text;
use crate::terminal::Console;
use roster_core::projector::project_categories;
use roster_core::{Action, Filter, SyncController};

pub const HELP: &str = "\
Commands:
  list                               reload the roster with the current filter
  filter <category|All>              change the category filter
  categories                         show the category filter options
  signup <email> <activity>          sign a student up
  unregister <email> <activity>      remove a student
  attend <email> <date> <activity>   record attendance (date as YYYY-MM-DD)
  report <email>                     show a student's activity report
  attendance [--email <email>] <activity>
                                     show attendance for an activity
  help                               show this text
  quit                               leave the session
";

/// A parsed session line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Filter(String),
    Categories,
    Submit(Action),
    Report(String),
    Attendance {
        activity: String,
        email: Option<String>,
    },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command {0:?}; type `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line
    ///
    /// # Errors
    /// `ParseError` for unknown commands or missing arguments
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match head {
            "list" | "refresh" => Self::List,
            "filter" => Self::Filter(required(&rest, "filter <category|All>")?),
            "categories" => Self::Categories,
            "signup" | "unregister" => {
                let usage = if head == "signup" {
                    "signup <email> <activity>"
                } else {
                    "unregister <email> <activity>"
                };
                let [email, activity @ ..] = rest.as_slice() else {
                    return Err(ParseError::Usage(usage));
                };
                let activity = required(activity, usage)?;
                Self::Submit(if head == "signup" {
                    Action::signup(activity, *email)
                } else {
                    Action::unregister(activity, *email)
                })
            }
            "attend" => {
                let usage = "attend <email> <date> <activity>";
                let [email, date, activity @ ..] = rest.as_slice() else {
                    return Err(ParseError::Usage(usage));
                };
                Self::Submit(Action::record_attendance(
                    required(activity, usage)?,
                    *email,
                    *date,
                ))
            }
            "report" => match rest.as_slice() {
                [email] => Self::Report((*email).to_string()),
                _ => return Err(ParseError::Usage("report <email>")),
            },
            "attendance" => {
                let usage = "attendance [--email <email>] <activity>";
                match rest.as_slice() {
                    ["--email", email, activity @ ..] => Self::Attendance {
                        activity: required(activity, usage)?,
                        email: Some((*email).to_string()),
                    },
                    activity => Self::Attendance {
                        activity: required(activity, usage)?,
                        email: None,
                    },
                }
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Remaining words joined back into one name
fn required(words: &[&str], usage: &'static str) -> Result<String, ParseError> {
    if words.is_empty() {
        return Err(ParseError::Usage(usage));
    }
    Ok(words.join(" "))
}

/// Whether the session keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run `command` against `controller`
///
/// Mutating actions are spawned and report back through the notification
/// printers, so a slow call does not block the prompt.
pub async fn execute(controller: &SyncController, console: &Console, command: Command) -> Flow {
    match command {
        Command::List => {
            controller.refresh().await;
        }
        Command::Filter(value) => {
            if controller
                .select_filter(Filter::from_selection(&value))
                .await
                .is_none()
            {
                console.print(&format!("Filter already set to {value}\n"));
            }
        }
        Command::Categories => {
            let options = project_categories(&controller.view().catalog, &controller.current_filter());
            console.print(&categories_text(&options));
        }
        Command::Submit(action) => {
            drop(controller.spawn(action));
        }
        Command::Report(email) => {
            controller.request_report(&email).await;
        }
        Command::Attendance { activity, email } => {
            controller.lookup_attendance(&activity, email.as_deref()).await;
        }
        Command::Help => console.print(HELP),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}
