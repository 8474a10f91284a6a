use serde::Serialize;
use std::fmt;

/// What a run reports while it executes.
///
/// Exactly one terminal event (`Completed` or `Stopped`) is emitted per
/// run, after one `Progress` per attempted code, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// A code is about to be tried.
    Progress { code: String },
    /// The whole list was exhausted.
    Completed { successful_codes: Vec<String> },
    /// The run was cancelled before exhausting the list.
    Stopped,
    /// The run aborted on an unexpected failure.
    Error { message: String },
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEvent::Progress { code } => write!(f, "Testing code: {}", code),
            RunEvent::Completed { successful_codes } => {
                if successful_codes.is_empty() {
                    write!(f, "Testing completed!")
                } else {
                    write!(
                        f,
                        "Testing completed! Codes that looked successful: {}",
                        successful_codes.join(", ")
                    )
                }
            }
            RunEvent::Stopped => write!(f, "Testing stopped"),
            RunEvent::Error { message } => write!(f, "Error: {}", message),
        }
    }
}
