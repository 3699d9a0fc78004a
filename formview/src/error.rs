use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    // network failure before any response arrived
    Transport(String),
    // non-OK status with a well-formed `{"error": ...}` body
    Server { status: u16, message: String },
    // non-OK status whose body could not be read as an error payload
    MalformedErrorBody { status: u16, details: String },
    Template(String),
    Config(String),
    Js(String),
}

impl FormError {
    /// Text meant for the user, when the error carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            FormError::Transport(msg) => Some(msg),
            FormError::Server { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Transport(msg) => write!(f, "Transport error: {}", msg),
            FormError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            FormError::MalformedErrorBody { status, details } => {
                write!(f, "Malformed error body ({}): {}", status, details)
            }
            FormError::Template(msg) => write!(f, "Template error: {}", msg),
            FormError::Config(msg) => write!(f, "Config error: {}", msg),
            FormError::Js(msg) => write!(f, "JsError: {}", msg),
        }
    }
}

impl Error for FormError {}

impl From<serde_yaml::Error> for FormError {
    fn from(error: serde_yaml::Error) -> Self {
        FormError::Config(error.to_string())
    }
}

impl From<serde_json::Error> for FormError {
    fn from(error: serde_json::Error) -> Self {
        FormError::Config(error.to_string())
    }
}
