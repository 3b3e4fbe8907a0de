//! Command output. Every command finishes with one serializable record;
//! `--json` prints the record itself, otherwise a short human line is
//! rendered from it.

use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    /// Commands with a richer text layout check this and print directly.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }

    /// The text line is rendered lazily; in json mode it is never built.
    pub fn emit<T, F>(self, record: &T, render: F) -> AppResult<()>
    where
        T: Serialize,
        F: FnOnce() -> String,
    {
        match self {
            Self::Text => println!("{}", render()),
            Self::Json => println!("{}", serde_json::to_string_pretty(record)?),
        }
        Ok(())
    }
}
