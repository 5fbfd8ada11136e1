use thiserror::Error;

/// Reasons a piece of text is not accepted as a chat handle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("handle is empty")]
    Empty,

    #[error("handle must start with '@': {input}")]
    MissingMarker { input: String },

    #[error("handle has no name after '@'")]
    MissingName,

    #[error("handle contains invalid character {ch:?}: {input}")]
    InvalidCharacter { input: String, ch: char },
}

impl Error {
    #[must_use]
    pub fn missing_marker(input: impl Into<String>) -> Self {
        Self::MissingMarker {
            input: input.into(),
        }
    }

    #[must_use]
    pub fn invalid_character(input: impl Into<String>, ch: char) -> Self {
        Self::InvalidCharacter {
            input: input.into(),
            ch,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
