use serde::{Deserialize, Serialize};

/// Errors returned by the heapdb storage layer. All of them are recoverable:
/// a failing operation never leaves a page partially mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Error {
    /// The record (plus its directory entry) does not fit in the page's free
    /// space. The caller should retry on another page.
    InsufficientSpace { needed: usize, available: usize },
    /// The record id names another page, an out-of-range slot, or a deleted
    /// slot. Carries the record id as `page:slot`.
    RecordNotFound(String),
    /// The page image is structurally inconsistent.
    InvalidData(String),
    /// Invalid user input, e.g. a buffer of the wrong size.
    InvalidInput(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InsufficientSpace { needed, available } => {
                write!(f, "insufficient space: need {needed} bytes, {available} available")
            }
            Error::RecordNotFound(rid) => write!(f, "record not found: {rid}"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

/// Constructs an Error::InvalidData for the given format string.
#[macro_export]
macro_rules! errdata {
    ($($args:tt)*) => { $crate::Error::InvalidData(format!($($args)*)).into() };
}

/// Constructs an Error::InvalidInput for the given format string.
#[macro_export]
macro_rules! errinput {
    ($($args:tt)*) => { $crate::Error::InvalidInput(format!($($args)*)).into() };
}

/// A heapdb Result returning Error.
pub type Result<T> = std::result::Result<T, Error>;

impl<T> From<Error> for Result<T> {
    fn from(error: Error) -> Self {
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_data() -> Result<()> {
        errdata!("slot {} points past the page", 3)
    }

    fn invalid_input() -> Result<u32> {
        errinput!("expected {} bytes, got {}", 4096, 12)
    }

    #[test]
    fn test_macros_return_err() {
        assert_eq!(
            invalid_data(),
            Err(Error::InvalidData("slot 3 points past the page".to_string()))
        );
        assert_eq!(
            invalid_input(),
            Err(Error::InvalidInput("expected 4096 bytes, got 12".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let err = Error::InsufficientSpace {
            needed: 108,
            available: 40,
        };
        assert_eq!(err.to_string(), "insufficient space: need 108 bytes, 40 available");
        assert_eq!(
            Error::RecordNotFound("1:7".to_string()).to_string(),
            "record not found: 1:7"
        );
    }
}
