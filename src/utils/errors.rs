//! Error types used across the crate

use std::fmt;

/// The main Error type of `isoviz`
///
/// It is used for invalid payloads (e.g. a gene without a model transcript)
/// and for everything that does not have a more specific error.
///
/// # Examples
///
/// ```rust
/// use isoviz::utils::errors::VizError;
///
/// let err = VizError::new("no model transcript in gene payload");
/// assert_eq!(err.to_string(), "no model transcript in gene payload");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VizError {
    message: String,
}

impl VizError {
    pub fn new<S: ToString>(message: S) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl std::error::Error for VizError {}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for VizError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: format!("invalid payload: {err}"),
        }
    }
}

/// Error during reading or writing of SVG output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadWriteError {
    message: String,
}

impl ReadWriteError {
    pub fn new(err: std::io::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl std::error::Error for ReadWriteError {}

impl fmt::Display for ReadWriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<std::io::Error> for ReadWriteError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err)
    }
}
