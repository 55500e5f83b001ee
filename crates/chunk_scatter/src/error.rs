//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, instance creation failures reported by an
//! [`crate::scatter::factory::InstanceFactory`], unknown instance handles, and generic errors.
//!
//! A candidate cell rejected for spacing is not an error; see
//! [`crate::scatter::planner::CellOutcome`].
use thiserror::Error;

use crate::scatter::factory::InstanceHandle;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to create instance of '{kind}': {reason}")]
    ResourceCreation { kind: String, reason: String },

    #[error("unknown instance handle {0:?}")]
    UnknownInstance(InstanceHandle),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::ResourceCreation`] value.
    pub fn resource(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ResourceCreation {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error aborts startup, as opposed to failing a single placement.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InvalidConfig(_))
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn from_str_allocates_owned_message() {
        let err: Error = "issue".into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "issue"));
    }

    #[test]
    fn resource_helper_formats_kind_and_reason() {
        let err = Error::resource("tree", "pool exhausted");
        assert_eq!(
            err.to_string(),
            "failed to create instance of 'tree': pool exhausted"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn invalid_config_is_fatal() {
        assert!(Error::InvalidConfig("chunk_size must be > 0".into()).is_fatal());
    }
}
