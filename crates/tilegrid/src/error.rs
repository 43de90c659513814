//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid grid arguments, invalid pipeline configuration, unparsable tile/ROI labels,
//! IO, and generic errors.
//!
//! A grid with zero tiles along some axis is not an error: enumeration simply yields nothing.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot parse label '{label}': expected at least two digit groups")]
    Parse { label: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn parse(label: impl Into<String>) -> Self {
        Error::Parse {
            label: label.into(),
        }
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
    fn parse_error_names_the_label() {
        let err = Error::parse("ROIx");
        assert_eq!(
            err.to_string(),
            "cannot parse label 'ROIx': expected at least two digit groups"
        );
    }

    #[test]
    fn invalid_argument_display_has_prefix() {
        let err = Error::invalid_argument("tile_shape must be > 0");
        assert!(matches!(err, Error::InvalidArgument(ref msg) if msg == "tile_shape must be > 0"));
        assert_eq!(err.to_string(), "invalid argument: tile_shape must be > 0");
    }
}
