//! Errors raised while building, binding or unbinding CPE names

use crate::well_formed_name::Attribute;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classification of a [`CpeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller misuse: unknown attribute, wrong value shape
    IllegalArgument,
    /// Malformed external text
    Parse,
}

/// Errors that can occur when operating on CPE names
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CpeError {
    /// Attribute name outside the fixed set of eleven
    #[error("illegal attribute: {0}")]
    UnknownAttribute(String),
    /// Token is neither `ANY` nor `NA`
    #[error("illegal logical value: {0}")]
    InvalidLogicalValue(String),
    /// `part` was given a logical value
    #[error("part component cannot be a logical value")]
    LogicalPart,
    /// String value rejected by the attribute value grammar
    #[error("invalid component {value:?}: {reason}")]
    InvalidValue { value: String, reason: String },
    /// `part` string other than `a`, `o` or `h`
    #[error("part component must be one of 'a', 'o', 'h': {0:?}")]
    InvalidPart(String),
    /// Name does not start with the scheme prefix of its binding
    #[error("name must start with {expected:?}: {input}")]
    InvalidPrefix { expected: String, input: String },
    /// URI carries more than the seven legacy components
    #[error("found {extra} extra components in URI: {input}")]
    TooManyComponents { extra: usize, input: String },
    /// Formatted string without exactly eleven components
    #[error("expected 12 unquoted colons, found {found} in formatted string: {input}")]
    ComponentCount { found: usize, input: String },
    /// Formatted string with an empty component
    #[error("found empty component in formatted string: {0}")]
    EmptyComponent(String),
    /// Unquoted `*` or `?` away from the start or end of a value
    #[error("cannot have unquoted {wildcard} embedded in {input:?}")]
    EmbeddedWildcard { wildcard: char, input: String },
    /// Percent-encoded form outside the fixed table
    #[error("unknown percent-encoded form {form:?} in {input:?}")]
    UnknownEncoding { form: String, input: String },
    /// Backslash with nothing left to escape
    #[error("dangling escape at end of {0:?}")]
    DanglingEscape(String),
    /// Packed edition component without five tilde-delimited fields
    #[error("packed edition must hold 5 fields, found {found}: {input:?}")]
    EditionPacking { found: usize, input: String },
    /// Failure raised while assigning an attribute
    #[error("failed to set {attribute}")]
    Attribute {
        attribute: Attribute,
        #[source]
        source: Box<CpeError>,
    },
}

impl CpeError {
    /// Classify this error as caller misuse or malformed input
    pub fn kind(&self) -> ErrorKind {
        match self {
            CpeError::UnknownAttribute(_)
            | CpeError::InvalidLogicalValue(_)
            | CpeError::LogicalPart => ErrorKind::IllegalArgument,
            CpeError::Attribute { source, .. } => source.kind(),
            _ => ErrorKind::Parse,
        }
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    /// The innermost error, past any attribute context
    pub fn root_cause(&self) -> &CpeError {
        match self {
            CpeError::Attribute { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn invalid_value(value: &str, reason: &str) -> Self {
        CpeError::InvalidValue {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn in_attribute(self, attribute: Attribute) -> Self {
        CpeError::Attribute {
            attribute,
            source: Box::new(self),
        }
    }
}

pub type Result<T, E = CpeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            CpeError::UnknownAttribute("foo".into()).kind(),
            ErrorKind::IllegalArgument
        );
        assert_eq!(CpeError::LogicalPart.kind(), ErrorKind::IllegalArgument);
        assert_eq!(CpeError::InvalidPart("z".into()).kind(), ErrorKind::Parse);
        assert!(CpeError::EmptyComponent("cpe:2.3::".into()).is_parse());
    }

    #[test]
    fn test_attribute_context_keeps_cause() {
        let err = CpeError::InvalidPart("z".into()).in_attribute(Attribute::Part);
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.to_string(), "failed to set part");
        assert_eq!(err.root_cause(), &CpeError::InvalidPart("z".into()));

        let source = err.source().unwrap();
        assert!(source.to_string().contains("'a', 'o', 'h'"));
    }

    #[test]
    fn test_logical_part_under_context_is_illegal_argument() {
        let err = CpeError::LogicalPart.in_attribute(Attribute::Part);
        assert_eq!(err.kind(), ErrorKind::IllegalArgument);
    }
}
