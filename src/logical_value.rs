//! Logical attribute values
//!
//! A WFN attribute that is not bound to a string holds one of two logical
//! values: `ANY` (no constraint) or `NA` (not applicable).

use crate::error::CpeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalValue {
    #[serde(rename = "ANY")]
    Any,
    #[serde(rename = "NA")]
    Na,
}

impl LogicalValue {
    /// Parse a logical value token
    ///
    /// The tokens `ANY` and `NA` are accepted in any case; every other
    /// token is an illegal argument.
    pub fn new(token: &str) -> Result<Self, CpeError> {
        if token.eq_ignore_ascii_case("ANY") {
            Ok(LogicalValue::Any)
        } else if token.eq_ignore_ascii_case("NA") {
            Ok(LogicalValue::Na)
        } else {
            Err(CpeError::InvalidLogicalValue(token.to_string()))
        }
    }

    pub fn is_any(self) -> bool {
        self == LogicalValue::Any
    }

    pub fn is_na(self) -> bool {
        self == LogicalValue::Na
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogicalValue::Any => "ANY",
            LogicalValue::Na => "NA",
        }
    }
}

impl FromStr for LogicalValue {
    type Err = CpeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalValue::new(s)
    }
}

impl fmt::Display for LogicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
