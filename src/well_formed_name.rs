//! Well-Formed Names
//!
//! A WFN is the internal, attribute-based form of a CPE name. It holds a
//! value for each of eleven fixed attributes, in a fixed order. Values are
//! either a [`LogicalValue`] or a string in the quoted attribute grammar,
//! e.g. `8\.0\.6001` or `internet_explorer????`.

use crate::binder;
use crate::error::{CpeError, Result};
use crate::escape;
use crate::logical_value::LogicalValue;
use crate::unbinder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The eleven WFN attributes, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Part,
    Vendor,
    Product,
    Version,
    Update,
    Edition,
    Language,
    SwEdition,
    TargetSw,
    TargetHw,
    Other,
}

impl Attribute {
    pub const COUNT: usize = 11;

    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::Part,
        Attribute::Vendor,
        Attribute::Product,
        Attribute::Version,
        Attribute::Update,
        Attribute::Edition,
        Attribute::Language,
        Attribute::SwEdition,
        Attribute::TargetSw,
        Attribute::TargetHw,
        Attribute::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Part => "part",
            Attribute::Vendor => "vendor",
            Attribute::Product => "product",
            Attribute::Version => "version",
            Attribute::Update => "update",
            Attribute::Edition => "edition",
            Attribute::Language => "language",
            Attribute::SwEdition => "sw_edition",
            Attribute::TargetSw => "target_sw",
            Attribute::TargetHw => "target_hw",
            Attribute::Other => "other",
        }
    }

    /// Position of this attribute in canonical order
    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Attribute {
    type Err = CpeError;

    fn from_str(s: &str) -> Result<Self> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CpeError::UnknownAttribute(s.to_string()))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attribute value: a logical value or a quoted string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Logical(LogicalValue),
    String(String),
}

static ANY_VALUE: Value = Value::Logical(LogicalValue::Any);

impl Value {
    pub const ANY: Value = Value::Logical(LogicalValue::Any);
    pub const NA: Value = Value::Logical(LogicalValue::Na);

    pub fn as_logical(&self) -> Option<LogicalValue> {
        match self {
            Value::Logical(lv) => Some(*lv),
            Value::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Logical(_) => None,
        }
    }

    pub fn is_any(&self) -> bool {
        self.as_logical().is_some_and(LogicalValue::is_any)
    }

    pub fn is_na(&self) -> bool {
        self.as_logical().is_some_and(LogicalValue::is_na)
    }
}

impl From<LogicalValue> for Value {
    fn from(lv: LogicalValue) -> Self {
        Value::Logical(lv)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Logical(lv) => write!(f, "{}", lv),
            Value::String(s) => f.write_str(s),
        }
    }
}

/// Characters in the Unicode punctuation categories, restricted to ASCII.
/// `$ + < = > ^ ` | ~` are symbols, not punctuation.
fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '!' | '"'
            | '#'
            | '%'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | ','
            | '-'
            | '.'
            | '/'
            | ':'
            | ';'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '_'
            | '{'
            | '}'
    )
}

/// Invisible formatting characters (Unicode category Cf)
fn is_format_character(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

/// Check a string attribute value against the quoted value grammar
///
/// Control characters, formatting characters and whitespace are rejected
/// anywhere in the value.
pub fn validate_string_value(value: &str) -> Result<()> {
    if value.starts_with("**") || value.ends_with("**") {
        return Err(CpeError::invalid_value(
            value,
            "cannot contain more than one * in sequence",
        ));
    }

    let mut prev = ' ';
    for (i, c) in value.char_indices() {
        if c.is_control() || is_format_character(c) {
            return Err(CpeError::invalid_value(value, "non printable character"));
        }
        if c.is_whitespace() {
            return Err(CpeError::invalid_value(value, "cannot contain whitespace"));
        }
        if is_punctuation(c) && prev != '\\' && c != '\\' {
            if c == '*' && i != 0 && i != value.len() - 1 {
                return Err(CpeError::EmbeddedWildcard {
                    wildcard: '*',
                    input: value.to_string(),
                });
            }
            if c != '*' && c != '?' && c != '_' {
                return Err(CpeError::invalid_value(
                    value,
                    "cannot contain unquoted punctuation",
                ));
            }
        }
        prev = c;
    }

    if value == "?" {
        return Ok(());
    }
    if value.contains('?') && escape::contains_questions(value.trim_matches('?')) {
        return Err(CpeError::EmbeddedWildcard {
            wildcard: '?',
            input: value.to_string(),
        });
    }

    if value == "*" {
        return Err(CpeError::invalid_value(value, "cannot be a single *"));
    }
    if value == r"\-" {
        return Err(CpeError::invalid_value(value, "cannot be a quoted hyphen"));
    }

    Ok(())
}

/// A Well-Formed Name as defined by CPE 2.3
///
/// Unbound attributes read as `ANY`. Equality and hashing go through
/// [`WellFormedName::get`], so an unbound attribute equals one bound to `ANY`.
#[derive(Debug, Clone, Eq)]
pub struct WellFormedName {
    values: [Option<Value>; Attribute::COUNT],
}

impl WellFormedName {
    /// Create a WFN with every attribute but `part` bound to `ANY`
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|i| (i != Attribute::Part.index()).then_some(Value::ANY)),
        }
    }

    /// Create a WFN with no attribute bound
    pub fn empty() -> Self {
        Self {
            values: Default::default(),
        }
    }

    /// Value of `attribute`, or `ANY` when unbound
    pub fn get(&self, attribute: Attribute) -> &Value {
        self.values[attribute.index()].as_ref().unwrap_or(&ANY_VALUE)
    }

    pub fn is_bound(&self, attribute: Attribute) -> bool {
        self.values[attribute.index()].is_some()
    }

    /// Bind `attribute` to `value`
    ///
    /// String values must pass [`validate_string_value`]; `part` only takes
    /// the strings `a`, `o` and `h`. On error the name is left unchanged.
    pub fn set(&mut self, attribute: Attribute, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match &value {
            Value::Logical(_) if attribute == Attribute::Part => {
                return Err(CpeError::LogicalPart);
            }
            Value::Logical(_) => {}
            Value::String(s) => {
                validate_string_value(s)?;
                if attribute == Attribute::Part && !matches!(s.as_str(), "a" | "o" | "h") {
                    return Err(CpeError::InvalidPart(s.clone()));
                }
            }
        }
        self.values[attribute.index()] = Some(value);
        Ok(())
    }

    /// Bind an attribute given by name; `None` binds `ANY`
    pub fn set_attribute(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        let attribute = name.parse::<Attribute>()?;
        self.set(attribute, value.unwrap_or(Value::ANY))
    }

    /// Chaining form of [`WellFormedName::set`]
    pub fn with(mut self, attribute: Attribute, value: impl Into<Value>) -> Result<Self> {
        self.set(attribute, value)?;
        Ok(self)
    }

    /// Attributes with their values, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &Value)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    /// Bind to the CPE 2.2 URI form
    pub fn to_uri(&self) -> String {
        binder::bind_to_uri(self)
    }

    /// Bind to the CPE 2.3 formatted string form
    pub fn to_formatted_string(&self) -> String {
        binder::bind_to_fs(self)
    }
}

impl Default for WellFormedName {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for WellFormedName {
    fn eq(&self, other: &Self) -> bool {
        Attribute::ALL
            .into_iter()
            .all(|a| self.get(a) == other.get(a))
    }
}

impl Hash for WellFormedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for a in Attribute::ALL {
            self.get(a).hash(state);
        }
    }
}

impl fmt::Display for WellFormedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("wfn:[")?;
        for (i, (attribute, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Value::Logical(lv) => write!(f, "{}={}", attribute, lv)?,
                Value::String(s) => write!(f, "{}=\"{}\"", attribute, s)?,
            }
        }
        f.write_str("]")
    }
}

/// Parses either binding: `cpe:2.3:` prefixed text as a formatted string,
/// anything else as a URI
impl FromStr for WellFormedName {
    type Err = CpeError;

    fn from_str(s: &str) -> Result<Self> {
        if s.to_ascii_lowercase().starts_with("cpe:2.3:") {
            unbinder::unbind_fs(s)
        } else {
            unbinder::unbind_uri(s)
        }
    }
}

impl Serialize for WellFormedName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_formatted_string())
    }
}

impl<'de> Deserialize<'de> for WellFormedName {
    fn deserialize<D>(deserializer: D) -> std::result::Result<WellFormedName, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
