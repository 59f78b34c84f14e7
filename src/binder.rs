//! Binding WFNs to their textual forms
//!
//! - URI (CPE 2.2): `cpe:/a:microsoft:internet_explorer:8.0.6001:beta`
//! - Formatted string (CPE 2.3):
//!   `cpe:2.3:a:microsoft:internet_explorer:8.0.6001:beta:*:*:*:*:*:*`

use crate::well_formed_name::{Attribute, Value, WellFormedName};
use std::borrow::Cow;

/// The seven components of a CPE 2.2 URI
pub(crate) const URI_ATTRIBUTES: [Attribute; 7] = [
    Attribute::Part,
    Attribute::Vendor,
    Attribute::Product,
    Attribute::Version,
    Attribute::Update,
    Attribute::Edition,
    Attribute::Language,
];

/// Bind a WFN to a CPE 2.2 URI
///
/// The extended attributes are packed into the edition component as
/// `~edition~sw_edition~target_sw~target_hw~other` unless they all bind to
/// blanks. Trailing empty components are dropped.
pub fn bind_to_uri(wfn: &WellFormedName) -> String {
    let mut uri = String::from("cpe:/");

    for attribute in URI_ATTRIBUTES {
        let component = if attribute == Attribute::Edition {
            pack(
                &bind_value_for_uri(wfn.get(Attribute::Edition)),
                &bind_value_for_uri(wfn.get(Attribute::SwEdition)),
                &bind_value_for_uri(wfn.get(Attribute::TargetSw)),
                &bind_value_for_uri(wfn.get(Attribute::TargetHw)),
                &bind_value_for_uri(wfn.get(Attribute::Other)),
            )
        } else {
            bind_value_for_uri(wfn.get(attribute))
        };
        uri.push_str(&component);
        uri.push(':');
    }

    let uri = uri.trim_end_matches(':').to_string();
    tracing::trace!(%uri, "bound WFN to URI");
    uri
}

/// Bind a WFN to a CPE 2.3 formatted string
///
/// A value ending in a lone `\` is written as is, so the following colon
/// reads as quoted and the result does not unbind.
pub fn bind_to_fs(wfn: &WellFormedName) -> String {
    let fs = std::iter::once("cpe:2.3".to_string())
        .chain(wfn.iter().map(|(_, value)| bind_value_for_fs(value)))
        .collect::<Vec<_>>()
        .join(":");
    tracing::trace!(%fs, "bound WFN to formatted string");
    fs
}

fn bind_value_for_uri(value: &Value) -> String {
    match value {
        Value::Logical(lv) if lv.is_any() => String::new(),
        Value::Logical(_) => "-".to_string(),
        Value::String(s) => transform_for_uri(s),
    }
}

fn bind_value_for_fs(value: &Value) -> String {
    match value {
        Value::Logical(lv) if lv.is_any() => "*".to_string(),
        Value::Logical(_) => "-".to_string(),
        Value::String(s) => process_quoted_chars(s),
    }
}

/// Drop the quoting of `.`, `-` and `_`; every other escape is kept
fn process_quoted_chars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('.' | '-' | '_')) => result.push(next),
            Some(next) => {
                result.push('\\');
                result.push(next);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Percent-encode quoted characters and map unquoted wildcards
///
/// Alphanumerics and `_` pass through, `?` binds to `%01` and `*` to
/// `%02`. Any other unquoted character is dropped.
fn transform_for_uri(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_ascii_alphanumeric() || c == '_' => result.push(c),
            '\\' => {
                if let Some(next) = chars.next() {
                    result.push_str(&pct_encode(next));
                }
            }
            '?' => result.push_str("%01"),
            '*' => result.push_str("%02"),
            _ => {}
        }
    }
    result
}

/// Percent-encodings of the quoted punctuation characters
pub(crate) const PERCENT_ENCODED: [(char, &str); 29] = [
    ('!', "%21"),
    ('"', "%22"),
    ('#', "%23"),
    ('$', "%24"),
    ('%', "%25"),
    ('&', "%26"),
    ('\'', "%27"),
    ('(', "%28"),
    (')', "%29"),
    ('*', "%2a"),
    ('+', "%2b"),
    (',', "%2c"),
    ('/', "%2f"),
    (':', "%3a"),
    (';', "%3b"),
    ('<', "%3c"),
    ('=', "%3d"),
    ('>', "%3e"),
    ('?', "%3f"),
    ('@', "%40"),
    ('[', "%5b"),
    ('\\', "%5c"),
    (']', "%5d"),
    ('^', "%5e"),
    ('`', "%60"),
    ('{', "%7b"),
    ('|', "%7c"),
    ('}', "%7d"),
    ('~', "%7e"),
];

/// Percent-encoding of a quoted character in a URI
///
/// `-` and `.` bind without encoding, as does any character outside the
/// punctuation table.
pub fn pct_encode(c: char) -> Cow<'static, str> {
    PERCENT_ENCODED
        .iter()
        .find(|&&(plain, _)| plain == c)
        .map_or_else(|| Cow::Owned(c.to_string()), |&(_, encoded)| Cow::Borrowed(encoded))
}

/// Pack the edition and extended attributes into one URI component
fn pack(ed: &str, sw_ed: &str, t_sw: &str, t_hw: &str, oth: &str) -> String {
    if sw_ed.is_empty() && t_sw.is_empty() && t_hw.is_empty() && oth.is_empty() {
        return ed.to_string();
    }
    format!("~{}~{}~{}~{}~{}", ed, sw_ed, t_sw, t_hw, oth)
}
