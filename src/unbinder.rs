//! Unbinding textual CPE names into WFNs
//!
//! Both unbinders validate the overall shape of the name first and then
//! scan each component with an escape-aware state machine. Unbinding is
//! not a perfect inverse of binding: blanks and `*` collapse to `ANY`.

use crate::binder::{PERCENT_ENCODED, URI_ATTRIBUTES};
use crate::error::{CpeError, Result};
use crate::escape;
use crate::well_formed_name::{Attribute, Value, WellFormedName};

const URI_PREFIX: &str = "cpe:/";
const FS_PREFIX: &str = "cpe:2.3:";

/// Colons in a URI with all seven components present
const URI_MAX_COLONS: usize = 7;

/// Unquoted colons in a formatted string: scheme, version and 11 values
const FS_COLONS: usize = 12;

/// Attributes packed into the edition component of a URI
const PACKED_ATTRIBUTES: [Attribute; 5] = [
    Attribute::Edition,
    Attribute::SwEdition,
    Attribute::TargetSw,
    Attribute::TargetHw,
    Attribute::Other,
];

/// Unbind a CPE 2.2 URI into a WFN
///
/// Components are percent-decoded; a packed edition component
/// (`~ed~sw_edition~target_sw~target_hw~other`) is spread over the five
/// attributes it carries. Attributes missing from the URI stay unbound.
pub fn unbind_uri(uri: &str) -> Result<WellFormedName> {
    let result = validate_uri(uri).and_then(|()| unbind_uri_components(uri));
    if let Err(err) = &result {
        tracing::debug!(uri, error = %err, "rejected URI");
    }
    result
}

/// Unbind a CPE 2.3 formatted string into a WFN
pub fn unbind_fs(fs: &str) -> Result<WellFormedName> {
    let result = validate_fs(fs).and_then(|()| unbind_fs_fields(fs));
    if let Err(err) = &result {
        tracing::debug!(fs, error = %err, "rejected formatted string");
    }
    result
}

fn validate_uri(uri: &str) -> Result<()> {
    let lower = uri.to_ascii_lowercase();
    if !lower.starts_with(URI_PREFIX) {
        return Err(CpeError::InvalidPrefix {
            expected: URI_PREFIX.to_string(),
            input: uri.to_string(),
        });
    }
    let colons = lower.matches(':').count();
    if colons > URI_MAX_COLONS {
        return Err(CpeError::TooManyComponents {
            extra: colons - URI_MAX_COLONS,
            input: uri.to_string(),
        });
    }
    Ok(())
}

fn validate_fs(fs: &str) -> Result<()> {
    let lower = fs.to_ascii_lowercase();
    if !lower.starts_with(FS_PREFIX) {
        return Err(CpeError::InvalidPrefix {
            expected: FS_PREFIX.to_string(),
            input: fs.to_string(),
        });
    }

    let bytes = lower.as_bytes();
    let mut colons = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b != b':' || (i > 0 && bytes[i - 1] == b'\\') {
            continue;
        }
        colons += 1;
        if bytes.get(i + 1) == Some(&b':') {
            return Err(CpeError::EmptyComponent(fs.to_string()));
        }
    }
    if colons != FS_COLONS {
        return Err(CpeError::ComponentCount {
            found: colons,
            input: fs.to_string(),
        });
    }
    Ok(())
}

/// The `i`th colon-separated component of a URI, blank when absent
fn uri_component(uri: &str, i: usize) -> &str {
    match uri.split(':').nth(i) {
        Some(component) if i == 1 => component.trim_start_matches('/'),
        Some(component) => component,
        None => "",
    }
}

fn unbind_uri_components(uri: &str) -> Result<WellFormedName> {
    let mut wfn = WellFormedName::empty();

    for (i, attribute) in URI_ATTRIBUTES.into_iter().enumerate() {
        let component = uri_component(uri, i + 1);
        if attribute == Attribute::Edition && is_packed(component) {
            unpack(component, &mut wfn)?;
            continue;
        }
        decode(component)
            .and_then(|value| wfn.set(attribute, value))
            .map_err(|err| err.in_attribute(attribute))?;
    }

    Ok(wfn)
}

fn is_packed(edition: &str) -> bool {
    edition != "-" && edition.starts_with('~')
}

/// Spread a packed edition component over its five attributes
///
/// Everything after the fourth inner tilde belongs to `other`. The name is
/// only updated if all five values decode and validate.
pub fn unpack(packed: &str, wfn: &mut WellFormedName) -> Result<()> {
    let fields: Vec<&str> = packed
        .strip_prefix('~')
        .unwrap_or(packed)
        .splitn(PACKED_ATTRIBUTES.len(), '~')
        .collect();
    if fields.len() != PACKED_ATTRIBUTES.len() {
        return Err(CpeError::EditionPacking {
            found: fields.len(),
            input: packed.to_string(),
        });
    }

    let mut staged = wfn.clone();
    for (attribute, field) in PACKED_ATTRIBUTES.into_iter().zip(fields) {
        decode(field)
            .and_then(|value| staged.set(attribute, value))
            .map_err(|err| err.in_attribute(attribute))?;
    }
    *wfn = staged;
    Ok(())
}

/// Decode a percent-encoded URI component into an attribute value
///
/// A blank decodes to `ANY` and `-` to `NA`. Otherwise the component is
/// lowercased, `.`, `-` and `~` are quoted, `%01` becomes `?` and `%02`
/// becomes `*` where those wildcards are legal, and every other encoded
/// form becomes its quoted character.
pub fn decode(s: &str) -> Result<Value> {
    if s.is_empty() {
        return Ok(Value::ANY);
    }
    if s == "-" {
        return Ok(Value::NA);
    }

    let s = s.to_lowercase();
    let mut result = String::with_capacity(s.len());
    let mut idx = 0;
    // Set once a character other than an encoded `?` has been seen
    let mut embedded = false;

    while idx < s.len() {
        let Some(c) = s[idx..].chars().next() else {
            break;
        };

        if matches!(c, '.' | '-' | '~') {
            result.push('\\');
            result.push(c);
            idx += 1;
            embedded = true;
            continue;
        }
        if c != '%' {
            result.push(c);
            idx += c.len_utf8();
            embedded = true;
            continue;
        }

        let Some(form) = s.get(idx..idx + 3) else {
            return Err(CpeError::UnknownEncoding {
                form: s[idx..].to_string(),
                input: s.clone(),
            });
        };
        let last = idx + 3 == s.len();

        match form {
            "%01" => {
                let valid = idx == 0
                    || last
                    || (!embedded && idx >= 3 && s.get(idx - 3..idx) == Some("%01"))
                    || (embedded && s.get(idx + 3..idx + 6) == Some("%01"));
                if !valid {
                    return Err(CpeError::EmbeddedWildcard {
                        wildcard: '?',
                        input: s.clone(),
                    });
                }
                result.push('?');
                idx += 3;
                continue;
            }
            "%02" => {
                if idx != 0 && !last {
                    return Err(CpeError::EmbeddedWildcard {
                        wildcard: '*',
                        input: s.clone(),
                    });
                }
                result.push('*');
            }
            _ => {
                let plain = pct_decode(form).ok_or_else(|| CpeError::UnknownEncoding {
                    form: form.to_string(),
                    input: s.clone(),
                })?;
                result.push('\\');
                result.push(plain);
            }
        }
        idx += 3;
        embedded = true;
    }

    Ok(Value::String(result))
}

fn pct_decode(form: &str) -> Option<char> {
    PERCENT_ENCODED
        .iter()
        .find(|&&(_, encoded)| encoded == form)
        .map(|&(plain, _)| plain)
}

/// The formatted-string fields, split on colons not preceded by `\`
fn fs_fields(fs: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(FS_COLONS + 1);
    let mut rest = fs;
    while let Some(colon) = escape::unescaped_colon_index(rest) {
        fields.push(&rest[..colon]);
        rest = &rest[colon + 1..];
    }
    fields.push(rest);
    fields
}

fn unbind_fs_fields(fs: &str) -> Result<WellFormedName> {
    let mut wfn = WellFormedName::new();

    // Skip the scheme and the version tag
    for (attribute, field) in Attribute::ALL.into_iter().zip(fs_fields(fs).into_iter().skip(2)) {
        unbind_value_fs(field)
            .and_then(|value| wfn.set(attribute, value))
            .map_err(|err| err.in_attribute(attribute))?;
    }

    Ok(wfn)
}

fn unbind_value_fs(s: &str) -> Result<Value> {
    match s {
        "*" => Ok(Value::ANY),
        "-" => Ok(Value::NA),
        _ => add_quoting(s).map(Value::String),
    }
}

/// Quote the non-alphanumeric characters of a formatted-string value
///
/// Already-quoted pairs are copied as they are. An unquoted `*` may only
/// appear first or last; an unquoted `?` only in a leading or trailing run.
pub fn add_quoting(s: &str) -> Result<String> {
    let chars: Vec<char> = s.chars().collect();
    let last = chars.len().saturating_sub(1);
    let mut result = String::with_capacity(s.len() + 4);
    let mut idx = 0;
    // Set once a character other than `?` has been seen
    let mut embedded = false;

    while idx < chars.len() {
        let c = chars[idx];

        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
            idx += 1;
            embedded = true;
            continue;
        }

        if c == '\\' {
            let next = chars
                .get(idx + 1)
                .ok_or_else(|| CpeError::DanglingEscape(s.to_string()))?;
            result.push(c);
            result.push(*next);
            idx += 2;
            embedded = true;
            continue;
        }

        if c == '*' {
            if idx != 0 && idx != last {
                return Err(CpeError::EmbeddedWildcard {
                    wildcard: '*',
                    input: s.to_string(),
                });
            }
            result.push(c);
            idx += 1;
            embedded = true;
            continue;
        }

        if c == '?' {
            let valid = idx == 0
                || idx == last
                || (!embedded && chars[idx - 1] == '?')
                || (embedded && chars.get(idx + 1) == Some(&'?'));
            if !valid {
                return Err(CpeError::EmbeddedWildcard {
                    wildcard: '?',
                    input: s.to_string(),
                });
            }
            result.push(c);
            idx += 1;
            embedded = false;
            continue;
        }

        result.push('\\');
        result.push(c);
        idx += 1;
        embedded = true;
    }

    Ok(result)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::binder::{bind_to_fs, bind_to_uri};
    use crate::matcher::is_equal;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::ANY),
            Just(Value::NA),
            r"[a-z0-9]{1,6}(\\[.!$\-][a-z0-9]{1,4})?".prop_map(Value::String),
        ]
    }

    fn arb_wfn() -> impl Strategy<Value = WellFormedName> {
        (
            prop_oneof![Just("a"), Just("o"), Just("h")],
            proptest::collection::vec(arb_value(), Attribute::COUNT - 1),
        )
            .prop_map(|(part, values)| {
                let mut wfn = WellFormedName::new();
                wfn.set(Attribute::Part, part).unwrap();
                for (attribute, value) in Attribute::ALL[1..].iter().zip(values) {
                    wfn.set(*attribute, value).unwrap();
                }
                wfn
            })
    }

    proptest! {
        #[test]
        fn fs_round_trip(wfn in arb_wfn()) {
            let fs = bind_to_fs(&wfn);
            let back = unbind_fs(&fs).unwrap();
            prop_assert_eq!(&back, &wfn, "{}", fs);
        }

        #[test]
        fn uri_round_trip(wfn in arb_wfn()) {
            let uri = bind_to_uri(&wfn);
            let back = unbind_uri(&uri).unwrap();
            prop_assert_eq!(&back, &wfn, "{}", uri);
        }

        #[test]
        fn names_equal_themselves(wfn in arb_wfn()) {
            prop_assert!(is_equal(&wfn, &wfn));
        }
    }
}
