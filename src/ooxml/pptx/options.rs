//! Compact `/key:value` option strings.
//!
//! Effects and shapes are configured with strings such as
//! `/trigger:afterPrev /delay:0.5 /color:"FF 00 00"`. The grammar is
//!
//! ```text
//! entry  := '/'? key (':' value)?
//! value  := bareword | '"' .. '"' | '\'' .. '\''
//! string := entry*
//! ```
//!
//! A key is a run of characters other than whitespace, `/` and `:`. A value is
//! empty when omitted. Bareword values stop at whitespace, `/` or `:`; quoted
//! values may contain all three.
//!
//! Tokenizing is separate from dispatch: [`apply_options`] resolves each key
//! against the target's own handler table and falls back to
//! [`OptionTarget::undefined_key`] for anything the table does not list.

use crate::ooxml::error::{OoxmlError, Result};
use smallvec::SmallVec;

/// One `key[:value]` pair borrowed from the option string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Entries of a typical option string fit inline.
pub type OptionEntries<'a> = SmallVec<[OptionEntry<'a>; 8]>;

/// Handler invoked with the raw value of a recognised key.
pub type OptionHandler<T> = fn(&mut T, &str) -> Result<()>;

/// Static key table for a target type.
pub type OptionTable<T> = phf::Map<&'static str, OptionHandler<T>>;

/// Something that can be configured from an option string.
pub trait OptionTarget: Clone {
    /// Look up the handler for `key`. Keys are case-sensitive.
    fn handler(&self, key: &str) -> Option<OptionHandler<Self>>;

    /// Runs before the first key of every option string.
    fn pre_options(&mut self) {}

    /// Runs after the last key of every option string.
    fn post_options(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called for keys with no handler.
    fn undefined_key(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(OoxmlError::UnknownOption(key.to_string()))
    }
}

/// Apply an option string to `target`.
///
/// Handlers run against a staged copy that replaces `target` only once
/// `post_options` succeeds. Any error leaves the target untouched.
pub fn apply_options<T: OptionTarget>(target: &mut T, options: &str) -> Result<()> {
    let entries = tokenize(options)?;
    let mut staged = target.clone();
    staged.pre_options();
    for entry in &entries {
        match staged.handler(entry.key) {
            Some(handler) => handler(&mut staged, entry.value)?,
            None => staged.undefined_key(entry.key, entry.value)?,
        }
    }
    staged.post_options()?;
    *target = staged;
    Ok(())
}

/// Split an option string into entries.
pub fn tokenize(input: &str) -> Result<OptionEntries<'_>> {
    let bytes = input.as_bytes();
    let mut entries = OptionEntries::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let entry_start = pos;
        if c == b'/' {
            pos += 1;
        }

        let key_start = pos;
        while pos < bytes.len() && !is_delimiter(bytes[pos]) {
            pos += 1;
        }
        let key = &input[key_start..pos];

        let at_colon = pos < bytes.len() && bytes[pos] == b':';
        if key.is_empty() {
            let reason = if at_colon {
                "colon with no key"
            } else {
                "slash with no key"
            };
            return Err(OoxmlError::syntax(fragment(input, entry_start, pos + 1), reason));
        }

        if !at_colon {
            entries.push(OptionEntry { key, value: "" });
            continue;
        }

        // Skip the colon.
        pos += 1;
        let value = match bytes.get(pos) {
            Some(&b':') => {
                return Err(OoxmlError::syntax(
                    fragment(input, entry_start, pos + 1),
                    "consecutive colons",
                ));
            },
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = pos + 1;
                let Some(len) = input[value_start..].bytes().position(|b| b == quote) else {
                    return Err(OoxmlError::syntax(&input[entry_start..], "unterminated quote"));
                };
                pos = value_start + len + 1;
                &input[value_start..value_start + len]
            },
            _ => {
                let value_start = pos;
                while pos < bytes.len() && !is_delimiter(bytes[pos]) {
                    pos += 1;
                }
                &input[value_start..pos]
            },
        };

        // A value must be followed by a separator or the next entry's slash.
        if let Some(&b':') = bytes.get(pos) {
            return Err(OoxmlError::syntax(
                fragment(input, entry_start, pos + 1),
                "colon with no key",
            ));
        }

        entries.push(OptionEntry { key, value });
    }

    Ok(entries)
}

#[inline]
fn is_delimiter(b: u8) -> bool {
    b == b'/' || b == b':' || b.is_ascii_whitespace()
}

fn fragment(input: &str, start: usize, end: usize) -> &str {
    let mut end = end.min(input.len());
    while !input.is_char_boundary(end) {
        end += 1;
    }
    &input[start..end]
}

/// Parse a finite, non-negative number of seconds or points.
pub(crate) fn parse_non_negative(key: &str, value: &str) -> Result<f64> {
    let number = parse_number(key, value)?;
    if number < 0.0 {
        return Err(OoxmlError::invalid_value(key, value));
    }
    Ok(number)
}

/// Parse a finite number.
pub(crate) fn parse_number(key: &str, value: &str) -> Result<f64> {
    fast_float2::parse::<f64, _>(value.trim())
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| OoxmlError::invalid_value(key, value))
}
