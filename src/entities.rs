//! Character reference tables.
//!
//! Named references come from markup5ever's table, which maps every entity name (without the
//! leading `&`) to its code points, and additionally maps every proper prefix of a name to
//! `(0, 0)`. Walking it one character at a time is a longest-prefix search: keep going while the
//! prefix is known, remember the last complete name.
use markup5ever::data::NAMED_ENTITIES;

use crate::utils::{noncharacter_pat, surrogate_pat};
use crate::Error;

/// Incremental longest-match search over the named character reference table.
#[derive(Debug, Default)]
pub(crate) struct NamedReferenceMatcher {
    name: String,
    best: Option<(usize, char, Option<char>)>,
}

impl NamedReferenceMatcher {
    /// Feed the next character. Returns `false` once no longer name can match.
    pub(crate) fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_alphanumeric() && c != ';' {
            return false;
        }

        self.name.push(c);
        match NAMED_ENTITIES.get(self.name.as_str()) {
            None => false,
            Some(&(0, _)) => c != ';',
            Some(&(first, second)) => {
                let first = char::from_u32(first).unwrap_or('\u{fffd}');
                let second = if second == 0 {
                    None
                } else {
                    char::from_u32(second)
                };
                self.best = Some((self.name.len(), first, second));
                // every name that ends in a semicolon is complete
                c != ';'
            }
        }
    }

    /// The longest name matched so far, and what it decodes to. Names are ASCII, so the name's
    /// length is also its width in code units.
    pub(crate) fn longest_match(&self) -> Option<(&str, char, Option<char>)> {
        let (len, first, second) = self.best?;
        Some((&self.name[..len], first, second))
    }
}

/// Resolve the code point of a numeric character reference, returning the character to emit and
/// the parse error to report, if any.
pub(crate) fn numeric_reference_value(code: u32) -> (char, Option<Error>) {
    match code {
        0x00 => ('\u{fffd}', Some(Error::NullCharacterReference)),
        x if x > 0x10_ffff => ('\u{fffd}', Some(Error::CharacterReferenceOutsideUnicodeRange)),
        surrogate_pat!() => ('\u{fffd}', Some(Error::SurrogateCharacterReference)),
        noncharacter_pat!() => (
            char::from_u32(code).unwrap_or('\u{fffd}'),
            Some(Error::NoncharacterCharacterReference),
        ),
        0x0d | 0x01..=0x08 | 0x0b | 0x0e..=0x1f | 0x7f..=0x9f => {
            let c = windows_1252_replacement(code)
                .or_else(|| char::from_u32(code))
                .unwrap_or('\u{fffd}');
            (c, Some(Error::ControlCharacterReference))
        }
        _ => (char::from_u32(code).unwrap_or('\u{fffd}'), None),
    }
}

/// Numeric references in `0x80..=0x9F` are interpreted as windows-1252 bytes.
fn windows_1252_replacement(code: u32) -> Option<char> {
    Some(match code {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn longest(input: &str) -> Option<(String, String)> {
        let mut matcher = NamedReferenceMatcher::default();
        for c in input.chars() {
            if !matcher.push(c) {
                break;
            }
        }
        let (name, first, second) = matcher.longest_match()?;
        let mut decoded = first.to_string();
        decoded.extend(second);
        Some((name.to_owned(), decoded))
    }

    #[test]
    fn longest_prefix_wins() {
        assert_eq!(longest("amp;"), Some(("amp;".to_owned(), "&".to_owned())));
        assert_eq!(longest("notit;"), Some(("not".to_owned(), "\u{ac}".to_owned())));
        assert_eq!(longest("notin;"), Some(("notin;".to_owned(), "\u{2209}".to_owned())));
        assert_eq!(longest("xyz;"), None);
    }

    #[test]
    fn two_code_point_references() {
        assert_eq!(
            longest("NotEqualTilde;"),
            Some(("NotEqualTilde;".to_owned(), "\u{2242}\u{338}".to_owned()))
        );
    }

    #[test]
    fn numeric_references() {
        assert_eq!(numeric_reference_value(65), ('A', None));
        assert_eq!(
            numeric_reference_value(0x80),
            ('\u{20AC}', Some(Error::ControlCharacterReference))
        );
        assert_eq!(
            numeric_reference_value(0x81),
            ('\u{81}', Some(Error::ControlCharacterReference))
        );
        assert_eq!(
            numeric_reference_value(0),
            ('\u{fffd}', Some(Error::NullCharacterReference))
        );
        assert_eq!(
            numeric_reference_value(0xd800),
            ('\u{fffd}', Some(Error::SurrogateCharacterReference))
        );
        assert_eq!(
            numeric_reference_value(0x110000),
            ('\u{fffd}', Some(Error::CharacterReferenceOutsideUnicodeRange))
        );
    }
}
