/// An object that provides code units to the tokenizer.
///
/// Readers are random-access and stateless: the [preprocessor](crate::Tokenizer) owns the cursor
/// and asks for the code point at a given offset. This is what makes stepping backwards over a
/// surrogate pair or a `\r\n` sequence cheap.
///
/// Offsets are in code units of the underlying storage, and they are what ends up in
/// [`crate::Span`] and [`crate::ParseError`].
pub trait Reader {
    /// Decode the code point starting at `pos`.
    ///
    /// Returns the code point's scalar value and its width in code units, or `None` at the end of
    /// input. The input does **not** have to be preprocessed in any way: a lone surrogate is
    /// returned as-is (as a value in `0xD800..=0xDFFF`) and the preprocessor deals with it.
    fn code_point_at(&self, pos: usize) -> Option<(u32, usize)>;

    /// Offset at which the code point that ends right before `pos` starts. `pos` is never `0`.
    fn code_point_before(&self, pos: usize) -> usize;

    /// Return the longest non-empty run of text starting at `pos` that contains none of the ASCII
    /// bytes in `needle`, or `None` if there is no such run (or the reader cannot hand out `str`
    /// slices at all).
    ///
    /// The default implementation always returns `None`, which makes the tokenizer fall back to
    /// reading one code point at a time. It is recommended to implement this if there is any sort
    /// of in-memory UTF-8 buffer where `memchr` can be run on.
    fn text_run(&self, pos: usize, needle: &[u8]) -> Option<&str> {
        let _ = (pos, needle);
        None
    }

    /// Check whether the input at `pos` starts with the ASCII string `s`, either case-insensitively
    /// or not. Return the width of the match in code units.
    ///
    /// It can be assumed that this function is never called with a string that contains `\r` or
    /// `\n`.
    fn ascii_match_at(&self, pos: usize, s: &str, case_sensitive: bool) -> Option<usize> {
        let mut offset = pos;
        for expected in s.bytes() {
            let (c, width) = self.code_point_at(offset)?;
            let c = u8::try_from(c).ok()?;
            if c != expected && (case_sensitive || !c.eq_ignore_ascii_case(&expected)) {
                return None;
            }
            offset += width;
        }
        Some(offset - pos)
    }
}

/// An object that can be converted into a [`crate::Reader`].
///
/// For example, any utf8-string can be converted into a `StringReader`, such that
/// `Tokenizer::new("mystring")` and `Tokenizer::new(&String::new("foo"))` work. UTF-16 input
/// (`&[u16]`) becomes a [`Utf16Reader`].
pub trait Readable<'a> {
    /// The reader type to which this type should be converted.
    type Reader: Reader + 'a;

    /// Convert self to some sort of reader.
    fn to_reader(self) -> Self::Reader;
}

impl<'a, R: 'a + Reader> Readable<'a> for R {
    type Reader = Self;

    fn to_reader(self) -> Self::Reader {
        self
    }
}

/// Reads HTML from UTF-8 strings. Offsets are byte offsets.
///
/// ```rust
/// use html5arbor::{Token, Tokenizer};
///
/// let mut new_html = String::new();
///
/// for token in Tokenizer::new("<title   >hello world</title>") {
///     match token {
///         Token::StartTag(tag) => new_html.push_str(&format!("<{}>", tag.name)),
///         Token::Characters(chars) => new_html.push_str(&chars.text),
///         Token::EndTag(tag) => new_html.push_str(&format!("</{}>", tag.name)),
///         _ => panic!("unexpected input"),
///     }
/// }
///
/// assert_eq!(new_html, "<title>hello world</title>");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StringReader<'a> {
    input: &'a str,
}

impl<'a> StringReader<'a> {
    fn new(input: &'a str) -> Self {
        StringReader { input }
    }
}

impl<'a> Reader for StringReader<'a> {
    #[inline]
    fn code_point_at(&self, pos: usize) -> Option<(u32, usize)> {
        let c = self.input.get(pos..)?.chars().next()?;
        Some((c as u32, c.len_utf8()))
    }

    #[inline]
    fn code_point_before(&self, pos: usize) -> usize {
        let mut start = pos - 1;
        while !self.input.is_char_boundary(start) {
            start -= 1;
        }
        start
    }

    #[inline]
    fn text_run(&self, pos: usize, needle: &[u8]) -> Option<&str> {
        let rest = self.input.get(pos..)?;
        let end = fast_find(needle, rest.as_bytes()).unwrap_or(rest.len());
        if end == 0 {
            None
        } else {
            // needle bytes are ASCII, so `end` is a char boundary
            Some(&rest[..end])
        }
    }

    fn ascii_match_at(&self, pos: usize, s: &str, case_sensitive: bool) -> Option<usize> {
        let s2 = self.input.as_bytes().get(pos..pos + s.len())?;
        if s.as_bytes() == s2 || (!case_sensitive && s.as_bytes().eq_ignore_ascii_case(s2)) {
            Some(s.len())
        } else {
            None
        }
    }
}

impl<'a> Readable<'a> for &'a str {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self)
    }
}

impl<'a> Readable<'a> for &'a String {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self.as_str())
    }
}

/// Reads HTML from UTF-16 code units, such as strings handed over from a JavaScript engine or a
/// Windows API. Offsets are code unit offsets.
///
/// Surrogate pairs are combined into one code point. Lone surrogates are passed through, and
/// replaced with U+FFFD by the tokenizer (reporting `surrogate-in-input-stream`).
#[derive(Debug, Clone, Copy)]
pub struct Utf16Reader<'a> {
    input: &'a [u16],
}

impl<'a> Utf16Reader<'a> {
    /// Wrap a slice of UTF-16 code units.
    #[must_use]
    pub fn new(input: &'a [u16]) -> Self {
        Utf16Reader { input }
    }
}

impl<'a> Reader for Utf16Reader<'a> {
    #[inline]
    fn code_point_at(&self, pos: usize) -> Option<(u32, usize)> {
        let lead = u32::from(*self.input.get(pos)?);
        if (0xd800..=0xdbff).contains(&lead) {
            if let Some(&trail) = self.input.get(pos + 1) {
                let trail = u32::from(trail);
                if (0xdc00..=0xdfff).contains(&trail) {
                    return Some((0x10000 + ((lead - 0xd800) << 10) + (trail - 0xdc00), 2));
                }
            }
        }
        Some((lead, 1))
    }

    #[inline]
    fn code_point_before(&self, pos: usize) -> usize {
        // Step over the whole pair if `pos` sits right after one.
        if pos >= 2
            && (0xdc00..=0xdfff).contains(&self.input[pos - 1])
            && (0xd800..=0xdbff).contains(&self.input[pos - 2])
        {
            pos - 2
        } else {
            pos - 1
        }
    }
}

impl<'a> Readable<'a> for &'a [u16] {
    type Reader = Utf16Reader<'a>;

    fn to_reader(self) -> Self::Reader {
        Utf16Reader::new(self)
    }
}

impl<'a> Readable<'a> for &'a Vec<u16> {
    type Reader = Utf16Reader<'a>;

    fn to_reader(self) -> Self::Reader {
        Utf16Reader::new(self.as_slice())
    }
}

#[inline]
fn fast_find(needle: &[u8], haystack: &[u8]) -> Option<usize> {
    #[cfg(feature = "memchr")]
    if needle.iter().all(|x| x.is_ascii()) {
        if needle.len() == 3 {
            return memchr::memchr3(needle[0], needle[1], needle[2], haystack);
        } else if needle.len() == 2 {
            return memchr::memchr2(needle[0], needle[1], haystack);
        } else if needle.len() == 1 {
            return memchr::memchr(needle[0], haystack);
        }
    }

    let (i, _) = haystack
        .iter()
        .enumerate()
        .find(|(_, &b)| needle.contains(&b))?;
    Some(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_pairs_and_lone_surrogates() {
        // "a", U+1F600 as a pair, a lone high surrogate, "b"
        let units: [u16; 5] = [0x61, 0xd83d, 0xde00, 0xd800, 0x62];
        let reader = Utf16Reader::new(&units);

        assert_eq!(reader.code_point_at(0), Some((0x61, 1)));
        assert_eq!(reader.code_point_at(1), Some((0x1f600, 2)));
        assert_eq!(reader.code_point_at(3), Some((0xd800, 1)));
        assert_eq!(reader.code_point_at(5), None);

        assert_eq!(reader.code_point_before(3), 1);
        assert_eq!(reader.code_point_before(4), 3);
    }

    #[test]
    fn string_runs_stop_at_needle() {
        let reader = "hello <world".to_reader();
        assert_eq!(reader.text_run(0, b"<&"), Some("hello "));
        assert_eq!(reader.text_run(6, b"<&"), None);
        assert_eq!(reader.text_run(7, b"<&"), Some("world"));
        assert_eq!(reader.text_run(12, b"<&"), None);
    }

    #[test]
    fn ascii_match_is_optionally_case_insensitive() {
        let reader = "<!DocType html>".to_reader();
        assert_eq!(reader.ascii_match_at(2, "DOCTYPE", false), Some(7));
        assert_eq!(reader.ascii_match_at(2, "DOCTYPE", true), None);
    }
}
