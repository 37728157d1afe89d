use crate::emitter::Emitter;
use crate::span::LineIndex;
use crate::utils::{control_pat, noncharacter_pat, surrogate_pat};
use crate::{Error, Reader, Span};

/// Cursor over a [`Reader`] that implements the input stream preprocessing steps: newline
/// normalization, surrogate handling and input stream errors.
///
/// Every error is reported once per input position, no matter how often the tokenizer steps back
/// and re-reads that position.
pub(crate) struct Preprocessor<R: Reader> {
    reader: R,
    pos: usize,
    last_start: usize,
    validated_up_to: usize,
    pub(crate) lines: LineIndex,
}

impl<R: Reader> Preprocessor<R> {
    pub(crate) fn new(reader: R) -> Self {
        Preprocessor {
            reader,
            pos: 0,
            last_start: 0,
            validated_up_to: 0,
            lines: LineIndex::default(),
        }
    }

    /// Offset of the next code point.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Span of the code point most recently returned by [`Self::advance`].
    #[inline]
    pub(crate) fn last_span(&self) -> Span {
        Span::new(self.last_start, self.pos)
    }

    /// Return the next logical code point, or `None` at the end of input.
    ///
    /// `\r\n` and lone `\r` both come out as a single `\n`. Lone surrogates come out as U+FFFD.
    #[inline]
    pub(crate) fn advance(&mut self, emitter: &mut Emitter) -> Option<char> {
        self.last_start = self.pos;
        let (cp, mut width) = self.reader.code_point_at(self.pos)?;

        let c = if cp == 0x0d {
            if let Some((0x0a, width2)) = self.reader.code_point_at(self.pos + width) {
                width += width2;
            }
            '\n'
        } else {
            char::from_u32(cp).unwrap_or('\u{fffd}')
        };

        if self.pos >= self.validated_up_to {
            Self::validate_code_point(emitter, cp, self.pos);
            self.validated_up_to = self.pos + width;
        }

        self.pos += width;
        if c == '\n' {
            self.lines.add_line_start(self.pos);
        }
        Some(c)
    }

    /// Undo the `advance` call that returned `c`.
    ///
    /// Retreating over end of input is a no-op, as `advance` did not move either. Otherwise this
    /// steps back one logical code point, treating a `\r\n` pair and a surrogate pair as one.
    #[inline]
    pub(crate) fn retreat(&mut self, c: Option<char>) {
        if c.is_none() || self.pos == 0 {
            return;
        }

        let mut prev = self.reader.code_point_before(self.pos);
        if prev > 0 && matches!(self.reader.code_point_at(prev), Some((0x0a, _))) {
            let before = self.reader.code_point_before(prev);
            if matches!(self.reader.code_point_at(before), Some((0x0d, _))) {
                prev = before;
            }
        }
        self.pos = prev;
    }

    /// Jump back to an offset previously obtained from [`Self::position`].
    pub(crate) fn rewind_to(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.pos = pos;
    }

    /// Consume `s` if the input continues with it. `s` must be ASCII and must not contain
    /// newlines.
    #[inline]
    pub(crate) fn try_read_string(&mut self, s: &str, case_sensitive: bool) -> bool {
        debug_assert!(!s.is_empty());
        debug_assert!(!s.contains(&['\r', '\n'][..]));

        match self.reader.ascii_match_at(self.pos, s, case_sensitive) {
            Some(width) => {
                self.last_start = self.pos;
                self.pos += width;
                self.validated_up_to = self.validated_up_to.max(self.pos);
                true
            }
            None => false,
        }
    }

    /// Consume a run of text that contains none of the bytes in `needle` and no `\r`, if the
    /// reader supports handing out runs. `needle` must contain `\r`.
    ///
    /// The run's offset is the [`Self::position`] from before the call; its length in code units is
    /// its byte length, since only UTF-8 readers return runs.
    #[inline]
    pub(crate) fn text_run(&mut self, needle: &[u8], emitter: &mut Emitter) -> Option<&str> {
        debug_assert!(needle.contains(&b'\r'));
        let start = self.pos;
        let run = self.reader.text_run(start, needle)?;

        let end = start + run.len();
        if end > self.validated_up_to {
            for (i, c) in run.char_indices() {
                let offset = start + i;
                if offset >= self.validated_up_to {
                    Self::validate_code_point(emitter, c as u32, offset);
                }
                if c == '\n' {
                    self.lines.add_line_start(offset + 1);
                }
            }
            self.validated_up_to = end;
        }

        self.last_start = start;
        self.pos = end;
        Some(run)
    }

    #[inline]
    fn validate_code_point(emitter: &mut Emitter, cp: u32, offset: usize) {
        match cp {
            surrogate_pat!() => {
                emitter.emit_error(Error::SurrogateInInputStream, offset);
            }
            noncharacter_pat!() => {
                emitter.emit_error(Error::NoncharacterInInputStream, offset);
            }
            // control without whitespace or nul
            x @ control_pat!()
                if !matches!(x, 0x0000 | 0x0009 | 0x000a | 0x000c | 0x000d | 0x0020) =>
            {
                emitter.emit_error(Error::ControlCharacterInInputStream, offset);
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Readable, Utf16Reader};

    fn read_all<R: Reader>(pre: &mut Preprocessor<R>, emitter: &mut Emitter) -> String {
        let mut rv = String::new();
        while let Some(c) = pre.advance(emitter) {
            rv.push(c);
        }
        rv
    }

    #[test]
    fn newlines_are_normalized() {
        let mut emitter = Emitter::default();
        let mut pre = Preprocessor::new("a\r\nb\rc\n".to_reader());
        assert_eq!(read_all(&mut pre, &mut emitter), "a\nb\nc\n");
        assert_eq!(pre.lines.line_col(3), (2, 1));
        assert_eq!(pre.lines.line_col(4), (2, 2));
        assert_eq!(pre.lines.line_col(5), (3, 1));
    }

    #[test]
    fn retreat_steps_over_crlf_and_pairs() {
        let mut emitter = Emitter::default();
        let mut pre = Preprocessor::new("x\r\ny".to_reader());
        assert_eq!(pre.advance(&mut emitter), Some('x'));
        let c = pre.advance(&mut emitter);
        assert_eq!(c, Some('\n'));
        pre.retreat(c);
        assert_eq!(pre.position(), 1);
        assert_eq!(pre.advance(&mut emitter), Some('\n'));
        assert_eq!(pre.advance(&mut emitter), Some('y'));
        assert_eq!(pre.advance(&mut emitter), None);
        pre.retreat(None);
        assert_eq!(pre.position(), 4);

        let units: [u16; 3] = [0xd83d, 0xde00, 0x61];
        let mut pre = Preprocessor::new(Utf16Reader::new(&units));
        let c = pre.advance(&mut emitter);
        assert_eq!(c, Some('\u{1f600}'));
        pre.retreat(c);
        assert_eq!(pre.position(), 0);
    }

    #[test]
    fn errors_are_reported_once() {
        let mut emitter = Emitter::default();
        let units: [u16; 3] = [0x61, 0xdc00, 0x62];
        let mut pre = Preprocessor::new(Utf16Reader::new(&units));
        assert_eq!(pre.advance(&mut emitter), Some('a'));
        let c = pre.advance(&mut emitter);
        assert_eq!(c, Some('\u{fffd}'));
        pre.retreat(c);
        assert_eq!(pre.advance(&mut emitter), Some('\u{fffd}'));
        assert_eq!(
            emitter.take_errors(),
            vec![(Error::SurrogateInInputStream, 1)]
        );
    }

    #[test]
    fn text_runs_validate_and_track_lines() {
        let mut emitter = Emitter::default();
        let mut pre = Preprocessor::new("ab\n\u{1}c<".to_reader());
        assert_eq!(pre.text_run(b"<\r", &mut emitter), Some("ab\n\u{1}c"));
        assert_eq!(pre.text_run(b"<\r", &mut emitter), None);
        assert_eq!(pre.advance(&mut emitter), Some('<'));
        assert_eq!(pre.lines.line_col(3), (2, 1));
        assert_eq!(
            emitter.take_errors(),
            vec![(Error::ControlCharacterInInputStream, 3)]
        );
    }
}
