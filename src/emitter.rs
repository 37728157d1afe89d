use std::collections::VecDeque;
use std::mem::take;

use crate::token::{Attribute, CharacterKind, Characters, Comment, Doctype, EndTag, StartTag};
use crate::{Error, Span, Token};

#[derive(Debug)]
enum CurrentToken {
    Tag { is_end: bool, tag: StartTag },
    Comment(Comment),
    Doctype(Doctype),
}

/// Scratch space of the tokenizer: the token currently being built, the pending run of
/// characters, and tokens that are ready to be handed out.
///
/// The state machine only ever talks to this struct, it never assembles tokens itself.
#[derive(Debug, Default)]
pub(crate) struct Emitter {
    current_characters: String,
    current_characters_kind: Option<CharacterKind>,
    current_characters_span: Span,
    current_token: Option<CurrentToken>,
    current_attribute: Option<(Attribute, usize)>,
    token_start: usize,
    last_start_tag: String,
    emitted_tokens: VecDeque<Token>,
    errors: Vec<(Error, usize)>,
}

impl Emitter {
    pub(crate) fn set_last_start_tag(&mut self, last_start_tag: Option<&str>) {
        self.last_start_tag.clear();
        self.last_start_tag.push_str(last_start_tag.unwrap_or_default());
    }

    pub(crate) fn emit_eof(&mut self) {
        self.flush_current_characters();
        self.emitted_tokens.push_back(Token::Eof);
    }

    pub(crate) fn emit_error(&mut self, error: Error, offset: usize) {
        self.errors.push((error, offset));
    }

    pub(crate) fn take_errors(&mut self) -> Vec<(Error, usize)> {
        take(&mut self.errors)
    }

    pub(crate) fn pop_token(&mut self) -> Option<Token> {
        self.emitted_tokens.pop_front()
    }

    #[inline]
    pub(crate) fn emit_char(&mut self, c: char, span: Span) {
        let kind = CharacterKind::of(c);
        if self.current_characters_kind != Some(kind) {
            self.flush_current_characters();
            self.current_characters_kind = Some(kind);
            self.current_characters_span = span;
        }
        self.current_characters.push(c);
        self.current_characters_span.end = span.end;
    }

    /// Emit a string that was read starting at offset `start`. Offsets of individual characters
    /// are recomputed from their UTF-8 length, which is only correct for UTF-8 input, so callers
    /// pass strings that came from a [`crate::StringReader`] or spans they know to be approximate.
    pub(crate) fn emit_str(&mut self, s: &str, start: usize) {
        let mut offset = start;
        for c in s.chars() {
            let end = offset + c.len_utf8();
            self.emit_char(c, Span::new(offset, end));
            offset = end;
        }
    }

    /// Emit characters that were consumed earlier and are only now known to be text, such as the
    /// `</foo` of a non-matching end tag inside `<textarea>`. They all get `span`.
    pub(crate) fn emit_buffered(&mut self, s: &str, span: Span) {
        for c in s.chars() {
            self.emit_char(c, span);
        }
    }

    fn flush_current_characters(&mut self) {
        if let Some(kind) = self.current_characters_kind.take() {
            self.emitted_tokens.push_back(Token::Characters(Characters {
                kind,
                text: take(&mut self.current_characters),
                span: self.current_characters_span,
            }));
        }
    }

    fn emit_token(&mut self, token: Token) {
        self.flush_current_characters();
        self.emitted_tokens.push_back(token);
    }

    /// Remember where the next token starts (the offset of its `<`).
    pub(crate) fn set_token_start(&mut self, offset: usize) {
        self.token_start = offset;
    }

    pub(crate) fn token_start(&self) -> usize {
        self.token_start
    }

    pub(crate) fn init_start_tag(&mut self) {
        self.init_tag(false);
    }

    pub(crate) fn init_end_tag(&mut self) {
        self.init_tag(true);
    }

    fn init_tag(&mut self, is_end: bool) {
        self.current_token = Some(CurrentToken::Tag {
            is_end,
            tag: StartTag {
                span: Span::new(self.token_start, self.token_start),
                ..StartTag::default()
            },
        });
    }

    pub(crate) fn init_comment(&mut self) {
        self.current_token = Some(CurrentToken::Comment(Comment {
            data: String::new(),
            span: Span::new(self.token_start, self.token_start),
        }));
    }

    pub(crate) fn init_doctype(&mut self) {
        self.current_token = Some(CurrentToken::Doctype(Doctype {
            span: Span::new(self.token_start, self.token_start),
            ..Doctype::default()
        }));
    }

    /// Emit the current start or end tag. `end` is the offset right after its `>`.
    pub(crate) fn emit_current_tag(&mut self, end: usize) {
        self.flush_current_attribute();
        match self.current_token.take() {
            Some(CurrentToken::Tag { is_end: false, mut tag }) => {
                tag.span.end = end;
                self.last_start_tag.clear();
                self.last_start_tag.push_str(&tag.name);
                self.emit_token(Token::StartTag(tag));
            }
            Some(CurrentToken::Tag { is_end: true, tag }) => {
                if !tag.attributes.is_empty() {
                    self.emit_error(Error::EndTagWithAttributes, tag.span.start);
                }
                if tag.self_closing {
                    self.emit_error(Error::EndTagWithTrailingSolidus, tag.span.start);
                }
                self.emit_token(Token::EndTag(EndTag {
                    name: tag.name,
                    span: Span::new(tag.span.start, end),
                }));
            }
            _ => debug_assert!(false, "no tag to emit"),
        }
    }

    pub(crate) fn emit_current_comment(&mut self, end: usize) {
        match self.current_token.take() {
            Some(CurrentToken::Comment(mut comment)) => {
                comment.span.end = end;
                self.emit_token(Token::Comment(comment));
            }
            _ => debug_assert!(false, "no comment to emit"),
        }
    }

    pub(crate) fn emit_current_doctype(&mut self, end: usize) {
        match self.current_token.take() {
            Some(CurrentToken::Doctype(mut doctype)) => {
                doctype.span.end = end;
                self.emit_token(Token::Doctype(doctype));
            }
            _ => debug_assert!(false, "no doctype to emit"),
        }
    }

    pub(crate) fn set_self_closing(&mut self) {
        if let Some(CurrentToken::Tag { ref mut tag, .. }) = self.current_token {
            tag.self_closing = true;
        }
    }

    pub(crate) fn set_force_quirks(&mut self) {
        if let Some(CurrentToken::Doctype(ref mut doctype)) = self.current_token {
            doctype.force_quirks = true;
        }
    }

    pub(crate) fn push_tag_name(&mut self, s: &str) {
        if let Some(CurrentToken::Tag { ref mut tag, .. }) = self.current_token {
            tag.name.push_str(s);
        }
    }

    pub(crate) fn push_comment(&mut self, s: &str) {
        if let Some(CurrentToken::Comment(ref mut comment)) = self.current_token {
            comment.data.push_str(s);
        }
    }

    pub(crate) fn push_doctype_name(&mut self, s: &str) {
        if let Some(CurrentToken::Doctype(ref mut doctype)) = self.current_token {
            doctype.name.get_or_insert_with(String::new).push_str(s);
        }
    }

    /// Start a new attribute at `offset`, finishing the previous one.
    pub(crate) fn init_attribute(&mut self, offset: usize) {
        self.flush_current_attribute();
        self.current_attribute = Some((Attribute::default(), offset));
    }

    pub(crate) fn push_attribute_name(&mut self, s: &str) {
        if let Some((ref mut attr, _)) = self.current_attribute {
            attr.name.push_str(s);
        }
    }

    pub(crate) fn push_attribute_value(&mut self, s: &str) {
        if let Some((ref mut attr, _)) = self.current_attribute {
            attr.value.push_str(s);
        }
    }

    fn flush_current_attribute(&mut self) {
        if let Some((attr, offset)) = self.current_attribute.take() {
            if let Some(CurrentToken::Tag { ref mut tag, .. }) = self.current_token {
                if tag.attributes.iter().any(|x| x.name == attr.name) {
                    self.errors.push((Error::DuplicateAttribute, offset));
                } else {
                    tag.attributes.push(attr);
                }
            }
        }
    }

    pub(crate) fn set_doctype_public_identifier(&mut self) {
        if let Some(CurrentToken::Doctype(ref mut doctype)) = self.current_token {
            doctype.public_identifier = Some(String::new());
        }
    }

    pub(crate) fn set_doctype_system_identifier(&mut self) {
        if let Some(CurrentToken::Doctype(ref mut doctype)) = self.current_token {
            doctype.system_identifier = Some(String::new());
        }
    }

    pub(crate) fn push_doctype_public_identifier(&mut self, s: &str) {
        if let Some(CurrentToken::Doctype(Doctype {
            public_identifier: Some(ref mut id),
            ..
        })) = self.current_token
        {
            id.push_str(s);
        }
    }

    pub(crate) fn push_doctype_system_identifier(&mut self, s: &str) {
        if let Some(CurrentToken::Doctype(Doctype {
            system_identifier: Some(ref mut id),
            ..
        })) = self.current_token
        {
            id.push_str(s);
        }
    }

    pub(crate) fn current_is_appropriate_end_tag_token(&mut self) -> bool {
        match self.current_token {
            Some(CurrentToken::Tag { is_end: true, ref tag }) => {
                !self.last_start_tag.is_empty() && self.last_start_tag == tag.name
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_coalesce_by_kind() {
        let mut emitter = Emitter::default();
        emitter.emit_str("ab  c\0\0", 0);
        emitter.emit_eof();

        let mut kinds = Vec::new();
        while let Some(token) = emitter.pop_token() {
            if let Token::Characters(chars) = token {
                kinds.push((chars.kind, chars.text, chars.span));
            }
        }

        assert_eq!(
            kinds,
            vec![
                (CharacterKind::Regular, "ab".to_owned(), Span::new(0, 2)),
                (CharacterKind::Whitespace, "  ".to_owned(), Span::new(2, 4)),
                (CharacterKind::Regular, "c".to_owned(), Span::new(4, 5)),
                (CharacterKind::Null, "\0\0".to_owned(), Span::new(5, 7)),
            ]
        );
    }

    #[test]
    fn duplicate_attributes_keep_the_first() {
        let mut emitter = Emitter::default();
        emitter.init_start_tag();
        emitter.push_tag_name("a");
        for (offset, value) in [(3, "1"), (9, "2")] {
            emitter.init_attribute(offset);
            emitter.push_attribute_name("x");
            emitter.push_attribute_value(value);
        }
        emitter.emit_current_tag(15);

        match emitter.pop_token() {
            Some(Token::StartTag(tag)) => {
                assert_eq!(tag.attributes, vec![Attribute::new("x", "1")]);
                assert_eq!(tag.span, Span::new(0, 15));
            }
            other => panic!("unexpected token {:?}", other),
        }
        assert_eq!(emitter.take_errors(), vec![(Error::DuplicateAttribute, 9)]);
    }
}
