use crate::emitter::Emitter;
use crate::machine;
use crate::machine_helper::MachineHelper;
use crate::preprocessor::Preprocessor;
use crate::span::LineIndex;
use crate::utils::ControlToken;
use crate::{ParseError, Readable, Reader, State, Token};

/// A HTML tokenizer. See crate-level docs for basic usage.
///
/// Iterating over a tokenizer yields every token up to, but not including, [`Token::Eof`].
pub struct Tokenizer<R: Reader> {
    eof: bool,
    pub(crate) emitter: Emitter,
    pub(crate) reader: Preprocessor<R>,
    pub(crate) machine_helper: MachineHelper,
    pub(crate) decode_html_entities: bool,
    pub(crate) allow_cdata: bool,
}

impl<R: Reader> std::fmt::Debug for Tokenizer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("eof", &self.eof)
            .field("state", &self.machine_helper.state())
            .field("position", &self.reader.position())
            .finish()
    }
}

impl<R: Reader> Tokenizer<R> {
    /// Create a new tokenizer from some input.
    ///
    /// `input` can be `&str`, `&String`, `&[u16]` or anything else [`crate::Readable`] is
    /// implemented for.
    pub fn new<'a, S: Readable<'a, Reader = R>>(input: S) -> Self {
        Tokenizer {
            eof: false,
            emitter: Emitter::default(),
            reader: Preprocessor::new(input.to_reader()),
            machine_helper: MachineHelper::default(),
            decode_html_entities: true,
            allow_cdata: false,
        }
    }

    /// Whether character references such as `&amp;` are decoded. Defaults to `true`. When
    /// disabled, `&` is ordinary text everywhere.
    pub fn set_decode_html_entities(&mut self, decode: bool) {
        self.decode_html_entities = decode;
    }

    /// Whether `<![CDATA[` starts a CDATA section. The tree builder enables this while the
    /// adjusted current node is not an HTML element; standalone tokenizers default to `false`,
    /// which makes CDATA sections bogus comments.
    pub fn set_allow_cdata(&mut self, allow: bool) {
        self.allow_cdata = allow;
    }

    /// Override internal state. Necessary for parsing partial documents ("fragment parsing") and
    /// for the tree builder to switch into RCDATA, RAWTEXT and friends.
    pub fn set_state(&mut self, state: State) {
        self.machine_helper.switch_to(state.into());
    }

    /// Set the name of the last start tag, which decides whether an end tag inside RCDATA and
    /// RAWTEXT is appropriate.
    pub fn set_last_start_tag(&mut self, last_start_tag: Option<&str>) {
        self.emitter.set_last_start_tag(last_start_tag);
    }

    /// Take all errors reported since the last call, in input order.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        let lines = &self.reader.lines;
        self.emitter
            .take_errors()
            .into_iter()
            .map(|(code, offset)| {
                let (line, column) = lines.line_col(offset);
                ParseError {
                    code,
                    offset,
                    line,
                    column,
                }
            })
            .collect()
    }

    pub(crate) fn lines(&self) -> &LineIndex {
        &self.reader.lines
    }

    /// Produce the next token. After the input is exhausted this returns [`Token::Eof`] forever.
    pub(crate) fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.emitter.pop_token() {
                break token;
            } else if !self.eof {
                match machine::consume(self) {
                    ControlToken::Continue => (),
                    ControlToken::Eof => {
                        self.eof = true;
                        self.emitter.emit_eof();
                    }
                }
            } else {
                break Token::Eof;
            }
        }
    }
}

impl<R: Reader> Iterator for Tokenizer<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{CharacterKind, Characters, Comment, Doctype, EndTag, StartTag};
    use crate::{Attribute, Error, Span};

    fn tokens(input: &str) -> Vec<Token> {
        Tokenizer::new(input).collect()
    }

    fn chars(text: &str, span: Span) -> Token {
        Token::Characters(Characters {
            kind: CharacterKind::Regular,
            text: text.to_owned(),
            span,
        })
    }

    #[test]
    fn tags_text_and_spans() {
        assert_eq!(
            tokens("<a HREF=x>hi</a>"),
            vec![
                Token::StartTag(StartTag {
                    self_closing: false,
                    name: "a".to_owned(),
                    attributes: vec![Attribute::new("href", "x")],
                    span: Span::new(0, 10),
                }),
                chars("hi", Span::new(10, 12)),
                Token::EndTag(EndTag {
                    name: "a".to_owned(),
                    span: Span::new(12, 16),
                }),
            ]
        );
    }

    #[test]
    fn named_references_in_text_and_attributes() {
        let toks = tokens("&notit; <a title='&notit;&amp=x'>");
        assert_eq!(toks[0], chars("\u{ac}it;", Span::new(0, 7)));
        match &toks[2] {
            Token::StartTag(tag) => {
                assert_eq!(tag.attributes, vec![Attribute::new("title", "&notit;&amp=x")]);
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn entity_decoding_can_be_disabled() {
        let mut tokenizer = Tokenizer::new("a&amp;b");
        tokenizer.set_decode_html_entities(false);
        assert_eq!(
            tokenizer.collect::<Vec<_>>(),
            vec![chars("a&amp;b", Span::new(0, 7))]
        );
    }

    #[test]
    fn rcdata_end_tags_must_be_appropriate() {
        let mut tokenizer = Tokenizer::new("a</b></title>");
        tokenizer.set_state(State::RcData);
        tokenizer.set_last_start_tag(Some("title"));
        let toks: Vec<_> = tokenizer.collect();
        assert_eq!(toks[0], chars("a</b>", Span::new(0, 5)));
        assert!(matches!(&toks[1], Token::EndTag(tag) if tag.name == "title"));
    }

    #[test]
    fn inappropriate_end_tags_are_text_in_raw_states() {
        for (state, input, last, text) in [
            (State::RawText, "a</b>c</style>", "style", "a</b>c"),
            (State::ScriptData, "a</b>c</script>", "script", "a</b>c"),
            (State::ScriptData, "<!--a</b>--></script>", "script", "<!--a</b>-->"),
        ] {
            let mut tokenizer = Tokenizer::new(input);
            tokenizer.set_state(state);
            tokenizer.set_last_start_tag(Some(last));
            let toks: Vec<_> = tokenizer.collect();
            let collected: String = toks
                .iter()
                .filter_map(|t| match t {
                    Token::Characters(c) => Some(c.text.as_str()),
                    _ => None,
                })
                .collect();
            assert_eq!(collected, text, "{}", input);
            assert!(matches!(toks.last(), Some(Token::EndTag(tag)) if tag.name == last));
        }
    }

    #[test]
    fn cdata_depends_on_flag() {
        assert_eq!(
            tokens("<![CDATA[x]]>"),
            vec![Token::Comment(Comment {
                data: "[CDATA[x]]".to_owned(),
                span: Span::new(0, 13),
            })]
        );

        let mut tokenizer = Tokenizer::new("<![CDATA[x]]>");
        tokenizer.set_allow_cdata(true);
        let toks: Vec<_> = tokenizer.collect();
        assert_eq!(toks.len(), 1);
        assert!(matches!(&toks[0], Token::Characters(c) if c.text == "x"));
    }

    #[test]
    fn doctype_and_errors() {
        let mut tokenizer = Tokenizer::new("<!DOCTYPE html PUBLIC>\n<a b b>");
        let toks: Vec<_> = tokenizer.by_ref().collect();
        assert_eq!(
            toks[0],
            Token::Doctype(Doctype {
                force_quirks: true,
                name: Some("html".to_owned()),
                public_identifier: None,
                system_identifier: None,
                span: Span::new(0, 22),
            })
        );
        let errors = tokenizer.take_errors();
        assert_eq!(
            errors.iter().map(|e| e.code).collect::<Vec<_>>(),
            vec![Error::MissingDoctypePublicIdentifier, Error::DuplicateAttribute]
        );
        assert_eq!((errors[1].line, errors[1].column), (2, 6));
    }

    #[test]
    fn eof_is_repeated() {
        let mut tokenizer = Tokenizer::new("");
        assert_eq!(tokenizer.next_token(), Token::Eof);
        assert_eq!(tokenizer.next_token(), Token::Eof);
    }
}
