//! The parse loop: pulls tokens out of the [`Tokenizer`] and feeds them into the tree builder.
use crate::error::ParseError;
use crate::trees::TreeBuilder;
use crate::utils::trace_log;
use crate::{Dom, Namespace, Readable, Reader, Token, Tokenizer, TreeAdapter};

/// Options for [`Parser`] and the `parse*` functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Decode character references such as `&amp;`. Defaults to `true`.
    pub decode_html_entities: bool,
    /// Attach a [`crate::SourceLocation`] to every node through
    /// [`TreeAdapter::set_node_source_location`]. Defaults to `false`.
    pub location_info: bool,
    /// Parse as if scripting were enabled, which turns the contents of `<noscript>` into raw
    /// text. Defaults to `true`.
    pub scripting_enabled: bool,
    /// Keep the parse errors around for [`Parser::errors`] and [`Parsed::errors`]. Defaults to
    /// `true`.
    pub collect_errors: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            decode_html_entities: true,
            location_info: false,
            scripting_enabled: true,
            collect_errors: true,
        }
    }
}

impl ParserOptions {
    /// Set [`ParserOptions::decode_html_entities`].
    #[must_use]
    pub fn with_decode_html_entities(mut self, decode: bool) -> Self {
        self.decode_html_entities = decode;
        self
    }

    /// Set [`ParserOptions::location_info`].
    #[must_use]
    pub fn with_location_info(mut self, location_info: bool) -> Self {
        self.location_info = location_info;
        self
    }

    /// Set [`ParserOptions::scripting_enabled`].
    #[must_use]
    pub fn with_scripting_enabled(mut self, scripting_enabled: bool) -> Self {
        self.scripting_enabled = scripting_enabled;
        self
    }

    /// Set [`ParserOptions::collect_errors`].
    #[must_use]
    pub fn with_collect_errors(mut self, collect_errors: bool) -> Self {
        self.collect_errors = collect_errors;
        self
    }
}

/// Why [`Parser::run`] returned before the end of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseReason<H> {
    /// A `</script>` end tag closed this `<script>` element. Only with
    /// [`Parser::pause_on_script_end`].
    ScriptEnd(H),
    /// The hook set with [`Parser::set_pause_hook`] asked for a pause. A request made on a
    /// `</script>` token that also ends a script is reported as [`PauseReason::ScriptEnd`].
    Requested,
}

/// What [`Parser::run`] and [`Parser::step`] stopped at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus<H> {
    /// All input has been consumed.
    Finished,
    /// The parser stopped between two tokens. Call [`Parser::run`] again to resume.
    Paused(PauseReason<H>),
}

/// The outcome of a parse.
#[derive(Debug)]
pub struct Parsed<A: TreeAdapter> {
    /// The tree adapter, holding the tree.
    pub tree: A,
    /// The document, or for fragment parsing the document fragment.
    pub root: A::Handle,
    /// Parse errors in input order, if [`ParserOptions::collect_errors`] was set.
    pub errors: Vec<ParseError>,
}

type PauseHook = Box<dyn FnMut(&Token) -> bool>;

/// A resumable HTML parser.
///
/// The parser owns the tokenizer and all tree construction state. [`Parser::run`] processes
/// tokens until the input is exhausted or a pause is requested; calling it again continues with
/// the next token. [`Parser::finish`] hands out the tree.
///
/// ```
/// use html5arbor::{Dom, ParseStatus, Parser, ParserOptions, PauseReason};
///
/// let mut parser = Parser::new(
///     "<script>a()</script><p>b",
///     Dom::new(),
///     ParserOptions::default(),
/// );
/// parser.pause_on_script_end(true);
/// assert!(matches!(parser.run(), ParseStatus::Paused(PauseReason::ScriptEnd(_))));
/// assert_eq!(parser.run(), ParseStatus::Finished);
/// ```
pub struct Parser<R: Reader, A: TreeAdapter> {
    tokenizer: Tokenizer<R>,
    builder: TreeBuilder<A>,
    options: ParserOptions,
    fragment: bool,
    finished: bool,
    pause_on_script_end: bool,
    pause_hook: Option<PauseHook>,
    errors: Vec<ParseError>,
}

impl<R: Reader, A: TreeAdapter> std::fmt::Debug for Parser<R, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("tokenizer", &self.tokenizer)
            .field("builder", &self.builder)
            .field("options", &self.options)
            .field("finished", &self.finished)
            .finish()
    }
}

impl<R: Reader, A: TreeAdapter> Parser<R, A> {
    /// Create a parser for a whole document.
    pub fn new<'a, S: Readable<'a, Reader = R>>(
        input: S,
        adapter: A,
        options: ParserOptions,
    ) -> Self {
        let mut tokenizer = Tokenizer::new(input);
        tokenizer.set_decode_html_entities(options.decode_html_entities);
        Parser {
            tokenizer,
            builder: TreeBuilder::new(adapter, options.scripting_enabled, options.location_info),
            options,
            fragment: false,
            finished: false,
            pause_on_script_end: false,
            pause_hook: None,
            errors: Vec::new(),
        }
    }

    /// Create a parser for the contents of `context`, an element that `adapter` already knows
    /// about, as with `innerHTML`. [`Parser::finish`] returns a document fragment.
    pub fn new_fragment<'a, S: Readable<'a, Reader = R>>(
        input: S,
        adapter: A,
        context: &A::Handle,
        options: ParserOptions,
    ) -> Self {
        let mut tokenizer = Tokenizer::new(input);
        tokenizer.set_decode_html_entities(options.decode_html_entities);

        let (builder, state) = TreeBuilder::new_fragment(
            adapter,
            context,
            options.scripting_enabled,
            options.location_info,
        );
        tokenizer.set_state(state);
        tokenizer.set_last_start_tag(builder.context_name());
        tokenizer.set_allow_cdata(builder.allow_cdata());

        Parser {
            tokenizer,
            builder,
            options,
            fragment: true,
            finished: false,
            pause_on_script_end: false,
            pause_hook: None,
            errors: Vec::new(),
        }
    }

    /// Pause after every `</script>` end tag, with the script element in
    /// [`PauseReason::ScriptEnd`].
    pub fn pause_on_script_end(&mut self, pause: bool) {
        self.pause_on_script_end = pause;
    }

    /// Call `hook` with every token before it is processed. If it returns `true`, the parser
    /// pauses right after that token.
    ///
    /// When the same token also ends a script and [`Parser::pause_on_script_end`] is set, only
    /// one pause happens and it is reported as [`PauseReason::ScriptEnd`].
    pub fn set_pause_hook(&mut self, hook: impl FnMut(&Token) -> bool + 'static) {
        self.pause_hook = Some(Box::new(hook));
    }

    /// The tree built so far.
    pub fn tree(&self) -> &A {
        &self.builder.adapter
    }

    /// The document node. For fragment parsing this is the document that holds the fragment
    /// until [`Parser::finish`] moves it out.
    pub fn document(&self) -> &A::Handle {
        &self.builder.document
    }

    /// Parse errors reported so far.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether the end of the input has been processed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Process a single token. Returns `None` if there is more to do and no pause was requested.
    pub fn step(&mut self) -> Option<ParseStatus<A::Handle>> {
        if self.finished {
            return Some(ParseStatus::Finished);
        }

        let token = self.tokenizer.next_token();
        let is_eof = matches!(token, Token::Eof);
        let offset = match token.span() {
            Some(span) => span.start,
            None => self.tokenizer.reader.position(),
        };
        let location = if self.options.location_info {
            token.span().map(|span| self.tokenizer.lines().resolve(span))
        } else {
            None
        };
        let pause_requested = match self.pause_hook {
            Some(ref mut hook) => hook(&token),
            None => false,
        };

        self.builder.process(token, offset, location);

        if let Some(state) = self.builder.take_tokenizer_state() {
            trace_log!("tree builder switches tokenizer to {:?}", state);
            self.tokenizer.set_state(state);
        }
        self.tokenizer.set_allow_cdata(self.builder.allow_cdata());
        self.collect_errors();

        if is_eof || self.builder.is_stopped() {
            self.finished = true;
        }

        match self.builder.take_script_ended() {
            Some(script) if self.pause_on_script_end => {
                return Some(ParseStatus::Paused(PauseReason::ScriptEnd(script)));
            }
            _ => (),
        }
        if pause_requested {
            Some(ParseStatus::Paused(PauseReason::Requested))
        } else if self.finished {
            Some(ParseStatus::Finished)
        } else {
            None
        }
    }

    /// Process tokens until the input is exhausted or a pause is requested.
    pub fn run(&mut self) -> ParseStatus<A::Handle> {
        loop {
            if let Some(status) = self.step() {
                return status;
            }
        }
    }

    /// Parse the rest of the input, ignoring pause requests, and return the tree.
    pub fn finish(mut self) -> Parsed<A> {
        while !self.finished {
            self.step();
        }
        let (tree, root) = if self.fragment {
            self.builder.into_fragment()
        } else {
            self.builder.into_document()
        };
        Parsed {
            tree,
            root,
            errors: self.errors,
        }
    }

    fn collect_errors(&mut self) {
        let tokenizer_errors = self.tokenizer.take_errors();
        let tree_errors = self.builder.take_errors();
        if !self.options.collect_errors {
            return;
        }
        self.errors.extend(tokenizer_errors);
        let lines = self.tokenizer.lines();
        self.errors
            .extend(tree_errors.into_iter().map(|(code, offset)| {
                let (line, column) = lines.line_col(offset);
                ParseError {
                    code,
                    offset,
                    line,
                    column,
                }
            }));
    }
}

/// Parse a document into a [`Dom`] with default options.
///
/// ```
/// let parsed = html5arbor::parse("<title>x</title><p>&notit;");
/// let body = parsed.tree.body(parsed.root).unwrap();
/// assert_eq!(parsed.tree.text_content(body), "¬it;");
/// ```
pub fn parse<'a, S: Readable<'a>>(input: S) -> Parsed<Dom> {
    parse_with_options(input, ParserOptions::default())
}

/// Parse a document into a [`Dom`].
pub fn parse_with_options<'a, S: Readable<'a>>(input: S, options: ParserOptions) -> Parsed<Dom> {
    Parser::new(input, Dom::new(), options).finish()
}

/// Parse `input` as the contents of an HTML element called `context_name`, as with `innerHTML`.
///
/// ```
/// let parsed = html5arbor::parse_fragment("<td>x</td>", "tr");
/// assert_eq!(
///     parsed.tree.to_test_string(parsed.root),
///     "| <td>\n|   \"x\"\n"
/// );
/// ```
pub fn parse_fragment<'a, S: Readable<'a>>(input: S, context_name: &str) -> Parsed<Dom> {
    parse_fragment_with_options(input, context_name, ParserOptions::default())
}

/// Parse `input` as the contents of an HTML element called `context_name`.
pub fn parse_fragment_with_options<'a, S: Readable<'a>>(
    input: S,
    context_name: &str,
    options: ParserOptions,
) -> Parsed<Dom> {
    let mut dom = Dom::new();
    let context = dom.create_element(context_name, Namespace::Html, Vec::new());
    Parser::new_fragment(input, dom, &context, options).finish()
}
