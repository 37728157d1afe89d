use crate::{Namespace, Span};

/// An attribute of a start tag or an element.
///
/// Attributes produced by the tokenizer never carry a namespace or prefix. The tree builder fills
/// them in for `xlink:`, `xml:` and `xmlns` attributes on SVG and MathML elements.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct Attribute {
    /// The attribute's local name, such as `"href"`.
    pub name: String,
    /// The attribute's value. Character references are already decoded.
    pub value: String,
    /// Namespace prefix, such as `"xlink"`.
    pub prefix: Option<String>,
    /// Attribute namespace. `None` means "no namespace".
    pub namespace: Option<Namespace>,
}

impl Attribute {
    /// Construct an attribute without namespace.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
            prefix: None,
            namespace: None,
        }
    }

    /// The attribute name as written in markup: `prefix:name` or just `name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }
}

/// A HTML start tag, such as `<p>` or `<a>`.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct StartTag {
    /// Whether this tag is self-closing. If it is self-closing, no following [`EndTag`] should be
    /// expected.
    pub self_closing: bool,

    /// The start tag's name, such as `"p"` or `"a"`. Always lowercase.
    pub name: String,

    /// The start tag's attributes, in source order.
    ///
    /// Duplicate attributes are ignored after the first one as per WHATWG spec.
    pub attributes: Vec<Attribute>,

    /// Where the tag is in the input, from `<` to `>` inclusive.
    pub span: Span,
}

impl StartTag {
    /// Look up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// A HTML end/close tag, such as `</p>` or `</a>`.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct EndTag {
    /// The ending tag's name, such as `"p"` or `"a"`. Always lowercase.
    pub name: String,

    /// Where the tag is in the input.
    pub span: Span,
}

/// A doctype. Some examples:
///
/// * `<!DOCTYPE {name}>`
/// * `<!DOCTYPE {name} PUBLIC '{public_identifier}'>`
/// * `<!DOCTYPE {name} SYSTEM '{system_identifier}'>`
/// * `<!DOCTYPE {name} PUBLIC '{public_identifier}' '{system_identifier}'>`
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct Doctype {
    /// The ["force quirks"](https://html.spec.whatwg.org/#force-quirks-flag) flag.
    pub force_quirks: bool,

    /// The doctype's name. For HTML documents this is "html". `None` if it was missing entirely.
    pub name: Option<String>,

    /// The doctype's public identifier.
    pub public_identifier: Option<String>,

    /// The doctype's system identifier.
    pub system_identifier: Option<String>,

    /// Where the doctype is in the input.
    pub span: Span,
}

/// A HTML comment.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct Comment {
    /// Text between `<!--` and `-->`.
    pub data: String,

    /// Where the comment is in the input.
    pub span: Span,
}

/// What kind of characters a [`Characters`] token carries.
///
/// Runs of different kinds are never merged into one token, because the tree builder treats
/// whitespace and U+0000 differently from other text in many places.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CharacterKind {
    /// Only ASCII whitespace (tab, newline, form feed, space).
    Whitespace,
    /// Only U+0000.
    Null,
    /// Anything else.
    Regular,
}

impl CharacterKind {
    /// Classify a single character.
    #[must_use]
    #[inline]
    pub fn of(c: char) -> Self {
        match c {
            '\t' | '\n' | '\x0C' | ' ' => CharacterKind::Whitespace,
            '\0' => CharacterKind::Null,
            _ => CharacterKind::Regular,
        }
    }
}

/// A run of text.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Characters {
    /// Whether this is whitespace, NULL, or other text.
    pub kind: CharacterKind,

    /// The text itself.
    pub text: String,

    /// Where the text is in the input.
    pub span: Span,
}

/// The token type produced by the [`crate::Tokenizer`].
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Token {
    /// A HTML start tag.
    StartTag(StartTag),
    /// A HTML end tag.
    EndTag(EndTag),
    /// A run of characters of one [`CharacterKind`].
    Characters(Characters),
    /// A HTML comment.
    Comment(Comment),
    /// A HTML doctype declaration.
    Doctype(Doctype),
    /// End of input. Produced exactly once, as the last token.
    Eof,
}

impl Token {
    /// Location of this token in the input, if it has one.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Token::StartTag(tag) => Some(tag.span),
            Token::EndTag(tag) => Some(tag.span),
            Token::Characters(chars) => Some(chars.span),
            Token::Comment(comment) => Some(comment.span),
            Token::Doctype(doctype) => Some(doctype.span),
            Token::Eof => None,
        }
    }
}
