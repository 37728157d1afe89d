#![deny(missing_docs)]
// This is an HTML parser. HTML can be untrusted input from the internet.
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod dom;
mod emitter;
mod entities;
mod error;
mod machine;
mod machine_helper;
mod parser;
mod preprocessor;
mod reader;
mod serializer;
mod span;
mod state;
mod token;
mod tokenizer;
mod tree_adapter;
mod trees;
mod utils;

#[doc(hidden)]
pub mod testutils;

pub use dom::{Dom, Node, NodeData, NodeId};
pub use error::{Error, ParseError};
pub use parser::{
    parse, parse_fragment, parse_fragment_with_options, parse_with_options, ParseStatus, Parsed,
    Parser, ParserOptions, PauseReason,
};
pub use reader::{Readable, Reader, StringReader, Utf16Reader};
pub use serializer::{serialize, serialize_children, to_test_string};
pub use span::{SourceLocation, Span};
pub use state::State;
pub use token::{Attribute, CharacterKind, Characters, Comment, Doctype, EndTag, StartTag, Token};
pub use tokenizer::Tokenizer;
pub use tree_adapter::{Namespace, QuirksMode, TreeAdapter};
