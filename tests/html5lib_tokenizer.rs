use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use html5arbor::{testutils::trace_log, Error, State, Token, Tokenizer};

use glob::glob;
use libtest_mimic::{Arguments, Trial};
use pretty_assertions::assert_eq;
use serde::{de::Error as _, Deserialize};

mod testutils;

/// A token as html5lib-tests writes it down. Unlike [`Token`], it has no spans and adjacent
/// character tokens are always merged.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TestToken {
    Doctype {
        name: Option<String>,
        public_identifier: Option<String>,
        system_identifier: Option<String>,
        force_quirks: bool,
    },
    StartTag {
        name: String,
        attributes: BTreeMap<String, String>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Character(String),
}

#[derive(Clone, Debug)]
struct ExpectedOutputTokens(Vec<TestToken>);

impl<'de> Deserialize<'de> for ExpectedOutputTokens {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // this macro is a horrible way to define a type that deserializes only from a particular
        // string. Together with serde(untagged) this gives us really flexible enum tagging with really
        // terrible error messages.
        macro_rules! def_const {
            ($str:expr, $ty:ident) => {
                #[derive(Deserialize)]
                enum $ty {
                    #[serde(rename = $str)]
                    $ty,
                }
            };
        }

        def_const!("DOCTYPE", DoctypeConst);
        def_const!("StartTag", StartTagConst);
        def_const!("EndTag", EndTagConst);
        def_const!("Comment", CommentConst);
        def_const!("Character", CharacterConst);

        type Attributes = BTreeMap<String, String>;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OutputToken {
            // "DOCTYPE", name, public_id, system_id, correctness
            Doctype(
                DoctypeConst,
                Option<String>,
                Option<String>,
                Option<String>,
                bool,
            ),
            // "StartTag", name, attributes, self_closing
            StartTag(StartTagConst, String, Attributes),
            StartTag2(StartTagConst, String, Attributes, bool),
            // "EndTag", name
            EndTag(EndTagConst, String),
            // "Comment", data
            Comment(CommentConst, String),
            // "Character", data
            Character(CharacterConst, String),
        }

        let mut tokens = Vec::new();
        for output_token in Vec::deserialize(deserializer)? {
            let token = match output_token {
                OutputToken::Doctype(_, name, public_identifier, system_identifier, correctness) => {
                    TestToken::Doctype {
                        name,
                        public_identifier,
                        system_identifier,
                        force_quirks: !correctness,
                    }
                }
                OutputToken::StartTag(_, name, attributes) => TestToken::StartTag {
                    name,
                    attributes,
                    self_closing: false,
                },
                OutputToken::StartTag2(_, name, attributes, self_closing) => TestToken::StartTag {
                    name,
                    attributes,
                    self_closing,
                },
                OutputToken::EndTag(_, name) => TestToken::EndTag(name),
                OutputToken::Comment(_, data) => TestToken::Comment(data),
                OutputToken::Character(_, data) => TestToken::Character(data),
            };
            push_merged(&mut tokens, token);
        }

        Ok(ExpectedOutputTokens(tokens))
    }
}

fn push_merged(tokens: &mut Vec<TestToken>, token: TestToken) {
    if let TestToken::Character(ref data) = token {
        if let Some(TestToken::Character(prev)) = tokens.last_mut() {
            prev.push_str(data);
            return;
        }
    }
    tokens.push(token);
}

#[derive(Clone, Debug)]
struct InitialState(State);

impl<'de> Deserialize<'de> for InitialState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        enum RawInitialState {
            #[serde(rename = "Data state")]
            Data,
            #[serde(rename = "PLAINTEXT state")]
            PlainText,
            #[serde(rename = "RCDATA state")]
            RcData,
            #[serde(rename = "RAWTEXT state")]
            RawText,
            #[serde(rename = "Script data state")]
            ScriptData,
            #[serde(rename = "CDATA section state")]
            CdataSection,
        }

        Ok(Self(match RawInitialState::deserialize(deserializer)? {
            RawInitialState::Data => State::Data,
            RawInitialState::PlainText => State::PlainText,
            RawInitialState::RcData => State::RcData,
            RawInitialState::RawText => State::RawText,
            RawInitialState::ScriptData => State::ScriptData,
            RawInitialState::CdataSection => State::CdataSection,
        }))
    }
}

fn initial_states_default() -> Vec<InitialState> {
    vec![InitialState(State::Data)]
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct TestFileEntry {
    description: String,
    input: String,
    output: ExpectedOutputTokens,
    #[serde(default = "initial_states_default")]
    initial_states: Vec<InitialState>,
    #[serde(default)]
    double_escaped: bool,
    #[serde(default)]
    last_start_tag: Option<String>,
    #[serde(default)]
    errors: Vec<ExpectedError>,
}

#[derive(Debug, Eq, PartialEq, Clone)]
struct ErrorCode(Error);

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let str_err = String::deserialize(deserializer)?;
        let err: Error = str_err
            .parse()
            .map_err(|_| D::Error::custom(format!("failed to deserialize error: {}", str_err)))?;
        Ok(ErrorCode(err))
    }
}

#[derive(Deserialize, Debug, Eq, PartialEq, Clone)]
struct ExpectedError {
    code: ErrorCode,
}

#[derive(Deserialize)]
struct TestFile {
    tests: Vec<TestFileEntry>,
}

#[derive(Debug, Clone, Copy)]
enum ReaderType {
    Utf8,
    Utf16,
}

#[derive(Debug)]
struct TestCase {
    state: State,
    reader_type: ReaderType,
    filename: String,
    test_i: usize,
    declaration: TestFileEntry,
}

/// Implements the `\uXXXX` escapes described in the tokenizer tests of html5lib-tests (and
/// nothing more). Returns `None` for lone surrogates, which a `String` cannot hold.
fn unescape(data: &str) -> Option<String> {
    let mut stream = data.chars();
    let mut rv = String::new();

    loop {
        match stream.next() {
            Some('\\') => (),
            Some(x) => {
                rv.push(x);
                continue;
            }
            None => break,
        }

        match stream.next() {
            Some('u') => (),
            x => panic!("unexpected escape: {:?}", x),
        }

        let hex: String = stream.by_ref().take(4).collect();
        let c = u32::from_str_radix(&hex, 16).expect("failed to parse as hex");
        rv.push(char::from_u32(c)?);
    }

    Some(rv)
}

fn unescape_declaration(declaration: &mut TestFileEntry) -> Option<()> {
    declaration.input = unescape(&declaration.input)?;
    for token in &mut declaration.output.0 {
        match token {
            TestToken::Character(x) | TestToken::Comment(x) => *x = unescape(x)?,
            _ => (),
        }
    }
    Some(())
}

fn produce_testcases_from_file(tests: &mut Vec<Trial>, path: &Path) {
    let fname = path.file_name().unwrap().to_str().unwrap();

    let f = File::open(path).unwrap();
    let bf = BufReader::new(f);
    let TestFile {
        tests: declarations,
    } = serde_json::from_reader(bf).unwrap();

    for (test_i, mut declaration) in declarations.into_iter().enumerate() {
        // lone surrogates cannot be fed through a &str
        let representable = !declaration.double_escaped
            || unescape_declaration(&mut declaration).is_some();

        for state in &declaration.initial_states {
            for reader_type in [ReaderType::Utf8, ReaderType::Utf16] {
                let name = format!(
                    "{}:{}:{:?}:{:?}",
                    fname, declaration.description, state.0, reader_type
                );
                let case = TestCase {
                    state: state.0,
                    reader_type,
                    filename: fname.to_owned(),
                    test_i,
                    declaration: declaration.clone(),
                };
                let trial = Trial::test(name, move || {
                    testutils::catch_unwind_and_report(move || run_case(&case))
                });
                tests.push(trial.with_ignored_flag(!representable));
            }
        }
    }
}

fn run_case(test: &TestCase) {
    trace_log(&format!(
        "==== FILE {}, TEST {}, STATE {:?}, READER {:?} ====",
        test.filename, test.test_i, test.state, test.reader_type,
    ));
    trace_log(&format!("description: {}", test.declaration.description));

    let input = test.declaration.input.as_str();
    match test.reader_type {
        ReaderType::Utf8 => run_test(test, Tokenizer::new(input)),
        ReaderType::Utf16 => {
            let units: Vec<u16> = input.encode_utf16().collect();
            run_test(test, Tokenizer::new(&units))
        }
    }
}

fn run_test<R: html5arbor::Reader>(test: &TestCase, mut tokenizer: Tokenizer<R>) {
    tokenizer.set_state(test.state);
    tokenizer.set_last_start_tag(test.declaration.last_start_tag.as_deref());

    let mut actual_tokens = Vec::new();
    for token in &mut tokenizer {
        let token = match token {
            Token::Doctype(doctype) => TestToken::Doctype {
                name: doctype.name,
                public_identifier: doctype.public_identifier,
                system_identifier: doctype.system_identifier,
                force_quirks: doctype.force_quirks,
            },
            Token::StartTag(tag) => TestToken::StartTag {
                name: tag.name,
                attributes: tag
                    .attributes
                    .into_iter()
                    .map(|attr| (attr.name, attr.value))
                    .collect(),
                self_closing: tag.self_closing,
            },
            Token::EndTag(tag) => TestToken::EndTag(tag.name),
            Token::Comment(comment) => TestToken::Comment(comment.data),
            Token::Characters(chars) => TestToken::Character(chars.text),
            Token::Eof => unreachable!("the iterator stops before eof"),
        };
        push_merged(&mut actual_tokens, token);
    }

    let actual_errors: Vec<ExpectedError> = tokenizer
        .take_errors()
        .into_iter()
        .map(|error| ExpectedError {
            code: ErrorCode(error.code),
        })
        .collect();

    assert_eq!(actual_tokens, test.declaration.output.0);
    assert_eq!(actual_errors, test.declaration.errors);
}

fn main() {
    let args = Arguments::from_args();
    let mut tests = Vec::new();

    for entry in glob("tests/data/tokenizer/*.test").unwrap() {
        produce_testcases_from_file(&mut tests, &entry.unwrap());
    }

    libtest_mimic::run(&args, tests).exit();
}
