use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use glob::glob;
use libtest_mimic::{self, Arguments, Trial};

use html5arbor::{
    testutils::trace_log, Dom, Namespace, Parser, ParserOptions, TreeAdapter,
};
use pretty_assertions::assert_eq;

mod testutils;

#[derive(Default, Debug, Clone)]
struct Testcase {
    data: String,
    errors: Option<String>,
    new_errors: Option<String>,
    document_fragment: Option<String>,
    script_off: Option<String>,
    script_on: Option<String>,
    document: Option<String>,
}

impl Testcase {
    /// Read one test out of a `.dat` file. Tests are separated by a blank line followed by
    /// `#data`, so the line iterator is consumed up to and including the next `#data`.
    fn parse(path: &Path, iter: impl Iterator<Item = std::io::Result<Vec<u8>>>) -> Option<Self> {
        let mut rv = Testcase::default();
        let mut current_field: Option<&mut String> = Some(&mut rv.data);
        let mut has_document = false;

        for line in iter {
            let line = String::from_utf8(line.unwrap()).unwrap();

            match line.as_str() {
                "#data" => {
                    if has_document {
                        break;
                    }
                }
                "#errors" => current_field = Some(rv.errors.get_or_insert_with(Default::default)),
                "#new-errors" => {
                    current_field = Some(rv.new_errors.get_or_insert_with(Default::default))
                }
                "#document-fragment" => {
                    current_field = Some(rv.document_fragment.get_or_insert_with(Default::default))
                }
                "#script-on" => {
                    current_field = Some(rv.script_on.get_or_insert_with(Default::default))
                }
                "#script-off" => {
                    current_field = Some(rv.script_off.get_or_insert_with(Default::default))
                }
                "#document" => {
                    has_document = true;
                    current_field = Some(rv.document.get_or_insert_with(Default::default))
                }
                x => match current_field {
                    Some(ref mut current_field) => {
                        current_field.push_str(x);
                        current_field.push('\n');
                    }
                    None => {
                        panic!("{:?}: Unexpected line: {:?}", path, x);
                    }
                },
            }
        }

        if !has_document {
            return None;
        }

        // the blank line separating two tests
        if let Some(ref mut document) = rv.document {
            while document.ends_with("\n\n") {
                document.pop();
            }
        }

        Some(rv)
    }
}

fn produce_testcases_from_file(tests: &mut Vec<Trial>, path: &Path) {
    let fname = path.file_name().unwrap().to_str().unwrap();

    let mut lines_iter = BufReader::new(File::open(path).unwrap())
        .split(b'\n')
        .peekable();

    let mut i = 0;

    while let Some(testcase) = Testcase::parse(path, &mut lines_iter) {
        i += 1;

        // if script_on is not explicitly provided, it's ok to run this test with scripting
        // disabled
        if testcase.script_on.is_none() {
            tests.push(build_test(testcase.clone(), fname, i, false));
        }

        // if script_off is not explicitly provided, it's ok to run this test with scripting
        // enabled
        if testcase.script_off.is_none() {
            tests.push(build_test(testcase, fname, i, true));
        }
    }
}

/// Turn the `#document-fragment` line (`td`, `svg path`, `math mi`) into a name and namespace.
fn fragment_context(line: &str) -> (Namespace, &str) {
    match line.split_once(' ') {
        Some(("svg", name)) => (Namespace::Svg, name),
        Some(("math", name)) => (Namespace::MathMl, name),
        _ => (Namespace::Html, line),
    }
}

fn build_test(testcase: Testcase, fname: &str, i: usize, scripting: bool) -> Trial {
    let scripting_text = if scripting { "yesscript" } else { "noscript" };
    Trial::test(format!("{}:{}:{scripting_text}", fname, i), move || {
        testutils::catch_unwind_and_report(move || {
            trace_log(&format!("{:#?}", testcase));
            let options = ParserOptions::default().with_scripting_enabled(scripting);
            let input = testcase.data.trim_end_matches('\n');

            let parsed = match testcase.document_fragment {
                Some(ref context) => {
                    let (namespace, name) = fragment_context(context.trim_end_matches('\n'));
                    let mut dom = Dom::new();
                    let context = dom.create_element(name, namespace, Vec::new());
                    Parser::new_fragment(input, dom, &context, options).finish()
                }
                None => Parser::new(input, Dom::new(), options).finish(),
            };

            for error in &parsed.errors {
                trace_log(&format!("error: {:?}", error));
            }

            assert_eq!(
                parsed.tree.to_test_string(parsed.root),
                testcase.document.unwrap_or_default()
            );
        })
    })
}

fn main() {
    let args = Arguments::from_args();
    let mut tests = Vec::new();

    for entry in glob("tests/data/tree-construction/*.dat").unwrap() {
        produce_testcases_from_file(&mut tests, &entry.unwrap());
    }

    libtest_mimic::run(&args, tests).exit();
}
