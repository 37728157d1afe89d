use std::cell::Cell;
use std::rc::Rc;

use html5arbor::{
    parse, parse_with_options, Dom, ParseStatus, Parser, ParserOptions, PauseReason,
    SourceLocation, Token,
};
use pretty_assertions::assert_eq;

#[test]
fn pauses_after_each_script() {
    let mut parser = Parser::new(
        "<script>one()</script><p>a<script>two()</script><p>b",
        Dom::new(),
        ParserOptions::default(),
    );
    parser.pause_on_script_end(true);

    let mut scripts = Vec::new();
    loop {
        match parser.run() {
            ParseStatus::Paused(PauseReason::ScriptEnd(script)) => {
                scripts.push(parser.tree().text_content(script));
                assert!(!parser.is_finished());
            }
            ParseStatus::Paused(PauseReason::Requested) => unreachable!(),
            ParseStatus::Finished => break,
        }
    }

    assert_eq!(scripts, vec!["one()".to_owned(), "two()".to_owned()]);
    assert!(parser.is_finished());

    let parsed = parser.finish();
    let body = parsed.tree.body(parsed.root).unwrap();
    assert_eq!(parsed.tree.text_content(body), "atwo()b");
}

#[test]
fn scripts_do_not_pause_by_default() {
    let mut parser = Parser::new(
        "<script>one()</script>",
        Dom::new(),
        ParserOptions::default(),
    );
    assert_eq!(parser.run(), ParseStatus::Finished);
}

#[test]
fn pause_hook_stops_after_the_token() {
    let seen = Rc::new(Cell::new(0));
    let counter = seen.clone();

    let mut parser = Parser::new("<p>a<b>b</b>c", Dom::new(), ParserOptions::default());
    parser.set_pause_hook(move |token| {
        counter.set(counter.get() + 1);
        matches!(token, Token::StartTag(tag) if tag.name == "b")
    });

    assert_eq!(parser.run(), ParseStatus::Paused(PauseReason::Requested));
    // <p>, "a", <b>
    assert_eq!(seen.get(), 3);
    assert_eq!(
        parser.tree().elements_by_tag_name(*parser.document(), "b").len(),
        1
    );

    assert_eq!(parser.run(), ParseStatus::Finished);
    let parsed = parser.finish();
    let body = parsed.tree.body(parsed.root).unwrap();
    assert_eq!(parsed.tree.text_content(body), "abc");
}

#[test]
fn step_processes_one_token_at_a_time() {
    let mut parser = Parser::new("<p>a", Dom::new(), ParserOptions::default());
    let mut steps = 0;
    while parser.step().is_none() {
        steps += 1;
    }
    // <p> and "a"; the end of input finishes the parse
    assert_eq!(steps, 2);
    assert!(parser.is_finished());
    assert_eq!(parser.step(), Some(ParseStatus::Finished));
}

#[test]
fn errors_are_available_while_parsing() {
    let mut parser = Parser::new("<p>a</b>", Dom::new(), ParserOptions::default());
    parser.step();
    assert_eq!(parser.errors().len(), 1);
    let parsed = parser.finish();
    assert_eq!(parsed.errors.len(), 2);
}

#[test]
fn utf16_input() {
    let units: Vec<u16> = "<p title=\"é\">héllo 😀</p>".encode_utf16().collect();
    let parsed = parse(&units);
    let body = parsed.tree.body(parsed.root).unwrap();
    assert_eq!(parsed.tree.text_content(body), "héllo 😀");
    let p = parsed.tree.children(body)[0];
    assert_eq!(parsed.tree.node(p).attribute("title"), Some("é"));
}

#[test]
fn locations_of_elements_and_text() {
    let parsed = parse_with_options(
        "<div>\n  <span>x</span>\n</div>",
        ParserOptions::default().with_location_info(true),
    );

    let span = parsed.tree.elements_by_tag_name(parsed.root, "span")[0];
    assert_eq!(
        parsed.tree.node(span).location(),
        Some(SourceLocation {
            start_offset: 8,
            end_offset: 22,
            start_line: 2,
            start_col: 3,
            end_line: 2,
            end_col: 17,
        })
    );

    let text = parsed.tree.children(span)[0];
    assert_eq!(
        parsed.tree.node(text).location(),
        Some(SourceLocation {
            start_offset: 14,
            end_offset: 15,
            start_line: 2,
            start_col: 9,
            end_line: 2,
            end_col: 10,
        })
    );

    let div = parsed.tree.elements_by_tag_name(parsed.root, "div")[0];
    let location = parsed.tree.node(div).location().unwrap();
    assert_eq!((location.start_offset, location.end_offset), (0, 29));
    assert_eq!((location.end_line, location.end_col), (3, 7));

    let body = parsed.tree.body(parsed.root).unwrap();
    assert_eq!(parsed.tree.node(body).location(), None);
}

#[test]
fn implicitly_closed_elements_keep_their_start_location() {
    let parsed = parse_with_options(
        "<p>a<div>b</div>",
        ParserOptions::default().with_location_info(true),
    );
    let p = parsed.tree.elements_by_tag_name(parsed.root, "p")[0];
    let location = parsed.tree.node(p).location().unwrap();
    assert_eq!((location.start_offset, location.end_offset), (0, 3));
}

#[test]
fn no_locations_by_default() {
    let parsed = parse("<p>a</p>");
    let p = parsed.tree.elements_by_tag_name(parsed.root, "p")[0];
    assert_eq!(parsed.tree.node(p).location(), None);
}

#[test]
fn script_end_takes_precedence_over_hook_request() {
    let mut parser = Parser::new(
        "<script>one()</script><p>a",
        Dom::new(),
        ParserOptions::default(),
    );
    parser.pause_on_script_end(true);
    parser.set_pause_hook(|token| matches!(token, Token::EndTag(tag) if tag.name == "script"));

    let script = match parser.run() {
        ParseStatus::Paused(PauseReason::ScriptEnd(script)) => script,
        other => panic!("expected a script pause, got {:?}", other),
    };
    assert_eq!(parser.tree().text_content(script), "one()");

    // the hook's request was covered by the script pause
    assert_eq!(parser.run(), ParseStatus::Finished);
}
