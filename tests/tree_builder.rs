use html5arbor::{
    parse, parse_fragment, parse_fragment_with_options, parse_with_options, serialize_children,
    Error, NodeData, ParserOptions, QuirksMode,
};
use pretty_assertions::assert_eq;

fn body_html(input: &str) -> String {
    let parsed = parse(input);
    let body = parsed.tree.body(parsed.root).unwrap();
    serialize_children(&parsed.tree, &body)
}

fn quirks_mode(input: &str) -> QuirksMode {
    let parsed = parse(input);
    match parsed.tree.node(parsed.root).data {
        NodeData::Document { quirks_mode } => quirks_mode,
        ref other => panic!("root is not a document: {:?}", other),
    }
}

#[test]
fn misnested_formatting_elements() {
    assert_eq!(
        body_html("<b>1<p>2</b>3</p>"),
        "<b>1</b><p><b>2</b>3</p>"
    );
    assert_eq!(
        body_html("<a>1<div>2</a>3</div>"),
        "<a>1</a><div><a>2</a>3</div>"
    );
}

#[test]
fn formatting_elements_are_reopened_in_new_blocks() {
    assert_eq!(
        body_html("<p><i>a<p>b"),
        "<p><i>a</i></p><p><i>b</i></p>"
    );
}

#[test]
fn noahs_ark_limits_reconstruction_to_three_clones() {
    assert_eq!(
        body_html("<!DOCTYPE html><p><b><b><b><b><p>x"),
        "<p><b><b><b><b></b></b></b></b></p><p><b><b><b>x</b></b></b></p>"
    );
}

#[test]
fn noahs_ark_limits_what_end_tags_can_match() {
    assert_eq!(
        body_html("<!DOCTYPE html><b><b><b><b>X</b></b></b></b>Y"),
        "<b><b><b><b>X</b></b></b></b>Y"
    );

    // only three of the four <b> entries survive to be reopened, so the fourth </b> has
    // nothing left to close
    let parsed = parse("<!DOCTYPE html><p><b><b><b><b>X</p>Y</b></b></b></b>Z");
    let body = parsed.tree.body(parsed.root).unwrap();
    assert_eq!(
        serialize_children(&parsed.tree, &body),
        "<p><b><b><b><b>X</b></b></b></b></p><b><b><b>Y</b></b></b>Z"
    );
    assert!(parsed
        .errors
        .iter()
        .any(|e| e.offset == "<!DOCTYPE html><p><b><b><b><b>X</p>Y</b></b></b>".len()));
}

#[test]
fn foster_parenting_moves_content_before_the_table() {
    assert_eq!(
        body_html("<table><tr><td>1</td></tr>x<b>y</b></table>"),
        "x<b>y</b><table><tbody><tr><td>1</td></tr></tbody></table>"
    );
}

#[test]
fn table_whitespace_stays_in_the_table() {
    assert_eq!(
        body_html("<table> <tr> </tr> </table>"),
        "<table> <tbody><tr> </tr> </tbody></table>"
    );
}

#[test]
fn character_references() {
    let parsed = parse("<p>&amp; &notit; &#65;&#x42;");
    let body = parsed.tree.body(parsed.root).unwrap();
    assert_eq!(parsed.tree.text_content(body), "& ¬it; AB");
    assert!(parsed
        .errors
        .iter()
        .any(|e| e.code == Error::MissingSemicolonAfterCharacterReference));
}

#[test]
fn character_references_can_be_left_alone() {
    let parsed = parse_with_options(
        "<p title='&amp;'>&amp;",
        ParserOptions::default().with_decode_html_entities(false),
    );
    let body = parsed.tree.body(parsed.root).unwrap();
    assert_eq!(
        serialize_children(&parsed.tree, &body),
        "<p title=\"&amp;amp;\">&amp;amp;</p>"
    );
}

#[test]
fn void_elements() {
    assert_eq!(
        body_html("<p>a<br>b<img src=x></p></br>"),
        "<p>a<br>b<img src=\"x\"></p><br>"
    );
}

#[test]
fn image_is_renamed_to_img() {
    assert_eq!(body_html("<image src=x>"), "<img src=\"x\">");
}

#[test]
fn isindex_expands_into_a_form() {
    let parsed = parse("<isindex prompt=\"Search: \" action=\"/s\" size=3>");
    let body = parsed.tree.body(parsed.root).unwrap();
    assert_eq!(
        serialize_children(&parsed.tree, &body),
        "<form action=\"/s\"><hr><label>Search: <input size=\"3\" name=\"isindex\"></label><hr></form>"
    );
    assert!(parsed.errors.iter().any(|e| e.code == Error::IsindexStartTag));
}

#[test]
fn isindex_has_a_default_prompt() {
    assert_eq!(
        body_html("<isindex>"),
        "<form><hr><label>This is a searchable index. Enter search keywords: \
         <input name=\"isindex\"></label><hr></form>"
    );
}

#[test]
fn isindex_is_ignored_inside_a_form() {
    assert_eq!(body_html("<form><isindex>"), "<form></form>");
}

#[test]
fn missing_doctype_is_quirks() {
    assert_eq!(quirks_mode("<p>x"), QuirksMode::Quirks);
    assert_eq!(quirks_mode("<!DOCTYPE html><p>x"), QuirksMode::NoQuirks);
    assert_eq!(
        quirks_mode("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\">"),
        QuirksMode::Quirks
    );
    assert_eq!(
        quirks_mode(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \
             \"http://www.w3.org/TR/html4/loose.dtd\">"
        ),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(
        quirks_mode("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"\">"),
        QuirksMode::LimitedQuirks
    );
}

#[test]
fn tables_do_not_close_paragraphs_in_quirks_mode() {
    assert_eq!(body_html("<p><table></table>"), "<p><table></table></p>");
    assert_eq!(
        body_html("<!DOCTYPE html><p><table></table>"),
        "<p></p><table></table>"
    );
}

#[test]
fn foreign_content() {
    assert_eq!(
        body_html("<svg><foreignObject><p>a</p></foreignObject><circle/></svg>"),
        "<svg><foreignObject><p>a</p></foreignObject><circle></circle></svg>"
    );
    assert_eq!(
        body_html("<math><mtext><b>x</b></mtext></math>"),
        "<math><mtext><b>x</b></mtext></math>"
    );
}

#[test]
fn cdata_only_in_foreign_content() {
    assert_eq!(
        body_html("<svg><![CDATA[a<b]]></svg>"),
        "<svg>a&lt;b</svg>"
    );
    assert_eq!(body_html("<div><![CDATA[a]]></div>"), "<div><!--[CDATA[a]]--></div>");
}

#[test]
fn template_contents_are_separate() {
    let parsed = parse("<template><td>x</td></template>");
    let head = parsed.tree.head(parsed.root).unwrap();
    assert_eq!(
        serialize_children(&parsed.tree, &head),
        "<template><td>x</td></template>"
    );
    let templates = parsed.tree.elements_by_tag_name(parsed.root, "template");
    assert_eq!(templates.len(), 1);
    assert!(parsed.tree.children(templates[0]).is_empty());
}

#[test]
fn noscript_follows_scripting_flag() {
    let scripted = parse("<noscript><b>x</b></noscript>");
    let head = scripted.tree.head(scripted.root).unwrap();
    assert_eq!(
        serialize_children(&scripted.tree, &head),
        "<noscript><b>x</b></noscript>"
    );
    assert_eq!(scripted.tree.text_content(head), "<b>x</b>");

    let unscripted = parse_with_options(
        "<noscript><b>x</b></noscript>",
        ParserOptions::default().with_scripting_enabled(false),
    );
    let body = unscripted.tree.body(unscripted.root).unwrap();
    assert_eq!(serialize_children(&unscripted.tree, &body), "<b>x</b>");
}

#[test]
fn fragments() {
    let parsed = parse_fragment("<td>x</td>", "tr");
    assert_eq!(serialize_children(&parsed.tree, &parsed.root), "<td>x</td>");

    let parsed = parse_fragment("<li>a<li>b", "ul");
    assert_eq!(
        serialize_children(&parsed.tree, &parsed.root),
        "<li>a</li><li>b</li>"
    );

    let parsed = parse_fragment("<b>a</title>", "title");
    assert_eq!(serialize_children(&parsed.tree, &parsed.root), "&lt;b&gt;a");

    let parsed = parse_fragment("<td>x", "template");
    assert_eq!(serialize_children(&parsed.tree, &parsed.root), "<td>x</td>");
}

#[test]
fn fragment_errors_can_be_dropped() {
    let parsed = parse_fragment_with_options(
        "</p></p>",
        "div",
        ParserOptions::default().with_collect_errors(false),
    );
    assert!(parsed.errors.is_empty());
    assert_eq!(
        serialize_children(&parsed.tree, &parsed.root),
        "<p></p><p></p>"
    );
}

#[test]
fn frameset() {
    let parsed = parse("<frameset><frame></frameset>");
    let html = parsed.tree.children(parsed.root)[0];
    assert_eq!(
        serialize_children(&parsed.tree, &html),
        "<head></head><frameset><frame></frameset>"
    );
    assert!(parsed.tree.body(parsed.root).is_none());
}

#[test]
fn text_after_body_moves_into_body() {
    assert_eq!(body_html("<body>a</body>b</html>c"), "abc");
}

#[test]
fn errors_have_line_and_column() {
    let parsed = parse("\n\n<p>x");
    let missing = parsed
        .errors
        .iter()
        .find(|e| e.code == Error::MissingDoctype)
        .unwrap();
    assert_eq!((missing.line, missing.column, missing.offset), (3, 1, 2));
}

#[test]
fn eof_with_open_elements_is_an_error() {
    let parsed = parse("<!DOCTYPE html><div>");
    assert!(parsed
        .errors
        .iter()
        .any(|e| e.code == Error::OpenElementsLeftAfterEof));

    let parsed = parse("<!DOCTYPE html><p>x");
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
}

#[test]
fn adoption_agency_reparents_misnested_inline_elements() {
    assert_eq!(
        body_html("<b>1<i>2</b>3</i>"),
        "<b>1<i>2</i></b><i>3</i>"
    );
}

#[test]
fn stray_table_text_is_fostered() {
    assert_eq!(
        body_html("<table>X<tr><td>Y</td></tr></table>"),
        "X<table><tbody><tr><td>Y</td></tr></tbody></table>"
    );
}

#[test]
fn bare_character_references() {
    assert_eq!(body_html("&amp;"), "&amp;");
    assert_eq!(body_html("&notit;"), "¬it;");
    assert_eq!(body_html("&#65;"), "A");
}

#[test]
fn fragment_in_a_cell_context() {
    let parsed = parse_fragment("<td>x</td>", "td");
    assert_eq!(serialize_children(&parsed.tree, &parsed.root), "x");
}
