use iai::{black_box, main};

use html5arbor::{parse, parse_fragment};

const ROW: &str = "<tr><td class=name><a href='/item'>Item &amp; more</a><td>42<td><b>bold<i>both</b>italic</i>\n";

const ARTICLE: &str = "<h2>Heading</h2>\n<p>Some <em>text</em> with a <a href=\"#x\">link</a>.\n\
<ul><li>one<li>two<li>three</ul>\n<!-- a comment -->\n<svg viewBox='0 0 1 1'><path d='M0 0'/></svg>\n";

fn document(body: &str, i: usize) {
    let mut s = String::from("<!DOCTYPE html><html><head><title>bench</title></head><body>");
    for _ in 0..i {
        s.push_str(body);
    }
    let parsed = parse(black_box(s.as_str()));
    black_box(parsed.root);
}

fn table_10() {
    document(&format!("<table>{}</table>", ROW.repeat(10)), 1)
}

fn table_1000() {
    document(&format!("<table>{}</table>", ROW.repeat(1000)), 1)
}

fn articles_10() {
    document(ARTICLE, 10)
}

fn articles_1000() {
    document(ARTICLE, 1000)
}

fn fragment_rows_1000() {
    let parsed = parse_fragment(black_box(ROW.repeat(1000).as_str()), "tbody");
    black_box(parsed.root);
}

main!(table_10, table_1000, articles_10, articles_1000, fragment_rows_1000);
