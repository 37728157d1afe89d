//! Turning trees back into text: HTML serialization and the html5lib test format.
use std::fmt::Write;

use crate::{Attribute, Namespace, TreeAdapter};

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text_parent(name: &str) -> bool {
    matches!(
        name,
        "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext" | "noscript"
    )
}

/// Serialize `node` and everything below it. Documents and fragments serialize as their children.
pub fn serialize<A: TreeAdapter>(adapter: &A, node: &A::Handle) -> String {
    let mut out = String::new();
    if adapter.is_element_node(node)
        || adapter.is_text_node(node)
        || adapter.is_comment_node(node)
        || adapter.is_document_type_node(node)
    {
        serialize_node(adapter, node, None, &mut out);
    } else {
        serialize_children_into(adapter, node, &mut out);
    }
    out
}

/// Serialize the children of `node`, like `innerHTML`.
pub fn serialize_children<A: TreeAdapter>(adapter: &A, node: &A::Handle) -> String {
    let mut out = String::new();
    serialize_children_into(adapter, node, &mut out);
    out
}

fn serialize_children_into<A: TreeAdapter>(adapter: &A, node: &A::Handle, out: &mut String) {
    let parent = if adapter.is_element_node(node) {
        Some(node)
    } else {
        None
    };

    let children_of = match parent.and_then(|p| adapter.get_template_content(p)) {
        Some(content) => content,
        None => node.clone(),
    };

    for child in adapter.get_child_nodes(&children_of) {
        serialize_node(adapter, &child, parent, out);
    }
}

fn serialize_node<A: TreeAdapter>(
    adapter: &A,
    node: &A::Handle,
    parent: Option<&A::Handle>,
    out: &mut String,
) {
    if adapter.is_element_node(node) {
        let name = adapter.get_tag_name(node);
        out.push('<');
        out.push_str(name);
        for attr in adapter.get_attr_list(node) {
            out.push(' ');
            push_attribute_name(attr, out);
            out.push_str("=\"");
            escape(&attr.value, true, out);
            out.push('"');
        }
        out.push('>');

        if adapter.get_namespace_uri(node) == Namespace::Html && is_void_element(name) {
            return;
        }

        serialize_children_into(adapter, node, out);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    } else if adapter.is_text_node(node) {
        let text = adapter.get_text_node_content(node);
        let raw = parent.map_or(false, |p| {
            adapter.get_namespace_uri(p) == Namespace::Html
                && is_raw_text_parent(adapter.get_tag_name(p))
        });
        if raw {
            out.push_str(text);
        } else {
            escape(text, false, out);
        }
    } else if adapter.is_comment_node(node) {
        out.push_str("<!--");
        out.push_str(adapter.get_comment_node_content(node));
        out.push_str("-->");
    } else if adapter.is_document_type_node(node) {
        let (name, _, _) = adapter.get_document_type_node_ids(node);
        out.push_str("<!DOCTYPE ");
        out.push_str(name);
        out.push('>');
    }
}

fn push_attribute_name(attr: &Attribute, out: &mut String) {
    match attr.namespace {
        None => (),
        Some(Namespace::Xml) => out.push_str("xml:"),
        Some(Namespace::Xmlns) if attr.name == "xmlns" => (),
        Some(Namespace::Xmlns) => out.push_str("xmlns:"),
        Some(Namespace::XLink) => out.push_str("xlink:"),
        Some(_) => {
            if let Some(ref prefix) = attr.prefix {
                out.push_str(prefix);
                out.push(':');
            }
        }
    }
    out.push_str(&attr.name);
}

fn escape(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

/// Dump the tree below `root` (exclusive) in the format used by html5lib's tree construction
/// tests: one node per line, prefixed with `| ` and indented by two spaces per level.
pub fn to_test_string<A: TreeAdapter>(adapter: &A, root: &A::Handle) -> String {
    let mut out = String::new();
    for child in adapter.get_child_nodes(root) {
        dump_node(adapter, &child, 0, &mut out);
    }
    out
}

fn dump_node<A: TreeAdapter>(adapter: &A, node: &A::Handle, depth: usize, out: &mut String) {
    let indent = |out: &mut String, depth: usize| {
        out.push_str("| ");
        for _ in 0..depth {
            out.push_str("  ");
        }
    };

    indent(out, depth);
    if adapter.is_element_node(node) {
        let name = adapter.get_tag_name(node);
        let _ = match adapter.get_namespace_uri(node) {
            Namespace::Svg => writeln!(out, "<svg {}>", name),
            Namespace::MathMl => writeln!(out, "<math {}>", name),
            _ => writeln!(out, "<{}>", name),
        };

        let mut attributes: Vec<(String, &str)> = adapter
            .get_attr_list(node)
            .iter()
            .map(|attr| {
                let prefix = match attr.namespace {
                    Some(Namespace::XLink) => "xlink ",
                    Some(Namespace::Xml) => "xml ",
                    Some(Namespace::Xmlns) => "xmlns ",
                    _ => "",
                };
                (format!("{}{}", prefix, attr.name), attr.value.as_str())
            })
            .collect();
        attributes.sort();
        for (name, value) in attributes {
            indent(out, depth + 1);
            let _ = writeln!(out, "{}=\"{}\"", name, value);
        }

        if let Some(content) = adapter.get_template_content(node) {
            indent(out, depth + 1);
            out.push_str("content\n");
            for child in adapter.get_child_nodes(&content) {
                dump_node(adapter, &child, depth + 2, out);
            }
        } else {
            for child in adapter.get_child_nodes(node) {
                dump_node(adapter, &child, depth + 1, out);
            }
        }
    } else if adapter.is_text_node(node) {
        let _ = writeln!(out, "\"{}\"", adapter.get_text_node_content(node));
    } else if adapter.is_comment_node(node) {
        let _ = writeln!(out, "<!-- {} -->", adapter.get_comment_node_content(node));
    } else if adapter.is_document_type_node(node) {
        let (name, public_id, system_id) = adapter.get_document_type_node_ids(node);
        if public_id.is_empty() && system_id.is_empty() {
            let _ = writeln!(out, "<!DOCTYPE {}>", name);
        } else {
            let _ = writeln!(
                out,
                "<!DOCTYPE {} \"{}\" \"{}\">",
                name, public_id, system_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dom;

    #[test]
    fn escaping_and_void_elements() {
        let mut dom = Dom::new();
        let root = dom.create_document_fragment();
        let a = dom.create_element(
            "a",
            Namespace::Html,
            vec![Attribute::new("title", "\"x\" & <y>")],
        );
        dom.append_child(&root, &a);
        dom.insert_text(&a, "1 < 2 &\u{a0}");
        let br = dom.create_element("br", Namespace::Html, Vec::new());
        dom.append_child(&root, &br);
        let script = dom.create_element("script", Namespace::Html, Vec::new());
        dom.append_child(&root, &script);
        dom.insert_text(&script, "a < b");

        assert_eq!(
            serialize(&dom, &root),
            "<a title=\"&quot;x&quot; &amp; <y>\">1 &lt; 2 &amp;&nbsp;</a><br><script>a < b</script>"
        );
    }

    #[test]
    fn foreign_attribute_names() {
        let mut dom = Dom::new();
        let root = dom.create_document_fragment();
        let mut href = Attribute::new("href", "#a");
        href.prefix = Some("xlink".to_owned());
        href.namespace = Some(Namespace::XLink);
        let use_ = dom.create_element("use", Namespace::Svg, vec![href]);
        dom.append_child(&root, &use_);

        assert_eq!(serialize_children(&dom, &root), "<use xlink:href=\"#a\"></use>");
        assert_eq!(
            to_test_string(&dom, &root),
            "| <svg use>\n|   xlink href=\"#a\"\n"
        );
    }
}
