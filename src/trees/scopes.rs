//! Element sets used by the tree builder: scope boundaries, special elements and elements with
//! optional end tags.
use crate::trees::construction_dispatcher::ExpandedName;
use crate::Namespace;

pub(crate) fn html_default_scope(name: ExpandedName<'_>) -> bool {
    name.ns == Namespace::Html
        && matches!(
            name.local,
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object" | "template"
        )
}

pub(crate) fn default_scope(name: ExpandedName<'_>) -> bool {
    html_default_scope(name)
        || mathml_text_integration_point(name)
        || (name.ns == Namespace::MathMl && name.local == "annotation-xml")
        || svg_html_integration_point(name)
}

pub(crate) fn mathml_text_integration_point(name: ExpandedName<'_>) -> bool {
    name.ns == Namespace::MathMl && matches!(name.local, "mi" | "mo" | "mn" | "ms" | "mtext")
}

pub(crate) fn svg_html_integration_point(name: ExpandedName<'_>) -> bool {
    name.ns == Namespace::Svg && matches!(name.local, "foreignObject" | "desc" | "title")
}

pub(crate) fn list_item_scope(name: ExpandedName<'_>) -> bool {
    default_scope(name) || (name.ns == Namespace::Html && matches!(name.local, "ol" | "ul"))
}

pub(crate) fn button_scope(name: ExpandedName<'_>) -> bool {
    default_scope(name) || (name.ns == Namespace::Html && name.local == "button")
}

pub(crate) fn table_scope(name: ExpandedName<'_>) -> bool {
    name.ns == Namespace::Html && matches!(name.local, "html" | "table" | "template")
}

pub(crate) fn select_scope(name: ExpandedName<'_>) -> bool {
    !(name.ns == Namespace::Html && matches!(name.local, "optgroup" | "option"))
}

/// Elements whose end tag may be omitted and is implied by later content.
pub(crate) fn implied_end_tag(name: ExpandedName<'_>) -> bool {
    name.ns == Namespace::Html
        && matches!(
            name.local,
            "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
        )
}

/// Implied end tags plus table structure, closed when a template or the document ends.
pub(crate) fn implied_end_tag_thorough(name: ExpandedName<'_>) -> bool {
    implied_end_tag(name)
        || (name.ns == Namespace::Html
            && matches!(
                name.local,
                "caption" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
            ))
}

pub(crate) fn numbered_header(name: ExpandedName<'_>) -> bool {
    name.ns == Namespace::Html && matches!(name.local, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

pub(crate) fn table_body_context(name: ExpandedName<'_>) -> bool {
    name.ns == Namespace::Html && matches!(name.local, "tbody" | "thead" | "tfoot")
}

pub(crate) fn table_cell(name: ExpandedName<'_>) -> bool {
    name.ns == Namespace::Html && matches!(name.local, "td" | "th")
}

/// Elements that end up in the "special" category of the parsing algorithm.
pub(crate) fn special(name: ExpandedName<'_>) -> bool {
    match name.ns {
        Namespace::Html => matches!(
            name.local,
            "address"
                | "applet"
                | "area"
                | "article"
                | "aside"
                | "base"
                | "basefont"
                | "bgsound"
                | "blockquote"
                | "body"
                | "br"
                | "button"
                | "caption"
                | "center"
                | "col"
                | "colgroup"
                | "dd"
                | "details"
                | "dir"
                | "div"
                | "dl"
                | "dt"
                | "embed"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "frame"
                | "frameset"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "header"
                | "hgroup"
                | "hr"
                | "html"
                | "iframe"
                | "img"
                | "input"
                | "isindex"
                | "keygen"
                | "li"
                | "link"
                | "listing"
                | "main"
                | "marquee"
                | "menu"
                | "meta"
                | "nav"
                | "noembed"
                | "noframes"
                | "noscript"
                | "object"
                | "ol"
                | "p"
                | "param"
                | "plaintext"
                | "pre"
                | "script"
                | "search"
                | "section"
                | "select"
                | "source"
                | "style"
                | "summary"
                | "table"
                | "tbody"
                | "td"
                | "template"
                | "textarea"
                | "tfoot"
                | "th"
                | "thead"
                | "title"
                | "tr"
                | "track"
                | "ul"
                | "wbr"
                | "xmp"
        ),
        _ => {
            mathml_text_integration_point(name)
                || (name.ns == Namespace::MathMl && name.local == "annotation-xml")
                || svg_html_integration_point(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(local: &str) -> ExpandedName<'_> {
        ExpandedName {
            ns: Namespace::Html,
            local,
        }
    }

    #[test]
    fn scopes_respect_namespaces() {
        assert!(default_scope(html("table")));
        assert!(!default_scope(ExpandedName {
            ns: Namespace::Svg,
            local: "table"
        }));
        assert!(default_scope(ExpandedName {
            ns: Namespace::Svg,
            local: "foreignObject"
        }));
        assert!(button_scope(html("button")));
        assert!(!list_item_scope(html("button")));
        assert!(select_scope(html("div")));
        assert!(!select_scope(html("option")));
    }

    #[test]
    fn special_elements() {
        assert!(special(html("p")));
        assert!(!special(html("b")));
        assert!(special(ExpandedName {
            ns: Namespace::MathMl,
            local: "mi"
        }));
    }
}
