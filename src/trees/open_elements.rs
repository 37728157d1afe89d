use crate::trees::construction_dispatcher::ExpandedName;
use crate::trees::scopes::{
    button_scope, default_scope, implied_end_tag, implied_end_tag_thorough, list_item_scope,
    numbered_header, select_scope, table_body_context, table_cell, table_scope,
};
use crate::Namespace;

/// An entry of the stack of open elements: the node plus everything the tree builder needs to
/// know about it without asking the tree adapter.
#[derive(Debug, Clone)]
pub(crate) struct OpenElement<H> {
    pub(crate) handle: H,
    pub(crate) name: String,
    pub(crate) ns: Namespace,
    /// Whether this is a MathML `annotation-xml` with an HTML `encoding`, or one of SVG's
    /// `foreignObject`, `desc` and `title`.
    pub(crate) html_integration_point: bool,
}

impl<H> OpenElement<H> {
    pub(crate) fn expanded(&self) -> ExpandedName<'_> {
        ExpandedName {
            ns: self.ns,
            local: &self.name,
        }
    }

    pub(crate) fn is_html(&self, name: &str) -> bool {
        self.ns == Namespace::Html && self.name == name
    }
}

/// The [stack of open elements](https://html.spec.whatwg.org/#stack-of-open-elements). Index 0
/// is the `<html>` element once it exists; the last entry is the current node.
#[derive(Debug)]
pub(crate) struct OpenElementStack<H> {
    items: Vec<OpenElement<H>>,
}

impl<H> Default for OpenElementStack<H> {
    fn default() -> Self {
        OpenElementStack { items: Vec::new() }
    }
}

impl<H: Clone + PartialEq> OpenElementStack<H> {
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn current(&self) -> Option<&OpenElement<H>> {
        self.items.last()
    }

    pub(crate) fn current_is_html(&self, name: &str) -> bool {
        self.current().map_or(false, |x| x.is_html(name))
    }

    pub(crate) fn get(&self, index: usize) -> Option<&OpenElement<H>> {
        self.items.get(index)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, OpenElement<H>> {
        self.items.iter()
    }

    pub(crate) fn push(&mut self, element: OpenElement<H>) {
        self.items.push(element);
    }

    pub(crate) fn pop(&mut self) -> Option<OpenElement<H>> {
        // the root <html> element is never popped by the algorithm, except by fragment teardown
        self.items.pop()
    }

    pub(crate) fn position(&self, handle: &H) -> Option<usize> {
        self.items.iter().rposition(|x| x.handle == *handle)
    }

    pub(crate) fn contains(&self, handle: &H) -> bool {
        self.position(handle).is_some()
    }

    /// Whether an HTML element called `name` is anywhere on the stack.
    pub(crate) fn contains_html(&self, name: &str) -> bool {
        self.items.iter().any(|x| x.is_html(name))
    }

    pub(crate) fn replace(&mut self, old: &H, new: OpenElement<H>) {
        if let Some(i) = self.position(old) {
            self.items[i] = new;
        }
    }

    pub(crate) fn insert_after(&mut self, reference: &H, new: OpenElement<H>) {
        match self.position(reference) {
            Some(i) => self.items.insert(i + 1, new),
            None => self.items.push(new),
        }
    }

    pub(crate) fn remove(&mut self, handle: &H) -> Option<OpenElement<H>> {
        let i = self.position(handle)?;
        Some(self.items.remove(i))
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> OpenElement<H> {
        self.items.remove(index)
    }

    /// Pop until an element matching `pred` has been popped, and return that element.
    fn pop_until(&mut self, pred: impl Fn(&OpenElement<H>) -> bool) -> Option<OpenElement<H>> {
        while let Some(element) = self.items.pop() {
            if pred(&element) {
                return Some(element);
            }
        }
        None
    }

    /// Pop until the current node matches `pred`, leaving it on the stack.
    fn pop_while_not(&mut self, pred: impl Fn(&OpenElement<H>) -> bool) {
        while let Some(element) = self.items.last() {
            if pred(element) {
                break;
            }
            self.items.pop();
        }
    }

    pub(crate) fn pop_until_tag_name_popped(&mut self, name: &str) -> Option<OpenElement<H>> {
        self.pop_until(|x| x.is_html(name))
    }

    pub(crate) fn pop_until_element_popped(&mut self, handle: &H) -> Option<OpenElement<H>> {
        self.pop_until(|x| x.handle == *handle)
    }

    pub(crate) fn pop_until_numbered_header_popped(&mut self) -> Option<OpenElement<H>> {
        self.pop_until(|x| numbered_header(x.expanded()))
    }

    pub(crate) fn pop_until_table_cell_popped(&mut self) -> Option<OpenElement<H>> {
        self.pop_until(|x| table_cell(x.expanded()))
    }

    pub(crate) fn pop_all_up_to_html_element(&mut self) {
        self.items.truncate(1);
    }

    pub(crate) fn clear_back_to_table_context(&mut self) {
        self.pop_while_not(|x| {
            x.ns == Namespace::Html && matches!(&*x.name, "table" | "template" | "html")
        });
    }

    pub(crate) fn clear_back_to_table_body_context(&mut self) {
        self.pop_while_not(|x| {
            x.ns == Namespace::Html
                && matches!(&*x.name, "tbody" | "tfoot" | "thead" | "template" | "html")
        });
    }

    pub(crate) fn clear_back_to_table_row_context(&mut self) {
        self.pop_while_not(|x| {
            x.ns == Namespace::Html && matches!(&*x.name, "tr" | "template" | "html")
        });
    }

    /// Walk from the current node downwards: `true` if `target` matches before an element of
    /// `scope` does.
    pub(crate) fn has_in_scope_with(
        &self,
        scope: impl Fn(ExpandedName<'_>) -> bool,
        target: impl Fn(&OpenElement<H>) -> bool,
    ) -> bool {
        for element in self.items.iter().rev() {
            if target(element) {
                return true;
            }
            if scope(element.expanded()) {
                return false;
            }
        }
        false
    }

    pub(crate) fn has_in_scope(&self, name: &str) -> bool {
        self.has_in_scope_with(default_scope, |x| x.is_html(name))
    }

    pub(crate) fn has_element_in_scope(&self, handle: &H) -> bool {
        self.has_in_scope_with(default_scope, |x| x.handle == *handle)
    }

    pub(crate) fn has_numbered_header_in_scope(&self) -> bool {
        self.has_in_scope_with(default_scope, |x| numbered_header(x.expanded()))
    }

    pub(crate) fn has_in_list_item_scope(&self, name: &str) -> bool {
        self.has_in_scope_with(list_item_scope, |x| x.is_html(name))
    }

    pub(crate) fn has_in_button_scope(&self, name: &str) -> bool {
        self.has_in_scope_with(button_scope, |x| x.is_html(name))
    }

    pub(crate) fn has_in_table_scope(&self, name: &str) -> bool {
        self.has_in_scope_with(table_scope, |x| x.is_html(name))
    }

    pub(crate) fn has_in_select_scope(&self, name: &str) -> bool {
        self.has_in_scope_with(select_scope, |x| x.is_html(name))
    }

    pub(crate) fn has_table_body_context_in_table_scope(&self) -> bool {
        self.has_in_scope_with(table_scope, |x| table_body_context(x.expanded()))
    }

    pub(crate) fn has_table_cell_in_table_scope(&self) -> bool {
        self.has_in_scope_with(table_scope, |x| table_cell(x.expanded()))
    }

    /// Pop elements with optional end tags, except for an HTML element called `except`.
    pub(crate) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(current) = self.items.last() {
            if !implied_end_tag(current.expanded()) || except.map_or(false, |x| current.is_html(x))
            {
                break;
            }
            self.items.pop();
        }
    }

    pub(crate) fn generate_implied_end_tags_thoroughly(&mut self) {
        while let Some(current) = self.items.last() {
            if !implied_end_tag_thorough(current.expanded()) {
                break;
            }
            self.items.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(handle: usize, name: &str, ns: Namespace) -> OpenElement<usize> {
        OpenElement {
            handle,
            name: name.to_owned(),
            ns,
            html_integration_point: false,
        }
    }

    fn stack(names: &[&str]) -> OpenElementStack<usize> {
        let mut stack = OpenElementStack::default();
        for (i, name) in names.iter().enumerate() {
            stack.push(element(i, name, Namespace::Html));
        }
        stack
    }

    fn names(stack: &OpenElementStack<usize>) -> Vec<&str> {
        stack.iter().map(|x| x.name.as_str()).collect()
    }

    #[test]
    fn scope_stops_at_boundaries() {
        let s = stack(&["html", "body", "p", "table", "tr", "td", "span"]);
        assert!(s.has_in_scope("td"));
        assert!(!s.has_in_scope("p"));
        assert!(s.has_in_table_scope("tr"));
        assert!(!s.has_in_table_scope("body"));
        assert!(s.has_table_cell_in_table_scope());

        let s = stack(&["html", "body", "p", "button", "span"]);
        assert!(s.has_in_scope("p"));
        assert!(!s.has_in_button_scope("p"));

        let s = stack(&["html", "body", "ul", "li", "ol"]);
        assert!(!s.has_in_list_item_scope("li"));
    }

    #[test]
    fn foreign_elements_bound_scope() {
        let mut s = stack(&["html", "body", "p"]);
        s.push(element(10, "svg", Namespace::Svg));
        s.push(element(11, "foreignObject", Namespace::Svg));
        s.push(element(12, "span", Namespace::Html));
        assert!(!s.has_in_scope("p"));
        assert!(s.has_element_in_scope(&12));
        assert!(!s.has_element_in_scope(&10));
    }

    #[test]
    fn implied_end_tags() {
        let mut s = stack(&["html", "body", "ul", "li", "p"]);
        s.generate_implied_end_tags(Some("li"));
        assert_eq!(names(&s), vec!["html", "body", "ul", "li"]);
        s.generate_implied_end_tags(None);
        assert_eq!(names(&s), vec!["html", "body", "ul"]);

        let mut s = stack(&["html", "body", "table", "tbody", "tr", "td", "p"]);
        s.generate_implied_end_tags_thoroughly();
        assert_eq!(names(&s), vec!["html", "body", "table"]);
    }

    #[test]
    fn popping_and_clearing() {
        let mut s = stack(&["html", "body", "table", "tbody", "tr", "td", "b"]);
        s.clear_back_to_table_row_context();
        assert_eq!(names(&s), vec!["html", "body", "table", "tbody", "tr"]);
        s.clear_back_to_table_context();
        assert_eq!(names(&s), vec!["html", "body", "table"]);
        assert_eq!(
            s.pop_until_tag_name_popped("body").map(|x| x.handle),
            Some(1)
        );
        assert_eq!(names(&s), vec!["html"]);
    }

    #[test]
    fn replace_and_insert_after() {
        let mut s = stack(&["html", "body", "b", "p"]);
        s.replace(&2, element(20, "i", Namespace::Html));
        s.insert_after(&20, element(21, "u", Namespace::Html));
        assert_eq!(names(&s), vec!["html", "body", "i", "u", "p"]);
        assert!(s.remove(&21).is_some());
        assert!(s.current_is_html("p"));
        assert_eq!(s.position(&20), Some(2));
    }
}
