use crate::token::StartTag;
use crate::Attribute;

/// An entry of the list of active formatting elements.
#[derive(Debug, Clone)]
pub(crate) enum FormattingEntry<H> {
    Marker,
    Element {
        handle: H,
        /// The token the element was created for, used to recreate it.
        token: StartTag,
    },
}

/// The [list of active formatting elements](https://html.spec.whatwg.org/#list-of-active-formatting-elements).
///
/// Every element in here is an HTML element, so comparing tag names and attributes is enough for
/// the "Noah's Ark" clause.
#[derive(Debug)]
pub(crate) struct FormattingElementList<H> {
    entries: Vec<FormattingEntry<H>>,
}

impl<H> Default for FormattingElementList<H> {
    fn default() -> Self {
        FormattingElementList {
            entries: Vec::new(),
        }
    }
}

fn same_attributes(a: &[Attribute], b: &[Attribute]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

impl<H: Clone + PartialEq> FormattingElementList<H> {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&FormattingEntry<H>> {
        self.entries.get(index)
    }

    /// Append an element. If there are already three entries with the same tag name and
    /// attributes after the last marker, the earliest of them is removed first.
    pub(crate) fn push_element(&mut self, handle: H, token: StartTag) {
        let mut count = 0;
        let mut earliest = None;
        for (i, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Element { token: other, .. } => {
                    if other.name == token.name
                        && same_attributes(&other.attributes, &token.attributes)
                    {
                        count += 1;
                        earliest = Some(i);
                    }
                }
            }
        }

        if count >= 3 {
            if let Some(i) = earliest {
                self.entries.remove(i);
            }
        }

        self.entries.push(FormattingEntry::Element { handle, token });
    }

    pub(crate) fn insert_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    pub(crate) fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if let FormattingEntry::Marker = entry {
                break;
            }
        }
    }

    /// The last element entry called `name` between the end of the list and the last marker.
    pub(crate) fn get_element_entry_in_scope_with_tag_name(
        &self,
        name: &str,
    ) -> Option<(usize, &H, &StartTag)> {
        for (i, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element { handle, token } if token.name == name => {
                    return Some((i, handle, token))
                }
                FormattingEntry::Element { .. } => (),
            }
        }
        None
    }

    pub(crate) fn position(&self, handle: &H) -> Option<usize> {
        self.entries.iter().rposition(|entry| {
            matches!(entry, FormattingEntry::Element { handle: h, .. } if h == handle)
        })
    }

    pub(crate) fn contains(&self, handle: &H) -> bool {
        self.position(handle).is_some()
    }

    pub(crate) fn remove_entry(&mut self, handle: &H) {
        if let Some(i) = self.position(handle) {
            self.entries.remove(i);
        }
    }

    pub(crate) fn remove_at(&mut self, index: usize) {
        self.entries.remove(index);
    }

    pub(crate) fn insert_at(&mut self, index: usize, handle: H, token: StartTag) {
        self.entries
            .insert(index, FormattingEntry::Element { handle, token });
    }

    pub(crate) fn replace_at(&mut self, index: usize, handle: H, token: StartTag) {
        self.entries[index] = FormattingEntry::Element { handle, token };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, attributes: &[(&str, &str)]) -> StartTag {
        StartTag {
            name: name.to_owned(),
            attributes: attributes
                .iter()
                .map(|(k, v)| Attribute::new(*k, *v))
                .collect(),
            ..StartTag::default()
        }
    }

    fn handles(list: &FormattingElementList<usize>) -> Vec<Option<usize>> {
        (0..list.len())
            .map(|i| match list.get(i) {
                Some(FormattingEntry::Element { handle, .. }) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn noahs_ark_keeps_three() {
        let mut list = FormattingElementList::default();
        for i in 0..4 {
            list.push_element(i, tag("b", &[]));
        }
        assert_eq!(handles(&list), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn noahs_ark_compares_attribute_sets() {
        let mut list = FormattingElementList::default();
        list.push_element(0, tag("b", &[("x", "1"), ("y", "2")]));
        list.push_element(1, tag("b", &[("y", "2"), ("x", "1")]));
        list.push_element(2, tag("b", &[("x", "1")]));
        list.push_element(3, tag("b", &[("x", "1"), ("y", "2")]));
        assert_eq!(handles(&list), vec![Some(0), Some(1), Some(2), Some(3)]);
        list.push_element(4, tag("b", &[("x", "1"), ("y", "2")]));
        assert_eq!(handles(&list), vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn markers_bound_the_search() {
        let mut list = FormattingElementList::default();
        list.push_element(0, tag("b", &[]));
        list.push_element(1, tag("b", &[]));
        list.push_element(2, tag("b", &[]));
        list.insert_marker();
        list.push_element(3, tag("b", &[]));
        assert_eq!(list.len(), 5);
        assert!(list.get_element_entry_in_scope_with_tag_name("i").is_none());
        assert_eq!(
            list.get_element_entry_in_scope_with_tag_name("b")
                .map(|(i, h, _)| (i, *h)),
            Some((4, 3))
        );

        list.clear_to_last_marker();
        assert_eq!(handles(&list), vec![Some(0), Some(1), Some(2)]);
        assert!(list.get_element_entry_in_scope_with_tag_name("b").is_some());
        list.remove_entry(&1);
        assert_eq!(handles(&list), vec![Some(0), Some(2)]);
    }
}
