//! The [in body](https://html.spec.whatwg.org/#parsing-main-inbody) insertion mode and the
//! adoption agency algorithm.
use crate::error::Error;
use crate::token::{CharacterKind, EndTag, StartTag, Token};
use crate::trees::foreign::{adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes};
use crate::trees::formatting::FormattingEntry;
use crate::trees::scopes::special;
use crate::trees::{InsertionMode, TreeBuilder};
use crate::utils::trace_log;
use crate::{Attribute, Namespace, QuirksMode, State, TreeAdapter};

const ISINDEX_PROMPT: &str = "This is a searchable index. Enter search keywords: ";

/// Where the adoption agency algorithm puts the new formatting element in the list of active
/// formatting elements.
enum Bookmark<H> {
    Replace(H),
    InsertAfter(H),
}

impl<A: TreeAdapter> TreeBuilder<A> {
    pub(crate) fn in_body(&mut self, token: Token) {
        match token {
            Token::Characters(chars) => match chars.kind {
                CharacterKind::Null => self.error(Error::UnexpectedNullCharacter),
                CharacterKind::Whitespace => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_characters(&chars.text);
                }
                CharacterKind::Regular => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_characters(&chars.text);
                    self.frameset_ok = false;
                }
            },
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(tag) => self.start_tag_in_body(tag),
            Token::EndTag(tag) => self.end_tag_in_body(tag),
            Token::Eof => {
                if !self.template_modes.is_empty() {
                    self.in_template(Token::Eof);
                    return;
                }
                if self.has_unclosed_elements() {
                    self.error(Error::OpenElementsLeftAfterEof);
                }
                self.stop_parsing();
            }
        }
    }

    fn start_tag_in_body(&mut self, mut tag: StartTag) {
        match &*tag.name {
            "html" => {
                self.error(Error::UnexpectedStartTag);
                if self.open_elements.contains_html("template") {
                    return;
                }
                if let Some(html) = self.open_elements.get(0).map(|x| x.handle.clone()) {
                    self.adapter.adopt_attributes(&html, tag.attributes);
                }
            }
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => self.in_head(Token::StartTag(tag)),
            "body" => {
                self.error(Error::UnexpectedStartTag);
                let body = match self.open_elements.get(1) {
                    Some(body) if body.is_html("body") => body.handle.clone(),
                    _ => return,
                };
                if self.open_elements.contains_html("template") {
                    return;
                }
                self.frameset_ok = false;
                self.adapter.adopt_attributes(&body, tag.attributes);
            }
            "frameset" => {
                self.error(Error::UnexpectedStartTag);
                let body = match self.open_elements.get(1) {
                    Some(body) if body.is_html("body") => body.handle.clone(),
                    _ => return,
                };
                if !self.frameset_ok {
                    return;
                }
                self.adapter.detach_node(&body);
                self.open_elements.pop_all_up_to_html_element();
                self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InFrameset);
            }
            "address" | "article" | "aside" | "blockquote" | "center" | "details" | "dialog"
            | "dir" | "div" | "dl" | "fieldset" | "figcaption" | "figure" | "footer"
            | "header" | "hgroup" | "main" | "menu" | "nav" | "ol" | "p" | "search"
            | "section" | "summary" | "ul" => {
                self.close_p_element_in_button_scope();
                self.insert_html_element(&tag);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.close_p_element_in_button_scope();
                let current_is_header = self.open_elements.current().map_or(false, |x| {
                    x.ns == Namespace::Html
                        && matches!(&*x.name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
                });
                if current_is_header {
                    self.error(Error::UnexpectedStartTag);
                    self.open_elements.pop();
                }
                self.insert_html_element(&tag);
            }
            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                self.insert_html_element(&tag);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }
            "form" => {
                let has_template = self.open_elements.contains_html("template");
                if self.form_element.is_some() && !has_template {
                    self.error(Error::UnexpectedStartTag);
                    return;
                }
                self.close_p_element_in_button_scope();
                let form = self.insert_html_element(&tag);
                if !has_template {
                    self.form_element = Some(form);
                }
            }
            "li" | "dd" | "dt" => {
                self.frameset_ok = false;
                let closes: &[&str] = if tag.name == "li" { &["li"] } else { &["dd", "dt"] };
                let mut to_close = None;
                for element in self.open_elements.iter().rev() {
                    if let Some(name) = closes.iter().find(|name| element.is_html(name)) {
                        to_close = Some(*name);
                        break;
                    }
                    if special(element.expanded())
                        && !(element.ns == Namespace::Html
                            && matches!(&*element.name, "address" | "div" | "p"))
                    {
                        break;
                    }
                }
                if let Some(name) = to_close {
                    self.open_elements.generate_implied_end_tags(Some(name));
                    if !self.open_elements.current_is_html(name) {
                        self.error(Error::UnexpectedStartTag);
                    }
                    self.open_elements.pop_until_tag_name_popped(name);
                }
                self.close_p_element_in_button_scope();
                self.insert_html_element(&tag);
            }
            "plaintext" => {
                self.close_p_element_in_button_scope();
                self.insert_html_element(&tag);
                self.set_tokenizer_state(State::PlainText);
            }
            "button" => {
                if self.open_elements.has_in_scope("button") {
                    self.error(Error::UnexpectedStartTag);
                    self.open_elements.generate_implied_end_tags(None);
                    self.open_elements.pop_until_tag_name_popped("button");
                }
                self.reconstruct_active_formatting_elements();
                self.insert_html_element(&tag);
                self.frameset_ok = false;
            }
            "a" => {
                let existing = self
                    .active_formatting
                    .get_element_entry_in_scope_with_tag_name("a")
                    .map(|(_, handle, _)| handle.clone());
                if let Some(existing) = existing {
                    self.error(Error::UnexpectedStartTag);
                    self.adoption_agency("a");
                    self.active_formatting.remove_entry(&existing);
                    self.open_elements.remove(&existing);
                }
                self.reconstruct_active_formatting_elements();
                let handle = self.insert_html_element(&tag);
                self.active_formatting.push_element(handle, tag);
            }
            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike" | "strong"
            | "tt" | "u" => {
                self.reconstruct_active_formatting_elements();
                let handle = self.insert_html_element(&tag);
                self.active_formatting.push_element(handle, tag);
            }
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.open_elements.has_in_scope("nobr") {
                    self.error(Error::UnexpectedStartTag);
                    self.adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                let handle = self.insert_html_element(&tag);
                self.active_formatting.push_element(handle, tag);
            }
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                self.insert_html_element(&tag);
                self.active_formatting.insert_marker();
                self.frameset_ok = false;
            }
            "table" => {
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                self.insert_html_element(&tag);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
            }
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                self.insert_and_pop(&tag);
                self.frameset_ok = false;
            }
            "input" => {
                self.reconstruct_active_formatting_elements();
                self.insert_and_pop(&tag);
                let hidden = tag
                    .attribute("type")
                    .map_or(false, |x| x.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.frameset_ok = false;
                }
            }
            "param" | "source" | "track" => self.insert_and_pop(&tag),
            "hr" => {
                self.close_p_element_in_button_scope();
                self.insert_and_pop(&tag);
                self.frameset_ok = false;
            }
            "image" => {
                self.error(Error::UnexpectedStartTag);
                tag.name = "img".to_owned();
                self.process_token(Token::StartTag(tag));
            }
            "isindex" => self.isindex(tag),
            "textarea" => {
                self.insert_html_element(&tag);
                self.skip_next_newline = true;
                self.set_tokenizer_state(State::RcData);
                self.original_mode = self.mode;
                self.frameset_ok = false;
                self.switch_to(InsertionMode::Text);
            }
            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_element(&tag, State::RawText);
            }
            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(&tag, State::RawText);
            }
            "noembed" => self.parse_text_element(&tag, State::RawText),
            "noscript" if self.scripting_enabled => {
                self.parse_text_element(&tag, State::RawText);
            }
            "select" => {
                self.reconstruct_active_formatting_elements();
                self.insert_html_element(&tag);
                self.frameset_ok = false;
                let mode = match self.mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                self.switch_to(mode);
            }
            "optgroup" | "option" => {
                if self.open_elements.current_is_html("option") {
                    self.open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                self.insert_html_element(&tag);
            }
            "rb" | "rtc" => {
                if self.open_elements.has_in_scope("ruby") {
                    self.open_elements.generate_implied_end_tags(None);
                    if !self.open_elements.current_is_html("ruby") {
                        self.error(Error::UnexpectedStartTag);
                    }
                }
                self.insert_html_element(&tag);
            }
            "rp" | "rt" => {
                if self.open_elements.has_in_scope("ruby") {
                    self.open_elements.generate_implied_end_tags(Some("rtc"));
                    if !self.open_elements.current_is_html("ruby")
                        && !self.open_elements.current_is_html("rtc")
                    {
                        self.error(Error::UnexpectedStartTag);
                    }
                }
                self.insert_html_element(&tag);
            }
            "math" => {
                self.reconstruct_active_formatting_elements();
                adjust_mathml_attributes(&mut tag);
                adjust_foreign_attributes(&mut tag);
                self.insert_foreign_root(&tag, Namespace::MathMl);
            }
            "svg" => {
                self.reconstruct_active_formatting_elements();
                adjust_svg_attributes(&mut tag);
                adjust_foreign_attributes(&mut tag);
                self.insert_foreign_root(&tag, Namespace::Svg);
            }
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.error(Error::UnexpectedStartTag),
            _ => {
                self.reconstruct_active_formatting_elements();
                self.insert_html_element(&tag);
            }
        }
    }

    fn insert_foreign_root(&mut self, tag: &StartTag, ns: Namespace) {
        self.insert_element(tag, ns);
        if tag.self_closing {
            self.open_elements.pop();
            self.acknowledge_self_closing();
        }
    }

    /// `<isindex>` expands into a small search form.
    fn isindex(&mut self, tag: StartTag) {
        self.error(Error::IsindexStartTag);
        let has_template = self.open_elements.contains_html("template");
        if self.form_element.is_some() && !has_template {
            return;
        }
        self.acknowledge_self_closing();
        self.frameset_ok = false;
        self.close_p_element_in_button_scope();

        let form = StartTag {
            name: "form".to_owned(),
            attributes: tag
                .attributes
                .iter()
                .filter(|attr| attr.name == "action")
                .cloned()
                .collect(),
            span: tag.span,
            ..StartTag::default()
        };
        let form = self.insert_html_element(&form);
        if !has_template {
            self.form_element = Some(form.clone());
        }

        self.insert_phantom("hr");
        self.open_elements.pop();
        self.reconstruct_active_formatting_elements();
        self.insert_phantom("label");

        let prompt = tag.attribute("prompt").unwrap_or(ISINDEX_PROMPT).to_owned();
        self.insert_characters(&prompt);

        let mut attributes: Vec<Attribute> = tag
            .attributes
            .into_iter()
            .filter(|attr| !matches!(&*attr.name, "name" | "action" | "prompt"))
            .collect();
        attributes.push(Attribute::new("name", "isindex"));
        let input = StartTag {
            name: "input".to_owned(),
            attributes,
            span: tag.span,
            ..StartTag::default()
        };
        self.insert_html_element(&input);
        self.open_elements.pop();

        self.open_elements.pop();
        self.insert_phantom("hr");
        self.open_elements.pop();
        self.open_elements.pop_until_element_popped(&form);
        if !has_template {
            self.form_element = None;
        }
    }

    fn end_tag_in_body(&mut self, tag: EndTag) {
        match &*tag.name {
            "template" => self.in_head(Token::EndTag(tag)),
            "body" | "html" => {
                if !self.open_elements.has_in_scope("body") {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                if self.has_unclosed_elements() {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                let body = self.open_elements.get(1).cloned();
                self.close_element(body);
                self.switch_to(InsertionMode::AfterBody);
                if tag.name == "html" {
                    self.process_token(Token::EndTag(tag));
                }
            }
            "address" | "article" | "aside" | "blockquote" | "button" | "center" | "details"
            | "dialog" | "dir" | "div" | "dl" | "fieldset" | "figcaption" | "figure"
            | "footer" | "header" | "hgroup" | "listing" | "main" | "menu" | "nav" | "ol"
            | "pre" | "search" | "section" | "summary" | "ul" => {
                if !self.open_elements.has_in_scope(&tag.name) {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.open_elements.generate_implied_end_tags(None);
                if !self.open_elements.current_is_html(&tag.name) {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                self.pop_until_closed(&tag.name);
            }
            "form" => {
                if self.open_elements.contains_html("template") {
                    if !self.open_elements.has_in_scope("form") {
                        self.error(Error::EndTagWithoutMatchingOpenElement);
                        return;
                    }
                    self.open_elements.generate_implied_end_tags(None);
                    if !self.open_elements.current_is_html("form") {
                        self.error(Error::ClosingOfElementWithOpenChildElements);
                    }
                    self.pop_until_closed("form");
                    return;
                }

                let form = match self.form_element.take() {
                    Some(form) if self.open_elements.has_element_in_scope(&form) => form,
                    _ => {
                        self.error(Error::EndTagWithoutMatchingOpenElement);
                        return;
                    }
                };
                self.open_elements.generate_implied_end_tags(None);
                if self.current_handle().as_ref() != Some(&form) {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                let element = self.open_elements.remove(&form);
                self.close_element(element);
            }
            "p" => {
                if !self.open_elements.has_in_button_scope("p") {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    self.insert_phantom("p");
                }
                self.close_p_element();
            }
            "li" => {
                if !self.open_elements.has_in_list_item_scope("li") {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.open_elements.generate_implied_end_tags(Some("li"));
                if !self.open_elements.current_is_html("li") {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                self.pop_until_closed("li");
            }
            "dd" | "dt" => {
                if !self.open_elements.has_in_scope(&tag.name) {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.open_elements.generate_implied_end_tags(Some(tag.name.as_str()));
                if !self.open_elements.current_is_html(&tag.name) {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                self.pop_until_closed(&tag.name);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if !self.open_elements.has_numbered_header_in_scope() {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.open_elements.generate_implied_end_tags(None);
                if !self.open_elements.current_is_html(&tag.name) {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                let element = self.open_elements.pop_until_numbered_header_popped();
                self.close_element(element);
            }
            "a" | "b" | "big" | "code" | "em" | "font" | "i" | "nobr" | "s" | "small"
            | "strike" | "strong" | "tt" | "u" => self.adoption_agency(&tag.name),
            "applet" | "marquee" | "object" => {
                if !self.open_elements.has_in_scope(&tag.name) {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.open_elements.generate_implied_end_tags(None);
                if !self.open_elements.current_is_html(&tag.name) {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                self.pop_until_closed(&tag.name);
                self.active_formatting.clear_to_last_marker();
            }
            "br" => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
                let br = StartTag {
                    name: "br".to_owned(),
                    span: tag.span,
                    ..StartTag::default()
                };
                self.start_tag_in_body(br);
            }
            _ => self.any_other_end_tag_in_body(&tag.name),
        }
    }

    /// The "any other end tag" steps: close the nearest open element called `name`, unless a
    /// special element comes first.
    fn any_other_end_tag_in_body(&mut self, name: &str) {
        let mut found = None;
        for (i, element) in self.open_elements.iter().enumerate().rev() {
            if element.is_html(name) {
                found = Some(i);
                break;
            }
            if special(element.expanded()) {
                break;
            }
        }

        let index = match found {
            Some(index) => index,
            None => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
                return;
            }
        };

        self.open_elements.generate_implied_end_tags(Some(name));
        if index + 1 != self.open_elements.len() {
            self.error(Error::ClosingOfElementWithOpenChildElements);
        }
        if let Some(handle) = self.open_elements.get(index).map(|x| x.handle.clone()) {
            let element = self.open_elements.pop_until_element_popped(&handle);
            self.close_element(element);
        }
    }

    /// The [adoption agency algorithm](https://html.spec.whatwg.org/#adoption-agency-algorithm).
    pub(crate) fn adoption_agency(&mut self, subject: &str) {
        trace_log!("adoption agency: {}", subject);

        if let Some(current) = self.open_elements.current() {
            if current.is_html(subject) && !self.active_formatting.contains(&current.handle) {
                let element = self.open_elements.pop();
                self.close_element(element);
                return;
            }
        }

        for _ in 0..8 {
            let (formatting_index, formatting, formatting_token) = match self
                .active_formatting
                .get_element_entry_in_scope_with_tag_name(subject)
            {
                Some((i, handle, token)) => (i, handle.clone(), token.clone()),
                None => return self.any_other_end_tag_in_body(subject),
            };

            let formatting_stack_index = match self.open_elements.position(&formatting) {
                Some(i) => i,
                None => {
                    self.error(Error::FormattingElementNotInScope);
                    self.active_formatting.remove_at(formatting_index);
                    return;
                }
            };

            if !self.open_elements.has_element_in_scope(&formatting) {
                self.error(Error::FormattingElementNotInScope);
                return;
            }

            if self.current_handle().as_ref() != Some(&formatting) {
                self.error(Error::MisnestedFormattingElement);
            }

            let furthest_block = self
                .open_elements
                .iter()
                .enumerate()
                .skip(formatting_stack_index + 1)
                .find(|(_, x)| special(x.expanded()))
                .map(|(i, x)| (i, x.handle.clone()));

            let (furthest_block_index, furthest_block) = match furthest_block {
                Some(found) => found,
                None => {
                    let element = self.open_elements.pop_until_element_popped(&formatting);
                    self.close_element(element);
                    self.active_formatting.remove_entry(&formatting);
                    return;
                }
            };

            let common_ancestor_index = formatting_stack_index.saturating_sub(1);
            let mut bookmark = Bookmark::Replace(formatting.clone());
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block.clone();

            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;
                node_index -= 1;
                let node = match self.open_elements.get(node_index) {
                    Some(node) => node.handle.clone(),
                    None => break,
                };
                if node == formatting {
                    break;
                }

                let node_formatting_index = self.active_formatting.position(&node);
                if inner_loop_counter > 3 {
                    if let Some(i) = node_formatting_index {
                        self.active_formatting.remove_at(i);
                    }
                    self.open_elements.remove_at(node_index);
                    continue;
                }

                let node_formatting_index = match node_formatting_index {
                    Some(i) => i,
                    None => {
                        self.open_elements.remove_at(node_index);
                        continue;
                    }
                };

                let token = match self.active_formatting.get(node_formatting_index) {
                    Some(FormattingEntry::Element { token, .. }) => token.clone(),
                    _ => break,
                };
                let element = self.create_element_for_token(&token, Namespace::Html);
                let new_node = element.handle.clone();
                self.open_elements.replace(&node, element);
                self.active_formatting
                    .replace_at(node_formatting_index, new_node.clone(), token);

                if last_node == furthest_block {
                    bookmark = Bookmark::InsertAfter(new_node.clone());
                }
                self.adapter.detach_node(&last_node);
                self.adapter.append_child(&new_node, &last_node);
                last_node = new_node;
            }

            self.adapter.detach_node(&last_node);
            let place = self.appropriate_place(Some(common_ancestor_index));
            self.insert_node(place, &last_node);

            let element = self.create_element_for_token(&formatting_token, Namespace::Html);
            let new_element = element.handle.clone();
            for child in self.adapter.get_child_nodes(&furthest_block) {
                self.adapter.append_child(&new_element, &child);
            }
            self.adapter.append_child(&furthest_block, &new_element);

            match bookmark {
                Bookmark::Replace(old) => {
                    if let Some(i) = self.active_formatting.position(&old) {
                        self.active_formatting
                            .replace_at(i, new_element.clone(), formatting_token);
                    }
                }
                Bookmark::InsertAfter(previous) => {
                    if let Some(i) = self.active_formatting.position(&previous) {
                        self.active_formatting
                            .insert_at(i + 1, new_element.clone(), formatting_token);
                    }
                    self.active_formatting.remove_entry(&formatting);
                }
            }

            self.open_elements.remove(&formatting);
            self.open_elements.insert_after(&furthest_block, element);
        }
    }
}
