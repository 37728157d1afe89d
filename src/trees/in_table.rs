//! Table, select and template insertion modes.
use crate::error::Error;
use crate::token::{CharacterKind, Token};
use crate::trees::{InsertionMode, TreeBuilder};
use crate::TreeAdapter;

fn is_table_section(name: &str) -> bool {
    matches!(name, "tbody" | "tfoot" | "thead")
}

impl<A: TreeAdapter> TreeBuilder<A> {
    /// <https://html.spec.whatwg.org/#parsing-main-intable>
    pub(crate) fn in_table(&mut self, token: Token) {
        match token {
            Token::Characters(_)
                if self.open_elements.current().map_or(false, |x| {
                    x.ns == crate::Namespace::Html
                        && matches!(
                            &*x.name,
                            "table" | "tbody" | "template" | "tfoot" | "thead" | "tr"
                        )
                }) =>
            {
                self.pending_table_text.clear();
                self.original_mode = self.mode;
                self.switch_to(InsertionMode::InTableText);
                self.process_token(token);
            }
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(tag) if tag.name == "caption" => {
                self.open_elements.clear_back_to_table_context();
                self.active_formatting.insert_marker();
                self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InCaption);
            }
            Token::StartTag(tag) if tag.name == "colgroup" => {
                self.open_elements.clear_back_to_table_context();
                self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InColumnGroup);
            }
            Token::StartTag(ref tag) if tag.name == "col" => {
                self.open_elements.clear_back_to_table_context();
                self.insert_phantom("colgroup");
                self.switch_to(InsertionMode::InColumnGroup);
                self.process_token(token);
            }
            Token::StartTag(tag) if is_table_section(&tag.name) => {
                self.open_elements.clear_back_to_table_context();
                self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InTableBody);
            }
            Token::StartTag(ref tag) if matches!(&*tag.name, "td" | "th" | "tr") => {
                self.open_elements.clear_back_to_table_context();
                self.insert_phantom("tbody");
                self.switch_to(InsertionMode::InTableBody);
                self.process_token(token);
            }
            Token::StartTag(ref tag) if tag.name == "table" => {
                self.error(Error::UnexpectedStartTag);
                if !self.open_elements.has_in_table_scope("table") {
                    return;
                }
                self.open_elements.pop_until_tag_name_popped("table");
                self.reset_insertion_mode();
                self.process_token(token);
            }
            Token::EndTag(tag) if tag.name == "table" => {
                if !self.open_elements.has_in_table_scope("table") {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.pop_until_closed("table");
                self.reset_insertion_mode();
            }
            Token::EndTag(ref tag)
                if matches!(
                    &*tag.name,
                    "body"
                        | "caption"
                        | "col"
                        | "colgroup"
                        | "html"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            Token::StartTag(ref tag) if matches!(&*tag.name, "style" | "script" | "template") => {
                self.in_head(token);
            }
            Token::EndTag(ref tag) if tag.name == "template" => self.in_head(token),
            Token::StartTag(tag)
                if tag.name == "input"
                    && tag
                        .attribute("type")
                        .map_or(false, |x| x.eq_ignore_ascii_case("hidden")) =>
            {
                self.error(Error::UnexpectedTokenInTable);
                self.insert_and_pop(&tag);
            }
            Token::StartTag(tag) if tag.name == "form" => {
                self.error(Error::UnexpectedTokenInTable);
                if self.open_elements.contains_html("template") || self.form_element.is_some() {
                    return;
                }
                let form = self.insert_html_element(&tag);
                self.form_element = Some(form);
                self.open_elements.pop();
            }
            Token::Eof => self.in_body(token),
            token => {
                self.error(Error::UnexpectedTokenInTable);
                self.in_body_with_foster_parenting(token);
            }
        }
    }

    fn in_body_with_foster_parenting(&mut self, token: Token) {
        self.foster_parenting = true;
        self.in_body(token);
        self.foster_parenting = false;
    }

    /// <https://html.spec.whatwg.org/#parsing-main-intabletext>
    pub(crate) fn in_table_text(&mut self, token: Token) {
        match token {
            Token::Characters(chars) if chars.kind == CharacterKind::Null => {
                self.error(Error::UnexpectedNullCharacter);
            }
            Token::Characters(chars) => self.pending_table_text.push(chars),
            token => {
                let pending = std::mem::take(&mut self.pending_table_text);
                if pending.iter().any(|x| x.kind == CharacterKind::Regular) {
                    self.error(Error::UnexpectedTokenInTable);
                    for chars in pending {
                        self.in_body_with_foster_parenting(Token::Characters(chars));
                    }
                } else {
                    for chars in pending {
                        self.insert_characters(&chars.text);
                    }
                }
                self.switch_to(self.original_mode);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-incaption>
    pub(crate) fn in_caption(&mut self, token: Token) {
        match token {
            Token::EndTag(ref tag) if tag.name == "caption" => {
                self.close_caption();
            }
            Token::StartTag(ref tag)
                if matches!(
                    &*tag.name,
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                if self.close_caption() {
                    self.process_token(token);
                }
            }
            Token::EndTag(ref tag) if tag.name == "table" => {
                if self.close_caption() {
                    self.process_token(token);
                }
            }
            Token::EndTag(ref tag)
                if matches!(
                    &*tag.name,
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            token => self.in_body(token),
        }
    }

    /// Close the open caption and go back to the table. Returns `false` if there was none.
    fn close_caption(&mut self) -> bool {
        if !self.open_elements.has_in_table_scope("caption") {
            self.error(Error::EndTagWithoutMatchingOpenElement);
            return false;
        }
        self.open_elements.generate_implied_end_tags(None);
        if !self.open_elements.current_is_html("caption") {
            self.error(Error::ClosingOfElementWithOpenChildElements);
        }
        self.pop_until_closed("caption");
        self.active_formatting.clear_to_last_marker();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// <https://html.spec.whatwg.org/#parsing-main-incolgroup>
    pub(crate) fn in_column_group(&mut self, token: Token) {
        match token {
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.insert_characters(&chars.text);
            }
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::StartTag(tag) if tag.name == "col" => self.insert_and_pop(&tag),
            Token::EndTag(tag) if tag.name == "colgroup" => {
                if !self.open_elements.current_is_html("colgroup") {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                let colgroup = self.open_elements.pop();
                self.close_element(colgroup);
                self.switch_to(InsertionMode::InTable);
            }
            Token::EndTag(ref tag) if tag.name == "col" => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            Token::StartTag(ref tag) if tag.name == "template" => self.in_head(token),
            Token::EndTag(ref tag) if tag.name == "template" => self.in_head(token),
            Token::Eof => self.in_body(token),
            token => {
                if !self.open_elements.current_is_html("colgroup") {
                    self.unexpected(&token);
                    return;
                }
                self.open_elements.pop();
                self.switch_to(InsertionMode::InTable);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-intbody>
    pub(crate) fn in_table_body(&mut self, token: Token) {
        match token {
            Token::StartTag(tag) if tag.name == "tr" => {
                self.open_elements.clear_back_to_table_body_context();
                self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InRow);
            }
            Token::StartTag(ref tag) if matches!(&*tag.name, "th" | "td") => {
                self.error(Error::UnexpectedStartTag);
                self.open_elements.clear_back_to_table_body_context();
                self.insert_phantom("tr");
                self.switch_to(InsertionMode::InRow);
                self.process_token(token);
            }
            Token::EndTag(tag) if is_table_section(&tag.name) => {
                if !self.open_elements.has_in_table_scope(&tag.name) {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.open_elements.clear_back_to_table_body_context();
                let section = self.open_elements.pop();
                self.close_element(section);
                self.switch_to(InsertionMode::InTable);
            }
            Token::StartTag(ref tag)
                if matches!(
                    &*tag.name,
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.leave_table_body(token);
            }
            Token::EndTag(ref tag) if tag.name == "table" => self.leave_table_body(token),
            Token::EndTag(ref tag)
                if matches!(
                    &*tag.name,
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            token => self.in_table(token),
        }
    }

    fn leave_table_body(&mut self, token: Token) {
        if !self.open_elements.has_table_body_context_in_table_scope() {
            self.unexpected(&token);
            return;
        }
        self.open_elements.clear_back_to_table_body_context();
        self.open_elements.pop();
        self.switch_to(InsertionMode::InTable);
        self.process_token(token);
    }

    /// <https://html.spec.whatwg.org/#parsing-main-intr>
    pub(crate) fn in_row(&mut self, token: Token) {
        match token {
            Token::StartTag(tag) if matches!(&*tag.name, "th" | "td") => {
                self.open_elements.clear_back_to_table_row_context();
                self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InCell);
                self.active_formatting.insert_marker();
            }
            Token::EndTag(ref tag) if tag.name == "tr" => {
                self.close_row();
            }
            Token::StartTag(ref tag)
                if matches!(
                    &*tag.name,
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if self.close_row() {
                    self.process_token(token);
                }
            }
            Token::EndTag(ref tag) if tag.name == "table" => {
                if self.close_row() {
                    self.process_token(token);
                }
            }
            Token::EndTag(ref tag) if is_table_section(&tag.name) => {
                if !self.open_elements.has_in_table_scope(&tag.name) {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                if self.close_row() {
                    self.process_token(token);
                }
            }
            Token::EndTag(ref tag)
                if matches!(
                    &*tag.name,
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            token => self.in_table(token),
        }
    }

    /// Pop the open row and go back to the table body. Returns `false` if there was none.
    fn close_row(&mut self) -> bool {
        if !self.open_elements.has_in_table_scope("tr") {
            self.error(Error::EndTagWithoutMatchingOpenElement);
            return false;
        }
        self.open_elements.clear_back_to_table_row_context();
        let row = self.open_elements.pop();
        self.close_element(row);
        self.switch_to(InsertionMode::InTableBody);
        true
    }

    /// <https://html.spec.whatwg.org/#parsing-main-intd>
    pub(crate) fn in_cell(&mut self, token: Token) {
        match token {
            Token::EndTag(tag) if matches!(&*tag.name, "td" | "th") => {
                if !self.open_elements.has_in_table_scope(&tag.name) {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.open_elements.generate_implied_end_tags(None);
                if !self.open_elements.current_is_html(&tag.name) {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                self.pop_until_closed(&tag.name);
                self.active_formatting.clear_to_last_marker();
                self.switch_to(InsertionMode::InRow);
            }
            Token::StartTag(ref tag)
                if matches!(
                    &*tag.name,
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                if !self.open_elements.has_table_cell_in_table_scope() {
                    self.error(Error::UnexpectedStartTag);
                    return;
                }
                self.close_cell();
                self.process_token(token);
            }
            Token::EndTag(ref tag)
                if matches!(&*tag.name, "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            Token::EndTag(ref tag)
                if matches!(&*tag.name, "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.open_elements.has_in_table_scope(&tag.name) {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.close_cell();
                self.process_token(token);
            }
            token => self.in_body(token),
        }
    }

    /// [Close the cell](https://html.spec.whatwg.org/#close-the-cell).
    fn close_cell(&mut self) {
        self.open_elements.generate_implied_end_tags(None);
        let current_is_cell = self.open_elements.current_is_html("td")
            || self.open_elements.current_is_html("th");
        if !current_is_cell {
            self.error(Error::ClosingOfElementWithOpenChildElements);
        }
        self.open_elements.pop_until_table_cell_popped();
        self.active_formatting.clear_to_last_marker();
        self.switch_to(InsertionMode::InRow);
    }

    /// <https://html.spec.whatwg.org/#parsing-main-inselect>
    pub(crate) fn in_select(&mut self, token: Token) {
        match token {
            Token::Characters(chars) => {
                if chars.kind == CharacterKind::Null {
                    self.error(Error::UnexpectedNullCharacter);
                } else {
                    self.insert_characters(&chars.text);
                }
            }
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::StartTag(tag) if tag.name == "option" => {
                if self.open_elements.current_is_html("option") {
                    self.open_elements.pop();
                }
                self.insert_html_element(&tag);
            }
            Token::StartTag(tag) if tag.name == "optgroup" => {
                if self.open_elements.current_is_html("option") {
                    self.open_elements.pop();
                }
                if self.open_elements.current_is_html("optgroup") {
                    self.open_elements.pop();
                }
                self.insert_html_element(&tag);
            }
            Token::StartTag(tag) if tag.name == "hr" => {
                if self.open_elements.current_is_html("option") {
                    self.open_elements.pop();
                }
                if self.open_elements.current_is_html("optgroup") {
                    self.open_elements.pop();
                }
                self.insert_and_pop(&tag);
            }
            Token::EndTag(tag) if tag.name == "optgroup" => {
                let len = self.open_elements.len();
                let option_in_optgroup = self.open_elements.current_is_html("option")
                    && len >= 2
                    && self
                        .open_elements
                        .get(len - 2)
                        .map_or(false, |x| x.is_html("optgroup"));
                if option_in_optgroup {
                    self.open_elements.pop();
                }
                if self.open_elements.current_is_html("optgroup") {
                    let optgroup = self.open_elements.pop();
                    self.close_element(optgroup);
                } else {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                }
            }
            Token::EndTag(tag) if tag.name == "option" => {
                if self.open_elements.current_is_html("option") {
                    let option = self.open_elements.pop();
                    self.close_element(option);
                } else {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                }
            }
            Token::EndTag(tag) if tag.name == "select" => {
                if !self.open_elements.has_in_select_scope("select") {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.pop_until_closed("select");
                self.reset_insertion_mode();
            }
            Token::StartTag(ref tag) if tag.name == "select" => {
                self.error(Error::UnexpectedStartTag);
                if self.open_elements.has_in_select_scope("select") {
                    self.open_elements.pop_until_tag_name_popped("select");
                    self.reset_insertion_mode();
                }
            }
            Token::StartTag(ref tag) if matches!(&*tag.name, "input" | "keygen" | "textarea") => {
                self.error(Error::UnexpectedStartTag);
                if !self.open_elements.has_in_select_scope("select") {
                    return;
                }
                self.open_elements.pop_until_tag_name_popped("select");
                self.reset_insertion_mode();
                self.process_token(token);
            }
            Token::StartTag(ref tag) if matches!(&*tag.name, "script" | "template") => {
                self.in_head(token);
            }
            Token::EndTag(ref tag) if tag.name == "template" => self.in_head(token),
            Token::Eof => self.in_body(token),
            token => self.unexpected(&token),
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-inselectintable>
    pub(crate) fn in_select_in_table(&mut self, token: Token) {
        const TABLE_TAGS: &[&str] = &[
            "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
        ];

        match token {
            Token::StartTag(ref tag) if TABLE_TAGS.contains(&&*tag.name) => {
                self.error(Error::UnexpectedStartTag);
                self.open_elements.pop_until_tag_name_popped("select");
                self.reset_insertion_mode();
                self.process_token(token);
            }
            Token::EndTag(ref tag) if TABLE_TAGS.contains(&&*tag.name) => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
                if !self.open_elements.has_in_table_scope(&tag.name) {
                    return;
                }
                self.open_elements.pop_until_tag_name_popped("select");
                self.reset_insertion_mode();
                self.process_token(token);
            }
            token => self.in_select(token),
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-intemplate>
    pub(crate) fn in_template(&mut self, token: Token) {
        match token {
            Token::Characters(_) | Token::Comment(_) | Token::Doctype(_) => self.in_body(token),
            Token::StartTag(ref tag)
                if matches!(
                    &*tag.name,
                    "base"
                        | "basefont"
                        | "bgsound"
                        | "link"
                        | "meta"
                        | "noframes"
                        | "script"
                        | "style"
                        | "template"
                        | "title"
                ) =>
            {
                self.in_head(token);
            }
            Token::EndTag(ref tag) if tag.name == "template" => self.in_head(token),
            Token::StartTag(ref tag) => {
                let mode = match &*tag.name {
                    "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => InsertionMode::InTable,
                    "col" => InsertionMode::InColumnGroup,
                    "tr" => InsertionMode::InTableBody,
                    "td" | "th" => InsertionMode::InRow,
                    _ => InsertionMode::InBody,
                };
                self.template_modes.pop();
                self.template_modes.push(mode);
                self.switch_to(mode);
                self.process_token(token);
            }
            Token::EndTag(_) => self.error(Error::EndTagWithoutMatchingOpenElement),
            Token::Eof => {
                if !self.open_elements.contains_html("template") {
                    self.stop_parsing();
                    return;
                }
                self.error(Error::OpenElementsLeftAfterEof);
                self.open_elements.pop_until_tag_name_popped("template");
                self.active_formatting.clear_to_last_marker();
                self.template_modes.pop();
                self.reset_insertion_mode();
                self.process_token(Token::Eof);
            }
        }
    }
}
