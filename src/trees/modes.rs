//! The insertion modes around the body: everything before `<body>`, the text mode, and the modes
//! after `</body>` and for framesets.
use crate::error::Error;
use crate::token::{CharacterKind, Token};
use crate::trees::doctype::{doctype_is_non_conforming, quirks_mode_for};
use crate::trees::open_elements::OpenElement;
use crate::trees::{ignore_whitespace, InsertionMode, TreeBuilder};
use crate::{Namespace, QuirksMode, State, TreeAdapter};

impl<A: TreeAdapter> TreeBuilder<A> {
    /// <https://html.spec.whatwg.org/#the-initial-insertion-mode>
    pub(crate) fn initial(&mut self, token: Token) {
        ignore_whitespace!(token);

        match token {
            Token::Comment(comment) => {
                let document = self.document.clone();
                self.insert_comment(&comment.data, Some(document));
            }
            Token::Doctype(doctype) => {
                if doctype_is_non_conforming(&doctype) {
                    self.error(Error::NonConformingDoctype);
                }
                let document = self.document.clone();
                self.adapter.set_document_type(
                    &document,
                    doctype.name.as_deref().unwrap_or_default(),
                    doctype.public_identifier.as_deref().unwrap_or_default(),
                    doctype.system_identifier.as_deref().unwrap_or_default(),
                );
                self.set_quirks_mode(quirks_mode_for(&doctype));
                self.switch_to(InsertionMode::BeforeHtml);
            }
            token => {
                self.error(Error::MissingDoctype);
                self.set_quirks_mode(QuirksMode::Quirks);
                self.switch_to(InsertionMode::BeforeHtml);
                self.process_token(token);
            }
        }
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
        let document = self.document.clone();
        self.adapter.set_quirks_mode(&document, mode);
    }

    /// <https://html.spec.whatwg.org/#the-before-html-insertion-mode>
    pub(crate) fn before_html(&mut self, token: Token) {
        ignore_whitespace!(token);

        match token {
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::Comment(comment) => {
                let document = self.document.clone();
                self.insert_comment(&comment.data, Some(document));
            }
            Token::StartTag(tag) if tag.name == "html" => {
                let element = self.create_element_for_token(&tag, Namespace::Html);
                let document = self.document.clone();
                self.adapter.append_child(&document, &element.handle);
                self.open_elements.push(element);
                self.switch_to(InsertionMode::BeforeHead);
            }
            Token::EndTag(ref tag) if !matches!(&*tag.name, "head" | "body" | "html" | "br") => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            token => {
                let handle = self
                    .adapter
                    .create_element("html", Namespace::Html, Vec::new());
                let document = self.document.clone();
                self.adapter.append_child(&document, &handle);
                self.open_elements.push(OpenElement {
                    handle,
                    name: "html".to_owned(),
                    ns: Namespace::Html,
                    html_integration_point: false,
                });
                self.switch_to(InsertionMode::BeforeHead);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#the-before-head-insertion-mode>
    pub(crate) fn before_head(&mut self, token: Token) {
        ignore_whitespace!(token);

        match token {
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::StartTag(tag) if tag.name == "head" => {
                let head = self.insert_html_element(&tag);
                self.head_element = Some(head);
                self.switch_to(InsertionMode::InHead);
            }
            Token::EndTag(ref tag) if !matches!(&*tag.name, "head" | "body" | "html" | "br") => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            token => {
                let head = self.insert_phantom("head");
                self.head_element = Some(head);
                self.switch_to(InsertionMode::InHead);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-inhead>
    pub(crate) fn in_head(&mut self, token: Token) {
        match token {
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.insert_characters(&chars.text);
            }
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::StartTag(tag)
                if matches!(&*tag.name, "base" | "basefont" | "bgsound" | "link" | "meta") =>
            {
                self.insert_and_pop(&tag);
            }
            Token::StartTag(tag) if tag.name == "title" => {
                self.parse_text_element(&tag, State::RcData);
            }
            Token::StartTag(tag)
                if matches!(&*tag.name, "noframes" | "style")
                    || (tag.name == "noscript" && self.scripting_enabled) =>
            {
                self.parse_text_element(&tag, State::RawText);
            }
            Token::StartTag(tag) if tag.name == "noscript" => {
                self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InHeadNoscript);
            }
            Token::StartTag(tag) if tag.name == "script" => {
                self.parse_text_element(&tag, State::ScriptData);
            }
            Token::EndTag(tag) if tag.name == "head" => {
                let head = self.open_elements.pop();
                self.close_element(head);
                self.switch_to(InsertionMode::AfterHead);
            }
            Token::StartTag(tag) if tag.name == "template" => {
                self.insert_html_element(&tag);
                self.active_formatting.insert_marker();
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTemplate);
                self.template_modes.push(InsertionMode::InTemplate);
            }
            Token::EndTag(tag) if tag.name == "template" => {
                if !self.open_elements.contains_html("template") {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                self.open_elements.generate_implied_end_tags_thoroughly();
                if !self.open_elements.current_is_html("template") {
                    self.error(Error::ClosingOfElementWithOpenChildElements);
                }
                self.pop_until_closed("template");
                self.active_formatting.clear_to_last_marker();
                self.template_modes.pop();
                self.reset_insertion_mode();
            }
            Token::StartTag(ref tag) if tag.name == "head" => {
                self.error(Error::MisplacedStartTagForHeadElement);
            }
            Token::EndTag(ref tag) if !matches!(&*tag.name, "body" | "html" | "br") => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            token => {
                self.open_elements.pop();
                self.switch_to(InsertionMode::AfterHead);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-inheadnoscript>
    pub(crate) fn in_head_noscript(&mut self, token: Token) {
        match token {
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::EndTag(tag) if tag.name == "noscript" => {
                let noscript = self.open_elements.pop();
                self.close_element(noscript);
                self.switch_to(InsertionMode::InHead);
            }
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.in_head(token);
            }
            Token::Comment(_) => self.in_head(token),
            Token::StartTag(ref tag)
                if matches!(
                    &*tag.name,
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.in_head(token);
            }
            Token::StartTag(ref tag) if matches!(&*tag.name, "head" | "noscript") => {
                self.error(Error::NestedNoscriptInHead);
            }
            Token::EndTag(ref tag) if tag.name != "br" => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            token => {
                self.error(Error::DisallowedContentInNoscriptInHead);
                self.open_elements.pop();
                self.switch_to(InsertionMode::InHead);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#the-after-head-insertion-mode>
    pub(crate) fn after_head(&mut self, token: Token) {
        match token {
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.insert_characters(&chars.text);
            }
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::StartTag(tag) if tag.name == "body" => {
                self.insert_html_element(&tag);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InBody);
            }
            Token::StartTag(tag) if tag.name == "frameset" => {
                self.insert_html_element(&tag);
                self.switch_to(InsertionMode::InFrameset);
            }
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
                self.error(Error::AbandonedHeadElementChild);
                let head = match self.head_element.clone() {
                    Some(head) => head,
                    None => return self.in_head(token),
                };
                self.open_elements.push(OpenElement {
                    handle: head.clone(),
                    name: "head".to_owned(),
                    ns: Namespace::Html,
                    html_integration_point: false,
                });
                self.in_head(token);
                self.open_elements.remove(&head);
            }
            Token::EndTag(ref tag) if tag.name == "template" => self.in_head(token),
            Token::StartTag(ref tag) if tag.name == "head" => {
                self.error(Error::MisplacedStartTagForHeadElement);
            }
            Token::EndTag(ref tag) if !matches!(&*tag.name, "body" | "html" | "br") => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            token => {
                self.insert_phantom("body");
                self.switch_to(InsertionMode::InBody);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-incdata>
    pub(crate) fn text(&mut self, token: Token) {
        match token {
            Token::Characters(chars) => self.insert_characters(&chars.text),
            Token::Eof => {
                self.error(Error::EofInElementThatCanContainOnlyText);
                self.open_elements.pop();
                self.switch_to(self.original_mode);
                self.process_token(Token::Eof);
            }
            Token::EndTag(tag) => {
                let element = self.open_elements.pop();
                if tag.name == "script" {
                    self.script_ended = element.as_ref().map(|x| x.handle.clone());
                }
                self.close_element(element);
                self.switch_to(self.original_mode);
            }
            // the tokenizer cannot produce anything else in the text states
            _ => (),
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-afterbody>
    pub(crate) fn after_body(&mut self, token: Token) {
        match token {
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.in_body(token);
            }
            Token::Comment(comment) => {
                let html = self.open_elements.get(0).map(|x| x.handle.clone());
                self.insert_comment(&comment.data, html);
            }
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::EndTag(tag) if tag.name == "html" => {
                if self.is_fragment() {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                    return;
                }
                let html = self.open_elements.get(0).cloned();
                self.close_element(html);
                self.switch_to(InsertionMode::AfterAfterBody);
            }
            Token::Eof => self.stop_parsing(),
            token => {
                self.unexpected(&token);
                self.switch_to(InsertionMode::InBody);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-inframeset>
    pub(crate) fn in_frameset(&mut self, token: Token) {
        match token {
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.insert_characters(&chars.text);
            }
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::StartTag(tag) if tag.name == "frameset" => {
                self.insert_html_element(&tag);
            }
            Token::EndTag(ref tag) if tag.name == "frameset" && self.open_elements.len() == 1 => {
                self.error(Error::EndTagWithoutMatchingOpenElement);
            }
            Token::EndTag(tag) if tag.name == "frameset" => {
                let frameset = self.open_elements.pop();
                self.close_element(frameset);
                if !self.is_fragment() && !self.open_elements.current_is_html("frameset") {
                    self.switch_to(InsertionMode::AfterFrameset);
                }
            }
            Token::StartTag(tag) if tag.name == "frame" => self.insert_and_pop(&tag),
            Token::StartTag(ref tag) if tag.name == "noframes" => self.in_head(token),
            Token::Eof => {
                if self.open_elements.len() != 1 {
                    self.error(Error::OpenElementsLeftAfterEof);
                }
                self.stop_parsing();
            }
            token => self.unexpected(&token),
        }
    }

    /// <https://html.spec.whatwg.org/#parsing-main-afterframeset>
    pub(crate) fn after_frameset(&mut self, token: Token) {
        match token {
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.insert_characters(&chars.text);
            }
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::EndTag(tag) if tag.name == "html" => {
                let html = self.open_elements.get(0).cloned();
                self.close_element(html);
                self.switch_to(InsertionMode::AfterAfterFrameset);
            }
            Token::StartTag(ref tag) if tag.name == "noframes" => self.in_head(token),
            Token::Eof => self.stop_parsing(),
            token => self.unexpected(&token),
        }
    }

    /// <https://html.spec.whatwg.org/#the-after-after-body-insertion-mode>
    pub(crate) fn after_after_body(&mut self, token: Token) {
        match token {
            Token::Comment(comment) => {
                let document = self.document.clone();
                self.insert_comment(&comment.data, Some(document));
            }
            Token::Doctype(_) => self.in_body(token),
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.in_body(token);
            }
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::Eof => self.stop_parsing(),
            token => {
                self.unexpected(&token);
                self.switch_to(InsertionMode::InBody);
                self.process_token(token);
            }
        }
    }

    /// <https://html.spec.whatwg.org/#the-after-after-frameset-insertion-mode>
    pub(crate) fn after_after_frameset(&mut self, token: Token) {
        match token {
            Token::Comment(comment) => {
                let document = self.document.clone();
                self.insert_comment(&comment.data, Some(document));
            }
            Token::Doctype(_) => self.in_body(token),
            Token::Characters(ref chars) if chars.kind == CharacterKind::Whitespace => {
                self.in_body(token);
            }
            Token::StartTag(ref tag) if tag.name == "html" => self.in_body(token),
            Token::Eof => self.stop_parsing(),
            Token::StartTag(ref tag) if tag.name == "noframes" => self.in_head(token),
            token => self.unexpected(&token),
        }
    }
}
