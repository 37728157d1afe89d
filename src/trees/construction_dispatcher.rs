//! The [tree construction dispatcher](https://html.spec.whatwg.org/#tree-construction-dispatcher)
//! and the rules for [parsing tokens in foreign
//! content](https://html.spec.whatwg.org/#parsing-main-inforeign).
use crate::error::Error;
use crate::token::{CharacterKind, Token};
use crate::trees::foreign::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
    adjust_svg_tag_name, is_breakout_start_tag,
};
use crate::trees::scopes::mathml_text_integration_point;
use crate::trees::{InsertionMode, TreeBuilder};
use crate::{Namespace, TreeAdapter};

/// A namespace plus a local name, the way element sets in the parsing algorithm are defined.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ExpandedName<'a> {
    pub(crate) ns: Namespace,
    pub(crate) local: &'a str,
}

impl<A: TreeAdapter> TreeBuilder<A> {
    pub(crate) fn process_token(&mut self, token: Token) {
        if self.use_insertion_mode_for(&token) {
            self.process_token_using_the_rules_for(self.mode, token);
        } else {
            self.process_token_in_foreign_content(token);
        }
    }

    fn use_insertion_mode_for(&self, token: &Token) -> bool {
        let node = match self.adjusted_current_node() {
            Some(node) => node,
            None => return true,
        };

        node.ns == Namespace::Html
            || (mathml_text_integration_point(node.expanded())
                && (matches!(token, Token::StartTag(ref tag) if !matches!(&*tag.name, "mglyph" | "malignmark"))
                    || matches!(token, Token::Characters(_))))
            || (node.ns == Namespace::MathMl
                && node.name == "annotation-xml"
                && matches!(token, Token::StartTag(ref tag) if tag.name == "svg"))
            || (node.html_integration_point
                && matches!(token, Token::StartTag(_) | Token::Characters(_)))
            || matches!(token, Token::Eof)
    }

    /// Process `token` according to the rules of `mode`, without switching to it.
    pub(crate) fn process_token_using_the_rules_for(&mut self, mode: InsertionMode, token: Token) {
        match mode {
            InsertionMode::Initial => self.initial(token),
            InsertionMode::BeforeHtml => self.before_html(token),
            InsertionMode::BeforeHead => self.before_head(token),
            InsertionMode::InHead => self.in_head(token),
            InsertionMode::InHeadNoscript => self.in_head_noscript(token),
            InsertionMode::AfterHead => self.after_head(token),
            InsertionMode::InBody => self.in_body(token),
            InsertionMode::Text => self.text(token),
            InsertionMode::InTable => self.in_table(token),
            InsertionMode::InTableText => self.in_table_text(token),
            InsertionMode::InCaption => self.in_caption(token),
            InsertionMode::InColumnGroup => self.in_column_group(token),
            InsertionMode::InTableBody => self.in_table_body(token),
            InsertionMode::InRow => self.in_row(token),
            InsertionMode::InCell => self.in_cell(token),
            InsertionMode::InSelect => self.in_select(token),
            InsertionMode::InSelectInTable => self.in_select_in_table(token),
            InsertionMode::InTemplate => self.in_template(token),
            InsertionMode::AfterBody => self.after_body(token),
            InsertionMode::InFrameset => self.in_frameset(token),
            InsertionMode::AfterFrameset => self.after_frameset(token),
            InsertionMode::AfterAfterBody => self.after_after_body(token),
            InsertionMode::AfterAfterFrameset => self.after_after_frameset(token),
        }
    }

    /// Pop until the current node is an HTML element or an integration point, then hand the
    /// token back to the current insertion mode.
    fn break_out_of_foreign_content(&mut self, token: Token) {
        self.error(Error::UnexpectedTokenInForeignContent);
        while let Some(current) = self.open_elements.current() {
            if current.ns == Namespace::Html
                || mathml_text_integration_point(current.expanded())
                || current.html_integration_point
            {
                break;
            }
            self.open_elements.pop();
        }
        self.process_token_using_the_rules_for(self.mode, token);
    }

    fn process_token_in_foreign_content(&mut self, token: Token) {
        match token {
            Token::Characters(chars) => match chars.kind {
                CharacterKind::Null => {
                    let replaced: String = chars
                        .text
                        .chars()
                        .map(|_| {
                            self.error(Error::UnexpectedNullCharacter);
                            '\u{fffd}'
                        })
                        .collect();
                    self.insert_characters(&replaced);
                }
                CharacterKind::Whitespace => self.insert_characters(&chars.text),
                CharacterKind::Regular => {
                    self.insert_characters(&chars.text);
                    self.frameset_ok = false;
                }
            },
            Token::Comment(comment) => self.insert_comment(&comment.data, None),
            Token::Doctype(_) => self.error(Error::MisplacedDoctype),
            Token::StartTag(tag) if is_breakout_start_tag(&tag) => {
                self.break_out_of_foreign_content(Token::StartTag(tag));
            }
            Token::StartTag(mut tag) => {
                let ns = match self.adjusted_current_node() {
                    Some(node) => node.ns,
                    None => Namespace::Html,
                };
                match ns {
                    Namespace::MathMl => adjust_mathml_attributes(&mut tag),
                    Namespace::Svg => {
                        adjust_svg_tag_name(&mut tag);
                        adjust_svg_attributes(&mut tag);
                    }
                    _ => (),
                }
                adjust_foreign_attributes(&mut tag);
                self.insert_element(&tag, ns);
                if tag.self_closing {
                    self.open_elements.pop();
                    self.acknowledge_self_closing();
                }
            }
            Token::EndTag(tag) if matches!(&*tag.name, "br" | "p") => {
                self.break_out_of_foreign_content(Token::EndTag(tag));
            }
            Token::EndTag(tag) => {
                let mut index = match self.open_elements.len().checked_sub(1) {
                    Some(index) => index,
                    None => return,
                };
                let matches_current = self
                    .open_elements
                    .current()
                    .map_or(false, |x| x.name.eq_ignore_ascii_case(&tag.name));
                if !matches_current {
                    self.error(Error::EndTagWithoutMatchingOpenElement);
                }

                loop {
                    if index == 0 {
                        return;
                    }
                    let node = match self.open_elements.get(index) {
                        Some(node) => node,
                        None => return,
                    };
                    if node.name.eq_ignore_ascii_case(&tag.name) {
                        let handle = node.handle.clone();
                        let element = self.open_elements.pop_until_element_popped(&handle);
                        self.close_element(element);
                        return;
                    }
                    index -= 1;
                    if self
                        .open_elements
                        .get(index)
                        .map_or(false, |x| x.ns == Namespace::Html)
                    {
                        self.process_token_using_the_rules_for(self.mode, Token::EndTag(tag));
                        return;
                    }
                }
            }
            Token::Eof => self.process_token_using_the_rules_for(self.mode, Token::Eof),
        }
    }
}
