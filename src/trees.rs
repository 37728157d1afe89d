//! [Tree construction](https://html.spec.whatwg.org/#tree-construction).
//!
//! The [`TreeBuilder`] consumes tokens one at a time and builds the tree through a
//! [`TreeAdapter`]. It never talks to the tokenizer directly: requests such as "switch to RAWTEXT"
//! are left in [`TreeBuilder::take_tokenizer_state`] for the parser loop to forward.
mod construction_dispatcher;
mod doctype;
mod foreign;
mod formatting;
mod in_body;
mod in_table;
mod modes;
mod open_elements;
mod scopes;

use crate::error::Error;
use crate::token::{Characters, StartTag, Token};
use crate::utils::trace_log;
use crate::{Namespace, QuirksMode, SourceLocation, State, TreeAdapter};

use foreign::is_html_integration_point;
use formatting::{FormattingElementList, FormattingEntry};
use open_elements::{OpenElement, OpenElementStack};

/// The [insertion modes](https://html.spec.whatwg.org/#insertion-mode).
#[derive(Copy, Eq, Clone, Debug, PartialEq)]
pub(crate) enum InsertionMode {
    Initial,
    BeforeHtml,
    BeforeHead,
    InHead,
    InHeadNoscript,
    AfterHead,
    InBody,
    Text,
    InTable,
    InTableText,
    InCaption,
    InColumnGroup,
    InTableBody,
    InRow,
    InCell,
    InSelect,
    InSelectInTable,
    InTemplate,
    AfterBody,
    InFrameset,
    AfterFrameset,
    AfterAfterBody,
    AfterAfterFrameset,
}

/// Where a node is going to be inserted.
#[derive(Debug)]
pub(crate) enum InsertionPlace<H> {
    LastChild(H),
    Before { parent: H, reference: H },
}

/// Return early from a handler if the token is a run of whitespace. Used by the modes that ignore
/// inter-element whitespace.
macro_rules! ignore_whitespace {
    ($token:expr) => {
        if let Token::Characters(ref chars) = $token {
            if chars.kind == crate::token::CharacterKind::Whitespace {
                return;
            }
        }
    };
}

pub(crate) use ignore_whitespace;

/// Everything needed to run the tree construction stage for one document or fragment.
pub(crate) struct TreeBuilder<A: TreeAdapter> {
    pub(crate) adapter: A,
    pub(crate) document: A::Handle,

    scripting_enabled: bool,
    location_info: bool,

    mode: InsertionMode,
    original_mode: InsertionMode,
    template_modes: Vec<InsertionMode>,

    open_elements: OpenElementStack<A::Handle>,
    active_formatting: FormattingElementList<A::Handle>,

    head_element: Option<A::Handle>,
    form_element: Option<A::Handle>,

    /// The context element of a fragment parse.
    context: Option<OpenElement<A::Handle>>,
    /// The `<html>` element of a fragment parse, whose children become the fragment.
    fragment_root: Option<A::Handle>,

    frameset_ok: bool,
    foster_parenting: bool,
    skip_next_newline: bool,
    self_closing_acknowledged: bool,
    pending_table_text: Vec<Characters>,
    quirks_mode: QuirksMode,
    stopped: bool,

    token_offset: usize,
    token_location: Option<SourceLocation>,
    /// Whether the token being processed is an end tag.
    at_end_tag: bool,
    errors: Vec<(Error, usize)>,

    tokenizer_state: Option<State>,
    script_ended: Option<A::Handle>,
}

impl<A: TreeAdapter> std::fmt::Debug for TreeBuilder<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("mode", &self.mode)
            .field("open_elements", &self.open_elements)
            .field("active_formatting", &self.active_formatting)
            .field("stopped", &self.stopped)
            .finish()
    }
}

impl<A: TreeAdapter> TreeBuilder<A> {
    pub(crate) fn new(mut adapter: A, scripting_enabled: bool, location_info: bool) -> Self {
        let document = adapter.create_document();
        TreeBuilder {
            adapter,
            document,
            scripting_enabled,
            location_info,
            mode: InsertionMode::Initial,
            original_mode: InsertionMode::Initial,
            template_modes: Vec::new(),
            open_elements: OpenElementStack::default(),
            active_formatting: FormattingElementList::default(),
            head_element: None,
            form_element: None,
            context: None,
            fragment_root: None,
            frameset_ok: true,
            foster_parenting: false,
            skip_next_newline: false,
            self_closing_acknowledged: false,
            pending_table_text: Vec::new(),
            quirks_mode: QuirksMode::NoQuirks,
            stopped: false,
            token_offset: 0,
            token_location: None,
            at_end_tag: false,
            errors: Vec::new(),
            tokenizer_state: None,
            script_ended: None,
        }
    }

    /// Set up the [fragment parsing
    /// algorithm](https://html.spec.whatwg.org/#html-fragment-parsing-algorithm) for `context`.
    ///
    /// Returns the tokenizer state the context element calls for.
    pub(crate) fn new_fragment(
        adapter: A,
        context: &A::Handle,
        scripting_enabled: bool,
        location_info: bool,
    ) -> (Self, State) {
        let mut builder = TreeBuilder::new(adapter, scripting_enabled, location_info);

        let name = builder.adapter.get_tag_name(context).to_owned();
        let ns = builder.adapter.get_namespace_uri(context);
        let html_integration_point =
            is_html_integration_point(&name, ns, builder.adapter.get_attr_list(context));

        let state = if ns != Namespace::Html {
            State::Data
        } else {
            match &*name {
                "title" | "textarea" => State::RcData,
                "style" | "xmp" | "iframe" | "noembed" | "noframes" => State::RawText,
                "noscript" if scripting_enabled => State::RawText,
                "script" => State::ScriptData,
                "plaintext" => State::PlainText,
                _ => State::Data,
            }
        };

        let root = builder
            .adapter
            .create_element("html", Namespace::Html, Vec::new());
        let document = builder.document.clone();
        builder.adapter.append_child(&document, &root);
        builder.open_elements.push(OpenElement {
            handle: root.clone(),
            name: "html".to_owned(),
            ns: Namespace::Html,
            html_integration_point: false,
        });
        builder.fragment_root = Some(root);

        if ns == Namespace::Html && name == "template" {
            builder.template_modes.push(InsertionMode::InTemplate);
        }

        // the nearest form ancestor of the context, including itself
        let mut node = Some(context.clone());
        while let Some(current) = node {
            if builder.adapter.get_namespace_uri(&current) == Namespace::Html
                && builder.adapter.get_tag_name(&current) == "form"
            {
                builder.form_element = Some(current);
                break;
            }
            node = builder.adapter.get_parent_node(&current);
        }

        builder.context = Some(OpenElement {
            handle: context.clone(),
            name,
            ns,
            html_integration_point,
        });
        builder.reset_insertion_mode();

        (builder, state)
    }

    /// Name of the fragment context element, which the tokenizer needs as its last start tag.
    pub(crate) fn context_name(&self) -> Option<&str> {
        self.context.as_ref().map(|x| x.name.as_str())
    }

    /// Feed a token into the tree builder. `offset` is where errors for this token are reported;
    /// `location` is only present with location info enabled.
    pub(crate) fn process(
        &mut self,
        mut token: Token,
        offset: usize,
        location: Option<SourceLocation>,
    ) {
        if self.stopped {
            return;
        }
        self.token_offset = offset;
        self.token_location = location;
        self.at_end_tag = matches!(token, Token::EndTag(_));

        if std::mem::take(&mut self.skip_next_newline) {
            if let Token::Characters(ref mut chars) = token {
                if chars.text.starts_with('\n') {
                    chars.text.remove(0);
                    if chars.text.is_empty() {
                        return;
                    }
                }
            }
        }

        let self_closing = matches!(token, Token::StartTag(ref tag) if tag.self_closing);
        self.self_closing_acknowledged = false;

        self.process_token(token);

        if self_closing && !self.self_closing_acknowledged {
            self.error(Error::NonVoidHtmlElementStartTagWithTrailingSolidus);
        }
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn take_errors(&mut self) -> Vec<(Error, usize)> {
        std::mem::take(&mut self.errors)
    }

    /// The tokenizer state the last token asked for, if any.
    pub(crate) fn take_tokenizer_state(&mut self) -> Option<State> {
        self.tokenizer_state.take()
    }

    /// The `<script>` element the last token closed, if any.
    pub(crate) fn take_script_ended(&mut self) -> Option<A::Handle> {
        self.script_ended.take()
    }

    /// Whether the tokenizer should recognize CDATA sections right now.
    pub(crate) fn allow_cdata(&self) -> bool {
        self.adjusted_current_node()
            .map_or(false, |x| x.ns != Namespace::Html)
    }

    /// Finish a full parse and return the adapter and the document.
    pub(crate) fn into_document(self) -> (A, A::Handle) {
        (self.adapter, self.document)
    }

    /// Finish a fragment parse: move the children of the fragment's `<html>` element into a new
    /// document fragment.
    pub(crate) fn into_fragment(mut self) -> (A, A::Handle) {
        let fragment = self.adapter.create_document_fragment();
        if let Some(root) = self.fragment_root.take() {
            for child in self.adapter.get_child_nodes(&root) {
                self.adapter.append_child(&fragment, &child);
            }
        }
        (self.adapter, fragment)
    }

    pub(crate) fn error(&mut self, error: Error) {
        trace_log!("tree builder error: {:?} in {:?}", error, self.mode);
        self.errors.push((error, self.token_offset));
    }

    /// Report a token that the current insertion mode has no place for.
    pub(crate) fn unexpected(&mut self, token: &Token) {
        let error = match token {
            Token::EndTag(_) => Error::EndTagWithoutMatchingOpenElement,
            Token::Characters(_) => Error::UnexpectedCharacterToken,
            Token::Doctype(_) => Error::MisplacedDoctype,
            _ => Error::UnexpectedStartTag,
        };
        self.error(error);
    }

    pub(crate) fn switch_to(&mut self, mode: InsertionMode) {
        trace_log!("insertion mode: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    pub(crate) fn acknowledge_self_closing(&mut self) {
        self.self_closing_acknowledged = true;
    }

    fn location(&self) -> Option<SourceLocation> {
        if self.location_info {
            self.token_location
        } else {
            None
        }
    }

    /// [Stop parsing](https://html.spec.whatwg.org/#stop-parsing).
    pub(crate) fn stop_parsing(&mut self) {
        trace_log!("stop parsing");
        while self.open_elements.pop().is_some() {}
        self.stopped = true;
    }

    /// The [adjusted current node](https://html.spec.whatwg.org/#adjusted-current-node).
    pub(crate) fn adjusted_current_node(&self) -> Option<&OpenElement<A::Handle>> {
        match self.context {
            Some(ref context) if self.open_elements.len() == 1 => Some(context),
            _ => self.open_elements.current(),
        }
    }

    pub(crate) fn is_fragment(&self) -> bool {
        self.context.is_some()
    }

    fn current_handle(&self) -> Option<A::Handle> {
        self.open_elements.current().map(|x| x.handle.clone())
    }

    /// The [appropriate place for inserting a
    /// node](https://html.spec.whatwg.org/#appropriate-place-for-inserting-a-node), optionally
    /// with the stack entry at `override_target` as target.
    pub(crate) fn appropriate_place(
        &self,
        override_target: Option<usize>,
    ) -> InsertionPlace<A::Handle> {
        let target_index = match override_target.or_else(|| self.open_elements.len().checked_sub(1))
        {
            Some(i) => i,
            None => return InsertionPlace::LastChild(self.document.clone()),
        };
        let target = match self.open_elements.get(target_index) {
            Some(target) => target,
            None => return InsertionPlace::LastChild(self.document.clone()),
        };

        let foster = self.foster_parenting
            && target.ns == Namespace::Html
            && matches!(&*target.name, "table" | "tbody" | "tfoot" | "thead" | "tr");
        if !foster {
            return self.inside(target);
        }

        let last_template = self.open_elements.iter().rposition(|x| x.is_html("template"));
        let last_table = self.open_elements.iter().rposition(|x| x.is_html("table"));

        match (last_template, last_table) {
            (Some(template), table) if table.map_or(true, |table| template > table) => {
                match self.open_elements.get(template) {
                    Some(template) => self.inside(template),
                    None => InsertionPlace::LastChild(self.document.clone()),
                }
            }
            (_, None) => match self.open_elements.get(0) {
                Some(html) => InsertionPlace::LastChild(html.handle.clone()),
                None => InsertionPlace::LastChild(self.document.clone()),
            },
            (_, Some(table_index)) => {
                let table = match self.open_elements.get(table_index) {
                    Some(table) => table,
                    None => return InsertionPlace::LastChild(self.document.clone()),
                };
                if let Some(parent) = self.adapter.get_parent_node(&table.handle) {
                    InsertionPlace::Before {
                        parent,
                        reference: table.handle.clone(),
                    }
                } else {
                    let previous = table_index
                        .checked_sub(1)
                        .and_then(|i| self.open_elements.get(i))
                        .unwrap_or(table);
                    InsertionPlace::LastChild(previous.handle.clone())
                }
            }
        }
    }

    /// Inserting into a template means inserting into its contents.
    fn inside(&self, element: &OpenElement<A::Handle>) -> InsertionPlace<A::Handle> {
        if element.is_html("template") {
            if let Some(content) = self.adapter.get_template_content(&element.handle) {
                return InsertionPlace::LastChild(content);
            }
        }
        InsertionPlace::LastChild(element.handle.clone())
    }

    pub(crate) fn insert_node(&mut self, place: InsertionPlace<A::Handle>, node: &A::Handle) {
        match place {
            InsertionPlace::LastChild(parent) => self.adapter.append_child(&parent, node),
            InsertionPlace::Before { parent, reference } => {
                self.adapter.insert_before(&parent, node, &reference);
            }
        }
    }

    /// [Insert characters](https://html.spec.whatwg.org/#insert-a-character) at the appropriate
    /// place.
    pub(crate) fn insert_characters(&mut self, text: &str) {
        let place = self.appropriate_place(None);
        let located = match place {
            InsertionPlace::LastChild(ref parent) if *parent == self.document => return,
            InsertionPlace::LastChild(parent) => {
                self.adapter.insert_text(&parent, text);
                self.adapter.get_child_nodes(&parent).pop()
            }
            InsertionPlace::Before { parent, reference } => {
                self.adapter.insert_text_before(&parent, text, &reference);
                let children = self.adapter.get_child_nodes(&parent);
                children
                    .iter()
                    .position(|x| *x == reference)
                    .and_then(|i| i.checked_sub(1))
                    .and_then(|i| children.get(i).cloned())
            }
        };

        if let (Some(location), Some(node)) = (self.location(), located) {
            if self.adapter.is_text_node(&node) {
                self.adapter.update_node_source_location(&node, location);
            }
        }
    }

    /// Insert a comment as the last child of `parent`, or at the appropriate place.
    pub(crate) fn insert_comment(&mut self, data: &str, parent: Option<A::Handle>) {
        let comment = self.adapter.create_comment(data);
        if let Some(location) = self.location() {
            self.adapter.set_node_source_location(&comment, location);
        }
        let place = match parent {
            Some(parent) => InsertionPlace::LastChild(parent),
            None => self.appropriate_place(None),
        };
        self.insert_node(place, &comment);
    }

    /// [Create an element for a token](https://html.spec.whatwg.org/#create-an-element-for-the-token).
    pub(crate) fn create_element_for_token(
        &mut self,
        tag: &StartTag,
        ns: Namespace,
    ) -> OpenElement<A::Handle> {
        let handle = self
            .adapter
            .create_element(&tag.name, ns, tag.attributes.clone());
        // implied elements have an empty span and stay unlocated
        if let Some(location) = self.location().filter(|_| !tag.span.is_empty()) {
            self.adapter.set_node_source_location(&handle, location);
        }
        OpenElement {
            handle,
            name: tag.name.clone(),
            ns,
            html_integration_point: is_html_integration_point(&tag.name, ns, &tag.attributes),
        }
    }

    /// [Insert a foreign element](https://html.spec.whatwg.org/#insert-a-foreign-element) and
    /// push it onto the stack of open elements.
    pub(crate) fn insert_element(&mut self, tag: &StartTag, ns: Namespace) -> A::Handle {
        let place = self.appropriate_place(None);
        let element = self.create_element_for_token(tag, ns);
        let handle = element.handle.clone();
        self.insert_node(place, &handle);
        self.open_elements.push(element);
        handle
    }

    pub(crate) fn insert_html_element(&mut self, tag: &StartTag) -> A::Handle {
        self.insert_element(tag, Namespace::Html)
    }

    /// Insert an HTML element for a start tag the source does not contain, such as an implied
    /// `<tbody>`.
    pub(crate) fn insert_phantom(&mut self, name: &str) -> A::Handle {
        let tag = StartTag {
            name: name.to_owned(),
            ..StartTag::default()
        };
        self.insert_html_element(&tag)
    }

    /// Pop the current node after a void element has been inserted.
    pub(crate) fn insert_and_pop(&mut self, tag: &StartTag) {
        self.insert_html_element(tag);
        self.open_elements.pop();
        self.acknowledge_self_closing();
    }

    /// Extend the location of an element that its end tag closed. Elements closed implicitly
    /// keep the location of their start tag.
    pub(crate) fn close_element(&mut self, element: Option<OpenElement<A::Handle>>) {
        if !self.at_end_tag {
            return;
        }
        if let (Some(location), Some(element)) = (self.location(), element) {
            self.adapter
                .update_node_source_location(&element.handle, location);
        }
    }

    /// Pop until an HTML element called `name` has been popped, extending its location to cover
    /// the current end tag.
    pub(crate) fn pop_until_closed(&mut self, name: &str) {
        let element = self.open_elements.pop_until_tag_name_popped(name);
        self.close_element(element);
    }

    /// The [generic raw text and RCDATA element parsing
    /// algorithms](https://html.spec.whatwg.org/#generic-raw-text-element-parsing-algorithm).
    pub(crate) fn parse_text_element(&mut self, tag: &StartTag, state: State) {
        self.insert_html_element(tag);
        self.tokenizer_state = Some(state);
        self.original_mode = self.mode;
        self.switch_to(InsertionMode::Text);
    }

    pub(crate) fn set_tokenizer_state(&mut self, state: State) {
        self.tokenizer_state = Some(state);
    }

    fn is_marker_or_open(&self, index: usize) -> bool {
        match self.active_formatting.get(index) {
            Some(FormattingEntry::Marker) | None => true,
            Some(FormattingEntry::Element { handle, .. }) => self.open_elements.contains(handle),
        }
    }

    /// [Reconstruct the active formatting
    /// elements](https://html.spec.whatwg.org/#reconstruct-the-active-formatting-elements).
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        let last = match self.active_formatting.len().checked_sub(1) {
            Some(last) => last,
            None => return,
        };
        if self.is_marker_or_open(last) {
            return;
        }

        let mut index = last;
        while index > 0 {
            index -= 1;
            if self.is_marker_or_open(index) {
                index += 1;
                break;
            }
        }

        loop {
            let token = match self.active_formatting.get(index) {
                Some(FormattingEntry::Element { token, .. }) => token.clone(),
                _ => break,
            };
            let handle = self.insert_html_element(&token);
            self.active_formatting.replace_at(index, handle, token);
            if index == last {
                break;
            }
            index += 1;
        }
    }

    /// [Reset the insertion mode
    /// appropriately](https://html.spec.whatwg.org/#reset-the-insertion-mode-appropriately).
    pub(crate) fn reset_insertion_mode(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.switch_to(mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        for (i, element) in self.open_elements.iter().enumerate().rev() {
            let last = i == 0;
            let node = match self.context {
                Some(ref context) if last => context,
                _ => element,
            };
            if node.ns != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }

            match &*node.name {
                "select" => {
                    if !last {
                        for ancestor in self.open_elements.iter().take(i).rev() {
                            if ancestor.is_html("template") {
                                break;
                            }
                            if ancestor.is_html("table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    return InsertionMode::InSelect;
                }
                "td" | "th" if !last => return InsertionMode::InCell,
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                "template" => {
                    return self
                        .template_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate)
                }
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                "html" => {
                    return if self.head_element.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    }
                }
                _ if last => return InsertionMode::InBody,
                _ => (),
            }
        }
        InsertionMode::InBody
    }

    /// [Close a `p` element](https://html.spec.whatwg.org/#close-a-p-element).
    pub(crate) fn close_p_element(&mut self) {
        self.open_elements.generate_implied_end_tags(Some("p"));
        if !self.open_elements.current_is_html("p") {
            self.error(Error::EndTagWithoutMatchingOpenElement);
        }
        self.pop_until_closed("p");
    }

    pub(crate) fn close_p_element_in_button_scope(&mut self) {
        if self.open_elements.has_in_button_scope("p") {
            self.close_p_element();
        }
    }

    /// Whether an open element other than the ones whose end tag may be omitted at the end of
    /// the body is left.
    pub(crate) fn has_unclosed_elements(&self) -> bool {
        self.open_elements.iter().any(|x| {
            !(x.ns == Namespace::Html
                && matches!(
                    &*x.name,
                    "dd" | "dt"
                        | "li"
                        | "optgroup"
                        | "option"
                        | "p"
                        | "rb"
                        | "rp"
                        | "rt"
                        | "rtc"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                        | "body"
                        | "html"
                ))
        })
    }
}
