use crate::emitter::Emitter;
use crate::utils::trace_log;
use crate::{Span, State};

/// Every state of the [tokenization](https://html.spec.whatwg.org/#tokenization) state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum MachineState {
    Data,
    RcData,
    RawText,
    ScriptData,
    PlainText,
    TagOpen,
    EndTagOpen,
    TagName,
    RcDataLessThanSign,
    RcDataEndTagOpen,
    RcDataEndTagName,
    RawTextLessThanSign,
    RawTextEndTagOpen,
    RawTextEndTagName,
    ScriptDataLessThanSign,
    ScriptDataEndTagOpen,
    ScriptDataEndTagName,
    ScriptDataEscapeStart,
    ScriptDataEscapeStartDash,
    ScriptDataEscaped,
    ScriptDataEscapedDash,
    ScriptDataEscapedDashDash,
    ScriptDataEscapedLessThanSign,
    ScriptDataEscapedEndTagOpen,
    ScriptDataEscapedEndTagName,
    ScriptDataDoubleEscapeStart,
    ScriptDataDoubleEscaped,
    ScriptDataDoubleEscapedDash,
    ScriptDataDoubleEscapedDashDash,
    ScriptDataDoubleEscapedLessThanSign,
    ScriptDataDoubleEscapeEnd,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    BogusComment,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentLessThanSign,
    CommentLessThanSignBang,
    CommentLessThanSignBangDash,
    CommentLessThanSignBangDashDash,
    CommentEndDash,
    CommentEnd,
    CommentEndBang,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
    AfterDoctypePublicKeyword,
    BeforeDoctypePublicIdentifier,
    DoctypePublicIdentifierDoubleQuoted,
    DoctypePublicIdentifierSingleQuoted,
    AfterDoctypePublicIdentifier,
    BetweenDoctypePublicAndSystemIdentifiers,
    AfterDoctypeSystemKeyword,
    BeforeDoctypeSystemIdentifier,
    DoctypeSystemIdentifierDoubleQuoted,
    DoctypeSystemIdentifierSingleQuoted,
    AfterDoctypeSystemIdentifier,
    BogusDoctype,
    CdataSection,
    CdataSectionBracket,
    CdataSectionEnd,
    CharacterReference,
    NamedCharacterReference,
    AmbiguousAmpersand,
    NumericCharacterReference,
    HexadecimalCharacterReferenceStart,
    DecimalCharacterReferenceStart,
    HexadecimalCharacterReference,
    DecimalCharacterReference,
    NumericCharacterReferenceEnd,
}

impl From<State> for MachineState {
    fn from(state: State) -> Self {
        match state {
            State::Data => MachineState::Data,
            State::PlainText => MachineState::PlainText,
            State::RcData => MachineState::RcData,
            State::RawText => MachineState::RawText,
            State::ScriptData => MachineState::ScriptData,
            State::CdataSection => MachineState::CdataSection,
        }
    }
}

#[derive(Debug)]
pub(crate) struct MachineHelper {
    pub(crate) temporary_buffer: String,
    pub(crate) character_reference_code: u32,
    /// Offset of the `&` that started the character reference being consumed.
    pub(crate) character_reference_start: usize,
    state: MachineState,
    return_state: Option<(MachineState, bool)>,
}

impl Default for MachineHelper {
    fn default() -> Self {
        MachineHelper {
            temporary_buffer: String::new(),
            character_reference_code: 0,
            character_reference_start: 0,
            state: MachineState::Data,
            return_state: None,
        }
    }
}

impl MachineHelper {
    pub(crate) fn is_consumed_as_part_of_an_attribute(&self) -> bool {
        match self.return_state {
            Some((_state, is_attribute)) => is_attribute,
            None => false,
        }
    }

    pub(crate) fn flush_code_points_consumed_as_character_reference(
        &mut self,
        emitter: &mut Emitter,
        end: usize,
    ) {
        if self.is_consumed_as_part_of_an_attribute() {
            emitter.push_attribute_value(&self.temporary_buffer);
            self.temporary_buffer.clear();
        } else {
            let span = Span::new(self.character_reference_start, end);
            emitter.emit_buffered(&self.temporary_buffer, span);
            self.temporary_buffer.clear();
        }
    }

    pub(crate) fn flush_buffer_characters(&mut self, emitter: &mut Emitter, span: Span) {
        emitter.emit_buffered(&self.temporary_buffer, span);
        self.temporary_buffer.clear();
    }

    pub(crate) fn state(&self) -> MachineState {
        self.state
    }

    pub(crate) fn enter_state(&mut self, state: MachineState, is_attribute: bool) {
        debug_assert!(self.return_state.is_none());
        self.return_state = Some((self.state, is_attribute));
        self.switch_to(state);
    }

    pub(crate) fn pop_return_state(&mut self) -> MachineState {
        match self.return_state.take() {
            Some((state, _)) => state,
            None => {
                debug_assert!(false, "no return state");
                MachineState::Data
            }
        }
    }

    pub(crate) fn exit_state(&mut self) {
        let state = self.pop_return_state();
        self.switch_to(state);
    }

    pub(crate) fn switch_to(&mut self, state: MachineState) {
        trace_log!("switch_to: {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
