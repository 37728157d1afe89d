/// Tokenizer states that the tokenizer can be switched to from the outside, such as by the tree
/// builder after it saw `<textarea>`, or when parsing a fragment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum State {
    /// The data state.
    Data,
    /// The plain text state.
    PlainText,
    /// The RC data state.
    RcData,
    /// The raw text state.
    RawText,
    /// The script data state.
    ScriptData,
    /// The cdata section state.
    CdataSection,
}
