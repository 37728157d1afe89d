use html5arbor::{Span, Token, Tokenizer};

/// Validates span invariants for all tokens produced from the input.
///
/// This fuzzer checks that:
/// 1. Spans have valid bounds (start <= end <= input.len())
/// 2. Spans of tags, comments and doctypes point at markup in the input
/// 3. Spans are ordered
pub fn validate_span_invariants(input: &str) {
    let mut last_end: Option<usize> = None;

    for token in Tokenizer::new(input) {
        validate_token_span(&token, input, &mut last_end);
    }
}

/// Validates the span of a single token against the input.
fn validate_token_span(token: &Token, input: &str, last_end: &mut Option<usize>) {
    let (span, kind, prefix) = match token {
        Token::StartTag(tag) => (tag.span, "StartTag", "<"),
        Token::EndTag(tag) => (tag.span, "EndTag", "</"),
        Token::Comment(comment) => (comment.span, "Comment", "<"),
        Token::Doctype(doctype) => (doctype.span, "Doctype", "<!"),
        Token::Characters(chars) => (chars.span, "Characters", ""),
        Token::Eof => return,
    };

    validate_span(span, input, kind, last_end);

    if !prefix.is_empty() {
        assert!(!span.is_empty(), "{} has empty span: {:?}", kind, span);
        let content = &input.as_bytes()[span.start..span.end];
        assert!(
            content.starts_with(prefix.as_bytes()),
            "{} span does not start with {:?}: {:?} at {:?}",
            kind,
            prefix,
            String::from_utf8_lossy(content),
            span
        );
    }

    if let Token::StartTag(tag) = token {
        let content = input[span.start..span.end].to_ascii_lowercase();
        assert!(
            content.contains(&tag.name),
            "StartTag span does not contain tag name '{}': {:?} at {:?}",
            tag.name,
            content,
            span
        );
    }
}

/// Validates basic span invariants.
fn validate_span(span: Span, input: &str, token_type: &str, last_end: &mut Option<usize>) {
    assert!(
        span.start <= span.end,
        "{} span has start > end: {:?}",
        token_type,
        span
    );

    assert!(
        span.end <= input.len(),
        "{} span exceeds input bounds: {:?} (input len: {})",
        token_type,
        span,
        input.len()
    );

    if let Some(prev_end) = *last_end {
        assert!(
            span.start >= prev_end,
            "{} span starts before previous span ended: current {:?}, previous ended at {}",
            token_type,
            span,
            prev_end
        );
    }
    if !span.is_empty() {
        *last_end = Some(span.end);
    }
}
