use crate::entities::{numeric_reference_value, NamedReferenceMatcher};
use crate::machine_helper::MachineState as State;
use crate::utils::{ctostr, whitespace_pat, ControlToken};
use crate::{Error, Reader, Span, Tokenizer};

// Note: This is not implemented as a method on Tokenizer because there's fields on Tokenizer that
// should not be available in this method, such as Tokenizer.eof
#[inline]
pub(crate) fn consume<R: Reader>(slf: &mut Tokenizer<R>) -> ControlToken {
    macro_rules! mutate_character_reference {
        (* $mul:literal + $x:ident - $sub:literal) => {
            match slf
                .machine_helper
                .character_reference_code
                .checked_mul($mul)
                .and_then(|cr| cr.checked_add($x as u32 - $sub))
            {
                Some(cr) => slf.machine_helper.character_reference_code = cr,
                None => {
                    // provoke err
                    slf.machine_helper.character_reference_code = 0x110000;
                }
            };
        };
    }

    macro_rules! switch_to {
        ($state:expr) => {{
            slf.machine_helper.switch_to($state);
            cont!()
        }};
    }

    macro_rules! enter_state {
        ($state:expr, $is_attribute:expr) => {{
            slf.machine_helper.character_reference_start = slf.reader.last_span().start;
            slf.machine_helper.temporary_buffer.clear();
            slf.machine_helper.temporary_buffer.push('&');
            slf.machine_helper.enter_state($state, $is_attribute);
            cont!()
        }};
    }

    macro_rules! exit_state {
        () => {{
            slf.machine_helper.exit_state();
            cont!()
        }};
    }

    macro_rules! reconsume_in {
        ($c:expr, $state:expr) => {{
            let new_state = $state;
            let c = $c;
            slf.reader.retreat(c);
            slf.machine_helper.switch_to(new_state);
            cont!()
        }};
    }

    macro_rules! reconsume_in_return_state {
        ($c:expr) => {{
            let c = $c;
            slf.reader.retreat(c);
            slf.machine_helper.exit_state();
            cont!()
        }};
    }

    macro_rules! cont {
        () => {{
            return ControlToken::Continue;
        }};
    }

    macro_rules! eof {
        () => {{
            return ControlToken::Eof;
        }};
    }

    macro_rules! read_char {
        () => {
            slf.reader.advance(&mut slf.emitter)
        };
    }

    macro_rules! error {
        ($e:expr) => {
            slf.emitter.emit_error($e, slf.reader.last_span().start);
        };
    }

    macro_rules! emit_char {
        ($c:expr) => {
            slf.emitter.emit_char($c, slf.reader.last_span());
        };
    }

    /// Emit text that was consumed as part of something that turned out not to be a tag.
    macro_rules! emit_buffered {
        ($s:expr) => {
            slf.emitter.emit_buffered(
                $s,
                Span::new(slf.emitter.token_start(), slf.reader.position()),
            );
        };
    }

    macro_rules! flush_temporary_buffer {
        () => {{
            let span = Span::new(slf.emitter.token_start(), slf.reader.position());
            slf.machine_helper
                .flush_buffer_characters(&mut slf.emitter, span);
        }};
    }

    macro_rules! flush_code_points_consumed_as_character_reference {
        () => {
            slf.machine_helper
                .flush_code_points_consumed_as_character_reference(
                    &mut slf.emitter,
                    slf.reader.position(),
                );
        };
    }

    macro_rules! mark_token_start {
        () => {
            slf.emitter.set_token_start(slf.reader.last_span().start);
        };
    }

    macro_rules! emit_current_tag {
        () => {
            slf.emitter.emit_current_tag(slf.reader.position());
        };
    }

    macro_rules! emit_current_comment {
        () => {
            slf.emitter.emit_current_comment(slf.reader.position());
        };
    }

    macro_rules! emit_current_doctype {
        () => {
            slf.emitter.emit_current_doctype(slf.reader.position());
        };
    }

    /// Consume a whole run of text free of `$needle` at once and hand it to `$body`, if the reader
    /// supports that. Falls through to the per-character match otherwise.
    macro_rules! text_run {
        ($needle:expr, $run:ident => $body:expr) => {
            if let Some($run) = slf.reader.text_run($needle, &mut slf.emitter) {
                $body;
                cont!()
            }
        };
    }

    macro_rules! emit_text_run {
        ($needle:expr) => {
            let start = slf.reader.position();
            if let Some(run) = slf.reader.text_run($needle, &mut slf.emitter) {
                slf.emitter.emit_str(run, start);
                cont!()
            }
        };
    }

    match slf.machine_helper.state() {
        State::Data => {
            let needle: &[u8] = if slf.decode_html_entities {
                b"<&\0\r"
            } else {
                b"<\0\r"
            };
            emit_text_run!(needle);
            match read_char!() {
                Some('&') if slf.decode_html_entities => {
                    enter_state!(State::CharacterReference, false)
                }
                Some('<') => {
                    mark_token_start!();
                    switch_to!(State::TagOpen)
                }
                Some('\0') => {
                    error!(Error::UnexpectedNullCharacter);
                    emit_char!('\0');
                    cont!()
                }
                Some(x) => {
                    emit_char!(x);
                    cont!()
                }
                None => eof!(),
            }
        }
        State::RcData => {
            let needle: &[u8] = if slf.decode_html_entities {
                b"<&\0\r"
            } else {
                b"<\0\r"
            };
            emit_text_run!(needle);
            match read_char!() {
                Some('&') if slf.decode_html_entities => {
                    enter_state!(State::CharacterReference, false)
                }
                Some('<') => {
                    mark_token_start!();
                    switch_to!(State::RcDataLessThanSign)
                }
                Some('\0') => {
                    error!(Error::UnexpectedNullCharacter);
                    emit_char!('\u{fffd}');
                    cont!()
                }
                Some(x) => {
                    emit_char!(x);
                    cont!()
                }
                None => eof!(),
            }
        }
        State::RawText => {
            emit_text_run!(b"<\0\r");
            match read_char!() {
                Some('<') => {
                    mark_token_start!();
                    switch_to!(State::RawTextLessThanSign)
                }
                Some('\0') => {
                    error!(Error::UnexpectedNullCharacter);
                    emit_char!('\u{fffd}');
                    cont!()
                }
                Some(x) => {
                    emit_char!(x);
                    cont!()
                }
                None => eof!(),
            }
        }
        State::ScriptData => {
            emit_text_run!(b"<\0\r");
            match read_char!() {
                Some('<') => {
                    mark_token_start!();
                    switch_to!(State::ScriptDataLessThanSign)
                }
                Some('\0') => {
                    error!(Error::UnexpectedNullCharacter);
                    emit_char!('\u{fffd}');
                    cont!()
                }
                Some(x) => {
                    emit_char!(x);
                    cont!()
                }
                None => eof!(),
            }
        }
        State::PlainText => {
            emit_text_run!(b"\0\r");
            match read_char!() {
                Some('\0') => {
                    error!(Error::UnexpectedNullCharacter);
                    emit_char!('\u{fffd}');
                    cont!()
                }
                Some(x) => {
                    emit_char!(x);
                    cont!()
                }
                None => eof!(),
            }
        }
        State::TagOpen => match read_char!() {
            Some('!') => switch_to!(State::MarkupDeclarationOpen),
            Some('/') => switch_to!(State::EndTagOpen),
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_start_tag();
                reconsume_in!(Some(x), State::TagName)
            }
            c @ Some('?') => {
                error!(Error::UnexpectedQuestionMarkInsteadOfTagName);
                slf.emitter.init_comment();
                reconsume_in!(c, State::BogusComment)
            }
            None => {
                error!(Error::EofBeforeTagName);
                emit_buffered!("<");
                eof!()
            }
            c @ Some(_) => {
                error!(Error::InvalidFirstCharacterOfTagName);
                emit_buffered!("<");
                reconsume_in!(c, State::Data)
            }
        },
        State::EndTagOpen => match read_char!() {
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_end_tag();
                reconsume_in!(Some(x), State::TagName)
            }
            Some('>') => {
                error!(Error::MissingEndTagName);
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofBeforeTagName);
                emit_buffered!("</");
                eof!()
            }
            Some(x) => {
                error!(Error::InvalidFirstCharacterOfTagName);
                slf.emitter.init_comment();
                reconsume_in!(Some(x), State::BogusComment)
            }
        },
        State::TagName => match read_char!() {
            Some(whitespace_pat!()) => switch_to!(State::BeforeAttributeName),
            Some('/') => switch_to!(State::SelfClosingStartTag),
            Some('>') => {
                emit_current_tag!();
                switch_to!(State::Data)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_tag_name("\u{fffd}");
                cont!()
            }
            Some(x) => {
                slf.emitter.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                cont!()
            }
            None => {
                error!(Error::EofInTag);
                eof!()
            }
        },
        State::RcDataLessThanSign => match read_char!() {
            Some('/') => {
                slf.machine_helper.temporary_buffer.clear();
                switch_to!(State::RcDataEndTagOpen)
            }
            c => {
                emit_buffered!("<");
                reconsume_in!(c, State::RcData)
            }
        },
        State::RcDataEndTagOpen => match read_char!() {
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_end_tag();
                reconsume_in!(Some(x), State::RcDataEndTagName)
            }
            c => {
                emit_buffered!("</");
                reconsume_in!(c, State::RcData)
            }
        },
        State::RcDataEndTagName => match read_char!() {
            Some(whitespace_pat!()) if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(State::BeforeAttributeName)
            }
            Some('/') if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(State::SelfClosingStartTag)
            }
            Some('>') if slf.emitter.current_is_appropriate_end_tag_token() => {
                emit_current_tag!();
                switch_to!(State::Data)
            }
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                slf.machine_helper.temporary_buffer.push(x);
                cont!()
            }
            c => {
                slf.machine_helper.temporary_buffer.insert_str(0, "</");
                slf.reader.retreat(c);
                flush_temporary_buffer!();
                switch_to!(State::RcData)
            }
        },
        State::RawTextLessThanSign => match read_char!() {
            Some('/') => {
                slf.machine_helper.temporary_buffer.clear();
                switch_to!(State::RawTextEndTagOpen)
            }
            c => {
                emit_buffered!("<");
                reconsume_in!(c, State::RawText)
            }
        },
        State::RawTextEndTagOpen => match read_char!() {
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_end_tag();
                reconsume_in!(Some(x), State::RawTextEndTagName)
            }
            c => {
                emit_buffered!("</");
                reconsume_in!(c, State::RawText)
            }
        },
        State::RawTextEndTagName => match read_char!() {
            Some(whitespace_pat!()) if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(State::BeforeAttributeName)
            }
            Some('/') if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(State::SelfClosingStartTag)
            }
            Some('>') if slf.emitter.current_is_appropriate_end_tag_token() => {
                emit_current_tag!();
                switch_to!(State::Data)
            }
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                slf.machine_helper.temporary_buffer.push(x);
                cont!()
            }
            c => {
                slf.machine_helper.temporary_buffer.insert_str(0, "</");
                slf.reader.retreat(c);
                flush_temporary_buffer!();
                switch_to!(State::RawText)
            }
        },
        State::ScriptDataLessThanSign => match read_char!() {
            Some('/') => {
                slf.machine_helper.temporary_buffer.clear();
                switch_to!(State::ScriptDataEndTagOpen)
            }
            Some('!') => {
                emit_buffered!("<!");
                switch_to!(State::ScriptDataEscapeStart)
            }
            c => {
                emit_buffered!("<");
                reconsume_in!(c, State::ScriptData)
            }
        },
        State::ScriptDataEndTagOpen => match read_char!() {
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_end_tag();
                reconsume_in!(Some(x), State::ScriptDataEndTagName)
            }
            c => {
                emit_buffered!("</");
                reconsume_in!(c, State::ScriptData)
            }
        },
        State::ScriptDataEndTagName => match read_char!() {
            Some(whitespace_pat!()) if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(State::BeforeAttributeName)
            }
            Some('/') if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(State::SelfClosingStartTag)
            }
            Some('>') if slf.emitter.current_is_appropriate_end_tag_token() => {
                emit_current_tag!();
                switch_to!(State::Data)
            }
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                slf.machine_helper.temporary_buffer.push(x);
                cont!()
            }
            c => {
                slf.machine_helper.temporary_buffer.insert_str(0, "</");
                slf.reader.retreat(c);
                flush_temporary_buffer!();
                switch_to!(State::ScriptData)
            }
        },
        State::ScriptDataEscapeStart => match read_char!() {
            Some('-') => {
                emit_char!('-');
                switch_to!(State::ScriptDataEscapeStartDash)
            }
            c => reconsume_in!(c, State::ScriptData),
        },
        State::ScriptDataEscapeStartDash => match read_char!() {
            Some('-') => {
                emit_char!('-');
                switch_to!(State::ScriptDataEscapedDashDash)
            }
            c => reconsume_in!(c, State::ScriptData),
        },
        State::ScriptDataEscaped => match read_char!() {
            Some('-') => {
                emit_char!('-');
                switch_to!(State::ScriptDataEscapedDash)
            }
            Some('<') => {
                mark_token_start!();
                switch_to!(State::ScriptDataEscapedLessThanSign)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                emit_char!('\u{fffd}');
                cont!()
            }
            Some(x) => {
                emit_char!(x);
                cont!()
            }
            None => {
                error!(Error::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },
        State::ScriptDataEscapedDash => match read_char!() {
            Some('-') => {
                emit_char!('-');
                switch_to!(State::ScriptDataEscapedDashDash)
            }
            Some('<') => {
                mark_token_start!();
                switch_to!(State::ScriptDataEscapedLessThanSign)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                emit_char!('\u{fffd}');
                switch_to!(State::ScriptDataEscaped)
            }
            Some(x) => {
                emit_char!(x);
                switch_to!(State::ScriptDataEscaped)
            }
            None => {
                error!(Error::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },
        State::ScriptDataEscapedDashDash => match read_char!() {
            Some('-') => {
                emit_char!('-');
                cont!()
            }
            Some('<') => {
                mark_token_start!();
                switch_to!(State::ScriptDataEscapedLessThanSign)
            }
            Some('>') => {
                emit_char!('>');
                switch_to!(State::ScriptData)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                emit_char!('\u{fffd}');
                switch_to!(State::ScriptDataEscaped)
            }
            Some(x) => {
                emit_char!(x);
                switch_to!(State::ScriptDataEscaped)
            }
            None => {
                error!(Error::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },
        State::ScriptDataEscapedLessThanSign => match read_char!() {
            Some('/') => {
                slf.machine_helper.temporary_buffer.clear();
                switch_to!(State::ScriptDataEscapedEndTagOpen)
            }
            Some(x) if x.is_ascii_alphabetic() => {
                slf.machine_helper.temporary_buffer.clear();
                emit_buffered!("<");
                reconsume_in!(Some(x), State::ScriptDataDoubleEscapeStart)
            }
            c => {
                emit_buffered!("<");
                reconsume_in!(c, State::ScriptDataEscaped)
            }
        },
        State::ScriptDataEscapedEndTagOpen => match read_char!() {
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.init_end_tag();
                reconsume_in!(Some(x), State::ScriptDataEscapedEndTagName)
            }
            c => {
                emit_buffered!("</");
                reconsume_in!(c, State::ScriptDataEscaped)
            }
        },
        State::ScriptDataEscapedEndTagName => match read_char!() {
            Some(whitespace_pat!()) if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(State::BeforeAttributeName)
            }
            Some('/') if slf.emitter.current_is_appropriate_end_tag_token() => {
                switch_to!(State::SelfClosingStartTag)
            }
            Some('>') if slf.emitter.current_is_appropriate_end_tag_token() => {
                emit_current_tag!();
                switch_to!(State::Data)
            }
            Some(x) if x.is_ascii_alphabetic() => {
                slf.emitter.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                slf.machine_helper.temporary_buffer.push(x);
                cont!()
            }
            c => {
                slf.machine_helper.temporary_buffer.insert_str(0, "</");
                slf.reader.retreat(c);
                flush_temporary_buffer!();
                switch_to!(State::ScriptDataEscaped)
            }
        },
        State::ScriptDataDoubleEscapeStart => match read_char!() {
            Some(x @ (whitespace_pat!() | '/' | '>')) => {
                emit_char!(x);
                if slf.machine_helper.temporary_buffer == "script" {
                    switch_to!(State::ScriptDataDoubleEscaped)
                } else {
                    switch_to!(State::ScriptDataEscaped)
                }
            }
            Some(x) if x.is_ascii_alphabetic() => {
                slf.machine_helper
                    .temporary_buffer
                    .push(x.to_ascii_lowercase());
                emit_char!(x);
                cont!()
            }
            c => reconsume_in!(c, State::ScriptDataEscaped),
        },
        State::ScriptDataDoubleEscaped => match read_char!() {
            Some('-') => {
                emit_char!('-');
                switch_to!(State::ScriptDataDoubleEscapedDash)
            }
            Some('<') => {
                emit_char!('<');
                switch_to!(State::ScriptDataDoubleEscapedLessThanSign)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                emit_char!('\u{fffd}');
                cont!()
            }
            Some(x) => {
                emit_char!(x);
                cont!()
            }
            None => {
                error!(Error::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },
        State::ScriptDataDoubleEscapedDash => match read_char!() {
            Some('-') => {
                emit_char!('-');
                switch_to!(State::ScriptDataDoubleEscapedDashDash)
            }
            Some('<') => {
                emit_char!('<');
                switch_to!(State::ScriptDataDoubleEscapedLessThanSign)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                emit_char!('\u{fffd}');
                switch_to!(State::ScriptDataDoubleEscaped)
            }
            Some(x) => {
                emit_char!(x);
                switch_to!(State::ScriptDataDoubleEscaped)
            }
            None => {
                error!(Error::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },
        State::ScriptDataDoubleEscapedDashDash => match read_char!() {
            Some('-') => {
                emit_char!('-');
                cont!()
            }
            Some('<') => {
                emit_char!('<');
                switch_to!(State::ScriptDataDoubleEscapedLessThanSign)
            }
            Some('>') => {
                emit_char!('>');
                switch_to!(State::ScriptData)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                emit_char!('\u{fffd}');
                switch_to!(State::ScriptDataDoubleEscaped)
            }
            Some(x) => {
                emit_char!(x);
                switch_to!(State::ScriptDataDoubleEscaped)
            }
            None => {
                error!(Error::EofInScriptHtmlCommentLikeText);
                eof!()
            }
        },
        State::ScriptDataDoubleEscapedLessThanSign => match read_char!() {
            Some('/') => {
                slf.machine_helper.temporary_buffer.clear();
                emit_char!('/');
                switch_to!(State::ScriptDataDoubleEscapeEnd)
            }
            c => reconsume_in!(c, State::ScriptDataDoubleEscaped),
        },
        State::ScriptDataDoubleEscapeEnd => match read_char!() {
            Some(x @ (whitespace_pat!() | '/' | '>')) => {
                emit_char!(x);
                if slf.machine_helper.temporary_buffer == "script" {
                    switch_to!(State::ScriptDataEscaped)
                } else {
                    switch_to!(State::ScriptDataDoubleEscaped)
                }
            }
            Some(x) if x.is_ascii_alphabetic() => {
                slf.machine_helper
                    .temporary_buffer
                    .push(x.to_ascii_lowercase());
                emit_char!(x);
                cont!()
            }
            c => reconsume_in!(c, State::ScriptDataDoubleEscaped),
        },
        State::BeforeAttributeName => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            c @ (Some('/' | '>') | None) => reconsume_in!(c, State::AfterAttributeName),
            Some('=') => {
                error!(Error::UnexpectedEqualsSignBeforeAttributeName);
                slf.emitter.init_attribute(slf.reader.last_span().start);
                slf.emitter.push_attribute_name("=");
                switch_to!(State::AttributeName)
            }
            Some(x) => {
                slf.emitter.init_attribute(slf.reader.last_span().start);
                reconsume_in!(Some(x), State::AttributeName)
            }
        },
        State::AttributeName => match read_char!() {
            c @ (Some(whitespace_pat!() | '/' | '>') | None) => {
                reconsume_in!(c, State::AfterAttributeName)
            }
            Some('=') => switch_to!(State::BeforeAttributeValue),
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_attribute_name("\u{fffd}");
                cont!()
            }
            Some(x @ ('"' | '\'' | '<')) => {
                error!(Error::UnexpectedCharacterInAttributeName);
                slf.emitter.push_attribute_name(ctostr!(x));
                cont!()
            }
            Some(x) => {
                slf.emitter
                    .push_attribute_name(ctostr!(x.to_ascii_lowercase()));
                cont!()
            }
        },
        State::AfterAttributeName => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            Some('/') => switch_to!(State::SelfClosingStartTag),
            Some('=') => switch_to!(State::BeforeAttributeValue),
            Some('>') => {
                emit_current_tag!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInTag);
                eof!()
            }
            Some(x) => {
                slf.emitter.init_attribute(slf.reader.last_span().start);
                reconsume_in!(Some(x), State::AttributeName)
            }
        },
        State::BeforeAttributeValue => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            Some('"') => switch_to!(State::AttributeValueDoubleQuoted),
            Some('\'') => switch_to!(State::AttributeValueSingleQuoted),
            Some('>') => {
                error!(Error::MissingAttributeValue);
                emit_current_tag!();
                switch_to!(State::Data)
            }
            c => reconsume_in!(c, State::AttributeValueUnquoted),
        },
        State::AttributeValueDoubleQuoted => {
            let needle: &[u8] = if slf.decode_html_entities {
                b"\"&\0\r"
            } else {
                b"\"\0\r"
            };
            text_run!(needle, run => slf.emitter.push_attribute_value(run));
            match read_char!() {
                Some('"') => switch_to!(State::AfterAttributeValueQuoted),
                Some('&') if slf.decode_html_entities => {
                    enter_state!(State::CharacterReference, true)
                }
                Some('\0') => {
                    error!(Error::UnexpectedNullCharacter);
                    slf.emitter.push_attribute_value("\u{fffd}");
                    cont!()
                }
                Some(x) => {
                    slf.emitter.push_attribute_value(ctostr!(x));
                    cont!()
                }
                None => {
                    error!(Error::EofInTag);
                    eof!()
                }
            }
        }
        State::AttributeValueSingleQuoted => {
            let needle: &[u8] = if slf.decode_html_entities {
                b"'&\0\r"
            } else {
                b"'\0\r"
            };
            text_run!(needle, run => slf.emitter.push_attribute_value(run));
            match read_char!() {
                Some('\'') => switch_to!(State::AfterAttributeValueQuoted),
                Some('&') if slf.decode_html_entities => {
                    enter_state!(State::CharacterReference, true)
                }
                Some('\0') => {
                    error!(Error::UnexpectedNullCharacter);
                    slf.emitter.push_attribute_value("\u{fffd}");
                    cont!()
                }
                Some(x) => {
                    slf.emitter.push_attribute_value(ctostr!(x));
                    cont!()
                }
                None => {
                    error!(Error::EofInTag);
                    eof!()
                }
            }
        }
        State::AttributeValueUnquoted => match read_char!() {
            Some(whitespace_pat!()) => switch_to!(State::BeforeAttributeName),
            Some('&') if slf.decode_html_entities => {
                enter_state!(State::CharacterReference, true)
            }
            Some('>') => {
                emit_current_tag!();
                switch_to!(State::Data)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_attribute_value("\u{fffd}");
                cont!()
            }
            Some(x @ ('"' | '\'' | '<' | '=' | '\u{60}')) => {
                error!(Error::UnexpectedCharacterInUnquotedAttributeValue);
                slf.emitter.push_attribute_value(ctostr!(x));
                cont!()
            }
            Some(x) => {
                slf.emitter.push_attribute_value(ctostr!(x));
                cont!()
            }
            None => {
                error!(Error::EofInTag);
                eof!()
            }
        },
        State::AfterAttributeValueQuoted => match read_char!() {
            Some(whitespace_pat!()) => switch_to!(State::BeforeAttributeName),
            Some('/') => switch_to!(State::SelfClosingStartTag),
            Some('>') => {
                emit_current_tag!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInTag);
                eof!()
            }
            c @ Some(_) => {
                error!(Error::MissingWhitespaceBetweenAttributes);
                reconsume_in!(c, State::BeforeAttributeName)
            }
        },
        State::SelfClosingStartTag => match read_char!() {
            Some('>') => {
                slf.emitter.set_self_closing();
                emit_current_tag!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInTag);
                eof!()
            }
            c @ Some(_) => {
                error!(Error::UnexpectedSolidusInTag);
                reconsume_in!(c, State::BeforeAttributeName)
            }
        },
        State::BogusComment => match read_char!() {
            Some('>') => {
                emit_current_comment!();
                switch_to!(State::Data)
            }
            None => {
                emit_current_comment!();
                eof!()
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_comment("\u{fffd}");
                cont!()
            }
            Some(x) => {
                slf.emitter.push_comment(ctostr!(x));
                cont!()
            }
        },
        State::MarkupDeclarationOpen => {
            if slf.reader.try_read_string("--", true) {
                slf.emitter.init_comment();
                switch_to!(State::CommentStart)
            } else if slf.reader.try_read_string("DOCTYPE", false) {
                switch_to!(State::Doctype)
            } else if slf.reader.try_read_string("[CDATA[", true) {
                if slf.allow_cdata {
                    switch_to!(State::CdataSection)
                } else {
                    error!(Error::CdataInHtmlContent);
                    slf.emitter.init_comment();
                    slf.emitter.push_comment("[CDATA[");
                    switch_to!(State::BogusComment)
                }
            } else {
                slf.emitter
                    .emit_error(Error::IncorrectlyOpenedComment, slf.reader.position());
                slf.emitter.init_comment();
                switch_to!(State::BogusComment)
            }
        }
        State::CommentStart => match read_char!() {
            Some('-') => switch_to!(State::CommentStartDash),
            Some('>') => {
                error!(Error::AbruptClosingOfEmptyComment);
                emit_current_comment!();
                switch_to!(State::Data)
            }
            c => reconsume_in!(c, State::Comment),
        },
        State::CommentStartDash => match read_char!() {
            Some('-') => switch_to!(State::CommentEnd),
            Some('>') => {
                error!(Error::AbruptClosingOfEmptyComment);
                emit_current_comment!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInComment);
                emit_current_comment!();
                eof!()
            }
            c @ Some(_) => {
                slf.emitter.push_comment("-");
                reconsume_in!(c, State::Comment)
            }
        },
        State::Comment => {
            text_run!(b"<-\0\r", run => slf.emitter.push_comment(run));
            match read_char!() {
                Some('<') => {
                    slf.emitter.push_comment("<");
                    switch_to!(State::CommentLessThanSign)
                }
                Some('-') => switch_to!(State::CommentEndDash),
                Some('\0') => {
                    error!(Error::UnexpectedNullCharacter);
                    slf.emitter.push_comment("\u{fffd}");
                    cont!()
                }
                Some(x) => {
                    slf.emitter.push_comment(ctostr!(x));
                    cont!()
                }
                None => {
                    error!(Error::EofInComment);
                    emit_current_comment!();
                    eof!()
                }
            }
        }
        State::CommentLessThanSign => match read_char!() {
            Some('!') => {
                slf.emitter.push_comment("!");
                switch_to!(State::CommentLessThanSignBang)
            }
            Some('<') => {
                slf.emitter.push_comment("<");
                cont!()
            }
            c => reconsume_in!(c, State::Comment),
        },
        State::CommentLessThanSignBang => match read_char!() {
            Some('-') => switch_to!(State::CommentLessThanSignBangDash),
            c => reconsume_in!(c, State::Comment),
        },
        State::CommentLessThanSignBangDash => match read_char!() {
            Some('-') => switch_to!(State::CommentLessThanSignBangDashDash),
            c => reconsume_in!(c, State::CommentEndDash),
        },
        State::CommentLessThanSignBangDashDash => match read_char!() {
            c @ (Some('>') | None) => reconsume_in!(c, State::CommentEnd),
            c => {
                error!(Error::NestedComment);
                reconsume_in!(c, State::CommentEnd)
            }
        },
        State::CommentEndDash => match read_char!() {
            Some('-') => switch_to!(State::CommentEnd),
            None => {
                error!(Error::EofInComment);
                emit_current_comment!();
                eof!()
            }
            c => {
                slf.emitter.push_comment("-");
                reconsume_in!(c, State::Comment)
            }
        },
        State::CommentEnd => match read_char!() {
            Some('>') => {
                emit_current_comment!();
                switch_to!(State::Data)
            }
            Some('!') => switch_to!(State::CommentEndBang),
            Some('-') => {
                slf.emitter.push_comment("-");
                cont!()
            }
            None => {
                error!(Error::EofInComment);
                emit_current_comment!();
                eof!()
            }
            c @ Some(_) => {
                slf.emitter.push_comment("--");
                reconsume_in!(c, State::Comment)
            }
        },
        State::CommentEndBang => match read_char!() {
            Some('-') => {
                slf.emitter.push_comment("--!");
                switch_to!(State::CommentEndDash)
            }
            Some('>') => {
                error!(Error::IncorrectlyClosedComment);
                emit_current_comment!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInComment);
                emit_current_comment!();
                eof!()
            }
            c @ Some(_) => {
                slf.emitter.push_comment("--!");
                reconsume_in!(c, State::Comment)
            }
        },
        State::Doctype => match read_char!() {
            Some(whitespace_pat!()) => switch_to!(State::BeforeDoctypeName),
            c @ Some('>') => reconsume_in!(c, State::BeforeDoctypeName),
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.init_doctype();
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                error!(Error::MissingWhitespaceBeforeDoctypeName);
                reconsume_in!(c, State::BeforeDoctypeName)
            }
        },
        State::BeforeDoctypeName => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.init_doctype();
                slf.emitter.push_doctype_name("\u{fffd}");
                switch_to!(State::DoctypeName)
            }
            Some('>') => {
                error!(Error::MissingDoctypeName);
                slf.emitter.init_doctype();
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.init_doctype();
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            Some(x) => {
                slf.emitter.init_doctype();
                slf.emitter
                    .push_doctype_name(ctostr!(x.to_ascii_lowercase()));
                switch_to!(State::DoctypeName)
            }
        },
        State::DoctypeName => match read_char!() {
            Some(whitespace_pat!()) => switch_to!(State::AfterDoctypeName),
            Some('>') => {
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_doctype_name("\u{fffd}");
                cont!()
            }
            Some(x) => {
                slf.emitter
                    .push_doctype_name(ctostr!(x.to_ascii_lowercase()));
                cont!()
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
        },
        State::AfterDoctypeName => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            Some('>') => {
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                slf.reader.retreat(c);
                if slf.reader.try_read_string("PUBLIC", false) {
                    switch_to!(State::AfterDoctypePublicKeyword)
                } else if slf.reader.try_read_string("SYSTEM", false) {
                    switch_to!(State::AfterDoctypeSystemKeyword)
                } else {
                    error!(Error::InvalidCharacterSequenceAfterDoctypeName);
                    slf.emitter.set_force_quirks();
                    switch_to!(State::BogusDoctype)
                }
            }
        },
        State::AfterDoctypePublicKeyword => match read_char!() {
            Some(whitespace_pat!()) => switch_to!(State::BeforeDoctypePublicIdentifier),
            Some('"') => {
                error!(Error::MissingWhitespaceAfterDoctypePublicKeyword);
                slf.emitter.set_doctype_public_identifier();
                switch_to!(State::DoctypePublicIdentifierDoubleQuoted)
            }
            Some('\'') => {
                error!(Error::MissingWhitespaceAfterDoctypePublicKeyword);
                slf.emitter.set_doctype_public_identifier();
                switch_to!(State::DoctypePublicIdentifierSingleQuoted)
            }
            Some('>') => {
                error!(Error::MissingDoctypePublicIdentifier);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                error!(Error::MissingQuoteBeforeDoctypePublicIdentifier);
                slf.emitter.set_force_quirks();
                reconsume_in!(c, State::BogusDoctype)
            }
        },
        State::BeforeDoctypePublicIdentifier => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            Some('"') => {
                slf.emitter.set_doctype_public_identifier();
                switch_to!(State::DoctypePublicIdentifierDoubleQuoted)
            }
            Some('\'') => {
                slf.emitter.set_doctype_public_identifier();
                switch_to!(State::DoctypePublicIdentifierSingleQuoted)
            }
            Some('>') => {
                error!(Error::MissingDoctypePublicIdentifier);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                error!(Error::MissingQuoteBeforeDoctypePublicIdentifier);
                slf.emitter.set_force_quirks();
                reconsume_in!(c, State::BogusDoctype)
            }
        },
        State::DoctypePublicIdentifierDoubleQuoted => match read_char!() {
            Some('"') => switch_to!(State::AfterDoctypePublicIdentifier),
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_doctype_public_identifier("\u{fffd}");
                cont!()
            }
            Some('>') => {
                error!(Error::AbruptDoctypePublicIdentifier);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            Some(x) => {
                slf.emitter.push_doctype_public_identifier(ctostr!(x));
                cont!()
            }
        },
        State::DoctypePublicIdentifierSingleQuoted => match read_char!() {
            Some('\'') => switch_to!(State::AfterDoctypePublicIdentifier),
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_doctype_public_identifier("\u{fffd}");
                cont!()
            }
            Some('>') => {
                error!(Error::AbruptDoctypePublicIdentifier);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            Some(x) => {
                slf.emitter.push_doctype_public_identifier(ctostr!(x));
                cont!()
            }
        },
        State::AfterDoctypePublicIdentifier => match read_char!() {
            Some(whitespace_pat!()) => {
                switch_to!(State::BetweenDoctypePublicAndSystemIdentifiers)
            }
            Some('>') => {
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            Some('"') => {
                error!(Error::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers);
                slf.emitter.set_doctype_system_identifier();
                switch_to!(State::DoctypeSystemIdentifierDoubleQuoted)
            }
            Some('\'') => {
                error!(Error::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers);
                slf.emitter.set_doctype_system_identifier();
                switch_to!(State::DoctypeSystemIdentifierSingleQuoted)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                error!(Error::MissingQuoteBeforeDoctypeSystemIdentifier);
                slf.emitter.set_force_quirks();
                reconsume_in!(c, State::BogusDoctype)
            }
        },
        State::BetweenDoctypePublicAndSystemIdentifiers => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            Some('>') => {
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            Some('"') => {
                slf.emitter.set_doctype_system_identifier();
                switch_to!(State::DoctypeSystemIdentifierDoubleQuoted)
            }
            Some('\'') => {
                slf.emitter.set_doctype_system_identifier();
                switch_to!(State::DoctypeSystemIdentifierSingleQuoted)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                error!(Error::MissingQuoteBeforeDoctypeSystemIdentifier);
                slf.emitter.set_force_quirks();
                reconsume_in!(c, State::BogusDoctype)
            }
        },
        State::AfterDoctypeSystemKeyword => match read_char!() {
            Some(whitespace_pat!()) => switch_to!(State::BeforeDoctypeSystemIdentifier),
            Some('"') => {
                error!(Error::MissingWhitespaceAfterDoctypeSystemKeyword);
                slf.emitter.set_doctype_system_identifier();
                switch_to!(State::DoctypeSystemIdentifierDoubleQuoted)
            }
            Some('\'') => {
                error!(Error::MissingWhitespaceAfterDoctypeSystemKeyword);
                slf.emitter.set_doctype_system_identifier();
                switch_to!(State::DoctypeSystemIdentifierSingleQuoted)
            }
            Some('>') => {
                error!(Error::MissingDoctypeSystemIdentifier);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                error!(Error::MissingQuoteBeforeDoctypeSystemIdentifier);
                slf.emitter.set_force_quirks();
                reconsume_in!(c, State::BogusDoctype)
            }
        },
        State::BeforeDoctypeSystemIdentifier => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            Some('"') => {
                slf.emitter.set_doctype_system_identifier();
                switch_to!(State::DoctypeSystemIdentifierDoubleQuoted)
            }
            Some('\'') => {
                slf.emitter.set_doctype_system_identifier();
                switch_to!(State::DoctypeSystemIdentifierSingleQuoted)
            }
            Some('>') => {
                error!(Error::MissingDoctypeSystemIdentifier);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                error!(Error::MissingQuoteBeforeDoctypeSystemIdentifier);
                slf.emitter.set_force_quirks();
                reconsume_in!(c, State::BogusDoctype)
            }
        },
        State::DoctypeSystemIdentifierDoubleQuoted => match read_char!() {
            Some('"') => switch_to!(State::AfterDoctypeSystemIdentifier),
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_doctype_system_identifier("\u{fffd}");
                cont!()
            }
            Some('>') => {
                error!(Error::AbruptDoctypeSystemIdentifier);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            Some(x) => {
                slf.emitter.push_doctype_system_identifier(ctostr!(x));
                cont!()
            }
        },
        State::DoctypeSystemIdentifierSingleQuoted => match read_char!() {
            Some('\'') => switch_to!(State::AfterDoctypeSystemIdentifier),
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                slf.emitter.push_doctype_system_identifier("\u{fffd}");
                cont!()
            }
            Some('>') => {
                error!(Error::AbruptDoctypeSystemIdentifier);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            Some(x) => {
                slf.emitter.push_doctype_system_identifier(ctostr!(x));
                cont!()
            }
        },
        State::AfterDoctypeSystemIdentifier => match read_char!() {
            Some(whitespace_pat!()) => cont!(),
            Some('>') => {
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            None => {
                error!(Error::EofInDoctype);
                slf.emitter.set_force_quirks();
                emit_current_doctype!();
                eof!()
            }
            c @ Some(_) => {
                error!(Error::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                reconsume_in!(c, State::BogusDoctype)
            }
        },
        State::BogusDoctype => match read_char!() {
            Some('>') => {
                emit_current_doctype!();
                switch_to!(State::Data)
            }
            Some('\0') => {
                error!(Error::UnexpectedNullCharacter);
                cont!()
            }
            None => {
                emit_current_doctype!();
                eof!()
            }
            Some(_) => cont!(),
        },
        State::CdataSection => {
            emit_text_run!(b"]\r");
            match read_char!() {
                Some(']') => switch_to!(State::CdataSectionBracket),
                Some(x) => {
                    emit_char!(x);
                    cont!()
                }
                None => {
                    error!(Error::EofInCdata);
                    eof!()
                }
            }
        }
        State::CdataSectionBracket => match read_char!() {
            Some(']') => switch_to!(State::CdataSectionEnd),
            c => {
                slf.emitter.emit_buffered("]", slf.reader.last_span());
                reconsume_in!(c, State::CdataSection)
            }
        },
        State::CdataSectionEnd => match read_char!() {
            Some(']') => {
                emit_char!(']');
                cont!()
            }
            Some('>') => switch_to!(State::Data),
            c => {
                slf.emitter.emit_buffered("]]", slf.reader.last_span());
                reconsume_in!(c, State::CdataSection)
            }
        },
        State::CharacterReference => match read_char!() {
            Some(x) if x.is_ascii_alphanumeric() => {
                reconsume_in!(Some(x), State::NamedCharacterReference)
            }
            Some('#') => {
                slf.machine_helper.temporary_buffer.push('#');
                switch_to!(State::NumericCharacterReference)
            }
            c => {
                slf.reader.retreat(c);
                flush_code_points_consumed_as_character_reference!();
                slf.machine_helper.exit_state();
                cont!()
            }
        },
        State::NamedCharacterReference => {
            let start = slf.reader.position();
            let mut matcher = NamedReferenceMatcher::default();
            loop {
                match read_char!() {
                    Some(x) if matcher.push(x) => (),
                    _ => break,
                }
            }

            match matcher.longest_match() {
                Some((name, first, second)) => {
                    slf.reader.rewind_to(start + name.len());
                    let ends_with_semicolon = name.ends_with(';');
                    let next = read_char!();
                    slf.reader.retreat(next);

                    if slf.machine_helper.is_consumed_as_part_of_an_attribute()
                        && !ends_with_semicolon
                        && matches!(next, Some(x) if x == '=' || x.is_ascii_alphanumeric())
                    {
                        // legacy: `&amp=` and `&ampx` inside attribute values stay as they are
                        slf.machine_helper.temporary_buffer.push_str(name);
                    } else {
                        if !ends_with_semicolon {
                            slf.emitter.emit_error(
                                Error::MissingSemicolonAfterCharacterReference,
                                slf.reader.position(),
                            );
                        }
                        slf.machine_helper.temporary_buffer.clear();
                        slf.machine_helper.temporary_buffer.push(first);
                        slf.machine_helper.temporary_buffer.extend(second);
                    }
                    flush_code_points_consumed_as_character_reference!();
                    exit_state!()
                }
                None => {
                    slf.reader.rewind_to(start);
                    flush_code_points_consumed_as_character_reference!();
                    switch_to!(State::AmbiguousAmpersand)
                }
            }
        }
        State::AmbiguousAmpersand => match read_char!() {
            Some(x) if x.is_ascii_alphanumeric() => {
                if slf.machine_helper.is_consumed_as_part_of_an_attribute() {
                    slf.emitter.push_attribute_value(ctostr!(x));
                } else {
                    emit_char!(x);
                }
                cont!()
            }
            c @ Some(';') => {
                error!(Error::UnknownNamedCharacterReference);
                reconsume_in_return_state!(c)
            }
            c => reconsume_in_return_state!(c),
        },
        State::NumericCharacterReference => {
            slf.machine_helper.character_reference_code = 0;
            match read_char!() {
                Some(x @ ('x' | 'X')) => {
                    slf.machine_helper.temporary_buffer.push(x);
                    switch_to!(State::HexadecimalCharacterReferenceStart)
                }
                c => reconsume_in!(c, State::DecimalCharacterReferenceStart),
            }
        }
        State::HexadecimalCharacterReferenceStart => match read_char!() {
            c @ Some(x) if x.is_ascii_hexdigit() => {
                reconsume_in!(c, State::HexadecimalCharacterReference)
            }
            c => {
                error!(Error::AbsenceOfDigitsInNumericCharacterReference);
                slf.reader.retreat(c);
                flush_code_points_consumed_as_character_reference!();
                slf.machine_helper.exit_state();
                cont!()
            }
        },
        State::DecimalCharacterReferenceStart => match read_char!() {
            Some(x @ '0'..='9') => reconsume_in!(Some(x), State::DecimalCharacterReference),
            c => {
                error!(Error::AbsenceOfDigitsInNumericCharacterReference);
                slf.reader.retreat(c);
                flush_code_points_consumed_as_character_reference!();
                slf.machine_helper.exit_state();
                cont!()
            }
        },
        State::HexadecimalCharacterReference => match read_char!() {
            Some(x @ '0'..='9') => {
                mutate_character_reference!(*16 + x - 0x0030);
                cont!()
            }
            Some(x @ 'A'..='F') => {
                mutate_character_reference!(*16 + x - 0x0037);
                cont!()
            }
            Some(x @ 'a'..='f') => {
                mutate_character_reference!(*16 + x - 0x0057);
                cont!()
            }
            Some(';') => switch_to!(State::NumericCharacterReferenceEnd),
            c => {
                error!(Error::MissingSemicolonAfterCharacterReference);
                reconsume_in!(c, State::NumericCharacterReferenceEnd)
            }
        },
        State::DecimalCharacterReference => match read_char!() {
            Some(x @ '0'..='9') => {
                mutate_character_reference!(*10 + x - 0x0030);
                cont!()
            }
            Some(';') => switch_to!(State::NumericCharacterReferenceEnd),
            c => {
                error!(Error::MissingSemicolonAfterCharacterReference);
                reconsume_in!(c, State::NumericCharacterReferenceEnd)
            }
        },
        State::NumericCharacterReferenceEnd => {
            let (c, error) =
                numeric_reference_value(slf.machine_helper.character_reference_code);
            if let Some(e) = error {
                slf.emitter.emit_error(e, slf.reader.position());
            }
            slf.machine_helper.temporary_buffer.clear();
            slf.machine_helper.temporary_buffer.push(c);
            flush_code_points_consumed_as_character_reference!();
            exit_state!()
        }
    }
}
