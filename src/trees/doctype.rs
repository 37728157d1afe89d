//! Deciding the quirks mode from the doctype.
use crate::token::Doctype;
use crate::utils::starts_with_ignore_ascii_case;
use crate::QuirksMode;

const QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "+//Silmaril//dtd html Pro v0r11 19970101//",
    "-//AS//DTD HTML 3.0 asWedit + extensions//",
    "-//AdvaSoft Ltd//DTD HTML 3.0 asWedit + extensions//",
    "-//IETF//DTD HTML 2.0 Level 1//",
    "-//IETF//DTD HTML 2.0 Level 2//",
    "-//IETF//DTD HTML 2.0 Strict Level 1//",
    "-//IETF//DTD HTML 2.0 Strict Level 2//",
    "-//IETF//DTD HTML 2.0 Strict//",
    "-//IETF//DTD HTML 2.0//",
    "-//IETF//DTD HTML 2.1E//",
    "-//IETF//DTD HTML 3.0//",
    "-//IETF//DTD HTML 3.2 Final//",
    "-//IETF//DTD HTML 3.2//",
    "-//IETF//DTD HTML 3//",
    "-//IETF//DTD HTML Level 0//",
    "-//IETF//DTD HTML Level 1//",
    "-//IETF//DTD HTML Level 2//",
    "-//IETF//DTD HTML Level 3//",
    "-//IETF//DTD HTML Strict Level 0//",
    "-//IETF//DTD HTML Strict Level 1//",
    "-//IETF//DTD HTML Strict Level 2//",
    "-//IETF//DTD HTML Strict Level 3//",
    "-//IETF//DTD HTML Strict//",
    "-//IETF//DTD HTML//",
    "-//Metrius//DTD Metrius Presentational//",
    "-//Microsoft//DTD Internet Explorer 2.0 HTML Strict//",
    "-//Microsoft//DTD Internet Explorer 2.0 HTML//",
    "-//Microsoft//DTD Internet Explorer 2.0 Tables//",
    "-//Microsoft//DTD Internet Explorer 3.0 HTML Strict//",
    "-//Microsoft//DTD Internet Explorer 3.0 HTML//",
    "-//Microsoft//DTD Internet Explorer 3.0 Tables//",
    "-//Netscape Comm. Corp.//DTD HTML//",
    "-//Netscape Comm. Corp.//DTD Strict HTML//",
    "-//O'Reilly and Associates//DTD HTML 2.0//",
    "-//O'Reilly and Associates//DTD HTML Extended 1.0//",
    "-//O'Reilly and Associates//DTD HTML Extended Relaxed 1.0//",
    "-//SQ//DTD HTML 2.0 HoTMetaL + extensions//",
    "-//SoftQuad Software//DTD HoTMetaL PRO 6.0::19990601::extensions to HTML 4.0//",
    "-//SoftQuad//DTD HoTMetaL PRO 4.0::19971010::extensions to HTML 4.0//",
    "-//Spyglass//DTD HTML 2.0 Extended//",
    "-//Sun Microsystems Corp.//DTD HotJava HTML//",
    "-//Sun Microsystems Corp.//DTD HotJava Strict HTML//",
    "-//W3C//DTD HTML 3 1995-03-24//",
    "-//W3C//DTD HTML 3.2 Draft//",
    "-//W3C//DTD HTML 3.2 Final//",
    "-//W3C//DTD HTML 3.2//",
    "-//W3C//DTD HTML 3.2S Draft//",
    "-//W3C//DTD HTML 4.0 Frameset//",
    "-//W3C//DTD HTML 4.0 Transitional//",
    "-//W3C//DTD HTML Experimental 19960712//",
    "-//W3C//DTD HTML Experimental 970421//",
    "-//W3C//DTD W3 HTML//",
    "-//W3O//DTD W3 HTML 3.0//",
    "-//WebTechs//DTD Mozilla HTML 2.0//",
    "-//WebTechs//DTD Mozilla HTML//",
];

const QUIRKY_PUBLIC_IDENTIFIERS: &[&str] = &[
    "-//W3O//DTD W3 HTML Strict 3.0//EN//",
    "-/W3C/DTD HTML 4.0 Transitional/EN",
    "HTML",
];

const QUIRKY_SYSTEM_IDENTIFIER: &str =
    "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// Quirky without a system identifier, limited-quirky with one.
const HTML4_PUBLIC_PREFIXES: &[&str] = &[
    "-//W3C//DTD HTML 4.01 Frameset//",
    "-//W3C//DTD HTML 4.01 Transitional//",
];

const LIMITED_QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "-//W3C//DTD XHTML 1.0 Frameset//",
    "-//W3C//DTD XHTML 1.0 Transitional//",
];

fn starts_with_any(haystack: &str, prefixes: &[&str]) -> bool {
    prefixes
        .iter()
        .any(|prefix| starts_with_ignore_ascii_case(haystack, prefix))
}

fn doctype_is_quirky(doctype: &Doctype) -> bool {
    let public = doctype.public_identifier.as_deref().unwrap_or_default();
    let system = doctype.system_identifier.as_deref();

    doctype.force_quirks
        || doctype.name.as_deref() != Some("html")
        || QUIRKY_PUBLIC_IDENTIFIERS
            .iter()
            .any(|x| x.eq_ignore_ascii_case(public))
        || system.map_or(false, |x| x.eq_ignore_ascii_case(QUIRKY_SYSTEM_IDENTIFIER))
        || starts_with_any(public, QUIRKY_PUBLIC_PREFIXES)
        || (system.is_none() && starts_with_any(public, HTML4_PUBLIC_PREFIXES))
}

fn doctype_is_limited_quirky(doctype: &Doctype) -> bool {
    let public = doctype.public_identifier.as_deref().unwrap_or_default();

    starts_with_any(public, LIMITED_QUIRKY_PUBLIC_PREFIXES)
        || (doctype.system_identifier.is_some() && starts_with_any(public, HTML4_PUBLIC_PREFIXES))
}

pub(crate) fn quirks_mode_for(doctype: &Doctype) -> QuirksMode {
    if doctype_is_quirky(doctype) {
        QuirksMode::Quirks
    } else if doctype_is_limited_quirky(doctype) {
        QuirksMode::LimitedQuirks
    } else {
        QuirksMode::NoQuirks
    }
}

/// Whether the doctype is anything but `<!DOCTYPE html>` or its legacy-compat variant.
pub(crate) fn doctype_is_non_conforming(doctype: &Doctype) -> bool {
    doctype.name.as_deref() != Some("html")
        || doctype.public_identifier.is_some()
        || doctype
            .system_identifier
            .as_deref()
            .map_or(false, |x| x != "about:legacy-compat")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctype(public: Option<&str>, system: Option<&str>) -> Doctype {
        Doctype {
            name: Some("html".to_owned()),
            public_identifier: public.map(str::to_owned),
            system_identifier: system.map(str::to_owned),
            ..Doctype::default()
        }
    }

    #[test]
    fn html5_doctype_is_standards() {
        assert_eq!(quirks_mode_for(&doctype(None, None)), QuirksMode::NoQuirks);
        assert!(!doctype_is_non_conforming(&doctype(
            None,
            Some("about:legacy-compat")
        )));
    }

    #[test]
    fn html4_transitional_depends_on_system_identifier() {
        let public = "-//W3C//DTD HTML 4.01 Transitional//EN";
        assert_eq!(
            quirks_mode_for(&doctype(Some(public), None)),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for(&doctype(
                Some(public),
                Some("http://www.w3.org/TR/html4/loose.dtd")
            )),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn prefixes_are_case_insensitive() {
        assert_eq!(
            quirks_mode_for(&doctype(Some("-//ietf//dtd html 3.2//en"), None)),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for(&doctype(Some("-//W3C//DTD XHTML 1.0 Strict//EN"), None)),
            QuirksMode::NoQuirks
        );
        let mut missing_name = doctype(None, None);
        missing_name.name = None;
        assert_eq!(quirks_mode_for(&missing_name), QuirksMode::Quirks);
    }
}
