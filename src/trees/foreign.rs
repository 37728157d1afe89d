//! Name adjustments for SVG and MathML content.
use crate::token::StartTag;
use crate::{Attribute, Namespace};

fn svg_tag_name(lowercase: &str) -> Option<&'static str> {
    Some(match lowercase {
        "altglyph" => "altGlyph",
        "altglyphdef" => "altGlyphDef",
        "altglyphitem" => "altGlyphItem",
        "animatecolor" => "animateColor",
        "animatemotion" => "animateMotion",
        "animatetransform" => "animateTransform",
        "clippath" => "clipPath",
        "feblend" => "feBlend",
        "fecolormatrix" => "feColorMatrix",
        "fecomponenttransfer" => "feComponentTransfer",
        "fecomposite" => "feComposite",
        "feconvolvematrix" => "feConvolveMatrix",
        "fediffuselighting" => "feDiffuseLighting",
        "fedisplacementmap" => "feDisplacementMap",
        "fedistantlight" => "feDistantLight",
        "fedropshadow" => "feDropShadow",
        "feflood" => "feFlood",
        "fefunca" => "feFuncA",
        "fefuncb" => "feFuncB",
        "fefuncg" => "feFuncG",
        "fefuncr" => "feFuncR",
        "fegaussianblur" => "feGaussianBlur",
        "feimage" => "feImage",
        "femerge" => "feMerge",
        "femergenode" => "feMergeNode",
        "femorphology" => "feMorphology",
        "feoffset" => "feOffset",
        "fepointlight" => "fePointLight",
        "fespecularlighting" => "feSpecularLighting",
        "fespotlight" => "feSpotLight",
        "fetile" => "feTile",
        "feturbulence" => "feTurbulence",
        "foreignobject" => "foreignObject",
        "glyphref" => "glyphRef",
        "lineargradient" => "linearGradient",
        "radialgradient" => "radialGradient",
        "textpath" => "textPath",
        _ => return None,
    })
}

fn svg_attribute_name(lowercase: &str) -> Option<&'static str> {
    Some(match lowercase {
        "attributename" => "attributeName",
        "attributetype" => "attributeType",
        "basefrequency" => "baseFrequency",
        "baseprofile" => "baseProfile",
        "calcmode" => "calcMode",
        "clippathunits" => "clipPathUnits",
        "diffuseconstant" => "diffuseConstant",
        "edgemode" => "edgeMode",
        "filterunits" => "filterUnits",
        "glyphref" => "glyphRef",
        "gradienttransform" => "gradientTransform",
        "gradientunits" => "gradientUnits",
        "kernelmatrix" => "kernelMatrix",
        "kernelunitlength" => "kernelUnitLength",
        "keypoints" => "keyPoints",
        "keysplines" => "keySplines",
        "keytimes" => "keyTimes",
        "lengthadjust" => "lengthAdjust",
        "limitingconeangle" => "limitingConeAngle",
        "markerheight" => "markerHeight",
        "markerunits" => "markerUnits",
        "markerwidth" => "markerWidth",
        "maskcontentunits" => "maskContentUnits",
        "maskunits" => "maskUnits",
        "numoctaves" => "numOctaves",
        "pathlength" => "pathLength",
        "patterncontentunits" => "patternContentUnits",
        "patterntransform" => "patternTransform",
        "patternunits" => "patternUnits",
        "pointsatx" => "pointsAtX",
        "pointsaty" => "pointsAtY",
        "pointsatz" => "pointsAtZ",
        "preservealpha" => "preserveAlpha",
        "preserveaspectratio" => "preserveAspectRatio",
        "primitiveunits" => "primitiveUnits",
        "refx" => "refX",
        "refy" => "refY",
        "repeatcount" => "repeatCount",
        "repeatdur" => "repeatDur",
        "requiredextensions" => "requiredExtensions",
        "requiredfeatures" => "requiredFeatures",
        "specularconstant" => "specularConstant",
        "specularexponent" => "specularExponent",
        "spreadmethod" => "spreadMethod",
        "startoffset" => "startOffset",
        "stddeviation" => "stdDeviation",
        "stitchtiles" => "stitchTiles",
        "surfacescale" => "surfaceScale",
        "systemlanguage" => "systemLanguage",
        "tablevalues" => "tableValues",
        "targetx" => "targetX",
        "targety" => "targetY",
        "textlength" => "textLength",
        "viewbox" => "viewBox",
        "viewtarget" => "viewTarget",
        "xchannelselector" => "xChannelSelector",
        "ychannelselector" => "yChannelSelector",
        "zoomandpan" => "zoomAndPan",
        _ => return None,
    })
}

pub(crate) fn adjust_svg_tag_name(tag: &mut StartTag) {
    if let Some(name) = svg_tag_name(&tag.name) {
        tag.name = name.to_owned();
    }
}

pub(crate) fn adjust_svg_attributes(tag: &mut StartTag) {
    for attr in &mut tag.attributes {
        if let Some(name) = svg_attribute_name(&attr.name) {
            attr.name = name.to_owned();
        }
    }
}

pub(crate) fn adjust_mathml_attributes(tag: &mut StartTag) {
    for attr in &mut tag.attributes {
        if attr.name == "definitionurl" {
            attr.name = "definitionURL".to_owned();
        }
    }
}

/// Split `xlink:href` and friends into prefix, local name and namespace.
pub(crate) fn adjust_foreign_attributes(tag: &mut StartTag) {
    for attr in &mut tag.attributes {
        let (prefix, local, ns) = match &*attr.name {
            "xlink:actuate" | "xlink:arcrole" | "xlink:href" | "xlink:role" | "xlink:show"
            | "xlink:title" | "xlink:type" => (Some("xlink"), &attr.name[6..], Namespace::XLink),
            "xml:lang" | "xml:space" => (Some("xml"), &attr.name[4..], Namespace::Xml),
            "xmlns" => (None, "xmlns", Namespace::Xmlns),
            "xmlns:xlink" => (Some("xmlns"), "xlink", Namespace::Xmlns),
            _ => continue,
        };
        let local = local.to_owned();
        attr.prefix = prefix.map(str::to_owned);
        attr.namespace = Some(ns);
        attr.name = local;
    }
}

/// HTML start tags that end foreign content.
pub(crate) fn is_breakout_start_tag(tag: &StartTag) -> bool {
    match &*tag.name {
        "b" | "big" | "blockquote" | "body" | "br" | "center" | "code" | "dd" | "div" | "dl"
        | "dt" | "em" | "embed" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head" | "hr"
        | "i" | "img" | "li" | "listing" | "menu" | "meta" | "nobr" | "ol" | "p" | "pre"
        | "ruby" | "s" | "small" | "span" | "strong" | "strike" | "sub" | "sup" | "table"
        | "tt" | "u" | "ul" | "var" => true,
        "font" => tag
            .attributes
            .iter()
            .any(|attr| matches!(&*attr.name, "color" | "face" | "size")),
        _ => false,
    }
}

/// Whether an element with this name and these attributes is an
/// [HTML integration point](https://html.spec.whatwg.org/#html-integration-point).
pub(crate) fn is_html_integration_point(name: &str, ns: Namespace, attributes: &[Attribute]) -> bool {
    match ns {
        Namespace::MathMl if name == "annotation-xml" => attributes.iter().any(|attr| {
            attr.namespace.is_none()
                && attr.name == "encoding"
                && (attr.value.eq_ignore_ascii_case("text/html")
                    || attr.value.eq_ignore_ascii_case("application/xhtml+xml"))
        }),
        Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_names_are_camel_cased() {
        let mut tag = StartTag {
            name: "foreignobject".to_owned(),
            attributes: vec![Attribute::new("viewbox", "0 0 1 1"), Attribute::new("x", "1")],
            ..StartTag::default()
        };
        adjust_svg_tag_name(&mut tag);
        adjust_svg_attributes(&mut tag);
        assert_eq!(tag.name, "foreignObject");
        assert_eq!(tag.attributes[0].name, "viewBox");
        assert_eq!(tag.attributes[1].name, "x");
    }

    #[test]
    fn foreign_attributes_get_namespaces() {
        let mut tag = StartTag {
            name: "svg".to_owned(),
            attributes: vec![
                Attribute::new("xlink:href", "#a"),
                Attribute::new("xmlns", "http://www.w3.org/2000/svg"),
                Attribute::new("xlink", "x"),
            ],
            ..StartTag::default()
        };
        adjust_foreign_attributes(&mut tag);
        assert_eq!(tag.attributes[0].name, "href");
        assert_eq!(tag.attributes[0].prefix.as_deref(), Some("xlink"));
        assert_eq!(tag.attributes[0].namespace, Some(Namespace::XLink));
        assert_eq!(tag.attributes[1].namespace, Some(Namespace::Xmlns));
        assert_eq!(tag.attributes[2].namespace, None);
    }

    #[test]
    fn integration_points() {
        assert!(is_html_integration_point(
            "annotation-xml",
            Namespace::MathMl,
            &[Attribute::new("encoding", "Text/HTML")]
        ));
        assert!(!is_html_integration_point("annotation-xml", Namespace::MathMl, &[]));
        assert!(is_html_integration_point("desc", Namespace::Svg, &[]));
        assert!(!is_html_integration_point("desc", Namespace::Html, &[]));
    }
}
