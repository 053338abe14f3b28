//! MathML Parser - Parse presentation MathML into MathNode trees
//!
//! Parsing happens in two passes. The token stream is first collected into
//! a generic element tree (tag, attributes, text, children, trailing text)
//! that must form a self-contained document. The tree is then mapped onto
//! [`MathNode`] variants, checking operand counts along the way.

use crate::error::{MathError, MathResult};
use crate::model::*;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Namespace used when a bare fragment is wrapped in a `<math>` root
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Parse MathML from a string.
///
/// Input that is not a self-contained document, and does not already start
/// with `<math`, is retried once inside a `<math>` root.
pub fn parse_mathml(xml: &str) -> MathResult<MathNode> {
    let xml = xml.trim();
    match MathmlParser::new(xml).parse() {
        Ok(node) => Ok(node),
        Err(err) if !xml.starts_with("<math") => {
            tracing::debug!("Wrapping MathML fragment in a <math> root after: {}", err);
            let wrapped = format!(r#"<math xmlns="{MATHML_NAMESPACE}">{xml}</math>"#);
            let mut parser = MathmlParser::new(&wrapped);
            parser.parse()
        }
        Err(err) => Err(err),
    }
}

// =============================================================================
// Element Tree
// =============================================================================

/// A markup element as read from the token stream
#[derive(Debug, Clone, Default, PartialEq)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    /// Text before the first child
    text: String,
    children: Vec<Element>,
    /// Text after this element's end tag, up to the next sibling
    tail: String,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn push_text(&mut self, text: &str) {
        match self.children.last_mut() {
            Some(child) => child.tail.push_str(text),
            None => self.text.push_str(text),
        }
    }

    /// The children as a fixed-size array, or `None` on a count mismatch
    fn operands<const N: usize>(&self) -> Option<[&Element; N]> {
        self.children.iter().collect::<Vec<_>>().try_into().ok()
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Parser for MathML XML content
pub struct MathmlParser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> MathmlParser<'a> {
    /// Create a new parser from XML string
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        Self { reader }
    }

    /// Parse a self-contained document and return its MathNode tree
    pub fn parse(&mut self) -> MathResult<MathNode> {
        let root = self.parse_document()?;
        Ok(convert(&root))
    }

    /// Read exactly one root element with no stray text around it
    fn parse_document(&mut self) -> MathResult<Element> {
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let mut element = element_from_start(e)?;
                    if root.is_some() {
                        return Err(multiple_roots(&element.tag));
                    }
                    self.parse_children(&mut element)?;
                    root = Some(element);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    if root.is_some() {
                        return Err(multiple_roots(&element.tag));
                    }
                    root = Some(element);
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape_with(resolve_entity).map_err(|e| {
                        MathError::Parse(format!("Failed to unescape text: {}", e))
                    })?;
                    if !text.trim().is_empty() {
                        return Err(MathError::Parse(format!(
                            "Text outside the root element: {:?}",
                            text.trim()
                        )));
                    }
                }
                Ok(Event::CData(_)) => {
                    return Err(MathError::Parse(
                        "CDATA outside the root element".to_string(),
                    ));
                }
                Ok(Event::End(ref e)) => {
                    return Err(MathError::Parse(format!(
                        "Unexpected closing tag </{}>",
                        local_name_from_bytes(e.name().as_ref())
                    )));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(MathError::Xml(e)),
                _ => {}
            }
        }

        root.ok_or_else(|| MathError::Parse("No root element".to_string()))
    }

    /// Parse the content of an element until its end tag
    fn parse_children(&mut self, element: &mut Element) -> MathResult<()> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let mut child = element_from_start(e)?;
                    self.parse_children(&mut child)?;
                    element.children.push(child);
                }
                Ok(Event::Empty(ref e)) => {
                    element.children.push(element_from_start(e)?);
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape_with(resolve_entity).map_err(|e| {
                        MathError::Parse(format!("Failed to unescape text: {}", e))
                    })?;
                    element.push_text(&text);
                }
                Ok(Event::CData(ref e)) => {
                    element.push_text(&String::from_utf8_lossy(e));
                }
                // end names are checked by the reader
                Ok(Event::End(_)) => return Ok(()),
                Ok(Event::Eof) => {
                    return Err(MathError::Parse(format!(
                        "Unclosed element <{}>",
                        element.tag
                    )));
                }
                Err(e) => return Err(MathError::Xml(e)),
                _ => {}
            }
        }
    }
}

fn multiple_roots(tag: &str) -> MathError {
    MathError::Parse(format!("Multiple root elements, found another <{}>", tag))
}

/// Build an element (without content) from its start tag
fn element_from_start(e: &BytesStart<'_>) -> MathResult<Element> {
    let tag = local_name_from_bytes(e.name().as_ref());
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr
            .map_err(|err| MathError::Parse(format!("Malformed attribute in <{}>: {}", tag, err)))?;
        let key = local_name_from_bytes(attr.key.as_ref());
        let raw = String::from_utf8_lossy(&attr.value);
        let value = quick_xml::escape::unescape_with(&raw, resolve_entity)
            .map_err(|e| MathError::Parse(format!("Failed to unescape attribute {}: {}", key, e)))?;
        attrs.push((key, value.into_owned()));
    }

    Ok(Element {
        tag,
        attrs,
        ..Element::default()
    })
}

/// Resolve XML and common MathML named entities
fn resolve_entity(name: &str) -> Option<&'static str> {
    resolve_predefined_entity(name).or_else(|| mathml_entity(name))
}

/// Named entities that show up in e-book MathML
fn mathml_entity(name: &str) -> Option<&'static str> {
    let value = match name {
        "nbsp" => "\u{00A0}",
        // invisible operators render as nothing
        "InvisibleTimes" | "it" => "",
        "ApplyFunction" | "af" => "",
        "InvisibleComma" | "ic" => "",
        "minus" => "\u{2212}",
        "plus" => "+",
        "plusmn" | "pm" => "\u{00B1}",
        "times" => "\u{00D7}",
        "divide" | "div" => "\u{00F7}",
        "middot" | "centerdot" => "\u{00B7}",
        "sdot" => "\u{22C5}",
        "sum" => "\u{2211}",
        "prod" => "\u{220F}",
        "int" => "\u{222B}",
        "radic" | "Sqrt" => "\u{221A}",
        "infin" => "\u{221E}",
        "partial" => "\u{2202}",
        "nabla" => "\u{2207}",
        "le" | "leq" => "\u{2264}",
        "ge" | "geq" => "\u{2265}",
        "ne" => "\u{2260}",
        "equiv" => "\u{2261}",
        "approx" => "\u{2248}",
        "sim" => "\u{223C}",
        "isin" | "in" => "\u{2208}",
        "rarr" | "rightarrow" => "\u{2192}",
        "larr" | "leftarrow" => "\u{2190}",
        "lang" | "langle" => "\u{27E8}",
        "rang" | "rangle" => "\u{27E9}",
        "prime" => "\u{2032}",
        "Prime" => "\u{2033}",
        "hellip" => "\u{2026}",
        "deg" => "\u{00B0}",
        "alpha" => "\u{03B1}",
        "beta" => "\u{03B2}",
        "gamma" => "\u{03B3}",
        "delta" => "\u{03B4}",
        "epsilon" => "\u{03B5}",
        "theta" => "\u{03B8}",
        "lambda" => "\u{03BB}",
        "mu" => "\u{03BC}",
        "pi" => "\u{03C0}",
        "sigma" => "\u{03C3}",
        "phi" => "\u{03C6}",
        "omega" => "\u{03C9}",
        "Delta" => "\u{0394}",
        "Sigma" => "\u{03A3}",
        _ => return None,
    };
    Some(value)
}

/// Get local name from bytes (without namespace prefix)
fn local_name_from_bytes(name: &[u8]) -> String {
    let name_str = String::from_utf8_lossy(name);
    if let Some(pos) = name_str.find(':') {
        name_str[pos + 1..].to_string()
    } else {
        name_str.to_string()
    }
}

// =============================================================================
// Element Mapping
// =============================================================================

/// Map an element onto its MathNode
fn convert(element: &Element) -> MathNode {
    match element.tag.as_str() {
        "math" | "mrow" | "mstyle" | "mpadded" => convert_row(element),
        "mi" => MathNode::Identifier(element.text.clone()),
        "mn" => MathNode::Number(element.text.clone()),
        "mtext" | "ms" => MathNode::Text(element.text.clone()),
        "mo" => MathNode::Operator {
            text: element.text.clone(),
            prefix: element.attr("form") == Some("prefix"),
        },
        "mspace" => MathNode::Space,
        "mfrac" => match element.operands::<2>() {
            Some([num, den]) => MathNode::Fraction {
                num: Box::new(convert(num)),
                den: Box::new(convert(den)),
                bar_visible: !is_zero_thickness(element.attr("linethickness")),
            },
            None => malformed(element),
        },
        "msub" => match element.operands::<2>() {
            Some([base, sub]) => MathNode::subscript(convert(base), convert(sub)),
            None => malformed(element),
        },
        "msup" => match element.operands::<2>() {
            Some([base, sup]) => MathNode::superscript(convert(base), convert(sup)),
            None => malformed(element),
        },
        "msubsup" => match element.operands::<3>() {
            Some([base, sub, sup]) => {
                MathNode::sub_superscript(convert(base), convert(sub), convert(sup))
            }
            None => malformed(element),
        },
        "munder" => match element.operands::<2>() {
            Some([base, under]) => MathNode::under(convert(base), convert(under)),
            None => malformed(element),
        },
        "mover" => match element.operands::<2>() {
            Some([base, over]) => MathNode::over(convert(base), convert(over)),
            None => malformed(element),
        },
        "munderover" => match element.operands::<3>() {
            Some([base, under, over]) => {
                MathNode::under_over(convert(base), convert(under), convert(over))
            }
            None => malformed(element),
        },
        "msqrt" => MathNode::Sqrt(convert_all(&element.children)),
        "mroot" => match element.operands::<2>() {
            Some([base, index]) => MathNode::root(convert(base), convert(index)),
            None => malformed(element),
        },
        "mtable" => MathNode::Table(
            element
                .children
                .iter()
                .filter(|c| is_table_row(&c.tag))
                .map(convert_table_row)
                .collect(),
        ),
        "mtr" | "mlabeledtr" => MathNode::TableRow(convert_table_row(element)),
        "mtd" => MathNode::TableCell(convert_table_cell(element)),
        "mfenced" => MathNode::Fenced {
            open: element.attr("open").unwrap_or("(").to_string(),
            close: element.attr("close").unwrap_or(")").to_string(),
            separators: element.attr("separators").unwrap_or(",").to_string(),
            children: convert_all(&element.children),
        },
        "semantics" => element
            .children
            .first()
            .map(convert)
            .unwrap_or_else(|| MathNode::row(Vec::new())),
        "annotation" | "annotation-xml" | "none" | "mprescripts" => MathNode::row(Vec::new()),
        "mphantom" => MathNode::Phantom(Box::new(MathNode::row(convert_all(&element.children)))),
        _ => MathNode::Unknown {
            tag: element.tag.clone(),
            children: convert_all(&element.children),
            text: element.text.clone(),
        },
    }
}

fn convert_all(elements: &[Element]) -> Vec<MathNode> {
    elements.iter().map(convert).collect()
}

/// Row with its leading text and each child's trailing text
fn convert_row(element: &Element) -> MathNode {
    MathNode::Row {
        leading: non_empty(&element.text),
        children: element
            .children
            .iter()
            .map(|child| RowChild {
                node: convert(child),
                tail: non_empty(&child.tail),
            })
            .collect(),
    }
}

fn convert_table_row(element: &Element) -> TableRow {
    TableRow::new(
        element
            .children
            .iter()
            .filter(|c| c.tag == "mtd")
            .map(convert_table_cell)
            .collect(),
    )
}

fn convert_table_cell(element: &Element) -> TableCell {
    TableCell {
        children: convert_all(&element.children),
        text: non_empty(&element.text),
    }
}

fn is_table_row(tag: &str) -> bool {
    matches!(tag, "mtr" | "mlabeledtr")
}

fn is_zero_thickness(linethickness: Option<&str>) -> bool {
    matches!(
        linethickness.map(str::trim),
        Some("0" | "0pt" | "0px" | "0em")
    )
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn malformed(element: &Element) -> MathNode {
    tracing::warn!(
        "<{}> has {} operands, rendering a placeholder",
        element.tag,
        element.children.len()
    );
    MathNode::Malformed {
        tag: element.tag.clone(),
        children: element.children.len(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row_nodes(node: &MathNode) -> Vec<&MathNode> {
        match node {
            MathNode::Row { children, .. } => children.iter().map(|c| &c.node).collect(),
            other => panic!("Expected Row, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_math() {
        let xml = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">
            <mi>x</mi><mo>=</mo><mn>2</mn>
        </math>"#;

        let result = parse_mathml(xml).unwrap();
        assert_eq!(
            row_nodes(&result),
            vec![
                &MathNode::identifier("x"),
                &MathNode::operator("="),
                &MathNode::number("2"),
            ]
        );
    }

    #[test]
    fn test_parse_prefixed_namespace() {
        let xml = r#"<m:math xmlns:m="http://www.w3.org/1998/Math/MathML"><m:mi>y</m:mi></m:math>"#;
        let result = parse_mathml(xml).unwrap();
        assert_eq!(row_nodes(&result), vec![&MathNode::identifier("y")]);
    }

    #[test]
    fn test_parse_fraction() {
        let result = parse_mathml("<math><mfrac><mi>a</mi><mi>b</mi></mfrac></math>").unwrap();
        assert_eq!(
            row_nodes(&result)[0],
            &MathNode::fraction(MathNode::identifier("a"), MathNode::identifier("b"))
        );
    }

    #[test]
    fn test_parse_invisible_fraction() {
        for thickness in ["0", "0pt", "0px", "0em"] {
            let xml = format!(
                r#"<math><mfrac linethickness="{thickness}"><mi>k</mi><mi>n</mi></mfrac></math>"#
            );
            let result = parse_mathml(&xml).unwrap();
            assert!(matches!(
                row_nodes(&result)[0],
                MathNode::Fraction {
                    bar_visible: false,
                    ..
                }
            ));
        }
        let thick = parse_mathml(r#"<mfrac linethickness="2px"><mi>k</mi><mi>n</mi></mfrac>"#)
            .unwrap();
        assert!(matches!(thick, MathNode::Fraction { bar_visible: true, .. }));
    }

    #[test]
    fn test_parse_prefix_operator() {
        let result = parse_mathml(r#"<mo form="prefix">-</mo>"#).unwrap();
        assert_eq!(result, MathNode::prefix_operator("-"));
    }

    #[test]
    fn test_arity_violation_is_malformed() {
        let result = parse_mathml("<math><mfrac><mi>a</mi></mfrac></math>").unwrap();
        assert_eq!(
            row_nodes(&result)[0],
            &MathNode::Malformed {
                tag: "mfrac".to_string(),
                children: 1,
            }
        );

        let result = parse_mathml("<msubsup><mi>a</mi><mi>b</mi></msubsup>").unwrap();
        assert!(matches!(result, MathNode::Malformed { children: 2, .. }));
    }

    #[test]
    fn test_parse_root_operand_order() {
        let result = parse_mathml("<mroot><mn>8</mn><mn>3</mn></mroot>").unwrap();
        assert_eq!(
            result,
            MathNode::root(MathNode::number("8"), MathNode::number("3"))
        );
    }

    #[test]
    fn test_parse_table_keeps_rows_and_cells() {
        let xml = r#"<math><mtable>
            <mtr><mtd><mi>a</mi></mtd><mtd>raw</mtd></mtr>
            <mlabeledtr><mtd><mi>b</mi></mtd></mlabeledtr>
            <mi>ignored</mi>
        </mtable></math>"#;

        let result = parse_mathml(xml).unwrap();
        let nodes = row_nodes(&result);
        let MathNode::Table(rows) = nodes[0] else {
            panic!("Expected Table");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells.len(), 2);
        assert_eq!(rows[0].cells[1], TableCell::text("raw"));
        assert_eq!(rows[1].cells[0].children, vec![MathNode::identifier("b")]);
    }

    #[test]
    fn test_parse_fenced_defaults() {
        let result = parse_mathml("<mfenced><mi>x</mi><mi>y</mi></mfenced>").unwrap();
        assert_eq!(
            result,
            MathNode::fenced(
                "(",
                ")",
                ",",
                vec![MathNode::identifier("x"), MathNode::identifier("y")]
            )
        );

        let cases = parse_mathml(r#"<mfenced open="{" close="" separators=""><mi>x</mi></mfenced>"#).unwrap();
        assert_eq!(cases, MathNode::cases(vec![MathNode::identifier("x")]));
    }

    #[test]
    fn test_semantics_drops_annotations() {
        let xml = r#"<math><semantics>
            <mrow><mi>x</mi></mrow>
            <annotation encoding="application/x-tex">x</annotation>
        </semantics></math>"#;

        let result = parse_mathml(xml).unwrap();
        assert_eq!(row_nodes(&result)[0], &MathNode::row(vec![MathNode::identifier("x")]));
    }

    #[test]
    fn test_leading_and_trailing_text() {
        let result = parse_mathml("<mrow>f <mi>x</mi> dx</mrow>").unwrap();
        assert_eq!(
            result,
            MathNode::Row {
                leading: Some("f".to_string()),
                children: vec![RowChild::with_tail(MathNode::identifier("x"), "dx")],
            }
        );
    }

    #[test]
    fn test_entities_are_decoded() {
        let xml = "<math><mo>&sum;</mo><mo>&#x2211;</mo><mo>&lt;</mo><mo>&InvisibleTimes;</mo></math>";
        let result = parse_mathml(xml).unwrap();
        assert_eq!(
            row_nodes(&result),
            vec![
                &MathNode::operator("∑"),
                &MathNode::operator("∑"),
                &MathNode::operator("<"),
                &MathNode::operator(""),
            ]
        );
    }

    #[test]
    fn test_unknown_entity_is_parse_error() {
        let err = parse_mathml("<math><mi>&bogus;</mi></math>").unwrap_err();
        assert!(matches!(err, MathError::Parse(_)));
    }

    #[test]
    fn test_malformed_attribute_is_parse_error() {
        let unquoted = r#"<math><mfrac linethickness=0pt><mi>k</mi><mi>n</mi></mfrac></math>"#;
        assert!(matches!(parse_mathml(unquoted), Err(MathError::Parse(_))));

        let duplicate =
            r#"<math><mfrac linethickness="0" linethickness="1"><mi>k</mi><mi>n</mi></mfrac></math>"#;
        assert!(matches!(parse_mathml(duplicate), Err(MathError::Parse(_))));
    }

    #[test]
    fn test_fragment_is_wrapped() {
        let result = parse_mathml("<mi>a</mi><mo>+</mo><mi>b</mi>").unwrap();
        assert_eq!(row_nodes(&result).len(), 3);

        let text = parse_mathml("x + 1").unwrap();
        assert_eq!(
            text,
            MathNode::Row {
                leading: Some("x + 1".to_string()),
                children: vec![],
            }
        );
    }

    #[test]
    fn test_broken_math_document_is_error() {
        assert!(parse_mathml("<math><mi>x</mi>").is_err());
        assert!(parse_mathml("<math><mi>x</mo></math>").is_err());
        assert!(parse_mathml("<math></math><math></math>").is_err());
    }

    #[test]
    fn test_unknown_element_fallback() {
        let result = parse_mathml("<menclose><mi>a</mi></menclose>").unwrap();
        assert_eq!(
            result,
            MathNode::Unknown {
                tag: "menclose".to_string(),
                children: vec![MathNode::identifier("a")],
                text: String::new(),
            }
        );
    }

    #[test]
    fn test_phantom_wraps_children() {
        let result = parse_mathml("<mphantom><mi>a</mi></mphantom>").unwrap();
        assert_eq!(
            result,
            MathNode::Phantom(Box::new(MathNode::row(vec![MathNode::identifier("a")])))
        );
    }
}
