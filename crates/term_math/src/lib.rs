//! Term Math Crate - MathML to terminal text rendering
//!
//! This crate renders presentation MathML as a monospace character grid:
//! - A math AST covering the presentation MathML constructs found in e-books
//! - MathML parsing with recovery for bare fragments
//! - Box layout: fractions, scripts, limits, radicals, tables and fences
//! - Compact Unicode sub/superscript glyphs with a multiline fallback
//! - Rendering to newline-joined text, plus HTML entry points

pub mod compose;
pub mod error;
pub mod fence;
pub mod glyphs;
pub mod heuristics;
pub mod layout;
pub mod math_box;
pub mod mathml_parser;
pub mod model;
pub mod radical;
pub mod render;

pub use compose::{center_offset, horizontal_concat, vertical_stack};
pub use error::*;
pub use layout::LayoutEngine;
pub use math_box::MathBox;
pub use mathml_parser::{parse_mathml, MathmlParser};
pub use model::*;
pub use render::{mathml_to_ascii, render_all_math, render_node, RenderConfig, Renderer};

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(str::to_string).collect()
    }

    // =============================================================================
    // Integration Tests
    // =============================================================================

    #[test]
    fn test_parse_layout_render_pipeline() {
        let xml = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">
            <mi>y</mi><mo>=</mo>
            <mfrac><mi>a</mi><mi>b</mi></mfrac>
            <mo>+</mo>
            <mfrac><mi>c</mi><mi>d</mi></mfrac>
        </math>"#;

        let node = parse_mathml(xml).unwrap();
        let math_box = LayoutEngine::new().layout(&node);
        assert_eq!(math_box.height(), 3);
        assert_eq!(math_box.baseline(), 1);

        let output = Renderer::new().render(&node);
        assert_eq!(output, "    a   c\ny = ─ + ─\n    b   d");
    }

    #[test]
    fn test_entropy_formula() {
        let xml = r#"<math>
            <mi>H</mi><mo>(</mo><mi>X</mi><mo>)</mo><mo>=</mo><mo>&minus;</mo>
            <msubsup>
                <mo>&sum;</mo>
                <mrow><mi>i</mi><mo>=</mo><mn>1</mn></mrow>
                <mi>n</mi>
            </msubsup>
            <mi>p</mi><mo>(</mo><msub><mi>x</mi><mi>i</mi></msub><mo>)</mo>
            <mo>log</mo>
            <mi>p</mi><mo>(</mo><msub><mi>x</mi><mi>i</mi></msub><mo>)</mo>
        </math>"#;

        let output = mathml_to_ascii(xml, true).unwrap();
        let pad = " ".repeat(8);
        let rest = " ".repeat(13);
        assert_eq!(
            lines(&output),
            vec![
                format!("{pad}  n  {rest}"),
                "H(X) = −  ∑  p(xᵢ)logp(xᵢ)".to_string(),
                format!("{pad}i = 1{rest}"),
            ]
        );
    }

    #[test]
    fn test_nested_fractions() {
        let inner = MathNode::fraction(MathNode::number("1"), MathNode::number("2"));
        let outer = MathNode::fraction(inner, MathNode::number("3"));

        let math_box = LayoutEngine::new().layout(&outer);
        assert_eq!(math_box.render(), "1\n─\n2\n─\n3");
        assert_eq!(math_box.baseline(), 3);
    }

    #[test]
    fn test_cube_root() {
        let output = mathml_to_ascii("<math><mroot><mi>x</mi><mn>3</mn></mroot></math>", true).unwrap();
        assert_eq!(output, "³√(x)");
    }

    #[test]
    fn test_piecewise_definition() {
        let xml = r#"<math>
            <mi>f</mi><mo>=</mo>
            <mfenced open="{" close="">
                <mtable>
                    <mtr><mtd><mn>1</mn></mtd></mtr>
                    <mtr><mtd><mn>0</mn></mtd></mtr>
                    <mtr><mtd><mn>2</mn></mtd></mtr>
                </mtable>
            </mfenced>
        </math>"#;

        let output = mathml_to_ascii(xml, true).unwrap();
        assert_eq!(output, "    ⎧1\nf = ⎨0\n    ⎩2");
    }

    #[test]
    fn test_where_clause_table() {
        let xml = r#"<math><mtable>
            <mtr><mtd><mi>a</mi></mtd></mtr>
            <mtr><mtd><mtext>where</mtext></mtd><mtd><mi>b</mi></mtd></mtr>
        </mtable></math>"#;

        let output = mathml_to_ascii(xml, true).unwrap();
        assert_eq!(output, "   a    \n        \nwhere  b");
    }

    #[test]
    fn test_square_root_of_fraction() {
        let output = mathml_to_ascii(
            "<math><msqrt><mfrac><mi>a</mi><mi>b</mi></mfrac></msqrt></math>",
            true,
        )
        .unwrap();
        let first = output.split('\n').next().unwrap();
        assert_eq!(first, "     ⟋─────");
        assert_eq!(output.split('\n').count(), 4);
    }

    #[test]
    fn test_malformed_subtree_degrades_locally() {
        let output =
            mathml_to_ascii("<math><mi>a</mi><mo>+</mo><mfrac><mi>b</mi></mfrac></math>", true)
                .unwrap();
        assert_eq!(output, "a + ?");
    }

    #[test]
    fn test_subscript_superscript_combined() {
        let xml = "<math><msubsup><mi>x</mi><mi>i</mi><mn>2</mn></msubsup></math>";
        assert_eq!(mathml_to_ascii(xml, true).unwrap(), "xᵢ²");
        assert_eq!(mathml_to_ascii(xml, false).unwrap(), " 2\nx \n i");
    }

    #[test]
    fn test_delimiter_stretching() {
        let tall_content = MathNode::fraction(
            MathNode::fraction(MathNode::identifier("a"), MathNode::identifier("b")),
            MathNode::identifier("c"),
        );
        let delimited = MathNode::parens(vec![tall_content]);

        let output = render_node(&delimited, true);
        assert_eq!(output, "⎛a⎞\n⎜─⎟\n⎜b⎟\n⎜─⎟\n⎝c⎠");
    }

    #[test]
    fn test_parsed_tree_serde_roundtrip() {
        let node = parse_mathml("<mrow>f <msup><mi>x</mi><mn>2</mn></msup> dx</mrow>").unwrap();
        let json = serde_json::to_string(&node).unwrap();
        let back: MathNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_symbols_module() {
        assert_eq!(symbols::SUM, '\u{2211}');
        assert_eq!(symbols::FRACTION_RULE, '─');
        assert_eq!(symbols::PLACEHOLDER, '?');
    }

    #[test]
    fn test_render_config() {
        let config = RenderConfig::from_json(r#"{"use_unicode": false}"#).unwrap();
        let renderer = Renderer::with_config(config);

        let node = MathNode::subscript(MathNode::identifier("x"), MathNode::identifier("i"));
        assert_eq!(renderer.render(&node), "x \n i");
    }
}
