//! Math Rendering - Turn math trees and MathML into terminal text
//!
//! [`Renderer`] lays a tree out with [`LayoutEngine`] and joins the rows of
//! the final box. The HTML entry points pull `<math>` elements out of a page
//! and render each through the MathML parser.

use crate::error::MathResult;
use crate::layout::LayoutEngine;
use crate::math_box::MathBox;
use crate::mathml_parser::parse_mathml;
use crate::model::MathNode;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Matches one `<math>` element, lazily, across lines
const MATH_ELEMENT_PATTERN: &str = r"(?s)<math[^>]*>.*?</math>";

// =============================================================================
// Renderer
// =============================================================================

/// Configuration for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefer compact Unicode sub/superscript glyphs over multiline placement
    pub use_unicode: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { use_unicode: true }
    }
}

impl RenderConfig {
    /// Decode a JSON settings document; missing keys take their defaults
    pub fn from_json(json: &str) -> MathResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Renderer for converting math trees to text
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    engine: LayoutEngine,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a new renderer with default config
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    /// Create with custom config
    pub fn with_config(config: RenderConfig) -> Self {
        let engine = LayoutEngine::with_unicode(config.use_unicode);
        Self { config, engine }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Layout a tree without flattening it to text
    pub fn layout(&self, node: &MathNode) -> MathBox {
        let math_box = self.engine.layout(node);
        tracing::trace!(
            "Laid out math box {}x{} (baseline {})",
            math_box.width(),
            math_box.height(),
            math_box.baseline()
        );
        math_box
    }

    /// Render a tree as newline-joined rows
    pub fn render(&self, node: &MathNode) -> String {
        self.layout(node).render()
    }

    /// Parse a MathML document or fragment and render it
    pub fn render_mathml(&self, xml: &str) -> MathResult<String> {
        let node = parse_mathml(xml)?;
        Ok(self.render(&node))
    }
}

/// Render a tree with the given glyph policy
pub fn render_node(node: &MathNode, use_unicode: bool) -> String {
    Renderer::with_config(RenderConfig { use_unicode }).render(node)
}

// =============================================================================
// HTML Entry Points
// =============================================================================

/// Every `<math>…</math>` element of an HTML string, in document order
fn math_elements(html: &str) -> Vec<&str> {
    math_element_regex()
        .find_iter(html)
        .map(|m| m.as_str())
        .collect()
}

/// The `<math>` element pattern, compiled on first use
fn math_element_regex() -> &'static Regex {
    static MATH_ELEMENT: OnceLock<Regex> = OnceLock::new();
    MATH_ELEMENT.get_or_init(|| {
        Regex::new(MATH_ELEMENT_PATTERN).expect("math element pattern is a valid regex")
    })
}

/// Render the first `<math>` element found in an HTML string.
///
/// When the string holds no math element it is returned unchanged.
pub fn mathml_to_ascii(html: &str, use_unicode: bool) -> MathResult<String> {
    let Some(math) = math_elements(html).into_iter().next() else {
        return Ok(html.to_string());
    };
    tracing::debug!("Rendering MathML element of {} bytes", math.len());
    Renderer::with_config(RenderConfig { use_unicode }).render_mathml(math)
}

/// Render every `<math>` element of an HTML string, in document order
pub fn render_all_math(html: &str, use_unicode: bool) -> MathResult<Vec<String>> {
    let renderer = Renderer::with_config(RenderConfig { use_unicode });
    math_elements(html)
        .into_iter()
        .map(|math| renderer.render_mathml(math))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
