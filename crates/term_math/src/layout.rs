//! Math Layout - turn a math tree into a character grid
//!
//! Each construct has one `layout_*` method producing a [`MathBox`] from the
//! boxes of its children. Composite boxes always report a consistent
//! width, height and baseline, so they can be composed further.

use crate::compose::{horizontal_concat, vertical_stack};
use crate::fence::{self, Side};
use crate::glyphs;
use crate::heuristics::{has_where_clause, is_binary_operator, is_prefix_function, is_summation};
use crate::math_box::MathBox;
use crate::model::*;
use crate::radical::{self, RadicalSign};

/// Separator between a fraction and a following stacked construct
const FRACTION_LIMIT_GAP: &str = "  ";

/// Separator between adjacent table cells
const CELL_GAP: &str = "  ";

/// Columns a drawn radical keeps beyond its content
const RADICAL_PADDING: usize = 10;

/// Narrowest box allowed for an under/over stack around a summation sign
const SUMMATION_MIN_WIDTH: usize = 2;

// =============================================================================
// Layout Engine
// =============================================================================

/// Engine for laying out math trees as character grids
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    use_unicode: bool,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    /// Create a layout engine that prefers compact Unicode glyphs
    pub fn new() -> Self {
        Self { use_unicode: true }
    }

    /// Create with an explicit glyph policy; `false` always uses
    /// multiline placement for scripts
    pub fn with_unicode(use_unicode: bool) -> Self {
        Self { use_unicode }
    }

    pub fn use_unicode(&self) -> bool {
        self.use_unicode
    }

    /// Layout a math node and return its box
    pub fn layout(&self, node: &MathNode) -> MathBox {
        self.layout_node(node)
    }

    fn layout_node(&self, node: &MathNode) -> MathBox {
        match node {
            MathNode::Row { leading, children } => self.layout_row(leading.as_deref(), children),
            MathNode::Identifier(text) | MathNode::Number(text) | MathNode::Text(text) => {
                MathBox::text(text)
            }
            MathNode::Operator { text, prefix } => self.layout_operator(text, *prefix),
            MathNode::Space => MathBox::text(" "),
            MathNode::Fraction {
                num,
                den,
                bar_visible,
            } => self.layout_fraction(num, den, *bar_visible),
            MathNode::Subscript { base, sub } => self.layout_subscript(base, sub),
            MathNode::Superscript { base, sup } => self.layout_superscript(base, sup),
            MathNode::SubSuperscript { base, sub, sup } => {
                self.layout_sub_superscript(base, sub, sup)
            }
            MathNode::Under { base, under } => self.layout_under(base, under),
            MathNode::Over { base, over } => self.layout_over(base, over),
            MathNode::UnderOver { base, under, over } => {
                self.layout_under_over(base, under, over)
            }
            MathNode::Sqrt(children) => self.layout_sqrt(children),
            MathNode::Root { base, index } => self.layout_root(base, index),
            MathNode::Table(rows) => self.layout_table(rows),
            MathNode::TableRow(row) => self.layout_table_row(row),
            MathNode::TableCell(cell) => self.layout_table_cell(cell),
            MathNode::Fenced {
                open,
                close,
                separators,
                children,
            } => self.layout_fenced(open, close, separators, children),
            MathNode::Phantom(base) => {
                let b = self.layout_node(base);
                MathBox::blank(b.width(), b.height(), b.baseline())
            }
            MathNode::Malformed { .. } => MathBox::placeholder(),
            MathNode::Unknown { children, text, .. } => {
                if children.is_empty() {
                    MathBox::text(text)
                } else {
                    self.layout_sequence(children)
                }
            }
        }
    }

    /// Layout nodes and concatenate them, dropping empty ones
    fn layout_sequence(&self, nodes: &[MathNode]) -> MathBox {
        horizontal_concat(nodes.iter().map(|n| self.layout_node(n)).collect())
    }

    /// Operator with contextual spacing
    fn layout_operator(&self, text: &str, prefix: bool) -> MathBox {
        if !prefix && !is_prefix_function(text) && is_binary_operator(text) {
            MathBox::text(&format!(" {text} "))
        } else {
            MathBox::text(text)
        }
    }

    /// Layout a row: leading text, children and their trailing text
    fn layout_row(&self, leading: Option<&str>, children: &[RowChild]) -> MathBox {
        let mut boxes = Vec::new();
        if let Some(text) = non_blank(leading) {
            boxes.push(MathBox::text(text));
        }

        let mut prev: Option<&MathNode> = None;
        for child in children {
            // keeps a fraction's bar from running into a stacked limit
            if prev.is_some_and(MathNode::is_fraction) && child.node.is_limit_construct() {
                boxes.push(MathBox::text(FRACTION_LIMIT_GAP));
            }
            boxes.push(self.layout_node(&child.node));
            if let Some(tail) = non_blank(child.tail.as_deref()) {
                boxes.push(MathBox::text(tail));
            }
            prev = Some(&child.node);
        }

        horizontal_concat(boxes)
    }

    /// Layout a fraction; the bar row is the baseline
    fn layout_fraction(&self, num: &MathNode, den: &MathNode, bar_visible: bool) -> MathBox {
        let num = self.layout_node(num);
        let den = self.layout_node(den);

        if !bar_visible {
            let baseline = num.height().saturating_sub(1);
            return vertical_stack(&[&num, &den], 0, baseline);
        }

        let width = num.width().max(den.width());
        let bar = MathBox::text(&symbols::FRACTION_RULE.to_string().repeat(width));
        vertical_stack(&[&num, &bar, &den], 0, num.height())
    }

    /// Layout subscript
    fn layout_subscript(&self, base: &MathNode, sub: &MathNode) -> MathBox {
        let base = self.layout_node(base);
        let sub = self.layout_node(sub);

        if base.is_single_line() && sub.is_single_line() {
            if let Some(compact) = glyphs::compact_subscript(sub.row_text(0).trim(), self.use_unicode)
            {
                return MathBox::text(&format!("{}{compact}", base.row_text(0).trim()));
            }
        }

        let width = base.width() + sub.width();
        let height = base.height().max(base.baseline() + 1 + sub.height());
        let mut result = MathBox::blank(width, height, base.baseline());
        result.stamp(&base, 0, 0);
        result.stamp(&sub, base.width(), base.baseline() + 1);
        result
    }

    /// Layout superscript
    fn layout_superscript(&self, base: &MathNode, sup: &MathNode) -> MathBox {
        let base = self.layout_node(base);
        let sup = self.layout_node(sup);

        if base.is_single_line() && sup.is_single_line() {
            if let Some(compact) =
                glyphs::compact_superscript(sup.row_text(0).trim(), self.use_unicode)
            {
                return MathBox::text(&format!("{}{compact}", base.row_text(0).trim()));
            }
        }

        let width = base.width() + sup.width();
        let height = sup.height() + base.height();
        let mut result = MathBox::blank(width, height, sup.height() + base.baseline());
        result.stamp(&sup, base.width(), 0);
        result.stamp(&base, 0, sup.height());
        result
    }

    /// Layout combined sub/superscript
    fn layout_sub_superscript(&self, base: &MathNode, sub: &MathNode, sup: &MathNode) -> MathBox {
        let base = self.layout_node(base);
        let sub = self.layout_node(sub);
        let sup = self.layout_node(sup);

        // bounded sum: limits go above and below the sign
        if is_summation(&base.flat_text()) {
            let baseline = sup.height() + base.baseline();
            return vertical_stack(&[&sup, &base, &sub], 0, baseline);
        }

        if base.height() == 1 && sub.height() == 1 && sup.height() == 1 {
            let compact_sub = glyphs::compact_subscript(sub.row_text(0).trim(), self.use_unicode);
            let compact_sup =
                glyphs::compact_superscript(sup.row_text(0).trim(), self.use_unicode);
            if let (Some(s), Some(p)) = (compact_sub, compact_sup) {
                return MathBox::text(&format!("{}{s}{p}", base.row_text(0).trim()));
            }
        }

        let width = base.width() + sub.width().max(sup.width());
        let height = sup.height() + base.height() + sub.height();
        let mut result = MathBox::blank(width, height, sup.height() + base.baseline());
        result.stamp(&base, 0, sup.height());
        result.stamp(&sup, base.width(), 0);
        result.stamp(&sub, base.width(), sup.height() + base.height());
        result
    }

    fn stack_min_width(base: &MathBox) -> usize {
        if is_summation(&base.flat_text()) {
            SUMMATION_MIN_WIDTH
        } else {
            0
        }
    }

    fn layout_under(&self, base: &MathNode, under: &MathNode) -> MathBox {
        let base = self.layout_node(base);
        let under = self.layout_node(under);
        vertical_stack(&[&base, &under], Self::stack_min_width(&base), base.baseline())
    }

    fn layout_over(&self, base: &MathNode, over: &MathNode) -> MathBox {
        let base = self.layout_node(base);
        let over = self.layout_node(over);
        let baseline = over.height() + base.baseline();
        vertical_stack(&[&over, &base], Self::stack_min_width(&base), baseline)
    }

    fn layout_under_over(&self, base: &MathNode, under: &MathNode, over: &MathNode) -> MathBox {
        let base = self.layout_node(base);
        let under = self.layout_node(under);
        let over = self.layout_node(over);
        let baseline = over.height() + base.baseline();
        vertical_stack(&[&over, &base, &under], Self::stack_min_width(&base), baseline)
    }

    /// Layout a square root: inline `√(…)` for one-line content, a drawn
    /// radical otherwise
    fn layout_sqrt(&self, children: &[MathNode]) -> MathBox {
        if children.is_empty() {
            return MathBox::text(&symbols::SQUARE_ROOT.to_string());
        }

        let inner = self.layout_sequence(children);
        if inner.height() <= 1 {
            return MathBox::text(&format!("√({})", inner.row_text(0).trim()));
        }
        self.draw_radical(&inner, None)
    }

    /// Layout an nth root
    fn layout_root(&self, base: &MathNode, index: &MathNode) -> MathBox {
        let radicand = self.layout_node(base);
        let index = self.layout_node(index);

        if radicand.height() <= 1 && index.height() <= 1 {
            let radicand_text = radicand.row_text(0);
            let index_text = index.row_text(0);
            let (radicand_text, index_text) = (radicand_text.trim(), index_text.trim());
            let text = match glyphs::compact_superscript(index_text, self.use_unicode) {
                Some(sup) => format!("{sup}√({radicand_text})"),
                None => format!("[{index_text}]√({radicand_text})"),
            };
            return MathBox::text(&text);
        }

        let index_text = index.flat_text();
        self.draw_radical(&radicand, Some(index_text.trim()))
    }

    /// Draw a radical sign around a multi-line radicand
    fn draw_radical(&self, radicand: &MathBox, index: Option<&str>) -> MathBox {
        let height = radical::radical_height(radicand.height());
        let mut sign = RadicalSign::new(height, radicand.width() + radical::OVERLINE_OVERHANG);
        let mut min_width = radicand.width() + RADICAL_PADDING;
        if let Some(index) = index {
            sign = sign.with_index(index);
            min_width += index.chars().count();
        }

        let width = sign.width().max(min_width);
        let height = sign.height().max(radicand.height() + 1);
        let mut result = MathBox::blank(width, height, radicand.baseline() + 1);
        for (y, row) in sign.rows().iter().enumerate() {
            result.write_str(0, y, row);
        }
        result.stamp(radicand, sign.content_x(), 1);
        result
    }

    /// Layout a table: rows centered on the widest, baseline mid-height
    fn layout_table(&self, rows: &[TableRow]) -> MathBox {
        if rows.is_empty() {
            return MathBox::empty();
        }

        let row_boxes: Vec<MathBox> = rows.iter().map(|r| self.layout_table_row(r)).collect();
        let where_gap = row_boxes
            .get(1)
            .is_some_and(|row| has_where_clause(&row.flat_text()));

        let spacer = MathBox::blank(0, 1, 0);
        let mut parts: Vec<&MathBox> = Vec::with_capacity(row_boxes.len() + 1);
        for (i, row) in row_boxes.iter().enumerate() {
            if i == 1 && where_gap {
                parts.push(&spacer);
            }
            parts.push(row);
        }

        let height: usize = parts.iter().map(|b| b.height()).sum();
        vertical_stack(&parts, 0, height / 2)
    }

    fn layout_table_row(&self, row: &TableRow) -> MathBox {
        let mut boxes = Vec::with_capacity(row.cells.len() * 2);
        for (i, cell) in row.cells.iter().enumerate() {
            if i > 0 {
                boxes.push(MathBox::text(CELL_GAP));
            }
            boxes.push(self.layout_table_cell(cell));
        }
        horizontal_concat(boxes)
    }

    fn layout_table_cell(&self, cell: &TableCell) -> MathBox {
        let content = self.layout_sequence(&cell.children);
        if !content.is_empty() {
            return content;
        }
        cell.text.as_deref().map(MathBox::text).unwrap_or_default()
    }

    /// Layout a fenced group with separators between non-empty children
    fn layout_fenced(
        &self,
        open: &str,
        close: &str,
        separators: &str,
        children: &[MathNode],
    ) -> MathBox {
        let mut boxes = Vec::new();
        for child in children {
            let child_box = self.layout_node(child);
            if child_box.is_empty() {
                continue;
            }
            if !boxes.is_empty() && !separators.is_empty() {
                boxes.push(MathBox::text(separators));
            }
            boxes.push(child_box);
        }
        let content = horizontal_concat(boxes);

        if content.height() <= 1 {
            return MathBox::text(&format!("{open}{}{close}", content.row_text(0)));
        }

        // cases notation: an opening brace only pairs with a closing brace
        let close = if open == "{" && close != "}" { "" } else { close };
        self.draw_delimiters(&content, open, close)
    }

    /// Surround multi-line content with extensible delimiter columns
    fn draw_delimiters(&self, content: &MathBox, open: &str, close: &str) -> MathBox {
        let height = content.height();
        let left = fence::delimiter_column(open, height, Side::Left);
        let right = fence::delimiter_column(close, height, Side::Right);

        let left_width = usize::from(!left.is_empty());
        let width = left_width + content.width() + usize::from(!right.is_empty());
        let mut result = MathBox::blank(width, height, content.baseline());

        for (y, &c) in left.iter().enumerate() {
            result.set(0, y, c);
        }
        result.stamp(content, left_width, 0);
        for (y, &c) in right.iter().enumerate() {
            result.set(width - 1, y, c);
        }
        result
    }
}

/// Trimmed text, or `None` when it is missing or blank
fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

// =============================================================================
// Tests
// =============================================================================
