//! Character-grid box, the unit of composition for the layout engine

use crate::model::symbols;
use serde::Serialize;

/// Blank cell value
pub const BLANK: char = ' ';

/// A rectangular grid of characters with a declared baseline row
///
/// ```text
///            ┌──────┐
///            │  a   │   row 0
/// baseline → │ ──── │   row 1
///            │ b+c  │   row 2
///            └──────┘
///             width 4
/// ```
///
/// `content` always holds exactly `height` rows of `width` cells and
/// `baseline < height` whenever `height > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MathBox {
    width: usize,
    height: usize,
    baseline: usize,
    content: Vec<Vec<char>>,
}

impl MathBox {
    /// The canonical empty box (0×0)
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            baseline: 0,
            content: Vec::new(),
        }
    }

    /// Create a blank grid of the given size.
    ///
    /// A baseline past the last row is clamped onto it.
    pub fn blank(width: usize, height: usize, baseline: usize) -> Self {
        Self {
            width,
            height,
            baseline: baseline.min(height.saturating_sub(1)),
            content: vec![vec![BLANK; width]; height],
        }
    }

    /// Single-row box holding `text`, one cell per character
    pub fn text(text: &str) -> Self {
        let row: Vec<char> = text.chars().collect();
        if row.is_empty() {
            return Self::empty();
        }
        Self {
            width: row.len(),
            height: 1,
            baseline: 0,
            content: vec![row],
        }
    }

    /// A 1×1 box holding `?`, used where a construct is malformed
    pub fn placeholder() -> Self {
        Self::text(&symbols::PLACEHOLDER.to_string())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn baseline(&self) -> usize {
        self.baseline
    }

    /// Rows below the baseline row, baseline row included
    pub fn depth(&self) -> usize {
        self.height - self.baseline
    }

    /// Boxes with no width or no height contribute nothing to composition
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True for a one-row box whose baseline is that row
    pub fn is_single_line(&self) -> bool {
        self.height == 1 && self.baseline == 0
    }

    /// Character at (x, y), or a blank outside the grid
    pub fn get(&self, x: usize, y: usize) -> char {
        self.content
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(BLANK)
    }

    /// Write a character; out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, c: char) {
        if let Some(cell) = self.content.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = c;
        }
    }

    /// Copy every non-blank cell of `other` with its top-left corner at (x, y)
    pub fn stamp(&mut self, other: &MathBox, x: usize, y: usize) {
        for (dy, row) in other.content.iter().enumerate() {
            for (dx, &c) in row.iter().enumerate() {
                if c != BLANK {
                    self.set(x + dx, y + dy, c);
                }
            }
        }
    }

    /// Write `text` left to right starting at (x, y), skipping blanks
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) {
        for (dx, c) in text.chars().enumerate() {
            if c != BLANK {
                self.set(x + dx, y, c);
            }
        }
    }

    /// Text of one row, or an empty string outside the grid
    pub fn row_text(&self, y: usize) -> String {
        self.content
            .get(y)
            .map(|row| row.iter().collect())
            .unwrap_or_default()
    }

    /// All rows concatenated without separators, for content heuristics
    pub fn flat_text(&self) -> String {
        self.content.iter().flatten().collect()
    }

    /// Flatten the grid to text lines joined by `\n`
    pub fn render(&self) -> String {
        self.content
            .iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for MathBox {
    fn default() -> Self {
        Self::empty()
    }
}
