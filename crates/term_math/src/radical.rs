//! Radical sign drawing for multi-line roots
//!
//! The sign is an overline plus a diagonal stroke that descends one column
//! per row to a small tail:
//!
//! ```text
//!      ⟋─────
//!     ╱  a
//!  _  ╱  ─
//!   \╱   b
//! ```
//!
//! Content sits one row below the overline, starting one column right of
//! the `⟋` corner.

/// Fewest rows a drawn radical may have
pub const MIN_HEIGHT: usize = 3;

/// Columns the overline extends past the content width
pub const OVERLINE_OVERHANG: usize = 4;

/// Rows needed to enclose a radicand of the given height
pub fn radical_height(radicand_height: usize) -> usize {
    (radicand_height + 1).max(MIN_HEIGHT)
}

/// A radical sign as text rows, with the column where content starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadicalSign {
    rows: Vec<String>,
    content_x: usize,
}

impl RadicalSign {
    /// Build a square root sign `height` rows tall with an overline of
    /// `overline` dashes.
    pub fn new(height: usize, overline: usize) -> Self {
        let height = height.max(MIN_HEIGHT);
        let mut rows = Vec::with_capacity(height);

        rows.push(format!("{}⟋{}", " ".repeat(height + 1), "─".repeat(overline)));
        for i in 1..height - 2 {
            rows.push(format!("{}╱  ", " ".repeat(height + 1 - i)));
        }
        rows.push("_  ╱  ".to_string());
        rows.push(" \\╱  ".to_string());

        Self {
            rows,
            content_x: height + 2,
        }
    }

    /// Attach a root index in front of the underscore row.
    ///
    /// Every other row is shifted right by the same amount so the block
    /// stays rectangular.
    pub fn with_index(mut self, index: &str) -> Self {
        let shift = index.chars().count() + 1;
        let index_row = self.index_row();
        for (y, row) in self.rows.iter_mut().enumerate() {
            *row = if y == index_row {
                format!(" {index}{row}")
            } else {
                format!("{}{row}", " ".repeat(shift))
            };
        }
        self.content_x += shift;
        self
    }

    /// The row carrying the underscore glyph
    pub fn index_row(&self) -> usize {
        self.rows.len() - 2
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row, in characters
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn content_x(&self) -> usize {
        self.content_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radical_height_minimum() {
        assert_eq!(radical_height(1), 3);
        assert_eq!(radical_height(2), 3);
        assert_eq!(radical_height(3), 4);
        assert_eq!(radical_height(6), 7);
    }

    #[test]
    fn test_minimal_sign_rows() {
        let sign = RadicalSign::new(3, 2);
        assert_eq!(sign.rows(), &["    ⟋──", "_  ╱  ", " \\╱  "]);
        assert_eq!(sign.content_x(), 5);
        assert_eq!(sign.index_row(), 1);
    }

    #[test]
    fn test_diagonal_descends_one_column_per_row() {
        let sign = RadicalSign::new(5, 1);
        let columns: Vec<usize> = sign
            .rows()
            .iter()
            .map(|r| r.chars().position(|c| c == '⟋' || c == '╱').unwrap())
            .collect();
        assert_eq!(columns, vec![6, 5, 4, 3, 2]);
        assert_eq!(sign.content_x(), 7);
    }

    #[test]
    fn test_index_row_and_padding() {
        let sign = RadicalSign::new(4, 3).with_index("5");
        assert_eq!(sign.rows()[2], " 5_  ╱  ");
        assert_eq!(sign.rows()[1], "      ╱  ");
        assert_eq!(sign.rows()[0], "       ⟋───");
        // index "5" plus its leading blank shifts the content by two
        assert_eq!(sign.content_x(), 8);
    }

    #[test]
    fn test_width_counts_characters() {
        let sign = RadicalSign::new(3, 4);
        assert_eq!(sign.width(), 9);
    }
}
