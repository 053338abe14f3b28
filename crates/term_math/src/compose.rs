//! Box Compositor - joining boxes side by side and on top of each other

use crate::math_box::MathBox;

/// Left offset that centers `inner` columns inside `outer` columns.
///
/// On odd differences the extra column goes to the right side.
pub fn center_offset(outer: usize, inner: usize) -> usize {
    outer.saturating_sub(inner) / 2
}

/// Concatenate boxes left to right, aligning their baselines.
///
/// Empty boxes are dropped first; zero or one remaining box is returned
/// unchanged. The result is tall enough for the deepest ascent plus the
/// deepest descent among the inputs.
pub fn horizontal_concat(boxes: Vec<MathBox>) -> MathBox {
    let mut boxes: Vec<MathBox> = boxes.into_iter().filter(|b| !b.is_empty()).collect();

    match boxes.len() {
        0 => return MathBox::empty(),
        1 => return boxes.remove(0),
        _ => {}
    }

    let width = boxes.iter().map(MathBox::width).sum();
    let baseline = boxes.iter().map(MathBox::baseline).max().unwrap_or(0);
    let depth = boxes.iter().map(MathBox::depth).max().unwrap_or(0);

    let mut result = MathBox::blank(width, baseline + depth, baseline);
    let mut x = 0;
    for b in &boxes {
        result.stamp(b, x, baseline - b.baseline());
        x += b.width();
    }
    result
}

/// Stack boxes top to bottom, each centered horizontally.
///
/// Every part keeps its own rows, including zero-width parts, which act as
/// blank spacer rows. The result is at least `min_width` wide.
pub fn vertical_stack(parts: &[&MathBox], min_width: usize, baseline: usize) -> MathBox {
    let width = parts
        .iter()
        .map(|b| b.width())
        .max()
        .unwrap_or(0)
        .max(min_width);
    let height = parts.iter().map(|b| b.height()).sum();

    let mut result = MathBox::blank(width, height, baseline);
    let mut y = 0;
    for part in parts {
        result.stamp(part, center_offset(width, part.width()), y);
        y += part.height();
    }
    result
}
