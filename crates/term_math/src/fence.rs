//! Multi-row delimiter glyphs for fenced groups

/// Which side of the content a delimiter sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Top, middle and bottom pieces of an extensible delimiter
struct Pieces {
    top: char,
    middle: char,
    bottom: char,
}

fn paren(side: Side) -> Pieces {
    match side {
        Side::Left => Pieces {
            top: '⎛',
            middle: '⎜',
            bottom: '⎝',
        },
        Side::Right => Pieces {
            top: '⎞',
            middle: '⎟',
            bottom: '⎠',
        },
    }
}

fn bracket(side: Side) -> Pieces {
    match side {
        Side::Left => Pieces {
            top: '⎡',
            middle: '⎢',
            bottom: '⎣',
        },
        Side::Right => Pieces {
            top: '⎤',
            middle: '⎥',
            bottom: '⎦',
        },
    }
}

/// Cap, repeated filler, cap
fn extend(pieces: Pieces, height: usize) -> Vec<char> {
    let mut column = vec![pieces.middle; height];
    if let Some(first) = column.first_mut() {
        *first = pieces.top;
    }
    if let Some(last) = column.last_mut() {
        *last = pieces.bottom;
    }
    column
}

/// A brace: caps at both ends and the pointed middle piece halfway down
fn brace(side: Side, height: usize) -> Vec<char> {
    let (top, tip, filler, bottom, single) = match side {
        Side::Left => ('⎧', '⎨', '⎪', '⎩', '{'),
        Side::Right => ('⎫', '⎬', '⎪', '⎭', '}'),
    };
    match height {
        0 => Vec::new(),
        1 => vec![single],
        2 => vec![top, bottom],
        3 => vec![top, tip, bottom],
        _ => {
            let mut column = vec![filler; height];
            column[0] = top;
            column[height / 2] = tip;
            column[height - 1] = bottom;
            column
        }
    }
}

/// Glyph column for drawing `delimiter` across `height` rows.
///
/// An empty delimiter draws nothing, so the caller reserves no column.
/// Delimiters without an extensible form repeat their first character.
pub fn delimiter_column(delimiter: &str, height: usize, side: Side) -> Vec<char> {
    match delimiter {
        "" => Vec::new(),
        "{" | "}" => brace(side, height),
        "(" | ")" => extend(paren(side), height),
        "[" | "]" => extend(bracket(side), height),
        "|" => vec!['│'; height],
        _ => delimiter
            .chars()
            .next()
            .map(|c| vec![c; height])
            .unwrap_or_default(),
    }
}
