//! Math AST - the presentation-markup tree consumed by the layout engine
//!
//! The tree mirrors MathML presentation elements. It is produced by the
//! ingestion adapter (`mathml_parser`) or built directly with the
//! constructors below; the layout engine only ever borrows it.

use serde::{Deserialize, Serialize};

// =============================================================================
// Math Node - Core AST
// =============================================================================

/// A node in the math expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MathNode {
    // Containers
    /// Horizontal group (`mrow`, `math`, `mstyle`)
    Row {
        /// Raw text before the first child
        leading: Option<String>,
        children: Vec<RowChild>,
    },

    // Tokens
    /// Identifier (`mi`)
    Identifier(String),
    /// Number (`mn`)
    Number(String),
    /// Text embedded in math (`mtext`, `ms`)
    Text(String),
    /// Operator (`mo`)
    Operator {
        text: String,
        /// Explicitly flagged `form="prefix"`
        prefix: bool,
    },
    /// Blank space (`mspace`)
    Space,

    // Structures
    /// Fraction: numerator over denominator
    Fraction {
        num: Box<MathNode>,
        den: Box<MathNode>,
        bar_visible: bool,
    },
    /// Subscript
    Subscript {
        base: Box<MathNode>,
        sub: Box<MathNode>,
    },
    /// Superscript
    Superscript {
        base: Box<MathNode>,
        sup: Box<MathNode>,
    },
    /// Combined subscript and superscript
    SubSuperscript {
        base: Box<MathNode>,
        sub: Box<MathNode>,
        sup: Box<MathNode>,
    },
    /// Expression with a limit or accent underneath (`munder`)
    Under {
        base: Box<MathNode>,
        under: Box<MathNode>,
    },
    /// Expression with an accent above (`mover`)
    Over {
        base: Box<MathNode>,
        over: Box<MathNode>,
    },
    /// Expression with limits below and above (`munderover`)
    UnderOver {
        base: Box<MathNode>,
        under: Box<MathNode>,
        over: Box<MathNode>,
    },
    /// Square root over an implicit row of children
    Sqrt(Vec<MathNode>),
    /// Nth root
    Root {
        base: Box<MathNode>,
        index: Box<MathNode>,
    },
    /// Table (`mtable`)
    Table(Vec<TableRow>),
    /// A table row appearing outside a table
    TableRow(TableRow),
    /// A table cell appearing outside a row
    TableCell(TableCell),
    /// Fenced group (`mfenced`)
    Fenced {
        open: String,
        close: String,
        separators: String,
        children: Vec<MathNode>,
    },
    /// Takes up the space of its content but draws nothing
    Phantom(Box<MathNode>),
    /// A construct given the wrong number of children
    Malformed {
        tag: String,
        children: usize,
    },
    /// Unrecognized element, preserved with its content
    Unknown {
        tag: String,
        children: Vec<MathNode>,
        text: String,
    },
}

/// A child of a row together with the raw text that follows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChild {
    pub node: MathNode,
    pub tail: Option<String>,
}

impl RowChild {
    pub fn new(node: MathNode) -> Self {
        Self { node, tail: None }
    }

    pub fn with_tail(node: MathNode, tail: impl Into<String>) -> Self {
        Self {
            node,
            tail: Some(tail.into()),
        }
    }
}

/// A table row: a sequence of cells
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

/// A table cell: element children, or raw text when it has none
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    pub children: Vec<MathNode>,
    pub text: Option<String>,
}

impl TableCell {
    pub fn new(children: Vec<MathNode>) -> Self {
        Self {
            children,
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            children: Vec::new(),
            text: Some(text.into()),
        }
    }
}

impl MathNode {
    /// Create a row from nodes without interleaved text
    pub fn row(children: Vec<MathNode>) -> Self {
        MathNode::Row {
            leading: None,
            children: children.into_iter().map(RowChild::new).collect(),
        }
    }

    /// Create an identifier
    pub fn identifier(text: impl Into<String>) -> Self {
        MathNode::Identifier(text.into())
    }

    /// Create a number
    pub fn number(n: impl Into<String>) -> Self {
        MathNode::Number(n.into())
    }

    /// Create embedded text
    pub fn text(text: impl Into<String>) -> Self {
        MathNode::Text(text.into())
    }

    /// Create an operator
    pub fn operator(text: impl Into<String>) -> Self {
        MathNode::Operator {
            text: text.into(),
            prefix: false,
        }
    }

    /// Create an operator flagged `form="prefix"`
    pub fn prefix_operator(text: impl Into<String>) -> Self {
        MathNode::Operator {
            text: text.into(),
            prefix: true,
        }
    }

    /// Create a fraction
    pub fn fraction(num: MathNode, den: MathNode) -> Self {
        MathNode::Fraction {
            num: Box::new(num),
            den: Box::new(den),
            bar_visible: true,
        }
    }

    /// Create a fraction without visible bar (stacked)
    pub fn stacked(num: MathNode, den: MathNode) -> Self {
        MathNode::Fraction {
            num: Box::new(num),
            den: Box::new(den),
            bar_visible: false,
        }
    }

    /// Create a subscript
    pub fn subscript(base: MathNode, sub: MathNode) -> Self {
        MathNode::Subscript {
            base: Box::new(base),
            sub: Box::new(sub),
        }
    }

    /// Create a superscript
    pub fn superscript(base: MathNode, sup: MathNode) -> Self {
        MathNode::Superscript {
            base: Box::new(base),
            sup: Box::new(sup),
        }
    }

    /// Create combined sub/superscript
    pub fn sub_superscript(base: MathNode, sub: MathNode, sup: MathNode) -> Self {
        MathNode::SubSuperscript {
            base: Box::new(base),
            sub: Box::new(sub),
            sup: Box::new(sup),
        }
    }

    pub fn under(base: MathNode, under: MathNode) -> Self {
        MathNode::Under {
            base: Box::new(base),
            under: Box::new(under),
        }
    }

    pub fn over(base: MathNode, over: MathNode) -> Self {
        MathNode::Over {
            base: Box::new(base),
            over: Box::new(over),
        }
    }

    pub fn under_over(base: MathNode, under: MathNode, over: MathNode) -> Self {
        MathNode::UnderOver {
            base: Box::new(base),
            under: Box::new(under),
            over: Box::new(over),
        }
    }

    /// Create a square root
    pub fn sqrt(base: MathNode) -> Self {
        MathNode::Sqrt(vec![base])
    }

    /// Create an nth root
    pub fn root(base: MathNode, index: MathNode) -> Self {
        MathNode::Root {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    /// Create a table from rows of cells
    pub fn table(rows: Vec<Vec<MathNode>>) -> Self {
        MathNode::Table(
            rows.into_iter()
                .map(|cells| TableRow::new(cells.into_iter().map(|c| TableCell::new(vec![c])).collect()))
                .collect(),
        )
    }

    /// Create a fenced group
    pub fn fenced(
        open: impl Into<String>,
        close: impl Into<String>,
        separators: impl Into<String>,
        children: Vec<MathNode>,
    ) -> Self {
        MathNode::Fenced {
            open: open.into(),
            close: close.into(),
            separators: separators.into(),
            children,
        }
    }

    /// Create parentheses around content, with no separators
    pub fn parens(children: Vec<MathNode>) -> Self {
        Self::fenced("(", ")", "", children)
    }

    /// Create an opening brace (cases notation) around content
    pub fn cases(children: Vec<MathNode>) -> Self {
        Self::fenced("{", "", "", children)
    }

    /// Check if this node is a fraction
    pub fn is_fraction(&self) -> bool {
        matches!(self, MathNode::Fraction { .. })
    }

    /// Check if this node stacks limits or accents around a base
    pub fn is_limit_construct(&self) -> bool {
        matches!(
            self,
            MathNode::SubSuperscript { .. }
                | MathNode::Under { .. }
                | MathNode::Over { .. }
                | MathNode::UnderOver { .. }
        )
    }
}

// =============================================================================
// Common Math Symbols
// =============================================================================

/// Characters the layout engine treats specially
pub mod symbols {
    pub const SUM: char = '\u{2211}';
    pub const SQUARE_ROOT: char = '\u{221A}';
    pub const FRACTION_RULE: char = '\u{2500}';
    pub const PLACEHOLDER: char = '?';
}

// =============================================================================
// Tests
// =============================================================================
