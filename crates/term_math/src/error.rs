//! Error types for the term_math crate

use thiserror::Error;

/// Errors that can occur while ingesting or configuring math rendering
#[derive(Error, Debug)]
pub enum MathError {
    /// The markup is not a self-contained MathML document
    #[error("MathML parsing error: {0}")]
    Parse(String),

    /// XML error from quick-xml
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Render configuration could not be decoded
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for math operations
pub type MathResult<T> = Result<T, MathError>;
