//! Error types for linear algebra operations.

use thiserror::Error;

/// Errors that can occur in the dispatch shim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("Shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Matrix must be square for {op}, got {rows}x{cols}")]
    NotSquare {
        op: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("Singular system in {backend} solve")]
    Singular { backend: &'static str },

    #[error("Unbound variable: {name}")]
    UnboundVariable { name: String },

    #[error("Non-finite result while evaluating {what}")]
    NonFinite { what: &'static str },
}

pub type LinalgResult<T> = Result<T, LinalgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LinalgError::ShapeMismatch {
            op: "inner",
            left: (3, 1),
            right: (2, 1),
        };
        assert!(err.to_string().contains("inner"));

        let err = LinalgError::UnboundVariable { name: "x0".into() };
        assert!(err.to_string().contains("x0"));
    }
}
