//! Backend-agnostic linear algebra for airframe.
//!
//! Operands are tagged as either concrete (`nalgebra` storage) or symbolic
//! (trees of [`Expr`]). Every operation inspects the tags and picks a backend
//! up front: all-numeric operands run on `nalgebra`, anything symbolic lifts
//! the numeric operands into constant expressions and runs on the symbolic
//! backend. Backend errors are reported, never used to switch backends.

pub mod error;
pub mod expr;
pub mod operand;
pub mod ops;

pub use error::{LinalgError, LinalgResult};
pub use expr::{Bindings, Expr};
pub use operand::{Backend, Matrix, Scalar, SymMatrix, Vector};
pub use ops::{inner, norm, outer, solve};
