//! Tagged operands for the dispatch shim.

use crate::error::{LinalgError, LinalgResult};
use crate::expr::{Bindings, Expr};
use nalgebra::{DMatrix, DVector};

/// Which backend an operation runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Numeric,
    Symbolic,
}

impl Backend {
    /// Numeric only when every operand is numeric.
    pub fn select(backends: &[Backend]) -> Backend {
        if backends.iter().all(|b| *b == Backend::Numeric) {
            Backend::Numeric
        } else {
            Backend::Symbolic
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Backend::Numeric => "numeric",
            Backend::Symbolic => "symbolic",
        }
    }
}

/// Scalar result of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Numeric(f64),
    Symbolic(Expr),
}

impl Scalar {
    pub fn backend(&self) -> Backend {
        match self {
            Scalar::Numeric(_) => Backend::Numeric,
            Scalar::Symbolic(_) => Backend::Symbolic,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Scalar::Numeric(v) => Some(*v),
            Scalar::Symbolic(_) => None,
        }
    }

    pub fn eval(&self, bindings: &Bindings) -> LinalgResult<f64> {
        match self {
            Scalar::Numeric(v) => Ok(*v),
            Scalar::Symbolic(e) => e.eval(bindings),
        }
    }
}

/// One-dimensional operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Numeric(DVector<f64>),
    Symbolic(Vec<Expr>),
}

impl Vector {
    pub fn from_slice(values: &[f64]) -> Self {
        Vector::Numeric(DVector::from_column_slice(values))
    }

    /// Vector of fresh variables named `{prefix}0`, `{prefix}1`, ...
    pub fn variables(prefix: &str, len: usize) -> Self {
        Vector::Symbolic((0..len).map(|i| Expr::var(format!("{prefix}{i}"))).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Vector::Numeric(v) => v.len(),
            Vector::Symbolic(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn backend(&self) -> Backend {
        match self {
            Vector::Numeric(_) => Backend::Numeric,
            Vector::Symbolic(_) => Backend::Symbolic,
        }
    }

    pub fn as_numeric(&self) -> Option<&DVector<f64>> {
        match self {
            Vector::Numeric(v) => Some(v),
            Vector::Symbolic(_) => None,
        }
    }

    /// Entries as expressions; numeric entries become constants.
    pub fn to_exprs(&self) -> Vec<Expr> {
        match self {
            Vector::Numeric(v) => v.iter().map(|x| Expr::Const(*x)).collect(),
            Vector::Symbolic(v) => v.clone(),
        }
    }

    pub fn eval(&self, bindings: &Bindings) -> LinalgResult<DVector<f64>> {
        match self {
            Vector::Numeric(v) => Ok(v.clone()),
            Vector::Symbolic(v) => {
                let values = v
                    .iter()
                    .map(|e| e.eval(bindings))
                    .collect::<LinalgResult<Vec<_>>>()?;
                Ok(DVector::from_vec(values))
            }
        }
    }
}

impl From<DVector<f64>> for Vector {
    fn from(v: DVector<f64>) -> Self {
        Vector::Numeric(v)
    }
}

impl From<Vec<Expr>> for Vector {
    fn from(v: Vec<Expr>) -> Self {
        Vector::Symbolic(v)
    }
}

/// Dense row-major matrix of expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct SymMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Expr>,
}

impl SymMatrix {
    pub fn new(rows: usize, cols: usize, data: Vec<Expr>) -> LinalgResult<Self> {
        if data.len() != rows * cols {
            return Err(LinalgError::ShapeMismatch {
                op: "SymMatrix::new",
                left: (rows, cols),
                right: (data.len(), 1),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> Expr) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Promote a one-dimensional operand to an `n x 1` column.
    pub fn column(entries: Vec<Expr>) -> Self {
        let rows = entries.len();
        Self {
            rows,
            cols: 1,
            data: entries,
        }
    }

    pub fn from_numeric(m: &DMatrix<f64>) -> Self {
        Self::from_fn(m.nrows(), m.ncols(), |i, j| Expr::Const(m[(i, j)]))
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, i: usize, j: usize) -> &Expr {
        &self.data[i * self.cols + j]
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self.get(j, i).clone())
    }

    pub fn matmul(&self, rhs: &SymMatrix) -> LinalgResult<SymMatrix> {
        if self.cols != rhs.rows {
            return Err(LinalgError::ShapeMismatch {
                op: "matmul",
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(Self::from_fn(self.rows, rhs.cols, |i, j| {
            (0..self.cols).fold(Expr::zero(), |acc, k| {
                acc + self.get(i, k) * rhs.get(k, j)
            })
        }))
    }

    pub fn into_rows(self) -> Vec<Vec<Expr>> {
        let cols = self.cols;
        let mut rows = Vec::with_capacity(self.rows);
        let mut it = self.data.into_iter();
        for _ in 0..self.rows {
            rows.push(it.by_ref().take(cols).collect());
        }
        rows
    }

    pub fn eval(&self, bindings: &Bindings) -> LinalgResult<DMatrix<f64>> {
        let values = self
            .data
            .iter()
            .map(|e| e.eval(bindings))
            .collect::<LinalgResult<Vec<_>>>()?;
        Ok(DMatrix::from_row_slice(self.rows, self.cols, &values))
    }
}

/// Two-dimensional operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix {
    Numeric(DMatrix<f64>),
    Symbolic(SymMatrix),
}

impl Matrix {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Numeric(m) => (m.nrows(), m.ncols()),
            Matrix::Symbolic(m) => m.shape(),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Matrix::Numeric(_) => Backend::Numeric,
            Matrix::Symbolic(_) => Backend::Symbolic,
        }
    }

    pub fn as_numeric(&self) -> Option<&DMatrix<f64>> {
        match self {
            Matrix::Numeric(m) => Some(m),
            Matrix::Symbolic(_) => None,
        }
    }

    pub fn to_symbolic(&self) -> SymMatrix {
        match self {
            Matrix::Numeric(m) => SymMatrix::from_numeric(m),
            Matrix::Symbolic(m) => m.clone(),
        }
    }

    pub fn eval(&self, bindings: &Bindings) -> LinalgResult<DMatrix<f64>> {
        match self {
            Matrix::Numeric(m) => Ok(m.clone()),
            Matrix::Symbolic(m) => m.eval(bindings),
        }
    }
}

impl From<DMatrix<f64>> for Matrix {
    fn from(m: DMatrix<f64>) -> Self {
        Matrix::Numeric(m)
    }
}

impl From<SymMatrix> for Matrix {
    fn from(m: SymMatrix) -> Self {
        Matrix::Symbolic(m)
    }
}
