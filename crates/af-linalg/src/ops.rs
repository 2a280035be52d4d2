//! `inner`, `outer`, `solve`, `norm` with deterministic backend dispatch.

use crate::error::{LinalgError, LinalgResult};
use crate::expr::Expr;
use crate::operand::{Backend, Matrix, Scalar, SymMatrix, Vector};
use tracing::debug;

fn check_same_len(op: &'static str, x: &Vector, y: &Vector) -> LinalgResult<()> {
    if x.len() != y.len() {
        return Err(LinalgError::ShapeMismatch {
            op,
            left: (x.len(), 1),
            right: (y.len(), 1),
        });
    }
    Ok(())
}

/// Inner product of two vectors.
pub fn inner(x: &Vector, y: &Vector) -> LinalgResult<Scalar> {
    check_same_len("inner", x, y)?;
    let backend = Backend::select(&[x.backend(), y.backend()]);
    debug!(op = "inner", backend = backend.label());
    match (backend, x, y) {
        (Backend::Numeric, Vector::Numeric(a), Vector::Numeric(b)) => Ok(Scalar::Numeric(a.dot(b))),
        _ => {
            // x^T @ y with x promoted to a column
            let xt = SymMatrix::column(x.to_exprs()).transpose();
            let product = xt.matmul(&SymMatrix::column(y.to_exprs()))?;
            Ok(Scalar::Symbolic(product.get(0, 0).clone()))
        }
    }
}

/// Outer product of two vectors: shape `(len x, len y)`.
pub fn outer(x: &Vector, y: &Vector) -> LinalgResult<Matrix> {
    let backend = Backend::select(&[x.backend(), y.backend()]);
    debug!(op = "outer", backend = backend.label());
    match (backend, x, y) {
        (Backend::Numeric, Vector::Numeric(a), Vector::Numeric(b)) => {
            Ok(Matrix::Numeric(a * b.transpose()))
        }
        _ => {
            // x @ y^T with y promoted to a column
            let yt = SymMatrix::column(y.to_exprs()).transpose();
            let product = SymMatrix::column(x.to_exprs()).matmul(&yt)?;
            Ok(Matrix::Symbolic(product))
        }
    }
}

/// Solve `A x = b` for `x`.
pub fn solve(a: &Matrix, b: &Vector) -> LinalgResult<Vector> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare {
            op: "solve",
            rows,
            cols,
        });
    }
    if b.len() != rows {
        return Err(LinalgError::ShapeMismatch {
            op: "solve",
            left: (rows, cols),
            right: (b.len(), 1),
        });
    }

    let backend = Backend::select(&[a.backend(), b.backend()]);
    debug!(op = "solve", backend = backend.label(), n = rows);
    match (backend, a, b) {
        (Backend::Numeric, Matrix::Numeric(m), Vector::Numeric(rhs)) => {
            let x = m
                .clone()
                .lu()
                .solve(rhs)
                .ok_or(LinalgError::Singular { backend: "numeric" })?;
            if x.iter().any(|v| !v.is_finite()) {
                return Err(LinalgError::Singular { backend: "numeric" });
            }
            Ok(Vector::Numeric(x))
        }
        _ => {
            let x = symbolic_gauss(a.to_symbolic().into_rows(), b.to_exprs())?;
            Ok(Vector::Symbolic(x))
        }
    }
}

/// Euclidean norm of a vector.
pub fn norm(x: &Vector) -> LinalgResult<Scalar> {
    debug!(op = "norm", backend = x.backend().label());
    match x {
        Vector::Numeric(v) => Ok(Scalar::Numeric(v.norm())),
        Vector::Symbolic(v) => {
            let sum_sq = v.iter().fold(Expr::zero(), |acc, e| acc + e * e);
            Ok(Scalar::Symbolic(sum_sq.sqrt()))
        }
    }
}

/// Gaussian elimination over expressions.
///
/// Pivots on the first remaining row whose entry is not structurally zero.
/// The result is exact for every binding where the chosen pivots evaluate to
/// nonzero values.
fn symbolic_gauss(mut a: Vec<Vec<Expr>>, mut b: Vec<Expr>) -> LinalgResult<Vec<Expr>> {
    let n = b.len();

    for k in 0..n {
        let pivot_row = (k..n)
            .find(|&r| !a[r][k].is_zero())
            .ok_or(LinalgError::Singular {
                backend: "symbolic",
            })?;
        if pivot_row != k {
            a.swap(k, pivot_row);
            b.swap(k, pivot_row);
        }

        let pivot = a[k][k].clone();
        for r in (k + 1)..n {
            if a[r][k].is_zero() {
                continue;
            }
            let factor = &a[r][k] / &pivot;
            for c in k..n {
                let updated = &a[r][c] - &(&factor * &a[k][c]);
                a[r][c] = updated;
            }
            let updated = &b[r] - &(&factor * &b[k]);
            b[r] = updated;
        }
    }

    let mut x = vec![Expr::zero(); n];
    for k in (0..n).rev() {
        let mut acc = b[k].clone();
        for c in (k + 1)..n {
            acc = acc - &a[k][c] * &x[c];
        }
        x[k] = acc / a[k][k].clone();
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Bindings;
    use nalgebra::{DMatrix, DVector};

    fn bind(pairs: &[(&str, f64)]) -> Bindings {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn inner_numeric() {
        let x = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let y = Vector::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(inner(&x, &y).unwrap(), Scalar::Numeric(32.0));
    }

    #[test]
    fn inner_mixed_goes_symbolic() {
        let x = Vector::variables("x", 2);
        let y = Vector::from_slice(&[2.0, 3.0]);
        let r = inner(&x, &y).unwrap();
        assert_eq!(r.backend(), Backend::Symbolic);
        let v = r.eval(&bind(&[("x0", 1.0), ("x1", 10.0)])).unwrap();
        assert_eq!(v, 32.0);
    }

    #[test]
    fn inner_rejects_mismatched_lengths() {
        let x = Vector::from_slice(&[1.0, 2.0]);
        let y = Vector::from_slice(&[1.0]);
        assert!(matches!(
            inner(&x, &y),
            Err(LinalgError::ShapeMismatch { op: "inner", .. })
        ));
    }

    #[test]
    fn outer_numeric_shape() {
        let x = Vector::from_slice(&[1.0, 2.0]);
        let y = Vector::from_slice(&[3.0, 4.0, 5.0]);
        let m = outer(&x, &y).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.as_numeric().unwrap()[(1, 2)], 10.0);
    }

    #[test]
    fn outer_symbolic_entries() {
        let x = Vector::variables("x", 2);
        let y = Vector::from_slice(&[3.0, 4.0, 5.0]);
        let m = outer(&x, &y).unwrap();
        assert_eq!(m.shape(), (2, 3));
        let values = m.eval(&bind(&[("x0", 1.0), ("x1", 2.0)])).unwrap();
        assert_eq!(values, DMatrix::from_row_slice(2, 3, &[3.0, 4.0, 5.0, 6.0, 8.0, 10.0]));
    }

    #[test]
    fn solve_numeric_known_system() {
        let a = Matrix::Numeric(DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]));
        let b = Vector::from_slice(&[3.0, 5.0]);
        let x = solve(&a, &b).unwrap();
        let x = x.as_numeric().unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn solve_numeric_singular_is_an_error() {
        let a = Matrix::Numeric(DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]));
        let b = Vector::from_slice(&[1.0, 2.0]);
        assert_eq!(
            solve(&a, &b).unwrap_err(),
            LinalgError::Singular { backend: "numeric" }
        );
    }

    #[test]
    fn solve_symbolic_rhs_matches_numeric() {
        let m = DMatrix::from_row_slice(3, 3, &[4.0, -2.0, 1.0, -2.0, 4.0, -2.0, 1.0, -2.0, 4.0]);
        let a = Matrix::Numeric(m.clone());
        let b = Vector::variables("b", 3);
        let x = solve(&a, &b).unwrap();

        let bindings = bind(&[("b0", 11.0), ("b1", -16.0), ("b2", 17.0)]);
        let symbolic = x.eval(&bindings).unwrap();
        let numeric = m.lu().solve(&DVector::from_vec(vec![11.0, -16.0, 17.0])).unwrap();
        assert!((symbolic - numeric).norm() < 1e-10);
    }

    #[test]
    fn solve_symbolic_matrix_needs_row_swap() {
        // Leading entry is structurally zero: elimination must swap rows.
        let data = vec![
            Expr::zero(),
            Expr::var("p"),
            Expr::var("q"),
            Expr::constant(1.0),
        ];
        let a = Matrix::Symbolic(SymMatrix::new(2, 2, data).unwrap());
        let b = Vector::from_slice(&[2.0, 3.0]);
        let x = solve(&a, &b).unwrap();
        let v = x.eval(&bind(&[("p", 2.0), ("q", 1.0)])).unwrap();
        // 2*x1 = 2, x0 + x1 = 3
        assert!((v[1] - 1.0).abs() < 1e-12);
        assert!((v[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn solve_symbolic_structurally_singular() {
        let a = Matrix::Symbolic(SymMatrix::new(2, 2, vec![Expr::zero(); 4]).unwrap());
        let b = Vector::variables("b", 2);
        assert_eq!(
            solve(&a, &b).unwrap_err(),
            LinalgError::Singular {
                backend: "symbolic"
            }
        );
    }

    #[test]
    fn solve_checks_shapes() {
        let a = Matrix::Numeric(DMatrix::zeros(2, 3));
        let b = Vector::from_slice(&[1.0, 2.0]);
        assert!(matches!(solve(&a, &b), Err(LinalgError::NotSquare { .. })));

        let a = Matrix::Numeric(DMatrix::identity(2, 2));
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert!(matches!(solve(&a, &b), Err(LinalgError::ShapeMismatch { .. })));
    }

    #[test]
    fn norm_both_backends() {
        let x = Vector::from_slice(&[3.0, 4.0]);
        assert_eq!(norm(&x).unwrap(), Scalar::Numeric(5.0));

        let s = norm(&Vector::variables("v", 2)).unwrap();
        let v = s.eval(&bind(&[("v0", 3.0), ("v1", 4.0)])).unwrap();
        assert!((v - 5.0).abs() < 1e-12);
    }
}
