//! Symbolic scalar expressions.

use crate::error::{LinalgError, LinalgResult};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// Variable assignments used to evaluate an expression.
pub type Bindings = BTreeMap<String, f64>;

/// Scalar expression tree.
///
/// Children are shared through `Arc` so elimination steps that reuse a
/// sub-expression many times stay cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(String),
    Add(Arc<Expr>, Arc<Expr>),
    Sub(Arc<Expr>, Arc<Expr>),
    Mul(Arc<Expr>, Arc<Expr>),
    Div(Arc<Expr>, Arc<Expr>),
    Neg(Arc<Expr>),
    Sqrt(Arc<Expr>),
}

impl Expr {
    pub fn constant(v: f64) -> Self {
        Expr::Const(v)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn zero() -> Self {
        Expr::Const(0.0)
    }

    pub fn one() -> Self {
        Expr::Const(1.0)
    }

    /// True only for the literal constant zero.
    ///
    /// An expression that merely evaluates to zero for some bindings is not
    /// structurally zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 1.0)
    }

    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(c) => Some(*c),
            _ => None,
        }
    }

    pub fn sum(a: Expr, b: Expr) -> Expr {
        match (&a, &b) {
            (Expr::Const(x), Expr::Const(y)) => Expr::Const(x + y),
            _ if a.is_zero() => b,
            _ if b.is_zero() => a,
            _ => Expr::Add(Arc::new(a), Arc::new(b)),
        }
    }

    pub fn difference(a: Expr, b: Expr) -> Expr {
        match (&a, &b) {
            (Expr::Const(x), Expr::Const(y)) => Expr::Const(x - y),
            _ if b.is_zero() => a,
            _ if a.is_zero() => Expr::negate(b),
            _ => Expr::Sub(Arc::new(a), Arc::new(b)),
        }
    }

    pub fn product(a: Expr, b: Expr) -> Expr {
        match (&a, &b) {
            (Expr::Const(x), Expr::Const(y)) => Expr::Const(x * y),
            _ if a.is_zero() || b.is_zero() => Expr::zero(),
            _ if a.is_one() => b,
            _ if b.is_one() => a,
            _ => Expr::Mul(Arc::new(a), Arc::new(b)),
        }
    }

    pub fn quotient(a: Expr, b: Expr) -> Expr {
        match (&a, &b) {
            (Expr::Const(x), Expr::Const(y)) if *y != 0.0 => Expr::Const(x / y),
            _ if b.is_one() => a,
            _ if a.is_zero() && !b.is_zero() => Expr::zero(),
            _ => Expr::Div(Arc::new(a), Arc::new(b)),
        }
    }

    pub fn negate(a: Expr) -> Expr {
        match a {
            Expr::Const(x) => Expr::Const(-x),
            Expr::Neg(inner) => Arc::unwrap_or_clone(inner),
            other => Expr::Neg(Arc::new(other)),
        }
    }

    pub fn sqrt(self) -> Expr {
        match self {
            Expr::Const(x) if x >= 0.0 => Expr::Const(x.sqrt()),
            other => Expr::Sqrt(Arc::new(other)),
        }
    }

    /// Evaluate with the given variable bindings.
    pub fn eval(&self, bindings: &Bindings) -> LinalgResult<f64> {
        let v = self.eval_raw(bindings)?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(LinalgError::NonFinite { what: "expression" })
        }
    }

    fn eval_raw(&self, bindings: &Bindings) -> LinalgResult<f64> {
        Ok(match self {
            Expr::Const(c) => *c,
            Expr::Var(name) => {
                *bindings
                    .get(name)
                    .ok_or_else(|| LinalgError::UnboundVariable { name: name.clone() })?
            }
            Expr::Add(a, b) => a.eval_raw(bindings)? + b.eval_raw(bindings)?,
            Expr::Sub(a, b) => a.eval_raw(bindings)? - b.eval_raw(bindings)?,
            Expr::Mul(a, b) => a.eval_raw(bindings)? * b.eval_raw(bindings)?,
            Expr::Div(a, b) => a.eval_raw(bindings)? / b.eval_raw(bindings)?,
            Expr::Neg(a) => -a.eval_raw(bindings)?,
            Expr::Sqrt(a) => a.eval_raw(bindings)?.sqrt(),
        })
    }

    /// Names of all free variables, sorted.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.collect_variables(out);
                b.collect_variables(out);
            }
            Expr::Neg(a) | Expr::Sqrt(a) => a.collect_variables(out),
        }
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Const(v)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{c}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "({a} * {b})"),
            Expr::Div(a, b) => write!(f, "({a} / {b})"),
            Expr::Neg(a) => write!(f, "-{a}"),
            Expr::Sqrt(a) => write!(f, "sqrt({a})"),
        }
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $ctor:ident) => {
        impl $trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::$ctor(self, rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                Expr::$ctor(self.clone(), rhs.clone())
            }
        }

        impl $trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                Expr::$ctor(self, Expr::Const(rhs))
            }
        }
    };
}

impl_binop!(Add, add, sum);
impl_binop!(Sub, sub, difference);
impl_binop!(Mul, mul, product);
impl_binop!(Div, div, quotient);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::negate(self)
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::negate(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(pairs: &[(&str, f64)]) -> Bindings {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn constants_fold() {
        let e = Expr::constant(2.0) * Expr::constant(3.0) + Expr::constant(1.0);
        assert_eq!(e, Expr::Const(7.0));
    }

    #[test]
    fn identities_simplify() {
        let x = Expr::var("x");
        assert_eq!(&x * &Expr::one(), x);
        assert_eq!(&x + &Expr::zero(), x);
        assert!((&x * &Expr::zero()).is_zero());
        assert_eq!(-(-x.clone()), x);
    }

    #[test]
    fn eval_with_bindings() {
        let x = Expr::var("x");
        let y = Expr::var("y");
        let e = (&x * &x + &y * &y).sqrt();
        let v = e.eval(&bind(&[("x", 3.0), ("y", 4.0)])).unwrap();
        assert!((v - 5.0).abs() < 1e-12);
    }

    #[test]
    fn eval_reports_unbound() {
        let e = Expr::var("a") + Expr::var("b");
        let err = e.eval(&bind(&[("a", 1.0)])).unwrap_err();
        assert_eq!(err, LinalgError::UnboundVariable { name: "b".into() });
    }

    #[test]
    fn eval_rejects_division_by_zero() {
        let e = Expr::one() / Expr::var("x");
        assert!(matches!(
            e.eval(&bind(&[("x", 0.0)])),
            Err(LinalgError::NonFinite { .. })
        ));
    }

    #[test]
    fn display_and_variables() {
        let e = Expr::var("b") * 2.0 - Expr::var("a");
        assert_eq!(e.to_string(), "((b * 2) - a)");
        let vars: Vec<_> = e.variables().into_iter().collect();
        assert_eq!(vars, vec!["a".to_string(), "b".to_string()]);
    }
}
