//! Solver-agnostic optimization model descriptors.
//!
//! A [`Model`] is the mathematical contract handed to an
//! [`OptimizationBackend`](crate::traits::OptimizationBackend): bounded
//! continuous variables, linear constraints over affine expressions, optional
//! generalized constraints (piecewise-linear breakpoint relations or a native
//! natural logarithm), and a single affine objective to maximize.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a variable within its [`Model`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A bounded continuous decision variable.
///
/// Lower bounds must be finite (the backend contract covers bounded
/// variables only); upper bounds may be `f64::INFINITY`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

/// An affine expression `Σ coeff·var + constant`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `coeff·var` term, returning the expression for chaining.
    pub fn term(mut self, var: VarId, coeff: f64) -> Self {
        self.terms.push((var, coeff));
        self
    }

    /// Add a constant offset, returning the expression for chaining.
    pub fn offset(mut self, constant: f64) -> Self {
        self.constant += constant;
        self
    }

    /// Evaluate the expression against a dense value vector.
    pub fn eval(&self, values: &[f64]) -> f64 {
        let mut acc = self.constant;
        for &(var, coeff) in &self.terms {
            acc += coeff * values[var.0];
        }
        acc
    }
}

/// Comparison sense of a linear constraint.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Equal,
    LessEq,
    GreaterEq,
}

/// A linear constraint `expr ⋈ rhs`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

/// A generalized (nonlinear) constraint linking two variables.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum GenConstraint {
    /// `(input, output)` must lie on the piecewise-linear curve through
    /// `points` (strictly increasing abscissas). The input variable's bounds
    /// must lie within the breakpoint domain.
    Pwl {
        name: String,
        input: VarId,
        output: VarId,
        points: Vec<(f64, f64)>,
    },
    /// `output = ln(input)`, for backends with native logarithm support.
    NaturalLog {
        name: String,
        input: VarId,
        output: VarId,
    },
}

/// Terminal status reported by a backend solve.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
}

/// The result of a backend solve: status, one value per variable, and the
/// objective value (including any constant offset).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Solution {
    pub status: SolveStatus,
    pub values: Vec<f64>,
    pub objective: f64,
}

impl Solution {
    /// Value of a single variable in this solution.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.0]
    }
}

/// A complete maximization model.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Model {
    vars: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    gen_constraints: Vec<GenConstraint>,
    objective: LinearExpr,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bounded continuous variable and return its id.
    pub fn add_var(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(Variable {
            name: name.into(),
            lower,
            upper,
        });
        id
    }

    /// Add a linear constraint `expr ⋈ rhs`.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            expr,
            sense,
            rhs,
        });
    }

    /// Constrain `(input, output)` to the piecewise-linear curve through `points`.
    pub fn add_pwl(
        &mut self,
        name: impl Into<String>,
        input: VarId,
        output: VarId,
        points: Vec<(f64, f64)>,
    ) {
        self.gen_constraints.push(GenConstraint::Pwl {
            name: name.into(),
            input,
            output,
            points,
        });
    }

    /// Constrain `output = ln(input)` natively.
    pub fn add_natural_log(&mut self, name: impl Into<String>, input: VarId, output: VarId) {
        self.gen_constraints.push(GenConstraint::NaturalLog {
            name: name.into(),
            input,
            output,
        });
    }

    /// Set the (maximized) objective.
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn var(&self, id: VarId) -> &Variable {
        &self.vars[id.0]
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn gen_constraints(&self) -> &[GenConstraint] {
        &self.gen_constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_var_assigns_sequential_ids() {
        let mut m = Model::new();
        let a = m.add_var("a", 0.0, 1.0);
        let b = m.add_var("b", 0.0, f64::INFINITY);
        assert_eq!(a, VarId(0));
        assert_eq!(b, VarId(1));
        assert_eq!(m.num_vars(), 2);
        assert_eq!(m.var(b).upper, f64::INFINITY);
    }

    #[test]
    fn linear_expr_eval() {
        let expr = LinearExpr::new()
            .term(VarId(0), 2.0)
            .term(VarId(1), -1.0)
            .offset(0.5);
        assert_eq!(expr.eval(&[3.0, 1.0]), 5.5);
    }

    #[test]
    fn solution_value_lookup() {
        let sol = Solution {
            status: SolveStatus::Optimal,
            values: vec![1.0, 2.0, 3.0],
            objective: 6.0,
        };
        assert_eq!(sol.value(VarId(2)), 3.0);
    }

    #[test]
    fn pwl_constraint_recorded() {
        let mut m = Model::new();
        let x = m.add_var("x", 1.0, 10.0);
        let z = m.add_var("z", 0.0, 3.0);
        m.add_pwl("log_x", x, z, vec![(1.0, 0.0), (10.0, 10.0f64.ln())]);
        assert_eq!(m.gen_constraints().len(), 1);
        match &m.gen_constraints()[0] {
            GenConstraint::Pwl { input, output, points, .. } => {
                assert_eq!(*input, x);
                assert_eq!(*output, z);
                assert_eq!(points.len(), 2);
            }
            other => panic!("unexpected constraint: {other:?}"),
        }
    }

    #[test]
    fn constraint_senses_distinct() {
        assert_ne!(Sense::Equal, Sense::LessEq);
        assert_ne!(Sense::LessEq, Sense::GreaterEq);
    }
}
