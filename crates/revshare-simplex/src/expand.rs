//! Lowering of a [`Model`] into a standard-form linear program.
//!
//! Three transformations happen here:
//! - each piecewise-linear relation is expanded into convex-combination
//!   (lambda) form: `Σλ = 1`, `Σλ·x_k = input`, `Σλ·y_k = output`;
//! - every variable is shifted by its lower bound so all variables are
//!   non-negative;
//! - finite upper bounds become explicit `≤` rows.
//!
//! The lambda form admits the full convex hull of the breakpoints, not just
//! adjacent pairs. For a concave curve maximized with a non-negative output
//! coefficient that hull's upper edge coincides with the chords, so the
//! relaxation is exact for every model the engine builds.

use revshare_core::error::SolverError;
use revshare_core::model::{GenConstraint, Model, Sense};

/// One row of the standard-form program: `coeffs · y ⋈ rhs` over the shifted
/// non-negative variables.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub coeffs: Vec<f64>,
    pub sense: Sense,
    pub rhs: f64,
}

/// A standard-form LP: maximize `objective · y + objective_offset` subject to
/// `rows`, `y ≥ 0`. The first `num_model_vars` entries of `y` map back to the
/// model's variables via `x_i = y_i + shifts[i]`.
#[derive(Debug, Clone)]
pub(crate) struct StandardLp {
    pub num_model_vars: usize,
    pub num_vars: usize,
    pub shifts: Vec<f64>,
    pub objective: Vec<f64>,
    pub objective_offset: f64,
    pub rows: Vec<Row>,
}

pub(crate) fn expand(model: &Model) -> Result<StandardLp, SolverError> {
    let num_model_vars = model.num_vars();

    // Lambda variables appended after the model's own.
    let mut num_vars = num_model_vars;
    for gc in model.gen_constraints() {
        match gc {
            GenConstraint::NaturalLog { .. } => {
                return Err(SolverError::UnsupportedConstraint("native logarithm"));
            }
            GenConstraint::Pwl { name, points, .. } => {
                if points.len() < 2 {
                    return Err(SolverError::InvalidModel(format!(
                        "piecewise relation {name} has fewer than 2 breakpoints"
                    )));
                }
                if points.windows(2).any(|w| w[1].0 <= w[0].0) {
                    return Err(SolverError::InvalidModel(format!(
                        "piecewise relation {name} breakpoints are not strictly increasing"
                    )));
                }
                num_vars += points.len();
            }
        }
    }

    let mut shifts = vec![0.0; num_vars];
    for (i, var) in model.vars().iter().enumerate() {
        if !var.lower.is_finite() {
            return Err(SolverError::InvalidModel(format!(
                "variable {} has a non-finite lower bound",
                var.name
            )));
        }
        shifts[i] = var.lower;
    }

    // Rows are assembled in the model's original coordinates and shifted at
    // the end, so every source of rows goes through the same path.
    let mut rows = Vec::new();
    for c in model.constraints() {
        let mut coeffs = vec![0.0; num_vars];
        for &(var, coeff) in &c.expr.terms {
            coeffs[var.0] += coeff;
        }
        rows.push(Row {
            coeffs,
            sense: c.sense,
            rhs: c.rhs - c.expr.constant,
        });
    }

    let mut next_lambda = num_model_vars;
    for gc in model.gen_constraints() {
        let GenConstraint::Pwl { input, output, points, .. } = gc else {
            continue; // NaturalLog already rejected above
        };
        let base = next_lambda;
        next_lambda += points.len();

        let mut convexity = vec![0.0; num_vars];
        let mut abscissa = vec![0.0; num_vars];
        let mut ordinate = vec![0.0; num_vars];
        for (k, &(x, y)) in points.iter().enumerate() {
            convexity[base + k] = 1.0;
            abscissa[base + k] = x;
            ordinate[base + k] = y;
        }
        abscissa[input.0] -= 1.0;
        ordinate[output.0] -= 1.0;
        rows.push(Row { coeffs: convexity, sense: Sense::Equal, rhs: 1.0 });
        rows.push(Row { coeffs: abscissa, sense: Sense::Equal, rhs: 0.0 });
        rows.push(Row { coeffs: ordinate, sense: Sense::Equal, rhs: 0.0 });
    }

    for (i, var) in model.vars().iter().enumerate() {
        if var.upper.is_finite() {
            let mut coeffs = vec![0.0; num_vars];
            coeffs[i] = 1.0;
            rows.push(Row { coeffs, sense: Sense::LessEq, rhs: var.upper });
        }
    }

    let mut objective = vec![0.0; num_vars];
    for &(var, coeff) in &model.objective().terms {
        objective[var.0] += coeff;
    }

    // Shift: substituting x = y + l moves Σ coeff·l onto the rhs (and the
    // objective offset).
    for row in &mut rows {
        let moved: f64 = row.coeffs.iter().zip(&shifts).map(|(c, l)| c * l).sum();
        row.rhs -= moved;
    }
    let objective_offset = model.objective().constant
        + objective.iter().zip(&shifts).map(|(c, l)| c * l).sum::<f64>();

    Ok(StandardLp {
        num_model_vars,
        num_vars,
        shifts,
        objective,
        objective_offset,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use revshare_core::model::LinearExpr;

    #[test]
    fn natural_log_is_unsupported() {
        let mut m = Model::new();
        let x = m.add_var("x", 1.0, 10.0);
        let z = m.add_var("z", 0.0, 3.0);
        m.add_natural_log("ln", x, z);
        assert_eq!(
            expand(&m).unwrap_err(),
            SolverError::UnsupportedConstraint("native logarithm")
        );
    }

    #[test]
    fn non_finite_lower_bound_rejected() {
        let mut m = Model::new();
        m.add_var("x", f64::NEG_INFINITY, 10.0);
        assert!(matches!(expand(&m), Err(SolverError::InvalidModel(_))));
    }

    #[test]
    fn non_increasing_breakpoints_rejected() {
        let mut m = Model::new();
        let x = m.add_var("x", 1.0, 10.0);
        let z = m.add_var("z", 0.0, 3.0);
        m.add_pwl("bad", x, z, vec![(1.0, 0.0), (1.0, 0.5)]);
        assert!(matches!(expand(&m), Err(SolverError::InvalidModel(_))));
    }

    #[test]
    fn pwl_adds_lambda_block() {
        let mut m = Model::new();
        let x = m.add_var("x", 1.0, 100.0);
        let z = m.add_var("z", 0.0, 5.0);
        m.add_pwl("log", x, z, vec![(1.0, 0.0), (10.0, 10.0f64.ln()), (100.0, 100.0f64.ln())]);
        let lp = expand(&m).unwrap();
        assert_eq!(lp.num_model_vars, 2);
        assert_eq!(lp.num_vars, 5);
        // convexity + abscissa + ordinate links + 2 finite upper bounds
        assert_eq!(lp.rows.len(), 5);
    }

    #[test]
    fn shifting_moves_lower_bounds_to_rhs() {
        let mut m = Model::new();
        let x = m.add_var("x", 2.0, 10.0);
        m.add_constraint("cap", LinearExpr::new().term(x, 3.0), Sense::LessEq, 30.0);
        m.set_objective(LinearExpr::new().term(x, 1.0).offset(5.0));
        let lp = expand(&m).unwrap();
        // 3(y + 2) ≤ 30 becomes 3y ≤ 24; bound row x ≤ 10 becomes y ≤ 8.
        assert_eq!(lp.rows[0].rhs, 24.0);
        assert_eq!(lp.rows[1].rhs, 8.0);
        assert_eq!(lp.objective_offset, 7.0);
    }

    #[test]
    fn duplicate_terms_accumulate() {
        let mut m = Model::new();
        let x = m.add_var("x", 0.0, 1.0);
        m.set_objective(LinearExpr::new().term(x, 1.0).term(x, 2.0));
        let lp = expand(&m).unwrap();
        assert_eq!(lp.objective[0], 3.0);
    }
}
