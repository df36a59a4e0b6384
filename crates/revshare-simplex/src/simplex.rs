//! Dense two-phase primal simplex over a standard-form program.
//!
//! Bland's rule is used for both the entering and leaving choice, so the
//! method terminates on degenerate bases instead of cycling. The tableau is
//! dense; engine models stay in the low hundreds of columns, where dense
//! pivoting is simpler and fast enough.

use std::time::Instant;

use revshare_core::error::SolverError;
use revshare_core::model::Sense;

use crate::expand::StandardLp;

const PIVOT_TOL: f64 = 1e-9;
const REDUCED_COST_TOL: f64 = 1e-9;

pub(crate) enum LpOutcome {
    Optimal { values: Vec<f64>, objective: f64 },
    Infeasible,
    Unbounded,
}

struct Tableau {
    rows: Vec<Vec<f64>>,
    obj: Vec<f64>,
    basis: Vec<usize>,
    artificial: Vec<bool>,
    cols: usize,
}

impl Tableau {
    fn pivot(&mut self, row: usize, col: usize) {
        let inv = 1.0 / self.rows[row][col];
        for v in &mut self.rows[row] {
            *v *= inv;
        }
        let pivot_row = self.rows[row].clone();
        for (i, r) in self.rows.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = r[col];
            if factor != 0.0 {
                for (v, p) in r.iter_mut().zip(&pivot_row) {
                    *v -= factor * p;
                }
            }
        }
        let factor = self.obj[col];
        if factor != 0.0 {
            for (v, p) in self.obj.iter_mut().zip(&pivot_row) {
                *v -= factor * p;
            }
        }
        self.basis[row] = col;
    }

    /// One Bland-rule phase: pivot until no reduced cost is negative.
    /// Returns `false` when the objective is unbounded.
    fn iterate(
        &mut self,
        deadline: Instant,
        iterations: &mut usize,
        max_iterations: usize,
    ) -> Result<bool, SolverError> {
        loop {
            if Instant::now() >= deadline {
                return Err(SolverError::Timeout);
            }
            *iterations += 1;
            if *iterations > max_iterations {
                return Err(SolverError::Numerical(format!(
                    "iteration limit {max_iterations} exceeded"
                )));
            }

            // Entering: lowest-index eligible column with a negative reduced
            // cost (Bland's rule).
            let Some(entering) = (0..self.cols)
                .find(|&j| !self.artificial[j] && self.obj[j] < -REDUCED_COST_TOL)
            else {
                return Ok(true);
            };

            // Leaving: minimum ratio, ties broken by lowest basis index.
            let mut leaving: Option<(usize, f64)> = None;
            for i in 0..self.rows.len() {
                let a = self.rows[i][entering];
                if a <= PIVOT_TOL {
                    continue;
                }
                let ratio = self.rows[i][self.cols] / a;
                let better = match leaving {
                    None => true,
                    Some((best_i, best_ratio)) => {
                        ratio < best_ratio - PIVOT_TOL
                            || (ratio < best_ratio + PIVOT_TOL
                                && self.basis[i] < self.basis[best_i])
                    }
                };
                if better {
                    leaving = Some((i, ratio));
                }
            }
            let Some((row, _)) = leaving else {
                return Ok(false);
            };
            self.pivot(row, entering);
        }
    }
}

pub(crate) fn solve(
    lp: &StandardLp,
    deadline: Instant,
    max_iterations: usize,
) -> Result<LpOutcome, SolverError> {
    let n = lp.num_vars;
    let m = lp.rows.len();

    // Column layout: structural | slack/surplus | artificial.
    let n_slack = lp
        .rows
        .iter()
        .filter(|r| r.sense != Sense::Equal)
        .count();
    let mut cols = n + n_slack;
    let mut slack_cursor = n;
    let mut art_cols = Vec::new();

    let mut rows = Vec::with_capacity(m);
    let mut basis = Vec::with_capacity(m);
    for r in &lp.rows {
        // Normalize to a non-negative right-hand side.
        let flip = r.rhs < 0.0;
        let sign = if flip { -1.0 } else { 1.0 };
        let sense = match (r.sense, flip) {
            (Sense::Equal, _) => Sense::Equal,
            (s, false) => s,
            (Sense::LessEq, true) => Sense::GreaterEq,
            (Sense::GreaterEq, true) => Sense::LessEq,
        };

        let mut row = vec![0.0; cols];
        for (j, &c) in r.coeffs.iter().enumerate() {
            row[j] = sign * c;
        }
        let rhs = sign * r.rhs;
        match sense {
            Sense::LessEq => {
                row[slack_cursor] = 1.0;
                basis.push(slack_cursor);
                slack_cursor += 1;
            }
            Sense::GreaterEq => {
                row[slack_cursor] = -1.0;
                slack_cursor += 1;
                art_cols.push(rows.len());
                basis.push(usize::MAX); // patched once artificials are appended
            }
            Sense::Equal => {
                art_cols.push(rows.len());
                basis.push(usize::MAX);
            }
        }
        row.push(rhs);
        rows.push(row);
    }

    // Append one artificial column per =/≥ row.
    let n_art = art_cols.len();
    let mut artificial = vec![false; cols + n_art];
    for (k, &row_idx) in art_cols.iter().enumerate() {
        let col = cols + k;
        artificial[col] = true;
        basis[row_idx] = col;
    }
    cols += n_art;
    for (i, row) in rows.iter_mut().enumerate() {
        let rhs = row.pop().unwrap_or(0.0);
        row.resize(cols, 0.0);
        if basis[i] >= n + n_slack {
            row[basis[i]] = 1.0;
        }
        row.push(rhs);
    }

    let mut t = Tableau {
        rows,
        obj: vec![0.0; cols + 1],
        basis,
        artificial,
        cols,
    };

    let rhs_scale = t
        .rows
        .iter()
        .map(|r| r[cols].abs())
        .fold(1.0, f64::max);

    // Phase 1: drive the artificial variables to zero.
    if n_art > 0 {
        for j in 0..cols {
            if t.artificial[j] {
                t.obj[j] = 1.0;
            }
        }
        for i in 0..m {
            if t.artificial[t.basis[i]] {
                for j in 0..=cols {
                    t.obj[j] -= t.rows[i][j];
                }
            }
        }
        // Artificials may leave the basis but never re-enter; allow every
        // structural and slack column.
        let mut iterations = 0;
        if !t.iterate(deadline, &mut iterations, max_iterations)? {
            return Err(SolverError::Numerical(
                "phase-1 objective unbounded".into(),
            ));
        }
        let infeasibility = -t.obj[cols];
        if infeasibility > 1e-7 * rhs_scale {
            return Ok(LpOutcome::Infeasible);
        }
        // Pivot surviving zero-level artificials out where possible; a row
        // with no eligible pivot is redundant and its artificial stays
        // parked at zero.
        for i in 0..m {
            if !t.artificial[t.basis[i]] {
                continue;
            }
            if let Some(j) = (0..cols)
                .find(|&j| !t.artificial[j] && t.rows[i][j].abs() > PIVOT_TOL)
            {
                t.pivot(i, j);
            }
        }
    }

    // Phase 2: the real objective, priced out against the current basis.
    t.obj = vec![0.0; cols + 1];
    for j in 0..n {
        t.obj[j] = -lp.objective[j];
    }
    for i in 0..m {
        let b = t.basis[i];
        let c = if b < n { lp.objective[b] } else { 0.0 };
        if c != 0.0 {
            for j in 0..=cols {
                t.obj[j] += c * t.rows[i][j];
            }
        }
    }
    let mut iterations = 0;
    if !t.iterate(deadline, &mut iterations, max_iterations)? {
        return Ok(LpOutcome::Unbounded);
    }

    let mut values = vec![0.0; n];
    for i in 0..m {
        if t.basis[i] < n {
            values[t.basis[i]] = t.rows[i][cols];
        }
    }
    let objective = lp
        .objective
        .iter()
        .zip(&values)
        .map(|(c, v)| c * v)
        .sum::<f64>()
        + lp.objective_offset;
    Ok(LpOutcome::Optimal { values, objective })
}
