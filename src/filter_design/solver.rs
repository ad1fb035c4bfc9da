//! Convex solver interface.
//!
//! The design problem is `minimize ‖W·(d − F·h)‖_p` over the half-coefficients
//! `h`, where `W` is either the identity or `diag(1/d)`. The numerical work is
//! delegated to an external solver behind [`ConvexSolver`]; [`ClarabelSolver`]
//! is the default backend and poses each norm as a conic program:
//!
//! ```text
//! p = 1    LP   min Σt        s.t. −t ≤ W(d − Fh) ≤ t     x = [h, t₁..t_m]
//! p = ∞    LP   min t         s.t. −t ≤ W(d − Fh) ≤ t     x = [h, t]
//! p = 2    QP   min ½‖r‖²     s.t. r + WFh = Wd           x = [h, r₁..r_m]
//! ```

use std::fmt;

use clarabel::algebra::CscMatrix;
use clarabel::solver::*;
use serde::Serialize;

use crate::config::{NormOrder, SolverConfig};
use crate::error::{DesignError, Result};
use crate::filter_design::BasisMatrix;

/// Termination status reported by a convex solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    OptimalInaccurate,
    Infeasible,
    InfeasibleInaccurate,
    Unbounded,
    UnboundedInaccurate,
    MaxIterations,
    MaxTime,
    NumericalError,
    InsufficientProgress,
    Unsolved,
}

impl SolveStatus {
    /// Optimal-class status: the coefficients can be trusted
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::OptimalInaccurate)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::OptimalInaccurate => "optimal_inaccurate",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::InfeasibleInaccurate => "infeasible_inaccurate",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::UnboundedInaccurate => "unbounded_inaccurate",
            SolveStatus::MaxIterations => "max_iterations",
            SolveStatus::MaxTime => "max_time",
            SolveStatus::NumericalError => "numerical_error",
            SolveStatus::InsufficientProgress => "insufficient_progress",
            SolveStatus::Unsolved => "unsolved",
        };
        f.write_str(s)
    }
}

impl From<SolverStatus> for SolveStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::AlmostSolved => SolveStatus::OptimalInaccurate,
            SolverStatus::PrimalInfeasible => SolveStatus::Infeasible,
            SolverStatus::AlmostPrimalInfeasible => SolveStatus::InfeasibleInaccurate,
            SolverStatus::DualInfeasible => SolveStatus::Unbounded,
            SolverStatus::AlmostDualInfeasible => SolveStatus::UnboundedInaccurate,
            SolverStatus::MaxIterations => SolveStatus::MaxIterations,
            SolverStatus::MaxTime => SolveStatus::MaxTime,
            SolverStatus::NumericalError => SolveStatus::NumericalError,
            SolverStatus::InsufficientProgress => SolveStatus::InsufficientProgress,
            #[allow(unreachable_patterns)]
            _ => SolveStatus::Unsolved,
        }
    }
}

/// Raw solver output
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Half-coefficients `h[0..=N]` as returned by the solver. Only meaningful
    /// when `status.is_optimal()`.
    pub coefficients: Vec<f64>,
    pub iterations: u32,
}

/// A weighted p-norm fitting problem over the cosine basis
#[derive(Debug, Clone, Copy)]
pub struct NormProblem<'a> {
    pub basis: &'a BasisMatrix,
    pub desired: &'a [f64],
    /// Per-sample error weights; `None` means unweighted
    pub weights: Option<&'a [f64]>,
    pub norm: NormOrder,
}

impl NormProblem<'_> {
    pub fn num_samples(&self) -> usize {
        self.basis.num_samples()
    }

    pub fn num_coefficients(&self) -> usize {
        self.basis.num_coefficients()
    }

    fn weight(&self, row: usize) -> f64 {
        self.weights.map_or(1.0, |w| w[row])
    }

    /// Weighted basis entry `W·F`
    fn weighted_basis(&self, row: usize, col: usize) -> f64 {
        self.weight(row) * self.basis.get(row, col)
    }

    /// Weighted target `W·d`
    fn weighted_desired(&self, row: usize) -> f64 {
        self.weight(row) * self.desired[row]
    }
}

/// External convex optimization backend
pub trait ConvexSolver {
    fn solve(&self, problem: &NormProblem<'_>) -> Result<SolveResult>;
}

/// Interior-point conic solver backend (Clarabel)
#[derive(Debug, Clone, Default)]
pub struct ClarabelSolver {
    config: SolverConfig,
}

impl ClarabelSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn settings(&self) -> Result<DefaultSettings<f64>> {
        DefaultSettingsBuilder::default()
            .max_iter(self.config.max_iter)
            .tol_gap_abs(self.config.tolerance)
            .tol_gap_rel(self.config.tolerance)
            .tol_feas(self.config.tolerance)
            .time_limit(self.config.time_limit_secs.unwrap_or(f64::INFINITY))
            .verbose(self.config.verbose)
            .build()
            .map_err(|e| DesignError::Solver(e.to_string()))
    }
}

impl ConvexSolver for ClarabelSolver {
    fn solve(&self, problem: &NormProblem<'_>) -> Result<SolveResult> {
        let n = problem.num_coefficients();
        let m = problem.num_samples();
        let program = match problem.norm {
            NormOrder::L1 => ConicProgram::l1(problem),
            NormOrder::Inf => ConicProgram::linf(problem),
            NormOrder::L2 => ConicProgram::l2(problem),
        };

        log::debug!(
            "Solving L{} fit: {} samples, {} coefficients, {} variables, {} constraint rows",
            problem.norm,
            m,
            n,
            program.q.len(),
            program.b.len()
        );

        let settings = self.settings()?;
        let mut solver = DefaultSolver::new(
            &program.p,
            &program.q,
            &program.a,
            &program.b,
            &program.cones,
            settings,
        );
        solver.solve();

        let solution = &solver.solution;
        let status = SolveStatus::from(solution.status);
        let mut coefficients: Vec<f64> = solution.x.iter().take(n).copied().collect();
        coefficients.resize(n, f64::NAN);

        log::debug!(
            "Solver finished: status={}, iterations={}, objective={:.6e}",
            status,
            solution.iterations,
            solution.obj_val
        );

        Ok(SolveResult {
            status,
            coefficients,
            iterations: solution.iterations,
        })
    }
}

/// `min ½xᵀPx + qᵀx  s.t.  Ax + s = b, s ∈ cones`
struct ConicProgram {
    p: CscMatrix<f64>,
    q: Vec<f64>,
    a: CscMatrix<f64>,
    b: Vec<f64>,
    cones: Vec<SupportedConeT<f64>>,
}

impl ConicProgram {
    /// Rows `[−WF, −I]·x ≤ −Wd` and `[WF, −I]·x ≤ Wd`, one slack per sample
    fn l1(problem: &NormProblem<'_>) -> Self {
        let n = problem.num_coefficients();
        let m = problem.num_samples();
        let mut a = ColumnBuilder::new(2 * m, n + m);

        for col in 0..n {
            for row in 0..m {
                a.push(row, col, -problem.weighted_basis(row, col));
            }
            for row in 0..m {
                a.push(m + row, col, problem.weighted_basis(row, col));
            }
        }
        for row in 0..m {
            a.push(row, n + row, -1.0);
            a.push(m + row, n + row, -1.0);
        }

        let mut q = vec![0.0; n];
        q.extend(std::iter::repeat_n(1.0, m));

        Self {
            p: ColumnBuilder::new(n + m, n + m).build(),
            q,
            a: a.build(),
            b: Self::two_sided_bounds(problem),
            cones: vec![NonnegativeConeT(2 * m)],
        }
    }

    /// Same rows as `l1` but a single shared bound `t`
    fn linf(problem: &NormProblem<'_>) -> Self {
        let n = problem.num_coefficients();
        let m = problem.num_samples();
        let mut a = ColumnBuilder::new(2 * m, n + 1);

        for col in 0..n {
            for row in 0..m {
                a.push(row, col, -problem.weighted_basis(row, col));
            }
            for row in 0..m {
                a.push(m + row, col, problem.weighted_basis(row, col));
            }
        }
        for row in 0..2 * m {
            a.push(row, n, -1.0);
        }

        let mut q = vec![0.0; n];
        q.push(1.0);

        Self {
            p: ColumnBuilder::new(n + 1, n + 1).build(),
            q,
            a: a.build(),
            b: Self::two_sided_bounds(problem),
            cones: vec![NonnegativeConeT(2 * m)],
        }
    }

    /// Residual variables tied to the fit by equality rows `[WF, I]·x = Wd`
    fn l2(problem: &NormProblem<'_>) -> Self {
        let n = problem.num_coefficients();
        let m = problem.num_samples();

        let mut p = ColumnBuilder::new(n + m, n + m);
        for i in 0..m {
            p.push(n + i, n + i, 1.0);
        }

        let mut a = ColumnBuilder::new(m, n + m);
        for col in 0..n {
            for row in 0..m {
                a.push(row, col, problem.weighted_basis(row, col));
            }
        }
        for row in 0..m {
            a.push(row, n + row, 1.0);
        }

        Self {
            p: p.build(),
            q: vec![0.0; n + m],
            a: a.build(),
            b: (0..m).map(|i| problem.weighted_desired(i)).collect(),
            cones: vec![ZeroConeT(m)],
        }
    }

    fn two_sided_bounds(problem: &NormProblem<'_>) -> Vec<f64> {
        let m = problem.num_samples();
        let wd: Vec<f64> = (0..m).map(|i| problem.weighted_desired(i)).collect();
        wd.iter().map(|v| -v).chain(wd.iter().copied()).collect()
    }
}

/// Assembles a CSC matrix column by column. Entries within a column must be
/// pushed in increasing row order.
struct ColumnBuilder {
    rows: usize,
    columns: Vec<Vec<(usize, f64)>>,
}

impl ColumnBuilder {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            columns: vec![Vec::new(); cols],
        }
    }

    fn push(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows);
        debug_assert!(self.columns[col].last().is_none_or(|&(r, _)| r < row));
        if value != 0.0 {
            self.columns[col].push((row, value));
        }
    }

    fn build(self) -> CscMatrix<f64> {
        let cols = self.columns.len();
        let nnz = self.columns.iter().map(Vec::len).sum();
        let mut colptr = Vec::with_capacity(cols + 1);
        let mut rowval = Vec::with_capacity(nnz);
        let mut nzval = Vec::with_capacity(nnz);

        colptr.push(0);
        for column in self.columns {
            for (row, value) in column {
                rowval.push(row);
                nzval.push(value);
            }
            colptr.push(rowval.len());
        }

        CscMatrix::new(self.rows, cols, colptr, rowval, nzval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn constant_fit(desired: &[f64], norm: NormOrder) -> SolveResult {
        let w: Vec<f64> = (0..desired.len()).map(|i| i as f64 * 0.1).collect();
        let basis = BasisMatrix::new(&w, 0);
        let problem = NormProblem {
            basis: &basis,
            desired,
            weights: None,
            norm,
        };
        ClarabelSolver::default().solve(&problem).unwrap()
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolveStatus::Optimal.to_string(), "optimal");
        assert_eq!(SolveStatus::Infeasible.to_string(), "infeasible");
        assert!(SolveStatus::OptimalInaccurate.is_optimal());
        assert!(!SolveStatus::MaxIterations.is_optimal());
    }

    #[test]
    fn test_status_from_clarabel() {
        assert_eq!(SolveStatus::from(SolverStatus::Solved), SolveStatus::Optimal);
        assert_eq!(
            SolveStatus::from(SolverStatus::PrimalInfeasible),
            SolveStatus::Infeasible
        );
        assert_eq!(
            SolveStatus::from(SolverStatus::DualInfeasible),
            SolveStatus::Unbounded
        );
    }

    #[test]
    fn test_l1_constant_fit_is_median() {
        let result = constant_fit(&[1.0, 2.0, 3.0, 10.0, 50.0], NormOrder::L1);
        assert!(result.status.is_optimal());
        assert_abs_diff_eq!(result.coefficients[0], 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_l2_constant_fit_is_mean() {
        let result = constant_fit(&[1.0, 2.0, 3.0, 10.0, 50.0], NormOrder::L2);
        assert!(result.status.is_optimal());
        assert_abs_diff_eq!(result.coefficients[0], 13.2, epsilon = 1e-6);
    }

    #[test]
    fn test_linf_constant_fit_is_midrange() {
        let result = constant_fit(&[1.0, 2.0, 3.0, 10.0, 50.0], NormOrder::Inf);
        assert!(result.status.is_optimal());
        assert_abs_diff_eq!(result.coefficients[0], 25.5, epsilon = 1e-5);
    }

    #[test]
    fn test_column_builder_layout() {
        let mut builder = ColumnBuilder::new(2, 3);
        builder.push(0, 0, 1.0);
        builder.push(1, 0, 2.0);
        builder.push(1, 2, 3.0);
        builder.push(0, 1, 0.0);
        let csc = builder.build();
        assert_eq!(csc.colptr, vec![0, 2, 2, 3]);
        assert_eq!(csc.rowval, vec![0, 1, 1]);
        assert_eq!(csc.nzval, vec![1.0, 2.0, 3.0]);
    }
}
