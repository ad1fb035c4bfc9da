use crate::config::{FilterSpec, NormOrder, SolverConfig};
use crate::error::{DesignError, Result};
use crate::filter_design::{
    BasisMatrix, ClarabelSolver, ConvexSolver, DesiredResponse, FilterKernel, FrequencyGrid,
    NormProblem, SolveStatus,
};
use crate::signal_processing::{ConvolutionMode, magnitude_response_db};

/// Result of one design run
///
/// Holds everything needed to apply, inspect or plot the filter without
/// going back to the designer.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDesign {
    w: Vec<f64>,
    desired: Vec<f64>,
    half: Vec<f64>,
    kernel: FilterKernel,
    fft_points: usize,
    status: SolveStatus,
    norm: NormOrder,
    weighted: bool,
    residual_norm: f64,
    iterations: u32,
}

impl FilterDesign {
    /// Designed filter taps
    pub fn kernel(&self) -> &FilterKernel {
        &self.kernel
    }

    /// Solved half-coefficients `h[0..=N]`
    pub fn half_coefficients(&self) -> &[f64] {
        &self.half
    }

    /// Angular frequencies the design was fitted on
    pub fn frequencies(&self) -> &[f64] {
        &self.w
    }

    /// Target magnitudes the design was fitted to
    pub fn desired(&self) -> &[f64] {
        &self.desired
    }

    /// DFT length used for diagnostics: twice the number of grid samples
    pub fn fft_points(&self) -> usize {
        self.fft_points
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn norm(&self) -> NormOrder {
        self.norm
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Achieved objective: the (weighted) p-norm of the residual
    pub fn residual_norm(&self) -> f64 {
        self.residual_norm
    }

    pub fn solver_iterations(&self) -> u32 {
        self.iterations
    }

    /// Zero-phase response `F·h` on the design grid
    pub fn zero_phase_response(&self) -> Vec<f64> {
        BasisMatrix::new(&self.w, self.kernel.order()).evaluate(&self.half)
    }

    /// Largest unweighted deviation from the desired magnitude on the grid
    pub fn max_abs_error(&self) -> f64 {
        self.zero_phase_response()
            .iter()
            .zip(&self.desired)
            .fold(0.0, |acc: f64, (a, d)| acc.max((d - a).abs()))
    }

    /// Convolve `signal` with the designed kernel
    pub fn apply(&self, signal: &[f64], mode: ConvolutionMode) -> Result<Vec<f64>> {
        self.kernel.apply(signal, mode)
    }

    /// Log-magnitude spectrum of the kernel, using the design's own
    /// `fft_points` unless overridden
    pub fn magnitude_response_db(&self, fft_points: Option<usize>) -> Result<Vec<f64>> {
        magnitude_response_db(
            self.kernel.taps(),
            fft_points.unwrap_or(self.fft_points),
        )
    }
}

/// Design a linear-phase filter for `spec` without retaining any state
///
/// Returns `DesignError::SolverNonOptimal` when the solver does not reach an
/// optimal-class status; the error carries the diagnostic design built from
/// whatever coefficients the solver produced.
///
/// # Errors
/// Returns `DesignError::InvalidConfiguration` if the grid and response
/// lengths differ, or if weighting is requested and a desired magnitude is
/// not strictly positive
pub fn design_filter<S: ConvexSolver + ?Sized>(
    spec: &FilterSpec,
    solver: &S,
    grid: &FrequencyGrid,
    desired: &DesiredResponse,
) -> Result<FilterDesign> {
    if grid.len() != desired.len() {
        return Err(DesignError::InvalidConfiguration(format!(
            "frequency grid has {} samples but desired response has {}",
            grid.len(),
            desired.len()
        )));
    }

    let weights = if spec.weighted {
        desired.ensure_positive()?;
        Some(desired.as_slice().iter().map(|d| 1.0 / d).collect::<Vec<f64>>())
    } else {
        None
    };

    if spec.penalize {
        log::warn!("Penalty term is not supported; designing without it");
    }

    let basis = BasisMatrix::new(grid.as_slice(), spec.order);
    let problem = NormProblem {
        basis: &basis,
        desired: desired.as_slice(),
        weights: weights.as_deref(),
        norm: spec.norm,
    };

    let result = solver.solve(&problem)?;
    log::info!(
        "Problem status: {} ({} iterations)",
        result.status,
        result.iterations
    );

    let mut residual = basis.residual(desired.as_slice(), &result.coefficients);
    if let Some(weights) = &weights {
        for (r, w) in residual.iter_mut().zip(weights) {
            *r *= w;
        }
    }

    let design = FilterDesign {
        w: grid.as_slice().to_vec(),
        desired: desired.as_slice().to_vec(),
        kernel: FilterKernel::from_half(&result.coefficients),
        half: result.coefficients,
        fft_points: 2 * desired.len(),
        status: result.status,
        norm: spec.norm,
        weighted: spec.weighted,
        residual_norm: spec.norm.evaluate(&residual),
        iterations: result.iterations,
    };

    match design.status {
        SolveStatus::Optimal => Ok(design),
        SolveStatus::OptimalInaccurate => {
            log::warn!(
                "Solver reached reduced accuracy; residual norm {:.6e}",
                design.residual_norm
            );
            Ok(design)
        }
        status => Err(DesignError::SolverNonOptimal {
            status,
            design: Box::new(design),
        }),
    }
}

/// Filter design session
///
/// Owns an immutable `FilterSpec` and a solver, and keeps the most recent
/// successful design so `apply` and diagnostics can be called without
/// passing it around. `design` takes `&mut self`: one designer serves one
/// caller at a time. Use [`design_filter`] or the returned [`FilterDesign`]
/// directly when no retained state is wanted.
///
/// # Example
/// ```
/// use linphase::config::{FilterSpec, NormOrder};
/// use linphase::filter_design::{DesiredResponse, FilterDesigner, FrequencyGrid};
/// use linphase::signal_processing::ConvolutionMode;
///
/// let spec = FilterSpec { order: 4, norm: NormOrder::L2, ..Default::default() };
/// let mut designer = FilterDesigner::new(spec);
///
/// let grid = FrequencyGrid::uniform(32).unwrap();
/// let desired = DesiredResponse::new(
///     grid.as_slice().iter().map(|&w| if w < 1.0 { 1.0 } else { 0.0 }).collect(),
/// ).unwrap();
///
/// let design = designer.design(&grid, &desired).unwrap();
/// assert_eq!(design.kernel().num_taps(), 9);
///
/// let filtered = designer.apply(&[0.0, 1.0, 0.0, 0.0], ConvolutionMode::Full).unwrap();
/// assert_eq!(filtered.len(), 12);
/// ```
pub struct FilterDesigner<S: ConvexSolver = ClarabelSolver> {
    spec: FilterSpec,
    solver: S,
    current: Option<FilterDesign>,
}

impl FilterDesigner<ClarabelSolver> {
    /// Create a designer backed by the default Clarabel solver
    pub fn new(spec: FilterSpec) -> Self {
        Self::with_solver(spec, ClarabelSolver::default())
    }

    /// Create a designer with explicit solver settings
    pub fn with_solver_config(spec: FilterSpec, config: SolverConfig) -> Self {
        Self::with_solver(spec, ClarabelSolver::new(config))
    }
}

impl<S: ConvexSolver> FilterDesigner<S> {
    pub fn with_solver(spec: FilterSpec, solver: S) -> Self {
        if spec.penalize {
            log::warn!("FilterSpec.penalize is set but has no effect");
        }
        Self {
            spec,
            solver,
            current: None,
        }
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Design a filter and retain it as the current design
    ///
    /// A failed design leaves the previous current design in place.
    pub fn design(
        &mut self,
        grid: &FrequencyGrid,
        desired: &DesiredResponse,
    ) -> Result<&FilterDesign> {
        let design = design_filter(&self.spec, &self.solver, grid, desired)?;
        log::debug!(
            "Designed {}-tap filter, residual norm {:.6e}",
            design.kernel.num_taps(),
            design.residual_norm
        );
        Ok(&*self.current.insert(design))
    }

    /// Convenience wrapper for raw slices
    pub fn design_from_slices(&mut self, w: &[f64], desired: &[f64]) -> Result<&FilterDesign> {
        let grid = FrequencyGrid::new(w.to_vec())?;
        let desired = DesiredResponse::new(desired.to_vec())?;
        self.design(&grid, &desired)
    }

    /// Most recent successful design
    pub fn current(&self) -> Option<&FilterDesign> {
        self.current.as_ref()
    }

    /// Give up the current design, leaving the designer empty
    pub fn take_design(&mut self) -> Option<FilterDesign> {
        self.current.take()
    }

    /// Current kernel
    ///
    /// # Errors
    /// Returns `DesignError::UsedBeforeDesigned` if no design exists yet
    pub fn kernel(&self) -> Result<&FilterKernel> {
        self.require("kernel()").map(FilterDesign::kernel)
    }

    /// Convolve `signal` with the current kernel
    ///
    /// # Errors
    /// Returns `DesignError::UsedBeforeDesigned` if no design exists yet
    pub fn apply(&self, signal: &[f64], mode: ConvolutionMode) -> Result<Vec<f64>> {
        self.require("apply()")?.apply(signal, mode)
    }

    /// Log-magnitude spectrum of the current kernel
    ///
    /// # Errors
    /// Returns `DesignError::UsedBeforeDesigned` if no design exists yet
    pub fn magnitude_response_db(&self, fft_points: Option<usize>) -> Result<Vec<f64>> {
        self.require("magnitude_response_db()")?
            .magnitude_response_db(fft_points)
    }

    fn require(&self, operation: &'static str) -> Result<&FilterDesign> {
        self.current
            .as_ref()
            .ok_or(DesignError::UsedBeforeDesigned(operation))
    }
}
