mod basis;
mod designer;
mod grid;
mod kernel;
mod solver;

pub use basis::BasisMatrix;
pub use designer::{FilterDesign, FilterDesigner, design_filter};
pub use grid::{BandSpec, DesiredResponse, FrequencyGrid, sample_bands};
pub use kernel::FilterKernel;
pub use solver::{ClarabelSolver, ConvexSolver, NormProblem, SolveResult, SolveStatus};
