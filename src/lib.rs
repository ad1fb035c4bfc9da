pub mod config;
pub mod constants;
pub mod error;
pub mod filter_design;
pub mod output;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "plot")]
pub mod plot;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::{DesignConfig, FilterSpec, NormOrder};
pub use error::{DesignError, Result};
pub use filter_design::{FilterDesign, FilterDesigner, FilterKernel, design_filter};
pub use signal_processing::{ConvolutionMode, db2mag, magnitude_response_db};
pub use wav::{read_wav, save_wav};
