mod convolve;
mod spectrum;

pub use convolve::{ConvolutionMode, convolve};
pub use spectrum::{db2mag, fft_magnitude, mag2db, magnitude_response_db};
