/// Cosine basis for the zero-phase response of a symmetric FIR filter
///
/// A length 2N+1 filter with half-coefficients `h[0..=N]` has zero-phase
/// response `h[0] + 2·Σ h[j]·cos(w·j)`. Row `i` of this matrix holds the
/// basis functions evaluated at `w[i]`: column 0 is 1, column `j > 0` is
/// `2·cos(w[i]·j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisMatrix {
    rows: usize,
    cols: usize,
    // Row-major
    data: Vec<f64>,
}

impl BasisMatrix {
    /// Build the basis for tap order `order` (order + 1 columns) on grid `w`
    pub fn new(w: &[f64], order: usize) -> Self {
        let cols = order + 1;
        let mut data = Vec::with_capacity(w.len() * cols);
        for &wi in w {
            data.push(1.0);
            for j in 1..cols {
                data.push(2.0 * (wi * j as f64).cos());
            }
        }
        Self {
            rows: w.len(),
            cols,
            data,
        }
    }

    pub fn num_samples(&self) -> usize {
        self.rows
    }

    pub fn num_coefficients(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Evaluate `F·h`, the zero-phase response of half-coefficients `h`
    ///
    /// # Panics
    /// Panics if `h.len()` differs from the number of columns
    pub fn evaluate(&self, h: &[f64]) -> Vec<f64> {
        assert_eq!(h.len(), self.cols, "coefficient count mismatch");
        (0..self.rows)
            .map(|i| self.row(i).iter().zip(h).map(|(f, c)| f * c).sum())
            .collect()
    }

    /// Residual `desired − F·h`
    pub fn residual(&self, desired: &[f64], h: &[f64]) -> Vec<f64> {
        desired
            .iter()
            .zip(self.evaluate(h))
            .map(|(d, fh)| d - fh)
            .collect()
    }
}
