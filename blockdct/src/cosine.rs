use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Normalisation applied to frequency `k` so the DC basis vector has unit norm.
#[inline]
pub fn scale(k: usize) -> f64 {
    if k == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

/// `cos(pi * (n + 0.5) * k / len)`, the unscaled DCT-II kernel.
#[inline]
pub fn kernel(k: usize, n: usize, len: usize) -> f64 {
    (PI * (n as f64 + 0.5) * k as f64 / len as f64).cos()
}

/// The N x N orthonormal DCT-II matrix, `C[k][n] = scale(k) * sqrt(2/N) * kernel(k, n, N)`.
///
/// Rows are basis vectors. The forward transform is `C * x` and the inverse is
/// `C^T * X`; both directions read this one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CosineBasis<const N: usize> {
    matrix: [[f64; N]; N],
}

impl<const N: usize> CosineBasis<N> {
    pub fn new() -> Self {
        const { assert!(N > 0, "block size must be non-zero") };

        let norm = (2.0 / N as f64).sqrt();
        let mut matrix = [[0.0; N]; N];
        for (k, row) in matrix.iter_mut().enumerate() {
            let s = scale(k) * norm;
            for (n, c) in row.iter_mut().enumerate() {
                *c = s * kernel(k, n, N);
            }
        }
        Self { matrix }
    }

    #[inline]
    pub fn coefficient(&self, k: usize, n: usize) -> f64 {
        self.matrix[k][n]
    }

    #[inline]
    pub fn row(&self, k: usize) -> &[f64; N] {
        &self.matrix[k]
    }

    /// Pairwise dot products of the basis rows. Identity for an orthonormal basis.
    pub fn gram(&self) -> [[f64; N]; N] {
        let mut out = [[0.0; N]; N];
        for (a, out_row) in out.iter_mut().enumerate() {
            for (b, v) in out_row.iter_mut().enumerate() {
                *v = self.matrix[a]
                    .iter()
                    .zip(&self.matrix[b])
                    .map(|(x, y)| x * y)
                    .sum();
            }
        }
        out
    }
}

impl<const N: usize> Default for CosineBasis<N> {
    fn default() -> Self {
        Self::new()
    }
}
