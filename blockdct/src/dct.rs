use crate::cosine::CosineBasis;
use crate::error::{Result, TransformError};

/// An N-point orthonormal DCT-II / DCT-III pair.
///
/// `inverse` must be the exact inverse of `forward`. Implementations are free to
/// use a fast factorisation as long as they agree with [`MatrixDct`] up to
/// rounding.
pub trait Transform1d<const N: usize>: Send + Sync {
    fn forward(&self, input: &[f64; N]) -> [f64; N];

    fn inverse(&self, input: &[f64; N]) -> [f64; N];

    /// The output is fully computed before `data` is overwritten.
    fn forward_in_place(&self, data: &mut [f64; N]) {
        *data = self.forward(data);
    }

    fn inverse_in_place(&self, data: &mut [f64; N]) {
        *data = self.inverse(data);
    }

    fn forward_slice(&self, input: &[f64], output: &mut [f64]) -> Result<()> {
        let input = as_vector::<N>(input)?;
        let output = as_vector_mut::<N>(output)?;
        *output = self.forward(input);
        Ok(())
    }

    fn inverse_slice(&self, input: &[f64], output: &mut [f64]) -> Result<()> {
        let input = as_vector::<N>(input)?;
        let output = as_vector_mut::<N>(output)?;
        *output = self.inverse(input);
        Ok(())
    }
}

fn as_vector<const N: usize>(data: &[f64]) -> Result<&[f64; N]> {
    data.try_into().map_err(|_| TransformError::InvalidLength {
        expected: N,
        actual: data.len(),
    })
}

fn as_vector_mut<const N: usize>(data: &mut [f64]) -> Result<&mut [f64; N]> {
    let actual = data.len();
    data.try_into()
        .map_err(|_| TransformError::InvalidLength { expected: N, actual })
}

/// O(N^2) transform over a cached [`CosineBasis`].
#[derive(Debug, Clone, Default)]
pub struct MatrixDct<const N: usize> {
    basis: CosineBasis<N>,
}

impl<const N: usize> MatrixDct<N> {
    pub fn new() -> Self {
        Self {
            basis: CosineBasis::new(),
        }
    }

    pub fn basis(&self) -> &CosineBasis<N> {
        &self.basis
    }
}

impl<const N: usize> Transform1d<N> for MatrixDct<N> {
    fn forward(&self, input: &[f64; N]) -> [f64; N] {
        let mut out = [0.0; N];
        for (k, v) in out.iter_mut().enumerate() {
            *v = self
                .basis
                .row(k)
                .iter()
                .zip(input)
                .map(|(c, x)| c * x)
                .sum();
        }
        out
    }

    fn inverse(&self, input: &[f64; N]) -> [f64; N] {
        let mut out = [0.0; N];
        for (k, &coeff) in input.iter().enumerate() {
            for (v, c) in out.iter_mut().zip(self.basis.row(k)) {
                *v += c * coeff;
            }
        }
        out
    }
}
