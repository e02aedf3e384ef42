use crate::dct::{MatrixDct, Transform1d};
use crate::error::{Result, check_finite, check_finite_output, check_len};

/// N x N samples, row-major. Spatial samples or coefficients depending on direction.
pub type Block<const N: usize> = [[f64; N]; N];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

type Pass1dFn<T, const N: usize> = fn(&T, &[f64; N]) -> [f64; N];

fn get_1d_fn<T: Transform1d<N>, const N: usize>(direction: Direction) -> Pass1dFn<T, N> {
    match direction {
        Direction::Forward => <T as Transform1d<N>>::forward,
        Direction::Inverse => <T as Transform1d<N>>::inverse,
    }
}

/// Out-of-place transpose, `out[j][i] = m[i][j]`.
pub fn transpose<T: Copy + Default, const N: usize>(m: &[[T; N]; N]) -> [[T; N]; N] {
    let mut out = [[T::default(); N]; N];
    for (i, row) in m.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            out[j][i] = v;
        }
    }
    out
}

pub(crate) fn load<const N: usize>(flat: &[f64]) -> Block<N> {
    debug_assert_eq!(flat.len(), N * N);
    let mut block = [[0.0; N]; N];
    for (row, chunk) in block.iter_mut().zip(flat.chunks_exact(N)) {
        row.copy_from_slice(chunk);
    }
    block
}

pub(crate) fn store<const N: usize>(block: &Block<N>, flat: &mut [f64]) {
    debug_assert_eq!(flat.len(), N * N);
    for (chunk, row) in flat.chunks_exact_mut(N).zip(block) {
        chunk.copy_from_slice(row);
    }
}

/// Separable 2D transform of order N built on a 1D engine.
///
/// Each direction runs a row pass, a transpose, and a second row pass. The
/// engine is immutable after construction, so one instance can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct BlockTransform<const N: usize, T = MatrixDct<N>> {
    engine: T,
}

impl<const N: usize> BlockTransform<N> {
    pub fn new() -> Self {
        Self {
            engine: MatrixDct::new(),
        }
    }
}

impl<const N: usize, T: Transform1d<N>> BlockTransform<N, T> {
    pub fn with_engine(engine: T) -> Self {
        Self { engine }
    }

    pub fn transform(&self, block: &Block<N>, direction: Direction) -> Block<N> {
        let pass = get_1d_fn::<T, N>(direction);

        let mut rows = [[0.0; N]; N];
        for (out, row) in rows.iter_mut().zip(block) {
            *out = pass(&self.engine, row);
        }

        let transposed = transpose(&rows);

        let mut out = [[0.0; N]; N];
        for (dst, row) in out.iter_mut().zip(&transposed) {
            *dst = pass(&self.engine, row);
        }
        out
    }

    pub fn fdct_block(&self, block: &Block<N>) -> Block<N> {
        self.transform(block, Direction::Forward)
    }

    pub fn idct_block(&self, block: &Block<N>) -> Block<N> {
        self.transform(block, Direction::Inverse)
    }

    /// Rejects non-finite samples, and finite blocks whose sums overflow.
    pub fn forward(&self, block: &Block<N>) -> Result<Block<N>> {
        self.checked(block, Direction::Forward)
    }

    pub fn inverse(&self, block: &Block<N>) -> Result<Block<N>> {
        self.checked(block, Direction::Inverse)
    }

    fn checked(&self, block: &Block<N>, direction: Direction) -> Result<Block<N>> {
        check_finite(block.iter().flatten())?;
        let out = self.transform(block, direction);
        check_finite_output(out.iter().flatten())?;
        Ok(out)
    }

    pub fn forward_into(&self, input: &[f64], output: &mut [f64]) -> Result<()> {
        self.transform_into(input, output, Direction::Forward)
    }

    pub fn inverse_into(&self, input: &[f64], output: &mut [f64]) -> Result<()> {
        self.transform_into(input, output, Direction::Inverse)
    }

    /// Validates lengths, samples and the computed block before anything is
    /// written to `output`.
    pub fn transform_into(
        &self,
        input: &[f64],
        output: &mut [f64],
        direction: Direction,
    ) -> Result<()> {
        check_len(N * N, input.len())?;
        check_len(N * N, output.len())?;
        check_finite(input)?;

        let out = self.transform_flat(input, direction);
        check_finite_output(out.iter().flatten())?;
        store(&out, output);
        Ok(())
    }

    /// Caller guarantees `data.len() == N * N`.
    pub(crate) fn transform_flat(&self, data: &[f64], direction: Direction) -> Block<N> {
        self.transform(&load::<N>(data), direction)
    }
}
