#![forbid(unsafe_code)]

use std::sync::LazyLock;

pub mod batch;
pub mod block;
pub mod cosine;
pub mod dct;
pub mod error;
pub mod fixed;

pub use batch::{BatchConfig, BatchTransformer};
pub use block::{Block, BlockTransform, Direction, transpose};
pub use cosine::CosineBasis;
pub use dct::{MatrixDct, Transform1d};
pub use error::{Result, TransformError};
pub use fixed::{
    FIXED_COEFF_LIMIT, FIXED_SAMPLE_LIMIT, forward_transform_fixed, inverse_transform_fixed,
};

pub const BLOCK_SIZE: usize = 8;
pub const BLOCK_LEN: usize = BLOCK_SIZE * BLOCK_SIZE;

static REFERENCE: LazyLock<BlockTransform<BLOCK_SIZE>> = LazyLock::new(BlockTransform::new);

/// Shared 8x8 transform whose cosine matrix is computed once per process.
pub fn reference_transform() -> &'static BlockTransform<BLOCK_SIZE> {
    &REFERENCE
}

/// Spatial 8x8 block (row-major) to coefficients. `[0]` is the DC term.
pub fn forward_transform(block: &[f64; BLOCK_LEN]) -> Result<[f64; BLOCK_LEN]> {
    let mut out = [0.0; BLOCK_LEN];
    REFERENCE.forward_into(block, &mut out)?;
    Ok(out)
}

/// Coefficients back to the spatial 8x8 block.
pub fn inverse_transform(coeffs: &[f64; BLOCK_LEN]) -> Result<[f64; BLOCK_LEN]> {
    let mut out = [0.0; BLOCK_LEN];
    REFERENCE.inverse_into(coeffs, &mut out)?;
    Ok(out)
}

pub fn forward_transform_into(input: &[f64], output: &mut [f64]) -> Result<()> {
    REFERENCE.forward_into(input, output)
}

pub fn inverse_transform_into(input: &[f64], output: &mut [f64]) -> Result<()> {
    REFERENCE.inverse_into(input, output)
}
