use std::sync::LazyLock;

use crate::block::transpose;
use crate::cosine::{kernel, scale};
use crate::error::{Result, TransformError};

/// Fractional bits of the quantised cosine table.
pub const FIXED_BITS: u32 = 12;

/// Extra precision carried between the two passes.
const PASS_BITS: u32 = 2;

/// `sqrt(2/8) == 2^-1`, folded into the shifts.
const NORM_SHIFT: u32 = 1;

/// Largest sample magnitude accepted by [`forward_transform_fixed`]. Keeps the
/// first-pass results inside `i32`.
pub const FIXED_SAMPLE_LIMIT: i32 = 1 << 24;

/// Largest coefficient magnitude accepted by [`inverse_transform_fixed`]. Any
/// output of the forward path stays below it.
pub const FIXED_COEFF_LIMIT: i32 = 1 << 27;

const FIRST_PASS_SHIFT: u32 = FIXED_BITS + NORM_SHIFT - PASS_BITS;
const SECOND_PASS_SHIFT: u32 = FIXED_BITS + NORM_SHIFT + PASS_BITS;

static FIXED_BASIS: LazyLock<FixedPointBasis> = LazyLock::new(FixedPointBasis::new);

/// 8-point cosine basis quantised to [`FIXED_BITS`] fractional bits:
/// `table[k][n] = round(2^12 * scale(k) * cos(pi * (n + 0.5) * k / 8))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPointBasis {
    table: [[i32; 8]; 8],
}

impl FixedPointBasis {
    pub fn new() -> Self {
        let one = f64::from(1u32 << FIXED_BITS);
        let mut table = [[0; 8]; 8];
        for (k, row) in table.iter_mut().enumerate() {
            for (n, v) in row.iter_mut().enumerate() {
                *v = (one * scale(k) * kernel(k, n, 8)).round() as i32;
            }
        }
        Self { table }
    }

    pub fn table(&self) -> &[[i32; 8]; 8] {
        &self.table
    }

    fn forward_1d(&self, input: &[i32; 8], shift: u32) -> [i32; 8] {
        let mut out = [0; 8];
        for (v, row) in out.iter_mut().zip(&self.table) {
            let sum: i64 = row
                .iter()
                .zip(input)
                .map(|(&c, &x)| i64::from(c) * i64::from(x))
                .sum();
            *v = descale(sum, shift);
        }
        out
    }

    fn inverse_1d(&self, input: &[i32; 8], shift: u32) -> [i32; 8] {
        let mut sums = [0i64; 8];
        for (row, &coeff) in self.table.iter().zip(input) {
            for (s, &c) in sums.iter_mut().zip(row) {
                *s += i64::from(c) * i64::from(coeff);
            }
        }
        sums.map(|s| descale(s, shift))
    }
}

impl Default for FixedPointBasis {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn descale(v: i64, shift: u32) -> i32 {
    ((v + (1 << (shift - 1))) >> shift) as i32
}

fn to_rows(flat: &[i32; 64]) -> [[i32; 8]; 8] {
    let mut rows = [[0; 8]; 8];
    for (row, chunk) in rows.iter_mut().zip(flat.chunks_exact(8)) {
        row.copy_from_slice(chunk);
    }
    rows
}

fn to_flat(rows: &[[i32; 8]; 8]) -> [i32; 64] {
    let mut flat = [0; 64];
    for (chunk, row) in flat.chunks_exact_mut(8).zip(rows) {
        chunk.copy_from_slice(row);
    }
    flat
}

fn check_range(block: &[i32; 64], limit: i32) -> Result<()> {
    match block
        .iter()
        .position(|v| v.unsigned_abs() > limit.unsigned_abs())
    {
        Some(index) => {
            tracing::debug!(index, value = block[index], "sample outside fixed-point range");
            Err(TransformError::OutOfRange {
                index,
                value: block[index],
                limit,
            })
        }
        None => Ok(()),
    }
}

type FixedPassFn = fn(&FixedPointBasis, &[i32; 8], u32) -> [i32; 8];

fn separable_fixed(block: &[i32; 64], pass: FixedPassFn) -> [i32; 64] {
    let basis = &*FIXED_BASIS;
    let rows = to_rows(block);

    let mut first = [[0; 8]; 8];
    for (out, row) in first.iter_mut().zip(&rows) {
        *out = pass(basis, row, FIRST_PASS_SHIFT);
    }

    let transposed = transpose(&first);

    let mut second = [[0; 8]; 8];
    for (out, row) in second.iter_mut().zip(&transposed) {
        *out = pass(basis, row, SECOND_PASS_SHIFT);
    }
    to_flat(&second)
}

/// Integer 8x8 forward transform. Same layout and orientation as the float path,
/// results within one unit of the rounded float coefficients.
///
/// Every sample must lie within `±FIXED_SAMPLE_LIMIT`, otherwise
/// [`TransformError::OutOfRange`] names the first one that does not.
pub fn forward_transform_fixed(block: &[i32; 64]) -> Result<[i32; 64]> {
    check_range(block, FIXED_SAMPLE_LIMIT)?;
    Ok(separable_fixed(block, FixedPointBasis::forward_1d))
}

/// Integer 8x8 inverse transform for decoders working on dequantised integer
/// coefficients.
///
/// Coefficients are laid out like the float path's output: `coeffs[u * 8 + v]`
/// holds horizontal frequency `u` and vertical frequency `v`. Blocks stored in
/// JPEG natural order (row index = vertical frequency) must be transposed
/// first. Coefficients beyond `±FIXED_COEFF_LIMIT` are rejected.
pub fn inverse_transform_fixed(coeffs: &[i32; 64]) -> Result<[i32; 64]> {
    check_range(coeffs, FIXED_COEFF_LIMIT)?;
    Ok(separable_fixed(coeffs, FixedPointBasis::inverse_1d))
}
