use std::ptr;
use std::slice;

use blockdct::{BLOCK_LEN, BatchConfig, BatchTransformer, TransformError};

pub const BLOCKDCT_OK: i32 = 0;
pub const BLOCKDCT_ERR_NULL: i32 = -1;
pub const BLOCKDCT_ERR_LENGTH: i32 = -2;
pub const BLOCKDCT_ERR_NON_FINITE: i32 = -3;
pub const BLOCKDCT_ERR_THREAD_POOL: i32 = -4;
pub const BLOCKDCT_ERR_OVERFLOW: i32 = -5;
pub const BLOCKDCT_ERR_RANGE: i32 = -6;

pub struct BlockDctBatch {
    inner: BatchTransformer,
}

fn status(result: blockdct::Result<()>) -> i32 {
    match result {
        Ok(()) => BLOCKDCT_OK,
        Err(TransformError::InvalidLength { .. }) => BLOCKDCT_ERR_LENGTH,
        Err(TransformError::NonFiniteInput { .. }) => BLOCKDCT_ERR_NON_FINITE,
        Err(TransformError::ThreadPool(_)) => BLOCKDCT_ERR_THREAD_POOL,
        Err(TransformError::NonFiniteOutput { .. }) => BLOCKDCT_ERR_OVERFLOW,
        Err(TransformError::OutOfRange { .. }) => BLOCKDCT_ERR_RANGE,
    }
}

unsafe fn transform(
    input: *const f64,
    input_len: usize,
    output: *mut f64,
    output_len: usize,
    run: fn(&[f64], &mut [f64]) -> blockdct::Result<()>,
) -> i32 {
    if input.is_null() || output.is_null() {
        return BLOCKDCT_ERR_NULL;
    }
    if input_len != BLOCK_LEN || output_len != BLOCK_LEN {
        return BLOCKDCT_ERR_LENGTH;
    }

    let input = unsafe { slice::from_raw_parts(input, input_len) };
    let output = unsafe { slice::from_raw_parts_mut(output, output_len) };
    status(run(input, output))
}

/// Forward 8x8 DCT of `input` (64 row-major samples) into `output`.
///
/// Returns `BLOCKDCT_OK` on success. `output` is left untouched on any error.
///
/// # Safety
///
/// `input` must be valid for `input_len` reads and `output` for
/// `output_len` writes. The two regions must not overlap.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn blockdct_forward(
    input: *const f64,
    input_len: usize,
    output: *mut f64,
    output_len: usize,
) -> i32 {
    unsafe {
        transform(
            input,
            input_len,
            output,
            output_len,
            blockdct::forward_transform_into,
        )
    }
}

/// Inverse 8x8 DCT of `input` (64 coefficients) into `output`.
///
/// # Safety
///
/// Same requirements as [`blockdct_forward`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn blockdct_inverse(
    input: *const f64,
    input_len: usize,
    output: *mut f64,
    output_len: usize,
) -> i32 {
    unsafe {
        transform(
            input,
            input_len,
            output,
            output_len,
            blockdct::inverse_transform_into,
        )
    }
}

/// Creates a batch transformer with `threads` workers (0 = one per core).
/// Returns null if the worker pool cannot be built.
#[unsafe(no_mangle)]
pub extern "C" fn blockdct_batch_new(threads: usize) -> *mut BlockDctBatch {
    let config = BatchConfig {
        threads,
        ..Default::default()
    };
    match BatchTransformer::new(config) {
        Ok(inner) => Box::into_raw(Box::new(BlockDctBatch { inner })),
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
///
/// `batch` must be null or a pointer returned by [`blockdct_batch_new`]
/// that has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn blockdct_batch_free(batch: *mut BlockDctBatch) {
    if !batch.is_null() {
        drop(unsafe { Box::from_raw(batch) });
    }
}

unsafe fn transform_plane(
    batch: *const BlockDctBatch,
    data: *mut f64,
    len: usize,
    run: fn(&BatchTransformer, &mut [f64]) -> blockdct::Result<()>,
) -> i32 {
    if batch.is_null() || data.is_null() {
        return BLOCKDCT_ERR_NULL;
    }

    let batch = unsafe { &*batch };
    let data = unsafe { slice::from_raw_parts_mut(data, len) };
    status(run(&batch.inner, data))
}

/// Forward-transforms `len / 64` consecutive blocks in place.
///
/// # Safety
///
/// `batch` must come from [`blockdct_batch_new`]; `data` must be valid for
/// `len` reads and writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn blockdct_batch_forward(
    batch: *const BlockDctBatch,
    data: *mut f64,
    len: usize,
) -> i32 {
    unsafe { transform_plane(batch, data, len, BatchTransformer::forward_plane) }
}

/// # Safety
///
/// Same requirements as [`blockdct_batch_forward`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn blockdct_batch_inverse(
    batch: *const BlockDctBatch,
    data: *mut f64,
    len: usize,
) -> i32 {
    unsafe { transform_plane(batch, data, len, BatchTransformer::inverse_plane) }
}
