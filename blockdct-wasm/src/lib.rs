#![forbid(unsafe_code)]

use wasm_bindgen::prelude::*;

fn to_js(e: blockdct::TransformError) -> JsError {
    JsError::new(&e.to_string())
}

/// Forward 8x8 DCT of 64 row-major samples.
#[wasm_bindgen(js_name = forwardTransform)]
pub fn forward_transform(samples: &[f64]) -> Result<Vec<f64>, JsError> {
    let mut out = vec![0.0; blockdct::BLOCK_LEN];
    blockdct::forward_transform_into(samples, &mut out).map_err(to_js)?;
    Ok(out)
}

/// Inverse 8x8 DCT of 64 coefficients.
#[wasm_bindgen(js_name = inverseTransform)]
pub fn inverse_transform(coeffs: &[f64]) -> Result<Vec<f64>, JsError> {
    let mut out = vec![0.0; blockdct::BLOCK_LEN];
    blockdct::inverse_transform_into(coeffs, &mut out).map_err(to_js)?;
    Ok(out)
}

#[wasm_bindgen(js_name = fixedInverseTransform)]
pub fn fixed_inverse_transform(coeffs: &[i32]) -> Result<Vec<i32>, JsError> {
    let coeffs: &[i32; blockdct::BLOCK_LEN] = coeffs.try_into().map_err(|_| {
        to_js(blockdct::TransformError::InvalidLength {
            expected: blockdct::BLOCK_LEN,
            actual: coeffs.len(),
        })
    })?;
    let samples = blockdct::inverse_transform_fixed(coeffs).map_err(to_js)?;
    Ok(samples.to_vec())
}
