use blockdct::{
    BLOCK_LEN, BatchConfig, BatchTransformer, BlockTransform, FIXED_SAMPLE_LIMIT, TransformError,
    forward_transform, forward_transform_fixed, forward_transform_into, inverse_transform,
    inverse_transform_fixed, inverse_transform_into,
};

fn reference_block() -> [f64; BLOCK_LEN] {
    let mut block = [0.0; BLOCK_LEN];
    block[0] = 3.0;
    block[8] = 69.0;
    block
}

fn gradient_block() -> [f64; BLOCK_LEN] {
    let mut block = [0.0; BLOCK_LEN];
    for row in 0..8 {
        for col in 0..8 {
            block[row * 8 + col] = (row * 16 + col * 8) as f64;
        }
    }
    block
}

#[test]
fn reference_scenario_reconstructs_every_position() {
    let block = reference_block();
    let coeffs = forward_transform(&block).unwrap();
    let recovered = inverse_transform(&coeffs).unwrap();

    assert!((recovered[0] - 3.0).abs() < 1e-9);
    assert!((recovered[8] - 69.0).abs() < 1e-9);
    for (i, &v) in recovered.iter().enumerate() {
        if i != 0 && i != 8 {
            assert!(v.abs() < 1e-9, "sample {} should be zero, got {}", i, v);
        }
    }
}

#[test]
fn dc_coefficient_tracks_block_average() {
    let block = gradient_block();
    let mean = block.iter().sum::<f64>() / BLOCK_LEN as f64;
    let coeffs = forward_transform(&block).unwrap();
    assert!((coeffs[0] - 8.0 * mean).abs() < 1e-9);
}

#[test]
fn slice_api_and_array_api_agree() {
    let block = gradient_block();
    let expected = forward_transform(&block).unwrap();

    let input: Vec<f64> = block.to_vec();
    let mut output = vec![0.0; BLOCK_LEN];
    forward_transform_into(&input, &mut output).unwrap();
    assert_eq!(output.as_slice(), expected.as_slice());

    let mut back = vec![0.0; BLOCK_LEN];
    inverse_transform_into(&output, &mut back).unwrap();
    for (a, b) in back.iter().zip(&input) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn non_finite_input_is_reported() {
    let mut block = gradient_block();
    block[42] = f64::INFINITY;
    assert_eq!(
        forward_transform(&block),
        Err(TransformError::NonFiniteInput { index: 42 })
    );
}

#[test]
fn generic_16x16_context_roundtrips() {
    let tx = BlockTransform::<16>::new();
    let mut block = [[0.0; 16]; 16];
    for (r, row) in block.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = ((r * 16 + c) * 13 % 51) as f64 - 25.0;
        }
    }
    let recovered = tx.inverse(&tx.forward(&block).unwrap()).unwrap();
    for (a, b) in recovered.iter().flatten().zip(block.iter().flatten()) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn fixed_point_decoder_path_tracks_float_path() {
    let mut pixels = [0i32; BLOCK_LEN];
    for (i, v) in pixels.iter_mut().enumerate() {
        *v = ((i as i32 * 7 + 3) % 200) - 100;
    }
    let coeffs = forward_transform_fixed(&pixels).unwrap();
    let float_coeffs = forward_transform(&pixels.map(f64::from)).unwrap();
    for (&fixed, &float) in coeffs.iter().zip(&float_coeffs) {
        assert!((fixed - float.round() as i32).abs() <= 1);
    }

    let recovered = inverse_transform_fixed(&coeffs).unwrap();
    for (i, (&rec, &orig)) in recovered.iter().zip(&pixels).enumerate() {
        assert!(
            (rec - orig).abs() <= 1,
            "pixel {} differs: original={}, recovered={}",
            i,
            orig,
            rec
        );
    }
}

#[test]
fn fixed_point_rejects_out_of_range_samples() {
    let mut pixels = [0i32; BLOCK_LEN];
    pixels[3] = FIXED_SAMPLE_LIMIT + 1;
    assert_eq!(
        forward_transform_fixed(&pixels),
        Err(TransformError::OutOfRange {
            index: 3,
            value: FIXED_SAMPLE_LIMIT + 1,
            limit: FIXED_SAMPLE_LIMIT
        })
    );
}

#[test]
fn overflowing_block_is_an_error_not_infinity() {
    assert_eq!(
        forward_transform(&[1e308; BLOCK_LEN]),
        Err(TransformError::NonFiniteOutput { index: 0 })
    );
}

#[test]
fn batch_of_frame_blocks_roundtrips() {
    let batch = BatchTransformer::new(BatchConfig::default()).unwrap();

    // 64x64 plane tiled into 8x8 blocks
    let mut plane = vec![0.0; 64 * 64];
    for (i, v) in plane.iter_mut().enumerate() {
        *v = ((i * 31) % 256) as f64;
    }
    let original = plane.clone();

    batch.forward_plane(&mut plane).unwrap();
    assert_eq!(
        &plane[..BLOCK_LEN],
        forward_transform(original[..BLOCK_LEN].try_into().unwrap())
            .unwrap()
            .as_slice()
    );

    batch.inverse_plane(&mut plane).unwrap();
    for (a, b) in plane.iter().zip(&original) {
        assert!((a - b).abs() < 1e-9);
    }
}
