use blockdct::{BLOCK_LEN, BLOCK_SIZE, forward_transform, inverse_transform};

fn print_block(label: &str, block: &[f64; BLOCK_LEN]) {
    println!("{label}:");
    for row in block.chunks_exact(BLOCK_SIZE) {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:8.3}")).collect();
        println!("  {}", cells.join(" "));
    }
}

fn main() -> blockdct::Result<()> {
    let mut block = [0.0; BLOCK_LEN];
    block[0] = 3.0;
    block[BLOCK_SIZE] = 69.0;

    let coeffs = forward_transform(&block)?;
    let recovered = inverse_transform(&coeffs)?;

    print_block("input", &block);
    print_block("coefficients", &coeffs);
    print_block("reconstructed", &recovered);

    let max_err = block
        .iter()
        .zip(&recovered)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    println!("max round-trip error: {max_err:e}");
    Ok(())
}
