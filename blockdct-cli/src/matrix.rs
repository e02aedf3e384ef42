use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use blockdct::{BLOCK_LEN, BLOCK_SIZE};

fn parse_values<T>(text: &str) -> Result<[T; BLOCK_LEN]>
where
    T: FromStr + Copy + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() != BLOCK_LEN {
        bail!("expected {} samples, got {}", BLOCK_LEN, tokens.len());
    }

    let mut out = [T::default(); BLOCK_LEN];
    for (i, (slot, token)) in out.iter_mut().zip(&tokens).enumerate() {
        *slot = token
            .parse()
            .with_context(|| format!("invalid sample {i}: {token:?}"))?;
    }
    Ok(out)
}

pub fn parse_samples(text: &str) -> Result<[f64; BLOCK_LEN]> {
    parse_values(text)
}

pub fn parse_integer_samples(text: &str) -> Result<[i32; BLOCK_LEN]> {
    parse_values(text)
}

pub fn format_matrix(values: &[f64; BLOCK_LEN], precision: usize) -> String {
    let width = precision + 6;
    format_rows(values, |v| format!("{v:>width$.precision$}"))
}

pub fn format_integer_matrix(values: &[i32; BLOCK_LEN]) -> String {
    format_rows(values, |v| format!("{v:>6}"))
}

fn format_rows<T: Display>(values: &[T], cell: impl Fn(&T) -> String) -> String {
    let mut out = String::new();
    for row in values.chunks_exact(BLOCK_SIZE) {
        out.push('[');
        for v in row {
            out.push_str(&cell(v));
            out.push(' ');
        }
        out.push_str("]\n");
    }
    out
}
