use rayon::prelude::*;

use crate::block::{Block, Direction, store};
use crate::error::{Result, TransformError, check_finite, check_finite_output};
use crate::{BLOCK_LEN, BLOCK_SIZE, reference_transform};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Worker count. 0 means one worker per available core.
    pub threads: usize,
    /// Smallest number of blocks handed to a single worker task.
    pub min_blocks_per_task: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            min_blocks_per_task: 16,
        }
    }
}

/// Transforms many independent 8x8 blocks on a dedicated worker pool.
///
/// Blocks are transformed into scratch space and checked before anything is
/// copied back, so a failed call leaves the caller's buffer untouched.
pub struct BatchTransformer {
    pool: rayon::ThreadPool,
    min_len: usize,
}

impl std::fmt::Debug for BatchTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchTransformer")
            .field("threads", &self.pool.current_num_threads())
            .field("min_len", &self.min_len)
            .finish()
    }
}

impl BatchTransformer {
    pub fn new(config: BatchConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("blockdct-{i}"))
            .build()
            .map_err(|e| TransformError::ThreadPool(e.to_string()))?;

        tracing::debug!(
            threads = pool.current_num_threads(),
            min_blocks_per_task = config.min_blocks_per_task,
            "built block transform pool"
        );

        Ok(Self {
            pool,
            min_len: config.min_blocks_per_task.max(1),
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn forward_blocks(&self, blocks: &mut [[f64; BLOCK_LEN]]) -> Result<()> {
        self.run_blocks(blocks, Direction::Forward)
    }

    pub fn inverse_blocks(&self, blocks: &mut [[f64; BLOCK_LEN]]) -> Result<()> {
        self.run_blocks(blocks, Direction::Inverse)
    }

    /// `samples` holds consecutive row-major blocks of 64 samples each.
    pub fn forward_plane(&self, samples: &mut [f64]) -> Result<()> {
        self.run_plane(samples, Direction::Forward)
    }

    pub fn inverse_plane(&self, samples: &mut [f64]) -> Result<()> {
        self.run_plane(samples, Direction::Inverse)
    }

    fn run_blocks(&self, blocks: &mut [[f64; BLOCK_LEN]], direction: Direction) -> Result<()> {
        check_finite(blocks.iter().flatten())?;

        tracing::trace!(blocks = blocks.len(), ?direction, "transforming block batch");

        let transform = reference_transform();
        let min_len = self.min_len;
        self.pool.install(|| {
            let out: Vec<Block<BLOCK_SIZE>> = blocks
                .par_iter()
                .with_min_len(min_len)
                .map(|block| transform.transform_flat(block, direction))
                .collect();
            check_finite_output(out.iter().flatten().flatten())?;

            blocks
                .par_iter_mut()
                .zip(out.par_iter())
                .with_min_len(min_len)
                .for_each(|(dst, block)| store(block, dst));
            Ok(())
        })
    }

    fn run_plane(&self, samples: &mut [f64], direction: Direction) -> Result<()> {
        if !samples.len().is_multiple_of(BLOCK_LEN) {
            return Err(TransformError::InvalidLength {
                expected: samples.len().next_multiple_of(BLOCK_LEN),
                actual: samples.len(),
            });
        }
        check_finite(samples.iter())?;

        tracing::trace!(
            blocks = samples.len() / BLOCK_LEN,
            ?direction,
            "transforming sample plane"
        );

        let transform = reference_transform();
        let min_len = self.min_len;
        self.pool.install(|| {
            let out: Vec<Block<BLOCK_SIZE>> = samples
                .par_chunks_exact(BLOCK_LEN)
                .with_min_len(min_len)
                .map(|block| transform.transform_flat(block, direction))
                .collect();
            check_finite_output(out.iter().flatten().flatten())?;

            samples
                .par_chunks_exact_mut(BLOCK_LEN)
                .zip(out.par_iter())
                .with_min_len(min_len)
                .for_each(|(dst, block)| store(block, dst));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{forward_transform, inverse_transform};

    fn make_blocks(count: usize) -> Vec<[f64; BLOCK_LEN]> {
        (0..count)
            .map(|b| {
                let mut block = [0.0; BLOCK_LEN];
                for (i, v) in block.iter_mut().enumerate() {
                    *v = ((b * 131 + i * 37) % 256) as f64 - 128.0;
                }
                block
            })
            .collect()
    }

    fn small_pool() -> BatchTransformer {
        BatchTransformer::new(BatchConfig {
            threads: 2,
            min_blocks_per_task: 1,
        })
        .unwrap()
    }

    #[test]
    fn batch_matches_single_block_results() {
        let batch = small_pool();
        let original = make_blocks(37);
        let mut blocks = original.clone();

        batch.forward_blocks(&mut blocks).unwrap();
        for (got, src) in blocks.iter().zip(&original) {
            assert_eq!(got, &forward_transform(src).unwrap());
        }

        batch.inverse_blocks(&mut blocks).unwrap();
        for (got, src) in blocks.iter().zip(&original) {
            let expected = inverse_transform(&forward_transform(src).unwrap()).unwrap();
            assert_eq!(got, &expected);
        }
    }

    #[test]
    fn plane_roundtrip() {
        let batch = small_pool();
        let original: Vec<f64> = make_blocks(10).into_iter().flatten().collect();
        let mut plane = original.clone();

        batch.forward_plane(&mut plane).unwrap();
        batch.inverse_plane(&mut plane).unwrap();
        for (a, b) in plane.iter().zip(&original) {
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn plane_must_hold_whole_blocks() {
        let batch = small_pool();
        let mut plane = vec![0.0; 100];
        assert_eq!(
            batch.forward_plane(&mut plane),
            Err(TransformError::InvalidLength {
                expected: 128,
                actual: 100
            })
        );
    }

    #[test]
    fn non_finite_sample_leaves_every_block_untouched() {
        let batch = small_pool();
        let mut blocks = make_blocks(4);
        blocks[3][5] = f64::NAN;
        let before: Vec<Vec<u64>> = blocks
            .iter()
            .map(|b| b.iter().map(|v| v.to_bits()).collect())
            .collect();

        assert_eq!(
            batch.forward_blocks(&mut blocks),
            Err(TransformError::NonFiniteInput {
                index: 3 * BLOCK_LEN + 5
            })
        );
        let after: Vec<Vec<u64>> = blocks
            .iter()
            .map(|b| b.iter().map(|v| v.to_bits()).collect())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn overflowing_block_leaves_batch_untouched() {
        let batch = small_pool();
        let mut blocks = make_blocks(3);
        blocks[2] = [1e308; BLOCK_LEN];
        let before = blocks.clone();

        assert_eq!(
            batch.forward_blocks(&mut blocks),
            Err(TransformError::NonFiniteOutput {
                index: 2 * BLOCK_LEN
            })
        );
        assert_eq!(
            blocks.iter().flatten().map(|v| v.to_bits()).collect::<Vec<_>>(),
            before.iter().flatten().map(|v| v.to_bits()).collect::<Vec<_>>()
        );

        let mut plane: Vec<f64> = before.into_iter().flatten().collect();
        let snapshot: Vec<u64> = plane.iter().map(|v| v.to_bits()).collect();
        assert_eq!(
            batch.forward_plane(&mut plane),
            Err(TransformError::NonFiniteOutput {
                index: 2 * BLOCK_LEN
            })
        );
        assert_eq!(plane.iter().map(|v| v.to_bits()).collect::<Vec<_>>(), snapshot);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let batch = small_pool();
        let mut blocks: Vec<[f64; BLOCK_LEN]> = Vec::new();
        batch.forward_blocks(&mut blocks).unwrap();
        let mut plane: Vec<f64> = Vec::new();
        batch.inverse_plane(&mut plane).unwrap();
    }

    #[test]
    fn default_config_uses_every_core() {
        let batch = BatchTransformer::new(BatchConfig::default()).unwrap();
        assert!(batch.threads() >= 1);
    }
}
