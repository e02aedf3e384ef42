use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("invalid buffer length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("non-finite sample at index {index}")]
    NonFiniteInput { index: usize },

    #[error("transform overflowed at coefficient {index}")]
    NonFiniteOutput { index: usize },

    #[error("sample {value} at index {index} is outside the fixed-point range ±{limit}")]
    OutOfRange { index: usize, value: i32, limit: i32 },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, TransformError>;

pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(TransformError::InvalidLength { expected, actual });
    }
    Ok(())
}

pub(crate) fn check_finite<'a>(samples: impl IntoIterator<Item = &'a f64>) -> Result<()> {
    match samples.into_iter().position(|v| !v.is_finite()) {
        Some(index) => {
            tracing::debug!(index, "rejecting non-finite sample");
            Err(TransformError::NonFiniteInput { index })
        }
        None => Ok(()),
    }
}

pub(crate) fn check_finite_output<'a>(values: impl IntoIterator<Item = &'a f64>) -> Result<()> {
    match values.into_iter().position(|v| !v.is_finite()) {
        Some(index) => {
            tracing::debug!(index, "transform produced a non-finite value");
            Err(TransformError::NonFiniteOutput { index })
        }
        None => Ok(()),
    }
}
